use chrono::{DateTime, Duration, Utc};

/// Raw facts about a local branch as read from git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFact {
    pub name: String,
    pub upstream: Option<String>,
    pub remote: Option<String>,
    pub last_commit: DateTime<Utc>,
    pub commit_id: String,
}

impl BranchFact {
    /// True when the branch tracks a branch on a named remote. An upstream
    /// in the local repository itself (remote `.`) does not count.
    pub fn has_remote(&self) -> bool {
        matches!(
            (&self.upstream, &self.remote),
            (Some(upstream), Some(remote))
                if !upstream.is_empty() && !remote.is_empty() && remote != "."
        )
    }

    /// Branch name on the remote side, e.g. `feat/x` for upstream
    /// `origin/feat/x`. Falls back to the local name.
    pub fn remote_branch_name(&self) -> &str {
        match (&self.upstream, &self.remote) {
            (Some(upstream), Some(remote)) => upstream
                .strip_prefix(remote.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .filter(|rest| !rest.is_empty())
                .unwrap_or(&self.name),
            _ => &self.name,
        }
    }

    pub fn short_commit(&self) -> &str {
        short_commit(&self.commit_id)
    }
}

pub fn short_commit(commit_id: &str) -> &str {
    commit_id.get(..7).unwrap_or(commit_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    None,
    Ancestry,
    EquivalentChange,
}

impl MergeMethod {
    pub fn name(&self) -> &'static str {
        match self {
            MergeMethod::None => "-",
            MergeMethod::Ancestry => "merged",
            MergeMethod::EquivalentChange => "squashed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Protected,
    Active,
    MergedOld,
    UnmergedOld,
}

impl Category {
    pub fn is_selectable(&self) -> bool {
        matches!(self, Category::MergedOld | Category::UnmergedOld)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Protected => "Protected",
            Category::Active => "Active",
            Category::MergedOld => "Merged",
            Category::UnmergedOld => "Stale",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedBranch {
    pub fact: BranchFact,
    pub is_merged: bool,
    pub merge_method: MergeMethod,
    pub is_old_by_age: bool,
    pub is_protected: bool,
    pub is_current: bool,
    pub category: Category,
}

impl ClassifiedBranch {
    pub fn name(&self) -> &str {
        &self.fact.name
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fact.last_commit
    }

    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        self.age(now).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(upstream: Option<&str>, remote: Option<&str>) -> BranchFact {
        BranchFact {
            name: "feat/login".to_string(),
            upstream: upstream.map(str::to_string),
            remote: remote.map(str::to_string),
            last_commit: Utc::now(),
            commit_id: "0123456789abcdef".to_string(),
        }
    }

    #[test]
    fn test_remote_counterpart() {
        assert!(fact(Some("origin/feat/login"), Some("origin")).has_remote());
        assert!(!fact(None, None).has_remote());
        assert!(!fact(Some("origin/feat/login"), None).has_remote());
        assert!(!fact(Some(""), Some("origin")).has_remote());
        assert!(!fact(Some("main"), Some(".")).has_remote());
    }

    #[test]
    fn test_remote_branch_name() {
        assert_eq!(
            fact(Some("origin/feat/login"), Some("origin")).remote_branch_name(),
            "feat/login"
        );
        assert_eq!(
            fact(Some("upstream/users/ann/login"), Some("upstream")).remote_branch_name(),
            "users/ann/login"
        );
        assert_eq!(
            fact(Some("origin-old/x"), Some("origin")).remote_branch_name(),
            "feat/login"
        );
        assert_eq!(fact(None, None).remote_branch_name(), "feat/login");
    }

    #[test]
    fn test_short_commit() {
        assert_eq!(fact(None, None).short_commit(), "0123456");
        assert_eq!(short_commit("abc"), "abc");
        assert_eq!(short_commit(""), "");
    }

    #[test]
    fn test_category_selectability() {
        assert!(!Category::Protected.is_selectable());
        assert!(!Category::Active.is_selectable());
        assert!(Category::MergedOld.is_selectable());
        assert!(Category::UnmergedOld.is_selectable());
    }
}
