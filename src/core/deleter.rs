use crate::core::branch::short_commit;
use crate::core::git::GitOperations;
use crate::utils::error::TidyError;

pub const EMPTY_REMOTE_MESSAGE: &str = "Cannot delete remote branch: remote name is empty";
pub const DRY_RUN_PREFIX: &str = "Dry Run: Would execute:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    Local,
    Remote,
}

impl TargetKind {
    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Local => "local",
            TargetKind::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRequest {
    pub branch: String,
    pub target: TargetKind,
    /// Required when `target` is `Remote`.
    pub remote: Option<String>,
    /// Selects `git branch -d` over `git branch -D` for local targets.
    pub merged: bool,
    pub commit_id: String,
}

impl DeletionRequest {
    pub fn local(branch: impl Into<String>, merged: bool, commit_id: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            target: TargetKind::Local,
            remote: None,
            merged,
            commit_id: commit_id.into(),
        }
    }

    pub fn remote(
        branch: impl Into<String>,
        remote: impl Into<String>,
        merged: bool,
        commit_id: impl Into<String>,
    ) -> Self {
        Self {
            branch: branch.into(),
            target: TargetKind::Remote,
            remote: Some(remote.into()),
            merged,
            commit_id: commit_id.into(),
        }
    }

    /// The literal git command this request maps to.
    pub fn command(&self) -> String {
        match self.target {
            TargetKind::Local => local_delete_command(&self.branch, !self.merged),
            TargetKind::Remote => format!(
                "git push {} --delete {}",
                self.remote.as_deref().unwrap_or_default(),
                self.branch
            ),
        }
    }

    fn remote_name(&self) -> Option<&str> {
        self.remote.as_deref().filter(|remote| !remote.trim().is_empty())
    }
}

fn local_delete_command(branch: &str, force: bool) -> String {
    let flag = if force { "-D" } else { "-d" };
    format!("git branch {} {}", flag, branch)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub branch: String,
    pub target: TargetKind,
    pub remote: Option<String>,
    pub success: bool,
    pub message: String,
    /// Every command attempted, joined with `" -> "` when a fallback ran.
    pub command: String,
    /// Pre-deletion commit, set only when something was actually deleted.
    pub commit_id: String,
}

impl DeletionOutcome {
    fn from_request(request: &DeletionRequest, command: String) -> Self {
        Self {
            branch: request.branch.clone(),
            target: request.target,
            remote: request.remote.clone(),
            success: false,
            message: String::new(),
            command,
            commit_id: String::new(),
        }
    }

    fn succeeded(mut self, message: String, commit_id: String) -> Self {
        self.success = true;
        self.message = message;
        self.commit_id = commit_id;
        self
    }

    fn failed(mut self, message: String) -> Self {
        self.success = false;
        self.message = message;
        self.commit_id.clear();
        self
    }

    /// Display label such as `feat/x` or `origin/feat/x`.
    pub fn target_label(&self) -> String {
        match (self.target, self.remote.as_deref()) {
            (TargetKind::Remote, Some(remote)) if !remote.is_empty() => {
                format!("{}/{}", remote, self.branch)
            }
            _ => self.branch.clone(),
        }
    }
}

/// Runs deletion batches one request at a time against a git facade.
pub struct DeletionExecutor<'a> {
    git: &'a dyn GitOperations,
}

impl<'a> DeletionExecutor<'a> {
    pub fn new(git: &'a dyn GitOperations) -> Self {
        Self { git }
    }

    /// Returns exactly one outcome per request, in request order. A failed
    /// item never stops the rest of the batch.
    pub fn execute(&self, requests: &[DeletionRequest], dry_run: bool) -> Vec<DeletionOutcome> {
        requests
            .iter()
            .map(|request| self.execute_one(request, dry_run))
            .collect()
    }

    fn execute_one(&self, request: &DeletionRequest, dry_run: bool) -> DeletionOutcome {
        let command = request.command();
        let outcome = DeletionOutcome::from_request(request, command.clone());

        if request.target == TargetKind::Remote && request.remote_name().is_none() {
            tracing::warn!(branch = %request.branch, "remote deletion without a remote name");
            return outcome.failed(EMPTY_REMOTE_MESSAGE.to_string());
        }

        if dry_run {
            return outcome.succeeded(format!("{} {}", DRY_RUN_PREFIX, command), String::new());
        }

        let outcome = match request.target {
            TargetKind::Remote => self.delete_remote(request, outcome),
            TargetKind::Local => self.delete_local(request, outcome),
        };

        if outcome.success {
            tracing::info!(target = %outcome.target_label(), command = %outcome.command, "deleted");
        } else {
            tracing::warn!(
                target = %outcome.target_label(),
                command = %outcome.command,
                message = %outcome.message,
                "deletion failed"
            );
        }
        outcome
    }

    fn delete_remote(&self, request: &DeletionRequest, outcome: DeletionOutcome) -> DeletionOutcome {
        let remote = request.remote_name().unwrap_or_default();
        match self.git.delete_remote_branch(remote, &request.branch) {
            Ok(()) => outcome.succeeded(
                format!(
                    "Deleted remote branch {}/{} (was {})",
                    remote,
                    request.branch,
                    short_commit(&request.commit_id)
                ),
                request.commit_id.clone(),
            ),
            Err(e) => outcome.failed(format!("Failed to delete remote branch: {}", e.detail())),
        }
    }

    fn delete_local(&self, request: &DeletionRequest, mut outcome: DeletionOutcome) -> DeletionOutcome {
        let force = !request.merged;
        let mut result = self.git.delete_local_branch(&request.branch, force);

        // Merge detection can disagree with git's own check; only the
        // "not fully merged" refusal earns a single forced retry.
        if !force && matches!(&result, Err(e) if e.is_not_fully_merged()) {
            let forced = local_delete_command(&request.branch, true);
            tracing::info!(branch = %request.branch, "safe delete refused, retrying with force");
            outcome.command = format!("{} -> {}", outcome.command, forced);
            result = self.git.delete_local_branch(&request.branch, true);
        }

        match result {
            Ok(()) => outcome.succeeded(
                format!(
                    "Deleted local branch {} (was {})",
                    request.branch,
                    short_commit(&request.commit_id)
                ),
                request.commit_id.clone(),
            ),
            Err(e) => outcome.failed(failure_message(&e)),
        }
    }
}

fn failure_message(error: &TidyError) -> String {
    format!("Failed to delete local branch: {}", error.detail())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_git::MockGit;

    const COMMIT: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

    #[test]
    fn test_dry_run_makes_no_calls() {
        let git = MockGit::new();
        let executor = DeletionExecutor::new(&git);
        let batch = vec![
            DeletionRequest::local("feat/a", true, COMMIT),
            DeletionRequest::local("feat/b", false, COMMIT),
            DeletionRequest::remote("feat/a", "origin", true, COMMIT),
        ];

        let outcomes = executor.execute(&batch, true);

        assert_eq!(outcomes.len(), batch.len());
        assert!(outcomes.iter().all(|o| o.success));
        assert!(outcomes.iter().all(|o| o.commit_id.is_empty()));
        assert_eq!(
            outcomes[0].message,
            "Dry Run: Would execute: git branch -d feat/a"
        );
        assert_eq!(
            outcomes[1].message,
            "Dry Run: Would execute: git branch -D feat/b"
        );
        assert_eq!(
            outcomes[2].message,
            "Dry Run: Would execute: git push origin --delete feat/a"
        );
        assert_eq!(git.total_calls(), 0);
    }

    #[test]
    fn test_empty_remote_fails_without_calls() {
        let git = MockGit::new();
        let executor = DeletionExecutor::new(&git);
        let batch = vec![DeletionRequest::remote("feat/a", "", true, COMMIT)];

        for dry_run in [false, true] {
            let outcomes = executor.execute(&batch, dry_run);
            assert_eq!(outcomes.len(), 1);
            assert!(!outcomes[0].success);
            assert_eq!(outcomes[0].message, EMPTY_REMOTE_MESSAGE);
            assert!(outcomes[0].commit_id.is_empty());
        }

        let missing = DeletionRequest {
            remote: None,
            ..DeletionRequest::remote("feat/a", "origin", true, COMMIT)
        };
        let outcomes = executor.execute(&[missing], false);
        assert_eq!(outcomes[0].message, EMPTY_REMOTE_MESSAGE);
        assert_eq!(git.total_calls(), 0);
    }

    #[test]
    fn test_merged_local_uses_safe_delete() {
        let git = MockGit::new();
        let executor = DeletionExecutor::new(&git);

        let outcomes = executor.execute(&[DeletionRequest::local("feat/a", true, COMMIT)], false);

        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].command, "git branch -d feat/a");
        assert_eq!(outcomes[0].commit_id, COMMIT);
        assert_eq!(outcomes[0].message, "Deleted local branch feat/a (was 4b825dc)");
        assert_eq!(git.calls(), vec!["branch -d feat/a".to_string()]);
    }

    #[test]
    fn test_unmerged_local_uses_forced_delete() {
        let git = MockGit::new();
        let executor = DeletionExecutor::new(&git);

        let outcomes = executor.execute(&[DeletionRequest::local("feat/a", false, COMMIT)], false);

        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].command, "git branch -D feat/a");
        assert_eq!(git.calls(), vec!["branch -D feat/a".to_string()]);
    }

    #[test]
    fn test_not_fully_merged_falls_back_once() {
        let git = MockGit::new().with_not_fully_merged("feat/a");
        let executor = DeletionExecutor::new(&git);

        let outcomes = executor.execute(&[DeletionRequest::local("feat/a", true, COMMIT)], false);

        assert!(outcomes[0].success);
        assert_eq!(
            outcomes[0].command,
            "git branch -d feat/a -> git branch -D feat/a"
        );
        assert_eq!(outcomes[0].commit_id, COMMIT);
        assert_eq!(
            git.calls(),
            vec!["branch -d feat/a".to_string(), "branch -D feat/a".to_string()]
        );
    }

    #[test]
    fn test_failed_fallback_is_reported() {
        let git = MockGit::new()
            .with_not_fully_merged("feat/a")
            .fail_local_delete("feat/a", "error: Cannot delete branch 'feat/a' checked out at '/tmp/wt'");
        let executor = DeletionExecutor::new(&git);

        let outcomes = executor.execute(&[DeletionRequest::local("feat/a", true, COMMIT)], false);

        assert!(!outcomes[0].success);
        assert_eq!(
            outcomes[0].command,
            "git branch -d feat/a -> git branch -D feat/a"
        );
        assert_eq!(
            outcomes[0].message,
            "Failed to delete local branch: Cannot delete branch 'feat/a' checked out at '/tmp/wt'"
        );
        assert!(outcomes[0].commit_id.is_empty());
        assert_eq!(git.total_calls(), 2);
    }

    #[test]
    fn test_other_failures_are_not_retried() {
        let git = MockGit::new().fail_local_delete("feat/a", "error: branch 'feat/a' not found.");
        let executor = DeletionExecutor::new(&git);

        let outcomes = executor.execute(&[DeletionRequest::local("feat/a", true, COMMIT)], false);

        assert!(!outcomes[0].success);
        assert_eq!(outcomes[0].command, "git branch -d feat/a");
        assert_eq!(
            outcomes[0].message,
            "Failed to delete local branch: branch 'feat/a' not found."
        );
        assert_eq!(git.calls(), vec!["branch -d feat/a".to_string()]);
    }

    #[test]
    fn test_remote_delete() {
        let git = MockGit::new().fail_remote_delete(
            "feat/gone",
            "error: unable to delete 'feat/gone': remote ref does not exist",
        );
        let executor = DeletionExecutor::new(&git);
        let batch = vec![
            DeletionRequest::remote("feat/a", "origin", true, COMMIT),
            DeletionRequest::remote("feat/gone", "origin", true, COMMIT),
        ];

        let outcomes = executor.execute(&batch, false);

        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].command, "git push origin --delete feat/a");
        assert_eq!(outcomes[0].message, "Deleted remote branch origin/feat/a (was 4b825dc)");
        assert_eq!(outcomes[0].commit_id, COMMIT);
        assert_eq!(outcomes[0].target_label(), "origin/feat/a");

        assert!(!outcomes[1].success);
        assert_eq!(
            outcomes[1].message,
            "Failed to delete remote branch: unable to delete 'feat/gone': remote ref does not exist"
        );
        assert!(outcomes[1].commit_id.is_empty());
    }

    #[test]
    fn test_partial_failure_preserves_order_and_length() {
        let git = MockGit::new().fail_local_delete("feat/b", "error: boom");
        let executor = DeletionExecutor::new(&git);
        let batch = vec![
            DeletionRequest::local("feat/a", true, COMMIT),
            DeletionRequest::local("feat/b", true, COMMIT),
            DeletionRequest::remote("feat/c", "", true, COMMIT),
            DeletionRequest::local("feat/d", false, COMMIT),
        ];

        let outcomes = executor.execute(&batch, false);

        let names: Vec<&str> = outcomes.iter().map(|o| o.branch.as_str()).collect();
        assert_eq!(names, vec!["feat/a", "feat/b", "feat/c", "feat/d"]);
        let flags: Vec<bool> = outcomes.iter().map(|o| o.success).collect();
        assert_eq!(flags, vec![true, false, false, true]);
    }

    #[test]
    fn test_timeout_reported_as_failure() {
        let git = MockGit::new().time_out_local_delete("feat/slow");
        let executor = DeletionExecutor::new(&git);

        let outcomes = executor.execute(&[DeletionRequest::local("feat/slow", true, COMMIT)], false);

        assert!(!outcomes[0].success);
        assert!(outcomes[0].message.contains("timed out"));
        assert_eq!(git.total_calls(), 1);
    }
}
