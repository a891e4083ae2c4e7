use crate::config::{Config, MergeStrategy};
use crate::core::branch::{BranchFact, Category, ClassifiedBranch, MergeMethod};
use crate::core::git::GitOperations;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// The knobs classification depends on, lifted out of `Config` so command
/// line overrides can be applied without touching the persisted file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyPolicy {
    pub age_days: u32,
    pub primary_branch: String,
    pub protected: Vec<String>,
    pub merge_strategy: MergeStrategy,
}

impl ClassifyPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            age_days: config.branches.age_days,
            primary_branch: config.branches.primary_branch.clone(),
            protected: config.branches.protected.clone(),
            merge_strategy: config.branches.merge_strategy,
        }
    }

    pub fn age_threshold(&self) -> Duration {
        Duration::hours(i64::from(self.age_days) * 24)
    }
}

pub fn classify(
    facts: &[BranchFact],
    ancestry_merged: &HashSet<String>,
    policy: &ClassifyPolicy,
    current_branch: &str,
    git: &dyn GitOperations,
) -> Result<Vec<ClassifiedBranch>> {
    classify_at(facts, ancestry_merged, policy, current_branch, git, Utc::now())
}

/// Same as [`classify`] with an explicit clock.
pub fn classify_at(
    facts: &[BranchFact],
    ancestry_merged: &HashSet<String>,
    policy: &ClassifyPolicy,
    current_branch: &str,
    git: &dyn GitOperations,
    now: DateTime<Utc>,
) -> Result<Vec<ClassifiedBranch>> {
    let threshold = policy.age_threshold();

    facts
        .iter()
        .map(|fact| {
            classify_one(
                fact,
                ancestry_merged,
                policy,
                current_branch,
                git,
                now,
                threshold,
            )
        })
        .collect()
}

fn classify_one(
    fact: &BranchFact,
    ancestry_merged: &HashSet<String>,
    policy: &ClassifyPolicy,
    current_branch: &str,
    git: &dyn GitOperations,
    now: DateTime<Utc>,
    threshold: Duration,
) -> Result<ClassifiedBranch> {
    let is_current = !current_branch.is_empty() && fact.name == current_branch;
    let is_old_by_age = now - fact.last_commit > threshold;

    let is_protected = policy.protected.iter().any(|name| *name == fact.name)
        || is_current
        || fact.name == policy.primary_branch;

    if is_protected {
        tracing::debug!(branch = %fact.name, is_current, "protected");
        return Ok(ClassifiedBranch {
            fact: fact.clone(),
            is_merged: false,
            merge_method: MergeMethod::None,
            is_old_by_age,
            is_protected: true,
            is_current,
            category: Category::Protected,
        });
    }

    let mut is_merged = ancestry_merged.contains(&fact.name);
    let mut merge_method = if is_merged {
        MergeMethod::Ancestry
    } else {
        MergeMethod::None
    };

    if !is_merged && policy.merge_strategy == MergeStrategy::Enhanced {
        // An error here is ambiguous, so it aborts the whole run instead of
        // defaulting to "unmerged".
        if git.is_equivalently_included(&policy.primary_branch, &fact.name)? {
            is_merged = true;
            merge_method = MergeMethod::EquivalentChange;
        }
    }

    let category = if is_merged {
        Category::MergedOld
    } else if is_old_by_age {
        Category::UnmergedOld
    } else {
        Category::Active
    };

    tracing::debug!(
        branch = %fact.name,
        ?category,
        merge = merge_method.name(),
        old = is_old_by_age,
        "classified"
    );

    Ok(ClassifiedBranch {
        fact: fact.clone(),
        is_merged,
        merge_method,
        is_old_by_age,
        is_protected: false,
        is_current: false,
        category,
    })
}
