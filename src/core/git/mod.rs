use crate::core::branch::BranchFact;
use crate::utils::error::Result;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub mod branch;
pub mod repository;

pub use branch::BranchManager;
pub use repository::GitRepository;

/// Everything the classifier and the deletion executor need from git.
///
/// Kept behind a trait so both can run against a recording fake in tests.
pub trait GitOperations: Send + Sync {
    fn list_local_branches(&self) -> Result<Vec<BranchFact>>;
    fn resolve_commit_id(&self, branch: &str) -> Result<String>;
    fn merged_ancestry_set(&self, commit_id: &str) -> Result<HashSet<String>>;
    /// Empty string when HEAD is detached.
    fn current_branch_name(&self) -> Result<String>;
    fn fetch_and_prune(&self, remote: &str) -> Result<()>;
    fn is_equivalently_included(&self, primary: &str, candidate: &str) -> Result<bool>;
    fn delete_local_branch(&self, branch: &str, force: bool) -> Result<()>;
    fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()>;
}

impl GitOperations for GitRepository {
    fn list_local_branches(&self) -> Result<Vec<BranchFact>> {
        BranchManager::new(self).list_local_branches()
    }

    fn resolve_commit_id(&self, branch: &str) -> Result<String> {
        BranchManager::new(self).resolve_commit_id(branch)
    }

    fn merged_ancestry_set(&self, commit_id: &str) -> Result<HashSet<String>> {
        BranchManager::new(self).merged_ancestry_set(commit_id)
    }

    fn current_branch_name(&self) -> Result<String> {
        BranchManager::new(self).current_branch_name()
    }

    fn fetch_and_prune(&self, remote: &str) -> Result<()> {
        BranchManager::new(self).fetch_and_prune(remote)
    }

    fn is_equivalently_included(&self, primary: &str, candidate: &str) -> Result<bool> {
        BranchManager::new(self).is_equivalently_included(primary, candidate)
    }

    fn delete_local_branch(&self, branch: &str, force: bool) -> Result<()> {
        BranchManager::new(self).delete_local_branch(branch, force)
    }

    fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        BranchManager::new(self).delete_remote_branch(remote, branch)
    }
}

pub struct GitService {
    repo: GitRepository,
}

impl GitService {
    pub fn discover() -> Result<Self> {
        let repo = GitRepository::discover()?;
        repo.validate()?;
        Ok(Self { repo })
    }

    pub fn discover_from(path: &Path) -> Result<Self> {
        let repo = GitRepository::discover_from(path)?;
        repo.validate()?;
        Ok(Self { repo })
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            repo: self.repo.with_timeout(timeout),
        }
    }

    pub fn repository(&self) -> &GitRepository {
        &self.repo
    }

    pub fn branch_manager(&self) -> BranchManager<'_> {
        BranchManager::new(&self.repo)
    }
}

impl GitOperations for GitService {
    fn list_local_branches(&self) -> Result<Vec<BranchFact>> {
        self.repo.list_local_branches()
    }

    fn resolve_commit_id(&self, branch: &str) -> Result<String> {
        self.repo.resolve_commit_id(branch)
    }

    fn merged_ancestry_set(&self, commit_id: &str) -> Result<HashSet<String>> {
        self.repo.merged_ancestry_set(commit_id)
    }

    fn current_branch_name(&self) -> Result<String> {
        self.repo.current_branch_name()
    }

    fn fetch_and_prune(&self, remote: &str) -> Result<()> {
        self.repo.fetch_and_prune(remote)
    }

    fn is_equivalently_included(&self, primary: &str, candidate: &str) -> Result<bool> {
        self.repo.is_equivalently_included(primary, candidate)
    }

    fn delete_local_branch(&self, branch: &str, force: bool) -> Result<()> {
        self.repo.delete_local_branch(branch, force)
    }

    fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.repo.delete_remote_branch(remote, branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::*;

    #[test]
    fn test_git_operations_trait() {
        let (_temp_dir, service) = setup_test_repo();
        let git: &dyn GitOperations = &service;

        assert_eq!(git.current_branch_name().unwrap(), "main");
        let branches = git.list_local_branches().unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(
            git.resolve_commit_id("main").unwrap(),
            branches[0].commit_id
        );
    }

    #[test]
    fn test_fetch_unknown_remote_fails() {
        let (_temp_dir, service) = setup_test_repo();
        assert!(service.fetch_and_prune("nowhere").is_err());
    }

    #[test]
    fn test_with_timeout() {
        let (_temp_dir, service) = setup_test_repo();
        let service = service.with_timeout(Duration::from_secs(5));
        assert_eq!(service.repository().timeout, Duration::from_secs(5));
    }
}
