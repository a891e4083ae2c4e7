use crate::core::branch::BranchFact;
use crate::core::git::GitOperations;
use crate::utils::{Result, TidyError};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// In-memory git facade that records every call as a git-style argument
/// string (`"branch -d feat/x"`, `"cherry main feat/x"`, ...).
#[derive(Clone, Default)]
pub struct MockGit {
    pub calls: Arc<Mutex<Vec<String>>>,
    branches: Vec<BranchFact>,
    merged: HashSet<String>,
    current: String,
    equivalent: HashSet<String>,
    cherry_failures: HashSet<String>,
    not_fully_merged: HashSet<String>,
    local_failures: HashMap<String, String>,
    remote_failures: HashMap<String, String>,
    timeouts: HashSet<String>,
    fetch_failure: Option<String>,
}

impl MockGit {
    pub fn new() -> Self {
        Self {
            current: "main".to_string(),
            ..Self::default()
        }
    }

    pub fn with_branches(mut self, branches: Vec<BranchFact>) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_merged(mut self, names: &[&str]) -> Self {
        self.merged = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_current(mut self, name: &str) -> Self {
        self.current = name.to_string();
        self
    }

    pub fn with_equivalent(mut self, name: &str) -> Self {
        self.equivalent.insert(name.to_string());
        self
    }

    pub fn fail_cherry_for(mut self, name: &str) -> Self {
        self.cherry_failures.insert(name.to_string());
        self
    }

    /// `git branch -d <name>` is refused as not fully merged.
    pub fn with_not_fully_merged(mut self, name: &str) -> Self {
        self.not_fully_merged.insert(name.to_string());
        self
    }

    /// Every local delete of `name` fails with `stderr`, after any
    /// not-fully-merged refusal.
    pub fn fail_local_delete(mut self, name: &str, stderr: &str) -> Self {
        self.local_failures
            .insert(name.to_string(), stderr.to_string());
        self
    }

    pub fn fail_remote_delete(mut self, name: &str, stderr: &str) -> Self {
        self.remote_failures
            .insert(name.to_string(), stderr.to_string());
        self
    }

    pub fn time_out_local_delete(mut self, name: &str) -> Self {
        self.timeouts.insert(name.to_string());
        self
    }

    pub fn fail_fetch(mut self, stderr: &str) -> Self {
        self.fetch_failure = Some(stderr.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.calls().len()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl GitOperations for MockGit {
    fn list_local_branches(&self) -> Result<Vec<BranchFact>> {
        self.record("for-each-ref refs/heads/".to_string());
        Ok(self.branches.clone())
    }

    fn resolve_commit_id(&self, branch: &str) -> Result<String> {
        self.record(format!("rev-parse {}", branch));
        self.branches
            .iter()
            .find(|b| b.name == branch)
            .map(|b| b.commit_id.clone())
            .ok_or_else(|| {
                TidyError::git_operation(format!("Cannot resolve branch '{}' to a commit", branch))
            })
    }

    fn merged_ancestry_set(&self, commit_id: &str) -> Result<HashSet<String>> {
        self.record(format!("branch --merged {}", commit_id));
        Ok(self.merged.clone())
    }

    fn current_branch_name(&self) -> Result<String> {
        self.record("symbolic-ref HEAD".to_string());
        Ok(self.current.clone())
    }

    fn fetch_and_prune(&self, remote: &str) -> Result<()> {
        self.record(format!("fetch {} --prune", remote));
        match &self.fetch_failure {
            Some(stderr) => Err(TidyError::git_command(
                format!("git fetch {} --prune", remote),
                stderr.clone(),
                Some(128),
            )),
            None => Ok(()),
        }
    }

    fn is_equivalently_included(&self, primary: &str, candidate: &str) -> Result<bool> {
        self.record(format!("cherry {} {}", primary, candidate));
        if self.cherry_failures.contains(candidate) {
            return Err(TidyError::git_command(
                format!("git cherry {} {}", primary, candidate),
                "fatal: unknown commit",
                Some(128),
            ));
        }
        Ok(self.equivalent.contains(candidate))
    }

    fn delete_local_branch(&self, branch: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        let args = format!("branch {} {}", flag, branch);
        self.record(args.clone());

        if self.timeouts.contains(branch) {
            return Err(TidyError::timeout(format!("git {}", args), 30));
        }
        if !force && self.not_fully_merged.contains(branch) {
            return Err(TidyError::git_command(
                format!("git {}", args),
                format!(
                    "error: the branch '{}' is not fully merged.\nhint: If you are sure you want to delete it, run 'git branch -D {}'",
                    branch, branch
                ),
                Some(1),
            ));
        }
        if let Some(stderr) = self.local_failures.get(branch) {
            return Err(TidyError::git_command(format!("git {}", args), stderr.clone(), Some(1)));
        }
        Ok(())
    }

    fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let args = format!("push {} --delete {}", remote, branch);
        self.record(args.clone());

        if let Some(stderr) = self.remote_failures.get(branch) {
            return Err(TidyError::git_command(format!("git {}", args), stderr.clone(), Some(1)));
        }
        Ok(())
    }
}
