use super::repository::{execute_git_command, execute_git_raw, format_git_command, GitRepository};
use crate::core::branch::BranchFact;
use crate::utils::error::{Result, TidyError};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;

const REF_FORMAT: &str =
    "--format=%(refname:short)%00%(upstream:short)%00%(upstream:remotename)%00%(committerdate:unix)%00%(objectname)";

pub struct BranchManager<'a> {
    repo: &'a GitRepository,
}

impl<'a> BranchManager<'a> {
    pub fn new(repo: &'a GitRepository) -> Self {
        Self { repo }
    }

    pub fn list_local_branches(&self) -> Result<Vec<BranchFact>> {
        let output = execute_git_command(self.repo, &["for-each-ref", REF_FORMAT, "refs/heads/"])?;

        let mut branches = Vec::new();
        for line in output.lines() {
            if let Some(fact) = parse_ref_line(line)? {
                branches.push(fact);
            }
        }

        Ok(branches)
    }

    pub fn resolve_commit_id(&self, branch: &str) -> Result<String> {
        let spec = format!("{}^{{commit}}", branch);
        execute_git_command(self.repo, &["rev-parse", "--verify", "--quiet", &spec]).map_err(
            |e| match e {
                TidyError::GitCommand { .. } => TidyError::git_operation(format!(
                    "Cannot resolve branch '{}' to a commit",
                    branch
                )),
                other => other,
            },
        )
    }

    pub fn merged_ancestry_set(&self, commit_id: &str) -> Result<HashSet<String>> {
        let output = execute_git_command(
            self.repo,
            &["branch", "--merged", commit_id, "--format=%(refname:short)"],
        )?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Name of the checked-out branch, or an empty string on a detached HEAD.
    pub fn current_branch_name(&self) -> Result<String> {
        let args = ["symbolic-ref", "--quiet", "--short", "HEAD"];
        let output = execute_git_raw(self.repo, &args)?;

        if output.success() {
            return Ok(output.stdout.trim().to_string());
        }

        // --quiet exits 1 without output when HEAD is detached
        if output.code == Some(1) && output.stderr.trim().is_empty() {
            return Ok(String::new());
        }

        Err(TidyError::git_command(
            format_git_command(&args),
            output.stderr.trim().to_string(),
            output.code,
        ))
    }

    pub fn fetch_and_prune(&self, remote: &str) -> Result<()> {
        execute_git_command(self.repo, &["fetch", remote, "--prune"]).map(|_| ())
    }

    /// True when every commit on `candidate` missing from `primary` has a
    /// patch-equivalent commit in `primary` (`git cherry` reports only `-`).
    pub fn is_equivalently_included(&self, primary: &str, candidate: &str) -> Result<bool> {
        let output = execute_git_command(self.repo, &["cherry", primary, candidate])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .all(|line| line.starts_with('-')))
    }

    pub fn delete_local_branch(&self, branch: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        execute_git_command(self.repo, &["branch", flag, branch]).map(|_| ())
    }

    pub fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        execute_git_command(self.repo, &["push", remote, "--delete", branch]).map(|_| ())
    }
}

fn parse_ref_line(line: &str) -> Result<Option<BranchFact>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split('\0').collect();
    if fields.len() != 5 {
        return Err(TidyError::git_operation(format!(
            "Unexpected for-each-ref output: {:?}",
            line
        )));
    }

    let name = fields[0].trim();
    if name.is_empty() {
        return Ok(None);
    }

    let last_commit = parse_unix_timestamp(fields[3].trim()).ok_or_else(|| {
        TidyError::git_operation(format!(
            "Invalid commit timestamp '{}' for branch '{}'",
            fields[3], name
        ))
    })?;

    Ok(Some(BranchFact {
        name: name.to_string(),
        upstream: non_empty(fields[1]),
        remote: non_empty(fields[2]),
        last_commit,
        commit_id: fields[4].trim().to_string(),
    }))
}

fn parse_unix_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let seconds = value.parse::<i64>().ok()?;
    Utc.timestamp_opt(seconds, 0).single()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::*;

    #[test]
    fn test_parse_ref_line() {
        let line = "feat/login\0origin/feat/login\0origin\01700000000\0abc123";
        let fact = parse_ref_line(line).unwrap().unwrap();
        assert_eq!(fact.name, "feat/login");
        assert_eq!(fact.upstream.as_deref(), Some("origin/feat/login"));
        assert_eq!(fact.remote.as_deref(), Some("origin"));
        assert_eq!(fact.last_commit.timestamp(), 1_700_000_000);
        assert_eq!(fact.commit_id, "abc123");

        let tracks_local = parse_ref_line("feat/x\0main\0.\01700000000\0abc123")
            .unwrap()
            .unwrap();
        assert_eq!(tracks_local.remote.as_deref(), Some("."));
        assert!(!tracks_local.has_remote());

        let local_only = parse_ref_line("scratch\0\0\01700000000\0def456")
            .unwrap()
            .unwrap();
        assert!(local_only.upstream.is_none());
        assert!(local_only.remote.is_none());

        assert!(parse_ref_line("").unwrap().is_none());
        assert!(parse_ref_line("broken line").is_err());
        assert!(parse_ref_line("x\0\0\0not-a-time\0abc").is_err());
    }

    #[test]
    fn test_list_local_branches() {
        let (_temp_dir, service) = setup_test_repo();
        let repo = service.repository();
        create_branch_with_commit(repo, "feat/one", "one.txt", None);

        let manager = BranchManager::new(repo);
        let branches = manager.list_local_branches().unwrap();
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["feat/one", "main"]);
        assert!(branches.iter().all(|b| b.commit_id.len() == 40));
        assert!(branches.iter().all(|b| b.upstream.is_none()));
    }

    #[test]
    fn test_merged_set_and_current_branch() {
        let (_temp_dir, service) = setup_test_repo();
        let repo = service.repository();
        create_branch_with_commit(repo, "feat/unmerged", "unmerged.txt", None);
        execute_git_command(repo, &["branch", "feat/merged"]).unwrap();

        let manager = BranchManager::new(repo);
        assert_eq!(manager.current_branch_name().unwrap(), "main");

        let main_commit = manager.resolve_commit_id("main").unwrap();
        let merged = manager.merged_ancestry_set(&main_commit).unwrap();
        assert!(merged.contains("main"));
        assert!(merged.contains("feat/merged"));
        assert!(!merged.contains("feat/unmerged"));
    }

    #[test]
    fn test_current_branch_detached_head() {
        let (_temp_dir, service) = setup_test_repo();
        let repo = service.repository();
        execute_git_command(repo, &["checkout", "--detach", "HEAD"]).unwrap();

        let manager = BranchManager::new(repo);
        assert_eq!(manager.current_branch_name().unwrap(), "");
    }

    #[test]
    fn test_resolve_unknown_branch_fails() {
        let (_temp_dir, service) = setup_test_repo();
        let manager = BranchManager::new(service.repository());
        let err = manager.resolve_commit_id("nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    fn commit_of(repo: &GitRepository, branch: &str) -> String {
        BranchManager::new(repo).resolve_commit_id(branch).unwrap()
    }

    #[test]
    fn test_equivalent_change_detection() {
        let (_temp_dir, service) = setup_test_repo();
        let repo = service.repository();
        create_branch_with_commit(repo, "feat/picked", "picked.txt", Some(3));
        create_branch_with_commit(repo, "feat/pending", "pending.txt", None);

        // Move main forward so the picked commit gets a new parent
        std::fs::write(repo.root.join("unrelated.txt"), "unrelated\n").unwrap();
        execute_git_command(repo, &["add", "unrelated.txt"]).unwrap();
        execute_git_command(repo, &["commit", "-q", "-m", "Unrelated change"]).unwrap();

        // Land the change from feat/picked on main under a different commit id
        execute_git_command(repo, &["cherry-pick", "feat/picked"]).unwrap();
        assert_ne!(commit_of(repo, "main"), commit_of(repo, "feat/picked"));

        let manager = BranchManager::new(repo);
        assert!(!manager
            .merged_ancestry_set(&manager.resolve_commit_id("main").unwrap())
            .unwrap()
            .contains("feat/picked"));
        assert!(manager.is_equivalently_included("main", "feat/picked").unwrap());
        assert!(!manager.is_equivalently_included("main", "feat/pending").unwrap());
    }

    #[test]
    fn test_delete_local_branch_safe_and_forced() {
        let (_temp_dir, service) = setup_test_repo();
        let repo = service.repository();
        create_branch_with_commit(repo, "feat/unmerged", "unmerged.txt", None);

        let manager = BranchManager::new(repo);
        let err = manager.delete_local_branch("feat/unmerged", false).unwrap_err();
        assert!(err.is_not_fully_merged(), "unexpected error: {err:?}");

        manager.delete_local_branch("feat/unmerged", true).unwrap();
        let names: Vec<String> = manager
            .list_local_branches()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["main".to_string()]);
    }
}
