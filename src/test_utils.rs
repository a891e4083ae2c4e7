pub mod mock_git;

pub mod test_helpers {
    use crate::core::branch::{BranchFact, Category, ClassifiedBranch, MergeMethod};
    use crate::core::git::{GitRepository, GitService};
    use chrono::{DateTime, Duration, Utc};
    use std::fs;
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    pub fn create_test_config() -> crate::config::Config {
        crate::config::defaults::default_config()
    }

    pub fn run_git(repo_path: &Path, args: &[&str]) {
        let status = Command::new("git")
            .current_dir(repo_path)
            .args(args)
            .env("LC_ALL", "C")
            .output()
            .expect("Failed to run git");
        assert!(
            status.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&status.stderr)
        );
    }

    pub fn setup_test_repo() -> (TempDir, GitService) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo_path = temp_dir.path();

        run_git(repo_path, &["init", "--initial-branch=main"]);
        run_git(repo_path, &["config", "user.name", "Test User"]);
        run_git(repo_path, &["config", "user.email", "test@example.com"]);
        run_git(repo_path, &["config", "commit.gpgsign", "false"]);

        fs::write(repo_path.join("README.md"), "# Test Repository")
            .expect("Failed to write README");
        run_git(repo_path, &["add", "README.md"]);
        run_git(repo_path, &["commit", "-m", "Initial commit"]);

        let service = GitService::discover_from(repo_path).expect("Failed to discover repo");
        (temp_dir, service)
    }

    /// Creates `branch` off `main` with a single commit touching `file`,
    /// optionally back-dated by `days_ago`, then returns to `main`.
    pub fn create_branch_with_commit(
        repo: &GitRepository,
        branch: &str,
        file: &str,
        days_ago: Option<i64>,
    ) {
        let root = repo.root.as_path();
        run_git(root, &["checkout", "-q", "-b", branch, "main"]);
        fs::write(root.join(file), format!("content for {}\n", branch))
            .expect("Failed to write file");
        run_git(root, &["add", file]);

        let mut commit = Command::new("git");
        commit
            .current_dir(root)
            .args(["commit", "-q", "-m", &format!("Add {}", file)]);
        if let Some(days) = days_ago {
            let stamp = format!("{} +0000", (Utc::now() - Duration::days(days)).timestamp());
            commit
                .env("GIT_AUTHOR_DATE", &stamp)
                .env("GIT_COMMITTER_DATE", &stamp);
        }
        let output = commit.output().expect("Failed to commit");
        assert!(
            output.status.success(),
            "commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        run_git(root, &["checkout", "-q", "main"]);
    }

    /// A fact tracking `origin/<name>`, last committed `days_ago` before `now`.
    pub fn branch_fact(name: &str, now: DateTime<Utc>, days_ago: i64) -> BranchFact {
        BranchFact {
            name: name.to_string(),
            upstream: Some(format!("origin/{}", name)),
            remote: Some("origin".to_string()),
            last_commit: now - Duration::days(days_ago),
            commit_id: format!("{:0<40}", name.len()),
        }
    }

    pub fn local_branch_fact(name: &str, now: DateTime<Utc>, days_ago: i64) -> BranchFact {
        BranchFact {
            upstream: None,
            remote: None,
            ..branch_fact(name, now, days_ago)
        }
    }

    pub fn classified(fact: BranchFact, category: Category) -> ClassifiedBranch {
        let is_merged = category == Category::MergedOld;
        ClassifiedBranch {
            fact,
            is_merged,
            merge_method: if is_merged {
                MergeMethod::Ancestry
            } else {
                MergeMethod::None
            },
            is_old_by_age: matches!(category, Category::MergedOld | Category::UnmergedOld),
            is_protected: category == Category::Protected,
            is_current: false,
            category,
        }
    }
}
