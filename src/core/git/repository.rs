use crate::utils::error::{Result, TidyError};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GitRepository {
    pub root: PathBuf,
    pub git_dir: PathBuf,
    pub timeout: Duration,
}

/// Captured result of a finished git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl GitRepository {
    pub fn discover() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            TidyError::git_operation(format!("Failed to get current directory: {}", e))
        })?;

        Self::discover_from(&current_dir)
    }

    pub fn discover_from(path: &Path) -> Result<Self> {
        let output = run_git(path, &["rev-parse", "--show-toplevel"], DEFAULT_GIT_TIMEOUT)?;

        if !output.success() {
            return Err(TidyError::git_operation(format!(
                "Not a git repository or git not found: {}",
                output.stderr.trim()
            )));
        }

        let root = PathBuf::from(output.stdout.trim());
        let git_dir = Self::get_git_dir(&root)?;

        Ok(Self {
            root,
            git_dir,
            timeout: DEFAULT_GIT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.root.exists() {
            return Err(TidyError::git_operation(
                "Repository root does not exist".to_string(),
            ));
        }

        if !self.git_dir.exists() {
            return Err(TidyError::git_operation(
                "Git directory does not exist".to_string(),
            ));
        }

        Ok(())
    }

    fn get_git_dir(repo_root: &Path) -> Result<PathBuf> {
        let output = run_git(repo_root, &["rev-parse", "--git-dir"], DEFAULT_GIT_TIMEOUT)?;

        if !output.success() {
            return Err(TidyError::git_operation(
                "Failed to determine git directory".to_string(),
            ));
        }

        let git_dir = PathBuf::from(output.stdout.trim());
        let git_dir = if git_dir.is_absolute() {
            git_dir
        } else {
            repo_root.join(git_dir)
        };

        Ok(git_dir)
    }
}

/// Runs git in `repo` and returns trimmed stdout, mapping a non-zero exit to
/// `TidyError::GitCommand` carrying git's stderr.
pub fn execute_git_command(repo: &GitRepository, args: &[&str]) -> Result<String> {
    let output = execute_git_raw(repo, args)?;

    if !output.success() {
        return Err(TidyError::git_command(
            format_git_command(args),
            output.stderr.trim().to_string(),
            output.code,
        ));
    }

    Ok(output.stdout.trim().to_string())
}

/// Runs git in `repo` without interpreting the exit status.
pub fn execute_git_raw(repo: &GitRepository, args: &[&str]) -> Result<GitOutput> {
    run_git(&repo.root, args, repo.timeout)
}

pub fn format_git_command(args: &[&str]) -> String {
    let mut command = String::from("git");
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

fn run_git(cwd: &Path, args: &[&str], timeout: Duration) -> Result<GitOutput> {
    let command = format_git_command(args);
    tracing::debug!(cwd = %cwd.display(), %command, "running git");

    let mut child = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .env("LC_ALL", "C")
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| TidyError::git_operation(format!("Failed to execute git: {}", e)))?;

    // Drain both pipes while waiting so a chatty command cannot fill the
    // pipe buffer and stall until the timeout.
    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = match child
        .wait_timeout(timeout)
        .map_err(|e| TidyError::git_operation(format!("Failed to wait for git: {}", e)))?
    {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(%command, seconds = timeout.as_secs(), "git timed out");
            return Err(TidyError::timeout(command, timeout.as_secs()));
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    Ok(GitOutput {
        code: status.code(),
        stdout,
        stderr,
    })
}

fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut reader) = stream {
            let _ = reader.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::setup_test_repo;

    #[test]
    fn test_repository_discovery() {
        let (temp_dir, service) = setup_test_repo();
        let repo = service.repository();
        assert_eq!(repo.root, temp_dir.path().canonicalize().unwrap());
        assert!(repo.git_dir.exists());
        assert_eq!(repo.timeout, DEFAULT_GIT_TIMEOUT);
    }

    #[test]
    fn test_repository_validation() {
        let (_temp_dir, service) = setup_test_repo();
        assert!(service.repository().validate().is_ok());
    }

    #[test]
    fn test_discover_outside_repository() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = GitRepository::discover_from(temp_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_command_carries_stderr() {
        let (_temp_dir, service) = setup_test_repo();
        let err = execute_git_command(service.repository(), &["branch", "-d", "does-not-exist"])
            .unwrap_err();

        match &err {
            TidyError::GitCommand {
                command, stderr, ..
            } => {
                assert_eq!(command, "git branch -d does-not-exist");
                assert!(stderr.contains("does-not-exist"));
            }
            other => panic!("Expected GitCommand error, got {other:?}"),
        }
        assert!(err.detail().contains("does-not-exist"));
    }

    #[test]
    fn test_format_git_command() {
        assert_eq!(
            format_git_command(&["push", "origin", "--delete", "feat/x"]),
            "git push origin --delete feat/x"
        );
        assert_eq!(format_git_command(&[]), "git");
    }
}
