use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidyError {
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    #[error("Git command failed ({command}): {stderr}")]
    GitCommand {
        command: String,
        stderr: String,
        code: Option<i32>,
    },

    #[error("Git command timed out after {seconds}s: {command}")]
    Timeout { command: String, seconds: u64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid arguments: {message}")]
    InvalidArgs { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TidyError>;

impl TidyError {
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    pub fn git_command(command: impl Into<String>, stderr: impl Into<String>, code: Option<i32>) -> Self {
        Self::GitCommand {
            command: command.into(),
            stderr: stderr.into(),
            code,
        }
    }

    pub fn timeout(command: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            command: command.into(),
            seconds,
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs {
            message: message.into(),
        }
    }

    /// The most specific diagnostic available: git's own stderr when the
    /// tool reported one, otherwise the rendered error.
    pub fn detail(&self) -> String {
        match self {
            Self::GitCommand { stderr, .. } if !stderr.trim().is_empty() => {
                let first = stderr
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or_default();
                first
                    .strip_prefix("error: ")
                    .or_else(|| first.strip_prefix("fatal: "))
                    .unwrap_or(first)
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_not_fully_merged(&self) -> bool {
        matches!(self, Self::GitCommand { stderr, .. } if stderr.contains("not fully merged"))
    }
}

impl From<crate::config::ConfigError> for TidyError {
    fn from(error: crate::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation_helpers() {
        let git_err = TidyError::git_operation("failed to list branches");
        assert!(matches!(git_err, TidyError::GitOperation { .. }));
        assert_eq!(
            git_err.to_string(),
            "Git operation failed: failed to list branches"
        );

        let config_err = TidyError::config_error("invalid configuration");
        assert_eq!(
            config_err.to_string(),
            "Configuration error: invalid configuration"
        );

        let timeout = TidyError::timeout("git fetch origin --prune", 30);
        assert_eq!(
            timeout.to_string(),
            "Git command timed out after 30s: git fetch origin --prune"
        );
    }

    #[test]
    fn test_detail_prefers_stderr() {
        let err = TidyError::git_command(
            "git branch -d feat/x",
            "error: branch 'feat/x' not found.\n",
            Some(1),
        );
        assert_eq!(err.detail(), "branch 'feat/x' not found.");

        let empty = TidyError::git_command("git branch -d feat/x", "  ", Some(1));
        assert_eq!(empty.detail(), "Git command failed (git branch -d feat/x):   ");

        let generic = TidyError::git_operation("spawn failed");
        assert_eq!(generic.detail(), "Git operation failed: spawn failed");
    }

    #[test]
    fn test_not_fully_merged_detection() {
        let err = TidyError::git_command(
            "git branch -d feat/x",
            "error: the branch 'feat/x' is not fully merged.\nIf you are sure you want to delete it, run 'git branch -D feat/x'.",
            Some(1),
        );
        assert!(err.is_not_fully_merged());

        let other = TidyError::git_command("git branch -d feat/x", "error: branch not found", Some(1));
        assert!(!other.is_not_fully_merged());
        assert!(!TidyError::timeout("git branch -d feat/x", 30).is_not_fully_merged());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TidyError = io_err.into();
        assert!(matches!(err, TidyError::Io(_)));
    }
}
