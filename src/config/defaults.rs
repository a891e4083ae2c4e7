use super::{BranchConfig, Config, GitConfig, MergeStrategy, RemoteConfig};
use std::path::PathBuf;

pub const CONFIG_PATH_ENV: &str = "GIT_TIDY_CONFIG_PATH";
pub const DEFAULT_AGE_DAYS: u32 = 90;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn default_config() -> Config {
    Config {
        branches: default_branch_config(),
        remote: default_remote_config(),
        git: default_git_config(),
    }
}

pub fn default_branch_config() -> BranchConfig {
    BranchConfig {
        age_days: DEFAULT_AGE_DAYS,
        primary_branch: "main".to_string(),
        protected: vec![
            "main".to_string(),
            "master".to_string(),
            "develop".to_string(),
        ],
        merge_strategy: MergeStrategy::Standard,
    }
}

pub fn default_remote_config() -> RemoteConfig {
    RemoteConfig {
        name: "origin".to_string(),
        fetch_on_start: true,
    }
}

pub fn default_git_config() -> GitConfig {
    GitConfig {
        timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
}

pub fn get_default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "git-tidy") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("git-tidy")
    }
}

pub fn get_config_file_path() -> PathBuf {
    // Allow environment variable override for config path (used in tests)
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(config_path);
    }

    get_default_config_dir().join("config.json")
}
