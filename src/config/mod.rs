use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod manager;
pub mod validation;
pub mod wizard;

pub use manager::ConfigManager;
pub use wizard::run_config_wizard;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub branches: BranchConfig,
    pub remote: RemoteConfig,
    pub git: GitConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BranchConfig {
    pub age_days: u32,
    pub primary_branch: String,
    pub protected: Vec<String>,
    pub merge_strategy: MergeStrategy,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Ancestry only (`git branch --merged`).
    #[default]
    Standard,
    /// Ancestry, then cherry-equivalence for squash/rebase merges.
    Enhanced,
}

impl MergeStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            MergeStrategy::Standard => "standard",
            MergeStrategy::Enhanced => "enhanced",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub name: String,
    pub fetch_on_start: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GitConfig {
    pub timeout_secs: u64,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json(error)
    }
}

impl Config {
    pub fn load_or_create() -> Result<Self> {
        ConfigManager::load_or_create()
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    pub fn primary_branch(&self) -> &str {
        &self.branches.primary_branch
    }

    pub fn remote_name(&self) -> &str {
        &self.remote.name
    }

    pub fn is_enhanced(&self) -> bool {
        self.branches.merge_strategy == MergeStrategy::Enhanced
    }

    pub fn git_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.git.timeout_secs)
    }
}
