use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "git-tidy")]
#[command(about = "Interactive cleanup of stale local and remote git branches")]
#[command(
    version,
    long_about = "When run without any command, classifies the local branches of the current repository and opens the interactive cleanup view"
)]
pub struct Cli {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Setup configuration
    Config(ConfigArgs),
    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Default, Clone)]
#[command(after_help = "EXAMPLES:
    # Pick branches to delete interactively
    git-tidy

    # Preview the deletions without touching anything
    git-tidy --dry-run

    # Print the classification only (no prompts)
    git-tidy --report --days 30

    # Detect squash-merged branches too
    git-tidy --enhanced --main develop")]
pub struct SweepArgs {
    /// Show what would be deleted without deleting anything
    #[arg(long, help = "Simulate deletions without running them")]
    pub dry_run: bool,

    /// Print the classification instead of opening the interactive view
    #[arg(long, help = "Print the branch report and exit")]
    pub report: bool,

    /// Age in days after which an unmerged branch counts as stale
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,

    /// Primary branch merges are checked against
    #[arg(long = "main", value_name = "BRANCH")]
    pub main: Option<String>,

    /// Additional protected branch (repeatable)
    #[arg(long = "protect", value_name = "BRANCH")]
    pub protect: Vec<String>,

    /// Also treat branches whose changes were squashed or cherry-picked as merged
    #[arg(long)]
    pub enhanced: bool,

    /// Remote used for fetching and remote deletions
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,

    /// Skip the initial fetch --prune
    #[arg(long)]
    pub no_fetch: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Interactive configuration wizard
    Setup,
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Reset configuration to defaults
    Reset,
    /// Set a configuration value using JSON path (e.g., branches.age_days 30)
    Set {
        /// JSON path to the setting (e.g., remote.name, branches.merge_strategy)
        path: String,
        /// Value to set
        value: String,
    },
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completion for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

impl SweepArgs {
    pub fn validate(&self) -> crate::utils::Result<()> {
        if let Some(ref main) = self.main {
            validate_branch_name(main)?;
        }
        for branch in &self.protect {
            validate_branch_name(branch)?;
        }
        if let Some(ref remote) = self.remote {
            validate_remote_name(remote)?;
        }
        Ok(())
    }
}

pub fn validate_branch_name(name: &str) -> crate::utils::Result<()> {
    if name.trim().is_empty() {
        return Err(crate::utils::TidyError::invalid_args(
            "Branch name cannot be empty",
        ));
    }

    if name.starts_with('-') {
        return Err(crate::utils::TidyError::invalid_args(format!(
            "Branch name cannot start with hyphen: {}",
            name
        )));
    }

    if name.contains("..") || name.contains("//") || name.chars().any(char::is_whitespace) {
        return Err(crate::utils::TidyError::invalid_args(format!(
            "Branch name contains invalid character sequence: {}",
            name
        )));
    }

    Ok(())
}

pub fn validate_remote_name(name: &str) -> crate::utils::Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(crate::utils::TidyError::invalid_args(
            "Remote name cannot be empty or contain whitespace",
        ));
    }
    Ok(())
}
