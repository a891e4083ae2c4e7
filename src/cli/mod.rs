pub mod commands;
pub mod parser;


pub use parser::{Cli, Commands};

use crate::cli::commands::common::is_non_interactive;
use crate::config::{self, Config, ConfigManager};
use crate::utils::{Result, TidyError};

pub fn execute_command(cli: Cli) -> Result<()> {
    execute_command_with_config(cli, None)
}

pub fn execute_command_with_config(cli: Cli, test_config: Option<Config>) -> Result<()> {
    match cli.command {
        Some(Commands::Config(args)) => commands::config::execute(args),
        Some(Commands::Completion(args)) => commands::completion::execute(args),
        None => {
            let config = match test_config {
                Some(cfg) => cfg,
                None => load_config()?,
            };
            commands::sweep::execute(config, cli.sweep)
        }
    }
}

/// Loads the configuration, offering the wizard on the first interactive run.
fn load_config() -> Result<Config> {
    if !ConfigManager::config_exists() && !is_non_interactive() {
        println!("No configuration found, starting first-time setup.\n");
        match config::run_config_wizard() {
            Ok(config) => return Ok(config),
            Err(e) => {
                tracing::info!(error = %e, "setup skipped, using defaults");
                println!("Continuing with default settings.\n");
            }
        }
    }

    ConfigManager::load_or_create()
        .map_err(|e| TidyError::config_error(format!("Failed to load config: {}", e)))
}
