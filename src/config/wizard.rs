use super::defaults::default_config;
use super::{BranchConfig, Config, ConfigError, MergeStrategy, RemoteConfig, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

pub fn run_config_wizard() -> Result<Config> {
    println!("🔧 git-tidy Configuration Wizard");
    println!();

    let mut config = default_config();

    config.branches = configure_branches(config.branches)?;
    config.remote = configure_remote(config.remote)?;

    println!("\n📋 Configuration Summary:");
    display_config_summary(&config);

    if Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Save this configuration?")
        .default(true)
        .interact()
        .map_err(|e| ConfigError::Validation(format!("Failed to read input: {}", e)))?
    {
        super::ConfigManager::save(&config)?;
        println!("✅ Configuration saved successfully!");
    } else {
        println!("❌ Configuration not saved.");
        return Err(ConfigError::Validation(
            "Configuration cancelled by user".to_string(),
        ));
    }

    Ok(config)
}

fn configure_branches(mut config: BranchConfig) -> Result<BranchConfig> {
    println!("🌿 Branches");

    config.primary_branch = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Primary branch")
        .default(config.primary_branch)
        .interact()
        .map_err(|e| ConfigError::Validation(format!("Failed to read input: {}", e)))?;

    config.age_days = Input::<u32>::with_theme(&ColorfulTheme::default())
        .with_prompt("Consider branches stale after (days)")
        .default(config.age_days)
        .validate_with(|input: &u32| {
            if *input > 0 && *input <= 3650 {
                Ok(())
            } else {
                Err("Please enter a value between 1 and 3650 days")
            }
        })
        .interact()
        .map_err(|e| ConfigError::Validation(format!("Failed to read input: {}", e)))?;

    let protected = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Protected branches (comma separated)")
        .default(config.protected.join(","))
        .allow_empty(true)
        .interact()
        .map_err(|e| ConfigError::Validation(format!("Failed to read input: {}", e)))?;
    config.protected = parse_protected_list(&protected);

    let strategies = [
        "standard (ancestry only, fastest)",
        "enhanced (also detects squash and rebase merges)",
    ];
    let default_index = match config.merge_strategy {
        MergeStrategy::Standard => 0,
        MergeStrategy::Enhanced => 1,
    };
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Merge detection")
        .items(&strategies)
        .default(default_index)
        .interact()
        .map_err(|e| ConfigError::Validation(format!("Failed to read input: {}", e)))?;
    config.merge_strategy = if selection == 1 {
        MergeStrategy::Enhanced
    } else {
        MergeStrategy::Standard
    };

    Ok(config)
}

fn configure_remote(mut config: RemoteConfig) -> Result<RemoteConfig> {
    println!("\n🌐 Remote");

    config.name = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Remote name")
        .default(config.name)
        .interact()
        .map_err(|e| ConfigError::Validation(format!("Failed to read input: {}", e)))?;

    config.fetch_on_start = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Fetch and prune the remote before each run?")
        .default(config.fetch_on_start)
        .interact()
        .map_err(|e| ConfigError::Validation(format!("Failed to read input: {}", e)))?;

    Ok(config)
}

pub fn parse_protected_list(input: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

pub fn display_config_summary(config: &Config) {
    println!("  Primary branch: {}", config.branches.primary_branch);
    println!("  Stale after: {} days", config.branches.age_days);
    if config.branches.protected.is_empty() {
        println!("  Protected: (none)");
    } else {
        println!("  Protected: {}", config.branches.protected.join(", "));
    }
    println!("  Merge detection: {}", config.branches.merge_strategy.name());
    println!("  Remote: {}", config.remote.name);
    println!("  Fetch on start: {}", config.remote.fetch_on_start);
    println!("  Git timeout: {}s", config.git.timeout_secs);
}
