use crate::cli::commands::common::is_non_interactive;
use crate::cli::parser::{ConfigArgs, ConfigCommands};
use crate::config::{self, Config, ConfigManager};
use crate::utils::{Result, TidyError};

pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        Some(ConfigCommands::Setup) | None => execute_setup(),
        Some(ConfigCommands::Show) => execute_show(),
        Some(ConfigCommands::Path) => execute_path(),
        Some(ConfigCommands::Reset) => execute_reset(),
        Some(ConfigCommands::Set { path, value }) => execute_set(&path, &value),
    }
}

fn execute_setup() -> Result<()> {
    if is_non_interactive() {
        return Err(TidyError::invalid_args(
            "Cannot run the configuration wizard in non-interactive mode. Use 'git-tidy config set' instead.",
        ));
    }
    config::run_config_wizard()
        .map_err(|e| TidyError::config_error(format!("Configuration wizard failed: {e}")))?;
    println!("✅ Configuration wizard completed successfully");
    Ok(())
}

fn execute_show() -> Result<()> {
    let config = ConfigManager::load_or_create()
        .map_err(|e| TidyError::config_error(format!("Failed to load configuration: {e}")))?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn execute_path() -> Result<()> {
    let path = ConfigManager::get_config_path()
        .map_err(|e| TidyError::config_error(format!("Failed to get config path: {e}")))?;
    println!("{path}");
    Ok(())
}

fn execute_reset() -> Result<()> {
    use dialoguer::{theme::ColorfulTheme, Confirm};

    if is_non_interactive() {
        return Err(TidyError::invalid_args(
            "Cannot reset configuration in non-interactive mode. Run interactively to confirm reset.",
        ));
    }

    if !Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(
            "Are you sure you want to reset configuration to defaults? This cannot be undone.",
        )
        .default(false)
        .interact()
        .map_err(|e| TidyError::config_error(format!("Failed to read input: {e}")))?
    {
        println!("❌ Configuration reset cancelled");
        return Ok(());
    }

    let default_config = crate::config::defaults::default_config();
    ConfigManager::save(&default_config).map_err(|e| {
        TidyError::config_error(format!("Failed to save default configuration: {e}"))
    })?;

    println!("✅ Configuration reset to defaults successfully");
    Ok(())
}

fn execute_set(path: &str, value: &str) -> Result<()> {
    let config_path = std::path::PathBuf::from(
        ConfigManager::get_config_path()
            .map_err(|e| TidyError::config_error(format!("Failed to get config path: {e}")))?,
    );

    // make sure there is a file to edit
    let current = ConfigManager::load_or_create_with_path(Some(&config_path))
        .map_err(|e| TidyError::config_error(format!("Failed to load configuration: {e}")))?;

    let updated = set_config_value(&current, path, value)?;
    ConfigManager::save_to_path(&updated, &config_path)
        .map_err(|e| TidyError::config_error(format!("Failed to write config file: {e}")))?;

    println!("✅ Configuration updated: {path} = {value}");
    Ok(())
}

/// Applies `path = value` to a copy of `config`, rejecting results that no
/// longer deserialize or validate.
fn set_config_value(config: &Config, path: &str, value: &str) -> Result<Config> {
    let mut json_value = serde_json::to_value(config)?;
    set_json_value(&mut json_value, path, value)?;

    let updated: Config = serde_json::from_value(json_value)
        .map_err(|e| TidyError::config_error(format!("Invalid value for '{path}': {e}")))?;
    updated.validate()?;
    Ok(updated)
}

fn set_json_value(json_value: &mut serde_json::Value, path: &str, value: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(TidyError::config_error("Empty path provided"));
    }

    let path_parts: Vec<&str> = path.split('.').collect();
    let (final_key, parents) = match path_parts.split_last() {
        Some(split) => split,
        None => return Err(TidyError::config_error("Empty path provided")),
    };

    let mut current = json_value;
    for part in parents {
        current = current
            .as_object_mut()
            .ok_or_else(|| {
                TidyError::config_error(format!("Path component '{part}' is not an object"))
            })?
            .get_mut(*part)
            .ok_or_else(|| TidyError::config_error(format!("Path component '{part}' not found")))?;
    }

    let current_obj = current.as_object_mut().ok_or_else(|| {
        TidyError::config_error(format!("Parent of '{final_key}' is not an object"))
    })?;

    if !current_obj.contains_key(*final_key) {
        return Err(TidyError::config_error(format!("Unknown setting '{path}'")));
    }

    let parsed_value = parse_config_value(value);
    current_obj.insert(final_key.to_string(), parsed_value);

    Ok(())
}

fn parse_config_value(value: &str) -> serde_json::Value {
    match value {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        _ => {
            if let Ok(int_val) = value.parse::<i64>() {
                serde_json::Value::Number(serde_json::Number::from(int_val))
            } else if value.contains(',') {
                // comma separated lists, e.g. branches.protected
                serde_json::Value::Array(
                    config::wizard::parse_protected_list(value)
                        .into_iter()
                        .map(serde_json::Value::String)
                        .collect(),
                )
            } else {
                serde_json::Value::String(value.to_string())
            }
        }
    }
}
