use super::{BranchConfig, Config, ConfigError, GitConfig, RemoteConfig, Result};

pub fn validate_config(config: &Config) -> Result<()> {
    validate_branch_config(&config.branches)?;
    validate_remote_config(&config.remote)?;
    validate_git_config(&config.git)?;
    Ok(())
}

pub fn validate_branch_config(config: &BranchConfig) -> Result<()> {
    if config.age_days == 0 {
        return Err(ConfigError::Validation(
            "branches.age_days must be a positive number of days".to_string(),
        ));
    }

    if config.primary_branch.trim().is_empty() {
        return Err(ConfigError::Validation(
            "branches.primary_branch cannot be empty".to_string(),
        ));
    }

    if config.protected.iter().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "branches.protected cannot contain empty names".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_remote_config(config: &RemoteConfig) -> Result<()> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "remote.name cannot be empty".to_string(),
        ));
    }

    if config.name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "remote.name '{}' cannot contain whitespace",
            config.name
        )));
    }

    Ok(())
}

pub fn validate_git_config(config: &GitConfig) -> Result<()> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "git.timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_config;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&default_config()).is_ok());
    }

    #[test]
    fn test_zero_age_rejected() {
        let mut config = default_config();
        config.branches.age_days = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("age_days"));
    }

    #[test]
    fn test_empty_names_rejected() {
        let mut config = default_config();
        config.branches.primary_branch = "  ".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = default_config();
        config.branches.protected.push(String::new());
        assert!(validate_config(&config).is_err());

        let mut config = default_config();
        config.remote.name = String::new();
        assert!(validate_config(&config).is_err());

        let mut config = default_config();
        config.remote.name = "my remote".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = default_config();
        config.git.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
