pub const NON_INTERACTIVE_ENV: &str = "GIT_TIDY_NON_INTERACTIVE";

/// True when prompts and the terminal UI must not be used.
pub fn is_non_interactive() -> bool {
    std::env::var(NON_INTERACTIVE_ENV).is_ok()
        || std::env::var("CI").is_ok()
        || !atty::is(atty::Stream::Stdin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_forces_non_interactive() {
        let original = std::env::var(NON_INTERACTIVE_ENV).ok();

        std::env::set_var(NON_INTERACTIVE_ENV, "1");
        assert!(is_non_interactive());

        match original {
            Some(value) => std::env::set_var(NON_INTERACTIVE_ENV, value),
            None => std::env::remove_var(NON_INTERACTIVE_ENV),
        }
    }
}
