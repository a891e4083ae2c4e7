use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GIT_TIDY_LOG";

/// Installs the process-wide stderr subscriber.
///
/// Logging stays off unless `GIT_TIDY_LOG` is set or `-v` is passed, since
/// anything written to stderr while the TUI owns the terminal corrupts the
/// screen.
pub fn init(verbosity: u8) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(spec) if !spec.trim().is_empty() => spec,
        _ => level_for(verbosity).to_string(),
    };

    if filter == "off" {
        return;
    }

    let result = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if result.is_err() {
        eprintln!("git-tidy: logging init skipped (global subscriber already set)");
    }
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "off",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
