use clap::Parser;
use git_tidy::cli::{execute_command, Cli};
use git_tidy::utils::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = execute_command(cli) {
        eprintln!("git-tidy: {}", e);
        std::process::exit(1);
    }
}
