use crate::cli::parser::{Cli, CompletionArgs, Shell};
use crate::utils::{Result, TidyError};
use clap::CommandFactory;
use clap_complete::{generate, shells};

const BIN_NAME: &str = "git-tidy";

pub fn execute(args: CompletionArgs) -> Result<()> {
    let script = generate_completion(args.shell)?;
    println!("{}", script);

    if std::env::var("GIT_TIDY_COMPLETION_HELP").is_ok() {
        eprintln!("\n{}", installation_instructions(args.shell));
    }
    Ok(())
}

pub fn generate_completion(shell: Shell) -> Result<String> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, BIN_NAME, &mut buf),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, BIN_NAME, &mut buf),
        Shell::Fish => generate(shells::Fish, &mut cmd, BIN_NAME, &mut buf),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, BIN_NAME, &mut buf),
    }

    String::from_utf8(buf).map_err(|e| {
        TidyError::invalid_args(format!("UTF-8 error generating completion: {}", e))
    })
}

pub fn installation_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => "# Add to ~/.bashrc:\neval \"$(git-tidy completion bash)\"".to_string(),
        Shell::Zsh => "# Add to ~/.zshrc:\neval \"$(git-tidy completion zsh)\"".to_string(),
        Shell::Fish => {
            "# Save to the fish completions directory:\ngit-tidy completion fish > ~/.config/fish/completions/git-tidy.fish"
                .to_string()
        }
        Shell::PowerShell => {
            "# Add to your PowerShell profile:\ngit-tidy completion powershell | Out-String | Invoke-Expression"
                .to_string()
        }
    }
}
