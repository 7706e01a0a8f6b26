//! # Completions Command Implementation
//!
//! Prints a tab-completion script for `repoweave` on stdout. The script
//! covers every verb and flag, including the import options such as
//! `--depth-recursive` and `--exclude-prefix`.
//!
//! ```bash
//! repoweave completions bash > ~/.local/share/bash-completion/completions/repoweave
//! repoweave completions fish > ~/.config/fish/completions/repoweave.fish
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Shells a completion script can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to write the script for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Writes the completion script for `shell` into `out`.
fn write_script(shell: CompletionShell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(Shell::from(shell), &mut cmd, bin_name, out);
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_script(args.shell, &mut lock);
    lock.flush()?;
    Ok(())
}
