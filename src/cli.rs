//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use repoweave::output::OutputConfig;

/// repoweave - Import and manage workspaces of many git repositories
#[derive(Parser, Debug)]
#[command(name = "repoweave")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone the repositories of a manifest, following nested manifests with -r
    Import(commands::import::ImportArgs),

    /// Show the git status of every repository
    Status(commands::status::StatusArgs),

    /// Pull every repository
    Pull(commands::pull::PullArgs),

    /// Stash local changes, pull, and restore them in every repository
    Sync(commands::sync::SyncArgs),

    /// Show recent commits of every repository
    Log(commands::log::LogArgs),

    /// Switch one repository to another branch, tag or commit
    Switch(commands::switch::SwitchArgs),

    /// Check that every repository of a manifest is reachable
    Validate(commands::validate::ValidateArgs),

    /// Write the repositories of a workspace as a manifest
    Export(commands::export::ExportArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let out = OutputConfig::from_env_and_flag(&self.color);
        out.apply();

        match self.command {
            Commands::Import(args) => commands::import::execute(args),
            Commands::Status(args) => commands::status::execute(args, &out),
            Commands::Pull(args) => commands::pull::execute(args),
            Commands::Sync(args) => commands::sync::execute(args),
            Commands::Log(args) => commands::log::execute(args, &out),
            Commands::Switch(args) => commands::switch::execute(args),
            Commands::Validate(args) => commands::validate::execute(args),
            Commands::Export(args) => commands::export::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Sets up `env_logger`. `RUST_LOG`, when set, takes precedence over the flag.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under a test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
