//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Name used in user-facing hints.
pub const PROGRAM: &str = "rails-credentials";

#[derive(Debug, Parser)]
#[command(name = PROGRAM)]
#[command(about = "Show and edit Rails encrypted credentials")]
#[command(version)]
#[command(after_help = r#"FILES:
    Without --environment:  config/master.key, config/credentials.yml.enc
    With --environment ENV: config/credentials/ENV.key, config/credentials/ENV.yml.enc

SECURITY:
    Prefer RAILS_MASTER_KEY or a key file over --master-key, which is
    visible in the process list and shell history."#)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Root directory of your Rails project
    #[arg(long, default_value = ".", global = true)]
    pub base_dir: PathBuf,

    /// Rails environment whose credentials to use
    #[arg(long, env = "RAILS_ENV", global = true)]
    pub environment: Option<String>,

    /// Master key (prefer the environment variable or a key file)
    #[arg(long, env = "RAILS_MASTER_KEY", hide_env_values = true, global = true)]
    pub master_key: Option<String>,

    /// Path to the master key file
    #[arg(long, global = true)]
    pub master_key_file: Option<PathBuf>,

    /// Path to the encrypted credentials file
    #[arg(long = "credentials-file", global = true)]
    pub credentials_file: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the decrypted credentials in `$VISUAL` or `$EDITOR` for editing
    Edit {
        /// Editor command; falls back to `$EDITOR`, then `vi`
        #[arg(long, env = "VISUAL")]
        editor: Option<String>,
    },

    /// Show the decrypted credentials
    Show,
}
