use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use libkeysync_core::config::DEFAULT_CONFIG_PATH;
use libkeysync_core::RestoreOptions;

#[derive(Parser)]
#[command(
    name = "keysync",
    about = "Sync and restore named GPG keys with 1Password",
    version
)]
pub struct Cli {
    /// Path to keysync config file (.toml for TOML, YAML otherwise)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress human-readable output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// gpg binary to invoke
    #[arg(long, global = true, default_value = "gpg")]
    pub gpg: PathBuf,

    /// Operate on this GnuPG home directory instead of the default keyring
    #[arg(long, global = true)]
    pub gpg_homedir: Option<PathBuf>,

    /// 1Password CLI binary to invoke
    #[arg(long, global = true, default_value = "op")]
    pub op: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sync host subkey references to 1Password
    Sync {
        /// Host name from keysync config
        #[arg(long)]
        host: Option<String>,

        /// Sync all unique host key references
        #[arg(long)]
        all: bool,
    },

    /// Restore all host keys from 1Password
    Restore {
        /// Host name from keysync config
        #[arg(long)]
        host: String,

        #[command(flatten)]
        opts: RestoreArgs,
    },

    /// Backup top-level keys to 1Password
    Backup {
        /// Top-level key name from keysync config
        #[arg(long)]
        key: Option<String>,

        /// Backup all top-level keys
        #[arg(long)]
        all: bool,

        #[command(subcommand)]
        cmd: Option<BackupCommand>,
    },

    /// Validate the config and list every host reference
    Check,
}

#[derive(Subcommand, Clone)]
pub enum BackupCommand {
    /// Restore a top-level key backup from 1Password
    Restore {
        /// Top-level key name from keysync config
        #[arg(long)]
        key: String,

        #[command(flatten)]
        opts: RestoreArgs,
    },
}

#[derive(Args, Clone, Copy)]
pub struct RestoreArgs {
    /// Print what would be imported without importing
    #[arg(long)]
    pub dry_run: bool,

    /// Delete and reimport keys
    #[arg(long)]
    pub force: bool,

    /// Verify sha256 hashes before importing
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub verify_hash: bool,
}

impl From<RestoreArgs> for RestoreOptions {
    fn from(args: RestoreArgs) -> Self {
        RestoreOptions {
            dry_run: args.dry_run,
            force: args.force,
            verify_hash: args.verify_hash,
        }
    }
}
