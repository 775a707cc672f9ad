//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;
use crate::errors::Result;
use crate::storage::KeyValueStore;
use crate::vault::CredentialVault;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "MNEMOVAULT_LOG";

/// MnemoVault CLI: encrypted storage for a generative-AI API key.
#[derive(Parser)]
#[command(
    name = "mnemovault",
    about = "Encrypted local storage for your generative-AI API key",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (overrides `vault_dir` in .mnemovault.toml)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Save the API key (replaces any stored key)
    Set {
        /// API key (omit for interactive prompt or piped stdin)
        value: Option<String>,

        /// Verify the key against the live service before saving
        #[arg(long)]
        check: bool,
    },

    /// Print the stored API key
    Get,

    /// Show what is stored without decrypting it
    Status,

    /// Remove the stored API key
    Clear {
        /// Also delete the encryption key (a new one is made on next `set`)
        #[arg(long)]
        forget_key: bool,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Install the global `tracing` subscriber.
///
/// `MNEMOVAULT_LOG` wins if set; otherwise `--verbose` selects `debug`
/// and the default is `warn`.  Logs go to stderr so `get` output stays
/// clean for piping.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("mnemovault={level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load settings from the working directory and apply CLI overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(dir) = &cli.vault_dir {
        settings.vault_dir = dir.clone();
    }
    Ok(settings)
}

/// Full path of the vault directory.
///
/// Example: `<cwd>/.mnemovault`
pub fn vault_dir(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(load_settings(cli)?.vault_dir_path(&cwd))
}

/// Open the configured store and wrap it in a vault.
pub fn open_vault(cli: &Cli) -> Result<CredentialVault<Box<dyn KeyValueStore>>> {
    let cwd = std::env::current_dir()?;
    let settings = load_settings(cli)?;
    let layout = settings.layout()?;
    let store = settings.open_store(&cwd)?;
    Ok(CredentialVault::new(store).with_layout(layout))
}
