//! `mnemovault status` — show what is stored, without decrypting.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, Cli};
use crate::config::Backend;
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = load_settings(cli)?;
    let vault = open_vault(cli)?;
    let status = vault.status()?;

    let (backend, location) = match settings.backend {
        Backend::File => (
            "file",
            settings.store_path(&cwd).display().to_string(),
        ),
        Backend::Keyring => ("keyring", format!("service '{}'", settings.keyring_service)),
    };

    output::print_status_table(&status, backend, &location);

    if !status.has_record() {
        output::tip("Run `mnemovault set` to store your API key.");
    }

    Ok(())
}
