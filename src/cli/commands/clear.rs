//! `mnemovault clear` — remove the stored API key (and optionally the key).

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{MnemoVaultError, Result};

/// Execute the `clear` command.
pub fn execute(cli: &Cli, forget_key: bool, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let prompt = if forget_key {
            "Delete the stored API key and the encryption key?"
        } else {
            "Delete the stored API key?"
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| MnemoVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let mut vault = open_vault(cli)?;
    let slot = vault.layout().ciphertext_id.clone();

    if forget_key {
        vault.forget()?;
        crate::audit::log_audit(cli, "forget", Some(&slot), Some("record and key removed"));
        output::success("Removed the API key and the encryption key.");
        return Ok(());
    }

    if vault.clear()? {
        crate::audit::log_audit(cli, "clear", Some(&slot), None);
        output::success("Removed the stored API key.");
    } else {
        output::info("No API key was stored.");
    }

    Ok(())
}
