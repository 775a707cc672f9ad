//! `mnemovault get` — decrypt and print the stored API key.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{MnemoVaultError, Result};
use crate::vault::Lookup;

/// Execute the `get` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut vault = open_vault(cli)?;
    let slot = vault.layout().ciphertext_id.clone();

    match vault.lookup()? {
        Lookup::Found(secret) => {
            crate::audit::log_audit(cli, "get", Some(&slot), Some("found"));
            // The only thing written to stdout, so it can be piped.
            println!("{}", secret.as_str());
            Ok(())
        }
        Lookup::Empty => Err(MnemoVaultError::NoSecretStored),
        Lookup::Discarded(reason) => {
            let detail = reason.to_string();
            crate::audit::log_audit(cli, "heal", Some(&slot), Some(&detail));
            output::warning("The stored API key could not be read and has been removed.");
            Err(MnemoVaultError::NoSecretStored)
        }
    }
}
