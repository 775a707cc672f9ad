//! `mnemovault set` — validate an API key and store it encrypted.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{MnemoVaultError, Result};
use crate::vault::validate::{run_all, BlankCheck, KeyValidator, Validation};

/// Execute the `set` command.
pub fn execute(cli: &Cli, value: Option<&str>, check: bool) -> Result<()> {
    let secret = read_secret(value)?;

    // The vault stores anything; screening input is our job.
    let blank = BlankCheck;
    let mut validators: Vec<&dyn KeyValidator> = Vec::new();
    validators.push(&blank);

    #[cfg(feature = "remote-check")]
    let remote = crate::vault::validate::RemoteCheck::default();
    #[cfg(feature = "remote-check")]
    if check {
        output::info("Testing API key against the service...");
        validators.push(&remote);
    }

    #[cfg(not(feature = "remote-check"))]
    if check {
        return Err(MnemoVaultError::CommandFailed(
            "--check requires building with --features remote-check".into(),
        ));
    }

    match run_all(&validators, &secret)? {
        Validation::Accepted => {}
        Validation::Rejected(_) if secret.trim().is_empty() => {
            return Err(MnemoVaultError::EmptySecret);
        }
        Validation::Rejected(reason) => return Err(MnemoVaultError::ValidationFailed(reason)),
    }

    let mut vault = open_vault(cli)?;
    let replaced = vault.status()?.has_record();
    vault.save_secret(&secret)?;

    let detail = if replaced { "replaced" } else { "saved" };
    crate::audit::log_audit(
        cli,
        "set",
        Some(vault.layout().ciphertext_id.as_str()),
        Some(detail),
    );

    if replaced {
        output::success("API key replaced and stored encrypted.");
    } else {
        output::success("API key stored encrypted.");
    }
    output::tip("Run `mnemovault status` to see what is stored.");

    Ok(())
}

/// Get the secret from one of three sources: the argument, piped stdin,
/// or a hidden prompt.
fn read_secret(value: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("API key provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(trim_piped(&buf).to_string()));
    }

    let entered = dialoguer::Password::new()
        .with_prompt("Paste your API key")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| MnemoVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(entered))
}

/// Strip the trailing newline(s) that `echo` and heredocs add.
fn trim_piped(input: &str) -> &str {
    input.trim_end_matches(['\n', '\r'])
}
