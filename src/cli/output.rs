//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::VaultStatus;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Describe the stored record in a few words.
pub fn record_state(status: &VaultStatus) -> &'static str {
    match (status.has_ciphertext, status.has_nonce) {
        (true, true) => "stored",
        (false, false) => "not stored",
        _ => "incomplete",
    }
}

/// Print the vault status as a two-column table.
pub fn print_status_table(status: &VaultStatus, backend: &str, location: &str) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Item", "State"]);

    let key = match &status.key_fingerprint {
        Some(fp) => format!("present ({fp})"),
        None => "not created yet".to_string(),
    };

    table.add_row(vec!["Encryption key".to_string(), key]);
    table.add_row(vec![
        "API key".to_string(),
        record_state(status).to_string(),
    ]);
    table.add_row(vec!["Backend".to_string(), backend.to_string()]);
    table.add_row(vec!["Location".to_string(), location.to_string()]);

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(ct: bool, nonce: bool) -> VaultStatus {
        VaultStatus {
            key_fingerprint: None,
            has_ciphertext: ct,
            has_nonce: nonce,
        }
    }

    #[test]
    fn record_state_labels() {
        assert_eq!(record_state(&status(true, true)), "stored");
        assert_eq!(record_state(&status(false, false)), "not stored");
        assert_eq!(record_state(&status(true, false)), "incomplete");
    }
}
