//! `mnemovault audit` — display the audit log.
//!
//! Usage:
//!   mnemovault audit               # show last 50 entries
//!   mnemovault audit --last 20     # show last 20
//!   mnemovault audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::AuditEntry;
use crate::cli::output;
use crate::cli::{vault_dir, Cli};
use crate::errors::{MnemoVaultError, Result};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let dir = vault_dir(cli)?;
    if !dir.exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let since_dt = since.map(parse_duration).transpose()?;
    let entries = crate::audit::recent_entries(&dir, last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    let invalid = || {
        MnemoVaultError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let num: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;

    let duration = match unit {
        'd' => chrono::Duration::try_days(num),
        'h' => chrono::Duration::try_hours(num),
        'm' => chrono::Duration::try_minutes(num),
        _ => return Err(invalid()),
    }
    .ok_or_else(invalid)?;

    Utc::now().checked_sub_signed(duration).ok_or_else(invalid)
}

/// Print audit entries in a formatted table.
fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Slot", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.slot.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    match op {
        "set" => style(op).green().to_string(),
        "get" => style(op).blue().to_string(),
        "heal" => style(op).yellow().to_string(),
        "clear" | "forget" => style(op).red().to_string(),
        _ => op.to_string(),
    }
}
