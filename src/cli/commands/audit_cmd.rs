//! `itemvault audit` — display item history.
//!
//! Usage:
//!   itemvault audit                 # show last 50 entries
//!   itemvault audit --last 20       # show last 20
//!   itemvault audit --since 7d      # entries from last 7 days
//!   itemvault audit --item Bank     # one item's history, deleted or not

use chrono::{DateTime, Duration, Utc};

use crate::cli::Cli;
use crate::errors::{ItemVaultError, Result};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>, item: Option<&str>) -> Result<()> {
    use crate::audit::{AuditLog, HistoryFilter};
    use crate::cli::{audit_dir, data_path, load_settings, output};

    let settings = load_settings()?;
    let dir = audit_dir(&data_path(cli, &settings)?);

    let audit = AuditLog::open(&dir)
        .ok_or_else(|| ItemVaultError::AuditError("failed to open audit database".into()))?;

    let filter = HistoryFilter {
        limit: last,
        since: since.map(parse_duration).transpose()?,
        item: item.map(str::to_string),
    };
    let entries = audit.query(&filter)?;

    if entries.is_empty() {
        match item {
            Some(item) => output::info(&format!("No history found for '{item}'.")),
            None => output::info("No audit entries found."),
        }
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, _last: usize, since: Option<&str>, _item: Option<&str>) -> Result<()> {
    since.map(parse_duration).transpose()?;
    Err(ItemVaultError::AuditError(
        "this build has no audit log (feature `audit-log` disabled)".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m"
/// into the point in time that long ago.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = |why: &str| {
        ItemVaultError::CommandFailed(format!(
            "invalid duration '{input}': {why} (use a format like 7d, 24h or 30m)"
        ))
    };

    let Some((split, _)) = input.char_indices().last() else {
        return Err(invalid("empty"));
    };
    let (num_str, unit) = input.split_at(split);
    let num: i64 = num_str
        .parse()
        .map_err(|_| invalid("number part is not valid"))?;

    let duration = match unit {
        "d" => Duration::days(num),
        "h" => Duration::hours(num),
        "m" => Duration::minutes(num),
        _ => return Err(invalid("unknown unit")),
    };

    Ok(Utc::now() - duration)
}

/// Print history entries in a formatted table.
#[cfg(feature = "audit-log")]
pub fn print_audit_table(entries: &[crate::audit::HistoryEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Event", "Vault", "Item", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_event(entry.event),
            entry.vault.clone(),
            format!(
                "{} ({})",
                entry.item_name,
                crate::cli::output::short_id(&entry.item_id)
            ),
            entry.detail.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

#[cfg(feature = "audit-log")]
fn colorize_event(event: crate::audit::ItemEvent) -> String {
    use crate::audit::ItemEvent;
    use console::style;

    let name = event.as_str();
    match event {
        ItemEvent::Saved => style(name).blue().to_string(),
        ItemEvent::Deleted | ItemEvent::AttachmentDeleted => style(name).red().to_string(),
        ItemEvent::Moved => style(name).yellow().to_string(),
        ItemEvent::Attached => style(name).green().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_days() {
        let dt = parse_duration("7d").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_days() - 7).abs() <= 1);
    }

    #[test]
    fn parse_duration_hours() {
        let dt = parse_duration("24h").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_hours() - 24).abs() <= 1);
    }

    #[test]
    fn parse_duration_minutes() {
        let dt = parse_duration("30m").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("7x").is_err());
        assert!(parse_duration("d").is_err());
        assert!(parse_duration("").is_err());
    }

    #[cfg(feature = "audit-log")]
    #[test]
    fn colorize_event_keeps_event_name() {
        use crate::audit::ItemEvent;

        for event in ItemEvent::ALL {
            assert!(colorize_event(event).contains(event.as_str()));
        }
    }

    #[cfg(feature = "audit-log")]
    #[test]
    fn since_duration_selects_recent_history() {
        use crate::audit::{AuditLog, HistoryFilter, ItemEvent};

        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();
        audit.record(ItemEvent::Saved, "Private", "item-1", "Bank", None);

        let filter = HistoryFilter {
            since: Some(parse_duration("1h").unwrap()),
            item: Some("bank".into()),
            ..HistoryFilter::default()
        };
        assert_eq!(audit.query(&filter).unwrap().len(), 1);
    }
}
