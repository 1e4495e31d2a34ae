//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::app::{AppState, MemoryApp};
use crate::audit::ItemEvent;
use crate::config::Settings;
use crate::errors::{ItemVaultError, Result};

/// ItemVault CLI: view and edit password-manager items.
#[derive(Parser)]
#[command(
    name = "itemvault",
    about = "View and edit vault items: typed fields, tags and attachments",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data file (default: itemvault.json, or `data_file` in .itemvault.toml)
    #[arg(long, global = true, env = "ITEMVAULT_DATA")]
    pub data: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// List all items
    List,

    /// Show an item
    Show {
        /// Item id, unique id prefix, or name
        id: String,
        /// Print masked values (passwords, PINs, ...) in clear text
        #[arg(long)]
        reveal: bool,
    },

    /// Open an item in the interactive editor
    Edit {
        /// Item id, unique id prefix, or name
        id: String,
    },

    /// Delete an item
    Delete {
        /// Item id, unique id prefix, or name
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Attach a file to an item
    Attach {
        /// Item id, unique id prefix, or name
        id: String,
        /// Path to the file
        file: PathBuf,
    },

    /// Generate a random password
    Generate {
        /// Password length (default: generator_length from config)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// View the audit log of item operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
        /// Only show the history of one item (id, id prefix, or name)
        #[arg(long)]
        item: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.itemvault.toml` from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the data file: `--data` wins over the config file.
pub fn data_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.data {
        Some(path) => cwd.join(path),
        None => settings.data_path(&cwd),
    })
}

/// Load settings and application state in one go.
pub fn open_app(cli: &Cli) -> Result<(Settings, PathBuf, MemoryApp)> {
    let settings = load_settings()?;
    let path = data_path(cli, &settings)?;
    let app = MemoryApp::load(&path)?;
    Ok((settings, path, app))
}

/// Find an item by exact id, unique id prefix, or unique name
/// (case-insensitive), in that order.
pub fn resolve_item(app: &MemoryApp, query: &str) -> Result<String> {
    if app.get_item(query).is_some() {
        return Ok(query.to_string());
    }

    let items = app.items();
    let pick = |matches: Vec<&str>| -> Result<Option<String>> {
        match matches.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(id.to_string())),
            _ => Err(ItemVaultError::CommandFailed(format!(
                "'{query}' matches {} items, be more specific",
                matches.len()
            ))),
        }
    };

    let by_prefix: Vec<&str> = items
        .iter()
        .filter(|(item, _)| item.id.starts_with(query))
        .map(|(item, _)| item.id.as_str())
        .collect();
    if let Some(id) = pick(by_prefix)? {
        return Ok(id);
    }

    let by_name: Vec<&str> = items
        .iter()
        .filter(|(item, _)| item.name.eq_ignore_ascii_case(query))
        .map(|(item, _)| item.id.as_str())
        .collect();
    pick(by_name)?.ok_or_else(|| ItemVaultError::ItemNotFound(query.to_string()))
}

/// Directory holding the audit database: next to the data file.
pub fn audit_dir(data_path: &Path) -> PathBuf {
    match data_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Record an item event in the audit log. Never fails the caller.
pub fn log_audit(
    data_path: &Path,
    event: ItemEvent,
    vault: &str,
    item: (&str, &str),
    detail: Option<&str>,
) {
    #[cfg(feature = "audit-log")]
    if let Some(audit) = crate::audit::AuditLog::open(&audit_dir(data_path)) {
        audit.record(event, vault, item.0, item.1, detail);
    }

    #[cfg(not(feature = "audit-log"))]
    let _ = (data_path, event, vault, item, detail);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Account, Item, Vault};

    fn app() -> (MemoryApp, String, String) {
        let mut app = MemoryApp::new(Account {
            id: "acc".into(),
            email: "bob@example.test".into(),
            name: "Bob".into(),
        });
        app.add_vault(Vault {
            id: "v1".into(),
            name: "Private".into(),
            org: None,
            members: Vec::new(),
        });
        let mut bank = Item::new("Bank", "acc");
        bank.id = "abc123".into();
        let mut mail = Item::new("Mail", "acc");
        mail.id = "abd456".into();
        app.insert_item("v1", bank).unwrap();
        app.insert_item("v1", mail).unwrap();
        (app, "abc123".into(), "abd456".into())
    }

    #[test]
    fn resolve_exact_id() {
        let (app, bank, _) = app();
        assert_eq!(resolve_item(&app, &bank).unwrap(), bank);
    }

    #[test]
    fn resolve_unique_prefix() {
        let (app, _, mail) = app();
        assert_eq!(resolve_item(&app, "abd").unwrap(), mail);
    }

    #[test]
    fn resolve_ambiguous_prefix_fails() {
        let (app, _, _) = app();
        assert!(matches!(
            resolve_item(&app, "ab"),
            Err(ItemVaultError::CommandFailed(_))
        ));
    }

    #[test]
    fn resolve_by_name_ignores_case() {
        let (app, bank, _) = app();
        assert_eq!(resolve_item(&app, "bank").unwrap(), bank);
    }

    #[test]
    fn resolve_unknown_fails() {
        let (app, _, _) = app();
        assert!(matches!(
            resolve_item(&app, "zzz"),
            Err(ItemVaultError::ItemNotFound(_))
        ));
    }

    #[test]
    fn audit_dir_is_parent_of_data_file() {
        assert_eq!(
            audit_dir(Path::new("/data/itemvault.json")),
            PathBuf::from("/data")
        );
        assert_eq!(audit_dir(Path::new("itemvault.json")), PathBuf::from("."));
    }
}
