//! `itemvault list` — display all items in a table.

use crate::app::AppState;
use crate::cli::output;
use crate::cli::{open_app, Cli};
use crate::errors::{ItemVaultError, Result};

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_, path, app) = open_app(cli)?;
    if app.is_locked() {
        return Err(ItemVaultError::Locked);
    }

    let items = app.items();
    output::info(&format!(
        "{} — {} item(s)",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        items.len()
    ));

    output::print_items_table(&items);
    if !items.is_empty() {
        output::tip("Run `itemvault show <ID>` with an id prefix or name to open an item.");
    }

    Ok(())
}
