//! `itemvault delete` — remove an item.

use std::cell::RefCell;
use std::rc::Rc;

use super::terminal_editor;
use crate::audit::ItemEvent;
use crate::cli::output;
use crate::cli::{log_audit, open_app, resolve_item, Cli};
use crate::dialog::AutoConfirm;
use crate::errors::{ItemVaultError, Result};
use crate::router::SessionRouter;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let (settings, path, mut app) = open_app(cli)?;
    let item_id = resolve_item(&app, id)?;

    let router = Rc::new(RefCell::new(SessionRouter::new()));
    let (deleted, name, vault) = {
        let mut editor = terminal_editor(&mut app, &settings, &router);

        // --force answers the confirmation for the user.
        if force {
            editor.host_mut().confirm = Box::new(AutoConfirm(true));
        }

        editor.show(&item_id)?;
        let view = editor.render().ok_or(ItemVaultError::Locked)?;
        if view.readonly {
            return Err(ItemVaultError::PermissionDenied(view.vault_name));
        }

        (editor.delete_item()?, view.name, view.vault_name)
    };

    if !deleted {
        output::info("Cancelled.");
        return Ok(());
    }

    app.save(&path)?;
    log_audit(&path, ItemEvent::Deleted, &vault, (&item_id, &name), None);
    output::success(&format!("Deleted item '{name}'"));

    Ok(())
}
