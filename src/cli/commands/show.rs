//! `itemvault show` — print a single item.

use std::cell::RefCell;
use std::rc::Rc;

use super::terminal_editor;
use crate::cli::output;
use crate::cli::{open_app, resolve_item, Cli};
use crate::errors::{ItemVaultError, Result};
use crate::router::SessionRouter;

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: &str, reveal: bool) -> Result<()> {
    let (settings, _, mut app) = open_app(cli)?;
    let item_id = resolve_item(&app, id)?;

    let router = Rc::new(RefCell::new(SessionRouter::new()));
    let mut editor = terminal_editor(&mut app, &settings, &router);
    editor.show(&item_id)?;

    let view = editor.render().ok_or(ItemVaultError::Locked)?;
    output::print_item_view(&view, reveal || settings.reveal_secrets);

    Ok(())
}
