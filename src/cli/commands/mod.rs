//! Command implementations, one module per subcommand.

pub mod attach;
pub mod audit_cmd;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod generate;
pub mod list;
pub mod show;

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::MemoryApp;
use crate::config::Settings;
use crate::editor::{EditorHost, ItemEditor};
use crate::router::SessionRouter;

/// An editor over `app` with terminal dialogs, reporting navigation to `router`.
pub fn terminal_editor<'a>(
    app: &'a mut MemoryApp,
    settings: &Settings,
    router: &Rc<RefCell<SessionRouter>>,
) -> ItemEditor<'a, MemoryApp> {
    let host = EditorHost::terminal(settings.generator_length, Box::new(Rc::clone(router)));
    ItemEditor::new(app, host, settings.editor())
}
