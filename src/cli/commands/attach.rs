//! `itemvault attach` — upload a file as an attachment of an item.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use super::terminal_editor;
use crate::audit::ItemEvent;
use crate::cli::output;
use crate::cli::{log_audit, open_app, resolve_item, Cli};
use crate::editor::{format_size, AttachOutcome};
use crate::errors::{ItemVaultError, Result};
use crate::router::SessionRouter;

/// Execute the `attach` command.
pub fn execute(cli: &Cli, id: &str, file: &Path) -> Result<()> {
    let (settings, path, mut app) = open_app(cli)?;
    let item_id = resolve_item(&app, id)?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let router = Rc::new(RefCell::new(SessionRouter::new()));
    let (outcome, vault, item_name) = {
        let mut editor = terminal_editor(&mut app, &settings, &router);
        editor.show(&item_id)?;
        let view = editor.render().ok_or(ItemVaultError::Locked)?;
        (editor.attach_path(file)?, view.vault_name, view.name)
    };

    match outcome {
        AttachOutcome::Uploaded(info) => {
            app.save(&path)?;
            log_audit(
                &path,
                ItemEvent::Attached,
                &vault,
                (&item_id, &item_name),
                Some(&info.name),
            );
            output::success(&format!(
                "Attached '{}' ({})",
                info.name,
                format_size(info.size)
            ));
            Ok(())
        }
        AttachOutcome::Skipped => Err(ItemVaultError::PermissionDenied(vault)),
        AttachOutcome::Rejected => Err(ItemVaultError::AttachmentTooLarge {
            name: file_name,
            size: fs::metadata(file)?.len(),
            limit: settings.max_attachment_size,
        }),
        AttachOutcome::Failed => Err(ItemVaultError::UploadFailed(file_name)),
    }
}
