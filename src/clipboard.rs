//! Copying field values to the clipboard.

use crate::errors::{ItemVaultError, Result};
use crate::model::{Field, Item};

pub trait Clipboard {
    fn copy_field(&mut self, item: &Item, field: &Field) -> Result<()>;
}

/// The operating system clipboard.
#[derive(Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy_field(&mut self, _item: &Item, field: &Field) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ItemVaultError::ClipboardError(e.to_string()))?;
        clipboard
            .set_text(field.value.clone())
            .map_err(|e| ItemVaultError::ClipboardError(e.to_string()))
    }
}
