//! Attaching files to the shown item and removing attachments.
//!
//! Unlike name, fields and tags, attachments are not staged: they go to
//! the store straight away.

use std::fs;
use std::path::Path;

use super::view::format_size;
use super::ItemEditor;
use crate::app::{AppState, AttachmentFile};
use crate::dialog::{AlertStyle, ConfirmRequest, ConfirmStyle, CONFIRM_DIALOG};
use crate::errors::{ItemVaultError, Result};
use crate::model::AttachmentInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachOutcome {
    /// No write access; nothing happened.
    Skipped,
    /// Over the size limit; nothing happened.
    Rejected,
    /// The upload failed and the attachment was removed again.
    Failed,
    Uploaded(AttachmentInfo),
}

impl<A: AppState> ItemEditor<'_, A> {
    /// Add `file` to the shown item.
    ///
    /// The attachment appears in the item immediately and is taken out
    /// again if the upload fails.
    pub fn attach_file(&mut self, file: AttachmentFile) -> Result<AttachOutcome> {
        if !self.can_write() {
            return Ok(AttachOutcome::Skipped);
        }
        let loc = self.locator()?;

        if file.size() > self.settings.max_attachment_size {
            return self.reject_too_large();
        }

        let info = self.app.create_attachment(&loc.vault, &file)?;
        if let Some(attachments) = self.app.item_attachments_mut(&loc.item) {
            attachments.push(info.clone());
        }
        self.stale = true;

        let err = match self.app.upload_attachment(&info, &file) {
            Ok(()) => return Ok(AttachOutcome::Uploaded(info)),
            Err(e) => e,
        };

        if let Some(attachments) = self.app.item_attachments_mut(&loc.item) {
            attachments.retain(|a| a.id != info.id);
        }
        self.app.delete_attachment(&loc.vault, &info)?;

        let message = match &err {
            ItemVaultError::StorageQuotaExceeded(_) => "You have exceeded the storage limit for this vault!",
            ItemVaultError::UploadFailed(_) => "Upload failed! Please try again!",
            _ => return Err(err),
        };
        self.host.alert.alert(message, AlertStyle::Warning)?;
        Ok(AttachOutcome::Failed)
    }

    /// Attach the file at `path`.
    ///
    /// The size limit is checked against the file's metadata, so files
    /// over the limit are never read.
    pub fn attach_path(&mut self, path: &Path) -> Result<AttachOutcome> {
        if !self.can_write() {
            return Ok(AttachOutcome::Skipped);
        }
        if fs::metadata(path)?.len() > self.settings.max_attachment_size {
            return self.reject_too_large();
        }
        self.attach_file(AttachmentFile::from_path(path)?)
    }

    fn reject_too_large(&mut self) -> Result<AttachOutcome> {
        self.host.alert.alert(
            &format!(
                "The selected file is too large! Only files of up to {} are supported.",
                format_size(self.settings.max_attachment_size)
            ),
            AlertStyle::Warning,
        )?;
        Ok(AttachOutcome::Rejected)
    }

    /// Remove an attachment after a warning confirmation.
    ///
    /// Returns whether it was deleted. Does nothing without write access.
    pub fn delete_attachment(&mut self, attachment_id: &str) -> Result<bool> {
        if !self.can_write() {
            return Ok(false);
        }
        let loc = self.locator()?;
        let info = self
            .current()
            .and_then(|(item, _)| item.attachment(attachment_id).cloned())
            .ok_or_else(|| ItemVaultError::AttachmentNotFound(attachment_id.to_string()))?;

        let request = ConfirmRequest::new(format!(
            "Are you sure you want to delete '{}'?",
            info.name
        ))
        .labels("Delete", "Cancel")
        .title("Delete Attachment")
        .style(ConfirmStyle::Warning);

        let confirm = &mut self.host.confirm;
        let confirmed = self
            .dialogs
            .run_child(CONFIRM_DIALOG, |_| confirm.confirm(&request))?;
        if !confirmed {
            return Ok(false);
        }

        self.app.delete_attachment(&info.vault, &info)?;
        if let Some(attachments) = self.app.item_attachments_mut(&loc.item) {
            attachments.retain(|a| a.id != info.id);
        }
        self.staged.forget_attachment(&info.id);
        self.stale = true;
        Ok(true)
    }
}
