//! App module — the application state the editor delegates to.
//!
//! This module provides:
//! - The `AppState` trait: item lookup, permission checks, atomic item
//!   updates, deletion, moves and the attachment lifecycle
//! - Change notifications (`events`)
//! - `MemoryApp`, an in-memory implementation backed by a JSON snapshot (`memory`)

pub mod events;
pub mod memory;

use std::path::Path;

use crate::errors::{ItemVaultError, Result};
use crate::model::{Account, AttachmentInfo, Item, ItemLocator, ItemUpdate, Org, Vault};

pub use events::{AppEvent, EventHub, Listener, SubscriptionId};
pub use memory::{AppSnapshot, MemoryApp, VaultRecord};

/// The store that owns items and vaults.
///
/// Everything the editor shows is looked up here by id on every render;
/// the editor never keeps an authoritative copy.
pub trait AppState {
    fn is_locked(&self) -> bool;

    /// The signed-in account.
    fn account(&self) -> &Account;

    /// Find an item and the vault that holds it.
    fn get_item(&self, id: &str) -> Option<(&Item, &Vault)>;

    fn get_org(&self, id: &str) -> Option<&Org>;

    fn has_write_permissions(&self, vault: &Vault) -> bool;

    /// All vaults the account can see.
    fn vaults(&self) -> Vec<&Vault>;

    /// Replace name, fields and tags of an item in one step.
    fn update_item(&mut self, vault_id: &str, item_id: &str, update: ItemUpdate) -> Result<()>;

    fn delete_items(&mut self, items: &[ItemLocator]) -> Result<()>;

    /// Move items into another vault. Moved items receive new ids.
    fn move_items(&mut self, items: &[ItemLocator], target_vault: &str) -> Result<Vec<Item>>;

    /// Mutable access to an item's attachment metadata.
    fn item_attachments_mut(&mut self, item_id: &str) -> Option<&mut Vec<AttachmentInfo>>;

    /// Register a new attachment and return its metadata.
    fn create_attachment(&mut self, vault_id: &str, file: &AttachmentFile)
        -> Result<AttachmentInfo>;

    /// Transfer the bytes of an attachment created with `create_attachment`.
    fn upload_attachment(&mut self, info: &AttachmentInfo, file: &AttachmentFile) -> Result<()>;

    fn delete_attachment(&mut self, vault_id: &str, info: &AttachmentInfo) -> Result<()>;

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AttachmentFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ItemVaultError::CommandFailed(format!("invalid file name: {}", path.display()))
            })?
            .to_string();
        let content_type = guess_content_type(&name).to_string();
        Ok(Self {
            name,
            content_type,
            data,
        })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

fn guess_content_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
