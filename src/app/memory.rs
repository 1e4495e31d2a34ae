//! In-memory application state.
//!
//! `MemoryApp` keeps vaults, items and organizations in memory and can
//! be loaded from / written to a JSON snapshot.  Attachment bytes are
//! not kept; only their metadata and sizes (for quota accounting).

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::events::{AppEvent, EventHub, Listener, SubscriptionId};
use super::{AppState, AttachmentFile};
use crate::errors::{ItemVaultError, Result};
use crate::model::{
    new_id, Account, AttachmentInfo, Item, ItemLocator, ItemUpdate, Org, Vault,
};

/// A vault together with its items, as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultRecord {
    #[serde(flatten)]
    pub vault: Vault,

    #[serde(default)]
    pub items: Vec<Item>,

    /// Maximum total attachment size in bytes (no limit if absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_quota: Option<u64>,
}

impl VaultRecord {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            items: Vec::new(),
            storage_quota: None,
        }
    }
}

/// Serializable state of a `MemoryApp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub account: Account,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub orgs: Vec<Org>,

    #[serde(default)]
    pub vaults: Vec<VaultRecord>,
}

/// Application state held entirely in memory.
#[derive(Debug)]
pub struct MemoryApp {
    account: Account,
    locked: bool,
    orgs: Vec<Org>,
    vaults: Vec<VaultRecord>,

    /// Attachments created but not yet uploaded.
    pending_uploads: HashSet<String>,

    /// When set, the next upload fails with this reason.
    upload_failure: Option<String>,

    events: EventHub,
}

impl MemoryApp {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an empty, unlocked state for `account`.
    pub fn new(account: Account) -> Self {
        Self::from_snapshot(AppSnapshot {
            account,
            locked: false,
            orgs: Vec::new(),
            vaults: Vec::new(),
        })
    }

    pub fn from_snapshot(snapshot: AppSnapshot) -> Self {
        Self {
            account: snapshot.account,
            locked: snapshot.locked,
            orgs: snapshot.orgs,
            vaults: snapshot.vaults,
            pending_uploads: HashSet::new(),
            upload_failure: None,
            events: EventHub::new(),
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            account: self.account.clone(),
            locked: self.locked,
            orgs: self.orgs.clone(),
            vaults: self.vaults.clone(),
        }
    }

    /// Load state from a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ItemVaultError::DataFileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let snapshot: AppSnapshot = serde_json::from_str(&contents).map_err(|e| {
            ItemVaultError::SerializationError(format!("failed to parse {}: {e}", path.display()))
        })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write state to a JSON snapshot file (owner-only permissions on Unix).
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| ItemVaultError::SerializationError(e.to_string()))?;
        fs::write(path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Setup helpers
    // ------------------------------------------------------------------

    pub fn add_vault(&mut self, vault: Vault) {
        self.vaults.push(VaultRecord::new(vault));
    }

    pub fn add_org(&mut self, org: Org) {
        self.orgs.push(org);
    }

    pub fn set_storage_quota(&mut self, vault_id: &str, quota: Option<u64>) -> Result<()> {
        self.record_mut(vault_id)?.storage_quota = quota;
        Ok(())
    }

    /// Add an item to a vault without permission checks.
    pub fn insert_item(&mut self, vault_id: &str, item: Item) -> Result<()> {
        let item_id = item.id.clone();
        self.record_mut(vault_id)?.items.push(item);
        self.events.emit(&AppEvent::ItemChanged { item_id });
        self.events.emit(&AppEvent::VaultChanged {
            vault_id: vault_id.to_string(),
        });
        Ok(())
    }

    /// Overwrite an item wherever it is stored, as a background sync would.
    pub fn replace_item(&mut self, item: Item) -> Result<()> {
        let item_id = item.id.clone();
        let slot = self
            .vaults
            .iter_mut()
            .flat_map(|r| r.items.iter_mut())
            .find(|i| i.id == item_id)
            .ok_or_else(|| ItemVaultError::ItemNotFound(item_id.clone()))?;
        *slot = item;
        self.events.emit(&AppEvent::ItemChanged { item_id });
        Ok(())
    }

    pub fn lock(&mut self) {
        self.locked = true;
        self.events.emit(&AppEvent::Lock);
    }

    pub fn unlock(&mut self) {
        self.locked = false;
        self.events.emit(&AppEvent::Unlock);
    }

    /// Make the next upload fail with `reason`, simulating a transport error.
    pub fn fail_next_upload(&mut self, reason: impl Into<String>) {
        self.upload_failure = Some(reason.into());
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Every item with its vault, in storage order.
    pub fn items(&self) -> Vec<(&Item, &Vault)> {
        self.vaults
            .iter()
            .flat_map(|r| r.items.iter().map(move |i| (i, &r.vault)))
            .collect()
    }

    pub fn vault(&self, id: &str) -> Option<&Vault> {
        self.vaults.iter().map(|r| &r.vault).find(|v| v.id == id)
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    pub fn is_pending_upload(&self, attachment_id: &str) -> bool {
        self.pending_uploads.contains(attachment_id)
    }

    /// Bytes used by completed uploads in a vault.
    pub fn storage_used(&self, vault_id: &str) -> u64 {
        self.vaults
            .iter()
            .filter(|r| r.vault.id == vault_id)
            .flat_map(|r| r.items.iter())
            .flat_map(|i| i.attachments.iter())
            .filter(|a| !self.pending_uploads.contains(&a.id))
            .map(|a| a.size)
            .sum()
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn record(&self, vault_id: &str) -> Result<&VaultRecord> {
        self.vaults
            .iter()
            .find(|r| r.vault.id == vault_id)
            .ok_or_else(|| ItemVaultError::VaultNotFound(vault_id.to_string()))
    }

    fn record_mut(&mut self, vault_id: &str) -> Result<&mut VaultRecord> {
        self.vaults
            .iter_mut()
            .find(|r| r.vault.id == vault_id)
            .ok_or_else(|| ItemVaultError::VaultNotFound(vault_id.to_string()))
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            return Err(ItemVaultError::Locked);
        }
        Ok(())
    }

    fn ensure_writable(&self, vault_id: &str) -> Result<()> {
        let record = self.record(vault_id)?;
        if !self.has_write_permissions(&record.vault) {
            return Err(ItemVaultError::PermissionDenied(record.vault.name.clone()));
        }
        Ok(())
    }

    fn item_holding_attachment(&self, attachment_id: &str) -> Option<String> {
        self.vaults
            .iter()
            .flat_map(|r| r.items.iter())
            .find(|i| i.attachment(attachment_id).is_some())
            .map(|i| i.id.clone())
    }
}

impl AppState for MemoryApp {
    fn is_locked(&self) -> bool {
        self.locked
    }

    fn account(&self) -> &Account {
        &self.account
    }

    fn get_item(&self, id: &str) -> Option<(&Item, &Vault)> {
        self.vaults.iter().find_map(|r| {
            r.items
                .iter()
                .find(|i| i.id == id)
                .map(|item| (item, &r.vault))
        })
    }

    fn get_org(&self, id: &str) -> Option<&Org> {
        self.orgs.iter().find(|o| o.id == id)
    }

    fn has_write_permissions(&self, vault: &Vault) -> bool {
        vault.allows_write(&self.account.id)
    }

    fn vaults(&self) -> Vec<&Vault> {
        self.vaults.iter().map(|r| &r.vault).collect()
    }

    fn update_item(&mut self, vault_id: &str, item_id: &str, update: ItemUpdate) -> Result<()> {
        self.ensure_unlocked()?;
        self.ensure_writable(vault_id)?;

        let account_id = self.account.id.clone();
        let record = self.record_mut(vault_id)?;
        let item = record
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| ItemVaultError::ItemNotFound(item_id.to_string()))?;

        item.name = update.name;
        item.fields = update.fields;
        item.tags = update.tags;
        item.updated = Utc::now();
        item.updated_by = account_id;

        self.events.emit(&AppEvent::ItemChanged {
            item_id: item_id.to_string(),
        });
        self.events.emit(&AppEvent::VaultChanged {
            vault_id: vault_id.to_string(),
        });
        Ok(())
    }

    fn delete_items(&mut self, items: &[ItemLocator]) -> Result<()> {
        self.ensure_unlocked()?;

        // Validate everything before removing anything.
        for loc in items {
            self.ensure_writable(&loc.vault)?;
            if !self.record(&loc.vault)?.items.iter().any(|i| i.id == loc.item) {
                return Err(ItemVaultError::ItemNotFound(loc.item.clone()));
            }
        }

        for loc in items {
            self.record_mut(&loc.vault)?.items.retain(|i| i.id != loc.item);
            self.events.emit(&AppEvent::ItemChanged {
                item_id: loc.item.clone(),
            });
            self.events.emit(&AppEvent::VaultChanged {
                vault_id: loc.vault.clone(),
            });
        }
        Ok(())
    }

    fn move_items(&mut self, items: &[ItemLocator], target_vault: &str) -> Result<Vec<Item>> {
        self.ensure_unlocked()?;
        self.ensure_writable(target_vault)?;
        for loc in items {
            self.ensure_writable(&loc.vault)?;
            if !self.record(&loc.vault)?.items.iter().any(|i| i.id == loc.item) {
                return Err(ItemVaultError::ItemNotFound(loc.item.clone()));
            }
        }

        let account_id = self.account.id.clone();
        let mut moved = Vec::with_capacity(items.len());

        for loc in items {
            let source = self.record_mut(&loc.vault)?;
            let pos = source
                .items
                .iter()
                .position(|i| i.id == loc.item)
                .ok_or_else(|| ItemVaultError::ItemNotFound(loc.item.clone()))?;

            if loc.vault == target_vault {
                moved.push(source.items[pos].clone());
                continue;
            }

            let mut item = source.items.remove(pos);
            item.id = new_id();
            item.updated = Utc::now();
            item.updated_by = account_id.clone();
            for att in &mut item.attachments {
                att.vault = target_vault.to_string();
            }

            self.record_mut(target_vault)?.items.push(item.clone());

            self.events.emit(&AppEvent::ItemChanged {
                item_id: loc.item.clone(),
            });
            self.events.emit(&AppEvent::ItemChanged {
                item_id: item.id.clone(),
            });
            self.events.emit(&AppEvent::VaultChanged {
                vault_id: loc.vault.clone(),
            });
            moved.push(item);
        }

        self.events.emit(&AppEvent::VaultChanged {
            vault_id: target_vault.to_string(),
        });
        Ok(moved)
    }

    fn item_attachments_mut(&mut self, item_id: &str) -> Option<&mut Vec<AttachmentInfo>> {
        self.vaults
            .iter_mut()
            .flat_map(|r| r.items.iter_mut())
            .find(|i| i.id == item_id)
            .map(|i| &mut i.attachments)
    }

    fn create_attachment(
        &mut self,
        vault_id: &str,
        file: &AttachmentFile,
    ) -> Result<AttachmentInfo> {
        self.ensure_unlocked()?;
        self.ensure_writable(vault_id)?;

        let info = AttachmentInfo {
            id: new_id(),
            vault: vault_id.to_string(),
            name: file.name.clone(),
            size: file.size(),
            content_type: file.content_type.clone(),
        };
        self.pending_uploads.insert(info.id.clone());
        Ok(info)
    }

    fn upload_attachment(&mut self, info: &AttachmentInfo, file: &AttachmentFile) -> Result<()> {
        self.ensure_unlocked()?;
        if !self.pending_uploads.contains(&info.id) {
            return Err(ItemVaultError::AttachmentNotFound(info.id.clone()));
        }
        if let Some(reason) = self.upload_failure.take() {
            return Err(ItemVaultError::UploadFailed(reason));
        }

        let record = self.record(&info.vault)?;
        if let Some(quota) = record.storage_quota {
            if self.storage_used(&info.vault) + file.size() > quota {
                return Err(ItemVaultError::StorageQuotaExceeded(
                    record.vault.name.clone(),
                ));
            }
        }

        self.pending_uploads.remove(&info.id);
        if let Some(item_id) = self.item_holding_attachment(&info.id) {
            self.events.emit(&AppEvent::ItemChanged { item_id });
        }
        Ok(())
    }

    fn delete_attachment(&mut self, vault_id: &str, info: &AttachmentInfo) -> Result<()> {
        self.ensure_unlocked()?;
        self.ensure_writable(vault_id)?;
        self.pending_uploads.remove(&info.id);

        let record = self.record_mut(vault_id)?;
        let mut touched = Vec::new();
        for item in &mut record.items {
            let before = item.attachments.len();
            item.attachments.retain(|a| a.id != info.id);
            if item.attachments.len() != before {
                touched.push(item.id.clone());
            }
        }
        for item_id in touched {
            self.events.emit(&AppEvent::ItemChanged { item_id });
        }
        Ok(())
    }

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.events.unsubscribe(id);
    }
}
