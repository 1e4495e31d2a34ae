//! Model module — the records the editor works on.
//!
//! This module provides:
//! - `Item`, `Field`, `FieldType`, `AttachmentInfo` and `ItemUpdate` (`item`)
//! - `Vault`, `Org` and `Account` (`vault`)

pub mod item;
pub mod vault;

use rand::RngCore;

pub use item::{AttachmentInfo, Field, FieldType, Item, ItemUpdate};
pub use vault::{Account, Org, OrgMember, OrgRef, Vault, VaultMember};

/// Identifies an item together with the vault that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLocator {
    pub vault: String,
    pub item: String,
}

impl ItemLocator {
    pub fn new(vault: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            vault: vault.into(),
            item: item.into(),
        }
    }
}

/// Generate a random v4 UUID string.
pub fn new_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
