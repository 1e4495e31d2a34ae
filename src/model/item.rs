//! Item, Field and AttachmentInfo types.
//!
//! An item is a named record made of an ordered list of typed fields,
//! a set of tags and the metadata of attachments stored elsewhere.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ItemVaultError;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Username,
    Password,
    Url,
    Email,
    Date,
    Month,
    Credit,
    Phone,
    Pin,
    Totp,
    #[default]
    Note,
    Text,
}

impl FieldType {
    /// Every field type, in the order they are offered for selection.
    pub const ALL: [FieldType; 12] = [
        FieldType::Username,
        FieldType::Password,
        FieldType::Url,
        FieldType::Email,
        FieldType::Date,
        FieldType::Month,
        FieldType::Credit,
        FieldType::Phone,
        FieldType::Pin,
        FieldType::Totp,
        FieldType::Note,
        FieldType::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Username => "username",
            FieldType::Password => "password",
            FieldType::Url => "url",
            FieldType::Email => "email",
            FieldType::Date => "date",
            FieldType::Month => "month",
            FieldType::Credit => "credit",
            FieldType::Phone => "phone",
            FieldType::Pin => "pin",
            FieldType::Totp => "totp",
            FieldType::Note => "note",
            FieldType::Text => "text",
        }
    }

    /// Whether values of this type are hidden unless explicitly revealed.
    pub fn is_masked(self) -> bool {
        matches!(
            self,
            FieldType::Password | FieldType::Pin | FieldType::Credit | FieldType::Totp
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ItemVaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| ItemVaultError::CommandFailed(format!("unknown field type '{s}'")))
    }
}

/// A single (name, value, type) entry of an item.
///
/// Names are not unique; an item may carry several fields with the
/// same name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            field_type,
        }
    }

    /// An empty field of the given type (what "Add Field" appends).
    pub fn blank(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Self::default()
        }
    }
}

/// Metadata describing an attachment whose bytes live in external storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInfo {
    pub id: String,
    /// Id of the vault the attachment is stored in.
    pub vault: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", default)]
    pub content_type: String,
}

/// A vault item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentInfo>,
    /// When the item was last updated.
    pub updated: DateTime<Utc>,
    /// Account id of whoever made the last update.
    #[serde(default)]
    pub updated_by: String,
}

impl Item {
    /// Create an empty item with a fresh id.
    pub fn new(name: impl Into<String>, updated_by: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            name: name.into(),
            fields: Vec::new(),
            tags: Vec::new(),
            attachments: Vec::new(),
            updated: Utc::now(),
            updated_by: updated_by.into(),
        }
    }

    pub fn attachment(&self, id: &str) -> Option<&AttachmentInfo> {
        self.attachments.iter().find(|a| a.id == id)
    }
}

/// The replacement payload submitted when an edited item is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: String,
    pub fields: Vec<Field>,
    pub tags: Vec<String>,
}
