//! The staged edit buffer.
//!
//! A working copy of an item's name, fields and tags (plus pending
//! attachment renames).  Nothing here reaches the store until the
//! editor saves, and then everything goes out in one update.

use std::collections::BTreeMap;

use zeroize::Zeroize;

use crate::errors::{ItemVaultError, Result};
use crate::model::{Field, FieldType, Item, ItemUpdate};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StagedEdit {
    name: String,
    fields: Vec<Field>,
    tags: Vec<String>,
    /// Attachment id -> display name entered while editing.
    attachment_names: BTreeMap<String, String>,
}

impl StagedEdit {
    /// Copy name, fields and tags out of `item`.
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            fields: item.fields.clone(),
            tags: item.tags.clone(),
            attachment_names: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether the buffer holds exactly the item's name, fields and tags.
    pub fn matches(&self, item: &Item) -> bool {
        self.name == item.name && self.fields == item.fields && self.tags == item.tags
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ── Tags ────────────────────────────────────────────────────────

    /// Add a tag. Blank tags and duplicates are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Replace all tags, keeping the first occurrence of each.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.clear();
        for tag in tags {
            self.add_tag(tag.as_ref());
        }
    }

    // ── Fields ──────────────────────────────────────────────────────

    /// Append a field and return its index.
    pub fn push_field(&mut self, field: Field) -> usize {
        self.fields.push(field);
        self.fields.len() - 1
    }

    /// Remove the field at `index`. Out-of-range indexes are ignored.
    pub fn remove_field(&mut self, index: usize) -> Option<Field> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    fn field_mut(&mut self, index: usize) -> Result<&mut Field> {
        let len = self.fields.len();
        self.fields
            .get_mut(index)
            .ok_or(ItemVaultError::FieldOutOfRange { index, len })
    }

    pub fn set_field_name(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.field_mut(index)?.name = name.into();
        Ok(())
    }

    pub fn set_field_value(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let field = self.field_mut(index)?;
        field.value.zeroize();
        field.value = value.into();
        Ok(())
    }

    pub fn set_field_type(&mut self, index: usize, field_type: FieldType) -> Result<()> {
        self.field_mut(index)?.field_type = field_type;
        Ok(())
    }

    // ── Attachments ─────────────────────────────────────────────────

    /// Stage a new display name for an attachment.
    pub fn rename_attachment(&mut self, attachment_id: &str, name: impl Into<String>) {
        self.attachment_names
            .insert(attachment_id.to_string(), name.into());
    }

    pub fn attachment_name(&self, attachment_id: &str) -> Option<&str> {
        self.attachment_names.get(attachment_id).map(String::as_str)
    }

    pub fn forget_attachment(&mut self, attachment_id: &str) {
        self.attachment_names.remove(attachment_id);
    }

    /// The replacement payload for the store.
    pub fn to_update(&self) -> ItemUpdate {
        ItemUpdate {
            name: self.name.clone(),
            fields: self.fields.clone(),
            tags: self.tags.clone(),
        }
    }
}

impl Drop for StagedEdit {
    fn drop(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
        }
    }
}
