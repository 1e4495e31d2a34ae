//! What the item dialog shows, independent of how it is drawn.

use chrono::{DateTime, Utc};

use super::buffer::StagedEdit;
use crate::model::{FieldType, Item, Org, Vault};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: String,
    pub value: String,
    pub field_type: FieldType,
    pub masked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentView {
    pub id: String,
    pub name: String,
    pub size: String,
    pub content_type: String,
}

/// Which controls are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_attach: bool,
    pub show_add_field: bool,
    pub show_save_cancel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub item_id: String,
    pub vault_name: String,
    pub name: String,
    pub tags: Vec<String>,
    pub fields: Vec<FieldView>,
    pub attachments: Vec<AttachmentView>,
    /// e.g. "3 days ago"
    pub updated: String,
    /// Email of the org member who made the last update, if known.
    pub updated_by: Option<String>,
    pub readonly: bool,
    pub editing: bool,
    pub actions: Affordances,
}

impl ItemView {
    /// Build the view of `item` with the staged buffer's name, tags and fields.
    pub fn build(
        item: &Item,
        vault: &Vault,
        org: Option<&Org>,
        staged: &StagedEdit,
        editing: bool,
        readonly: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let fields = staged
            .fields()
            .iter()
            .map(|f| FieldView {
                name: f.name.clone(),
                value: f.value.clone(),
                field_type: f.field_type,
                masked: f.field_type.is_masked(),
            })
            .collect();

        let attachments = item
            .attachments
            .iter()
            .map(|a| AttachmentView {
                id: a.id.clone(),
                name: staged
                    .attachment_name(&a.id)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(&a.name)
                    .to_string(),
                size: format_size(a.size),
                content_type: a.content_type.clone(),
            })
            .collect();

        let updated_by = org
            .and_then(|o| o.member(&item.updated_by))
            .map(|m| m.email.clone());

        Self {
            item_id: item.id.clone(),
            vault_name: vault.name.clone(),
            name: staged.name().to_string(),
            tags: staged.tags().to_vec(),
            fields,
            attachments,
            updated: format_from_now(item.updated, now),
            updated_by,
            readonly,
            editing,
            actions: Affordances {
                can_edit: !readonly && !editing,
                can_delete: !readonly && !editing,
                can_attach: !readonly && !editing,
                show_add_field: editing,
                show_save_cancel: editing,
            },
        }
    }
}

/// Human-readable distance between `then` and `now`.
pub fn format_from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    let (amount, unit) = match secs {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 2_592_000 => (s / 86_400, "day"),
        s if s < 31_536_000 => (s / 2_592_000, "month"),
        s => (s / 31_536_000, "year"),
    };

    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}

/// Format a byte count with decimal units ("5 MB", "1.5 kB").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "GB"), (1_000_000, "MB"), (1_000, "kB")];

    for (scale, unit) in UNITS {
        if bytes >= scale {
            let value = format!("{:.1}", bytes as f64 / scale as f64);
            let value = value.strip_suffix(".0").unwrap_or(&value);
            return format!("{value} {unit}");
        }
    }
    format!("{bytes} B")
}
