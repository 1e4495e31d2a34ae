//! Item history: what happened to which item, when, and in which vault.
//!
//! Events are kept in a SQLite database next to the data file (feature
//! `audit-log`). [`ItemEvent`] is always available so commands can
//! report what they did whether or not the store is compiled in.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "audit-log")]
mod store;

#[cfg(feature = "audit-log")]
pub use store::{AuditLog, HistoryEntry, HistoryFilter};

/// Something that happened to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEvent {
    Saved,
    Deleted,
    Moved,
    Attached,
    AttachmentDeleted,
}

impl ItemEvent {
    pub const ALL: [ItemEvent; 5] = [
        ItemEvent::Saved,
        ItemEvent::Deleted,
        ItemEvent::Moved,
        ItemEvent::Attached,
        ItemEvent::AttachmentDeleted,
    ];

    /// Name stored in the database and shown in the history table.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemEvent::Saved => "save",
            ItemEvent::Deleted => "delete",
            ItemEvent::Moved => "move",
            ItemEvent::Attached => "attach",
            ItemEvent::AttachmentDeleted => "delete-attachment",
        }
    }
}

impl fmt::Display for ItemEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown item event '{0}'")]
pub struct UnknownEvent(pub String);

impl FromStr for ItemEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}
