use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in ItemVault.
#[derive(Debug, Error)]
pub enum ItemVaultError {
    // --- Lookup errors ---
    #[error("Item '{0}' not found")]
    ItemNotFound(String),

    #[error("Vault '{0}' not found")]
    VaultNotFound(String),

    #[error("No item is being shown")]
    NoItemShown,

    #[error("Field index {index} is out of range ({len} field(s))")]
    FieldOutOfRange { index: usize, len: usize },

    // --- Access errors ---
    #[error("No write access to vault '{0}'")]
    PermissionDenied(String),

    #[error("The application is locked")]
    Locked,

    // --- Attachment errors ---
    #[error("Attachment '{name}' is too large ({size} bytes, limit {limit} bytes)")]
    AttachmentTooLarge { name: String, size: u64, limit: u64 },

    #[error("Storage quota exceeded for vault '{0}'")]
    StorageQuotaExceeded(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Attachment '{0}' not found")]
    AttachmentNotFound(String),

    // --- Data file errors ---
    #[error("Data file not found at {0}")]
    DataFileNotFound(PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for ItemVault results.
pub type Result<T> = std::result::Result<T, ItemVaultError>;
