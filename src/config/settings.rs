use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editor::EditorSettings;
use crate::errors::{ItemVaultError, Result};
use crate::model::FieldType;

/// Project-level configuration, loaded from `.itemvault.toml`.
///
/// Every field has a default, so no config file is needed at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// JSON snapshot holding account, vaults and items.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Largest attachment accepted, in bytes (default: 5 MB).
    #[serde(default = "default_max_attachment_size")]
    pub max_attachment_size: u64,

    /// Type of the field appended by "Add Field".
    #[serde(default)]
    pub default_field_type: FieldType,

    /// Length of generated passwords.
    #[serde(default = "default_generator_length")]
    pub generator_length: usize,

    /// Show masked field values in `show` without `--reveal`.
    #[serde(default)]
    pub reveal_secrets: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_file() -> String {
    "itemvault.json".to_string()
}

fn default_max_attachment_size() -> u64 {
    5_000_000
}

fn default_generator_length() -> usize {
    20
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            max_attachment_size: default_max_attachment_size(),
            default_field_type: FieldType::default(),
            generator_length: default_generator_length(),
            reveal_secrets: false,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".itemvault.toml";

    /// Load settings from `<project_dir>/.itemvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ItemVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path of the data file, unless overridden on the command line.
    pub fn data_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_file)
    }

    /// The subset of settings the item editor uses.
    pub fn editor(&self) -> EditorSettings {
        EditorSettings {
            max_attachment_size: self.max_attachment_size,
            default_field_type: self.default_field_type,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
