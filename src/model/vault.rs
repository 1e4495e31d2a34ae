//! Vaults, organizations and the current account.

use serde::{Deserialize, Serialize};

/// Reference from a vault to the organization that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRef {
    pub id: String,
    pub name: String,
}

/// Access an account has to an organization vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultMember {
    pub account: String,
    #[serde(default)]
    pub write: bool,
}

/// A container of items.
///
/// A vault without an organization is the account's private vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub org: Option<OrgRef>,
    #[serde(default)]
    pub members: Vec<VaultMember>,
}

impl Vault {
    pub fn is_private(&self) -> bool {
        self.org.is_none()
    }

    /// Whether `account_id` may modify items in this vault.
    pub fn allows_write(&self, account_id: &str) -> bool {
        self.is_private()
            || self
                .members
                .iter()
                .any(|m| m.account == account_id && m.write)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMember {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Org {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<OrgMember>,
}

impl Org {
    pub fn member(&self, id: &str) -> Option<&OrgMember> {
        self.members.iter().find(|m| m.id == id)
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}
