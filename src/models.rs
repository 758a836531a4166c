//! Targeting models shared between the persisted configuration and plugins.

use serde::{Deserialize, Serialize};

/// A targeted region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Region {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub region_type: String,
}

/// A targeted billing account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Account {
    #[serde(rename = "GUID")]
    pub guid: String,
    pub name: String,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceGroup {
    #[serde(rename = "GUID")]
    pub guid: String,
    pub name: String,
    pub state: String,
    pub default: bool,
    #[serde(rename = "QuotaID")]
    pub quota_id: String,
}

/// CloudFoundry organization reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OrganizationFields {
    #[serde(rename = "GUID")]
    pub guid: String,
    pub name: String,
}

/// CloudFoundry space reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SpaceFields {
    #[serde(rename = "GUID")]
    pub guid: String,
    pub name: String,
    pub allow_ssh: bool,
}

impl Account {
    pub fn is_empty(&self) -> bool {
        self.guid.is_empty()
    }
}

impl ResourceGroup {
    pub fn is_empty(&self) -> bool {
        self.guid.is_empty()
    }
}

impl OrganizationFields {
    pub fn is_empty(&self) -> bool {
        self.guid.is_empty()
    }
}

impl SpaceFields {
    pub fn is_empty(&self) -> bool {
        self.guid.is_empty()
    }
}
