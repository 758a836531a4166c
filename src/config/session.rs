//! Lock-guarded session configuration.
//!
//! Holds the persisted session fields behind a lock so one configuration can be
//! shared by the host and every plugin context. A configuration loaded from
//! disk writes itself back after every setter; an in-memory one never touches
//! the filesystem.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::file::{self, ConfigPaths};
use super::{CfConfig, ConfigResult, CoreConfig};
use crate::models::{Account, OrganizationFields, Region, ResourceGroup, SpaceFields};

/// Platform session fields as persisted by the host CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CoreSettings {
    #[serde(rename = "APIEndpoint")]
    pub api_endpoint: String,
    pub console_endpoint: String,
    #[serde(rename = "IAMEndpoint")]
    pub iam_endpoint: String,
    pub cloud_name: String,
    pub cloud_type: String,
    pub region: Region,
    #[serde(rename = "IAMToken")]
    pub iam_token: String,
    #[serde(rename = "IAMRefreshToken")]
    pub iam_refresh_token: String,
    pub logged_in: bool,
    pub user_email: String,
    #[serde(rename = "IMSAccountID")]
    pub ims_account_id: String,
    pub account: Account,
    pub resource_group: ResourceGroup,
    pub locale: String,
    pub trace: String,
    pub color_enabled: String,
    #[serde(rename = "SSLDisabled")]
    pub ssl_disabled: bool,
    #[serde(rename = "HTTPTimeout")]
    pub http_timeout: u64,
    #[serde(rename = "CheckCLIVersionDisabled")]
    pub check_cli_version_disabled: bool,
    #[serde(rename = "SDKVersion")]
    pub sdk_version: String,
}

/// CloudFoundry session fields as persisted by the host CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CfSettings {
    #[serde(rename = "Target")]
    pub api_endpoint: String,
    #[serde(rename = "APIVersion")]
    pub api_version: String,
    pub doppler_logging_endpoint: String,
    #[serde(rename = "UaaEndpoint")]
    pub uaa_endpoint: String,
    pub logged_in: bool,
    pub username: String,
    pub user_email: String,
    #[serde(rename = "UserGUID")]
    pub user_guid: String,
    pub access_token: String,
    pub refresh_token: String,
    pub organization_fields: OrganizationFields,
    pub space_fields: SpaceFields,
}

/// Lock-guarded CloudFoundry configuration.
#[derive(Debug, Default)]
pub struct CfSessionConfig {
    data: RwLock<CfSettings>,
    persist_to: Option<PathBuf>,
}

impl CfSessionConfig {
    pub fn new(settings: CfSettings) -> Self {
        Self {
            data: RwLock::new(settings),
            persist_to: None,
        }
    }

    /// Load from `path`, writing back there on every change. A missing file
    /// yields empty settings.
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let settings = file::read_json(&path)?.unwrap_or_default();
        Ok(Self {
            data: RwLock::new(settings),
            persist_to: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.persist_to.as_deref()
    }

    /// Write the current fields to the backing file, if any.
    pub fn save(&self) -> ConfigResult<()> {
        match &self.persist_to {
            Some(path) => file::write_json(path, &self.settings()),
            None => Ok(()),
        }
    }

    /// Copy of the current fields.
    pub fn settings(&self) -> CfSettings {
        self.read(Clone::clone)
    }

    /// Apply `f` to the fields under the write lock, then persist.
    pub fn update(&self, f: impl FnOnce(&mut CfSettings)) {
        {
            let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
            f(&mut *data);
        }
        persist(self.save(), self.path());
    }

    fn read<T>(&self, f: impl FnOnce(&CfSettings) -> T) -> T {
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        f(&*data)
    }
}

impl CfConfig for CfSessionConfig {
    fn api_endpoint(&self) -> String {
        self.read(|s| s.api_endpoint.clone())
    }

    fn api_version(&self) -> String {
        self.read(|s| s.api_version.clone())
    }

    fn doppler_endpoint(&self) -> String {
        self.read(|s| s.doppler_logging_endpoint.clone())
    }

    fn uaa_endpoint(&self) -> String {
        self.read(|s| s.uaa_endpoint.clone())
    }

    fn is_logged_in(&self) -> bool {
        self.read(|s| s.logged_in)
    }

    fn username(&self) -> String {
        self.read(|s| s.username.clone())
    }

    fn user_email(&self) -> String {
        self.read(|s| s.user_email.clone())
    }

    fn user_guid(&self) -> String {
        self.read(|s| s.user_guid.clone())
    }

    fn uaa_token(&self) -> String {
        self.read(|s| s.access_token.clone())
    }

    fn uaa_refresh_token(&self) -> String {
        self.read(|s| s.refresh_token.clone())
    }

    fn current_organization(&self) -> OrganizationFields {
        self.read(|s| s.organization_fields.clone())
    }

    fn current_space(&self) -> SpaceFields {
        self.read(|s| s.space_fields.clone())
    }

    fn set_uaa_token(&self, token: &str) {
        self.update(|s| s.access_token = token.to_string());
    }

    fn set_uaa_refresh_token(&self, token: &str) {
        self.update(|s| s.refresh_token = token.to_string());
    }
}

/// Lock-guarded platform configuration with its nested CloudFoundry part.
#[derive(Debug, Default)]
pub struct SessionConfig {
    data: RwLock<CoreSettings>,
    cf: Arc<CfSessionConfig>,
    persist_to: Option<PathBuf>,
}

impl SessionConfig {
    /// Empty in-memory configuration: nothing targeted, nobody logged in.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory configuration seeded with `core` and `cf`.
    pub fn from_settings(core: CoreSettings, cf: CfSettings) -> Self {
        Self {
            data: RwLock::new(core),
            cf: Arc::new(CfSessionConfig::new(cf)),
            persist_to: None,
        }
    }

    /// Load both configuration files, writing back to them on every change.
    pub fn load(paths: &ConfigPaths) -> ConfigResult<Self> {
        let core = file::read_json(&paths.core)?.unwrap_or_default();
        Ok(Self {
            data: RwLock::new(core),
            cf: Arc::new(CfSessionConfig::load(&paths.cf)?),
            persist_to: Some(paths.core.clone()),
        })
    }

    /// Load from the host CLI's config home, see [`ConfigPaths::from_env`].
    pub fn load_default() -> ConfigResult<Self> {
        Self::load(&ConfigPaths::from_env()?)
    }

    pub fn path(&self) -> Option<&Path> {
        self.persist_to.as_deref()
    }

    /// Write the platform fields to the backing file, if any.
    pub fn save(&self) -> ConfigResult<()> {
        match &self.persist_to {
            Some(path) => file::write_json(path, &self.settings()),
            None => Ok(()),
        }
    }

    /// Copy of the current platform fields.
    pub fn settings(&self) -> CoreSettings {
        self.read(Clone::clone)
    }

    /// Apply `f` to the platform fields under the write lock, then persist.
    pub fn update(&self, f: impl FnOnce(&mut CoreSettings)) {
        {
            let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
            f(&mut *data);
        }
        persist(self.save(), self.path());
    }

    /// The concrete CloudFoundry part, for hosts that need to seed or snapshot it.
    pub fn cf(&self) -> &Arc<CfSessionConfig> {
        &self.cf
    }

    fn read<T>(&self, f: impl FnOnce(&CoreSettings) -> T) -> T {
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        f(&*data)
    }
}

// Setters are infallible at the trait level; the in-memory value is
// authoritative for this invocation even when the write-back fails.
fn persist(result: ConfigResult<()>, path: Option<&Path>) {
    if let Err(e) = result {
        tracing::warn!(path = ?path, error = %e, "failed to persist configuration");
    }
}

impl CoreConfig for SessionConfig {
    fn api_endpoint(&self) -> String {
        self.read(|s| s.api_endpoint.clone())
    }

    fn console_endpoint(&self) -> String {
        self.read(|s| s.console_endpoint.clone())
    }

    fn iam_endpoint(&self) -> String {
        self.read(|s| s.iam_endpoint.clone())
    }

    fn cloud_name(&self) -> String {
        self.read(|s| s.cloud_name.clone())
    }

    fn cloud_type(&self) -> String {
        self.read(|s| s.cloud_type.clone())
    }

    fn current_region(&self) -> Region {
        self.read(|s| s.region.clone())
    }

    fn iam_token(&self) -> String {
        self.read(|s| s.iam_token.clone())
    }

    fn iam_refresh_token(&self) -> String {
        self.read(|s| s.iam_refresh_token.clone())
    }

    fn is_logged_in(&self) -> bool {
        self.read(|s| s.logged_in)
    }

    fn user_email(&self) -> String {
        self.read(|s| s.user_email.clone())
    }

    fn ims_account_id(&self) -> String {
        self.read(|s| s.ims_account_id.clone())
    }

    fn current_account(&self) -> Account {
        self.read(|s| s.account.clone())
    }

    fn current_resource_group(&self) -> ResourceGroup {
        self.read(|s| s.resource_group.clone())
    }

    fn locale(&self) -> String {
        self.read(|s| s.locale.clone())
    }

    fn trace(&self) -> String {
        self.read(|s| s.trace.clone())
    }

    fn color_enabled(&self) -> String {
        self.read(|s| s.color_enabled.clone())
    }

    fn is_ssl_disabled(&self) -> bool {
        self.read(|s| s.ssl_disabled)
    }

    fn http_timeout(&self) -> u64 {
        self.read(|s| s.http_timeout)
    }

    fn check_cli_version_disabled(&self) -> bool {
        self.read(|s| s.check_cli_version_disabled)
    }

    fn sdk_version(&self) -> String {
        self.read(|s| s.sdk_version.clone())
    }

    fn cf_config(&self) -> Arc<dyn CfConfig> {
        self.cf.clone()
    }

    fn set_iam_token(&self, token: &str) {
        self.update(|s| s.iam_token = token.to_string());
    }

    fn set_iam_refresh_token(&self, token: &str) {
        self.update(|s| s.iam_refresh_token = token.to_string());
    }

    fn set_sdk_version(&self, version: &str) {
        self.update(|s| s.sdk_version = version.to_string());
    }
}
