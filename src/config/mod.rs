//! Host CLI session configuration as seen by plugins.
//!
//! The persisted configuration is consumed through two narrow contracts:
//! [`CoreConfig`] for platform-wide session state and [`CfConfig`] for the
//! CloudFoundry-scoped fields nested inside it. Setters take `&self` because a
//! single configuration is shared between the host and every context built on
//! top of it; a write through one handle is visible through all of them.
//!
//! ```rust,no_run
//! use cloud_plugin_sdk::config::{CoreConfig, SessionConfig};
//!
//! # fn example() -> Result<(), cloud_plugin_sdk::Error> {
//! let config = SessionConfig::load_default()?;
//! println!("targeting {}", config.api_endpoint());
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod file;
pub mod session;

pub use env::{Environment, MemoryEnv, ProcessEnv, env_or};
pub use file::ConfigPaths;
pub use session::{CfSessionConfig, CfSettings, CoreSettings, SessionConfig};

use std::sync::Arc;

use thiserror::Error;

use crate::models::{Account, OrganizationFields, Region, ResourceGroup, SpaceFields};

/// Errors that can occur in configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Stored value has the wrong shape for the requested type
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No home directory to resolve the config location from
    #[error("Cannot determine config home directory")]
    NoHome,
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Read/write view of the CloudFoundry-scoped session fields.
pub trait CfConfig: Send + Sync {
    fn api_endpoint(&self) -> String;
    fn api_version(&self) -> String;
    fn doppler_endpoint(&self) -> String;
    /// UAA endpoint, also used as the authentication endpoint for token refresh.
    fn uaa_endpoint(&self) -> String;
    fn is_logged_in(&self) -> bool;
    fn username(&self) -> String;
    fn user_email(&self) -> String;
    fn user_guid(&self) -> String;
    fn uaa_token(&self) -> String;
    fn uaa_refresh_token(&self) -> String;
    fn current_organization(&self) -> OrganizationFields;
    fn current_space(&self) -> SpaceFields;

    fn set_uaa_token(&self, token: &str);
    fn set_uaa_refresh_token(&self, token: &str);

    fn has_api_endpoint(&self) -> bool {
        !self.api_endpoint().is_empty()
    }

    fn has_targeted_organization(&self) -> bool {
        !self.current_organization().is_empty()
    }

    fn has_targeted_space(&self) -> bool {
        !self.current_space().is_empty()
    }
}

/// Read/write view of the platform session state persisted by the host CLI.
pub trait CoreConfig: Send + Sync {
    fn api_endpoint(&self) -> String;
    fn console_endpoint(&self) -> String;
    fn iam_endpoint(&self) -> String;
    fn cloud_name(&self) -> String;
    fn cloud_type(&self) -> String;
    fn current_region(&self) -> Region;
    fn iam_token(&self) -> String;
    fn iam_refresh_token(&self) -> String;
    fn is_logged_in(&self) -> bool;
    fn user_email(&self) -> String;
    fn ims_account_id(&self) -> String;
    fn current_account(&self) -> Account;
    fn current_resource_group(&self) -> ResourceGroup;
    fn locale(&self) -> String;
    fn trace(&self) -> String;
    fn color_enabled(&self) -> String;
    fn is_ssl_disabled(&self) -> bool;
    /// HTTP timeout in seconds, `0` meaning the client default.
    fn http_timeout(&self) -> u64;
    fn check_cli_version_disabled(&self) -> bool;
    /// SDK version the running plugin was built against.
    fn sdk_version(&self) -> String;

    /// The nested CloudFoundry configuration.
    fn cf_config(&self) -> Arc<dyn CfConfig>;

    fn set_iam_token(&self, token: &str);
    fn set_iam_refresh_token(&self, token: &str);
    fn set_sdk_version(&self, version: &str);

    fn has_api_endpoint(&self) -> bool {
        !self.api_endpoint().is_empty()
    }

    fn has_targeted_account(&self) -> bool {
        !self.current_account().is_empty()
    }

    fn has_targeted_resource_group(&self) -> bool {
        !self.current_resource_group().is_empty()
    }
}
