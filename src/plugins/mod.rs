//! Plugin contract: metadata a plugin declares, and the context it runs with.
//!
//! The host CLI asks a plugin for its [`PluginMetadata`], then calls
//! [`Plugin::run`] with a [`PluginContext`] describing the current session.
//! Plugins built against an older SDK keep the semantics they were written
//! for; see [`PluginContext::api_endpoint`].
//!
//! # Directory Structure
//!
//! ```text
//! ~/.bluemix/plugins/
//! └── my-plugin/
//!     ├── my-plugin        (binary)
//!     └── config.json      (PluginConfig)
//! ```

mod config;
mod context;
mod error;
mod metadata;
pub mod namespace;

pub use config::{PLUGIN_CONFIG_FILE, PluginConfig};
pub use context::{CfCredentialContext, DefaultPluginContext, LEGACY_API_ENDPOINT_SDK};
pub use error::PluginError;
pub use metadata::{Command, Flag, Namespace, PluginMetadata};

use crate::Result;
use crate::models::{Account, OrganizationFields, Region, ResourceGroup, SpaceFields};
use crate::version::VersionType;

/// Version of this SDK, stamped into [`PluginMetadata::sdk_version`].
pub const SDK_VERSION: VersionType = VersionType::new(0, 1, 1);

/// A CLI plugin.
pub trait Plugin {
    fn metadata(&self) -> PluginMetadata;

    /// Run a command. `args[0]` is the command name or alias, without its
    /// namespace; use [`PluginContext::command_namespace`] for that.
    fn run(&self, context: &dyn PluginContext, args: &[String]);
}

/// Session state of the host CLI, as handed to [`Plugin::run`].
pub trait PluginContext {
    /// Targeted API endpoint. Plugins built against an SDK older than 0.1.1
    /// get the CloudFoundry API endpoint here instead.
    fn api_endpoint(&self) -> String;

    /// Whether a cloud is targeted; says nothing about CloudFoundry, see
    /// [`has_targeted_cf`](Self::has_targeted_cf).
    fn has_api_endpoint(&self) -> bool;

    fn console_endpoint(&self) -> String;

    /// Endpoint of the IAM token service.
    fn iam_endpoint(&self) -> String;

    fn cloud_name(&self) -> String;

    /// Type of the targeted cloud, like `public` or `dedicated`.
    fn cloud_type(&self) -> String;

    fn current_region(&self) -> Region;

    fn iam_token(&self) -> String;

    fn iam_refresh_token(&self) -> String;

    /// Refresh the IAM token pair, store it and return the new access token.
    fn refresh_iam_token(&self) -> Result<String>;

    fn user_email(&self) -> String;

    /// Whether the user is logged into the platform, not necessarily CloudFoundry.
    fn is_logged_in(&self) -> bool;

    /// IMS account linked to the targeted billing account.
    fn ims_account_id(&self) -> String;

    fn current_account(&self) -> Account;

    fn has_targeted_account(&self) -> bool;

    fn current_resource_group(&self) -> ResourceGroup;

    fn has_targeted_resource_group(&self) -> bool;

    /// The targeted CloudFoundry environment.
    fn cf(&self) -> &dyn CfContext;

    fn has_targeted_cf(&self) -> bool;

    fn locale(&self) -> String;

    /// `"true"`, `"false"` or the path of a trace output file.
    fn trace(&self) -> String;

    fn color_enabled(&self) -> String;

    fn is_ssl_disabled(&self) -> bool;

    /// Installation directory of the plugin.
    fn plugin_directory(&self) -> &str;

    /// HTTP client timeout in seconds.
    fn http_timeout(&self) -> u64;

    /// Whether the CLI checks for updates.
    fn version_check_enabled(&self) -> bool;

    fn plugin_config(&self) -> &PluginConfig;

    /// Namespace of the command being run, parsed by the host.
    fn command_namespace(&self) -> String;

    /// Binary name of the CLI invoking the plugin.
    fn cli_name(&self) -> String;
}

/// The targeted CloudFoundry environment.
pub trait CfContext {
    /// Cloud controller API version.
    fn api_version(&self) -> String;
    fn api_endpoint(&self) -> String;
    fn has_api_endpoint(&self) -> bool;
    fn doppler_endpoint(&self) -> String;
    /// Endpoint of the UAA token service.
    fn uaa_endpoint(&self) -> String;
    fn is_logged_in(&self) -> bool;
    fn username(&self) -> String;
    fn user_email(&self) -> String;
    fn user_guid(&self) -> String;
    /// UAA access token; call [`refresh_uaa_token`](Self::refresh_uaa_token) when outdated.
    fn uaa_token(&self) -> String;
    fn uaa_refresh_token(&self) -> String;
    /// Refresh the UAA token pair, store it and return the new access token.
    fn refresh_uaa_token(&self) -> Result<String>;
    fn current_organization(&self) -> OrganizationFields;
    fn has_targeted_organization(&self) -> bool;
    fn current_space(&self) -> SpaceFields;
    fn has_targeted_space(&self) -> bool;
}
