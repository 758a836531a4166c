//! Plugin context backed by the host's persisted configuration.

use std::path::Path;
use std::sync::Arc;

use super::{CfContext, PluginConfig, PluginContext, PluginMetadata};
use crate::auth::{AuthEndpoint, HttpTokenExchanger, TokenExchanger};
use crate::config::env::{
    DEFAULT_CLI_NAME, ENV_CLI_NAME, ENV_CLOUD_NAME, ENV_COLOR, ENV_IAM_ENDPOINT,
    ENV_PLUGIN_NAMESPACE, ENV_TRACE, env_or, non_empty,
};
use crate::config::{CfConfig, CoreConfig, Environment, ProcessEnv};
use crate::models::{Account, OrganizationFields, Region, ResourceGroup, SpaceFields};
use crate::version::compare_version;
use crate::{Error, Result};

/// SDK version from which `api_endpoint` means the platform endpoint.
/// Plugins built against an older SDK get the CloudFoundry endpoint.
pub const LEGACY_API_ENDPOINT_SDK: &str = "0.1.1";

/// CloudFoundry view of the session with UAA token refresh.
#[derive(Clone)]
pub struct CfCredentialContext {
    config: Arc<dyn CfConfig>,
    exchanger: Arc<dyn TokenExchanger>,
}

impl CfCredentialContext {
    pub fn new(config: Arc<dyn CfConfig>, exchanger: Arc<dyn TokenExchanger>) -> Self {
        Self { config, exchanger }
    }

    /// Endpoint the UAA refresh is sent to.
    pub fn authentication_endpoint(&self) -> String {
        self.config.uaa_endpoint()
    }
}

impl CfContext for CfCredentialContext {
    fn api_version(&self) -> String {
        self.config.api_version()
    }

    fn api_endpoint(&self) -> String {
        self.config.api_endpoint()
    }

    fn has_api_endpoint(&self) -> bool {
        !self.config.api_endpoint().is_empty()
    }

    fn doppler_endpoint(&self) -> String {
        self.config.doppler_endpoint()
    }

    fn uaa_endpoint(&self) -> String {
        self.config.uaa_endpoint()
    }

    fn is_logged_in(&self) -> bool {
        self.config.is_logged_in()
    }

    fn username(&self) -> String {
        self.config.username()
    }

    fn user_email(&self) -> String {
        self.config.user_email()
    }

    fn user_guid(&self) -> String {
        self.config.user_guid()
    }

    fn uaa_token(&self) -> String {
        self.config.uaa_token()
    }

    fn uaa_refresh_token(&self) -> String {
        self.config.uaa_refresh_token()
    }

    fn refresh_uaa_token(&self) -> Result<String> {
        if !self.has_api_endpoint() {
            return Err(Error::config("CloudFoundry API endpoint is not set"));
        }

        let endpoint = AuthEndpoint::uaa(self.authentication_endpoint());
        tracing::debug!(endpoint = %endpoint.token_url(), "refreshing UAA token");
        let pair = self
            .exchanger
            .refresh(&endpoint, &self.config.uaa_refresh_token())
            .inspect_err(|e| tracing::debug!(error = %e, "UAA token refresh failed"))?;

        let token = pair.token();
        self.config.set_uaa_token(&token);
        self.config.set_uaa_refresh_token(pair.refresh_token());
        Ok(token)
    }

    fn current_organization(&self) -> OrganizationFields {
        self.config.current_organization()
    }

    fn has_targeted_organization(&self) -> bool {
        self.config.has_targeted_organization()
    }

    fn current_space(&self) -> SpaceFields {
        self.config.current_space()
    }

    fn has_targeted_space(&self) -> bool {
        self.config.has_targeted_space()
    }
}

impl std::fmt::Debug for CfCredentialContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CfCredentialContext")
            .field("api_endpoint", &self.config.api_endpoint())
            .finish_non_exhaustive()
    }
}

/// The context handed to a plugin for one invocation.
///
/// Reads go straight to the shared configuration, so tokens refreshed through
/// any context (or by the host) are seen immediately. Not meant to be shared
/// across threads running refreshes concurrently: a refresh reads, exchanges
/// and writes without a transaction, and the last write wins.
pub struct DefaultPluginContext {
    config: Arc<dyn CoreConfig>,
    cf: CfCredentialContext,
    plugin_config: PluginConfig,
    plugin_path: String,
    env: Arc<dyn Environment>,
    exchanger: Arc<dyn TokenExchanger>,
}

impl DefaultPluginContext {
    /// Context for the plugin installed at `plugin_path`, reading the process
    /// environment and refreshing tokens over HTTP.
    pub fn new(plugin_path: impl Into<String>, config: Arc<dyn CoreConfig>) -> Self {
        let plugin_path = plugin_path.into();
        let exchanger: Arc<dyn TokenExchanger> =
            Arc::new(HttpTokenExchanger::from_config(config.as_ref()));
        Self {
            cf: CfCredentialContext::new(config.cf_config(), exchanger.clone()),
            plugin_config: PluginConfig::for_plugin_dir(Path::new(&plugin_path)),
            plugin_path,
            config,
            env: Arc::new(ProcessEnv),
            exchanger,
        }
    }

    /// Context for running the plugin described by `metadata`: records the
    /// plugin's SDK version in `config` first, so version-gated reads such as
    /// [`PluginContext::api_endpoint`] follow the plugin's declaration.
    pub fn for_plugin(
        plugin_path: impl Into<String>,
        config: Arc<dyn CoreConfig>,
        metadata: &PluginMetadata,
    ) -> Self {
        config.set_sdk_version(&metadata.sdk_version.to_string());
        Self::new(plugin_path, config)
    }

    /// Resolve overrides from `env` instead of the process environment.
    pub fn with_env(mut self, env: impl Environment + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Exchange IAM and UAA tokens through `exchanger`.
    pub fn with_exchanger(mut self, exchanger: Arc<dyn TokenExchanger>) -> Self {
        self.cf = CfCredentialContext::new(self.config.cf_config(), exchanger.clone());
        self.exchanger = exchanger;
        self
    }

    /// The shared configuration this context reads from.
    pub fn config(&self) -> &Arc<dyn CoreConfig> {
        &self.config
    }

    /// SDK version the running plugin was built against, as recorded by the host.
    pub fn sdk_version(&self) -> String {
        self.config.sdk_version()
    }

    /// IAM base endpoint: the `IAM_ENDPOINT` override, else the configured one.
    pub fn resolved_iam_endpoint(&self) -> Option<String> {
        non_empty(self.env.as_ref(), ENV_IAM_ENDPOINT).or_else(|| {
            let endpoint = self.config.iam_endpoint();
            (!endpoint.is_empty()).then_some(endpoint)
        })
    }

    fn uses_legacy_api_endpoint(&self) -> bool {
        compare_version(&self.sdk_version(), LEGACY_API_ENDPOINT_SDK).is_lt()
    }
}

impl PluginContext for DefaultPluginContext {
    /// Plugins built before SDK 0.1.1 predate the platform-wide endpoint and
    /// keep receiving the CloudFoundry one.
    fn api_endpoint(&self) -> String {
        if self.uses_legacy_api_endpoint() {
            self.config.cf_config().api_endpoint()
        } else {
            self.config.api_endpoint()
        }
    }

    fn has_api_endpoint(&self) -> bool {
        !self.api_endpoint().is_empty()
    }

    fn console_endpoint(&self) -> String {
        self.config.console_endpoint()
    }

    fn iam_endpoint(&self) -> String {
        self.config.iam_endpoint()
    }

    fn cloud_name(&self) -> String {
        env_or(self.env.as_ref(), ENV_CLOUD_NAME, self.config.cloud_name())
    }

    fn cloud_type(&self) -> String {
        self.config.cloud_type()
    }

    fn current_region(&self) -> Region {
        self.config.current_region()
    }

    fn iam_token(&self) -> String {
        self.config.iam_token()
    }

    fn iam_refresh_token(&self) -> String {
        self.config.iam_refresh_token()
    }

    fn refresh_iam_token(&self) -> Result<String> {
        let base = self
            .resolved_iam_endpoint()
            .ok_or_else(|| Error::config("IAM endpoint is not set"))?;

        let endpoint = AuthEndpoint::iam(&base);
        tracing::debug!(endpoint = %endpoint.token_url(), "refreshing IAM token");
        let pair = self
            .exchanger
            .refresh(&endpoint, &self.config.iam_refresh_token())
            .inspect_err(|e| tracing::debug!(error = %e, "IAM token refresh failed"))?;

        let token = pair.token();
        self.config.set_iam_token(&token);
        self.config.set_iam_refresh_token(pair.refresh_token());
        Ok(token)
    }

    fn user_email(&self) -> String {
        self.config.user_email()
    }

    fn is_logged_in(&self) -> bool {
        self.config.is_logged_in()
    }

    fn ims_account_id(&self) -> String {
        self.config.ims_account_id()
    }

    fn current_account(&self) -> Account {
        self.config.current_account()
    }

    fn has_targeted_account(&self) -> bool {
        self.config.has_targeted_account()
    }

    fn current_resource_group(&self) -> ResourceGroup {
        self.config.current_resource_group()
    }

    fn has_targeted_resource_group(&self) -> bool {
        self.config.has_targeted_resource_group()
    }

    fn cf(&self) -> &dyn CfContext {
        &self.cf
    }

    fn has_targeted_cf(&self) -> bool {
        self.cf.has_api_endpoint()
    }

    fn locale(&self) -> String {
        self.config.locale()
    }

    fn trace(&self) -> String {
        env_or(self.env.as_ref(), ENV_TRACE, self.config.trace())
    }

    fn color_enabled(&self) -> String {
        env_or(self.env.as_ref(), ENV_COLOR, self.config.color_enabled())
    }

    fn is_ssl_disabled(&self) -> bool {
        self.config.is_ssl_disabled()
    }

    fn plugin_directory(&self) -> &str {
        &self.plugin_path
    }

    fn http_timeout(&self) -> u64 {
        self.config.http_timeout()
    }

    fn version_check_enabled(&self) -> bool {
        !self.config.check_cli_version_disabled()
    }

    fn plugin_config(&self) -> &PluginConfig {
        &self.plugin_config
    }

    fn command_namespace(&self) -> String {
        self.env.var(ENV_PLUGIN_NAMESPACE).unwrap_or_default()
    }

    fn cli_name(&self) -> String {
        env_or(self.env.as_ref(), ENV_CLI_NAME, DEFAULT_CLI_NAME)
    }
}

impl std::fmt::Debug for DefaultPluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultPluginContext")
            .field("plugin_path", &self.plugin_path)
            .field("sdk_version", &self.sdk_version())
            .field("cf", &self.cf)
            .finish_non_exhaustive()
    }
}
