//! Environment variable overrides.
//!
//! A handful of settings can be overridden per invocation through environment
//! variables. A variable only wins when it is set to a non-empty value;
//! otherwise the persisted value is used.

use std::collections::HashMap;

/// Trace setting override (`true`, `false` or a trace file path).
pub const ENV_TRACE: &str = "BLUEMIX_TRACE";
/// Terminal color override.
pub const ENV_COLOR: &str = "BLUEMIX_COLOR";
/// Target cloud name override.
pub const ENV_CLOUD_NAME: &str = "BLUEMIX_CLOUD_NAME";
/// Namespace of the command being dispatched to the plugin, set by the host.
pub const ENV_PLUGIN_NAMESPACE: &str = "BLUEMIX_PLUGIN_NAMESPACE";
/// Binary name of the invoking CLI, set by the host.
pub const ENV_CLI_NAME: &str = "BLUEMIX_CLI";
/// IAM endpoint override used for token refresh.
pub const ENV_IAM_ENDPOINT: &str = "IAM_ENDPOINT";

/// CLI binary name used when the host does not announce one.
pub const DEFAULT_CLI_NAME: &str = "bx";

/// Read-only source of environment variables.
pub trait Environment: Send + Sync {
    /// Value of `key`, or `None` when unset or not valid unicode.
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables, for embedding hosts and tests that must not touch
/// the process environment.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Environment for MemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Non-empty value of `key` from `env`.
pub fn non_empty(env: &dyn Environment, key: &str) -> Option<String> {
    env.var(key).filter(|v| !v.is_empty())
}

/// Prefer a non-empty environment value over the configured one.
pub fn env_or(env: &dyn Environment, key: &str, config_value: impl Into<String>) -> String {
    non_empty(env, key).unwrap_or_else(|| config_value.into())
}
