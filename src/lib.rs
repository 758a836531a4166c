//! # cloud-plugin-sdk
//!
//! Plugin SDK for an extensible cloud CLI.
//!
//! Plugins declare their commands and namespaces through [`PluginMetadata`]
//! and receive a [`PluginContext`] on every run. The context exposes the host
//! CLI's session (targeted endpoints, tokens, account and CloudFoundry scope)
//! and refreshes IAM and UAA tokens on the plugin's behalf, writing the new
//! tokens back so later invocations see them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloud_plugin_sdk::{Plugin, PluginContext, PluginMetadata, VersionType};
//!
//! struct Hello;
//!
//! impl Plugin for Hello {
//!     fn metadata(&self) -> PluginMetadata {
//!         PluginMetadata::new("hello", VersionType::new(1, 0, 0))
//!     }
//!
//!     fn run(&self, ctx: &dyn PluginContext, _args: &[String]) {
//!         if ctx.has_api_endpoint() {
//!             println!("targeting {}", ctx.api_endpoint());
//!         }
//!     }
//! }
//! ```
//!
//! ## Hosting a plugin
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cloud_plugin_sdk::{DefaultPluginContext, PluginContext, config::SessionConfig};
//!
//! fn main() -> Result<(), cloud_plugin_sdk::Error> {
//!     let config = Arc::new(SessionConfig::load_default()?);
//!     let ctx = DefaultPluginContext::new("/home/dev/.bluemix/plugins/hello", config);
//!     let token = ctx.refresh_iam_token()?;
//!     println!("refreshed: {}", !token.is_empty());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod config;
pub mod models;
pub mod plugins;
pub mod version;

// Re-exports for convenience
pub use auth::{AuthEndpoint, HttpTokenExchanger, TokenExchanger, TokenPair};
pub use config::{
    CfConfig, CfSessionConfig, ConfigError, ConfigPaths, CoreConfig, Environment, MemoryEnv,
    ProcessEnv, SessionConfig,
};
pub use models::{Account, OrganizationFields, Region, ResourceGroup, SpaceFields};
pub use plugins::{
    CfContext, CfCredentialContext, Command, DefaultPluginContext, Flag, Namespace, Plugin,
    PluginConfig, PluginContext, PluginError, PluginMetadata,
};
pub use version::{VersionType, compare_version};

/// Error type for cloud-plugin-sdk operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Token service returned an error response.
    #[error("API error (HTTP {status}): {message}", status = status.map(|s| s.to_string()).unwrap_or_else(|| "unknown".into()))]
    Api {
        message: String,
        status: Option<u16>,
        error_type: Option<String>,
    },

    /// Authentication failed.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Network connectivity or request failed.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or missing configuration, including untargeted endpoints.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Plugin metadata or plugin configuration failure.
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Authentication or authorization failures (401, 403)
    Authorization,
    /// Configuration, parsing, or setup errors
    Configuration,
    /// Network or server errors that may succeed on retry
    Transient,
    /// Internal errors (IO, JSON, unexpected states)
    Internal,
}

impl Error {
    pub fn auth(message: impl Into<String>) -> Self {
        Error::Auth {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Auth { .. } => ErrorCategory::Authorization,
            Error::Api {
                status: Some(401 | 403),
                ..
            } => ErrorCategory::Authorization,

            Error::Config(_) | Error::Plugin(_) => ErrorCategory::Configuration,

            Error::Network(_) => ErrorCategory::Transient,
            Error::Api {
                status: Some(500..=599),
                ..
            } => ErrorCategory::Transient,

            Error::Io(_) | Error::Json(_) | Error::Api { .. } => ErrorCategory::Internal,
        }
    }

    pub fn is_authorization_error(&self) -> bool {
        self.category() == ErrorCategory::Authorization
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// Whether a caller-side retry may succeed. The SDK itself never retries.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Api {
                status: Some(401),
                ..
            } | Error::Auth { .. }
        )
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Io(e) => Error::Io(e),
            config::ConfigError::NoHome => Error::Config(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
