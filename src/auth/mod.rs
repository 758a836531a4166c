//! Token refresh against the platform IAM service and CloudFoundry UAA.
//!
//! Both services speak the OAuth refresh-token grant, so one
//! [`TokenExchanger`] serves both; the [`AuthEndpoint`] says which one to talk to.

mod http;
mod token;

pub use http::HttpTokenExchanger;
pub use token::{TokenPair, TokenResponse};

use std::sync::Arc;

use crate::Result;

/// Path appended to the IAM base endpoint to reach the token service.
pub const IAM_TOKEN_PATH: &str = "/identity/token";
/// Path appended to the UAA endpoint to reach the token service.
pub const UAA_TOKEN_PATH: &str = "/oauth/token";

/// Token service to exchange a refresh token with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEndpoint {
    /// Platform IAM, addressed by its full token endpoint.
    Iam { token_endpoint: String },
    /// CloudFoundry UAA, addressed by its base endpoint.
    Uaa { uaa_endpoint: String },
}

impl AuthEndpoint {
    /// IAM token service under `base`.
    pub fn iam(base: &str) -> Self {
        Self::Iam {
            token_endpoint: format!("{}{}", base.trim_end_matches('/'), IAM_TOKEN_PATH),
        }
    }

    pub fn uaa(uaa_endpoint: impl Into<String>) -> Self {
        Self::Uaa {
            uaa_endpoint: uaa_endpoint.into(),
        }
    }

    /// URL the refresh request is posted to.
    pub fn token_url(&self) -> String {
        match self {
            Self::Iam { token_endpoint } => token_endpoint.clone(),
            Self::Uaa { uaa_endpoint } => {
                format!("{}{}", uaa_endpoint.trim_end_matches('/'), UAA_TOKEN_PATH)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Iam { .. } => "iam",
            Self::Uaa { .. } => "uaa",
        }
    }
}

/// Exchanges a refresh token for a new access/refresh token pair.
///
/// Implementations own transport concerns (timeouts, TLS); callers get the
/// upstream failure back unchanged.
pub trait TokenExchanger: Send + Sync {
    fn refresh(&self, endpoint: &AuthEndpoint, refresh_token: &str) -> Result<TokenPair>;
}

impl<T: TokenExchanger + ?Sized> TokenExchanger for Arc<T> {
    fn refresh(&self, endpoint: &AuthEndpoint, refresh_token: &str) -> Result<TokenPair> {
        (**self).refresh(endpoint, refresh_token)
    }
}
