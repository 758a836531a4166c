//! Token pair returned by a refresh.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Access and refresh token issued by a token service.
#[derive(Clone, Debug)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    /// Token type as issued, usually `Bearer`.
    pub token_type: String,
    /// Expiration timestamp (Unix seconds).
    pub expires_at: Option<i64>,
}

impl TokenPair {
    pub fn new(
        token_type: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
            token_type: token_type.into(),
            expires_at: None,
        }
    }

    /// Authorization value stored in the session: `"<type> <access token>"`.
    pub fn token(&self) -> String {
        let access = self.access_token.expose_secret();
        if self.token_type.is_empty() {
            access.to_string()
        } else {
            format!("{} {}", self.token_type, access)
        }
    }

    pub fn refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    pub fn expires_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .map(|ts| DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now))
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at_datetime()
            .map(|exp| Utc::now() >= exp)
            .unwrap_or(false)
    }

    /// Within 5 minutes of expiry.
    pub fn needs_refresh(&self) -> bool {
        self.expires_at_datetime()
            .map(|exp| {
                exp.checked_sub_signed(Duration::minutes(5))
                    .is_none_or(|threshold| Utc::now() >= threshold)
            })
            .unwrap_or(false)
    }
}

/// Wire shape of a successful refresh response from IAM or UAA.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds (UAA and IAM).
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiration in Unix seconds (IAM only).
    #[serde(default)]
    pub expiration: Option<i64>,
}

impl From<TokenResponse> for TokenPair {
    fn from(response: TokenResponse) -> Self {
        let expires_at = response
            .expiration
            .or_else(|| {
                response
                    .expires_in
                    .and_then(|secs| Utc::now().timestamp().checked_add(secs))
            });
        Self {
            expires_at,
            ..TokenPair::new(
                response.token_type,
                response.access_token,
                response.refresh_token,
            )
        }
    }
}
