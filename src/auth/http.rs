//! Blocking HTTP token exchanger.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use super::{AuthEndpoint, TokenExchanger, TokenPair, TokenResponse};
use crate::config::CoreConfig;
use crate::{Error, Result};

/// OAuth client credentials the CLI registers with IAM.
const IAM_CLIENT_ID: &str = "bx";
const IAM_CLIENT_SECRET: &str = "bx";
/// OAuth client credentials the CLI registers with UAA.
const UAA_CLIENT_ID: &str = "cf";
const UAA_CLIENT_SECRET: &str = "";

/// Token exchanger that posts refresh-token grants over HTTP.
///
/// Without an explicit client a fresh one is built for each exchange.
#[derive(Debug, Clone, Default)]
pub struct HttpTokenExchanger {
    timeout: Option<Duration>,
    skip_ssl_validation: bool,
    client: Option<Client>,
}

impl HttpTokenExchanger {
    /// Exchanger with reqwest defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchanger honouring the session's HTTP timeout and SSL validation setting.
    pub fn from_config(config: &dyn CoreConfig) -> Self {
        Self {
            timeout: match config.http_timeout() {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            skip_ssl_validation: config.is_ssl_disabled(),
            client: None,
        }
    }

    /// Exchanger using a preconfigured client; timeout and SSL settings are
    /// then the client's own.
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn client(&self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let mut builder = Client::builder().danger_accept_invalid_certs(self.skip_ssl_validation);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

impl TokenExchanger for HttpTokenExchanger {
    fn refresh(&self, endpoint: &AuthEndpoint, refresh_token: &str) -> Result<TokenPair> {
        let url = endpoint.token_url();
        let (client_id, client_secret, mut form) = match endpoint {
            AuthEndpoint::Iam { .. } => (
                IAM_CLIENT_ID,
                IAM_CLIENT_SECRET,
                vec![("response_type", "cloud_iam")],
            ),
            AuthEndpoint::Uaa { .. } => (UAA_CLIENT_ID, UAA_CLIENT_SECRET, Vec::new()),
        };
        form.push(("grant_type", "refresh_token"));
        form.push(("refresh_token", refresh_token));

        let response = self
            .client()?
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let token: TokenResponse = response.json()?;
        Ok(token.into())
    }
}

/// Map an error response from IAM (`errorCode`/`errorMessage`) or UAA
/// (`error`/`error_description`) onto [`Error::Api`].
fn api_error(status: StatusCode, body: &str) -> Error {
    let json: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        json.as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let message = field("errorMessage")
        .or_else(|| field("error_description"))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("token request failed")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });

    Error::Api {
        message,
        status: Some(status.as_u16()),
        error_type: field("errorCode").or_else(|| field("error")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoreSettings, SessionConfig};

    #[test]
    fn test_from_config() {
        let config = SessionConfig::from_settings(
            CoreSettings {
                http_timeout: 45,
                ssl_disabled: true,
                ..Default::default()
            },
            Default::default(),
        );
        let exchanger = HttpTokenExchanger::from_config(&config);
        assert_eq!(exchanger.timeout(), Some(Duration::from_secs(45)));
        assert!(exchanger.skip_ssl_validation);

        let exchanger = HttpTokenExchanger::from_config(&SessionConfig::new());
        assert_eq!(exchanger.timeout(), None);
    }

    #[test]
    fn test_api_error_iam_body() {
        let body = r#"{"errorCode":"BXNIM0407E","errorMessage":"Provided refresh token is expired"}"#;
        let err = api_error(StatusCode::BAD_REQUEST, body);
        match err {
            Error::Api {
                message,
                status,
                error_type,
            } => {
                assert_eq!(message, "Provided refresh token is expired");
                assert_eq!(status, Some(400));
                assert_eq!(error_type.as_deref(), Some("BXNIM0407E"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_uaa_body() {
        let body = r#"{"error":"invalid_token","error_description":"Invalid refresh token"}"#;
        let err = api_error(StatusCode::UNAUTHORIZED, body);
        assert!(err.to_string().contains("Invalid refresh token"));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_api_error_plain_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.to_string().contains("upstream down"));
        assert!(err.is_retryable());

        let err = api_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(err.to_string().contains("Service Unavailable"));
    }
}
