//! Token Refresh Tests
//!
//! Exercises the HTTP token exchanger and the context refresh flow against a
//! mock IAM/UAA server. The exchanger is blocking, so every exchange runs on
//! the blocking pool.
//!
//! Run: cargo nextest run --test token_refresh_tests

use std::sync::Arc;

use cloud_plugin_sdk::config::{CfSettings, CoreSettings, MemoryEnv, SessionConfig};
use cloud_plugin_sdk::{
    AuthEndpoint, CoreConfig, DefaultPluginContext, HttpTokenExchanger, PluginContext,
    Result, TokenExchanger, TokenPair,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn exchange(endpoint: AuthEndpoint, refresh_token: &str) -> Result<TokenPair> {
    let refresh_token = refresh_token.to_string();
    tokio::task::spawn_blocking(move || HttpTokenExchanger::new().refresh(&endpoint, &refresh_token))
        .await
        .unwrap()
}

fn token_body(access: &str, refresh: &str) -> serde_json::Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "Bearer",
        "expires_in": 3600
    })
}

// =============================================================================
// HTTP Exchanger
// =============================================================================

mod http_exchanger_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_iam_refresh_request_shape() {
        init_tracing();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .and(header("authorization", "Basic Yng6Yng="))
            .and(header("accept", "application/json"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("response_type=cloud_iam"))
            .and(body_string_contains("refresh_token=refresh-old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-access", "refresh-new")))
            .expect(1)
            .mount(&server)
            .await;

        let pair = exchange(AuthEndpoint::iam(&server.uri()), "refresh-old")
            .await
            .unwrap();

        assert_eq!(pair.token(), "Bearer new-access");
        assert_eq!(pair.refresh_token(), "refresh-new");
        assert!(pair.expires_at.is_some());
        assert!(!pair.is_expired());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_uaa_refresh_request_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(header("authorization", "Basic Y2Y6"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=uaa-refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "access_token": "uaa-access",
                    "refresh_token": "uaa-refresh-new",
                    "token_type": "bearer"
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let pair = exchange(AuthEndpoint::uaa(server.uri()), "uaa-refresh")
            .await
            .unwrap();

        assert_eq!(pair.token(), "bearer uaa-access");
        assert_eq!(pair.refresh_token(), "uaa-refresh-new");
        assert!(pair.expires_at.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_iam_error_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorCode": "BXNIM0407E",
                "errorMessage": "Provided refresh token is expired"
            })))
            .mount(&server)
            .await;

        let err = exchange(AuthEndpoint::iam(&server.uri()), "stale")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        assert!(err.to_string().contains("Provided refresh token is expired"));
        assert!(!err.is_retryable());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_uaa_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_token",
                "error_description": "Invalid refresh token (expired)"
            })))
            .mount(&server)
            .await;

        let err = exchange(AuthEndpoint::uaa(server.uri()), "stale")
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(err.is_authorization_error());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_server_error_is_retryable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = exchange(AuthEndpoint::iam(&server.uri()), "refresh")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(503));
        assert!(err.is_retryable());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = exchange(AuthEndpoint::iam(&server.uri()), "refresh").await;
        assert!(result.is_err());
    }
}

// =============================================================================
// Context Refresh Flow
// =============================================================================

mod context_refresh_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_refresh_iam_token_end_to_end() {
        init_tracing();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .and(body_string_contains("refresh_token=refresh-old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-access", "refresh-new")))
            .expect(1)
            .mount(&server)
            .await;

        let config = Arc::new(SessionConfig::from_settings(
            CoreSettings {
                iam_endpoint: server.uri(),
                iam_token: "Bearer old".into(),
                iam_refresh_token: "refresh-old".into(),
                http_timeout: 10,
                ..Default::default()
            },
            CfSettings::default(),
        ));

        let shared = config.clone();
        let token = tokio::task::spawn_blocking(move || {
            let ctx = DefaultPluginContext::new("/plugins/demo", shared).with_env(MemoryEnv::new());
            ctx.refresh_iam_token()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(token, "Bearer new-access");
        assert_eq!(config.iam_token(), "Bearer new-access");
        assert_eq!(config.iam_refresh_token(), "refresh-new");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_iam_endpoint_env_override_wins() {
        let configured = MockServer::start().await;
        let overridden = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a", "r")))
            .expect(0)
            .mount(&configured)
            .await;
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("from-env", "r2")))
            .expect(1)
            .mount(&overridden)
            .await;

        let config = Arc::new(SessionConfig::from_settings(
            CoreSettings {
                iam_endpoint: configured.uri(),
                iam_refresh_token: "refresh".into(),
                ..Default::default()
            },
            CfSettings::default(),
        ));

        let env = MemoryEnv::new().with_var("IAM_ENDPOINT", overridden.uri());
        let shared = config.clone();
        let token = tokio::task::spawn_blocking(move || {
            DefaultPluginContext::new("/plugins/demo", shared)
                .with_env(env)
                .refresh_iam_token()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(token, "Bearer from-env");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_refresh_leaves_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorCode": "BXNIM0407E",
                "errorMessage": "Provided refresh token is expired"
            })))
            .mount(&server)
            .await;

        let config = Arc::new(SessionConfig::from_settings(
            CoreSettings {
                iam_endpoint: server.uri(),
                iam_token: "Bearer old".into(),
                iam_refresh_token: "refresh-old".into(),
                ..Default::default()
            },
            CfSettings::default(),
        ));

        let shared = config.clone();
        let err = tokio::task::spawn_blocking(move || {
            DefaultPluginContext::new("/plugins/demo", shared)
                .with_env(MemoryEnv::new())
                .refresh_iam_token()
        })
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        assert_eq!(config.iam_token(), "Bearer old");
        assert_eq!(config.iam_refresh_token(), "refresh-old");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_refresh_uaa_token_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("refresh_token=uaa-refresh-old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "uaa-new",
                "refresh_token": "uaa-refresh-new",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = Arc::new(SessionConfig::from_settings(
            CoreSettings::default(),
            CfSettings {
                api_endpoint: "https://api.cf.example.com".into(),
                uaa_endpoint: server.uri(),
                access_token: "bearer old".into(),
                refresh_token: "uaa-refresh-old".into(),
                ..Default::default()
            },
        ));

        let shared = config.clone();
        let token = tokio::task::spawn_blocking(move || {
            DefaultPluginContext::new("/plugins/demo", shared)
                .with_env(MemoryEnv::new())
                .cf()
                .refresh_uaa_token()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(token, "bearer uaa-new");
        let cf = config.cf().settings();
        assert_eq!(cf.access_token, "bearer uaa-new");
        assert_eq!(cf.refresh_token, "uaa-refresh-new");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_connection_failure_is_network_error() {
        let config = Arc::new(SessionConfig::from_settings(
            CoreSettings {
                iam_endpoint: "http://127.0.0.1:1".into(),
                iam_refresh_token: "refresh".into(),
                http_timeout: 5,
                ..Default::default()
            },
            CfSettings::default(),
        ));

        let shared = config.clone();
        let err = tokio::task::spawn_blocking(move || {
            DefaultPluginContext::new("/plugins/demo", shared)
                .with_env(MemoryEnv::new())
                .refresh_iam_token()
        })
        .await
        .unwrap()
        .unwrap_err();

        assert!(matches!(err, cloud_plugin_sdk::Error::Network(_)));
        assert_eq!(config.iam_refresh_token(), "refresh");
    }
}
