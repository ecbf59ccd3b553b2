//! Pooled upstream HTTP client with timeout and auth policy.
//!
//! # Responsibilities
//! - Own the single connection pool shared by every request handler
//! - Apply connect/total timeouts and the optional bearer token uniformly
//! - Classify failures into transport, status and payload errors
//! - Release the pool on shutdown

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::upstream::error::{UpstreamError, UpstreamResult};

/// Raw upstream answer: status and undecoded body.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Decode the body as JSON.
    ///
    /// 404 maps to `NotFound`, any other non-2xx to `Status`, and an
    /// undecodable body to `InvalidPayload`.
    pub fn into_json(self, url: &str) -> UpstreamResult<Value> {
        if self.status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound {
                url: url.to_string(),
            });
        }
        if !self.status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: self.status.as_u16(),
            });
        }

        serde_json::from_slice(&self.body).map_err(|e| UpstreamError::InvalidPayload {
            url: url.to_string(),
            reason: format!("body is not valid JSON ({})", e),
        })
    }
}

/// Upstream client wrapper.
///
/// The pool sits behind an [`ArcSwapOption`] so that [`shutdown`] can release
/// it from a shared reference while in-flight calls finish on their own clone.
/// Dropping a `fetch` future cancels the outbound request.
///
/// [`shutdown`]: UpstreamClient::shutdown
pub struct UpstreamClient {
    http: ArcSwapOption<reqwest::Client>,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Build the connection pool.
    ///
    /// # Arguments
    /// * `config` - Timeouts, bearer token and proxy policy
    ///
    /// # Returns
    /// A ready client, or `UpstreamError::Build` for unusable settings
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let connect_timeout = to_duration("connect_timeout_secs", config.connect_timeout_secs)?;
        let timeout = to_duration("timeout_secs", config.timeout_secs)?;

        let token = config.api_key.trim();
        let mut headers = HeaderMap::new();
        if !token.is_empty() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| UpstreamError::Build(format!("invalid API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("transit-proxy/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| UpstreamError::Build(e.to_string()))?;

        tracing::info!(
            connect_timeout_secs = config.connect_timeout_secs,
            timeout_secs = config.timeout_secs,
            bearer_auth = !token.is_empty(),
            "Upstream client initialized"
        );

        Ok(Self {
            http: ArcSwapOption::new(Some(Arc::new(http))),
            config: config.clone(),
        })
    }

    /// Issue a GET with `query` appended, returning status and body as-is.
    ///
    /// Only network-level failures are errors here; any status is returned.
    pub async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> UpstreamResult<UpstreamResponse> {
        let http = self.http.load_full().ok_or(UpstreamError::Closed)?;

        let response = http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| classify(url, e))?;

        Ok(UpstreamResponse { status, body })
    }

    /// Issue a GET and decode a JSON body.
    ///
    /// See [`UpstreamResponse::into_json`] for the status mapping.
    pub async fn fetch_json(&self, url: &str, query: &[(&str, &str)]) -> UpstreamResult<Value> {
        self.fetch(url, query).await?.into_json(url)
    }

    /// Release the connection pool. Safe to call more than once.
    pub fn shutdown(&self) {
        if self.http.swap(None).is_some() {
            tracing::info!("Upstream client shut down");
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.http.load().is_none()
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("connect_timeout_secs", &self.config.connect_timeout_secs)
            .field("timeout_secs", &self.config.timeout_secs)
            .field("bearer_auth", &!self.config.api_key.trim().is_empty())
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn classify(url: &str, source: reqwest::Error) -> UpstreamError {
    let url = url.to_string();
    if source.is_timeout() {
        UpstreamError::Timeout { url, source }
    } else {
        UpstreamError::Transport { url, source }
    }
}

fn to_duration(field: &str, secs: f64) -> UpstreamResult<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| UpstreamError::Build(format!("{} must be positive, got {}", field, secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> UpstreamConfig {
        UpstreamConfig {
            connect_timeout_secs: 1.0,
            timeout_secs: 2.0,
            api_key: String::new(),
            use_system_proxy: false,
        }
    }

    #[test]
    fn test_rejects_non_positive_timeout() {
        let mut config = test_config();
        config.timeout_secs = 0.0;
        let err = UpstreamClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));

        config.timeout_secs = f64::NAN;
        assert!(UpstreamClient::new(&config).is_err());
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        let mut config = test_config();
        config.api_key = "bad\nkey".into();
        assert!(matches!(
            UpstreamClient::new(&config),
            Err(UpstreamError::Build(_))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let client = UpstreamClient::new(&test_config()).unwrap();
        assert!(!client.is_closed());

        client.shutdown();
        client.shutdown();
        assert!(client.is_closed());

        let result = client.fetch("http://127.0.0.1:9/orgs", &[]).await;
        assert!(matches!(result, Err(UpstreamError::Closed)));
        let result = client.fetch_json("http://127.0.0.1:9/orgs", &[]).await;
        assert!(matches!(result, Err(UpstreamError::Closed)));
    }

    fn response(status: u16, body: &'static str) -> UpstreamResponse {
        UpstreamResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_into_json_status_mapping() {
        let url = "http://up/stops";

        let value = response(200, r#"[{"stopId":946}]"#).into_json(url).unwrap();
        assert_eq!(value[0]["stopId"], 946);

        assert!(matches!(
            response(404, "").into_json(url),
            Err(UpstreamError::NotFound { .. })
        ));
        assert!(matches!(
            response(503, "{}").into_json(url),
            Err(UpstreamError::Status { status: 503, .. })
        ));
        assert!(matches!(
            response(200, "<html>").into_json(url),
            Err(UpstreamError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let mut config = test_config();
        config.api_key = "super-secret".into();
        let client = UpstreamClient::new(&config).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("bearer_auth: true"));
    }
}
