use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub detail: String,
}

#[derive(Debug)]
pub enum SdkError {
    /// The proxy could not be reached.
    Http(reqwest::Error),
    /// The proxy answered with an error status.
    Api(ApiError),
    /// The proxy answered 2xx with a body that is not the expected JSON.
    Decode(serde_json::Error),
}

impl std::fmt::Display for SdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdkError::Http(e) => write!(f, "HTTP error: {}", e),
            SdkError::Api(e) => write!(f, "Proxy returned error status {}: {}", e.status, e.detail),
            SdkError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for SdkError {}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        SdkError::Http(e)
    }
}

pub struct TransitClient {
    client: Client,
    proxy_url: String,
}

impl TransitClient {
    pub fn new(proxy_url: &str) -> Self {
        Self::with_client(Client::new(), proxy_url)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxy settings).
    pub fn with_client(client: Client, proxy_url: &str) -> Self {
        Self {
            client,
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    /// Organization list, optionally filtered.
    pub async fn orgs(&self, search: Option<&str>) -> Result<Vec<Value>, SdkError> {
        let mut query = Vec::new();
        if let Some(q) = search {
            query.push(("q", q));
        }
        self.get("/orgs-data", &query).await
    }

    /// Routes of one organization.
    pub async fn routes(&self, org_id: &str) -> Result<Vec<Value>, SdkError> {
        self.get("/routes-data", &[("orgId", org_id)]).await
    }

    pub async fn meta(&self, org_id: &str, route_id: &str) -> Result<Value, SdkError> {
        self.get("/meta", &[("orgId", org_id), ("routeId", route_id)]).await
    }

    pub async fn stops(&self, org_id: &str, route_id: &str) -> Result<Value, SdkError> {
        self.get("/stops", &[("orgId", org_id), ("routeId", route_id)]).await
    }

    pub async fn vehicles(&self, org_id: &str, route_id: &str) -> Result<Value, SdkError> {
        self.get("/vehicles", &[("orgId", org_id), ("routeId", route_id)]).await
    }

    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, SdkError>
    where
        T: serde::de::DeserializeOwned,
    {
        let resp = self
            .client
            .get(format!("{}{}", self.proxy_url, path))
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let err = serde_json::from_str::<ApiError>(&text).unwrap_or(ApiError {
                status: status.as_u16(),
                detail: text,
            });
            return Err(SdkError::Api(err));
        }

        serde_json::from_str(&text).map_err(SdkError::Decode)
    }
}
