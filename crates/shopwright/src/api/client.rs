//! HTTP client for the board service.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::result::{ShopError, ShopResult};

/// Public board service endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com";

/// API key + token pair sent on every request
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredentials {
    /// Application key
    pub api_key: String,
    /// User token
    pub token: String,
}

impl ApiCredentials {
    /// Create credentials
    #[must_use]
    pub fn new(api_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            token: token.into(),
        }
    }

    /// `Content-Type: application/json` and `Authorization: Bearer <token>`
    pub fn headers(&self) -> ShopResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| ShopError::test_data(format!("token is not a valid header value: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"***")
            .field("token", &"***")
            .finish()
    }
}

/// Status plus decoded body of one call.
///
/// The body is `Null` for an empty response and a JSON string when the
/// service answered with plain text (it does for most 4xx/5xx errors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded body
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub(crate) async fn read(response: reqwest::Response) -> ShopResult<Self> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };
        Ok(Self { status, body })
    }

    /// 2xx status
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// `id` field of the body
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.body.get("id").and_then(serde_json::Value::as_str)
    }

    /// `name` field of the body
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.body.get("name").and_then(serde_json::Value::as_str)
    }

    /// Successful status and a body whose `name` equals `expected`
    #[must_use]
    pub fn name_echoes(&self, expected: &str) -> bool {
        self.is_success() && self.name() == Some(expected)
    }

    /// Assert creation succeeded; returns the new id.
    pub fn ensure_created(&self, expected_name: &str) -> ShopResult<&str> {
        if !self.name_echoes(expected_name) {
            return Err(ShopError::assertion(format!(
                "Failed to create '{expected_name}' or name does not match (status {}, body {})",
                self.status, self.body
            )));
        }
        self.id().ok_or_else(|| {
            ShopError::assertion(format!("created '{expected_name}' but response has no id"))
        })
    }

    /// Short rendering of the body for logs
    #[must_use]
    pub fn body_text(&self) -> String {
        match &self.body {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Board service client.
///
/// Every request carries `key` and `token` query parameters plus the
/// bearer/content-type headers.
#[derive(Debug, Clone)]
pub struct BoardClient {
    http: reqwest::Client,
    base_url: String,
    credentials: ApiCredentials,
}

impl BoardClient {
    /// Client for the public endpoint
    pub fn new(credentials: ApiCredentials) -> ShopResult<Self> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Client for `base_url` (e.g. a local stub)
    pub fn with_base_url(credentials: ApiCredentials, base_url: impl Into<String>) -> ShopResult<Self> {
        let http = reqwest::Client::builder()
            .default_headers(credentials.headers()?)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Endpoint root
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credentials in use
    #[must_use]
    pub const fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("key", self.credentials.api_key.as_str()),
            ("token", self.credentials.token.as_str()),
        ]
    }

    /// POST `path` with query `params`
    pub async fn post(&self, path: &str, params: &[(&str, &str)]) -> ShopResult<ApiResponse> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .query(params)
            .query(&self.auth())
            .send()
            .await?;
        ApiResponse::read(response).await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str) -> ShopResult<ApiResponse> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!("DELETE {url}");
        let response = self.http.delete(&url).query(&self.auth()).send().await?;
        ApiResponse::read(response).await
    }
}
