//! Access token retrieval from the helpdesk backend

use crate::error::TokenError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Source of short-lived call access tokens
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Request a fresh access token for one call
    async fn fetch_token(&self) -> Result<String, TokenError>;
}

/// Body returned by `POST /create-web-call`
#[derive(Debug, Deserialize)]
pub struct CreateWebCallResponse {
    /// Token handed to the call session
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Token source backed by `POST {base_url}/create-web-call`
///
/// No timeout is applied: a hung backend leaves the request pending.
pub struct HttpTokenSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTokenSource {
    /// Create a token source for the given base URL
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a token source sharing an existing HTTP client
    pub fn with_client(client: reqwest::Client, base_url: impl AsRef<str>) -> Self {
        let endpoint = format!(
            "{}/create-web-call",
            base_url.as_ref().trim_end_matches('/')
        );
        Self { client, endpoint }
    }

    /// The full URL tokens are requested from
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TokenSource for HttpTokenSource {
    async fn fetch_token(&self) -> Result<String, TokenError> {
        debug!("[TOKEN] POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .send()
            .await
            .map_err(|e| TokenError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TokenError::Request(e.to_string()))?;
        parse_token_response(&body)
    }
}

/// Extract the access token from a token endpoint response body
pub fn parse_token_response(body: &[u8]) -> Result<String, TokenError> {
    let parsed: CreateWebCallResponse =
        serde_json::from_slice(body).map_err(|e| TokenError::Decode(e.to_string()))?;

    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(TokenError::MissingToken),
    }
}
