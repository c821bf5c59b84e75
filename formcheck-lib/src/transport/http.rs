//! HTTP transport over reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderValue;
use url::Url;

use super::ValidationRequest;
use super::ValidationTransport;
use crate::error::BuildError;
use crate::error::TransportError;
use crate::model::ErrorMap;

/// Posts the form as JSON to a validation endpoint.
///
/// A 2xx answer is read as an [`ErrorMap`]; an empty body counts as "no
/// errors". Any other status is a [`TransportError::Http`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use formcheck_lib::transport::HttpTransport;
///
/// let transport = HttpTransport::new("https://app.example.com/users/validate")
///     .unwrap()
///     .timeout(Duration::from_secs(10));
/// assert_eq!(transport.endpoint().path(), "/users/validate");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    client: Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport for an absolute endpoint URL.
    pub fn new(endpoint: &str) -> Result<Self, BuildError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| BuildError::InvalidUrl(format!("{endpoint}: {e}")))?;
        let client = Client::builder().build()?;
        Ok(Self {
            endpoint,
            client,
            timeout: None,
        })
    }

    /// Sets a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ValidationTransport for HttpTransport {
    async fn check(&self, request: ValidationRequest) -> Result<ErrorMap, TransportError> {
        let mut headers = request.headers;
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("application/json"));

        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .headers(headers)
            .json(&request.body);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(TransportError::http(status.as_u16(), message));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(ErrorMap::new());
        }

        serde_json::from_str(&body).map_err(|e| TransportError::parse_with_body(e.to_string(), body))
    }
}
