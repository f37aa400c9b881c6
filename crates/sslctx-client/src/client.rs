//! HTTP client for the SSL context API.

use crate::api::{CertificateApi, IndexApi};
use crate::config::Credentials;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use sslctx_core::{Result, SslContextError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Path of the index resource, relative to the server base URL
pub(crate) const INDEX_PATH: &str = "api/v2/";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the SSL context API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct SslContextClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: Url,
    credentials: Credentials,
}

impl std::fmt::Debug for SslContextClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SslContextClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl SslContextClient {
    /// Create a client for the server at `base_url` using default settings
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        SslContextClientBuilder::new(base_url).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(base_url: impl AsRef<str>) -> SslContextClientBuilder {
        SslContextClientBuilder::new(base_url)
    }

    /// Server base URL, always ending in `/`
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Access the API index
    #[must_use]
    pub fn index(&self) -> IndexApi<'_> {
        IndexApi::new(self)
    }

    /// Access certificate collections and trust actions
    #[must_use]
    pub fn certificates(&self) -> CertificateApi<'_> {
        CertificateApi::new(self)
    }

    /// Resolve a link href against the base URL
    pub fn resolve(&self, href: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(href)
            .map_err(|e| SslContextError::InvalidUrl(format!("{href}: {e}")))
    }

    /// GET a HAL resource and parse it
    pub async fn get<T: DeserializeOwned>(&self, href: &str) -> Result<T> {
        let url = self.resolve(href)?;
        debug!(url = %url, "GET request");

        let response = self
            .request(self.inner.http.get(url))
            .send()
            .await
            .map_err(|e| SslContextError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// POST to an action link without a body
    pub async fn post(&self, href: &str) -> Result<()> {
        let url = self.resolve(href)?;
        debug!(url = %url, "POST request");

        let response = self
            .request(self.inner.http.post(url))
            .send()
            .await
            .map_err(|e| SslContextError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    /// POST a raw binary body
    pub async fn post_binary(&self, href: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let url = self.resolve(href)?;
        debug!(url = %url, bytes = body.len(), content_type, "POST binary request");

        let response = self
            .request(self.inner.http.post(url))
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| SslContextError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    /// DELETE the resource behind a link
    pub async fn delete(&self, href: &str) -> Result<()> {
        let url = self.resolve(href)?;
        debug!(url = %url, "DELETE request");

        let response = self
            .request(self.inner.http.delete(url))
            .send()
            .await
            .map_err(|e| SslContextError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        self.inner.credentials.apply(builder)
    }

    /// Handle a response that carries a JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| SslContextError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(SslContextError::Json)
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Handle a response whose body is ignored
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to an [`SslContextError`]
    async fn handle_error<T>(&self, status: u16, response: reqwest::Response) -> Result<T> {
        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();

        // Error bodies are JSON with a `message`, but proxies answer with anything
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or(body);

        warn!(url = %url, status, "request failed");

        match status {
            401 => Err(SslContextError::Unauthorized),
            403 => Err(SslContextError::Forbidden(message)),
            404 => Err(SslContextError::NotFound {
                resource: url.to_string(),
            }),
            _ => Err(SslContextError::Api {
                code: status,
                message,
            }),
        }
    }
}

/// Builder for configuring an [`SslContextClient`]
pub struct SslContextClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    credentials: Credentials,
}

impl SslContextClientBuilder {
    /// Create a new builder for the server at `base_url`
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("sslctx/{}", env!("CARGO_PKG_VERSION")),
            credentials: Credentials::None,
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the credentials
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<SslContextClient> {
        let base_url = normalize_base_url(&self.base_url)?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| SslContextError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(SslContextClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                credentials: self.credentials,
            }),
        })
    }
}

/// Parse the base URL and make sure relative hrefs join below it
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| SslContextError::InvalidUrl(format!("{raw}: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(SslContextError::InvalidUrl(format!("{raw}: not a base URL")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
