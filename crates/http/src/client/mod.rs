//! Shop API client

pub mod admin;
pub mod cart;
pub mod error;
pub mod files;
pub mod order;
pub mod product;
pub mod user;

use error::ClientError;
use reqwest::{Client, ClientBuilder, Method, header};
use serde::de::DeserializeOwned;
use shop_core::SessionContext;
use shop_core::format::resolve_image_url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Request timeout applied when the builder is not given one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_USER_AGENT: &str = concat!("shop-client/", env!("CARGO_PKG_VERSION"));

/// Shop API client
///
/// Every request goes through [`ShopClient::request`], which presents the
/// current session token as a bearer credential, and
/// [`ShopClient::execute`], which hands `401` responses to the session before
/// returning them to the caller.
#[derive(Clone)]
pub struct ShopClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionContext>,
}

impl ShopClient {
    /// Create a new client with default configuration
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<dyn SessionContext>,
    ) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).session(session).build()
    }

    /// Create a new client builder
    pub fn builder() -> ShopClientBuilder {
        ShopClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a product image reference
    pub fn image_url(&self, image: Option<&str>) -> Option<String> {
        resolve_image_url(&self.base_url, image)
    }

    /// Create a request builder, authenticated when a session token exists
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let token = self.session.current_token();
        debug!(%method, path, authenticated = token.is_some(), "Preparing request");

        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        request
    }

    /// Send a request and decode the JSON body
    ///
    /// A `401` clears the session (which also redirects to the login page)
    /// and is still returned as [`ClientError::Unauthorized`]. Other failures
    /// are returned untouched. Nothing is retried.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.inspect_err(|e| {
            debug!(error = %e, timeout = e.is_timeout(), "Request did not complete");
        })?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            // Endpoints that answer with no body decode as JSON null
            let body: &[u8] = if body.is_empty() { b"null" } else { &body };
            return Ok(serde_json::from_slice(body)?);
        }

        let message = response.text().await.unwrap_or_default();
        let error = ClientError::from_status(status, &message);

        if error.is_unauthorized() {
            warn!(%status, "Backend rejected the session token");
            self.session.clear();
        } else {
            debug!(%status, error = %error, "Request failed");
        }

        Err(error)
    }
}

impl std::fmt::Debug for ShopClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Builder for `ShopClient`
#[derive(Default)]
pub struct ShopClientBuilder {
    base_url: Option<String>,
    session: Option<Arc<dyn SessionContext>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ShopClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session that supplies tokens and is cleared on `401`
    pub fn session(mut self, session: Arc<dyn SessionContext>) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the request timeout (defaults to [`DEFAULT_TIMEOUT`])
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ShopClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let session = self
            .session
            .ok_or_else(|| ClientError::Configuration("session is required".into()))?;

        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url}: {e}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            client_builder = client_builder.timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        client_builder = client_builder
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()));

        let client = client_builder.build()?;

        Ok(ShopClient {
            client,
            base_url,
            session,
        })
    }
}
