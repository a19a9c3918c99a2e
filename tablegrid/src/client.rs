//! HTTP transport seam and the reqwest-backed production client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;

/// Trait for the HTTP surface a grid talks to.
///
/// The grid only ever needs two calls: a GET returning a JSON payload and a
/// POST carrying a JSON body. Production code uses [`RestClient`]; tests
/// substitute a mock.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET request with query-string pairs, returning the
    /// deserialized JSON payload.
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError>;

    /// Issues a POST request with a JSON body, returning the deserialized
    /// JSON payload (or `Value::Null` for an empty response body).
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

/// The production [`Transport`]: reqwest against a fixed origin.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across grids safely. Grid URLs are paths (`/api/customer`) resolved
/// against the configured origin.
///
/// # Example
///
/// ```ignore
/// use tablegrid::RestClient;
/// use std::time::Duration;
///
/// let client = RestClient::builder()
///     .origin("https://app.example.com")
///     .timeout(Duration::from_secs(30))
///     .build();
/// ```
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    origin: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl RestClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> RestClientBuilder<Missing> {
        RestClientBuilder::new()
    }

    /// Returns the origin requests resolve against.
    pub fn origin(&self) -> &str {
        &self.inner.origin
    }

    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let base = Url::parse(&self.inner.origin)
            .map_err(|_| ApiError::InvalidUrl(self.inner.origin.clone()))?;
        base.join(path)
            .map_err(|_| ApiError::InvalidUrl(format!("{}{}", self.inner.origin, path)))
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;
        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), body));
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|source| ApiError::parse_with_body(source.to_string(), body))
    }
}

#[async_trait]
impl Transport for RestClient {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.resolve(path)?;
        let mut request = self.inner.http_client.get(url).query(query);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(ApiError::from)?;
        Self::read_json(response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.resolve(path)?;
        let mut request = self.inner.http_client.post(url).json(body);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(ApiError::from)?;
        Self::read_json(response).await
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

impl<T> Set<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(value)
    }

    pub(crate) fn into_inner(self) -> T {
        self.0
    }
}

/// Builder for constructing a [`RestClient`].
///
/// Uses the typestate pattern so the required `origin` must be set before
/// `build` becomes available.
pub struct RestClientBuilder<Origin> {
    origin: Origin,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl RestClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            origin: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the origin requests resolve against.
    ///
    /// # Example
    ///
    /// ```ignore
    /// .origin("https://app.example.com")
    /// ```
    pub fn origin(self, origin: impl Into<String>) -> RestClientBuilder<Set<String>> {
        RestClientBuilder {
            origin: Set(origin.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for RestClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> RestClientBuilder<O> {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl RestClientBuilder<Set<String>> {
    /// Builds the [`RestClient`].
    ///
    /// This method is only available once `origin` has been set.
    pub fn build(self) -> RestClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        RestClient {
            inner: Arc::new(RestClientInner {
                origin: self.origin.0,
                http_client,
                timeout: self.timeout,
            }),
        }
    }
}
