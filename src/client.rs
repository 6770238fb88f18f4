//! HTTP transport with typed decoding and status-to-domain error mapping.
//!
//! The [`Client`] type resolves request paths against a base address, runs
//! them over a pooled `reqwest` connection and decodes JSON bodies. Use
//! [`ClientBuilder`] to configure and create clients.

use crate::{
    mapping::{HttpFailure, MapperChain, NotFoundMapper, StatusMapper},
    metadata::RequestMetadata,
    Error, Response, Result,
};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// A typed HTTP client bound to one base address.
///
/// Cloning is cheap: clones share the connection pool and configuration.
/// Independently built clients never share a pool.
///
/// # Examples
///
/// ```no_run
/// use postbind::Client;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Post {
///     id: String,
///     title: String,
/// }
///
/// # async fn example() -> Result<(), postbind::Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
///
/// let post = client.get::<Post>("posts/1").await?;
/// println!("{}: {}", post.data.id, post.data.title);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    default_headers: HeaderMap,
    mappers: MapperChain,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base address every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Issues the described request and decodes the body as `Res`.
    ///
    /// Non-2xx responses go through the status mapper chain; if no mapper
    /// claims the failure an [`Error::HttpStatus`] is returned.
    ///
    /// ```no_run
    /// use postbind::{Client, metadata::RequestMetadata};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), postbind::Error> {
    /// let client = Client::builder()
    ///     .base_url("https://api.example.com")?
    ///     .build()?;
    ///
    /// let metadata = RequestMetadata::new(Method::GET, "posts/count")
    ///     .with_query_param("q", "rust");
    /// let count = client.call::<u64>(metadata).await?;
    /// println!("{} matching posts", count.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<Res>(&self, metadata: RequestMetadata) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let start_time = Instant::now();

        let result = match self.execute_request(&metadata).await {
            Ok(response) => self.parse_response(response, &metadata, start_time).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            tracing::warn!(
                error = %e,
                method = %metadata.method,
                path = %metadata.path,
                "Request failed"
            );
        }

        result
    }

    /// Makes a GET request to `path`, relative to the base address.
    pub async fn get<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        self.call(RequestMetadata::new(Method::GET, path)).await
    }

    /// Resolves the request against the base address, keeping any path prefix.
    fn build_url(&self, metadata: &RequestMetadata) -> Result<Url> {
        let mut url = self.inner.base_url.clone();

        if let Some(dot) = metadata.segments.iter().find(|s| *s == "." || *s == "..") {
            return Err(Error::InvalidQuery(format!(
                "path segment `{}` cannot be sent as a single segment",
                dot
            )));
        }

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Configuration(format!(
                    "Base URL cannot carry a path: {}",
                    self.inner.base_url
                ))
            })?;
            segments.pop_if_empty();
            segments.extend(metadata.path.split('/').filter(|s| !s.is_empty()));
            segments.extend(&metadata.segments);
        }

        if !metadata.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &metadata.query_params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn execute_request(&self, metadata: &RequestMetadata) -> Result<reqwest::Response> {
        let url = self.build_url(metadata)?;

        tracing::debug!(
            method = %metadata.method,
            url = %url,
            "Executing HTTP request"
        );

        let mut request = self.inner.http_client.request(metadata.method.clone(), url);

        for (name, value) in &self.inner.default_headers {
            request = request.header(name, value);
        }

        for (name, value) in &metadata.headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;

        Ok(response)
    }

    async fn parse_response<Res>(
        &self,
        response: reqwest::Response,
        metadata: &RequestMetadata,
        start_time: Instant,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let raw_response = response.text().await.unwrap_or_default();
            log_response(status, start_time.elapsed());

            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Client error (4xx)"
                );
            } else if status.is_server_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Server error (5xx)"
                );
            }

            let failure = HttpFailure {
                status,
                headers: &headers,
                body: &raw_response,
                request: metadata,
            };
            if let Some(mapped) = self.inner.mappers.map(&failure) {
                tracing::debug!(
                    status = status.as_u16(),
                    error = %mapped,
                    "Status mapped to domain error"
                );
                return Err(mapped);
            }

            return Err(Error::HttpStatus {
                status,
                raw_response,
                headers,
            });
        }

        let raw_body = response.text().await?;
        let latency = start_time.elapsed();
        log_response(status, latency);

        match serde_json::from_str::<Res>(&raw_body) {
            Ok(data) => Ok(Response::new(data, raw_body, status, headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to decode response"
                );

                Err(Error::Decode {
                    raw_response: raw_body,
                    message: e.to_string(),
                    status,
                })
            }
        }
    }
}

fn log_response(status: http::StatusCode, latency: Duration) {
    tracing::info!(
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        "Received HTTP response"
    );
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("mappers", &self.inner.mappers)
            .finish()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// A builder is cloneable, and each [`build`](Self::build) produces an
/// independent client with its own connection pool unless a transport was
/// injected with [`http_client`](Self::http_client).
///
/// # Examples
///
/// ```no_run
/// use postbind::ClientBuilder;
///
/// # fn example() -> Result<(), postbind::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.example.com/v1")?
///     .default_header("x-api-key", "secret")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct ClientBuilder {
    base_url: Option<Url>,
    default_headers: HeaderMap,
    mappers: Vec<Arc<dyn StatusMapper>>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base address for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Adds a status mapper.
    ///
    /// Mappers run in the order they were added, ahead of the built-in
    /// [`NotFoundMapper`].
    pub fn status_mapper<M>(mut self, mapper: M) -> Self
    where
        M: StatusMapper + 'static,
    {
        self.mappers.push(Arc::new(mapper));
        self
    }

    /// Uses an externally assembled `reqwest::Client` as the transport.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided or the transport could
    /// not be created.
    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Configuration("Base URL is required".to_string()))?;

        let http_client = match self.http_client {
            Some(http_client) => http_client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        let mut mappers = MapperChain::new();
        for mapper in self.mappers {
            mappers.push(mapper);
        }
        mappers.push(Arc::new(NotFoundMapper));

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                default_headers: self.default_headers,
                mappers,
            }),
        })
    }
}
