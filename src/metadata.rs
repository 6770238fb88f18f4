//! Request metadata for a single call.

use http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Everything the [`Client`](crate::Client) needs to issue one request.
///
/// `path` is relative to the client's base address and may contain several
/// `/`-separated segments. Values added with [`segment`](Self::segment) are
/// appended as single, percent-encoded path segments, which is how caller
/// supplied identifiers should be attached. The segments `.` and `..`
/// cannot be expressed this way and are rejected when the request is built.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method.
    pub method: Method,

    /// The request path, relative to the base address.
    pub path: String,

    /// Extra path segments appended after `path`, each encoded on its own.
    pub segments: Vec<String>,

    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Query parameters, sent in insertion order.
    pub query_params: Vec<(String, String)>,

    /// The identifier of the resource this request targets, if any.
    ///
    /// Status mappers use it to build errors such as
    /// [`Error::NotFound`](crate::Error::NotFound).
    pub resource_id: Option<String>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            resource_id: None,
        }
    }

    /// Appends a single path segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Appends `id` as a path segment and records it as the targeted resource.
    pub fn resource(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.segments.push(id.clone());
        self.resource_id = Some(id);
        self
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Adds a query parameter only when `value` is present.
    pub fn with_optional_query_param<V: ToString>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.with_query_param(key, value),
            None => self,
        }
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}
