//! Error types for the posts client.
//!
//! Transport and protocol failures are kept apart from domain errors such as
//! [`Error::NotFound`], so callers can branch on what went wrong without
//! inspecting status codes themselves. Raw response bodies are preserved
//! wherever the server sent one.

use http::{HeaderMap, StatusCode};

/// The error type for every client operation.
///
/// # Examples
///
/// ```no_run
/// use postbind::{Client, Error, PostApi, PostClient};
///
/// # async fn example() -> Result<(), Error> {
/// let posts = PostClient::new(
///     Client::builder()
///         .base_url("https://api.example.com")?
///         .build()?,
/// );
///
/// match posts.get_by_id("42").await {
///     Ok(post) => println!("{}", post.title),
///     Err(Error::NotFound { id }) => eprintln!("no post {id}"),
///     Err(Error::HttpStatus { status, raw_response, .. }) => {
///         eprintln!("HTTP error {status}: {raw_response}");
///     }
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level failure (connection refused, DNS, broken stream).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response (status {status}): {message}")]
    Decode {
        /// The raw response body that failed to decode
        raw_response: String,
        /// What was wrong with it
        message: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The server returned a non-2xx status that no mapper claimed.
    #[error("HTTP error {status}: {raw_response}")]
    HttpStatus {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The requested resource does not exist.
    #[error("Resource not found: {id}")]
    NotFound {
        /// The identifier that was looked up
        id: String,
    },

    /// A per-call input was rejected before any request was sent.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid client configuration, such as a missing base address or a bad header.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Decode { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpStatus { raw_response, .. } => Some(raw_response),
            Error::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` for [`Error::NotFound`].
    ///
    /// ```
    /// use postbind::Error;
    ///
    /// let err = Error::NotFound { id: "7".to_string() };
    /// assert!(err.is_not_found());
    /// assert!(!Error::InvalidQuery("limit".to_string()).is_not_found());
    /// ```
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// A specialized `Result` type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
