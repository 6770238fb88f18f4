//! Mapping of non-2xx responses onto domain errors.
//!
//! Every non-2xx response is offered to the client's chain of
//! [`StatusMapper`]s before a generic [`Error::HttpStatus`] is raised. Custom
//! mappers are consulted first, and the chain always ends with
//! [`NotFoundMapper`].

use crate::{metadata::RequestMetadata, Error};
use http::{HeaderMap, StatusCode};
use std::sync::Arc;

/// A failed response as seen by a [`StatusMapper`].
#[derive(Debug, Clone, Copy)]
pub struct HttpFailure<'a> {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: &'a HeaderMap,
    /// The raw response body.
    pub body: &'a str,
    /// The request that produced the response.
    pub request: &'a RequestMetadata,
}

impl HttpFailure<'_> {
    /// The identifier of the resource the request targeted, if any.
    pub fn resource_id(&self) -> Option<&str> {
        self.request.resource_id.as_deref()
    }
}

/// Converts selected failed responses into domain errors.
///
/// Return `Some(error)` to raise that error instead of the generic
/// [`Error::HttpStatus`], or `None` to let the next mapper decide.
///
/// Closures taking an [`HttpFailure`] implement this trait, so a mapping can
/// be written inline:
///
/// ```
/// use postbind::{Error, mapping::HttpFailure, Client};
///
/// # fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .status_mapper(|failure: &HttpFailure<'_>| {
///         (failure.status.as_u16() == 410)
///             .then(|| Error::InvalidQuery(format!("gone: {}", failure.body)))
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub trait StatusMapper: Send + Sync {
    /// Returns the domain error for `failure`, if this mapper recognises it.
    fn map(&self, failure: &HttpFailure<'_>) -> Option<Error>;
}

impl<F> StatusMapper for F
where
    F: Fn(&HttpFailure<'_>) -> Option<Error> + Send + Sync,
{
    fn map(&self, failure: &HttpFailure<'_>) -> Option<Error> {
        self(failure)
    }
}

/// Maps a 404 on a request that names a resource to [`Error::NotFound`].
///
/// 404s on collection requests (no resource id) are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundMapper;

impl StatusMapper for NotFoundMapper {
    fn map(&self, failure: &HttpFailure<'_>) -> Option<Error> {
        if failure.status != StatusCode::NOT_FOUND {
            return None;
        }
        failure.resource_id().map(|id| Error::NotFound { id: id.to_string() })
    }
}

/// An ordered list of mappers; the first one to yield an error wins.
#[derive(Clone)]
pub struct MapperChain {
    mappers: Vec<Arc<dyn StatusMapper>>,
}

impl MapperChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            mappers: Vec::new(),
        }
    }

    /// Appends a mapper to the end of the chain.
    pub fn push(&mut self, mapper: Arc<dyn StatusMapper>) {
        self.mappers.push(mapper);
    }

    /// Number of mappers in the chain.
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// Returns `true` if the chain holds no mappers.
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Runs the chain, stopping at the first mapper that yields an error.
    pub fn map(&self, failure: &HttpFailure<'_>) -> Option<Error> {
        self.mappers.iter().find_map(|m| m.map(failure))
    }
}

impl Default for MapperChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MapperChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperChain")
            .field("len", &self.mappers.len())
            .finish()
    }
}
