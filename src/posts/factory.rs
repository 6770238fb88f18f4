//! Interchangeable ways of constructing the transport behind a [`PostClient`].
//!
//! Whichever strategy is used, the result is the same [`Client`] type with
//! the same status mapping, so callers see one contract:
//!
//! - [`ConfiguredClient`] resolves the base address from a [`ClientConfig`]
//!   by client identity.
//! - A [`ClientBuilder`] assembled by hand.
//! - [`RawTransport`] wraps a `reqwest::Client` the caller already owns.
//! - An existing [`Client`], shared as is.
//!
//! [`PostClient`]: super::PostClient

use crate::config::ClientConfig;
use crate::{Client, ClientBuilder, Result};

/// The configuration identity posts clients are looked up under by default.
pub const POSTS_IDENTITY: &str = "posts";

/// A strategy that produces a configured [`Client`].
pub trait ClientFactory {
    /// Creates a client, or fails if the strategy's settings are invalid.
    fn create_client(&self) -> Result<Client>;
}

impl ClientFactory for Client {
    fn create_client(&self) -> Result<Client> {
        Ok(self.clone())
    }
}

impl ClientFactory for ClientBuilder {
    fn create_client(&self) -> Result<Client> {
        self.clone().build()
    }
}

/// Builds clients from a configuration entry.
///
/// ```
/// use postbind::{config::ClientConfig, ConfiguredClient, PostClient};
///
/// let config = ClientConfig::from_json_str(
///     r#"{ "clients": { "posts": { "url": "http://localhost:8080" } } }"#,
/// )
/// .unwrap();
///
/// let posts = PostClient::from_factory(&ConfiguredClient::posts(config)).unwrap();
/// assert_eq!(posts.client().base_url().as_str(), "http://localhost:8080/");
/// ```
#[derive(Debug, Clone)]
pub struct ConfiguredClient {
    config: ClientConfig,
    identity: String,
}

impl ConfiguredClient {
    /// Uses the `identity` entry of `config`.
    pub fn new(config: ClientConfig, identity: impl Into<String>) -> Self {
        Self {
            config,
            identity: identity.into(),
        }
    }

    /// Uses the [`POSTS_IDENTITY`] entry.
    pub fn posts(config: ClientConfig) -> Self {
        Self::new(config, POSTS_IDENTITY)
    }

    /// The configuration identity this factory resolves.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl ClientFactory for ConfiguredClient {
    fn create_client(&self) -> Result<Client> {
        self.config.builder_for(&self.identity)?.build()
    }
}

/// Builds clients on top of a caller-supplied `reqwest::Client`.
///
/// Every client created shares the given connection pool.
#[derive(Debug, Clone)]
pub struct RawTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl RawTransport {
    /// Wraps `http_client`, resolving requests against `base_url`.
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }
}

impl ClientFactory for RawTransport {
    fn create_client(&self) -> Result<Client> {
        ClientBuilder::new()
            .base_url(&self.base_url)?
            .http_client(self.http_client.clone())
            .build()
    }
}
