//! Base address resolution keyed by client identity.
//!
//! A [`ClientConfig`] maps identities such as `"posts"` to the settings a
//! client is built from. It is read from JSON and can be overridden from the
//! environment:
//!
//! ```
//! use postbind::config::ClientConfig;
//!
//! let config = ClientConfig::from_json_str(
//!     r#"{ "clients": { "posts": { "url": "http://localhost:8080" } } }"#,
//! )
//! .unwrap()
//! .with_overrides("APP", [("APP_POSTS_URL".to_string(), "http://posts:9000".to_string())]);
//!
//! assert_eq!(config.settings("posts").unwrap().url, "http://posts:9000");
//! ```

use crate::{ClientBuilder, Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Settings for one client identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    /// The base address.
    pub url: String,

    /// Headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ClientSettings {
    /// Settings with the given base address and no extra headers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }
}

/// Client settings for every configured identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    clients: BTreeMap<String, ClientSettings>,
}

impl ClientConfig {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the document is not valid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("Invalid client configuration: {}", e)))
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Adds or replaces the settings for `identity`.
    pub fn insert(&mut self, identity: impl Into<String>, settings: ClientSettings) {
        self.clients.insert(identity.into(), settings);
    }

    /// Returns the settings for `identity`, if configured.
    pub fn settings(&self, identity: &str) -> Option<&ClientSettings> {
        self.clients.get(identity)
    }

    /// Applies `{PREFIX}_{IDENTITY}_URL` overrides from `vars`.
    ///
    /// The identity part is matched upper-cased with `-` and `.` read as
    /// `_`. When several identities share that form, the first in sorted
    /// order is overridden. An override for an identity that is not
    /// configured adds it.
    pub fn with_overrides<I>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}_", prefix.to_ascii_uppercase());
        for (key, value) in vars {
            let Some(identity) = key
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix("_URL"))
            else {
                continue;
            };
            if identity.is_empty() {
                continue;
            }

            let existing = self
                .clients
                .keys()
                .find(|name| env_key(name) == identity)
                .cloned();
            let name = existing.unwrap_or_else(|| identity.to_ascii_lowercase());

            tracing::debug!(identity = %name, url = %value, "Base address overridden");
            self.clients
                .entry(name)
                .and_modify(|settings| settings.url = value.clone())
                .or_insert_with(|| ClientSettings::new(value));
        }
        self
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self, prefix: &str) -> Self {
        self.with_overrides(prefix, std::env::vars())
    }

    /// Returns a builder preconfigured for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the identity is not configured, or
    /// an error if its URL or headers are invalid.
    pub fn builder_for(&self, identity: &str) -> Result<ClientBuilder> {
        let settings = self.settings(identity).ok_or_else(|| {
            Error::Configuration(format!("No base address configured for client `{}`", identity))
        })?;

        let mut builder = ClientBuilder::new().base_url(&settings.url)?;
        for (name, value) in &settings.headers {
            builder = builder.default_header(name, value)?;
        }
        Ok(builder)
    }
}

fn env_key(identity: &str) -> String {
    identity
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}
