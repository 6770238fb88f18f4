//! # Postbind - a typed client for a remote posts resource
//!
//! Postbind exposes one capability set over HTTP, [`PostApi`]
//! (`count_all`, `list_all`, `get_by_id` and the concurrent `get_all_posts`),
//! and converts transport and status failures into a small [`Error`] enum.
//! Non-2xx responses pass through injectable [`StatusMapper`]s, so a 404 on a
//! lookup becomes [`Error::NotFound`] instead of a bare status error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use postbind::{Client, PostApi, PostClient, PostQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postbind::Error> {
//!     let posts = PostClient::new(
//!         Client::builder()
//!             .base_url("http://localhost:8080")?
//!             .build()?,
//!     );
//!
//!     // One page and the total count, fetched concurrently
//!     let page = posts.get_all_posts(&PostQuery::new().limit(5)).await?;
//!     println!("showing {} of {}", page.items.len(), page.total_count);
//!
//!     match posts.get_by_id("missing").await {
//!         Err(postbind::Error::NotFound { id }) => println!("no post {id}"),
//!         other => println!("{:?}", other),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Building clients
//!
//! Several strategies produce the same client, see [`ClientFactory`]:
//!
//! ```no_run
//! use postbind::{config::ClientConfig, ConfiguredClient, PostClient};
//!
//! # fn example() -> Result<(), postbind::Error> {
//! let config = ClientConfig::from_path("clients.json")?.with_env_overrides("APP");
//! let posts = PostClient::from_factory(&ConfiguredClient::posts(config))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom status mapping
//!
//! ```no_run
//! use postbind::{mapping::HttpFailure, Client, Error};
//!
//! # fn example() -> Result<(), Error> {
//! let client = Client::builder()
//!     .base_url("http://localhost:8080")?
//!     .status_mapper(|failure: &HttpFailure<'_>| {
//!         (failure.status.as_u16() == 400).then(|| Error::InvalidQuery(failure.body.to_string()))
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod config;
mod error;
pub mod mapping;
pub mod metadata;
pub mod posts;
mod response;

pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use mapping::{NotFoundMapper, StatusMapper};
pub use posts::factory::{ClientFactory, ConfiguredClient, RawTransport};
pub use posts::{Post, PostApi, PostClient, PostPage, PostQuery};
pub use response::Response;
