//! The remote posts resource.

mod api;
mod client;
pub mod factory;
mod model;

pub use api::PostApi;
pub use client::PostClient;
pub use model::{Post, PostPage, PostQuery, DEFAULT_LIMIT};
