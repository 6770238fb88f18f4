//! Fetches a page of posts and looks one up by id.
//!
//! The base address comes from `clients.json` when present, otherwise from
//! `POSTS_URL` (default `http://localhost:8080`). `APP_POSTS_URL` overrides
//! either.
//!
//! Run with: `cargo run --example fetch_posts -- [filter]`

use postbind::config::{ClientConfig, ClientSettings};
use postbind::{ConfiguredClient, Error, PostApi, PostClient, PostQuery};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postbind=info".into()),
        )
        .init();

    let mut config = match ClientConfig::from_path("clients.json") {
        Ok(config) => config,
        Err(_) => ClientConfig::new(),
    };
    if config.settings("posts").is_none() {
        let url = std::env::var("POSTS_URL").unwrap_or_else(|_| "http://localhost:8080".into());
        config.insert("posts", ClientSettings::new(url));
    }
    let config = config.with_env_overrides("APP");

    let posts = PostClient::from_factory(&ConfiguredClient::posts(config))?;

    let mut query = PostQuery::new().limit(5);
    if let Some(filter) = std::env::args().nth(1) {
        query = query.filter(filter);
    }

    println!("=== Page with total count ===");
    let page = posts.get_all_posts(&query).await?;
    println!("Showing {} of {} posts", page.items.len(), page.total_count);
    for post in &page.items {
        println!("  {}: {}", post.id, post.title);
    }
    println!();

    println!("=== Lookup by id ===");
    let id = page
        .items
        .first()
        .map(|post| post.id.clone())
        .unwrap_or_else(|| "1".to_string());
    for id in [id.as_str(), "does-not-exist"] {
        match posts.get_by_id(id).await {
            Ok(post) => println!("Found {}: {}", post.id, post.title),
            Err(Error::NotFound { id }) => println!("No post with id {}", id),
            Err(e) => println!("Lookup failed: {}", e),
        }
    }

    Ok(())
}
