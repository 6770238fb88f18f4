//! HTTP implementation of [`PostApi`].

use super::api::PostApi;
use super::factory::ClientFactory;
use super::model::{Post, PostQuery};
use crate::{metadata::RequestMetadata, Client, Error, Response, Result};
use async_trait::async_trait;
use http::Method;

const RESOURCE: &str = "posts";

/// Typed client for the remote posts resource.
///
/// Requests go to `{base}/posts`, `{base}/posts/count` and
/// `{base}/posts/{id}`. A 404 on a lookup by id is reported as
/// [`Error::NotFound`].
///
/// # Examples
///
/// ```no_run
/// use postbind::{Client, PostApi, PostClient, PostQuery};
///
/// # async fn example() -> Result<(), postbind::Error> {
/// let posts = PostClient::new(
///     Client::builder()
///         .base_url("https://api.example.com")?
///         .build()?,
/// );
///
/// let page = posts.get_all_posts(&PostQuery::new().filter("rust")).await?;
/// println!("{} of {} posts", page.items.len(), page.total_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PostClient {
    client: Client,
}

impl PostClient {
    /// Creates a posts client on top of `client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the underlying client with `factory`.
    pub fn from_factory<F>(factory: &F) -> Result<Self>
    where
        F: ClientFactory + ?Sized,
    {
        Ok(Self::new(factory.create_client()?))
    }

    /// The transport this client sends requests through.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PostApi for PostClient {
    async fn count_all(&self, q: Option<&str>) -> Result<u64> {
        let metadata = RequestMetadata::new(Method::GET, RESOURCE)
            .segment("count")
            .with_optional_query_param("q", q);

        Ok(self.client.call::<u64>(metadata).await?.data)
    }

    async fn list_all(&self, query: &PostQuery) -> Result<Vec<Post>> {
        if query.limit == 0 {
            return Err(Error::InvalidQuery("limit must be positive".to_string()));
        }

        let metadata = RequestMetadata::new(Method::GET, RESOURCE)
            .with_optional_query_param("q", query.q.as_deref())
            .with_query_param("offset", query.offset)
            .with_query_param("limit", query.limit);

        let response = self.client.call::<Vec<Post>>(metadata).await?;
        ensure_ids(&response, response.data.iter())?;

        let limit = query.limit as usize;
        let mut posts = response.data;
        if posts.len() > limit {
            tracing::warn!(
                returned = posts.len(),
                limit = limit,
                "Server returned more posts than requested, truncating"
            );
            posts.truncate(limit);
        }
        Ok(posts)
    }

    async fn get_by_id(&self, id: &str) -> Result<Post> {
        if id.is_empty() {
            return Err(Error::InvalidQuery("post id must not be empty".to_string()));
        }

        let metadata = RequestMetadata::new(Method::GET, RESOURCE).resource(id);
        let response = self.client.call::<Post>(metadata).await?;
        ensure_ids(&response, std::iter::once(&response.data))?;
        Ok(response.data)
    }
}

/// Rejects decoded posts with an empty identifier.
fn ensure_ids<'a, T>(
    response: &Response<T>,
    mut posts: impl Iterator<Item = &'a Post>,
) -> Result<()> {
    if posts.any(|post| post.id.is_empty()) {
        tracing::error!(raw_response = %response.raw_body, "Post with empty id in response");
        return Err(Error::Decode {
            raw_response: response.raw_body.clone(),
            message: "post id must not be empty".to_string(),
            status: response.status,
        });
    }
    Ok(())
}
