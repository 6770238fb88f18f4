//! The posts capability set.

use super::model::{Post, PostPage, PostQuery};
use crate::Result;
use async_trait::async_trait;

/// Read access to a remote posts resource.
///
/// [`PostClient`](super::PostClient) is the HTTP implementation; any other
/// source of posts can implement the three primitive operations and gets
/// [`get_all_posts`](Self::get_all_posts) for free.
#[async_trait]
pub trait PostApi: Send + Sync {
    /// Counts the posts matching `q` (all posts when `None`).
    async fn count_all(&self, q: Option<&str>) -> Result<u64>;

    /// Lists one page of posts in server order.
    async fn list_all(&self, query: &PostQuery) -> Result<Vec<Post>>;

    /// Looks up a single post.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when the
    /// post does not exist.
    async fn get_by_id(&self, id: &str) -> Result<Post>;

    /// Fetches a page and the total count concurrently and joins them.
    ///
    /// Both requests are in flight at the same time. If either fails, that
    /// error is returned and the other future is dropped.
    async fn get_all_posts(&self, query: &PostQuery) -> Result<PostPage> {
        let (items, total_count) =
            tokio::try_join!(self.list_all(query), self.count_all(query.q.as_deref()))?;
        Ok(PostPage { items, total_count })
    }
}
