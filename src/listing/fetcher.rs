use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::schema::Post;
use crate::store::{Cursor, PageQuery, PostStore};

/// Amount of posts requested per page.
pub const PAGE_SIZE: usize = 6;

#[derive(Debug, Error)]
#[error("Failed to fetch posts")]
pub struct FetchError;

/// One page of posts, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub posts: Vec<Post>,
    /// Points at the last post of this page, if any.
    pub next_cursor: Option<Cursor>,
    /// A short page means the store has nothing left.
    pub has_more: bool,
}

/// Issues page queries against a [`PostStore`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    store: Arc<dyn PostStore>,
}

impl Fetcher {
    #[must_use]
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip_all, name = "listing.fetch_page", fields(after = cursor.is_some()))]
    pub async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<Page, FetchError> {
        let query = match cursor {
            Some(cursor) => PageQuery::after(cursor.clone(), PAGE_SIZE),
            None => PageQuery::first(PAGE_SIZE),
        };

        let posts = self
            .store
            .query_page(query)
            .await
            .change_context(FetchError)?;

        let next_cursor = posts.last().map(Cursor::after);
        let has_more = posts.len() == PAGE_SIZE;
        tracing::debug!(fetched = posts.len(), has_more, "fetched a page of posts");

        Ok(Page {
            posts,
            next_cursor,
            has_more,
        })
    }
}
