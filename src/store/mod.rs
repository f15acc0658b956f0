//! Post store: the document collection that owns every post.
//!
//! All queries are ordered by creation time, newest first, with the
//! post id as the tie-breaker so the ordering is total. Pages resume
//! from a [`Cursor`] pointing at the last post of the previous page.
use futures::future::BoxFuture;
use std::cmp::Ordering;
use std::fmt::Debug;
use thiserror::Error;

use crate::schema::{NewPost, Post};
use crate::types::PostId;

mod cursor;
mod memory;
mod postgres;

#[cfg(test)]
pub(crate) mod testing;

pub use cursor::{Cursor, InvalidCursor};
pub use memory::MemoryStore;
pub use postgres::PgPostStore;

pub type Result<T> = error_stack::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("post store is unavailable")]
    Unavailable,
    #[error("post store query failed")]
    Query,
    #[error("received a malformed post document")]
    Decode,
    #[error("invalid pagination cursor")]
    InvalidCursor,
}

/// A range query over the posts collection, ordered by creation
/// time descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Only posts strictly after this cursor are returned.
    pub start_after: Option<Cursor>,
    pub limit: usize,
}

impl PageQuery {
    #[must_use]
    pub fn first(limit: usize) -> Self {
        Self {
            start_after: None,
            limit,
        }
    }

    #[must_use]
    pub fn after(cursor: Cursor, limit: usize) -> Self {
        Self {
            start_after: Some(cursor),
            limit,
        }
    }
}

pub trait PostStore: Debug + Send + Sync {
    /// Returns at most `query.limit` posts in store order.
    fn query_page(&self, query: PageQuery) -> BoxFuture<'_, Result<Vec<Post>>>;

    fn find<'a>(&'a self, id: &'a PostId) -> BoxFuture<'a, Result<Option<Post>>>;

    /// Writes a new post and returns it with its store-assigned id.
    fn insert(&self, post: NewPost) -> BoxFuture<'_, Result<Post>>;
}

/// Store ordering: `created_at` descending, then id descending.
pub(crate) fn store_order(a: &Post, b: &Post) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}
