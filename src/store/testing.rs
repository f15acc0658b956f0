use error_stack::Report;
use futures::future::{BoxFuture, FutureExt};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{MemoryStore, PageQuery, PostStore, Result, StoreError};
use crate::schema::{NewPost, Post, PostAuthor, PostDocument};
use crate::types::{PostId, Timestamp, UserId};

/// Memory store wrapper that counts page queries, can fail on demand
/// and always suspends once before answering, like a remote store.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    pub inner: MemoryStore,
    queries: AtomicUsize,
    failures: AtomicUsize,
}

impl ScriptedStore {
    /// Store with `count` posts, post `n` created on day `n` of July 2024
    /// so that higher numbers are newer.
    pub fn with_posts(count: u32) -> Self {
        let store = Self::default();
        for n in 1..=count {
            let post = new_post(&format!("Post {n}"), n);
            let id = PostId::new(format!("{n:02}"));
            store
                .inner
                .insert_document(id, PostDocument::encode(&post))
                .unwrap();
        }
        store
    }

    pub fn fail_next(&self, times: usize) {
        self.failures.store(times, Ordering::SeqCst);
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl PostStore for ScriptedStore {
    fn query_page(&self, query: PageQuery) -> BoxFuture<'_, Result<Vec<Post>>> {
        async move {
            self.queries.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;

            let should_fail = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();

            if should_fail {
                return Err(Report::new(StoreError::Unavailable)
                    .attach_printable("scripted failure"));
            }
            self.inner.query_page(query).await
        }
        .boxed()
    }

    fn find<'a>(&'a self, id: &'a PostId) -> BoxFuture<'a, Result<Option<Post>>> {
        self.inner.find(id)
    }

    fn insert(&self, post: NewPost) -> BoxFuture<'_, Result<Post>> {
        self.inner.insert(post)
    }
}

pub fn new_post(title: &str, day: u32) -> NewPost {
    NewPost {
        title: title.into(),
        content: format!("Content of {title}"),
        author: PostAuthor {
            id: UserId::new("user1"),
            name: "Eddie Tor".into(),
        },
        created_at: Timestamp::from_ymd(2024, 7, day).unwrap_or_else(Timestamp::now),
        image_url: None,
    }
}
