use error_stack::{Report, ResultExt};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::json;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{store_order, PageQuery, PostStore, Result, StoreError};
use crate::schema::{NewPost, Post, PostDocument};
use crate::types::PostId;

const AUTO_ID_LENGTH: usize = 20;
const AUTO_ID_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// In-process document collection. Documents are kept in their raw
/// JSON form and decoded on every read, just like a remote document
/// database would hand them over.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<StoredDocument>>,
}

#[derive(Debug)]
struct StoredDocument {
    id: PostId,
    data: serde_json::Value,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store filled with a handful of sample posts.
    #[must_use]
    pub fn seeded() -> Self {
        let documents = sample_documents()
            .into_iter()
            .map(|(id, data)| StoredDocument {
                id: PostId::new(id),
                data,
            })
            .collect();

        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Inserts a raw document as-is, without any validation.
    pub fn insert_document(&self, id: PostId, data: serde_json::Value) -> Result<()> {
        self.write()?.push(StoredDocument { id, data });
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        self.read().map(|documents| documents.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<StoredDocument>>> {
        self.documents.read().map_err(|_| {
            Report::new(StoreError::Unavailable).attach_printable("document lock is poisoned")
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<StoredDocument>>> {
        self.documents.write().map_err(|_| {
            Report::new(StoreError::Unavailable).attach_printable("document lock is poisoned")
        })
    }

    fn decode_all(&self) -> Result<Vec<Post>> {
        self.read()?
            .iter()
            .map(|doc| PostDocument::decode(doc.id.clone(), doc.data.clone()))
            .collect::<error_stack::Result<Vec<_>, _>>()
            .change_context(StoreError::Decode)
    }

    #[tracing::instrument(skip_all, name = "store.memory.query_page", fields(
        after = query.start_after.is_some(),
        limit = query.limit,
    ))]
    fn query_page_now(&self, query: &PageQuery) -> Result<Vec<Post>> {
        let mut posts = self.decode_all()?;
        posts.sort_by(store_order);

        let page = posts
            .into_iter()
            .filter(|post| match &query.start_after {
                Some(cursor) => cursor.precedes(post),
                None => true,
            })
            .take(query.limit)
            .collect::<Vec<_>>();

        tracing::debug!(found = page.len(), "queried posts page");
        Ok(page)
    }

    #[tracing::instrument(skip_all, name = "store.memory.find", fields(%id))]
    fn find_now(&self, id: &PostId) -> Result<Option<Post>> {
        let documents = self.read()?;
        let Some(doc) = documents.iter().find(|doc| &doc.id == id) else {
            return Ok(None);
        };

        PostDocument::decode(doc.id.clone(), doc.data.clone())
            .change_context(StoreError::Decode)
            .map(Some)
    }

    #[tracing::instrument(skip_all, name = "store.memory.insert")]
    fn insert_now(&self, post: NewPost) -> Result<Post> {
        let mut documents = self.write()?;
        let id = loop {
            let candidate = PostId::new(random_string::generate(AUTO_ID_LENGTH, AUTO_ID_CHARSET));
            if !documents.iter().any(|doc| doc.id == candidate) {
                break candidate;
            }
        };

        let data = PostDocument::encode(&post);
        let decoded = PostDocument::decode(id.clone(), data.clone())
            .change_context(StoreError::Decode)?;
        documents.push(StoredDocument { id, data });

        tracing::debug!(id = %decoded.id, "inserted post");
        Ok(decoded)
    }
}

impl PostStore for MemoryStore {
    fn query_page(&self, query: PageQuery) -> BoxFuture<'_, Result<Vec<Post>>> {
        future::ready(self.query_page_now(&query)).boxed()
    }

    fn find<'a>(&'a self, id: &'a PostId) -> BoxFuture<'a, Result<Option<Post>>> {
        future::ready(self.find_now(id)).boxed()
    }

    fn insert(&self, post: NewPost) -> BoxFuture<'_, Result<Post>> {
        future::ready(self.insert_now(post)).boxed()
    }
}

fn sample_documents() -> Vec<(&'static str, serde_json::Value)> {
    vec![
        (
            "1",
            json!({
                "title": "Getting Started with Next.js 15",
                "content": "Next.js 15 brings a host of new features and improvements for developers. This post explores some of the key highlights, including enhanced server components, optimized image handling, and more robust routing capabilities.",
                "author": { "id": "user2", "name": "Adam Min" },
                "createdAt": "2024-07-20T10:00:00Z",
                "imageUrl": "https://placehold.co/600x400.png",
            }),
        ),
        (
            "2",
            json!({
                "title": "The Importance of Authentication in Web Apps",
                "content": "Authentication is a critical aspect of modern web applications. It ensures that only authorized users can access sensitive data and features.\nThis article discusses various authentication strategies and best practices for security.",
                "author": { "id": "user1", "name": "Eddie Tor" },
                "createdAt": "2024-07-19T14:30:00Z",
                "imageUrl": "https://placehold.co/600x400.png",
            }),
        ),
        (
            "3",
            json!({
                "title": "Styling with Tailwind CSS and ShadCN UI",
                "content": "Combining Tailwind CSS with ShadCN UI components provides a powerful and efficient way to build beautiful and responsive user interfaces.",
                "author": { "id": "user3", "name": "Jane Doe" },
                "createdAt": "2024-07-18T09:15:00Z",
                "imageUrl": "https://placehold.co/600x400.png",
            }),
        ),
        (
            "4",
            json!({
                "title": "Advanced State Management in React",
                "content": "Managing state effectively is key to building complex applications. This post delves into advanced state management patterns and discusses when to choose which solution.",
                "author": { "id": "user1", "name": "Eddie Tor" },
                "createdAt": "2024-07-17T11:00:00Z",
                "imageUrl": "https://placehold.co/600x400.png",
            }),
        ),
        (
            "5",
            json!({
                "title": "Deploying Your Next.js App to Vercel",
                "content": "Vercel offers a seamless deployment experience. This step-by-step guide walks you through the process, from connecting your Git repository to configuring environment variables and custom domains.",
                "author": { "id": "user2", "name": "Adam Min" },
                "createdAt": "2024-07-16T16:45:00Z",
                "imageUrl": "https://placehold.co/600x400.png",
            }),
        ),
    ]
}
