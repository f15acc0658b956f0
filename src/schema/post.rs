use error_stack::{Report, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PostId, Timestamp, UserId};

/// A blog post as read back from the post store.
///
/// Posts are never mutated once fetched, the store is the only
/// source of truth for them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author: PostAuthor,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostAuthor {
    pub id: UserId,
    pub name: String,
}

/// Data needed to write a new post. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: PostAuthor,
    pub created_at: Timestamp,
    pub image_url: Option<String>,
}

#[derive(Debug, Error)]
#[error("Could not decode post document {id:?}")]
pub struct DecodeError {
    pub id: PostId,
}

/// Raw shape of a post document inside the store.
///
/// Every document read from any store backend goes through
/// [`PostDocument::decode`] so that missing or mistyped fields
/// are caught at the store boundary.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    pub title: String,
    pub content: String,
    pub author: PostAuthor,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl PostDocument {
    pub fn decode(id: PostId, data: serde_json::Value) -> Result<Post, DecodeError> {
        let document = serde_json::from_value::<Self>(data).map_err(|e| {
            Report::new(DecodeError { id: id.clone() }).attach_printable(e.to_string())
        })?;

        Ok(Post {
            id,
            title: document.title,
            content: document.content,
            author: document.author,
            created_at: document.created_at,
            image_url: document.image_url,
        })
    }

    #[must_use]
    pub fn encode(post: &NewPost) -> serde_json::Value {
        let document = Self {
            title: post.title.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
            created_at: post.created_at,
            image_url: post.image_url.clone(),
        };

        // a struct made of strings and a timestamp always serializes
        serde_json::to_value(document).unwrap_or_default()
    }
}
