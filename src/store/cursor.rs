use error_stack::{Report, Result, ResultExt};
use thiserror::Error;

use crate::schema::Post;
use crate::types::{PostId, Timestamp};

/// Opaque position of the last post returned by a page query.
///
/// A cursor only makes sense under the store ordering it was
/// produced with (`created_at` descending, then id descending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    created_at: Timestamp,
    id: PostId,
}

#[derive(Debug, Error)]
#[error("Invalid pagination cursor")]
pub struct InvalidCursor;

impl Cursor {
    const SEPARATOR: char = '|';

    #[must_use]
    pub fn after(post: &Post) -> Self {
        Self {
            created_at: post.created_at,
            id: post.id.clone(),
        }
    }

    #[must_use]
    pub(crate) fn created_at(&self) -> Timestamp {
        self.created_at
    }

    #[must_use]
    pub(crate) fn id(&self) -> &PostId {
        &self.id
    }

    /// Whether `post` comes strictly after this cursor in store order.
    #[must_use]
    pub fn precedes(&self, post: &Post) -> bool {
        (post.created_at, &post.id) < (self.created_at, &self.id)
    }

    /// Text form of the cursor that clients pass back as-is.
    #[must_use]
    pub fn encode(&self) -> String {
        hex::encode(format!("{}{}{}", self.created_at, Self::SEPARATOR, self.id))
    }

    pub fn decode(token: &str) -> Result<Self, InvalidCursor> {
        let bytes = hex::decode(token).change_context(InvalidCursor)?;
        let text = String::from_utf8(bytes).change_context(InvalidCursor)?;

        let (created_at, id) = text
            .split_once(Self::SEPARATOR)
            .ok_or_else(|| Report::new(InvalidCursor).attach_printable("missing separator"))?;

        if id.is_empty() {
            return Err(Report::new(InvalidCursor).attach_printable("missing post id"));
        }

        let created_at = created_at
            .parse::<Timestamp>()
            .change_context(InvalidCursor)?;

        Ok(Self {
            created_at,
            id: PostId::new(id),
        })
    }
}
