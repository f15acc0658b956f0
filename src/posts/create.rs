use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::schema::{NewPost, Post, PostAuthor, User};
use crate::store::PostStore;
use crate::types::Timestamp;
use crate::util::validator::IntoValidatorReport;

#[derive(Debug, Error)]
pub enum CreatePostError {
    #[error("You must be logged in to create a post")]
    Unauthorized,
    #[error("Only admins and editors may create posts")]
    Forbidden,
    #[error("Invalid post form")]
    InvalidForm,
    #[error("Something went wrong while saving the post")]
    Store,
}

/// Form for a new post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(
        min = 5,
        max = 150,
        message = "Title must be between 5 and 150 characters."
    ))]
    pub title: String,
    #[validate(length(
        min = 20,
        max = 5000,
        message = "Content must be between 20 and 5000 characters."
    ))]
    pub content: String,
    #[validate(url(message = "Image URL must be a valid URL."))]
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CreatePost {
    /// Validates the form and writes it as a post authored by `author`.
    /// The author is checked before the form. A blank image URL counts
    /// as no image.
    #[tracing::instrument(skip_all, name = "posts.create", fields(author.id = tracing::field::Empty))]
    pub async fn perform(
        mut self,
        store: &dyn PostStore,
        author: Option<&User>,
    ) -> Result<Post, CreatePostError> {
        let Some(author) = author else {
            return Err(Report::new(CreatePostError::Unauthorized));
        };
        tracing::Span::current().record("author.id", author.id.as_str());

        if !author.can_publish() {
            return Err(Report::new(CreatePostError::Forbidden)
                .attach_printable(format!("role: {}", author.role)));
        }

        self.image_url = self.image_url.filter(|url| !url.trim().is_empty());
        self.validate()
            .into_validator_report()
            .change_context(CreatePostError::InvalidForm)?;

        let post = NewPost {
            title: self.title,
            content: self.content,
            author: PostAuthor {
                id: author.id.clone(),
                name: author.name.clone(),
            },
            created_at: Timestamp::now(),
            image_url: self.image_url,
        };

        let post = store
            .insert(post)
            .await
            .change_context(CreatePostError::Store)?;

        tracing::info!(post.id = %post.id, "created post");
        Ok(post)
    }
}
