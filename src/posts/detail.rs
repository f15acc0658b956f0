use error_stack::{Report, Result, ResultExt};
use thiserror::Error;

use crate::schema::Post;
use crate::store::PostStore;
use crate::types::PostId;

#[derive(Debug, Error)]
pub enum FindPostError {
    #[error("The post you are looking for does not exist or may have been removed")]
    NotFound,
    #[error("Failed to look up post")]
    Store,
}

#[tracing::instrument(skip(store), fields(post.id = %id))]
pub async fn find_post(store: &dyn PostStore, id: &PostId) -> Result<Post, FindPostError> {
    match store.find(id).await.change_context(FindPostError::Store)? {
        Some(post) => Ok(post),
        None => {
            tracing::debug!("post does not exist");
            Err(Report::new(FindPostError::NotFound).attach_printable(format!("post id: {id}")))
        }
    }
}
