//! Single post operations outside of the paginated listing.
mod create;
mod detail;

pub use create::{CreatePost, CreatePostError};
pub use detail::{find_post, FindPostError};
