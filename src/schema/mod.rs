mod post;
mod user;

pub use post::{DecodeError, NewPost, Post, PostAuthor, PostDocument};
pub use user::{Role, User};
