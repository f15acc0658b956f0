pub mod error;
pub mod id;
pub mod timestamp;

pub use error::ErrorKind;
pub use id::{PostId, UserId};
pub use timestamp::Timestamp;
