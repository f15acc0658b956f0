//! User sessions for the terminal client and the demo user directory
//! shared with the HTTP API.
mod directory;
mod session;
mod storage;

pub use directory::{Directory, DEMO_PASSWORD};
pub use session::{LoginError, Session};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
