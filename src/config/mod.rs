use thiserror::Error;

mod auth;
mod database;
mod logging;
mod server;
mod store;

pub use auth::Auth;
pub use database::Postgres;
pub use logging::{ConsoleStream, InvalidConsoleStream, InvalidLoggingStyle, Logging, LoggingStyle};
pub use server::Server;
pub use store::{Store, StoreKind};

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
