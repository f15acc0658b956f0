use error_stack::Report;
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error)]
pub enum Error {
    /// An error caused by an invalid Postgres connection url.
    #[error("invalid connection url")]
    InvalidUrl,
    /// An error caused by an [`sqlx`] error.
    #[error("received a pool error: {0}")]
    Internal(sqlx::Error),
    /// The database pool does not have reliable connection
    /// to transact to the database.
    #[error("unhealthy database pool")]
    UnhealthyPool,
}

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
    fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_db_error(self) -> Result<T> {
        self.map_err(|e| Report::new(Error::Internal(e)))
    }
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

/// Checks the context of a database report without having
/// to match on [`Error`] at every call site.
pub trait ReportExt {
    fn is_unhealthy(&self) -> bool;
}

impl ReportExt for Report<Error> {
    fn is_unhealthy(&self) -> bool {
        self.downcast_ref::<Error>()
            .map(|v| matches!(v, Error::UnhealthyPool))
            .unwrap_or_default()
    }
}
