use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::Validate;

/// Configuration for connecting to a Postgres database that
/// holds post documents.
#[derive(Debug, Deserialize, Validate)]
pub struct Postgres {
    /// Connection URL connecting to the Postgres database.
    ///
    /// **Environment variables**:
    /// - `SCRIBE_STORE_POSTGRES_URL` or `DATABASE_URL`
    #[validate(url(message = "Invalid Postgres connection URL"))]
    pub url: String,
    /// Minimum idle database connections just to avoid wasting
    /// hardware resources from the database server.
    ///
    /// **Environment variables**:
    /// - `SCRIBE_STORE_POSTGRES_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// Maximum amount of pool size that database can handle
    ///
    /// **Environment variables**:
    /// - `SCRIBE_STORE_POSTGRES_POOL_SIZE`
    #[serde(default = "Postgres::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Forces all database connections are encrypted with TLS
    /// (if possible).
    ///
    /// **Environment variables**:
    /// - `SCRIBE_STORE_POSTGRES_ENFORCE_TLS`
    #[serde(default = "Postgres::default_enforce_tls")]
    pub enforce_tls: bool,
    /// How long this server can wait until its time limit where the
    /// database connection takes a while to acknowledge or
    /// successfully established.
    ///
    /// **Environment variables**:
    /// - `SCRIBE_STORE_POSTGRES_TIMEOUT_SECS`
    #[serde(default = "Postgres::default_pool_timeout_secs")]
    pub timeout_secs: NonZeroU64,
}

impl Postgres {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_POOL_TIMEOUT_SECS: u64 = 5;

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_pool_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_POOL_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    const fn default_enforce_tls() -> bool {
        true
    }
}
