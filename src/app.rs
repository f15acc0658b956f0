use error_stack::{Report, Result, ResultExt};
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{self, StoreKind};
use crate::database;
use crate::store::{MemoryStore, PgPostStore, PostStore};

const GENERATED_SECRET_LENGTH: usize = 64;
const GENERATED_SECRET_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Shared state of a running Scribe instance.
#[derive(Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub store: Arc<dyn PostStore>,
    pub(crate) jwt_encode: EncodingKey,
    pub(crate) jwt_decode: DecodingKey,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all, name = "app.new", fields(store = ?cfg.store.kind))]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let store: Arc<dyn PostStore> = match cfg.store.kind {
            StoreKind::Memory if cfg.store.seed => Arc::new(MemoryStore::seeded()),
            StoreKind::Memory => Arc::new(MemoryStore::new()),
            StoreKind::Postgres => {
                let Some(pg) = cfg.store.postgres.as_ref() else {
                    return Err(Report::new(AppError)
                        .attach_printable("`store.postgres` must be set to use the postgres store"));
                };

                let pool = database::Pool::new(pg).await.change_context(AppError)?;
                let store = PgPostStore::new(pool);
                store
                    .ensure_schema()
                    .await
                    .change_context(AppError)
                    .attach_printable("could not prepare the posts table")?;

                Arc::new(store)
            }
        };

        Ok(Self::with_store(cfg, store))
    }

    /// Builds an [`App`] around an already prepared store.
    #[must_use]
    pub fn with_store(cfg: config::Server, store: Arc<dyn PostStore>) -> Self {
        let secret = cfg.auth.jwt_secret.clone().unwrap_or_else(|| {
            tracing::warn!("no JWT secret is configured, API tokens will not survive a restart");
            random_string::generate(GENERATED_SECRET_LENGTH, GENERATED_SECRET_CHARSET)
        });

        Self {
            config: Arc::new(cfg),
            store,
            jwt_encode: EncodingKey::from_secret(secret.as_bytes()),
            jwt_decode: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Creates a new [`App`] for testing purposes, backed by a
    /// seeded in-memory store. Logs go to the test harness output.
    #[must_use]
    pub fn for_tests() -> Self {
        crate::telemetry::init_for_tests();
        Self::with_store(
            config::Server::for_tests(),
            Arc::new(MemoryStore::seeded()),
        )
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
