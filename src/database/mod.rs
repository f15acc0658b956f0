use error_stack::{Report, ResultExt};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::{str::FromStr, time::Duration};

use crate::config;

mod error;
pub use error::*;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;
pub type Connection = sqlx::PgConnection;

#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    pub async fn new(cfg: &config::Postgres) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(cfg.timeout_secs.get()))
            .max_connections(cfg.pool_size.get());

        if let Some(min_idle) = cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(&cfg.url).change_context(Error::InvalidUrl)?;

        if cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Require);
        }

        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match pool.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {
                tracing::warn!("Postgres is not reachable yet, connecting lazily");
            }
            Err(err) => return Err(err),
        }

        Ok(pool)
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

impl Pool {
    #[inline]
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    #[inline]
    pub fn is_healthy(&self) -> bool {
        self.connections() > 0
    }

    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        if let Some(inner) = self.pool.try_acquire() {
            Ok(inner)
        } else {
            self.pool.acquire().await.map_err(|e| match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                    Report::new(e).change_context(Error::UnhealthyPool)
                }
                e => Report::new(Error::Internal(e)),
            })
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        match self.pool.acquire().await {
            Ok(..) => Ok(()),
            Err(e) if !self.is_healthy() => Err(e).change_context(Error::UnhealthyPool),
            Err(err) => Err(Report::new(Error::Internal(err))),
        }
    }
}
