use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use validator::Validate;

use super::ParseError;
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize, Validate)]
pub struct Server {
    /// **Environment variable**: `SCRIBE_IP`
    ///
    /// The default value is `127.0.0.1` if not set.
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// **Environment variable**: `SCRIBE_PORT`
    ///
    /// The default value is `8080` if not set.
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// **Environment variable**: `SCRIBE_WORKERS`
    ///
    /// Total amount of HTTP workers. Uses actix-web's default
    /// (amount of physical cores) if not set.
    pub workers: Option<NonZeroUsize>,
    #[serde(default)]
    #[validate(nested)]
    pub store: super::Store,
    #[serde(default)]
    #[validate(nested)]
    pub auth: super::Auth,
    #[serde(default)]
    pub logging: super::Logging,
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();
        Self::from_figment(Self::figment())
    }

    /// Loads the configuration used throughout tests. It uses
    /// the seeded in-memory store and a fixed token secret.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            ip: Self::default_ip(),
            port: Self::default_port(),
            workers: None,
            store: super::Store::default(),
            auth: super::Auth {
                jwt_secret: Some("scribe-test-secret-key".into()),
                ..Default::default()
            },
            logging: super::Logging::default(),
        }
    }

    pub(crate) fn from_figment(figment: figment::Figment) -> Result<Self, ParseError> {
        let config = figment
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "scribe.toml";

    const fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
    }

    const fn default_port() -> u16 {
        8080
    }

    /// Creates a default [`Figment`] object to load server
    /// configuration. This function is there for implementing
    /// [`Server::load`] and testing.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // figment's env provider cannot tell apart a nested key from
            // a field with an underscore in it.
            .merge(Env::prefixed("SCRIBE_").map(|v| {
                match v.as_str().to_ascii_uppercase().as_str() {
                    "STORE_POSTGRES_MIN_IDLE" => "store.postgres.min_idle".into(),
                    "STORE_POSTGRES_POOL_SIZE" => "store.postgres.pool_size".into(),
                    "STORE_POSTGRES_ENFORCE_TLS" => "store.postgres.enforce_tls".into(),
                    "STORE_POSTGRES_TIMEOUT_SECS" => "store.postgres.timeout_secs".into(),

                    "AUTH_JWT_SECRET" => "auth.jwt_secret".into(),
                    "AUTH_TOKEN_TTL_SECS" => "auth.token_ttl_secs".into(),
                    "AUTH_SESSION_FILE" => "auth.session_file".into(),

                    _ => v.as_str().replace('_', ".").into(),
                }
            }))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL"])
                    .map(|_| "store.postgres.url".into()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingStyle, StoreKind};
    use figment::Jail;
    use std::num::{NonZeroU32, NonZeroU64};

    #[test]
    fn defaults() {
        Jail::expect_with(|_| {
            let config = Server::from_figment(Server::figment()).unwrap();
            assert_eq!(config.port, 8080);
            assert_eq!(config.store.kind, StoreKind::Memory);
            assert!(config.store.seed);
            assert!(config.auth.jwt_secret.is_none());
            assert_eq!(config.logging.style, LoggingStyle::Full);
            Ok(())
        });
    }

    #[test]
    fn env_aliases() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/scribe");

            jail.set_env("SCRIBE_PORT", "3000");
            jail.set_env("SCRIBE_STORE_KIND", "postgres");
            jail.set_env("SCRIBE_STORE_POSTGRES_MIN_IDLE", "2");
            jail.set_env("SCRIBE_STORE_POSTGRES_POOL_SIZE", "100");
            jail.set_env("SCRIBE_STORE_POSTGRES_ENFORCE_TLS", "false");
            jail.set_env("SCRIBE_STORE_POSTGRES_TIMEOUT_SECS", "3030");
            jail.set_env("SCRIBE_AUTH_JWT_SECRET", "very-secret-value");
            jail.set_env("SCRIBE_LOGGING_STYLE", "json");

            let config = Server::from_figment(Server::figment()).unwrap();
            assert_eq!(config.port, 3000);
            assert_eq!(config.store.kind, StoreKind::Postgres);

            let postgres = config.store.postgres.as_ref().unwrap();
            assert_eq!(postgres.url, "postgres://localhost/scribe");
            assert_eq!(postgres.min_idle, NonZeroU32::new(2));
            assert_eq!(postgres.pool_size, NonZeroU32::new(100).unwrap());
            assert!(!postgres.enforce_tls);
            assert_eq!(postgres.timeout_secs, NonZeroU64::new(3030).unwrap());

            assert_eq!(
                config.auth.jwt_secret.as_deref(),
                Some("very-secret-value")
            );
            assert_eq!(config.logging.style, LoggingStyle::JSON);
            Ok(())
        });
    }

    #[test]
    fn config_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "scribe.toml",
                r#"
                port = 9090

                [store]
                seed = false

                [logging]
                targets = "scribe=trace"
                stream = "stdout"
                "#,
            )?;

            let config = Server::from_figment(Server::figment()).unwrap();
            assert_eq!(config.port, 9090);
            assert!(!config.store.seed);
            assert_eq!(config.logging.targets, "scribe=trace");
            Ok(())
        });
    }

    #[test]
    fn rejects_postgres_without_url() {
        Jail::expect_with(|jail| {
            jail.set_env("SCRIBE_STORE_KIND", "postgres");
            assert!(Server::from_figment(Server::figment()).is_err());
            Ok(())
        });
    }

    #[test]
    fn rejects_short_jwt_secret() {
        Jail::expect_with(|jail| {
            jail.set_env("SCRIBE_AUTH_JWT_SECRET", "short");
            assert!(Server::from_figment(Server::figment()).is_err());
            Ok(())
        });
    }
}
