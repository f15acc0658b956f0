use serde::Deserialize;
use std::num::NonZeroU64;
use std::path::PathBuf;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct Auth {
    /// Secret used to sign API tokens. Required to run the HTTP server.
    ///
    /// **Environment variables**:
    /// - `SCRIBE_AUTH_JWT_SECRET`
    #[validate(length(min = 12, max = 1024, message = "Invalid JWT secret key"))]
    pub jwt_secret: Option<String>,
    /// How long issued API tokens stay valid.
    ///
    /// **Environment variables**:
    /// - `SCRIBE_AUTH_TOKEN_TTL_SECS`
    #[serde(default = "Auth::default_token_ttl_secs")]
    pub token_ttl_secs: NonZeroU64,
    /// Where the terminal client persists the signed in user.
    /// Sessions are kept in memory only if not set.
    ///
    /// **Environment variables**:
    /// - `SCRIBE_AUTH_SESSION_FILE`
    pub session_file: Option<PathBuf>,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: Self::default_token_ttl_secs(),
            session_file: None,
        }
    }
}

impl Auth {
    const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;

    const fn default_token_ttl_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TOKEN_TTL_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TOKEN_TTL_SECS is accidentally set to 0"),
        }
    }
}
