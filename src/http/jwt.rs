use chrono::Utc;
use error_stack::{Report, Result, ResultExt};
use jsonwebtoken::{errors::ErrorKind, Algorithm, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{Role, User};
use crate::types::UserId;
use crate::App;

static JWT_HEADER: Lazy<Header> = Lazy::new(|| Header::new(Algorithm::HS512));
const JWT_LOGIN_ISSUER: &str = "scribe.api.login";

/// Claims of the token handed out by `POST /users/login`.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginClaims {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: UserId,

    pub name: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum DecodeJwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Token is invalid")]
    Invalid,
}

#[derive(Debug, Error)]
#[error("Failed to encode as JWT")]
pub struct EncodeJwtError;

impl LoginClaims {
    #[must_use]
    pub fn generate(app: &App, user: &User) -> Self {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(app.config.auth.token_ttl_secs.get()).unwrap_or(i64::MAX);

        Self {
            iat: now,
            exp: now.saturating_add(ttl),
            iss: JWT_LOGIN_ISSUER.to_string(),
            sub: user.id.clone(),

            name: user.name.clone(),
            role: user.role,
        }
    }

    pub fn encode(&self, app: &App) -> Result<String, EncodeJwtError> {
        jsonwebtoken::encode(&JWT_HEADER, self, &app.jwt_encode)
            .change_context(EncodeJwtError)
            .attach_printable("could not encode login jwt claims")
    }

    pub fn decode(app: &App, token: &str) -> Result<Self, DecodeJwtError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 30;
        validation.set_issuer(&[JWT_LOGIN_ISSUER]);

        match jsonwebtoken::decode::<Self>(token.trim(), &app.jwt_decode, &validation) {
            Ok(data) => Ok(data.claims),
            Err(error) => match error.kind() {
                ErrorKind::ExpiredSignature => Err(Report::new(DecodeJwtError::Expired)),
                _ => Err(Report::new(DecodeJwtError::Invalid).attach_printable(error.to_string())),
            },
        }
    }
}
