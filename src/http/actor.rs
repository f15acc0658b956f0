use actix_web::{http::header, web, FromRequest};
use futures::future::{ready, Ready};
use thiserror::Error;

use super::{jwt::LoginClaims, Error};
use crate::auth::Directory;
use crate::schema::User;
use crate::types::ErrorKind;
use crate::App;

/// Whoever sent the request, resolved from its bearer token.
#[derive(Debug)]
pub enum Actor {
    Anonymous,
    User(User),
}

impl Actor {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("The web app has no available configuration")]
struct NoApp;

#[derive(Debug, Error)]
#[error("Token refers to an unknown user")]
struct UnknownUser;

impl FromRequest for Actor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let Some(token) = token else {
            return ready(Ok(Actor::Anonymous));
        };

        let Some(app) = req.app_data::<web::Data<App>>() else {
            return ready(Err(Error::from_context(ErrorKind::Internal, NoApp)));
        };

        ready(resolve(app, token))
    }
}

fn resolve(app: &App, token: &str) -> Result<Actor, Error> {
    let claims = LoginClaims::decode(app, token)
        .map_err(|e| Error::from_report(ErrorKind::Unauthorized, e))?;

    match Directory::demo().find_by_id(&claims.sub) {
        Some(user) => Ok(Actor::User(user.clone())),
        None => Err(Error::from_context(ErrorKind::Unauthorized, UnknownUser)),
    }
}
