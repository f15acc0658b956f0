use actix_web::{web, HttpRequest};
use thiserror::Error;

use crate::http::Error;
use crate::types::ErrorKind;

pub mod posts;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|error, req| {
        rejected_payload(req, error.to_string())
    }))
    .app_data(web::QueryConfig::default().error_handler(|error, req| {
        rejected_payload(req, error.to_string())
    }))
    .service(
        web::scope("/posts")
            .route("", web::get().to(posts::list))
            .route("", web::post().to(posts::create))
            .route("/{id}", web::get().to(posts::get)),
    )
    .service(web::scope("/users").route("/login", web::post().to(users::login)));
}

#[derive(Debug, Error)]
#[error("Could not read the request payload")]
struct RejectedPayload;

fn rejected_payload(req: &HttpRequest, reason: String) -> actix_web::Error {
    tracing::debug!(path = %req.path(), %reason, "rejected request payload");
    let report = error_stack::Report::new(RejectedPayload).attach_printable(reason);
    Error::from_report(ErrorKind::BadRequest, report).into()
}
