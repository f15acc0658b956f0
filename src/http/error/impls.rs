use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;
use serde_json::json;

use super::Error;
use crate::posts::{CreatePostError, FindPostError};
use crate::store::StoreError;
use crate::types::ErrorKind;
use crate::util::validator::Wrapper;

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::BadRequest | ErrorKind::InvalidFormBody => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let kind = self.kind();
        if kind == ErrorKind::Internal {
            tracing::error!(error = %self, "internal error occurred");
        } else {
            tracing::debug!(error = ?self.report(), "request failed");
        }

        let mut body = json!({
            "code": kind.code(),
            "message": kind.to_string(),
        });
        if let Some(fields) = self.fields() {
            body["fields"] = json!(fields);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<Report<StoreError>> for Error {
    fn from(value: Report<StoreError>) -> Self {
        match value.current_context() {
            StoreError::InvalidCursor => Error::from_report(ErrorKind::BadRequest, value),
            _ => Error::from_report(ErrorKind::Internal, value),
        }
    }
}

impl From<Report<FindPostError>> for Error {
    fn from(value: Report<FindPostError>) -> Self {
        match value.current_context() {
            FindPostError::NotFound => Error::from_report(ErrorKind::NotFound, value),
            FindPostError::Store => Error::from_report(ErrorKind::Internal, value),
        }
    }
}

impl From<Report<CreatePostError>> for Error {
    fn from(value: Report<CreatePostError>) -> Self {
        let kind = match value.current_context() {
            CreatePostError::Unauthorized => ErrorKind::Unauthorized,
            CreatePostError::Forbidden => ErrorKind::Forbidden,
            CreatePostError::InvalidForm => ErrorKind::InvalidFormBody,
            CreatePostError::Store => ErrorKind::Internal,
        };
        Error::from_report(kind, value)
    }
}

impl From<Report<Wrapper>> for Error {
    fn from(value: Report<Wrapper>) -> Self {
        Error::from_report(ErrorKind::InvalidFormBody, value)
    }
}
