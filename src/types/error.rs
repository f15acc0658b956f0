use serde::Serialize;
use thiserror::Error;

/// Categories of errors exposed to API consumers.
///
/// Its [`Display`](std::fmt::Display) output is the message sent
/// back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Bad request")]
    BadRequest,
    #[error("You are not allowed to do this")]
    Forbidden,
    #[error("Internal server error occurred. Please try again later.")]
    Internal,
    #[error("Invalid form body")]
    InvalidFormBody,
    #[error("The requested resource could not be found")]
    NotFound,
    #[error("Authentication required")]
    Unauthorized,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Forbidden => "forbidden",
            Self::Internal => "internal",
            Self::InvalidFormBody => "invalid_form_body",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
        }
    }
}
