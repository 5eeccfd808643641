use actix_web::{http::StatusCode, HttpResponse};
use std::fmt::{Debug, Display};
use thiserror::Error;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
    #[error("Invalid value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
#[error("The user has not logged in")]
pub struct NotLoggedInError;

impl actix_web::error::ResponseError for NotLoggedInError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        message_response(self.status_code(), &self.to_string())
    }
}

/// Builds the `{"message": ...}` body all error responses use
pub fn message_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "message": message }))
}

/// Wraps an error into a 400 response, surfacing the message to the caller
pub fn e400<T>(e: T) -> actix_web::Error
where
    T: Debug + Display + 'static,
{
    let response = message_response(StatusCode::BAD_REQUEST, &e.to_string());
    actix_web::error::InternalError::from_response(e, response).into()
}

/// Wraps an error into a 404 response, surfacing the message to the caller
pub fn e404<T>(e: T) -> actix_web::Error
where
    T: Debug + Display + 'static,
{
    let response = message_response(StatusCode::NOT_FOUND, &e.to_string());
    actix_web::error::InternalError::from_response(e, response).into()
}

/// Wraps an error into a 500 response. The message is logged but not sent to
/// the caller
pub fn e500<T>(e: T) -> actix_web::Error
where
    T: Debug + Display + 'static,
{
    tracing::error!(err = ?e, "internal error");
    let response = message_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
    actix_web::error::InternalError::from_response(e, response).into()
}
