use std::io;

use rocket::response::{Responder, Response};
use rocket::{
    http::{ContentType, Status},
    response,
    serde::json::Json,
    Request,
};
use serde::Serialize;
use thiserror::Error;

use crate::api::clothing_management::validation::ValidationErrors;

#[derive(Serialize, Debug)]
pub struct ApiError {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

impl ApiError {
    pub(crate) fn new(message: impl Into<String>) -> ApiError {
        ApiError {
            message: message.into(),
            errors: None,
        }
    }

    /// Body of a 422: the first message as summary plus every field message.
    pub(crate) fn invalid(errors: ValidationErrors) -> ApiError {
        ApiError {
            message: errors.summary(),
            errors: Some(errors),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ErrorResponse<T = ApiError> {
    json: Json<T>,
    status: Status,
}

impl ErrorResponse<ApiError> {
    pub(crate) fn new(status: Status, message: impl Into<String>) -> ErrorResponse<ApiError> {
        ErrorResponse {
            json: Json(ApiError::new(message)),
            status,
        }
    }
}

impl<T> ErrorResponse<T> {
    pub(crate) fn with_body(status: Status, body: T) -> ErrorResponse<T> {
        ErrorResponse {
            json: Json(body),
            status,
        }
    }
}

impl<'r, T: serde::Serialize> Responder<'r, 'static> for ErrorResponse<T> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(self.json.respond_to(req)?)
            .status(self.status)
            .header(ContentType::JSON)
            .ok()
    }
}

/// Failures of clothing store and service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("the given data was invalid")]
    Validation(ValidationErrors),
    #[error("caller does not own this clothing item")]
    Unauthorized,
    #[error("clothing item not found")]
    NotFound,
    #[error("record store error: {0}")]
    Store(String),
    #[error("file storage error: {0}")]
    FileStorage(#[from] io::Error),
}

impl From<diesel::result::Error> for ServiceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => ServiceError::NotFound,
            other => ServiceError::Store(other.to_string()),
        }
    }
}

// NotFound answers like Unauthorized so other users' ids stay hidden.
impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ErrorResponse {
                json: Json(ApiError::invalid(errors)),
                status: Status::UnprocessableEntity,
            },
            ServiceError::Unauthorized | ServiceError::NotFound => {
                ErrorResponse::new(Status::Forbidden, "Unauthorized")
            }
            ServiceError::Store(_) | ServiceError::FileStorage(_) => {
                log::error!("clothing request failed: {}", err);
                ErrorResponse::new(Status::InternalServerError, "Server Error")
            }
        }
    }
}
