use crate::api::clothing_management::validation::{image_too_large_message, ValidationErrors};
use crate::error::ApiError;
use rocket::http::Status;
use rocket::serde::json::Json;

#[catch(401)]
pub(crate) fn unauthenticated() -> Json<ApiError> {
    Json(ApiError::new("Unauthenticated."))
}

#[catch(404)]
pub(crate) fn not_found() -> Json<ApiError> {
    Json(ApiError::new("Not Found"))
}

// Rocket reports malformed form bodies as 422 before the handler runs.
#[catch(422)]
pub(crate) fn unprocessable() -> Json<ApiError> {
    Json(ApiError::new("The given data was invalid."))
}

// Only uploads get near the form limit, so a body over it is an oversized image.
#[catch(413)]
pub(crate) fn payload_too_large() -> (Status, Json<ApiError>) {
    let mut errors = ValidationErrors::default();
    errors.add("image", image_too_large_message());
    (Status::UnprocessableEntity, Json(ApiError::invalid(errors)))
}

#[catch(500)]
pub(crate) fn server_error() -> Json<ApiError> {
    Json(ApiError::new("Server Error"))
}
