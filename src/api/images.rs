use std::path::PathBuf;

use crate::error::{ErrorResponse, ServiceError};
use crate::storage::{ImageStorage, LocalImageStorage};
use rocket::http::ContentType;
use rocket::State;

/// Stored images are public by key; no session required.
#[get("/storage/<key..>")]
pub(crate) async fn get_image(
    key: PathBuf,
    images: &State<LocalImageStorage>,
) -> Result<Option<(ContentType, Vec<u8>)>, ErrorResponse> {
    let key_str = match key.to_str() {
        Some(key_str) => key_str,
        None => return Ok(None),
    };

    let content_type = key
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ContentType::from_extension)
        .unwrap_or(ContentType::Binary);

    let bytes = images
        .get(key_str)
        .await
        .map_err(ServiceError::from)?;

    Ok(bytes.map(|bytes| (content_type, bytes)))
}
