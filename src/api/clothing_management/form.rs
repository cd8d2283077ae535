use std::io;

use crate::api::clothing_management::validation::{ClothingInput, ImageUpload};
use rocket::data::{Limits, ToByteUnit};
use rocket::fs::TempFile;
use rocket::tokio::io::AsyncReadExt;

/// Body limits for clothing uploads. Images over the validation limit but
/// under these caps reach validation and get a field error. Anything larger
/// fails the whole form with 413, which the `payload_too_large` catcher turns
/// into the same field error.
pub(crate) fn upload_limits() -> Limits {
    Limits::default()
        .limit("data-form", 4.mebibytes())
        .limit("file", 4.mebibytes())
}

/// Multipart or urlencoded body shared by create and update. Every field is
/// optional here so that missing values surface as validation messages.
#[derive(FromForm)]
pub struct FormClothing<'a> {
    name: Option<String>,
    category: Option<String>,
    image: Option<TempFile<'a>>,
}

async fn read_upload(file: &TempFile<'_>) -> io::Result<Option<ImageUpload>> {
    // browsers send an empty part when no file was picked
    if file.len() == 0 {
        return Ok(None);
    }

    let mut bytes = Vec::with_capacity(file.len() as usize);
    let mut reader = Box::pin(file.open().await?);
    reader.read_to_end(&mut bytes).await?;

    Ok(Some(ImageUpload { bytes }))
}

impl FormClothing<'_> {
    pub(crate) async fn into_input(self) -> io::Result<ClothingInput> {
        let image = match &self.image {
            Some(file) => read_upload(file).await?,
            None => None,
        };

        Ok(ClothingInput {
            name: self.name,
            category: self.category,
            image,
        })
    }
}
