use serde::ser::{Serialize, SerializeMap, Serializer};

pub(crate) const MAX_NAME_CHARS: usize = 255;
pub(crate) const MAX_IMAGE_BYTES: usize = 2048 * 1024;

/// Per-field validation messages, serialized as `{ "field": ["message", ..] }`.
///
/// Fields keep the order in which they were first reported.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors(Vec<(&'static str, Vec<String>)>);

impl ValidationErrors {
    pub(crate) fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.0.push((field, vec![message])),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn field(&self, field: &str) -> &[String] {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or_default()
    }

    /// First message plus a count of the remaining ones.
    pub(crate) fn summary(&self) -> String {
        let mut messages = self.0.iter().flat_map(|(_, messages)| messages);
        let first = match messages.next() {
            Some(first) => first.clone(),
            None => return "The given data was invalid.".to_string(),
        };
        match messages.count() {
            0 => first,
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

pub(crate) fn image_too_large_message() -> String {
    format!(
        "The image field must not be greater than {} kilobytes.",
        MAX_IMAGE_BYTES / 1024
    )
}

/// Image encodings accepted for clothing pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Detects the encoding from the file's leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageKind::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageKind::Png)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
        }
    }
}

/// Raw uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
}

/// Unvalidated create/update input.
#[derive(Debug, Clone, Default)]
pub struct ClothingInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug)]
pub(crate) struct ValidImage {
    pub(crate) bytes: Vec<u8>,
    pub(crate) kind: ImageKind,
}

#[derive(Debug)]
pub(crate) struct ValidClothing {
    pub(crate) name: String,
    pub(crate) category: String,
    pub(crate) image: Option<ValidImage>,
}

fn required(field: &'static str, value: Option<String>, errors: &mut ValidationErrors) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, format!("The {} field is required.", field));
    }
    value
}

impl ClothingInput {
    pub(crate) fn validate(self) -> Result<ValidClothing, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = required("name", self.name, &mut errors);
        if name.chars().count() > MAX_NAME_CHARS {
            errors.add(
                "name",
                format!(
                    "The name field must not be greater than {} characters.",
                    MAX_NAME_CHARS
                ),
            );
        }

        let category = required("category", self.category, &mut errors);

        let image = match self.image {
            None => None,
            Some(upload) => {
                let kind = ImageKind::sniff(&upload.bytes);
                if kind.is_none() {
                    errors.add("image", "The image field must be a file of type: jpg, png, jpeg.");
                }
                if upload.bytes.len() > MAX_IMAGE_BYTES {
                    errors.add("image", image_too_large_message());
                }
                kind.map(|kind| ValidImage {
                    bytes: upload.bytes,
                    kind,
                })
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidClothing {
            name,
            category,
            image,
        })
    }
}
