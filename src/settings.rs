use config::{Config, ConfigError, Environment};
use serde::Deserialize;

fn default_image_folder() -> String {
    "runtime/images".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub google_client_id: String,
    #[serde(default = "default_image_folder")]
    pub image_folder: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }
}
