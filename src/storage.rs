use std::io;
use std::path::{Component, Path, PathBuf};

use rocket::tokio::fs;

/// Key-addressed blob store holding uploaded clothing images.
#[rocket::async_trait]
pub trait ImageStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()>;

    /// `None` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Deleting a key that holds nothing is not an error.
    async fn delete(&self, key: &str) -> io::Result<()>;
}

/// Stores images as files below a root folder, one file per key.
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalImageStorage { root: root.into() }
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let relative = Path::new(key);
        let plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if key.is_empty() || !plain {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key {:?}", key),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[rocket::async_trait]
impl ImageStorage for LocalImageStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, bytes).await
    }

    async fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)?).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn delete(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)?).await {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}
