use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

use crate::api::clothing_management::models::{Clothing, ClothingChanges, NewClothing};
use crate::api::clothing_management::store::ClothingStore;
use crate::api::clothing_management::validation::{ClothingInput, ValidImage};
use crate::error::ServiceError;
use crate::storage::ImageStorage;

/// Storage prefix for clothing images.
pub(crate) const IMAGE_PREFIX: &str = "clothings";

/// Result of a delete. `orphaned_image` names a stored file that could not be removed.
#[derive(Debug, PartialEq)]
pub(crate) struct Deleted {
    pub(crate) orphaned_image: Option<String>,
}

/// Owner-scoped clothing operations. Every call takes the caller's user id.
pub(crate) struct ClothingService<'a, S: ?Sized, F: ?Sized> {
    store: &'a S,
    images: &'a F,
}

fn generate_image_key(image: &ValidImage) -> String {
    const LEN: usize = 40;

    let name: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LEN)
        .map(char::from)
        .collect();

    format!("{}/{}.{}", IMAGE_PREFIX, name, image.kind.extension())
}

impl<'a, S: ClothingStore + ?Sized, F: ImageStorage + ?Sized> ClothingService<'a, S, F> {
    pub(crate) fn new(store: &'a S, images: &'a F) -> Self {
        ClothingService { store, images }
    }

    pub(crate) async fn list(&self, caller: i32) -> Result<Vec<Clothing>, ServiceError> {
        self.store.list_by_owner(caller).await
    }

    pub(crate) async fn get(&self, caller: i32, id: i32) -> Result<Clothing, ServiceError> {
        self.load_owned(caller, id).await
    }

    pub(crate) async fn create(
        &self,
        caller: i32,
        input: ClothingInput,
    ) -> Result<Clothing, ServiceError> {
        let valid = input.validate().map_err(ServiceError::Validation)?;

        let image = match &valid.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let new_clothing = NewClothing {
            user_id: caller,
            name: valid.name,
            category: valid.category,
            image: image.clone(),
        };

        match self.store.create(new_clothing).await {
            Ok(clothing) => {
                log::info!("user {} added clothing item {}", caller, clothing.id);
                Ok(clothing)
            }
            Err(err) => {
                if let Some(key) = image {
                    self.discard_image(&key).await;
                }
                Err(err)
            }
        }
    }

    /// Replaces name and category; the image only when a new one is uploaded.
    /// The old image is removed only after the record points at the new one.
    pub(crate) async fn update(
        &self,
        caller: i32,
        id: i32,
        input: ClothingInput,
    ) -> Result<Clothing, ServiceError> {
        let current = self.load_owned(caller, id).await?;
        let valid = input.validate().map_err(ServiceError::Validation)?;

        let new_image = match &valid.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let changes = ClothingChanges {
            name: Some(valid.name),
            category: Some(valid.category),
            image: new_image.clone().map(Some),
        };

        let updated = match self.store.update(id, changes).await {
            Ok(updated) => updated,
            Err(err) => {
                if let Some(key) = new_image {
                    self.discard_image(&key).await;
                }
                return Err(err);
            }
        };

        if let (Some(_), Some(old_key)) = (&new_image, &current.image) {
            self.discard_image(old_key).await;
        }

        Ok(updated)
    }

    /// Removes the stored image first; a failure there leaves an orphan
    /// file but the record is deleted regardless.
    pub(crate) async fn delete(&self, caller: i32, id: i32) -> Result<Deleted, ServiceError> {
        let clothing = self.load_owned(caller, id).await?;

        let mut orphaned_image = None;
        if let Some(key) = clothing.image {
            if let Err(err) = self.images.delete(&key).await {
                log::warn!(
                    "couldn't delete image {} of clothing item {}: {}",
                    key,
                    id,
                    err
                );
                orphaned_image = Some(key);
            }
        }

        self.store.delete(id).await?;
        log::info!("user {} deleted clothing item {}", caller, id);

        Ok(Deleted { orphaned_image })
    }

    async fn load_owned(&self, caller: i32, id: i32) -> Result<Clothing, ServiceError> {
        let clothing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if clothing.user_id != caller {
            return Err(ServiceError::Unauthorized);
        }

        Ok(clothing)
    }

    async fn store_image(&self, image: &ValidImage) -> Result<String, ServiceError> {
        let key = generate_image_key(image);
        self.images.put(&key, &image.bytes).await?;
        Ok(key)
    }

    async fn discard_image(&self, key: &str) {
        if let Err(err) = self.images.delete(key).await {
            log::warn!("orphaned image {} left in storage: {}", key, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::clothing_management::store::mock::MemoryClothingStore;
    use crate::api::clothing_management::validation::tests::{JPEG, PNG};
    use crate::api::clothing_management::validation::ImageUpload;
    use crate::storage::mock::MemoryImageStorage;

    const U1: i32 = 1;
    const U2: i32 = 2;

    fn input(name: &str, category: &str, image: Option<&[u8]>) -> ClothingInput {
        ClothingInput {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            image: image.map(|bytes| ImageUpload {
                bytes: bytes.to_vec(),
            }),
        }
    }

    async fn image_bytes(images: &MemoryImageStorage, key: &str) -> Option<Vec<u8>> {
        images.get(key).await.unwrap()
    }

    #[rocket::async_test]
    async fn create_sets_owner_and_fields() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);

        let clothing = service
            .create(U1, input("Blue Shirt", "Tops", None))
            .await
            .unwrap();

        assert_eq!(clothing.id, 1);
        assert_eq!(clothing.user_id, U1);
        assert_eq!(clothing.name, "Blue Shirt");
        assert_eq!(clothing.category, "Tops");
        assert_eq!(clothing.image, None);
    }

    #[rocket::async_test]
    async fn create_rejects_invalid_input_without_side_effects() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);

        let err = service
            .create(U1, input("", "Tops", Some(b"not an image")))
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(errors) => {
                assert_eq!(errors.field("name").len(), 1);
                assert_eq!(errors.field("image").len(), 1);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(service.list(U1).await.unwrap().is_empty());
        assert_eq!(images.len(), 0);
    }

    #[rocket::async_test]
    async fn image_round_trips_through_storage() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);

        let created = service
            .create(U1, input("Jacket", "Outerwear", Some(PNG)))
            .await
            .unwrap();
        let fetched = service.get(U1, created.id).await.unwrap();

        let key = fetched.image.unwrap();
        assert!(key.starts_with("clothings/"));
        assert!(key.ends_with(".png"));
        assert_eq!(image_bytes(&images, &key).await.unwrap(), PNG);
    }

    #[rocket::async_test]
    async fn failed_image_write_creates_nothing() {
        let images = MemoryImageStorage::default();
        images.fail_puts(true);
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);

        let err = service
            .create(U1, input("Jacket", "Outerwear", Some(PNG)))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::FileStorage(_)));
        assert!(service.list(U1).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn failed_record_write_discards_new_image() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        store.fail_writes(true);
        let service = ClothingService::new(&store, &images);

        let err = service
            .create(U1, input("Jacket", "Outerwear", Some(JPEG)))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(images.len(), 0);
    }

    #[rocket::async_test]
    async fn list_is_scoped_to_owner() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);

        let a = service.create(U1, input("A", "Tops", None)).await.unwrap();
        service.create(U2, input("B", "Tops", None)).await.unwrap();
        let c = service.create(U1, input("C", "Shoes", None)).await.unwrap();

        let mine = service.list(U1).await.unwrap();
        assert_eq!(mine, vec![a, c]);
        assert!(mine.iter().all(|clothing| clothing.user_id == U1));
        assert_eq!(service.list(U2).await.unwrap().len(), 1);
        assert!(service.list(3).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn other_users_cannot_read_update_or_delete() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);
        let created = service
            .create(U1, input("Jacket", "Outerwear", Some(PNG)))
            .await
            .unwrap();
        let key = created.image.clone().unwrap();

        let read = service.get(U2, created.id).await.unwrap_err();
        let update = service
            .update(U2, created.id, input("Stolen", "Mine", Some(JPEG)))
            .await
            .unwrap_err();
        let delete = service.delete(U2, created.id).await.unwrap_err();

        assert!(matches!(read, ServiceError::Unauthorized));
        assert!(matches!(update, ServiceError::Unauthorized));
        assert!(matches!(delete, ServiceError::Unauthorized));
        assert_eq!(service.get(U1, created.id).await.unwrap(), created);
        assert_eq!(image_bytes(&images, &key).await.unwrap(), PNG);
        assert_eq!(images.len(), 1);
    }

    #[rocket::async_test]
    async fn ownership_is_checked_before_validation() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);
        let created = service.create(U1, input("Hat", "Accessories", None)).await.unwrap();

        let err = service
            .update(U2, created.id, input("", "", None))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Unauthorized));
    }

    #[rocket::async_test]
    async fn missing_items_are_not_found() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);

        assert!(matches!(
            service.get(U1, 42).await.unwrap_err(),
            ServiceError::NotFound
        ));
        assert!(matches!(
            service.update(U1, 42, input("A", "B", None)).await.unwrap_err(),
            ServiceError::NotFound
        ));
        assert!(matches!(
            service.delete(U1, 42).await.unwrap_err(),
            ServiceError::NotFound
        ));
    }

    #[rocket::async_test]
    async fn update_replaces_image_and_removes_old_one() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);
        let created = service
            .create(U1, input("Jacket", "Outerwear", Some(PNG)))
            .await
            .unwrap();
        let old_key = created.image.unwrap();

        let updated = service
            .update(U1, created.id, input("Jacket", "Coats", Some(JPEG)))
            .await
            .unwrap();

        let new_key = updated.image.unwrap();
        assert_ne!(new_key, old_key);
        assert!(new_key.ends_with(".jpg"));
        assert_eq!(updated.category, "Coats");
        assert_eq!(image_bytes(&images, &new_key).await.unwrap(), JPEG);
        assert_eq!(image_bytes(&images, &old_key).await, None);
        assert_eq!(images.len(), 1);
    }

    #[rocket::async_test]
    async fn update_without_image_keeps_existing_one() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);
        let created = service
            .create(U1, input("Jacket", "Outerwear", Some(PNG)))
            .await
            .unwrap();

        let updated = service
            .update(U1, created.id, input("Rain Jacket", "Outerwear", None))
            .await
            .unwrap();

        assert_eq!(updated.name, "Rain Jacket");
        assert_eq!(updated.image, created.image);
        assert_eq!(images.len(), 1);
    }

    #[rocket::async_test]
    async fn failed_update_keeps_old_image() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let created = store
            .create(NewClothing {
                user_id: U1,
                name: "Jacket".to_string(),
                category: "Outerwear".to_string(),
                image: None,
            })
            .await
            .unwrap();
        let service = ClothingService::new(&store, &images);
        let with_image = service
            .update(U1, created.id, input("Jacket", "Outerwear", Some(PNG)))
            .await
            .unwrap();
        let old_key = with_image.image.unwrap();

        store.fail_writes(true);
        let err = service
            .update(U1, created.id, input("Jacket", "Outerwear", Some(JPEG)))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(image_bytes(&images, &old_key).await.unwrap(), PNG);
        assert_eq!(images.len(), 1);
        assert_eq!(
            service.get(U1, created.id).await.unwrap().image,
            Some(old_key)
        );
    }

    #[rocket::async_test]
    async fn delete_removes_record_and_image() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);
        let created = service
            .create(U1, input("Jacket", "Outerwear", Some(PNG)))
            .await
            .unwrap();
        let key = created.image.unwrap();

        let deleted = service.delete(U1, created.id).await.unwrap();

        assert_eq!(deleted, Deleted { orphaned_image: None });
        assert_eq!(image_bytes(&images, &key).await, None);
        assert!(service.list(U1).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn delete_survives_image_storage_failure() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);
        let created = service
            .create(U1, input("Jacket", "Outerwear", Some(PNG)))
            .await
            .unwrap();
        images.fail_deletes(true);

        let deleted = service.delete(U1, created.id).await.unwrap();

        assert_eq!(deleted.orphaned_image, created.image);
        assert!(service.list(U1).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn blue_shirt_lifecycle() {
        let images = MemoryImageStorage::default();
        let store = MemoryClothingStore::default();
        let service = ClothingService::new(&store, &images);

        let shirt = service
            .create(U1, input("Blue Shirt", "Tops", None))
            .await
            .unwrap();
        assert_eq!(shirt.id, 1);
        assert_eq!(shirt.image, None);
        assert_eq!(shirt.user_id, U1);

        let shirt = service
            .update(U1, 1, input("Blue Shirt", "Shirts", None))
            .await
            .unwrap();
        assert_eq!(shirt.category, "Shirts");

        let err = service.delete(U2, 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(service.list(U1).await.unwrap(), vec![shirt]);

        service.delete(U1, 1).await.unwrap();
        assert!(service.list(U1).await.unwrap().iter().all(|c| c.id != 1));
    }
}
