use crate::api::clothing_management::models::{Clothing, ClothingChanges, NewClothing};
use crate::db::DbConn;
use crate::error::ServiceError;
use crate::schema::clothings;
use diesel::prelude::*;

/// Persistence of clothing records. Never touches image storage.
#[rocket::async_trait]
pub trait ClothingStore: Send + Sync {
    async fn list_by_owner(&self, owner: i32) -> Result<Vec<Clothing>, ServiceError>;
    async fn create(&self, clothing: NewClothing) -> Result<Clothing, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Clothing>, ServiceError>;
    async fn update(&self, id: i32, changes: ClothingChanges) -> Result<Clothing, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

pub(crate) struct PgClothingStore<'a> {
    conn: &'a DbConn,
}

impl<'a> PgClothingStore<'a> {
    pub(crate) fn new(conn: &'a DbConn) -> Self {
        PgClothingStore { conn }
    }
}

#[rocket::async_trait]
impl<'a> ClothingStore for PgClothingStore<'a> {
    async fn list_by_owner(&self, owner: i32) -> Result<Vec<Clothing>, ServiceError> {
        self.conn
            .run(move |c| {
                clothings::table
                    .filter(clothings::user_id.eq(owner))
                    .order(clothings::id.asc())
                    .load::<Clothing>(c)
            })
            .await
            .map_err(ServiceError::from)
    }

    async fn create(&self, clothing: NewClothing) -> Result<Clothing, ServiceError> {
        self.conn
            .run(move |c| {
                diesel::insert_into(clothings::table)
                    .values(&clothing)
                    .get_result::<Clothing>(c)
            })
            .await
            .map_err(ServiceError::from)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Clothing>, ServiceError> {
        self.conn
            .run(move |c| clothings::table.find(id).first::<Clothing>(c).optional())
            .await
            .map_err(ServiceError::from)
    }

    async fn update(&self, id: i32, changes: ClothingChanges) -> Result<Clothing, ServiceError> {
        self.conn
            .run(move |c| {
                diesel::update(clothings::table.find(id))
                    .set((&changes, clothings::updated_at.eq(diesel::dsl::now)))
                    .get_result::<Clothing>(c)
            })
            .await
            .map_err(ServiceError::from)
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let deleted = self
            .conn
            .run(move |c| diesel::delete(clothings::table.find(id)).execute(c))
            .await?;

        match deleted {
            0 => Err(ServiceError::NotFound),
            _ => Ok(()),
        }
    }
}
