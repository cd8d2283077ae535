use crate::api::clothing_management::models::ClothingListOut;
use crate::api::clothing_management::service::ClothingService;
use crate::api::clothing_management::store::{ClothingStore, PgClothingStore};
use crate::api::user_management::models::UserLoggedIn;
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::storage::{ImageStorage, LocalImageStorage};
use rocket::serde::json::Json;
use rocket::State;

pub(crate) async fn handle<S, F>(
    service: ClothingService<'_, S, F>,
    user: UserLoggedIn,
) -> Result<Json<ClothingListOut>, ErrorResponse>
where
    S: ClothingStore + ?Sized,
    F: ImageStorage + ?Sized,
{
    let clothings = service.list(user.0).await?;

    Ok(Json(ClothingListOut { clothings }))
}

#[get("/clothings")]
pub(crate) async fn get_clothings(
    user: UserLoggedIn,
    conn: DbConn,
    images: &State<LocalImageStorage>,
) -> Result<Json<ClothingListOut>, ErrorResponse> {
    let store = PgClothingStore::new(&conn);

    handle(ClothingService::new(&store, images.inner()), user).await
}
