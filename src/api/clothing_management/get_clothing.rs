use crate::api::clothing_management::models::ClothingOut;
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
    id: i32,
) -> Result<Json<ClothingOut>, ErrorResponse>
where
    S: ClothingStore + ?Sized,
    F: ImageStorage + ?Sized,
{
    let clothing = service.get(user.0, id).await?;

    Ok(Json(ClothingOut { clothing }))
}

#[get("/clothings/<id>")]
pub(crate) async fn get_clothing(
    user: UserLoggedIn,
    id: i32,
    conn: DbConn,
    images: &State<LocalImageStorage>,
) -> Result<Json<ClothingOut>, ErrorResponse> {
    let store = PgClothingStore::new(&conn);

    handle(ClothingService::new(&store, images.inner()), user, id).await
}
