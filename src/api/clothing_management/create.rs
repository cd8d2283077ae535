use crate::api::clothing_management::form::FormClothing;
use crate::api::clothing_management::models::ClothingMessageOut;
use crate::api::clothing_management::service::ClothingService;
use crate::api::clothing_management::store::{ClothingStore, PgClothingStore};
use crate::api::user_management::models::UserLoggedIn;
use crate::db::DbConn;
use crate::error::{ErrorResponse, ServiceError};
use crate::storage::{ImageStorage, LocalImageStorage};
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;

pub(crate) async fn handle<S, F>(
    service: ClothingService<'_, S, F>,
    user: UserLoggedIn,
    form_clothing: FormClothing<'_>,
) -> Result<Json<ClothingMessageOut>, ErrorResponse>
where
    S: ClothingStore + ?Sized,
    F: ImageStorage + ?Sized,
{
    let input = form_clothing
        .into_input()
        .await
        .map_err(ServiceError::from)?;

    let clothing = service.create(user.0, input).await?;

    Ok(Json(ClothingMessageOut {
        message: "Clothing item added successfully!",
        clothing,
    }))
}

#[post("/clothings", data = "<form_clothing>")]
pub(crate) async fn create_clothing(
    form_clothing: Form<FormClothing<'_>>,
    user: UserLoggedIn,
    conn: DbConn,
    images: &State<LocalImageStorage>,
) -> Result<Json<ClothingMessageOut>, ErrorResponse> {
    let store = PgClothingStore::new(&conn);
    let service = ClothingService::new(&store, images.inner());

    handle(service, user, form_clothing.into_inner()).await
}
