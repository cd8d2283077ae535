use crate::api::clothing_management::models::MessageOut;
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
) -> Result<Json<MessageOut>, ErrorResponse>
where
    S: ClothingStore + ?Sized,
    F: ImageStorage + ?Sized,
{
    let deleted = service.delete(user.0, id).await?;

    // The client only learns that the record is gone.
    if let Some(key) = deleted.orphaned_image {
        log::warn!(
            "clothing item {} deleted for user {}, image {} needs manual cleanup",
            id,
            user.0,
            key
        );
    }

    Ok(Json(MessageOut {
        message: "Clothing item deleted successfully!",
    }))
}

#[delete("/clothings/<id>")]
pub(crate) async fn delete_clothing(
    user: UserLoggedIn,
    id: i32,
    conn: DbConn,
    images: &State<LocalImageStorage>,
) -> Result<Json<MessageOut>, ErrorResponse> {
    let store = PgClothingStore::new(&conn);
    let service = ClothingService::new(&store, images.inner());

    handle(service, user, id).await
}

#[cfg(test)]
mod tests {
    use crate::api::clothing_management::test_support::{
        add_clothing, client, images, session_cookie,
    };
    use crate::api::clothing_management::validation::tests::PNG;
    use rocket::http::Status;
    use serde_json::{json, Value};

    #[rocket::async_test]
    async fn owner_deletes_item_and_image() {
        let client = client().await;
        let id = add_clothing(&client, 1, "Jacket", "Outerwear", Some(PNG)).await;

        let response = client
            .delete(format!("/clothings/{}", id))
            .private_cookie(session_cookie(&client, 1))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body, json!({ "message": "Clothing item deleted successfully!" }));
        assert_eq!(images(&client).len(), 0);

        let gone = client
            .get(format!("/clothings/{}", id))
            .private_cookie(session_cookie(&client, 1))
            .dispatch()
            .await;
        assert_eq!(gone.status(), Status::Forbidden);
    }

    #[rocket::async_test]
    async fn image_storage_failure_still_deletes_record() {
        let client = client().await;
        let id = add_clothing(&client, 1, "Jacket", "Outerwear", Some(PNG)).await;
        images(&client).fail_deletes(true);

        let response = client
            .delete(format!("/clothings/{}", id))
            .private_cookie(session_cookie(&client, 1))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body, json!({ "message": "Clothing item deleted successfully!" }));
        assert_eq!(images(&client).len(), 1);
    }

    #[rocket::async_test]
    async fn other_users_cannot_delete() {
        let client = client().await;
        let id = add_clothing(&client, 1, "Jacket", "Outerwear", None).await;

        let response = client
            .delete(format!("/clothings/{}", id))
            .private_cookie(session_cookie(&client, 2))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Forbidden);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body, json!({ "message": "Unauthorized" }));
    }
}
