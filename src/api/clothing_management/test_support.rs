//! Clothing routes wired to in-memory state, plus multipart helpers.
#![cfg(test)]
use rocket::form::Form;
use rocket::http::{ContentType, Cookie};
use rocket::local::asynchronous::Client;
use rocket::serde::json::Json;
use rocket::State;

use crate::api::catchers;
use crate::api::clothing_management::form::{upload_limits, FormClothing};
use crate::api::clothing_management::models::{
    ClothingListOut, ClothingMessageOut, ClothingOut, MessageOut,
};
use crate::api::clothing_management::service::ClothingService;
use crate::api::clothing_management::store::mock::MemoryClothingStore;
use crate::api::clothing_management::{create, delete, get_clothing, list, update};
use crate::api::user_management::models::UserLoggedIn;
use crate::api::user_management::sessions::{UserSession, SESSION_COOKIE};
use crate::error::ErrorResponse;
use crate::storage::mock::MemoryImageStorage;

type Store = State<MemoryClothingStore>;
type Images = State<MemoryImageStorage>;

#[get("/clothings")]
async fn memory_list(
    user: UserLoggedIn,
    store: &Store,
    images: &Images,
) -> Result<Json<ClothingListOut>, ErrorResponse> {
    list::handle(ClothingService::new(store.inner(), images.inner()), user).await
}

#[get("/clothings/<id>")]
async fn memory_show(
    user: UserLoggedIn,
    id: i32,
    store: &Store,
    images: &Images,
) -> Result<Json<ClothingOut>, ErrorResponse> {
    get_clothing::handle(ClothingService::new(store.inner(), images.inner()), user, id).await
}

#[post("/clothings", data = "<form_clothing>")]
async fn memory_create(
    form_clothing: Form<FormClothing<'_>>,
    user: UserLoggedIn,
    store: &Store,
    images: &Images,
) -> Result<Json<ClothingMessageOut>, ErrorResponse> {
    let service = ClothingService::new(store.inner(), images.inner());
    create::handle(service, user, form_clothing.into_inner()).await
}

#[put("/clothings/<id>", data = "<form_clothing>")]
async fn memory_update(
    form_clothing: Form<FormClothing<'_>>,
    id: i32,
    user: UserLoggedIn,
    store: &Store,
    images: &Images,
) -> Result<Json<ClothingMessageOut>, ErrorResponse> {
    let service = ClothingService::new(store.inner(), images.inner());
    update::handle(service, user, id, form_clothing.into_inner()).await
}

#[delete("/clothings/<id>")]
async fn memory_delete(
    user: UserLoggedIn,
    id: i32,
    store: &Store,
    images: &Images,
) -> Result<Json<MessageOut>, ErrorResponse> {
    delete::handle(ClothingService::new(store.inner(), images.inner()), user, id).await
}

/// Same limits and catchers as the real server, memory-backed state.
pub(crate) async fn client() -> Client {
    let figment = rocket::Config::figment().merge(("limits", upload_limits()));

    let rocket = rocket::custom(figment)
        .manage(MemoryClothingStore::default())
        .manage(MemoryImageStorage::default())
        .manage(UserSession::new())
        .mount(
            "/",
            routes![
                memory_list,
                memory_show,
                memory_create,
                memory_update,
                memory_delete
            ],
        )
        .register(
            "/",
            catchers![
                catchers::unauthenticated,
                catchers::not_found,
                catchers::payload_too_large,
                catchers::unprocessable,
                catchers::server_error,
            ],
        );

    Client::tracked(rocket).await.unwrap()
}

/// Opens a session for `user_id` and returns the cookie carrying it.
pub(crate) fn session_cookie(client: &Client, user_id: i32) -> Cookie<'static> {
    let session = client
        .rocket()
        .state::<UserSession>()
        .unwrap()
        .open(user_id)
        .unwrap();
    Cookie::new(SESSION_COOKIE, serde_json::to_string(&session).unwrap())
}

pub(crate) fn images(client: &Client) -> &MemoryImageStorage {
    client.rocket().state::<MemoryImageStorage>().unwrap()
}

const BOUNDARY: &str = "clothing-form-boundary";

pub(crate) fn multipart_type() -> ContentType {
    ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY))
}

/// One multipart field. `File` parts carry a content type, which is what makes
/// Rocket hand them to `TempFile`.
pub(crate) enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub(crate) fn multipart(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Creates an item for `user_id` through the create route and returns its id.
pub(crate) async fn add_clothing(
    client: &Client,
    user_id: i32,
    name: &str,
    category: &str,
    image: Option<&[u8]>,
) -> i64 {
    let mut parts = vec![Part::Text("name", name), Part::Text("category", category)];
    if let Some(bytes) = image {
        parts.push(Part::File("image", "picture", bytes));
    }

    let response = client
        .post("/clothings")
        .header(multipart_type())
        .private_cookie(session_cookie(client, user_id))
        .body(multipart(&parts))
        .dispatch()
        .await;
    assert_eq!(response.status(), rocket::http::Status::Ok);

    let body: serde_json::Value = response.into_json().await.unwrap();
    body["clothing"]["id"].as_i64().unwrap()
}
