mod api;
mod db;
mod error;
mod schema;
mod settings;
mod storage;

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
extern crate dotenv;

use api::clothing_management::form::upload_limits;
use api::user_management::sessions::UserSession;
use db::{run_db_migrations, DbConn};
use rocket::fairing::AdHoc;
use settings::Settings;
use storage::LocalImageStorage;

#[launch]
fn rocket() -> _ {
    dotenv::dotenv().ok();

    let settings = Settings::new().expect("valid settings");
    let images = LocalImageStorage::new(&settings.image_folder);

    let figment = rocket::Config::figment().merge(("limits", upload_limits()));

    rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(AdHoc::on_ignite("Run migrations", run_db_migrations))
        .manage(images)
        .manage(settings)
        .manage(UserSession::new())
        .mount(
            "/",
            routes![
                crate::api::user_management::login::login,
                crate::api::user_management::login::check_login,
                crate::api::clothing_management::list::get_clothings,
                crate::api::clothing_management::get_clothing::get_clothing,
                crate::api::clothing_management::create::create_clothing,
                crate::api::clothing_management::update::update_clothing,
                crate::api::clothing_management::delete::delete_clothing,
                crate::api::images::get_image,
            ],
        )
        .register(
            "/",
            catchers![
                crate::api::catchers::unauthenticated,
                crate::api::catchers::not_found,
                crate::api::catchers::payload_too_large,
                crate::api::catchers::unprocessable,
                crate::api::catchers::server_error,
            ],
        )
}
