use crate::api::user_management::models::{NewUser, User, UserLoggedIn};
use crate::api::user_management::sessions::UserSession;
use crate::db::DbConn;
use crate::error::{ErrorResponse, ServiceError};
use crate::schema::users;
use crate::settings::Settings;
use diesel::prelude::*;
use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
    email: String,
    name: String,
}

/// Exchanges a Google ID token for a session cookie, creating the user on
/// first login.
#[post("/login", data = "<token>")]
pub(crate) async fn login(
    token: String,
    sessions: &State<UserSession>,
    conn: DbConn,
    cookies: &CookieJar<'_>,
    settings: &State<Settings>,
) -> Result<Json<User>, ErrorResponse> {
    let parser = jsonwebtoken_google::Parser::new(&settings.google_client_id);
    let claims = parser
        .parse::<TokenClaims>(token.trim())
        .await
        .map_err(|_| {
            log::info!("rejected a login with an invalid Google token");
            ErrorResponse::new(Status::Unauthorized, "Couldn't validate Google account")
        })?;

    let new_user = NewUser {
        sub: claims.sub,
        username: claims.name,
        email: claims.email,
    };

    let user = conn
        .run(move |c| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .on_conflict(users::sub)
                .do_update()
                .set(&new_user)
                .get_result::<User>(c)
        })
        .await
        .map_err(ServiceError::from)?;

    sessions
        .start(cookies, user.id)
        .map_err(|err| ErrorResponse::with_body(Status::InternalServerError, err))?;
    log::info!("user {} logged in", user.id);

    Ok(Json(user))
}

#[get("/check_login")]
pub(crate) async fn check_login(
    user: UserLoggedIn,
    conn: DbConn,
) -> Result<Json<User>, ErrorResponse> {
    let user = conn
        .run(move |c| users::table.find(user.0).first::<User>(c))
        .await
        .map_err(|err| match err {
            // session outlived its user row
            diesel::result::Error::NotFound => {
                ErrorResponse::new(Status::Unauthorized, "Unauthenticated.")
            }
            other => ErrorResponse::from(ServiceError::from(other)),
        })?;

    Ok(Json(user))
}
