use crate::schema::users;
use diesel::prelude::*;
use serde::Serialize;

/// Caller identity resolved from the session cookie.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserLoggedIn(pub i32);

#[derive(Queryable, Serialize, Debug)]
pub struct User {
    pub id: i32,
    pub sub: String,
    pub username: String,
    pub email: String,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub sub: String,
    pub username: String,
    pub email: String,
}
