use crate::schema::clothings;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = clothings)]
pub struct Clothing {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub category: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = clothings)]
pub struct NewClothing {
    pub user_id: i32,
    pub name: String,
    pub category: String,
    pub image: Option<String>,
}

/// Partial update; `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = clothings)]
pub struct ClothingChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub image: Option<Option<String>>,
}

#[derive(Serialize)]
pub struct ClothingListOut {
    pub clothings: Vec<Clothing>,
}

#[derive(Serialize)]
pub struct ClothingOut {
    pub clothing: Clothing,
}

#[derive(Serialize)]
pub struct ClothingMessageOut {
    pub message: &'static str,
    pub clothing: Clothing,
}

#[derive(Serialize)]
pub struct MessageOut {
    pub message: &'static str,
}
