table! {
    clothings (id) {
        id -> Int4,
        user_id -> Int4,
        name -> Varchar,
        category -> Varchar,
        image -> Nullable<Varchar>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    users (id) {
        id -> Int4,
        sub -> Varchar,
        username -> Varchar,
        email -> Varchar,
    }
}

joinable!(clothings -> users (user_id));

allow_tables_to_appear_in_same_query!(clothings, users,);
