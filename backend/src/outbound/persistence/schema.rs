//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users and their password hashes.
    users (id) {
        id -> Uuid,
        /// Unique login name (max 50 characters).
        username -> Varchar,
        /// Optional unique contact address.
        email -> Nullable<Varchar>,
        /// PHC-formatted argon2 hash.
        password_hash -> Text,
        /// 0 guest, 1 customer, 2 caterer, 3 super user.
        clearance -> Int2,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalog meals. Deletion sets `retired_at`.
    meals (id) {
        id -> Uuid,
        name -> Varchar,
        category -> Nullable<Varchar>,
        price -> Float8,
        image_url -> Nullable<Varchar>,
        description -> Nullable<Text>,
        caterer_id -> Uuid,
        created_at -> Timestamptz,
        retired_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Meals offered per day; `UNIQUE (day, meal_id)`.
    menu_entries (id) {
        /// Insertion sequence, used for ordering.
        id -> Int8,
        day -> Date,
        meal_id -> Uuid,
        added_by -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    orders (id) {
        id -> Uuid,
        owner_id -> Uuid,
        /// Menu day the line items reference.
        menu_day -> Date,
        ordered_at -> Timestamptz,
        delivered -> Bool,
    }
}

diesel::table! {
    /// Line items; `(menu_day, meal_id)` references `menu_entries`.
    order_items (order_id, position) {
        order_id -> Uuid,
        position -> Int4,
        menu_day -> Date,
        meal_id -> Uuid,
        quantity -> Int4,
    }
}

diesel::joinable!(menu_entries -> meals (meal_id));
diesel::joinable!(order_items -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(users, meals, menu_entries, orders, order_items);
