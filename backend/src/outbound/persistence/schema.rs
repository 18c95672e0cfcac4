//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        /// Lower-cased; unique.
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Business listings with their denormalised rating aggregate.
    businesses (id) {
        id -> Uuid,
        name -> Varchar,
        category -> Varchar,
        location -> Varchar,
        contact -> Varchar,
        /// One of `$`, `$$`, `$$$`.
        price_range -> Varchar,
        /// Rounded mean rating in tenths of a star.
        avg_rating_tenths -> Int2,
        review_count -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews; the source of truth for every aggregate.
    reviews (id) {
        id -> Uuid,
        business_id -> Uuid,
        user_id -> Uuid,
        username -> Varchar,
        rating -> Int2,
        comment -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(reviews -> businesses (business_id));
diesel::joinable!(reviews -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(businesses, reviews, users);
