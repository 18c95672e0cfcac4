//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{businesses, reviews, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the businesses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = businesses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BusinessRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub location: String,
    pub contact: String,
    pub price_range: String,
    pub avg_rating_tenths: i16,
    pub review_count: i32,
}

/// Insertable struct for creating new listings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = businesses)]
pub(crate) struct NewBusinessRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub category: &'a str,
    pub location: &'a str,
    pub contact: &'a str,
    pub price_range: &'a str,
    pub avg_rating_tenths: i16,
    pub review_count: i32,
}

/// Changeset overwriting a listing's aggregate.
#[derive(Debug, Clone, Copy, AsChangeset)]
#[diesel(table_name = businesses)]
pub(crate) struct RatingUpdate {
    pub avg_rating_tenths: i16,
    pub review_count: i32,
}

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for storing a review.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub username: &'a str,
    pub rating: i16,
    pub comment: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
