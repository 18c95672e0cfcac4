//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{BusinessId, Rating, Review, ReviewComment, ReviewId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the `ReviewRepository` port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ReviewRepositoryError {
    map_pool_error(error, ReviewRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn stored_rating(value: i16) -> Result<Rating, ReviewRepositoryError> {
    Rating::new(i64::from(value))
        .map_err(|err| ReviewRepositoryError::query(format!("stored review: {err}")))
}

fn row_to_review(row: ReviewRow) -> Result<Review, ReviewRepositoryError> {
    let comment = ReviewComment::parse(row.comment)
        .map_err(|err| ReviewRepositoryError::query(format!("stored review {}: {err}", row.id)))?;
    Ok(Review {
        id: ReviewId::from_uuid(row.id),
        business_id: BusinessId::from_uuid(row.business_id),
        author_id: UserId::from_uuid(row.user_id),
        username: row.username,
        rating: stored_rating(row.rating)?,
        comment,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewReviewRow {
            id: *review.id.as_uuid(),
            business_id: *review.business_id.as_uuid(),
            user_id: *review.author_id.as_uuid(),
            username: &review.username,
            rating: i16::from(review.rating.value()),
            comment: review.comment.as_ref().map(AsRef::as_ref),
            created_at: review.created_at,
        };
        diesel::insert_into(reviews::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = reviews::table
            .filter(reviews::business_id.eq(business_id.as_uuid()))
            .select(ReviewRow::as_select())
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_review).collect()
    }
}
