//! PostgreSQL-backed `BusinessRepository` implementation using Diesel ORM.
//!
//! Search ordering and featured ordering are expressed in SQL and agree with
//! [`crate::domain::search`], which the in-memory adapter uses directly.
//!
//! Aggregate refreshes lock the listing row with `SELECT ... FOR UPDATE`
//! before reading its ratings, so refreshes from any process are serialised
//! per listing and the last one to commit has seen every committed review.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{BusinessRepository, BusinessRepositoryError};
use crate::domain::{AverageRating, Business, BusinessId, Rating, RatingSummary, SearchQuery};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BusinessRow, NewBusinessRow, RatingUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{businesses, reviews};

diesel::define_sql_function! {
    /// PostgreSQL `lower(text)`.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed implementation of the `BusinessRepository` port.
#[derive(Clone)]
pub struct DieselBusinessRepository {
    pool: DbPool,
}

impl DieselBusinessRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> BusinessRepositoryError {
    map_pool_error(error, BusinessRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> BusinessRepositoryError {
    map_diesel_error(
        error,
        BusinessRepositoryError::query,
        BusinessRepositoryError::connection,
    )
}

/// Escape `LIKE` metacharacters so the needle matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_business(row: BusinessRow) -> Result<Business, BusinessRepositoryError> {
    let price_range = row
        .price_range
        .parse()
        .map_err(|err| BusinessRepositoryError::query(format!("stored listing {}: {err}", row.id)))?;
    let average = AverageRating::from_tenths(i64::from(row.avg_rating_tenths))
        .map_err(|err| BusinessRepositoryError::query(format!("stored listing {}: {err}", row.id)))?;
    let review_count = u32::try_from(row.review_count).map_err(|_| {
        BusinessRepositoryError::query(format!("stored listing {}: negative review count", row.id))
    })?;
    Ok(Business {
        id: BusinessId::from_uuid(row.id),
        name: row.name,
        category: row.category,
        location: row.location,
        contact: row.contact,
        price_range,
        rating: RatingSummary::from_parts(average, review_count),
    })
}

fn rows_to_businesses(rows: Vec<BusinessRow>) -> Result<Vec<Business>, BusinessRepositoryError> {
    rows.into_iter().map(row_to_business).collect()
}

fn stored_ratings(values: Vec<i16>) -> Result<Vec<Rating>, BusinessRepositoryError> {
    values
        .into_iter()
        .map(|value| {
            Rating::new(i64::from(value))
                .map_err(|err| BusinessRepositoryError::query(format!("stored review: {err}")))
        })
        .collect()
}

fn rating_update(summary: RatingSummary) -> Result<RatingUpdate, BusinessRepositoryError> {
    let avg_rating_tenths = i16::try_from(summary.average().tenths())
        .map_err(|_| BusinessRepositoryError::query("average out of column range"))?;
    let review_count = i32::try_from(summary.review_count())
        .map_err(|_| BusinessRepositoryError::query("review count out of column range"))?;
    Ok(RatingUpdate {
        avg_rating_tenths,
        review_count,
    })
}

#[async_trait]
impl BusinessRepository for DieselBusinessRepository {
    async fn insert(&self, business: &Business) -> Result<(), BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rating = rating_update(business.rating)?;
        let row = NewBusinessRow {
            id: *business.id.as_uuid(),
            name: &business.name,
            category: &business.category,
            location: &business.location,
            contact: &business.contact,
            price_range: business.price_range.as_str(),
            avg_rating_tenths: rating.avg_rating_tenths,
            review_count: rating.review_count,
        };
        diesel::insert_into(businesses::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &BusinessId,
    ) -> Result<Option<Business>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = businesses::table
            .find(id.as_uuid())
            .select(BusinessRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_business).transpose()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut statement = businesses::table
            .select(BusinessRow::as_select())
            .order((lower(businesses::name).asc(), businesses::id.asc()))
            .into_boxed();
        if let Some(needle) = query.needle() {
            let pattern = like_pattern(needle);
            statement = statement.filter(
                businesses::name
                    .ilike(pattern.clone())
                    .or(businesses::category.ilike(pattern.clone()))
                    .or(businesses::location.ilike(pattern)),
            );
        }
        let rows = statement.load(&mut conn).await.map_err(diesel_error)?;
        rows_to_businesses(rows)
    }

    async fn featured(&self, limit: usize) -> Result<Vec<Business>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = businesses::table
            .select(BusinessRow::as_select())
            .order((
                businesses::avg_rating_tenths.desc(),
                businesses::review_count.desc(),
                businesses::id.asc(),
            ))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_businesses(rows)
    }

    async fn list_ids(&self) -> Result<Vec<BusinessId>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<Uuid> = businesses::table
            .select(businesses::id)
            .order(businesses::id.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(ids.into_iter().map(BusinessId::from_uuid).collect())
    }

    async fn refresh_rating(
        &self,
        id: &BusinessId,
    ) -> Result<RatingSummary, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let business_id = *id.as_uuid();
        let refreshed = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let locked: Option<Uuid> = businesses::table
                        .find(business_id)
                        .select(businesses::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(Ok(None));
                    }

                    let values: Vec<i16> = reviews::table
                        .filter(reviews::business_id.eq(business_id))
                        .select(reviews::rating)
                        .load(conn)
                        .await?;
                    let summary = match stored_ratings(values) {
                        Ok(ratings) => RatingSummary::from_ratings(&ratings),
                        Err(err) => return Ok(Err(err)),
                    };
                    let changes = match rating_update(summary) {
                        Ok(changes) => changes,
                        Err(err) => return Ok(Err(err)),
                    };
                    diesel::update(businesses::table.find(business_id))
                        .set(&changes)
                        .execute(conn)
                        .await?;
                    Ok(Ok(Some(summary)))
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)??;
        refreshed.ok_or_else(|| BusinessRepositoryError::missing(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cafe", "%cafe%")]
    #[case("100%", "%100\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("c:\\", "%c:\\\\%")]
    fn like_pattern_escapes_metacharacters(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(needle), expected);
    }

    fn row(price_range: &str, tenths: i16, count: i32) -> BusinessRow {
        BusinessRow {
            id: Uuid::new_v4(),
            name: "Joe's Cafe".to_owned(),
            category: "Cafe".to_owned(),
            location: "Main St".to_owned(),
            contact: "555-0100".to_owned(),
            price_range: price_range.to_owned(),
            avg_rating_tenths: tenths,
            review_count: count,
        }
    }

    #[rstest]
    fn stored_ratings_reject_out_of_range_values() {
        assert_eq!(stored_ratings(vec![4, 5]).expect("valid").len(), 2);
        let err = stored_ratings(vec![4, 0]).expect_err("corrupt rating");
        assert!(matches!(err, BusinessRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_converts_to_business() {
        let business = row_to_business(row("$$", 45, 12)).expect("valid row");
        assert_eq!(business.price_range.as_str(), "$$");
        assert_eq!(business.rating.average().to_string(), "4.5");
        assert_eq!(business.rating.review_count(), 12);
    }

    #[rstest]
    #[case(row("$$$$", 0, 0))]
    #[case(row("$", 51, 1))]
    #[case(row("$", 10, -1))]
    fn corrupt_rows_are_query_errors(#[case] corrupt: BusinessRow) {
        let err = row_to_business(corrupt).expect_err("corrupt row");
        assert!(matches!(err, BusinessRepositoryError::Query { .. }));
    }
}
