//! Review API handlers.
//!
//! ```text
//! POST /api/businesses/{id}/reviews {"rating":5,"comment":"Great coffee"}
//! GET  /api/businesses/{id}/reviews
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Review, ReviewComment, ReviewSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_review_validation, parse_business_id, parse_rating,
};

/// Stored review as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    /// Author's username when the review was written.
    #[schema(example = "Ada")]
    pub username: String,
    #[schema(minimum = 1, maximum = 5, example = 5)]
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: *review.id.as_uuid(),
            business_id: *review.business_id.as_uuid(),
            user_id: *review.author_id.as_uuid(),
            username: review.username,
            rating: review.rating.value(),
            comment: review.comment.map(|comment| comment.as_ref().to_owned()),
            date: review.created_at,
        }
    }
}

/// Request body for `POST /api/businesses/{id}/reviews`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReviewRequest {
    /// Whole stars from 1 to 5.
    #[schema(value_type = i64, minimum = 1, maximum = 5, example = 5)]
    pub rating: Option<Value>,
    #[schema(example = "Great coffee")]
    pub comment: Option<String>,
}

impl ReviewRequest {
    fn into_submission(self) -> ApiResult<ReviewSubmission> {
        let rating = parse_rating(self.rating.as_ref())?;
        let comment = ReviewComment::parse(self.comment).map_err(map_review_validation)?;
        Ok(ReviewSubmission { rating, comment })
    }
}

/// Post a review and refresh the listing's aggregate.
#[utoipa::path(
    post,
    path = "/api/businesses/{id}/reviews",
    params(("id" = Uuid, Path, description = "Business id")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = ReviewResponse),
        (status = 400, description = "Invalid review", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown business", body = ErrorSchema),
        (status = 503, description = "Store unavailable; retry", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "submitReview"
)]
#[post("/businesses/{id}/reviews")]
pub async fn submit_review(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let business_id = parse_business_id(&path, FieldName::new("id"))?;
    let submission = payload.into_inner().into_submission()?;
    let review = state
        .review_commands
        .submit(&caller.into_inner(), &business_id, submission)
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}

/// Reviews for a listing, newest first.
#[utoipa::path(
    get,
    path = "/api/businesses/{id}/reviews",
    params(("id" = Uuid, Path, description = "Business id")),
    responses(
        (status = 200, description = "Reviews", body = [ReviewResponse]),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Unknown business", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/businesses/{id}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let business_id = parse_business_id(&path, FieldName::new("id"))?;
    let reviews = state.reviews.list_for_business(&business_id).await?;
    Ok(web::Json(
        reviews.into_iter().map(ReviewResponse::from).collect(),
    ))
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
