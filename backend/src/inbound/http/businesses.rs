//! Business listing API handlers.
//!
//! ```text
//! GET  /api/businesses?search=cafe
//! GET  /api/businesses/featured
//! GET  /api/businesses/{id}
//! POST /api/businesses {"name":"Joe's Cafe","category":"Cafe",...}
//! POST /api/businesses/{id}/aggregate
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Business, BusinessDraft, PriceRange, SearchQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_business_validation, missing_field_error, parse_business_id,
};

/// Business listing as returned by every listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    pub id: Uuid,
    #[schema(example = "Joe's Cafe")]
    pub name: String,
    #[schema(example = "Cafe")]
    pub category: String,
    #[schema(example = "12 Harbour Road")]
    pub location: String,
    #[schema(example = "555-0100")]
    pub contact: String,
    #[schema(example = "$$")]
    pub price_range: String,
    /// Mean rating rounded to one decimal place; 0 without reviews.
    #[schema(example = 4.0)]
    pub avg_rating: f64,
    pub review_count: u32,
}

impl From<Business> for BusinessResponse {
    fn from(business: Business) -> Self {
        Self {
            id: *business.id.as_uuid(),
            name: business.name,
            category: business.category,
            location: business.location,
            contact: business.contact,
            price_range: business.price_range.as_str().to_owned(),
            avg_rating: business.rating.average().as_f64(),
            review_count: business.rating.review_count(),
        }
    }
}

/// Request body for `POST /api/businesses`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    #[schema(example = "Joe's Cafe")]
    pub name: Option<String>,
    #[schema(example = "Cafe")]
    pub category: Option<String>,
    #[schema(example = "12 Harbour Road")]
    pub location: Option<String>,
    #[schema(example = "555-0100")]
    pub contact: Option<String>,
    /// One of `$`, `$$`, `$$$`; defaults to `$`.
    #[schema(example = "$")]
    pub price_range: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> ApiResult<String> {
    value.ok_or_else(|| missing_field_error(FieldName::new(field)))
}

impl CreateBusinessRequest {
    fn into_draft(self) -> ApiResult<BusinessDraft> {
        let price_range = self
            .price_range
            .as_deref()
            .map(str::parse::<PriceRange>)
            .transpose()
            .map_err(map_business_validation)?;
        BusinessDraft::try_new(
            required(self.name, "name")?,
            required(self.category, "category")?,
            required(self.location, "location")?,
            required(self.contact, "contact")?,
            price_range,
        )
        .map_err(map_business_validation)
    }
}

/// Query string for `GET /api/businesses`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive text matched against name, category and location.
    pub search: Option<String>,
}

fn responses(businesses: Vec<Business>) -> Vec<BusinessResponse> {
    businesses.into_iter().map(BusinessResponse::from).collect()
}

/// Search listings, ordered by name.
#[utoipa::path(
    get,
    path = "/api/businesses",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching listings", body = [BusinessResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["businesses"],
    operation_id = "searchBusinesses",
    security([])
)]
#[get("/businesses")]
pub async fn search_businesses(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<BusinessResponse>>> {
    let query = SearchQuery::new(params.into_inner().search);
    let found = state.businesses.search(&query).await?;
    Ok(web::Json(responses(found)))
}

/// The three best-rated listings.
#[utoipa::path(
    get,
    path = "/api/businesses/featured",
    responses(
        (status = 200, description = "Featured listings", body = [BusinessResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["businesses"],
    operation_id = "featuredBusinesses",
    security([])
)]
#[get("/businesses/featured")]
pub async fn featured_businesses(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<BusinessResponse>>> {
    let featured = state.businesses.featured().await?;
    Ok(web::Json(responses(featured)))
}

/// Fetch one listing.
#[utoipa::path(
    get,
    path = "/api/businesses/{id}",
    params(("id" = Uuid, Path, description = "Business id")),
    responses(
        (status = 200, description = "Listing", body = BusinessResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Unknown business", body = ErrorSchema)
    ),
    tags = ["businesses"],
    operation_id = "getBusiness",
    security([])
)]
#[get("/businesses/{id}")]
pub async fn get_business(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BusinessResponse>> {
    let id = parse_business_id(&path, FieldName::new("id"))?;
    let business = state.businesses.get(&id).await?;
    Ok(web::Json(business.into()))
}

/// Create a listing with an empty aggregate.
#[utoipa::path(
    post,
    path = "/api/businesses",
    request_body = CreateBusinessRequest,
    responses(
        (status = 201, description = "Listing created", body = BusinessResponse),
        (status = 400, description = "Invalid listing", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["businesses"],
    operation_id = "createBusiness"
)]
#[post("/businesses")]
pub async fn create_business(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateBusinessRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let business = state
        .business_commands
        .create(&caller.into_inner(), draft)
        .await?;
    Ok(HttpResponse::Created().json(BusinessResponse::from(business)))
}

/// Recompute a listing's aggregate from its reviews.
#[utoipa::path(
    post,
    path = "/api/businesses/{id}/aggregate",
    params(("id" = Uuid, Path, description = "Business id")),
    responses(
        (status = 200, description = "Reconciled listing", body = BusinessResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown business", body = ErrorSchema)
    ),
    tags = ["businesses"],
    operation_id = "reconcileBusinessAggregate"
)]
#[post("/businesses/{id}/aggregate")]
pub async fn reconcile_business(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<BusinessResponse>> {
    let id = parse_business_id(&path, FieldName::new("id"))?;
    let business = state.reconciler.reconcile(&id).await?;
    Ok(web::Json(business.into()))
}

#[cfg(test)]
#[path = "businesses_tests.rs"]
mod tests;
