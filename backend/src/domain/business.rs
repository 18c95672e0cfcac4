//! Business listings.
//!
//! A [`BusinessDraft`] is what an authenticated caller submits; a
//! [`Business`] is the stored listing carrying its derived
//! [`RatingSummary`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::RatingSummary;

/// Maximum characters accepted for any listing text field.
pub const LISTING_FIELD_MAX: usize = 200;

/// Validation errors for listing input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusinessValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("price range must be one of $, $$, $$$")]
    InvalidPriceRange { value: String },
    #[error("business id must be a valid UUID")]
    InvalidId,
}

impl BusinessValidationError {
    /// Name of the offending input field, when there is one.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } | Self::FieldTooLong { field, .. } => *field,
            Self::InvalidPriceRange { .. } => "priceRange",
            Self::InvalidId => "id",
        }
    }
}

/// Opaque business identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(Uuid);

impl BusinessId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for BusinessId {
    type Err = BusinessValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| BusinessValidationError::InvalidId)
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ordered price tier.
///
/// # Examples
/// ```
/// use pulse_backend::domain::PriceRange;
///
/// assert_eq!("$$".parse::<PriceRange>().unwrap(), PriceRange::Moderate);
/// assert!(PriceRange::Budget < PriceRange::Premium);
/// assert_eq!(PriceRange::default(), PriceRange::Budget);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Premium,
}

impl PriceRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Premium => "$$$",
        }
    }
}

impl FromStr for PriceRange {
    type Err = BusinessValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "$" => Ok(Self::Budget),
            "$$" => Ok(Self::Moderate),
            "$$$" => Ok(Self::Premium),
            other => Err(BusinessValidationError::InvalidPriceRange {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn required_text(field: &'static str, raw: String) -> Result<String, BusinessValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BusinessValidationError::EmptyField { field });
    }
    if trimmed.chars().count() > LISTING_FIELD_MAX {
        return Err(BusinessValidationError::FieldTooLong {
            field,
            max: LISTING_FIELD_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Validated listing submitted by an authenticated caller.
///
/// ## Invariants
/// - `name`, `category`, `location` and `contact` are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessDraft {
    name: String,
    category: String,
    location: String,
    contact: String,
    price_range: PriceRange,
}

impl BusinessDraft {
    /// Validate raw listing fields. A missing price tier defaults to `$`.
    pub fn try_new(
        name: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        contact: impl Into<String>,
        price_range: Option<PriceRange>,
    ) -> Result<Self, BusinessValidationError> {
        Ok(Self {
            name: required_text("name", name.into())?,
            category: required_text("category", category.into())?,
            location: required_text("location", location.into())?,
            contact: required_text("contact", contact.into())?,
            price_range: price_range.unwrap_or_default(),
        })
    }

    /// Promote the draft to a listing with a fresh id and an empty aggregate.
    pub fn into_business(self, id: BusinessId) -> Business {
        Business {
            id,
            name: self.name,
            category: self.category,
            location: self.location,
            contact: self.contact,
            price_range: self.price_range,
            rating: RatingSummary::EMPTY,
        }
    }
}

/// Stored business listing.
///
/// ## Invariants
/// - `rating` always reflects the full review set after ingestion completes;
///   it is written only by the review aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub category: String,
    pub location: String,
    pub contact: String,
    pub price_range: PriceRange,
    pub rating: RatingSummary,
}

impl Business {
    /// Copy of this listing carrying a recomputed aggregate.
    pub fn with_rating(self, rating: RatingSummary) -> Self {
        Self { rating, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn draft_trims_fields_and_defaults_price() {
        let draft = BusinessDraft::try_new(" Joe's Cafe ", "Cafe", "Main St", "555-0100", None)
            .expect("valid draft");
        let business = draft.into_business(BusinessId::random());
        assert_eq!(business.name, "Joe's Cafe");
        assert_eq!(business.price_range, PriceRange::Budget);
        assert_eq!(business.rating, RatingSummary::EMPTY);
    }

    #[rstest]
    #[case("", "Cafe", "Main St", "555", "name")]
    #[case("Joe's", "  ", "Main St", "555", "category")]
    #[case("Joe's", "Cafe", "", "555", "location")]
    #[case("Joe's", "Cafe", "Main St", "\t", "contact")]
    fn draft_requires_every_field(
        #[case] name: &str,
        #[case] category: &str,
        #[case] location: &str,
        #[case] contact: &str,
        #[case] field: &str,
    ) {
        let err = BusinessDraft::try_new(name, category, location, contact, None)
            .expect_err("blank field");
        assert_eq!(err.field(), field);
        assert!(matches!(err, BusinessValidationError::EmptyField { .. }));
    }

    #[rstest]
    fn draft_rejects_overlong_fields() {
        let long = "x".repeat(LISTING_FIELD_MAX + 1);
        let err = BusinessDraft::try_new(long, "Cafe", "Main St", "555", None)
            .expect_err("too long");
        assert_eq!(
            err,
            BusinessValidationError::FieldTooLong {
                field: "name",
                max: LISTING_FIELD_MAX
            }
        );
    }

    #[rstest]
    #[case("$", PriceRange::Budget)]
    #[case("$$", PriceRange::Moderate)]
    #[case("$$$", PriceRange::Premium)]
    fn price_range_parses_tiers(#[case] raw: &str, #[case] expected: PriceRange) {
        assert_eq!(raw.parse::<PriceRange>().expect("valid tier"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("$$$$")]
    #[case("cheap")]
    fn price_range_rejects_unknown_tiers(#[case] raw: &str) {
        assert!(raw.parse::<PriceRange>().is_err());
    }

    #[rstest]
    fn price_range_serialises_as_symbols() {
        let json = serde_json::to_string(&PriceRange::Moderate).expect("serialises");
        assert_eq!(json, "\"$$\"");
    }

    #[rstest]
    fn business_id_rejects_non_uuid() {
        assert_eq!(
            "nope".parse::<BusinessId>(),
            Err(BusinessValidationError::InvalidId)
        );
    }
}
