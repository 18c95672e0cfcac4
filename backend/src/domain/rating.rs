//! Star ratings and the per-business aggregate derived from them.
//!
//! The aggregate is held as whole tenths of a star so that the mean is
//! computed in exact integer arithmetic. It is rendered as a decimal number
//! with one fractional digit only at the edges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest star rating a review may carry.
pub const RATING_MIN: u8 = 1;
/// Highest star rating a review may carry.
pub const RATING_MAX: u8 = 5;

/// Validation errors for [`Rating`] and [`AverageRating`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingValidationError {
    #[error("rating must be between {min} and {max}, got {value}")]
    OutOfRange { value: i64, min: u8, max: u8 },
    #[error("average rating must be between 0.0 and 5.0, got {tenths} tenths")]
    AverageOutOfRange { tenths: i64 },
}

/// Integer star rating in `1..=5`.
///
/// # Examples
/// ```
/// use pulse_backend::domain::Rating;
///
/// assert!(Rating::new(5).is_ok());
/// assert!(Rating::new(0).is_err());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating.
    pub fn new(value: i64) -> Result<Self, RatingValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (RATING_MIN..=RATING_MAX).contains(stars))
            .map(Self)
            .ok_or(RatingValidationError::OutOfRange {
                value,
                min: RATING_MIN,
                max: RATING_MAX,
            })
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mean rating rounded half up to one decimal place, stored as tenths.
///
/// Serialises as a JSON number such as `4.0` or `3.7`.
///
/// # Examples
/// ```
/// use pulse_backend::domain::AverageRating;
///
/// let avg = AverageRating::from_tenths(37).expect("in range");
/// assert_eq!(avg.to_string(), "3.7");
/// assert_eq!(avg.as_f64(), 3.7);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "f64")]
pub struct AverageRating(u16);

impl AverageRating {
    /// Aggregate of a business nobody has reviewed yet.
    pub const ZERO: Self = Self(0);

    const MAX_TENTHS: u16 = (RATING_MAX as u16) * 10;

    /// Build from a tenths-of-a-star value in `0..=50`.
    pub fn from_tenths(tenths: i64) -> Result<Self, RatingValidationError> {
        u16::try_from(tenths)
            .ok()
            .filter(|value| *value <= Self::MAX_TENTHS)
            .map(Self)
            .ok_or(RatingValidationError::AverageOutOfRange { tenths })
    }

    pub fn tenths(self) -> u16 {
        self.0
    }

    /// Decimal rendering used by JSON payloads.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl From<AverageRating> for f64 {
    fn from(value: AverageRating) -> Self {
        value.as_f64()
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Derived aggregate attached to every business.
///
/// ## Invariants
/// - `review_count` is the number of reviews the summary was computed from.
/// - `average` is their mean rounded half up to one decimal, or zero when
///   there are no reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingSummary {
    average: AverageRating,
    review_count: u32,
}

impl RatingSummary {
    /// Summary of a business with no reviews.
    pub const EMPTY: Self = Self {
        average: AverageRating::ZERO,
        review_count: 0,
    };

    /// Recompute the aggregate from the full set of ratings.
    ///
    /// # Examples
    /// ```
    /// use pulse_backend::domain::{Rating, RatingSummary};
    ///
    /// let ratings = [Rating::new(5).unwrap(), Rating::new(3).unwrap()];
    /// let summary = RatingSummary::from_ratings(&ratings);
    /// assert_eq!(summary.review_count(), 2);
    /// assert_eq!(summary.average().to_string(), "4.0");
    /// ```
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        if ratings.is_empty() {
            return Self::EMPTY;
        }
        let count = ratings.len() as u64;
        let sum: u64 = ratings.iter().map(|rating| u64::from(rating.value())).sum();
        // round(sum / count, 1) == floor((20 * sum + count) / (2 * count)) / 10
        let tenths = (sum * 20 + count) / (count * 2);
        Self {
            average: AverageRating(u16::try_from(tenths).unwrap_or(AverageRating::MAX_TENTHS)),
            review_count: u32::try_from(count).unwrap_or(u32::MAX),
        }
    }

    /// Rebuild a summary from persisted columns.
    pub fn from_parts(average: AverageRating, review_count: u32) -> Self {
        Self {
            average,
            review_count,
        }
    }

    pub fn average(&self) -> AverageRating {
        self.average
    }

    pub fn review_count(&self) -> u32 {
        self.review_count
    }
}
