//! Reviews left against a business.
//!
//! Reviews are immutable once stored. The author's username is copied onto
//! the review at write time and is not updated if the account is renamed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BusinessId, Rating, RatingValidationError, UserId};

/// Maximum characters accepted in a review comment.
pub const COMMENT_MAX: usize = 2000;

/// Validation errors for review submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error(transparent)]
    Rating(#[from] RatingValidationError),
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
}

/// Review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
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

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Optional free-text comment, trimmed; blank input is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewComment(String);

impl ReviewComment {
    /// Normalise raw comment text.
    ///
    /// # Examples
    /// ```
    /// use pulse_backend::domain::ReviewComment;
    ///
    /// assert_eq!(ReviewComment::parse(Some("  ".into())).unwrap(), None);
    /// let comment = ReviewComment::parse(Some(" Great coffee ".into())).unwrap();
    /// assert_eq!(comment.unwrap().as_ref(), "Great coffee");
    /// ```
    pub fn parse(raw: Option<String>) -> Result<Option<Self>, ReviewValidationError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > COMMENT_MAX {
            return Err(ReviewValidationError::CommentTooLong { max: COMMENT_MAX });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for ReviewComment {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated review content before it is attributed and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    pub rating: Rating,
    pub comment: Option<ReviewComment>,
}

impl ReviewSubmission {
    /// Validate a raw rating and optional comment.
    pub fn try_new(rating: i64, comment: Option<String>) -> Result<Self, ReviewValidationError> {
        Ok(Self {
            rating: Rating::new(rating)?,
            comment: ReviewComment::parse(comment)?,
        })
    }
}

/// Stored review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub business_id: BusinessId,
    pub author_id: UserId,
    /// Author's username at the time the review was written.
    pub username: String,
    pub rating: Rating,
    pub comment: Option<ReviewComment>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(6)]
    fn submission_rejects_out_of_range_rating(#[case] rating: i64) {
        let err = ReviewSubmission::try_new(rating, None).expect_err("invalid rating");
        assert!(matches!(err, ReviewValidationError::Rating(_)));
    }

    #[rstest]
    fn submission_rejects_overlong_comment() {
        let comment = "a".repeat(COMMENT_MAX + 1);
        let err = ReviewSubmission::try_new(4, Some(comment)).expect_err("too long");
        assert_eq!(err, ReviewValidationError::CommentTooLong { max: COMMENT_MAX });
    }

    #[rstest]
    fn submission_accepts_comment_at_limit() {
        let comment = "a".repeat(COMMENT_MAX);
        let submission = ReviewSubmission::try_new(4, Some(comment)).expect("at limit");
        assert!(submission.comment.is_some());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   \n"))]
    fn blank_comments_are_absent(#[case] raw: Option<&str>) {
        let submission =
            ReviewSubmission::try_new(3, raw.map(str::to_owned)).expect("valid submission");
        assert!(submission.comment.is_none());
    }
}
