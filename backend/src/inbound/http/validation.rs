//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `invalid_request` with a `details`
//! object naming the offending field and a stable machine-readable code.

use serde_json::{Value, json};

use crate::domain::{
    BusinessId, BusinessValidationError, CredentialsValidationError, Error, Rating,
    RatingValidationError, ReviewValidationError, UserValidationError,
};

/// Validation detail codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    RatingOutOfRange,
    EmptyField,
    TooLong,
    TooShort,
    InvalidValue,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::RatingOutOfRange => "rating_out_of_range",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::TooLong => "too_long",
            ErrorCode::TooShort => "too_short",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

/// Reject a body that failed to deserialise.
pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed request body: {reason}"))
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
}

pub(crate) fn parse_business_id(raw: &str, field: FieldName) -> Result<BusinessId, Error> {
    raw.parse().map_err(|_| {
        let field = field.as_str();
        Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
            "field": field,
            "value": raw,
            "code": ErrorCode::InvalidUuid.as_str(),
        }))
    })
}

/// Require a JSON value to be an integer star rating.
pub(crate) fn parse_rating(raw: Option<&Value>) -> Result<Rating, Error> {
    let field = FieldName::new("rating");
    let value = raw.ok_or_else(|| missing_field_error(field))?;
    value
        .as_i64()
        .and_then(|number| Rating::new(number).ok())
        .ok_or_else(|| rating_error(field))
}

fn rating_error(field: FieldName) -> Error {
    field_error(
        field.as_str(),
        ErrorCode::RatingOutOfRange,
        format!(
            "rating must be an integer between {} and {}",
            crate::domain::RATING_MIN,
            crate::domain::RATING_MAX
        ),
    )
}

pub(crate) fn map_review_validation(err: ReviewValidationError) -> Error {
    match err {
        ReviewValidationError::Rating(RatingValidationError::OutOfRange { .. }) => {
            rating_error(FieldName::new("rating"))
        }
        ReviewValidationError::Rating(other) => {
            field_error("rating", ErrorCode::InvalidValue, other.to_string())
        }
        ReviewValidationError::CommentTooLong { .. } => {
            field_error("comment", ErrorCode::TooLong, err.to_string())
        }
    }
}

pub(crate) fn map_business_validation(err: BusinessValidationError) -> Error {
    let code = match err {
        BusinessValidationError::EmptyField { .. } => ErrorCode::EmptyField,
        BusinessValidationError::FieldTooLong { .. } => ErrorCode::TooLong,
        BusinessValidationError::InvalidPriceRange { .. } | BusinessValidationError::InvalidId => {
            ErrorCode::InvalidValue
        }
    };
    field_error(err.field(), code, err.to_string())
}

fn user_code(err: &UserValidationError) -> ErrorCode {
    match err {
        UserValidationError::EmptyUsername => ErrorCode::EmptyField,
        UserValidationError::UsernameTooShort { .. } => ErrorCode::TooShort,
        UserValidationError::UsernameTooLong { .. } => ErrorCode::TooLong,
        _ => ErrorCode::InvalidValue,
    }
}

pub(crate) fn map_credentials_validation(err: CredentialsValidationError) -> Error {
    let code = match &err {
        CredentialsValidationError::User(inner) => user_code(inner),
        CredentialsValidationError::EmptyPassword => ErrorCode::EmptyField,
        CredentialsValidationError::PasswordTooShort { .. } => ErrorCode::TooShort,
        CredentialsValidationError::PasswordTooLong { .. } => ErrorCode::TooLong,
    };
    field_error(err.field(), code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as ApiCode;
    use rstest::rstest;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
    }

    #[rstest]
    #[case(json!(1), 1)]
    #[case(json!(5), 5)]
    fn integer_ratings_in_range_parse(#[case] raw: Value, #[case] expected: u8) {
        let rating = parse_rating(Some(&raw)).expect("valid rating");
        assert_eq!(rating.value(), expected);
    }

    #[rstest]
    #[case(json!(0))]
    #[case(json!(6))]
    #[case(json!(4.5))]
    #[case(json!("5"))]
    #[case(json!(null))]
    fn bad_ratings_are_rejected(#[case] raw: Value) {
        let err = parse_rating(Some(&raw)).expect_err("invalid rating");
        assert_eq!(err.code(), ApiCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some("rating"));
        assert_eq!(detail(&err, "code"), Some("rating_out_of_range"));
    }

    #[rstest]
    fn missing_rating_is_reported() {
        let err = parse_rating(None).expect_err("missing");
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }

    #[rstest]
    fn non_uuid_business_id_is_rejected() {
        let err = parse_business_id("joes-cafe", FieldName::new("id")).expect_err("invalid");
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
        assert_eq!(detail(&err, "value"), Some("joes-cafe"));
    }

    #[rstest]
    fn business_validation_names_the_field() {
        let err = map_business_validation(BusinessValidationError::EmptyField { field: "contact" });
        assert_eq!(detail(&err, "field"), Some("contact"));
        assert_eq!(detail(&err, "code"), Some("empty_field"));
    }

    #[rstest]
    fn short_password_is_reported() {
        let err = map_credentials_validation(CredentialsValidationError::PasswordTooShort {
            min: 6,
        });
        assert_eq!(detail(&err, "field"), Some("password"));
        assert_eq!(detail(&err, "code"), Some("too_short"));
    }
}
