//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` carrying
//! `details {field, code, value?}`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidInteger,
    InvalidTimestamp,
    InvalidDate,
    UnsupportedValue,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidInteger => "invalid_integer",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidDate => "invalid_date",
            Self::UnsupportedValue => "unsupported_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} is required")).with_code(ErrorCode::MissingField)
}

/// Require a non-blank value, returning it trimmed.
pub(crate) fn require_present(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Parse a numeric identifier from a path or query segment.
pub(crate) fn parse_id(value: &str, field: FieldName) -> Result<i64, Error> {
    let name = field.as_str();
    value.trim().parse::<i64>().map_err(|_| {
        ValidationError::new(field, format!("{name} must be an integer"))
            .with_value(ErrorCode::InvalidInteger, value)
    })
}

pub(crate) fn parse_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    let raw = require_present(value, field)?;
    let name = field.as_str();
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            ValidationError::new(field, format!("{name} must be an RFC 3339 timestamp"))
                .with_value(ErrorCode::InvalidTimestamp, &raw)
        })
}

/// Parse an optional `YYYY-MM-DD` date; blank values count as absent.
pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    let name = field.as_str();
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ValidationError::new(field, format!("{name} must be a YYYY-MM-DD date"))
                    .with_value(ErrorCode::InvalidDate, raw)
            })
        })
        .transpose()
}

/// Parse a closed-set value such as a granularity or chart type.
pub(crate) fn parse_choice<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::UnsupportedValue, value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::Granularity;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a Value> {
        err.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   ".to_owned()))]
    fn blank_values_are_missing(#[case] value: Option<String>) {
        let err = require_present(value, FieldName::new("venue")).expect_err("blank");
        assert_eq!(err.message(), "venue is required");
        assert_eq!(detail(&err, "code"), Some(&json!("missing_field")));
    }

    #[rstest]
    fn ids_must_be_integers() {
        let err = parse_id("abc", FieldName::new("event_id")).expect_err("not numeric");
        assert_eq!(detail(&err, "field"), Some(&json!("event_id")));
        assert_eq!(detail(&err, "value"), Some(&json!("abc")));
        assert_eq!(parse_id(" 42 ", FieldName::new("event_id")), Ok(42));
    }

    #[rstest]
    fn timestamps_normalise_to_utc() {
        let parsed = parse_rfc3339_timestamp(
            Some("2025-11-27T11:00:00+01:00".to_owned()),
            FieldName::new("start_time"),
        )
        .expect("valid");
        assert_eq!(parsed.to_rfc3339(), "2025-11-27T10:00:00+00:00");
    }

    #[rstest]
    fn malformed_timestamps_report_the_value() {
        let err = parse_rfc3339_timestamp(Some("tomorrow".to_owned()), FieldName::new("end_time"))
            .expect_err("malformed");
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_timestamp")));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("2025-11-01"), NaiveDate::from_ymd_opt(2025, 11, 1))]
    fn optional_dates(#[case] raw: Option<&str>, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_optional_date(raw, FieldName::new("start")), Ok(expected));
    }

    #[rstest]
    fn malformed_dates_are_rejected() {
        let err = parse_optional_date(Some("01/11/2025"), FieldName::new("start"))
            .expect_err("wrong format");
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_date")));
    }

    #[rstest]
    fn choices_use_the_parser_message() {
        let err = parse_choice::<Granularity>("daily", FieldName::new("granularity"))
            .expect_err("unsupported");
        assert_eq!(detail(&err, "code"), Some(&json!("unsupported_value")));
        assert_eq!(
            parse_choice::<Granularity>("monthly", FieldName::new("granularity")),
            Ok(Granularity::Monthly)
        );
    }
}
