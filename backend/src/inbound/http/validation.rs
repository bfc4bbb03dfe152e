//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection becomes [`Error::invalid_request`] with `details` naming
//! the offending field and a stable code.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{Error, IdValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidId,
    InvalidValue,
    InvalidDate,
    InvalidTimestamp,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::InvalidValue => "invalid_value",
            Self::InvalidDate => "invalid_date",
            Self::InvalidTimestamp => "invalid_timestamp",
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

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn rejection(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn rejection_at(
    field: FieldName,
    code: ValidationCode,
    index: usize,
    value: impl Into<String>,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "index": index,
        "value": value.into(),
        "code": code.as_str(),
    }))
}

/// Map a domain value-type rejection onto `field`.
pub(crate) fn field_value<T, E: Display>(result: Result<T, E>, field: FieldName) -> Result<T, Error> {
    result.map_err(|err| rejection(field, ValidationCode::InvalidValue, err.to_string()))
}

/// Validate an optional field, leaving `None` untouched.
pub(crate) fn optional_field_value<R, T, E: Display>(
    raw: Option<R>,
    field: FieldName,
    parse: impl FnOnce(R) -> Result<T, E>,
) -> Result<Option<T>, Error> {
    raw.map(|value| field_value(parse(value), field)).transpose()
}

/// Parse an identifier from a path segment.
pub(crate) fn parse_id<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdValidationError>,
{
    raw.parse::<T>()
        .map_err(|err| rejection(field, ValidationCode::InvalidId, err.to_string()))
}

/// Validate a raw integer identifier from a request body.
pub(crate) fn body_id<T>(raw: i32, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i32, Error = IdValidationError>,
{
    T::try_from(raw).map_err(|err| rejection(field, ValidationCode::InvalidId, err.to_string()))
}

/// Validate a list of raw identifiers, reporting the first bad index.
pub(crate) fn body_id_list<T>(raw: Vec<i32>, field: FieldName) -> Result<Vec<T>, Error>
where
    T: TryFrom<i32, Error = IdValidationError>,
{
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            T::try_from(value).map_err(|err| {
                rejection_at(
                    field,
                    ValidationCode::InvalidId,
                    index,
                    value.to_string(),
                    err.to_string(),
                )
            })
        })
        .collect()
}

/// Parse a calendar date; RFC 3339 timestamps are truncated to their date.
pub(crate) fn parse_date(raw: &str, field: FieldName) -> Result<NaiveDate, Error> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|ts| ts.date_naive()))
        .map_err(|_| {
            rejection(
                field,
                ValidationCode::InvalidDate,
                format!("{} must be a YYYY-MM-DD date", field.as_str()),
            )
        })
}

/// Parse an RFC 3339 instant into UTC.
pub(crate) fn parse_rfc3339_timestamp(raw: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            rejection(
                field,
                ValidationCode::InvalidTimestamp,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
            )
        })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    raw.map(|value| parse_rfc3339_timestamp(value, field)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, UserId};
    use rstest::rstest;

    const ID: FieldName = FieldName::new("id");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a serde_json::Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case("12", Some(12))]
    #[case("0", None)]
    #[case("twelve", None)]
    fn path_ids_must_be_positive_integers(#[case] raw: &str, #[case] expected: Option<i32>) {
        let parsed = parse_id::<UserId>(raw, ID);
        assert_eq!(parsed.as_ref().ok().map(|id| id.get()), expected);
        if let Err(error) = parsed {
            assert_eq!(error.code(), ErrorCode::InvalidRequest);
            assert_eq!(detail(&error, "code"), Some(&json!("invalid_id")));
        }
    }

    #[rstest]
    fn id_lists_report_the_first_bad_index() {
        let error = body_id_list::<UserId>(vec![3, 4, -1, 0], FieldName::new("voters"))
            .expect_err("negative id rejected");
        assert_eq!(detail(&error, "index"), Some(&json!(2)));
        assert_eq!(detail(&error, "field"), Some(&json!("voters")));
    }

    #[rstest]
    #[case("2021-03-01", Some("2021-03-01"))]
    #[case("2021-03-01T22:30:00Z", Some("2021-03-01"))]
    #[case("01/03/2021", None)]
    fn dates_accept_plain_dates_and_timestamps(#[case] raw: &str, #[case] expected: Option<&str>) {
        let parsed = parse_date(raw, FieldName::new("date")).ok().map(|d| d.to_string());
        assert_eq!(parsed.as_deref(), expected);
    }

    #[rstest]
    fn timestamps_are_normalised_to_utc() {
        let parsed = parse_rfc3339_timestamp("2021-06-01T20:00:00+02:00", FieldName::new("start"))
            .expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), "2021-06-01T18:00:00+00:00");
    }

    #[rstest]
    fn optional_values_pass_through_none() {
        let parsed = parse_optional_rfc3339_timestamp(None, FieldName::new("end"))
            .expect("absent value accepted");
        assert!(parsed.is_none());
    }
}
