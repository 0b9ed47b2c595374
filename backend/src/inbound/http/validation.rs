//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path and query parameters arrive as strings so a malformed value produces
//! a field-level `invalid_request` rather than a bare 404 from the router.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{DateWindow, Error, IdParseError, Month, TrashTable};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidMonth,
    InvalidWindow,
    UnknownTable,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidMonth => "invalid_month",
            ErrorCode::InvalidWindow => "invalid_window",
            ErrorCode::UnknownTable => "unknown_table",
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

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Parse any typed identifier from a path or query segment.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdParseError>,
{
    value.parse().map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_optional_id<T>(value: Option<&str>, field: FieldName) -> Result<Option<T>, Error>
where
    T: FromStr<Err = IdParseError>,
{
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_id(raw, field))
        .transpose()
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    let invalid = || {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must be a date in YYYY-MM-DD form"))
            .with_value(ErrorCode::InvalidDate, value)
    };
    let trimmed = value.trim();
    // `%Y` also takes signed and five-digit years.
    if trimmed.len() != 10 || !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())
}

pub(crate) fn parse_month(value: &str, field: FieldName) -> Result<Month, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must be a month in YYYY-MM form"))
            .with_value(ErrorCode::InvalidMonth, value)
    })
}

pub(crate) fn parse_trash_table(value: &str) -> Result<TrashTable, Error> {
    value.parse().map_err(|err| {
        ValidationError::new("table", format!("{err}"))
            .with_value(ErrorCode::UnknownTable, value)
    })
}

/// Longest window a caller may request, in calendar months.
pub(crate) const MAX_WINDOW_MONTHS: u64 = 120;

/// Build a window from optional `from`/`to` query values.
///
/// Both bounds absent yields `default`. Supplying only one bound is rejected
/// so a typo cannot silently widen a report to the default period. Windows
/// wider than [`MAX_WINDOW_MONTHS`] are rejected.
pub(crate) fn parse_window(
    from: Option<&str>,
    to: Option<&str>,
    default: impl FnOnce() -> DateWindow,
) -> Result<DateWindow, Error> {
    const FROM: FieldName = FieldName::new("from");
    const TO: FieldName = FieldName::new("to");

    match (from, to) {
        (None, None) => Ok(default()),
        (Some(_), None) => Err(missing_field_error(TO)),
        (None, Some(_)) => Err(missing_field_error(FROM)),
        (Some(from), Some(to)) => {
            let start = parse_date(from, FROM)?;
            let end = parse_date(to, TO)?;
            let window = DateWindow::new(start, end).map_err(|err| {
                ValidationError::new(TO.as_str(), err.to_string())
                    .with_code(ErrorCode::InvalidWindow)
            })?;
            if window.month_span() > MAX_WINDOW_MONTHS {
                return Err(ValidationError::new(
                    TO.as_str(),
                    format!("window must not span more than {MAX_WINDOW_MONTHS} months"),
                )
                .with_code(ErrorCode::InvalidWindow));
            }
            Ok(window)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, PropertyId};
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn invalid_ids_name_the_field() {
        let err = parse_id::<PropertyId>("nope", FieldName::new("id")).expect_err("invalid");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "id");
        assert_eq!(details["code"], "invalid_uuid");
        assert_eq!(details["value"], "nope");
    }

    #[test]
    fn blank_optional_ids_are_absent() {
        let parsed = parse_optional_id::<PropertyId>(Some(" "), FieldName::new("propertyId"))
            .expect("blank is fine");
        assert!(parsed.is_none());
    }

    #[rstest]
    #[case("2024-02-30")]
    #[case("03/06/2024")]
    #[case("")]
    #[case("+262142-11-01")]
    #[case("-0001-01-01")]
    #[case("12024-01-01")]
    fn rejects_bad_dates(#[case] raw: &str) {
        let err = parse_date(raw, FieldName::new("moveInDate")).expect_err("invalid");
        assert_eq!(err.details().expect("details")["code"], "invalid_date");
    }

    #[test]
    fn months_parse_from_year_month() {
        let month = parse_month("2024-06", FieldName::new("month")).expect("month");
        assert_eq!(month.first_day(), date(2024, 6, 1));
        assert!(parse_month("2024-6", FieldName::new("month")).is_err());
    }

    #[test]
    fn unknown_trash_tables_are_rejected() {
        let err = parse_trash_table("users").expect_err("not trashable");
        assert_eq!(err.details().expect("details")["code"], "unknown_table");
    }

    #[test]
    fn absent_bounds_use_the_default_window() {
        let default = DateWindow::current_month(date(2024, 6, 12));
        assert_eq!(parse_window(None, None, || default).expect("window"), default);
    }

    #[rstest]
    #[case(Some("2024-06-01"), None, "to")]
    #[case(None, Some("2024-06-30"), "from")]
    fn half_open_windows_are_rejected(
        #[case] from: Option<&str>,
        #[case] to: Option<&str>,
        #[case] missing: &str,
    ) {
        let err = parse_window(from, to, || DateWindow::current_month(date(2024, 6, 1)))
            .expect_err("rejected");
        assert_eq!(err.details().expect("details")["field"], missing);
    }

    #[test]
    fn inverted_windows_are_rejected() {
        let err = parse_window(Some("2024-06-30"), Some("2024-06-01"), || {
            DateWindow::current_month(date(2024, 6, 1))
        })
        .expect_err("inverted");
        assert_eq!(err.details().expect("details")["code"], "invalid_window");
    }

    #[rstest]
    #[case("2014-01-01", "2024-06-30")]
    #[case("0001-01-01", "9999-12-31")]
    fn overly_wide_windows_are_rejected(#[case] from: &str, #[case] to: &str) {
        let err = parse_window(Some(from), Some(to), || {
            DateWindow::current_month(date(2024, 6, 1))
        })
        .expect_err("too wide");
        let details = err.details().expect("details");
        assert_eq!(details["field"], "to");
        assert_eq!(details["code"], "invalid_window");
    }

    #[test]
    fn ten_year_windows_are_accepted() {
        let window = parse_window(Some("2015-01-01"), Some("2024-12-31"), || {
            DateWindow::current_month(date(2024, 6, 1))
        })
        .expect("window");
        assert_eq!(window.month_span(), MAX_WINDOW_MONTHS);
    }
}
