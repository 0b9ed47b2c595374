//! Contact details: Rwandan mobile numbers and email addresses.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        // Subscriber part: operator prefix 72/73 (Airtel), 78/79 (MTN) plus
        // seven digits. Country code may be written with or without `+`.
        Regex::new(r"^(?:\+?250|0)(7[2389][0-9]{7})$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Reasons a phone number is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhoneValidationError {
    /// Nothing left after stripping separators.
    #[error("phone number must not be empty")]
    Empty,
    /// Not a Rwandan mobile number in a recognised form.
    #[error("phone number must look like 07XXXXXXXX or +2507XXXXXXXX")]
    InvalidFormat,
}

/// A validated Rwandan mobile number stored in E.164 form.
///
/// # Examples
/// ```
/// use icumbi::domain::PhoneNumber;
///
/// let phone = PhoneNumber::parse("0788 123 456").unwrap();
/// assert_eq!(phone.e164(), "+250788123456");
/// assert_eq!(phone.local_display(), "0788 123 456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber {
    subscriber: String,
}

impl PhoneNumber {
    /// Validate and normalise user input. Spaces and dashes are ignored.
    pub fn parse(raw: &str) -> Result<Self, PhoneValidationError> {
        let compact: String = raw
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '-')
            .collect();
        if compact.is_empty() {
            return Err(PhoneValidationError::Empty);
        }
        let captures = phone_regex()
            .captures(&compact)
            .ok_or(PhoneValidationError::InvalidFormat)?;
        let subscriber = captures
            .get(1)
            .map(|m| m.as_str().to_owned())
            .ok_or(PhoneValidationError::InvalidFormat)?;
        Ok(Self { subscriber })
    }

    /// International form, e.g. `+250788123456`.
    #[must_use]
    pub fn e164(&self) -> String {
        format!("+250{}", self.subscriber)
    }

    /// Local grouping used on receipts, e.g. `0788 123 456`.
    #[must_use]
    pub fn local_display(&self) -> String {
        let local = format!("0{}", self.subscriber);
        let (head, rest) = local.split_at(4);
        let (middle, tail) = rest.split_at(3);
        format!("{head} {middle} {tail}")
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.e164())
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.e164()
    }
}

/// Validate a phone number. Thin wrapper kept for call sites that only need
/// a yes/no answer plus the normalised form.
pub fn validate_phone(raw: &str) -> Result<PhoneNumber, PhoneValidationError> {
    PhoneNumber::parse(raw)
}

/// Reasons an email address is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Blank input.
    #[error("email must not be empty")]
    Empty,
    /// Not shaped like `local@domain.tld`.
    #[error("email must look like name@example.com")]
    InvalidFormat,
}

/// A trimmed, lower-cased email address with a plausible shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_match(trimmed) {
            return Err(EmailValidationError::InvalidFormat);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validate an email address.
pub fn validate_email(raw: &str) -> Result<EmailAddress, EmailValidationError> {
    EmailAddress::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0788123456", "+250788123456")]
    #[case("+250788123456", "+250788123456")]
    #[case("250788123456", "+250788123456")]
    #[case("0788 123 456", "+250788123456")]
    #[case("0722-123-456", "+250722123456")]
    #[case("0731234567", "+250731234567")]
    #[case("0791234567", "+250791234567")]
    fn accepts_rwandan_mobile_numbers(#[case] raw: &str, #[case] expected: &str) {
        let phone = validate_phone(raw).expect("valid phone");
        assert_eq!(phone.e164(), expected);
    }

    #[rstest]
    #[case("123456")]
    #[case("0788")]
    #[case("0748123456")]
    #[case("07881234567")]
    #[case("+254788123456")]
    #[case("07881234ab")]
    #[case("0788١٢٣٤٥٦")]
    #[case("+250７８８１２３４５６")]
    fn rejects_malformed_numbers(#[case] raw: &str) {
        assert_eq!(
            validate_phone(raw),
            Err(PhoneValidationError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_blank_phone() {
        assert_eq!(validate_phone("  "), Err(PhoneValidationError::Empty));
    }

    #[test]
    fn local_display_groups_digits() {
        let phone = validate_phone("+250788123456").expect("valid phone");
        assert_eq!(phone.local_display(), "0788 123 456");
    }

    #[test]
    fn phone_deserialises_from_any_accepted_form() {
        let phone: PhoneNumber = serde_json::from_str("\"0788123456\"").expect("deserialise");
        assert_eq!(
            serde_json::to_string(&phone).expect("serialise"),
            "\"+250788123456\""
        );
    }

    #[rstest]
    #[case(" Alice@Example.RW ", "alice@example.rw")]
    #[case("manager+1@icumbi.rw", "manager+1@icumbi.rw")]
    fn accepts_and_normalises_emails(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(validate_email(raw).expect("valid").as_str(), expected);
    }

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("no-at-sign", EmailValidationError::InvalidFormat)]
    #[case("a@b", EmailValidationError::InvalidFormat)]
    #[case("a b@c.rw", EmailValidationError::InvalidFormat)]
    fn rejects_bad_emails(#[case] raw: &str, #[case] expected: EmailValidationError) {
        assert_eq!(validate_email(raw), Err(expected));
    }
}
