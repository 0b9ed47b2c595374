//! Reset-PIN email payloads.
//!
//! The PIN is a secret: it is zeroed on drop, redacted from `Debug`, and only
//! ever logged as a short SHA-256 fingerprint.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{EmailAddress, EmailValidationError, Language};

/// Message returned when an email was handed to the mailer.
pub const RESET_PIN_SENT_MESSAGE: &str = "Reset PIN email sent successfully";

/// Request body of the `send-reset-pin-email` function.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPinRequest {
    /// Recipient.
    #[serde(default)]
    pub email: String,
    /// New PIN to deliver.
    #[serde(default)]
    pub pin: String,
    /// Recipient's name for the greeting.
    #[serde(default)]
    pub full_name: String,
    /// `en` or `rw`; anything else means English.
    #[serde(default)]
    pub language: Option<String>,
}

impl fmt::Debug for ResetPinRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPinRequest")
            .field("email", &self.email)
            .field("pin", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("language", &self.language)
            .finish()
    }
}

/// Validation failures for reset-PIN requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResetPinValidationError {
    /// Email failed validation.
    #[error("invalid email: {0}")]
    Email(#[from] EmailValidationError),
    /// PIN is not 4 to 6 digits.
    #[error("PIN must be 4 to 6 digits")]
    Pin,
    /// Name is blank.
    #[error("full name is required")]
    FullName,
}

/// A reset PIN, 4 to 6 ASCII digits.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetPin(Zeroizing<String>);

impl ResetPin {
    /// Validate a raw PIN.
    pub fn parse(raw: &str) -> Result<Self, ResetPinValidationError> {
        let trimmed = raw.trim();
        let valid_len = (4..=6).contains(&trimmed.len());
        if !valid_len || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ResetPinValidationError::Pin);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Borrow the digits for rendering into the email body.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// First 12 hex characters of the PIN's SHA-256 digest.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(12);
        encoded
    }
}

impl fmt::Debug for ResetPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResetPin({})", self.fingerprint())
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidResetPinRequest {
    /// Recipient.
    pub email: EmailAddress,
    /// PIN to deliver.
    pub pin: ResetPin,
    /// Greeting name.
    pub full_name: String,
    /// Email language.
    pub language: Language,
}

impl ResetPinRequest {
    /// Validate the request; the language falls back to English.
    pub fn validate(&self) -> Result<ValidResetPinRequest, ResetPinValidationError> {
        let email = EmailAddress::parse(&self.email)?;
        let pin = ResetPin::parse(&self.pin)?;
        let full_name = self.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(ResetPinValidationError::FullName);
        }
        Ok(ValidResetPinRequest {
            email,
            pin,
            full_name,
            language: Language::from_code_lenient(self.language.as_deref()),
        })
    }
}

/// A rendered plain-text email.
#[derive(Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient.
    pub to: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Body; holds the PIN, so it is zeroed on drop.
    pub body: Zeroizing<String>,
    /// Fingerprint of the embedded PIN, safe to log.
    pub pin_fingerprint: String,
}

impl fmt::Debug for OutgoingEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutgoingEmail")
            .field("to", &self.to)
            .field("subject", &self.subject)
            .field("pin_fingerprint", &self.pin_fingerprint)
            .finish_non_exhaustive()
    }
}

impl ValidResetPinRequest {
    /// Render subject and body in the requested language.
    #[must_use]
    pub fn render(&self) -> OutgoingEmail {
        let name = &self.full_name;
        let pin = self.pin.expose();
        let (subject, body) = match self.language {
            Language::En => (
                "Your Icumbi PIN has been reset",
                format!(
                    "Hello {name},\n\nYour Icumbi PIN has been reset. Your new PIN is: {pin}\n\n\
                     Sign in with this PIN and change it from your profile. If you did not \
                     request this, contact your landlord or Icumbi support.\n\nIcumbi"
                ),
            ),
            Language::Rw => (
                "PIN yawe ya Icumbi yahinduwe",
                format!(
                    "Muraho {name},\n\nPIN yawe ya Icumbi yahinduwe. PIN nshya ni: {pin}\n\n\
                     Injira ukoresheje iyi PIN hanyuma uyihindure muri konti yawe. Niba \
                     atari wowe wabisabye, vugana na nyir'inzu cyangwa Icumbi.\n\nIcumbi"
                ),
            ),
        };
        OutgoingEmail {
            to: self.email.clone(),
            subject: subject.to_owned(),
            body: Zeroizing::new(body),
            pin_fingerprint: self.pin.fingerprint(),
        }
    }
}

/// Acknowledgement from a mailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailReceipt {
    /// Mailer-assigned message id.
    pub message_id: String,
}

/// Response body of the `send-reset-pin-email` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPinResponse {
    /// Whether the email was handed off.
    pub success: bool,
    /// Outcome or error message.
    pub message: String,
}
