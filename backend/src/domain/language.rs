//! Languages used for outgoing messages.

use serde::{Deserialize, Serialize};

/// Message language. English is the fallback for anything unrecognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Kinyarwanda.
    Rw,
}

impl Language {
    /// ISO 639-1 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Rw => "rw",
        }
    }

    /// Parse a client-supplied code, falling back to English.
    ///
    /// # Examples
    /// ```
    /// use icumbi::domain::Language;
    ///
    /// assert_eq!(Language::from_code_lenient(Some("RW")), Language::Rw);
    /// assert_eq!(Language::from_code_lenient(Some("fr")), Language::En);
    /// assert_eq!(Language::from_code_lenient(None), Language::En);
    /// ```
    #[must_use]
    pub fn from_code_lenient(raw: Option<&str>) -> Self {
        match raw.map(|code| code.trim().to_ascii_lowercase()).as_deref() {
            Some("rw" | "kin" | "rw-rw") => Self::Rw,
            _ => Self::En,
        }
    }
}
