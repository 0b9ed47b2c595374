//! Runtime settings loaded via OrthoConfig.
//!
//! Raw values come from CLI flags, `ICUMBI_*` environment variables, and
//! configuration files. [`AppSettings::validate`] turns them into a typed
//! [`RuntimeConfig`] so the rest of startup never sees unparsed strings.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use icumbi::domain::DEFAULT_RENT_DUE_DAY;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAIL_SENDER: &str = "Icumbi <no-reply@icumbi.rw>";
const INVITATION_FUNCTION_PATH: &str = "functions/v1/send-manager-invitation";
const LATEST_DUE_DAY: u32 = 28;

/// Raw configuration values.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ICUMBI")]
pub struct AppSettings {
    /// Project URL of the hosted backend.
    pub supabase_url: Option<String>,
    /// Public anon key sent as `apikey` on every request.
    pub supabase_anon_key: Option<String>,
    /// Manager invitation function; defaults to the project's function URL.
    pub invitation_endpoint: Option<String>,
    pub bind_addr: Option<String>,
    pub request_timeout_secs: Option<u64>,
    /// Day of the month rent falls due.
    pub rent_due_day: Option<u32>,
    /// From address for reset-PIN emails.
    pub mail_sender: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_anon_key",
                &self.supabase_anon_key.as_ref().map(|_| "<redacted>"),
            )
            .field("invitation_endpoint", &self.invitation_endpoint)
            .field("bind_addr", &self.bind_addr)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("rent_due_day", &self.rent_due_day)
            .field("mail_sender", &self.mail_sender)
            .finish()
    }
}

/// Validated settings used to wire the server.
pub struct RuntimeConfig {
    pub supabase_url: Url,
    pub anon_key: Zeroizing<String>,
    pub invitation_endpoint: Url,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub rent_due_day: u32,
    pub mail_sender: String,
}

/// Reasons the raw settings cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {name}")]
    Missing { name: &'static str },
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("bind address {value:?} is invalid: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    #[error("rent due day must be between 1 and {LATEST_DUE_DAY}, got {0}")]
    DueDayOutOfRange(u32),
}

fn required(value: Option<&str>, name: &'static str) -> Result<String, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or(ConfigError::Missing { name })
}

fn parse_url(raw: &str, name: &'static str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { name, source })
}

impl AppSettings {
    /// Check every value and apply defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing keys, malformed URLs or addresses,
    /// a zero timeout, or a due day outside 1..=28.
    pub fn validate(&self) -> Result<RuntimeConfig, ConfigError> {
        let supabase_url = parse_url(
            &required(self.supabase_url.as_deref(), "ICUMBI_SUPABASE_URL")?,
            "ICUMBI_SUPABASE_URL",
        )?;
        let anon_key = Zeroizing::new(required(
            self.supabase_anon_key.as_deref(),
            "ICUMBI_SUPABASE_ANON_KEY",
        )?);

        let invitation_endpoint = match self.invitation_endpoint.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_url(raw, "ICUMBI_INVITATION_ENDPOINT")?,
            _ => default_invitation_endpoint(&supabase_url)?,
        };

        let bind_raw = self
            .bind_addr
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_raw.to_owned(),
                source,
            })?;

        let timeout_secs = self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let rent_due_day = self.rent_due_day.unwrap_or(DEFAULT_RENT_DUE_DAY);
        if !(1..=LATEST_DUE_DAY).contains(&rent_due_day) {
            return Err(ConfigError::DueDayOutOfRange(rent_due_day));
        }

        Ok(RuntimeConfig {
            supabase_url,
            anon_key,
            invitation_endpoint,
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
            rent_due_day,
            mail_sender: self
                .mail_sender
                .clone()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MAIL_SENDER.to_owned()),
        })
    }
}

fn default_invitation_endpoint(base: &Url) -> Result<Url, ConfigError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(INVITATION_FUNCTION_PATH)
        .map_err(|source| ConfigError::InvalidUrl {
            name: "ICUMBI_INVITATION_ENDPOINT",
            source,
        })
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::{fixture, rstest};

    const VARS: [&str; 7] = [
        "ICUMBI_SUPABASE_URL",
        "ICUMBI_SUPABASE_ANON_KEY",
        "ICUMBI_INVITATION_ENDPOINT",
        "ICUMBI_BIND_ADDR",
        "ICUMBI_REQUEST_TIMEOUT_SECS",
        "ICUMBI_RENT_DUE_DAY",
        "ICUMBI_MAIL_SENDER",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("icumbi")]).expect("config should load")
    }

    #[fixture]
    fn minimal() -> AppSettings {
        AppSettings {
            supabase_url: Some("https://abc.supabase.co".to_owned()),
            supabase_anon_key: Some("anon".to_owned()),
            invitation_endpoint: None,
            bind_addr: None,
            request_timeout_secs: None,
            rent_due_day: None,
            mail_sender: None,
        }
    }

    #[rstest]
    fn defaults_fill_optional_values(minimal: AppSettings) {
        let config = minimal.validate().expect("valid");
        assert_eq!(
            config.invitation_endpoint.as_str(),
            "https://abc.supabase.co/functions/v1/send-manager-invitation"
        );
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.rent_due_day, 5);
        assert_eq!(config.anon_key.as_str(), "anon");
    }

    #[rstest]
    fn missing_anon_key_is_reported(mut minimal: AppSettings) {
        minimal.supabase_anon_key = Some("   ".to_owned());
        let err = minimal.validate().err().expect("invalid");
        assert!(matches!(
            err,
            ConfigError::Missing {
                name: "ICUMBI_SUPABASE_ANON_KEY"
            }
        ));
    }

    #[rstest]
    #[case(Some(0), None, "timeout")]
    #[case(None, Some(0), "due day")]
    #[case(None, Some(29), "due day")]
    fn out_of_range_numbers_are_rejected(
        mut minimal: AppSettings,
        #[case] timeout: Option<u64>,
        #[case] due_day: Option<u32>,
        #[case] expected: &str,
    ) {
        minimal.request_timeout_secs = timeout;
        minimal.rent_due_day = due_day;
        let err = minimal.validate().err().expect("invalid");
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[rstest]
    fn bad_bind_address_is_rejected(mut minimal: AppSettings) {
        minimal.bind_addr = Some("localhost".to_owned());
        assert!(matches!(
            minimal.validate(),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
    }

    #[rstest]
    fn debug_output_redacts_the_anon_key(minimal: AppSettings) {
        let rendered = format!("{minimal:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"anon\""));
    }

    #[rstest]
    fn environment_values_are_loaded() {
        let _guard = lock_env([
            (VARS[0], Some("https://xyz.supabase.co".to_owned())),
            (VARS[1], Some("anon-key".to_owned())),
            (VARS[2], None::<String>),
            (VARS[3], Some("127.0.0.1:9000".to_owned())),
            (VARS[4], Some("30".to_owned())),
            (VARS[5], Some("10".to_owned())),
            (VARS[6], None::<String>),
        ]);

        let config = load_from_empty_args().validate().expect("valid");
        assert_eq!(config.supabase_url.as_str(), "https://xyz.supabase.co/");
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.rent_due_day, 10);
    }

    #[rstest]
    fn missing_environment_fails_validation() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        assert!(matches!(
            load_from_empty_args().validate(),
            Err(ConfigError::Missing {
                name: "ICUMBI_SUPABASE_URL"
            })
        ));
    }
}
