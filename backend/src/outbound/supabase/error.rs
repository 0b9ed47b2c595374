//! Typed failures from the hosted backend.
//!
//! PostgREST, GoTrue, and Storage all answer errors with a JSON body and an
//! HTTP status. The kind is derived from the structured `code` first and the
//! status second; message text is carried for logs only and never inspected.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// PostgREST: no function matches the RPC name and arguments.
const PGRST_FUNCTION_NOT_FOUND: &str = "PGRST202";
/// Postgres SQLSTATE `undefined_function`.
const SQLSTATE_UNDEFINED_FUNCTION: &str = "42883";
/// Postgres SQLSTATE `unique_violation`.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE `insufficient_privilege`, raised by RLS.
const SQLSTATE_INSUFFICIENT_PRIVILEGE: &str = "42501";
/// PostgREST JWT errors.
const PGRST_JWT_CODES: [&str; 2] = ["PGRST301", "PGRST302"];
/// Postgres integrity and data exceptions the caller can fix.
const SQLSTATE_INVALID_INPUT: [&str; 4] = ["23502", "23503", "23514", "22P02"];

/// Broad category of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Could not reach the backend.
    Connection,
    /// The request exceeded the client timeout.
    Timeout,
    /// The bearer token was rejected.
    Unauthorized,
    /// Row-level security or a policy refused the call.
    Forbidden,
    /// The addressed resource does not exist.
    NotFound,
    /// The RPC is not deployed.
    FunctionNotFound,
    /// A uniqueness constraint was violated.
    Conflict,
    /// The request was malformed or violated a constraint.
    InvalidRequest,
    /// The response body could not be decoded.
    Decode,
    /// The backend failed.
    Server,
}

/// A failed backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed ({kind:?}): {message}")]
pub struct BackendError {
    kind: BackendErrorKind,
    operation: String,
    status: Option<u16>,
    code: Option<String>,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<Value>,
    error_code: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    hint: Option<String>,
}

impl ErrorBody {
    fn code(&self) -> Option<String> {
        match &self.code {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => self.error_code.clone(),
        }
    }

    fn message(&self) -> Option<String> {
        let message = self
            .message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())?;
        Some(match &self.hint {
            Some(hint) if !hint.is_empty() => format!("{message} (hint: {hint})"),
            _ => message,
        })
    }
}

impl BackendError {
    /// Build an error directly.
    pub fn new(
        kind: BackendErrorKind,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            operation: operation.into(),
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// Classify an error response.
    pub fn from_response(operation: impl Into<String>, status: StatusCode, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let code = parsed.code();
        let message = parsed
            .message()
            .unwrap_or_else(|| fallback_message(status, body));
        let kind = code
            .as_deref()
            .and_then(kind_for_code)
            .unwrap_or_else(|| kind_for_status(status));
        Self {
            kind,
            operation: operation.into(),
            status: Some(status.as_u16()),
            code,
            message,
        }
    }

    /// Classify a transport failure.
    pub fn from_transport(operation: impl Into<String>, error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            BackendErrorKind::Timeout
        } else if error.is_decode() {
            BackendErrorKind::Decode
        } else {
            BackendErrorKind::Connection
        };
        Self::new(kind, operation, error.to_string())
    }

    /// A response body that did not match the expected shape.
    pub fn decode(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Decode, operation, message)
    }

    /// Failure category.
    #[must_use]
    pub fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    /// Table, RPC, or endpoint that failed.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Structured backend error code, when present.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Human-readable detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when retrying later could succeed.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind,
            BackendErrorKind::Connection | BackendErrorKind::Timeout | BackendErrorKind::Server
        )
    }

    /// True when the caller lacks permission.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(
            self.kind,
            BackendErrorKind::Unauthorized | BackendErrorKind::Forbidden
        )
    }
}

fn kind_for_code(code: &str) -> Option<BackendErrorKind> {
    match code {
        PGRST_FUNCTION_NOT_FOUND | SQLSTATE_UNDEFINED_FUNCTION => {
            Some(BackendErrorKind::FunctionNotFound)
        }
        SQLSTATE_UNIQUE_VIOLATION => Some(BackendErrorKind::Conflict),
        SQLSTATE_INSUFFICIENT_PRIVILEGE => Some(BackendErrorKind::Forbidden),
        code if PGRST_JWT_CODES.contains(&code) => Some(BackendErrorKind::Unauthorized),
        code if SQLSTATE_INVALID_INPUT.contains(&code) => Some(BackendErrorKind::InvalidRequest),
        _ => None,
    }
}

fn kind_for_status(status: StatusCode) -> BackendErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => BackendErrorKind::Unauthorized,
        StatusCode::FORBIDDEN => BackendErrorKind::Forbidden,
        StatusCode::NOT_FOUND => BackendErrorKind::NotFound,
        StatusCode::CONFLICT => BackendErrorKind::Conflict,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => BackendErrorKind::Timeout,
        status if status.is_client_error() => BackendErrorKind::InvalidRequest,
        _ => BackendErrorKind::Server,
    }
}

fn fallback_message(status: StatusCode, body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("status {}: {preview}", status.as_u16())
    }
}
