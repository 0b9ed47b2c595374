//! Shared mapping from [`BackendError`] into port error constructors.

use super::error::{BackendError, BackendErrorKind};

/// Map the common backend failure kinds for repositories with
/// connection, denied, and query variants.
pub(super) fn map_basic_backend_error<E, C, D, Q>(
    error: BackendError,
    connection: C,
    denied: D,
    query: Q,
) -> E
where
    C: FnOnce(String) -> E,
    D: FnOnce(String) -> E,
    Q: FnOnce(String) -> E,
{
    if error.is_unavailable() {
        connection(error.to_string())
    } else if error.is_denied() {
        denied(error.message().to_owned())
    } else {
        query(error.to_string())
    }
}

/// Same as [`map_basic_backend_error`] for ports without a denied variant.
pub(super) fn map_backend_error<E, C, Q>(error: BackendError, connection: C, query: Q) -> E
where
    C: FnOnce(String) -> E,
    Q: FnOnce(String) -> E,
{
    if error.is_unavailable() {
        connection(error.to_string())
    } else {
        query(error.to_string())
    }
}

/// True for constraint failures a caller can correct.
pub(super) fn is_constraint(error: &BackendError) -> bool {
    matches!(
        error.kind(),
        BackendErrorKind::Conflict | BackendErrorKind::InvalidRequest
    )
}
