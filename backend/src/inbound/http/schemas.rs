//! OpenAPI schemas for domain types that stay free of `ToSchema`.
//!
//! The wrappers mirror their domain counterparts field for field and are
//! registered under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ResetPinRequest`].
#[derive(ToSchema)]
#[schema(as = ResetPinRequest, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ResetPinRequestSchema {
    #[schema(example = "aline@example.rw")]
    email: String,
    /// Four to six digits.
    #[schema(example = "4821")]
    pin: String,
    #[schema(example = "Aline Uwase")]
    full_name: String,
    /// `en` or `rw`; anything else means English.
    #[schema(example = "rw")]
    language: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ResetPinResponse`].
#[derive(ToSchema)]
#[schema(as = ResetPinResponse)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ResetPinResponseSchema {
    success: bool,
    #[schema(example = "Reset PIN email sent successfully")]
    message: String,
}
