//! Icumbi backend: property management for Rwandan landlords.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, services,
//! and the port traits; [`inbound`] adapts HTTP requests onto the services;
//! [`outbound`] implements the ports against the hosted Supabase project, the
//! invitation function, and the reset-PIN mailer.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
