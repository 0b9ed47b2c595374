//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **supabase**: PostgREST tables and RPCs, GoTrue auth, and Storage.
//! - **invitation**: the manager invitation endpoint.
//! - **mailer**: reset-PIN email delivery.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod invitation;
pub mod mailer;
pub mod supabase;
