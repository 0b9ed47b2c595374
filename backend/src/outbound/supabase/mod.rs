//! Adapters for the hosted Postgres backend (PostgREST, GoTrue, Storage).
//!
//! All calls go through one [`SupabaseClient`] and carry the caller's access
//! token, so the backend's row-level security policies decide what each
//! caller may read or write. Adapters only translate between row DTOs and
//! domain types; no business rules live here.

mod auth_gateway;
mod booking_repository;
mod client;
mod dto;
mod error;
mod error_mapping;
mod manager_repository;
mod object_storage;
mod payment_repository;
mod property_repository;
mod query;
mod room_repository;
mod tenant_repository;
mod trash_repository;
mod user_directory;

pub use auth_gateway::SupabaseAuthGateway;
pub use booking_repository::SupabaseBookingRepository;
pub use client::SupabaseClient;
pub use error::{BackendError, BackendErrorKind};
pub use manager_repository::SupabaseManagerRepository;
pub use object_storage::SupabaseObjectStorage;
pub use payment_repository::SupabasePaymentRepository;
pub use property_repository::SupabasePropertyRepository;
pub use query::TableQuery;
pub use room_repository::SupabaseRoomRepository;
pub use tenant_repository::SupabaseTenantRepository;
pub use trash_repository::SupabaseTrashRepository;
pub use user_directory::SupabaseUserDirectory;
