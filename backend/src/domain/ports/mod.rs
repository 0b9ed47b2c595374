//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Every capability the services need from the managed backend, the
//! invitation endpoint, or the mail server is expressed here as an async
//! trait. Adapters in `crate::outbound` implement them; unit tests use the
//! generated `Mock*` types.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod booking_repository;
mod invitation_sender;
mod manager_repository;
mod object_storage;
mod payment_repository;
mod property_repository;
mod reset_pin_mailer;
mod room_repository;
mod tenant_repository;
mod trash_repository;
mod user_directory;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, AuthGatewayError};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError};
#[cfg(test)]
pub use invitation_sender::MockInvitationSender;
pub use invitation_sender::{InvitationError, InvitationSender};
#[cfg(test)]
pub use manager_repository::MockManagerRepository;
pub use manager_repository::{ManagerRepository, ManagerRepositoryError};
#[cfg(test)]
pub use object_storage::MockObjectStorage;
pub use object_storage::{ObjectStorage, ObjectStorageError};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use property_repository::MockPropertyRepository;
pub use property_repository::{PropertyRepository, PropertyRepositoryError, PropertyScope};
#[cfg(test)]
pub use reset_pin_mailer::MockResetPinMailer;
pub use reset_pin_mailer::{MailerError, ResetPinMailer};
#[cfg(test)]
pub use room_repository::MockRoomRepository;
pub use room_repository::{RoomRepository, RoomRepositoryError};
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
pub use tenant_repository::{TenantRepository, TenantRepositoryError};
#[cfg(test)]
pub use trash_repository::MockTrashRepository;
pub use trash_repository::{TrashRepository, TrashRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};

#[cfg(test)]
mod tests;
