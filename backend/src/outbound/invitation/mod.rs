//! Manager invitation delivery.

mod http_sender;

pub use http_sender::HttpInvitationSender;
