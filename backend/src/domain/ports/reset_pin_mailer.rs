//! Port for delivering reset-PIN emails.

use async_trait::async_trait;

use crate::domain::{MailReceipt, OutgoingEmail};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mailer adapters.
    pub enum MailerError {
        /// The message could not be handed to the mail server.
        Delivery { message: String } => "email delivery failed: {message}",
    }
}

/// Sends rendered emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResetPinMailer: Send + Sync {
    /// Deliver `email`.
    async fn deliver(&self, email: &OutgoingEmail) -> Result<MailReceipt, MailerError>;
}
