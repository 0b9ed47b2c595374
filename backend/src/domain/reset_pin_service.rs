//! The `send-reset-pin-email` function.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::ResetPinMailer;
use crate::domain::service_support::map_mailer_error;
use crate::domain::{RESET_PIN_SENT_MESSAGE, ResetPinRequest, ResetPinResponse};

/// How a reset-PIN request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPinOutcome {
    /// Email handed to the mailer.
    Sent,
    /// The request failed validation.
    Invalid,
    /// The mailer failed.
    Failed,
}

/// Validates reset-PIN requests and hands the rendered email to a mailer.
#[derive(Clone)]
pub struct ResetPinService {
    mailer: Arc<dyn ResetPinMailer>,
}

impl ResetPinService {
    /// Create the service.
    pub fn new(mailer: Arc<dyn ResetPinMailer>) -> Self {
        Self { mailer }
    }

    /// Validate, render, and deliver.
    ///
    /// Failures are reported in the response body rather than as an
    /// [`Error`](crate::domain::Error) so the function's wire contract of
    /// `{success, message}` holds for every outcome.
    pub async fn send(&self, request: &ResetPinRequest) -> (ResetPinOutcome, ResetPinResponse) {
        let valid = match request.validate() {
            Ok(valid) => valid,
            Err(error) => {
                warn!(%error, "reset PIN request rejected");
                return (
                    ResetPinOutcome::Invalid,
                    ResetPinResponse {
                        success: false,
                        message: error.to_string(),
                    },
                );
            }
        };
        let email = valid.render();
        match self.mailer.deliver(&email).await {
            Ok(receipt) => {
                info!(
                    message_id = %receipt.message_id,
                    pin_fingerprint = %email.pin_fingerprint,
                    language = valid.language.code(),
                    "reset PIN email sent"
                );
                (
                    ResetPinOutcome::Sent,
                    ResetPinResponse {
                        success: true,
                        message: RESET_PIN_SENT_MESSAGE.to_owned(),
                    },
                )
            }
            Err(error) => {
                let error = map_mailer_error(error);
                warn!(%error, pin_fingerprint = %email.pin_fingerprint, "reset PIN email failed");
                (
                    ResetPinOutcome::Failed,
                    ResetPinResponse {
                        success: false,
                        message: error.message().to_owned(),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MailReceipt;
    use crate::domain::ports::{MailerError, MockResetPinMailer};
    use rstest::rstest;

    fn request(email: &str, pin: &str, name: &str, language: Option<&str>) -> ResetPinRequest {
        ResetPinRequest {
            email: email.to_owned(),
            pin: pin.to_owned(),
            full_name: name.to_owned(),
            language: language.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn renders_kinyarwanda_and_reports_success() {
        let mut mailer = MockResetPinMailer::new();
        mailer
            .expect_deliver()
            .withf(|email| {
                email.to.as_str() == "aline@example.rw"
                    && email.subject.contains("PIN yawe")
                    && email.body.contains("4821")
            })
            .times(1)
            .return_once(|_| {
                Ok(MailReceipt {
                    message_id: "msg-1".to_owned(),
                })
            });

        let (outcome, response) = ResetPinService::new(Arc::new(mailer))
            .send(&request("aline@example.rw", "4821", "Aline", Some("rw")))
            .await;
        assert_eq!(outcome, ResetPinOutcome::Sent);
        assert!(response.success);
        assert_eq!(response.message, RESET_PIN_SENT_MESSAGE);
    }

    #[rstest]
    #[case("not-an-email", "1234", "Aline")]
    #[case("aline@example.rw", "12", "Aline")]
    #[case("aline@example.rw", "12a4", "Aline")]
    #[case("aline@example.rw", "1234", "  ")]
    #[tokio::test]
    async fn invalid_requests_never_reach_the_mailer(
        #[case] email: &str,
        #[case] pin: &str,
        #[case] name: &str,
    ) {
        let mut mailer = MockResetPinMailer::new();
        mailer.expect_deliver().never();
        let (outcome, response) = ResetPinService::new(Arc::new(mailer))
            .send(&request(email, pin, name, None))
            .await;
        assert_eq!(outcome, ResetPinOutcome::Invalid);
        assert!(!response.success);
    }

    #[tokio::test]
    async fn mailer_failure_is_reported() {
        let mut mailer = MockResetPinMailer::new();
        mailer
            .expect_deliver()
            .return_once(|_| Err(MailerError::delivery("smtp down")));
        let (outcome, response) = ResetPinService::new(Arc::new(mailer))
            .send(&request("aline@example.rw", "123456", "Aline", Some("fr")))
            .await;
        assert_eq!(outcome, ResetPinOutcome::Failed);
        assert!(!response.success);
    }
}
