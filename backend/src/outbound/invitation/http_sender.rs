//! Reqwest-backed invitation sender.
//!
//! This adapter owns transport details only: JSON serialisation, bearer
//! forwarding, timeout and HTTP error mapping, and decoding the endpoint's
//! `{success, message}` acknowledgement.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::ports::{InvitationError, InvitationSender};
use crate::domain::{AccessToken, InvitationReceipt, ManagerInvitation};

/// POSTs invitations to one endpoint.
#[derive(Debug, Clone)]
pub struct HttpInvitationSender {
    client: Client,
    endpoint: Url,
}

impl HttpInvitationSender {
    /// Build a sender using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[derive(Debug, Deserialize)]
struct AckDto {
    success: Option<bool>,
    message: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl InvitationSender for HttpInvitationSender {
    async fn send(
        &self,
        token: &AccessToken,
        invitation: &ManagerInvitation,
    ) -> Result<InvitationReceipt, InvitationError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(token.expose())
            .json(invitation)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            warn!(status = status.as_u16(), %error, "invitation endpoint failed");
            return Err(error);
        }
        let receipt = parse_ack(body.as_ref())?;
        debug!(property_id = %invitation.property_id, "invitation accepted by endpoint");
        Ok(receipt)
    }
}

fn parse_ack(body: &[u8]) -> Result<InvitationReceipt, InvitationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InvitationReceipt::default());
    }
    let ack: AckDto = serde_json::from_slice(body).map_err(|error| {
        InvitationError::decode(format!("invalid acknowledgement payload: {error}"))
    })?;
    match ack.success {
        Some(false) => Err(InvitationError::rejected(
            ack.message
                .or(ack.error)
                .unwrap_or_else(|| "no reason given".to_owned()),
        )),
        _ => Ok(InvitationReceipt {
            message: ack.message,
        }),
    }
}

fn map_transport_error(error: reqwest::Error) -> InvitationError {
    if error.is_timeout() {
        InvitationError::timeout(error.to_string())
    } else {
        InvitationError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> InvitationError {
    let message = serde_json::from_slice::<AckDto>(body)
        .ok()
        .and_then(|ack| ack.message.or(ack.error))
        .unwrap_or_else(|| body_preview(body));
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            InvitationError::timeout(message)
        }
        _ => InvitationError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
