//! Builders wiring the outbound adapters into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use icumbi::inbound::http::state::{HttpState, HttpStatePorts};
use icumbi::outbound::invitation::HttpInvitationSender;
use icumbi::outbound::mailer::SimulatedSmtpMailer;
use icumbi::outbound::supabase::{
    SupabaseAuthGateway, SupabaseBookingRepository, SupabaseClient, SupabaseManagerRepository,
    SupabaseObjectStorage, SupabasePaymentRepository, SupabasePropertyRepository,
    SupabaseRoomRepository, SupabaseTenantRepository, SupabaseTrashRepository,
    SupabaseUserDirectory,
};

use super::RuntimeConfig;

/// Build the port bundle backed by the hosted project.
///
/// # Errors
/// Returns [`std::io::Error`] when an HTTP client cannot be constructed.
pub(crate) fn build_ports(config: &RuntimeConfig) -> std::io::Result<HttpStatePorts> {
    let client = SupabaseClient::new(
        config.supabase_url.clone(),
        config.anon_key.clone(),
        config.request_timeout,
    )
    .map_err(|e| std::io::Error::other(format!("backend client setup failed: {e}")))?;
    let invitations =
        HttpInvitationSender::new(config.invitation_endpoint.clone(), config.request_timeout)
            .map_err(|e| std::io::Error::other(format!("invitation client setup failed: {e}")))?;

    Ok(HttpStatePorts {
        auth: Arc::new(SupabaseAuthGateway::new(client.clone())),
        properties: Arc::new(SupabasePropertyRepository::new(client.clone())),
        rooms: Arc::new(SupabaseRoomRepository::new(client.clone())),
        tenants: Arc::new(SupabaseTenantRepository::new(client.clone())),
        payments: Arc::new(SupabasePaymentRepository::new(client.clone())),
        bookings: Arc::new(SupabaseBookingRepository::new(client.clone())),
        managers: Arc::new(SupabaseManagerRepository::new(client.clone())),
        trash: Arc::new(SupabaseTrashRepository::new(client.clone())),
        users: Arc::new(SupabaseUserDirectory::new(client.clone())),
        storage: Arc::new(SupabaseObjectStorage::new(client)),
        invitations: Arc::new(invitations),
        mailer: Arc::new(SimulatedSmtpMailer::new(config.mail_sender.clone())),
        clock: Arc::new(DefaultClock),
        rent_due_day: config.rent_due_day,
    })
}

/// Build shared HTTP state for every worker.
pub(crate) fn build_http_state(config: &RuntimeConfig) -> std::io::Result<web::Data<HttpState>> {
    Ok(web::Data::new(HttpState::new(build_ports(config)?)))
}
