//! Booking submission, including the direct-insert fallback when the
//! `create_tenant_booking` function is not deployed, and the review flow.

#[path = "support/api.rs"]
mod api;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use icumbi::domain::{BookingStatus, UserRole};

use api::{authorised, backend, init_app, send};

#[rstest]
#[case(true, "rpc")]
#[case(false, "direct_insert")]
#[actix_rt::test]
async fn submission_reports_the_path_taken(#[case] rpc_deployed: bool, #[case] path: &str) {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let tenant = backend.sign_in(UserRole::Tenant, "Aline Uwase", Some("aline@example.rw"));
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    backend.set_booking_rpc_available(rpc_deployed);
    let app = init_app(&backend).await;

    let (status, body) = send(
        &app,
        authorised(TestRequest::post().uri("/api/v1/bookings"), &tenant)
            .set_json(json!({
                "propertyId": property.id.to_string(),
                "fullName": "Aline Uwase",
                "phone": "0788123456",
                "preferredMoveIn": "2024-07-01",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["path"], path);

    let stored = backend.bookings();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].tenant_user_id, tenant.id());
    assert_eq!(stored[0].status, BookingStatus::Pending);
    assert_eq!(stored[0].phone, "+250788123456");
}

#[actix_rt::test]
async fn past_move_in_dates_are_rejected() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let tenant = backend.sign_in(UserRole::Tenant, "Aline Uwase", None);
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    let app = init_app(&backend).await;

    let (status, body) = send(
        &app,
        authorised(TestRequest::post().uri("/api/v1/bookings"), &tenant)
            .set_json(json!({
                "propertyId": property.id.to_string(),
                "fullName": "Aline Uwase",
                "phone": "0788123456",
                "preferredMoveIn": "2024-06-01",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "preferredMoveIn");
    assert!(backend.bookings().is_empty());
}

#[actix_rt::test]
async fn landlord_reviews_and_tenant_cannot_cancel_afterwards() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let tenant = backend.sign_in(UserRole::Tenant, "Aline Uwase", None);
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    let app = init_app(&backend).await;

    let (_, created) = send(
        &app,
        authorised(TestRequest::post().uri("/api/v1/bookings"), &tenant)
            .set_json(json!({
                "propertyId": property.id.to_string(),
                "fullName": "Aline Uwase",
                "phone": "0788123456",
            }))
            .to_request(),
    )
    .await;
    let booking_id = created["bookingId"].as_str().expect("booking id").to_owned();

    let (status, listed) = send(
        &app,
        authorised(TestRequest::get().uri("/api/v1/bookings"), &landlord).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, reviewed) = send(
        &app,
        authorised(
            TestRequest::post().uri(&format!("/api/v1/bookings/{booking_id}/review")),
            &landlord,
        )
        .set_json(json!({ "decision": "approve" }))
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{reviewed}");
    assert_eq!(reviewed["status"], "approved");

    let (status, _) = send(
        &app,
        authorised(
            TestRequest::post().uri(&format!("/api/v1/bookings/{booking_id}/cancel")),
            &tenant,
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn tenants_only_cancel_their_own_bookings() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let owner = backend.sign_in(UserRole::Tenant, "Aline Uwase", None);
    let stranger = backend.sign_in(UserRole::Tenant, "Eric Mugisha", None);
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    let app = init_app(&backend).await;

    let (_, created) = send(
        &app,
        authorised(TestRequest::post().uri("/api/v1/bookings"), &owner)
            .set_json(json!({
                "propertyId": property.id.to_string(),
                "fullName": "Aline Uwase",
                "phone": "0788123456",
            }))
            .to_request(),
    )
    .await;
    let booking_id = created["bookingId"].as_str().expect("booking id").to_owned();

    let (status, _) = send(
        &app,
        authorised(
            TestRequest::post().uri(&format!("/api/v1/bookings/{booking_id}/cancel")),
            &stranger,
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, cancelled) = send(
        &app,
        authorised(
            TestRequest::post().uri(&format!("/api/v1/bookings/{booking_id}/cancel")),
            &owner,
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
}
