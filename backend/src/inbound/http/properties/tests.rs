//! Handler tests for properties and rooms over the in-memory backend.

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{MAX_IMAGE_BYTES, RoomStatus, UserRole};
use crate::inbound::http::test_utils::{api, backend, bearer};

#[actix_rt::test]
async fn missing_token_is_unauthorised() {
    let backend = backend();
    let app = api(&backend).await;
    let req = actix_test::TestRequest::get()
        .uri("/api/v1/properties")
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_rt::test]
async fn landlord_creates_and_lists_properties() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let app = api(&backend).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/properties")
        .insert_header(bearer(&landlord))
        .set_json(json!({
            "name": "Kacyiru Heights",
            "address": "KG 9 Ave",
            "priceRangeMin": 50_000,
            "priceRangeMax": 80_000,
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(res).await;
    assert_eq!(created["name"], "Kacyiru Heights");
    assert_eq!(created["propertyType"], "apartment");
    assert_eq!(created["priceRange"], "RWF 50,000 - RWF 80,000");

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/properties")
        .insert_header(bearer(&landlord))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Value = actix_test::read_body_json(res).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn inverted_price_range_names_the_field() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let app = api(&backend).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/properties")
        .insert_header(bearer(&landlord))
        .set_json(json!({
            "name": "Kacyiru Heights",
            "address": "KG 9 Ave",
            "priceRangeMin": 90_000,
            "priceRangeMax": 60_000,
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "priceRange");
}

#[actix_rt::test]
async fn tenants_cannot_list_properties() {
    let backend = backend();
    let tenant = backend.sign_in(UserRole::Tenant, "Aline", None);
    let app = api(&backend).await;
    let req = actix_test::TestRequest::get()
        .uri("/api/v1/properties")
        .insert_header(bearer(&tenant))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn other_landlords_property_is_forbidden() {
    let backend = backend();
    let owner = backend.sign_in(UserRole::Landlord, "Owner", None);
    let other = backend.sign_in(UserRole::Landlord, "Other", None);
    let property = backend.seed_property(owner.id(), "Nyarutarama Villas");
    let app = api(&backend).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/properties/{}", property.id))
        .insert_header(bearer(&other))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case("not-a-uuid")]
#[case("42")]
#[actix_rt::test]
async fn malformed_property_id_is_a_bad_request(#[case] id: &str) {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let app = api(&backend).await;
    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/properties/{id}"))
        .insert_header(bearer(&landlord))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "id");
}

#[actix_rt::test]
async fn rooms_are_listed_by_number() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    backend.seed_room(property.id, "B2", 60_000, RoomStatus::Available);
    backend.seed_room(property.id, "A1", 80_000, RoomStatus::Occupied);
    let app = api(&backend).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/properties/{}/rooms", property.id))
        .insert_header(bearer(&landlord))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let rooms: Value = actix_test::read_body_json(res).await;
    assert_eq!(rooms[0]["roomNumber"], "A1");
    assert_eq!(rooms[0]["status"], "occupied");
    assert_eq!(rooms[1]["roomNumber"], "B2");
}

#[rstest]
#[case(json!({ "status": "maintenance" }), StatusCode::OK)]
#[case(json!({ "status": "demolished" }), StatusCode::BAD_REQUEST)]
#[case(json!({}), StatusCode::BAD_REQUEST)]
#[actix_rt::test]
async fn room_status_updates(#[case] payload: Value, #[case] expected: StatusCode) {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    let room = backend.seed_room(property.id, "A1", 80_000, RoomStatus::Available);
    let app = api(&backend).await;

    let req = actix_test::TestRequest::patch()
        .uri(&format!("/api/v1/rooms/{}/status", room.id))
        .insert_header(bearer(&landlord))
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), expected);
    if expected == StatusCode::OK {
        let stored = backend.room(room.id).map(|r| r.status);
        assert_eq!(stored, Some(RoomStatus::Maintenance));
    }
}

#[actix_rt::test]
async fn image_upload_appends_public_url() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    let app = api(&backend).await;

    let req = actix_test::TestRequest::post()
        .uri(&format!(
            "/api/v1/properties/{}/images?file_name=Front%20View.JPG",
            property.id
        ))
        .insert_header(bearer(&landlord))
        .insert_header((CONTENT_TYPE, "image/jpeg"))
        .set_payload(vec![0xFF_u8; 1024])
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let urls = body["imageUrls"].as_array().cloned().unwrap_or_default();
    assert_eq!(urls.len(), 1);

    let objects = backend.stored_objects();
    assert_eq!(objects.len(), 1);
    assert!(objects[0].path.starts_with(&property.id.to_string()));
    assert_eq!(objects[0].bucket, "property-images");
    assert_eq!(objects[0].content_type, "image/jpeg");
}

#[rstest]
#[case("image/gif", 1024, "contentType")]
#[case("image/png", MAX_IMAGE_BYTES + 1, "body")]
#[actix_rt::test]
async fn image_upload_rejects_bad_files(
    #[case] content_type: &str,
    #[case] size: usize,
    #[case] field: &str,
) {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    let app = api(&backend).await;

    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/properties/{}/images", property.id))
        .insert_header(bearer(&landlord))
        .insert_header((CONTENT_TYPE, content_type.to_owned()))
        .set_payload(vec![0_u8; size])
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
    assert!(backend.stored_objects().is_empty());
}
