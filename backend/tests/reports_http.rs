//! Revenue and outstanding-balance reports.

#[path = "support/api.rs"]
mod api;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};

use icumbi::domain::{Caller, RoomId, RoomStatus, UserRole};

use api::{authorised, backend, init_app, send};

async fn register<S>(app: &S, landlord: &Caller, room: RoomId, name: &str, phone: &str) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
            Error = actix_web::Error,
        >,
{
    let (status, tenancy) = send(
        app,
        authorised(TestRequest::post().uri("/api/v1/tenants"), landlord)
            .set_json(json!({
                "fullName": name,
                "phone": phone,
                "roomId": room.to_string(),
                "moveInDate": "2024-05-01",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{tenancy}");
    tenancy["occupancy"]["id"]
        .as_str()
        .expect("occupancy id")
        .to_owned()
}

async fn pay<S>(app: &S, landlord: &Caller, occupancy: &str, amount: i64, on: &str)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
            Error = actix_web::Error,
        >,
{
    let (status, body) = send(
        app,
        authorised(TestRequest::post().uri("/api/v1/payments"), landlord)
            .set_json(json!({
                "roomTenantId": occupancy,
                "amount": amount,
                "paymentDate": on,
                "paymentMethod": "cash",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[actix_rt::test]
async fn revenue_is_grouped_by_month_and_balances_sorted_by_size() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let property = backend.seed_property(landlord.id(), "Kacyiru Heights");
    let a1 = backend.seed_room(property.id, "A1", 80_000, RoomStatus::Available);
    let a2 = backend.seed_room(property.id, "A2", 60_000, RoomStatus::Available);
    let app = init_app(&backend).await;

    let first = register(&app, &landlord, a1.id, "Aline Uwase", "0788123456").await;
    register(&app, &landlord, a2.id, "Eric Mugisha", "0722000111").await;
    pay(&app, &landlord, &first, 80_000, "2024-05-05").await;
    pay(&app, &landlord, &first, 30_000, "2024-06-03").await;

    let (status, report) = send(
        &app,
        authorised(
            TestRequest::get().uri(&format!(
                "/api/v1/reports/revenue?propertyId={}&from=2024-05-01&to=2024-06-30",
                property.id
            )),
            &landlord,
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{report}");
    let months: Vec<(&str, i64)> = report["months"]
        .as_array()
        .expect("months")
        .iter()
        .filter_map(|m| Some((m["month"].as_str()?, m["revenue"]["amount"].as_i64()?)))
        .collect();
    assert_eq!(months, [("2024-05", 80_000), ("2024-06", 30_000)]);
    assert_eq!(report["total"]["amount"], 110_000);

    let (status, owing) = send(
        &app,
        authorised(
            TestRequest::get().uri(&format!(
                "/api/v1/reports/outstanding?propertyId={}&month=2024-06",
                property.id
            )),
            &landlord,
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{owing}");
    let balances: Vec<i64> = owing
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|row| row["balance"]["amount"].as_i64())
        .collect();
    assert_eq!(balances, [60_000, 50_000]);
}

#[actix_rt::test]
async fn half_open_windows_are_rejected() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let app = init_app(&backend).await;

    let (status, body): (StatusCode, Value) = send(
        &app,
        authorised(
            TestRequest::get().uri("/api/v1/reports/revenue?from=2024-05-01"),
            &landlord,
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "to");
}

#[actix_rt::test]
async fn outstanding_requires_a_property() {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let app = init_app(&backend).await;

    let (status, body) = send(
        &app,
        authorised(TestRequest::get().uri("/api/v1/reports/outstanding"), &landlord).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "propertyId");
}

#[rstest]
#[case("from=%2B262142-11-01&to=%2B262142-12-31", "from", "invalid_date")]
#[case("from=2000-01-01&to=2024-12-31", "to", "invalid_window")]
#[actix_rt::test]
async fn out_of_range_windows_are_rejected(
    #[case] query: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let backend = backend();
    let landlord = backend.sign_in(UserRole::Landlord, "Jean Bosco", None);
    let app = init_app(&backend).await;

    let (status, body) = send(
        &app,
        authorised(
            TestRequest::get().uri(&format!("/api/v1/reports/revenue?{query}")),
            &landlord,
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}
