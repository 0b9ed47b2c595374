//! `send-reset-pin-email` function endpoint.
//!
//! Mobile clients call this without a session, so it sits outside `/api/v1`
//! and answers browser preflights with permissive CORS headers. Every
//! response, including failures, is a `{success, message}` body.

use actix_web::http::header;
use actix_web::{HttpResponse, HttpResponseBuilder, options, post, web};
use tracing::debug;

use crate::domain::{ResetPinOutcome, ResetPinRequest, ResetPinResponse};
use crate::inbound::http::schemas::{ResetPinRequestSchema, ResetPinResponseSchema};
use crate::inbound::http::state::HttpState;

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, OPTIONS";

fn with_cors(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS));
    builder
}

fn respond(outcome: ResetPinOutcome, body: ResetPinResponse) -> HttpResponse {
    let builder = match outcome {
        ResetPinOutcome::Sent => HttpResponse::Ok(),
        ResetPinOutcome::Invalid => HttpResponse::BadRequest(),
        ResetPinOutcome::Failed => HttpResponse::InternalServerError(),
    };
    with_cors(builder).json(body)
}

/// Validate the request and hand the rendered email to the mailer.
#[utoipa::path(
    post,
    path = "/functions/v1/send-reset-pin-email",
    request_body = ResetPinRequestSchema,
    responses(
        (status = 200, description = "Email sent", body = ResetPinResponseSchema),
        (status = 400, description = "Validation failed", body = ResetPinResponseSchema),
        (status = 500, description = "Mailer failed", body = ResetPinResponseSchema)
    ),
    tags = ["functions"],
    security([]),
    operation_id = "sendResetPinEmail"
)]
#[post("/functions/v1/send-reset-pin-email")]
pub async fn send_reset_pin_email(state: web::Data<HttpState>, body: web::Bytes) -> HttpResponse {
    let request: ResetPinRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            debug!(%error, "reset-PIN body is not valid JSON");
            return respond(
                ResetPinOutcome::Invalid,
                ResetPinResponse {
                    success: false,
                    message: "Request body must be a JSON object".to_owned(),
                },
            );
        }
    };
    let (outcome, response) = state.reset_pin.send(&request).await;
    respond(outcome, response)
}

/// CORS preflight.
#[utoipa::path(
    options,
    path = "/functions/v1/send-reset-pin-email",
    responses((status = 200, description = "Preflight accepted")),
    tags = ["functions"],
    security([])
)]
#[options("/functions/v1/send-reset-pin-email")]
pub async fn reset_pin_preflight() -> HttpResponse {
    with_cors(HttpResponse::Ok()).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::App;
    use actix_web::body::to_bytes;
    use actix_web::http::Method;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(ResetPinOutcome::Sent, 200)]
    #[case(ResetPinOutcome::Invalid, 400)]
    #[case(ResetPinOutcome::Failed, 500)]
    #[actix_rt::test]
    async fn outcome_selects_status(#[case] outcome: ResetPinOutcome, #[case] status: u16) {
        let response = respond(
            outcome,
            ResetPinResponse {
                success: matches!(outcome, ResetPinOutcome::Sent),
                message: "m".to_owned(),
            },
        );
        assert_eq!(response.status().as_u16(), status);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let json: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(json["message"], "m");
    }

    #[actix_rt::test]
    async fn preflight_allows_post() {
        let app = actix_web::test::init_service(App::new().service(reset_pin_preflight)).await;
        let request = actix_web::test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/functions/v1/send-reset-pin-email")
            .to_request();
        let response = actix_web::test::call_service(&app, request).await;
        assert_eq!(response.status().as_u16(), 200);
        let methods = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .and_then(|v| v.to_str().ok());
        assert_eq!(methods, Some(ALLOW_METHODS));
    }
}
