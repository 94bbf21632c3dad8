// Contract tests for cross-origin behaviour of the reservation routes
//
// Preflight requests must be answered before authentication and before any
// handler runs; every other response, failures included, carries the same
// header set.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::Method;
use helpers::*;
use serde_json::Value;

const ACTIONS: [&str; 4] = [
    "advance_payment/options",
    "print_bill",
    "create_invoice",
    "mark_room_ready",
];

#[actix_web::test]
async fn test_preflight_on_every_route() {
    let (store, srv) = spawn_seeded_app();

    for action in ACTIONS {
        let mut response = srv
            .request(Method::OPTIONS, srv.url(&reserva_path(5, action)))
            .insert_header(("Origin", "https://frontdesk.hotel.test"))
            .insert_header(("Access-Control-Request-Method", "POST"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200, "preflight on {}", action);
        assert_cors_headers(response.headers());
        let body = response.body().await.unwrap();
        assert!(body.is_empty(), "preflight body must be empty on {}", action);
    }

    // No handler ran: the room is still waiting for housekeeping
    assert_eq!(store.booking_status(5).unwrap().as_str(), "cleaning_needed");
    assert_eq!(store.invoice_count(), 0);
}

#[actix_web::test]
async fn test_success_and_failure_carry_cors_headers() {
    let (_, srv) = spawn_seeded_app();

    let response = srv
        .post(reserva_path(3, "print_bill"))
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_cors_headers(response.headers());

    let mut response = srv
        .post(reserva_path(3, "mark_room_ready"))
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert_cors_headers(response.headers());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_rejected_credentials_carry_cors_headers() {
    let (_, srv) = spawn_seeded_app();

    let response = srv
        .get(reserva_path(3, "advance_payment/options"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    assert_cors_headers(response.headers());
}

#[actix_web::test]
async fn test_health_routes_are_outside_the_api_scope() {
    let (_, srv) = spawn_seeded_app();

    let response = srv.get("/health").send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().get("access-control-allow-origin").is_none());

    let response = srv.get("/ready").send().await.unwrap();
    assert_eq!(response.status(), 200);
}
