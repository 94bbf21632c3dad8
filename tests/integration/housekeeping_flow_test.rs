// Integration tests for the room-ready transition
//
// Only a booking in `cleaning_needed` may be marked ready; anything else is
// refused without touching the booking.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use serde_json::Value;

async fn mark_ready(srv: &TestServer, booking_id: i64) -> (u16, Value) {
    let mut response = srv
        .post(reserva_path(booking_id, "mark_room_ready"))
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[actix_web::test]
async fn test_cleaning_needed_booking_becomes_ready() {
    let (store, srv) = spawn_seeded_app();

    let (status, body) = mark_ready(&srv, 5).await;
    assert_eq!(status, 200);
    assert_success_envelope(&body);
    assert_eq!(body["data"]["reserva_id"], 5);
    assert_eq!(body["data"]["status_bar"], "room_ready");
    assert_eq!(store.booking_status(5).unwrap().as_str(), "room_ready");
}

#[actix_web::test]
async fn test_checked_in_booking_is_refused_and_unchanged() {
    let (store, srv) = spawn_seeded_app();

    let (status, body) = mark_ready(&srv, 3).await;
    assert_eq!(status, 400);
    assert_failure_envelope(
        &body,
        "La habitación solo puede marcarse como lista desde el estado \"cleaning_needed\".",
    );
    assert_eq!(store.booking_status(3).unwrap().as_str(), "checkin");
}

#[actix_web::test]
async fn test_second_attempt_is_refused() {
    let (store, srv) = spawn_seeded_app();

    let (status, _) = mark_ready(&srv, 5).await;
    assert_eq!(status, 200);

    let (status, body) = mark_ready(&srv, 5).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(store.booking_status(5).unwrap().as_str(), "room_ready");
}

#[actix_web::test]
async fn test_platform_failure_is_reported_with_prefix() {
    let (store, srv) = spawn_seeded_app();
    store.fail_room_ready("Access denied on hotel.booking");

    let (status, body) = mark_ready(&srv, 5).await;
    assert_eq!(status, 500);
    assert_failure_envelope(
        &body,
        "Error al marcar la habitación como lista: Access denied on hotel.booking",
    );
    assert_eq!(store.booking_status(5).unwrap().as_str(), "cleaning_needed");
}

#[actix_web::test]
async fn test_unknown_booking() {
    let (_, srv) = spawn_seeded_app();

    let (status, body) = mark_ready(&srv, 404).await;
    assert_eq!(status, 404);
    assert_failure_envelope(&body, "La reserva solicitada no existe.");
}
