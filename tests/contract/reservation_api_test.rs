// Contract tests for the /api/hotel/reserva endpoints
//
// Validates the JSON document each endpoint returns: envelope keys, field
// names and JSON types the hotel front end relies on.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use serde_json::Value;

#[actix_web::test]
async fn test_advance_payment_options_schema() {
    let (_, srv) = spawn_seeded_app();

    let mut response = srv
        .get(reserva_path(3, "advance_payment/options"))
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_success_envelope(&body);

    let data = &body["data"];
    for key in [
        "defaults",
        "payment_type_options",
        "journal_options",
        "payment_method_options",
    ] {
        assert!(data.get(key).is_some(), "{} is required", key);
    }

    let defaults = &data["defaults"];
    assert!(defaults["amount"].is_number(), "amount must be a JSON number");
    assert_eq!(defaults["amount"], 320.0);
    assert_eq!(defaults["payment_type"], "inbound");
    assert!(defaults["payment_date"].is_string());
    assert_eq!(defaults["payment_date"].as_str().unwrap().len(), 10);
    assert!(defaults["journal_id"].is_i64());
    assert!(defaults["journal_name"].is_string());
    assert!(defaults["payment_method_line_id"].is_i64());
    assert!(defaults["payment_method_line_name"].is_string());
    for key in ["id", "name", "symbol"] {
        assert!(defaults["currency"].get(key).is_some(), "currency.{} is required", key);
    }
    for key in ["partner", "company"] {
        assert!(defaults[key]["id"].is_i64(), "{}.id must be integer", key);
        assert!(defaults[key]["name"].is_string(), "{}.name must be string", key);
    }
    assert_eq!(defaults["sale_order_id"], 103);
    assert_eq!(defaults["sale_order_name"], "S00103");

    let payment_types = data["payment_type_options"].as_array().unwrap();
    assert!(payment_types
        .iter()
        .all(|o| o["value"].is_string() && o["label"].is_string()));

    let journals = data["journal_options"].as_array().unwrap();
    assert!(!journals.is_empty());
    for journal in journals {
        assert!(journal["value"].is_i64());
        assert!(journal["label"].is_string());
        assert!(journal["code"].is_string());
        let kind = journal["type"].as_str().unwrap();
        assert!(kind == "bank" || kind == "cash", "unexpected journal type {}", kind);
    }

    for method in data["payment_method_options"].as_array().unwrap() {
        assert!(method["value"].is_i64());
        assert!(method["label"].is_string());
        assert!(method["code"].is_string());
        assert_eq!(method["method_type"], "inbound");
    }
}

#[actix_web::test]
async fn test_print_bill_schema() {
    let (_, srv) = spawn_seeded_app();

    let mut response = srv
        .post(reserva_path(3, "print_bill"))
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_success_envelope(&body);
    assert!(body["html"].is_string(), "html must be a string");
    assert!(body.get("data").is_none(), "receipt is not wrapped in data");
}

#[actix_web::test]
async fn test_create_invoice_schema() {
    let (_, srv) = spawn_seeded_app();

    let mut response = srv
        .post(reserva_path(3, "create_invoice"))
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_success_envelope(&body);
    assert_eq!(body["message"], "Factura creada/actualizada correctamente.");

    let invoices = body["invoices"].as_array().expect("invoices must be array");
    assert_eq!(invoices.len(), 1);
    let invoice = &invoices[0];
    assert!(invoice["id"].is_i64());
    assert!(invoice["name"].is_string());
    assert!(invoice["state"].is_string());
    assert!(invoice["amount_total"].is_number());
}

#[actix_web::test]
async fn test_mark_room_ready_schema() {
    let (_, srv) = spawn_seeded_app();

    let mut response = srv
        .post(reserva_path(5, "mark_room_ready"))
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_success_envelope(&body);
    assert_eq!(
        body["message"],
        "La reserva fue marcada como \"Habitación Lista\"."
    );
    assert_eq!(body["data"]["reserva_id"], 5);
    assert_eq!(body["data"]["status_bar"], "room_ready");
}

#[actix_web::test]
async fn test_every_endpoint_reports_unknown_booking_the_same_way() {
    let (_, srv) = spawn_seeded_app();

    let calls = [
        ("GET", "advance_payment/options"),
        ("POST", "print_bill"),
        ("POST", "create_invoice"),
        ("POST", "mark_room_ready"),
    ];
    for (method, action) in calls {
        let request = match method {
            "GET" => srv.get(reserva_path(7, action)),
            _ => srv.post(reserva_path(7, action)),
        };
        let mut response = request
            .insert_header((API_KEY_HEADER, TEST_API_KEY))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404, "{} {}", method, action);

        let body: Value = response.json().await.unwrap();
        assert_failure_envelope(&body, "La reserva solicitada no existe.");
    }
}

#[actix_web::test]
async fn test_non_numeric_booking_id_is_not_found() {
    let (_, srv) = spawn_seeded_app();

    let mut response = srv
        .post(reserva_path("abc", "print_bill"))
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_failure_envelope(&body, "La reserva solicitada no existe.");
}

#[actix_web::test]
async fn test_authentication_failures() {
    let (_, srv) = spawn_seeded_app();

    let mut response = srv.post(reserva_path(3, "print_bill")).send().await.unwrap();
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_failure_envelope(&body, "API key no proporcionada.");

    let mut response = srv
        .post(reserva_path(3, "print_bill"))
        .insert_header((API_KEY_HEADER, "wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_failure_envelope(&body, "API key inválida.");

    let response = srv
        .post(format!("{}?api_key={}", reserva_path(3, "print_bill"), TEST_API_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
