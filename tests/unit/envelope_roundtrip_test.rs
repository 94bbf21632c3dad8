/// Property-based tests for the response envelope
///
/// Whatever the payload, a success never carries `error` and a failure never
/// carries a payload, and the JSON written by `format` parses back to the
/// same document.

use actix_web::body::{to_bytes, MessageBody};
use actix_web::http::StatusCode;
use chrono::NaiveDate;
use hotel_api::core::response::{format, Data, Envelope};
use hotel_api::records::{
    CurrencyInfo, InvoiceSummary, JournalType, PaymentDirection, RecordRef, SelectionOption,
};
use hotel_api::reservations::models::{
    AdvancePaymentDefaults, AdvancePaymentOptions, InvoicesPayload, JournalOption,
};
use proptest::prelude::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

/// Run `body` through the formatter and parse what a client would receive
fn format_and_parse<T: Serialize>(body: &T) -> Value {
    let response = format(body, StatusCode::OK);
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .try_into_bytes()
        .ok()
        .expect("formatter writes a complete body");
    serde_json::from_slice(&bytes).unwrap()
}

fn options_with(amount: Decimal, payment_date: NaiveDate) -> AdvancePaymentOptions {
    AdvancePaymentOptions {
        defaults: AdvancePaymentDefaults {
            amount,
            payment_type: PaymentDirection::Inbound,
            payment_date,
            journal_id: Some(6),
            journal_name: Some("Bank (USD)".into()),
            payment_method_line_id: Some(1),
            payment_method_line_name: Some("Manual Payment".into()),
            currency: CurrencyInfo {
                id: 2,
                name: "USD".into(),
                symbol: "$".into(),
            },
            partner: RecordRef::new(13, "Guest 3"),
            company: RecordRef::new(1, "Hotel Company"),
            sale_order_id: 103,
            sale_order_name: "S00103".into(),
        },
        payment_type_options: vec![SelectionOption::new("inbound", "Receive")],
        journal_options: vec![JournalOption {
            value: 6,
            label: "Bank (USD)".into(),
            code: "BNK1".into(),
            journal_type: JournalType::Bank,
        }],
        payment_method_options: vec![],
    }
}

/// A decimal written as a JSON number reads back to the same 2-dp value
fn same_amount(value: &Value, expected: Decimal) -> bool {
    let written = value.as_f64();
    written == expected.to_f64()
        && written
            .and_then(Decimal::from_f64)
            .map(|d| d.round_dp(2))
            == Some(expected)
}

proptest! {
    #[test]
    fn test_success_envelope_shape(message in "[A-Za-zÁÉÍÓÚáéíóúñ ]{0,40}", id in 1i64..1_000_000i64) {
        let envelope = Envelope::ok(Data { data: json!({ "reserva_id": id }) })
            .with_message(message.clone());
        let value = serde_json::to_value(&envelope).unwrap();

        prop_assert_eq!(&value["success"], &json!(true));
        prop_assert_eq!(&value["message"], &json!(message));
        prop_assert_eq!(&value["data"]["reserva_id"], &json!(id));
        prop_assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_envelope_shape(error in "\\PC{0,60}") {
        let envelope = Envelope::<Data<Value>>::failure(error.clone());
        let value = serde_json::to_value(&envelope).unwrap();

        prop_assert_eq!(&value["success"], &json!(false));
        prop_assert_eq!(&value["error"], &json!(error));
        prop_assert!(value.get("data").is_none());
        prop_assert!(value.get("message").is_none());
    }
}

proptest! {
    #[test]
    fn test_amounts_and_dates_survive_formatting(
        cents in 0i64..10_000_000_000i64,
        invoice_cents in 0i64..10_000_000_000i64,
        year in 2000i32..2100i32,
        month in 1u32..=12u32,
        day in 1u32..=28u32,
    ) {
        let amount = Decimal::new(cents, 2);
        let payment_date = NaiveDate::from_ymd_opt(year, month, day).unwrap();

        let parsed = format_and_parse(&Envelope::ok(Data { data: options_with(amount, payment_date) }));
        let defaults = &parsed["data"]["defaults"];
        prop_assert!(defaults["amount"].is_number());
        prop_assert!(same_amount(&defaults["amount"], amount), "amount {} became {}", amount, defaults["amount"]);
        prop_assert_eq!(&defaults["payment_date"], &json!(payment_date.format("%Y-%m-%d").to_string()));

        let invoice_total = Decimal::new(invoice_cents, 2);
        let invoices = InvoicesPayload {
            invoices: vec![InvoiceSummary {
                id: 70,
                name: "INV/2026/0001".into(),
                state: "posted".into(),
                amount_total: invoice_total,
            }],
        };
        let parsed = format_and_parse(&Envelope::ok(invoices));
        let written = &parsed["invoices"][0]["amount_total"];
        prop_assert!(same_amount(written, invoice_total), "invoice total {} became {}", invoice_total, written);
    }
}

#[actix_web::test]
async fn test_format_writes_parseable_json() {
    let envelope = Envelope::ok(json!({ "html": "<p>Recibo \"#3\" ñ</p>" }));
    let response = format(&envelope, StatusCode::OK);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let bytes = to_bytes(response.into_body()).await.unwrap();
    let parsed: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, serde_json::to_value(&envelope).unwrap());
    assert_eq!(parsed["html"], "<p>Recibo \"#3\" ñ</p>");
}

#[actix_web::test]
async fn test_format_keeps_status() {
    let response = format(&Envelope::<Value>::failure("La reserva solicitada no existe."), StatusCode::NOT_FOUND);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = to_bytes(response.into_body()).await.unwrap();
    let parsed: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, json!({ "success": false, "error": "La reserva solicitada no existe." }));
}
