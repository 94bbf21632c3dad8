// Record store backed by the Odoo web JSON-RPC API
//
// Reads go through `/web/dataset/call_kw` (`search_read`, `read`,
// `fields_get`); actions call the booking's public methods the same way.
// The receipt is fetched from the QWeb HTML report route with the session
// cookie. Nothing here retries: invoice creation and status transitions are
// not idempotent.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, Client, Response};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::models::{
    Booking, BookingStatus, Company, CurrencyInfo, InvoiceSummary, Journal, JournalType,
    PaymentDirection, PaymentMethodLine, RecordRef, SaleOrder, SelectionOption,
};
use super::store::RecordStore;
use crate::config::OdooConfig;
use crate::core::{AppError, HotelClock, Result};

const SESSION_EXPIRED: &str = "odoo.http.SessionExpiredException";

#[derive(Debug, Clone)]
struct Session {
    cookie: String,
    uid: i64,
}

#[derive(Serialize)]
struct RpcRequest<P> {
    jsonrpc: &'static str,
    method: &'static str,
    params: P,
}

impl<P> RpcRequest<P> {
    fn call(params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "call",
            params,
        }
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
    #[serde(default)]
    data: Option<RpcErrorData>,
}

#[derive(Debug, Default, Deserialize)]
struct RpcErrorData {
    #[serde(default)]
    name: String,
    #[serde(default)]
    message: String,
}

impl RpcError {
    fn is_session_expired(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.name == SESSION_EXPIRED)
    }

    /// The platform's user-facing message, falling back to the envelope text
    fn into_message(self) -> String {
        match self.data {
            Some(data) if !data.message.is_empty() => data.message,
            _ => self.message,
        }
    }
}

/// Odoo JSON-RPC client implementing [`RecordStore`]
pub struct OdooRecordStore {
    client: Client,
    config: OdooConfig,
    clock: HotelClock,
    session: Mutex<Option<Session>>,
}

impl OdooRecordStore {
    pub fn new(config: OdooConfig, clock: HotelClock) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            clock,
            session: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn session(&self) -> Result<Session> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        let session = self.authenticate().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    async fn authenticate(&self) -> Result<Session> {
        let request = RpcRequest::call(json!({
            "db": self.config.database,
            "login": self.config.login,
            "password": self.config.password,
        }));

        let response = self
            .client
            .post(self.url("/web/session/authenticate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Odoo request failed: {}", e)))?;

        // Read before decoding consumes the response; a rejected login has
        // no cookie but its RPC error is the message worth reporting
        let cookie = session_cookie(&response);
        let result = decode(response).await.map_err(|e| e.into_app_error())?;

        let uid = result
            .get("uid")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                AppError::upstream(format!("Odoo authentication failed for {}", self.config.login))
            })?;
        let cookie = cookie.ok_or_else(|| {
            AppError::upstream("Odoo authentication did not return a session cookie")
        })?;

        tracing::info!(uid, database = %self.config.database, "Authenticated against Odoo");
        Ok(Session { cookie, uid })
    }

    async fn forget_session(&self) {
        *self.session.lock().await = None;
    }

    async fn call_kw(&self, model: &str, method: &str, args: Value, kwargs: Value) -> Result<Value> {
        let session = self.session().await?;
        let request = RpcRequest::call(json!({
            "model": model,
            "method": method,
            "args": args,
            "kwargs": kwargs,
        }));

        tracing::debug!(model, method, "Odoo call_kw");
        let response = self
            .client
            .post(self.url(&format!("/web/dataset/call_kw/{}/{}", model, method)))
            .header(header::COOKIE, &session.cookie)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Odoo request failed: {}", e)))?;

        match decode(response).await {
            Ok(result) => Ok(result),
            Err(DecodeError::Rpc(err)) if err.is_session_expired() => {
                tracing::warn!(model, method, "Odoo session expired");
                self.forget_session().await;
                Err(AppError::upstream(err.into_message()))
            }
            Err(err) => Err(err.into_app_error()),
        }
    }

    async fn search_read(&self, model: &str, domain: Value, fields: &[&str]) -> Result<Vec<Value>> {
        let result = self
            .call_kw(
                model,
                "search_read",
                json!([]),
                json!({ "domain": domain, "fields": fields }),
            )
            .await?;
        records(result)
    }

    async fn read(&self, model: &str, ids: &[i64], fields: &[&str]) -> Result<Vec<Value>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = self
            .call_kw(model, "read", json!([ids]), json!({ "fields": fields }))
            .await?;
        records(result)
    }

    async fn currency(&self, id: i64) -> Result<CurrencyInfo> {
        let record = self
            .read("res.currency", &[id], &["name", "symbol"])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::upstream(format!("Currency {} not found", id)))?;

        Ok(CurrencyInfo {
            id,
            name: text(&record, "name"),
            symbol: text(&record, "symbol"),
        })
    }
}

#[async_trait]
impl RecordStore for OdooRecordStore {
    async fn find_booking(&self, id: i64) -> Result<Option<Booking>> {
        let found = self
            .search_read(
                "hotel.booking",
                json!([["id", "=", id]]),
                &["status_bar", "order_id"],
            )
            .await?;

        Ok(found.first().map(|record| Booking {
            id,
            status_bar: BookingStatus::new(text(record, "status_bar")),
            order_id: many2one(record, "order_id").map(|r| r.id),
        }))
    }

    async fn find_sale_order(&self, id: i64) -> Result<Option<SaleOrder>> {
        let found = self
            .search_read(
                "sale.order",
                json!([["id", "=", id]]),
                &[
                    "name",
                    "amount_total",
                    "paid_amount",
                    "company_id",
                    "currency_id",
                    "partner_id",
                    "invoice_ids",
                ],
            )
            .await?;
        let Some(record) = found.into_iter().next() else {
            return Ok(None);
        };

        let currency = match many2one(&record, "currency_id") {
            Some(r) => self.currency(r.id).await?,
            None => CurrencyInfo {
                id: 0,
                name: String::new(),
                symbol: String::new(),
            },
        };

        Ok(Some(SaleOrder {
            id,
            name: text(&record, "name"),
            amount_total: decimal(&record, "amount_total"),
            paid_amount: decimal(&record, "paid_amount"),
            company: many2one(&record, "company_id"),
            currency,
            partner: many2one(&record, "partner_id").unwrap_or_else(|| RecordRef::new(0, "")),
            invoice_ids: id_list(&record, "invoice_ids"),
        }))
    }

    async fn current_company(&self) -> Result<Company> {
        let uid = self.session().await?.uid;
        self.read("res.users", &[uid], &["company_id"])
            .await?
            .first()
            .and_then(|user| many2one(user, "company_id"))
            .ok_or_else(|| AppError::upstream("API user has no company"))
    }

    async fn search_journals(
        &self,
        company_id: i64,
        types: &[JournalType],
    ) -> Result<Vec<Journal>> {
        let types: Vec<&str> = types.iter().map(JournalType::as_str).collect();
        let found = self
            .search_read(
                "account.journal",
                json!([["type", "in", types], ["company_id", "=", company_id]]),
                &[
                    "display_name",
                    "code",
                    "type",
                    "company_id",
                    "inbound_payment_method_line_ids",
                    "outbound_payment_method_line_ids",
                ],
            )
            .await?;

        found
            .iter()
            .map(|record| {
                let journal_type: JournalType =
                    serde_json::from_value(record.get("type").cloned().unwrap_or(Value::Null))
                        .map_err(|e| AppError::upstream(format!("Unexpected journal type: {}", e)))?;
                Ok(Journal {
                    id: integer(record, "id"),
                    display_name: text(record, "display_name"),
                    code: text(record, "code"),
                    journal_type,
                    company_id: many2one(record, "company_id").map_or(company_id, |r| r.id),
                    inbound_method_line_ids: id_list(record, "inbound_payment_method_line_ids"),
                    outbound_method_line_ids: id_list(record, "outbound_payment_method_line_ids"),
                })
            })
            .collect()
    }

    async fn payment_method_lines(&self, ids: &[i64]) -> Result<Vec<PaymentMethodLine>> {
        let found = self
            .read(
                "account.payment.method.line",
                ids,
                &["name", "code", "payment_type"],
            )
            .await?;

        Ok(found
            .iter()
            .map(|record| PaymentMethodLine {
                id: integer(record, "id"),
                name: text(record, "name"),
                code: text(record, "code"),
                payment_type: if text(record, "payment_type") == "outbound" {
                    PaymentDirection::Outbound
                } else {
                    PaymentDirection::Inbound
                },
            })
            .collect())
    }

    async fn payment_type_selection(&self) -> Result<Vec<SelectionOption>> {
        let fields = self
            .call_kw(
                "account.payment",
                "fields_get",
                json!([["payment_type"]]),
                json!({ "attributes": ["selection"] }),
            )
            .await?;

        let selection = fields
            .pointer("/payment_type/selection")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(selection
            .iter()
            .filter_map(|pair| {
                let value = pair.get(0)?.as_str()?;
                let label = pair.get(1)?.as_str()?;
                Some(SelectionOption::new(value, label))
            })
            .collect())
    }

    async fn context_today(&self) -> Result<NaiveDate> {
        Ok(self.clock.today())
    }

    async fn render_report(&self, report: &str, booking_id: i64) -> Result<String> {
        let session = self.session().await?;
        let response = self
            .client
            .get(self.url(&format!("/report/html/{}/{}", report, booking_id)))
            .header(header::COOKIE, &session.cookie)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Odoo request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "Odoo report {} returned HTTP {}",
                report, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::upstream(format!("Failed to read Odoo report: {}", e)))
    }

    async fn create_booking_invoice(&self, booking_id: i64) -> Result<Value> {
        self.call_kw("hotel.booking", "create_invoice", json!([[booking_id]]), json!({}))
            .await
    }

    async fn invoices(&self, ids: &[i64]) -> Result<Vec<InvoiceSummary>> {
        let found = self
            .read("account.move", ids, &["name", "state", "amount_total"])
            .await?;

        Ok(found
            .iter()
            .map(|record| InvoiceSummary {
                id: integer(record, "id"),
                name: text(record, "name"),
                state: text(record, "state"),
                amount_total: decimal(record, "amount_total"),
            })
            .collect())
    }

    async fn mark_room_ready(&self, booking_id: i64) -> Result<()> {
        self.call_kw(
            "hotel.booking",
            "action_mark_room_ready",
            json!([[booking_id]]),
            json!({}),
        )
        .await
        .map(|_| ())
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .client
            .post(self.url("/web/webclient/version_info"))
            .json(&RpcRequest::call(json!({})))
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Odoo request failed: {}", e)))?;

        decode(response).await.map(|_| ()).map_err(|e| e.into_app_error())
    }
}

enum DecodeError {
    Http(String),
    Rpc(RpcError),
}

impl DecodeError {
    fn into_app_error(self) -> AppError {
        match self {
            DecodeError::Http(message) => AppError::upstream(message),
            DecodeError::Rpc(err) => AppError::upstream(err.into_message()),
        }
    }
}

async fn decode(response: Response) -> std::result::Result<Value, DecodeError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DecodeError::Http(format!("Odoo HTTP {}: {}", status, body)));
    }

    let body: RpcResponse = response
        .json()
        .await
        .map_err(|e| DecodeError::Http(format!("Failed to parse Odoo response: {}", e)))?;

    match (body.result, body.error) {
        (_, Some(error)) => Err(DecodeError::Rpc(error)),
        (Some(result), None) => Ok(result),
        (None, None) => Ok(Value::Null),
    }
}

fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("session_id="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

fn records(result: Value) -> Result<Vec<Value>> {
    match result {
        Value::Array(items) => Ok(items),
        other => Err(AppError::upstream(format!(
            "Expected a list of records from Odoo, got {}",
            other
        ))),
    }
}

/// Char fields come back as `false` when empty
fn text(record: &Value, field: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn integer(record: &Value, field: &str) -> i64 {
    record.get(field).and_then(Value::as_i64).unwrap_or_default()
}

fn decimal(record: &Value, field: &str) -> Decimal {
    record
        .get(field)
        .and_then(Value::as_f64)
        .and_then(Decimal::from_f64)
        .unwrap_or_default()
}

/// Many2one fields are `[id, display_name]` or `false`
fn many2one(record: &Value, field: &str) -> Option<RecordRef> {
    let pair = record.get(field)?.as_array()?;
    let id = pair.first()?.as_i64()?;
    let name = pair.get(1).and_then(Value::as_str).unwrap_or_default();
    Some(RecordRef::new(id, name))
}

fn id_list(record: &Value, field: &str) -> Vec<i64> {
    record
        .get(field)
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}
