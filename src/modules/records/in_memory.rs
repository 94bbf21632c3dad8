// In-memory record store
//
// Deterministic stand-in for the business platform. Used by the test suite
// and by `RECORD_STORE=memory` so a frontend can be developed without a
// platform instance. Actions mimic the platform's observable effects only.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::models::{
    Booking, BookingStatus, Company, CurrencyInfo, InvoiceSummary, Journal, JournalType,
    PaymentDirection, PaymentMethodLine, RecordRef, SaleOrder, SelectionOption,
};
use super::store::RecordStore;
use crate::core::{AppError, HotelClock, Result};

#[derive(Debug)]
struct State {
    company: Company,
    today: Option<NaiveDate>,
    bookings: BTreeMap<i64, Booking>,
    orders: BTreeMap<i64, SaleOrder>,
    journals: Vec<Journal>,
    method_lines: HashMap<i64, PaymentMethodLine>,
    payment_types: Vec<SelectionOption>,
    invoices: BTreeMap<i64, InvoiceSummary>,
    next_invoice_id: i64,
    invoice_failure: Option<String>,
    render_failure: Option<String>,
    room_ready_failure: Option<String>,
}

#[derive(Debug)]
pub struct InMemoryRecordStore {
    clock: HotelClock,
    state: RwLock<State>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::with_clock(HotelClock::utc())
    }

    pub fn with_clock(clock: HotelClock) -> Self {
        Self {
            clock,
            state: RwLock::new(State {
                company: RecordRef::new(1, "Hotel Company"),
                today: None,
                bookings: BTreeMap::new(),
                orders: BTreeMap::new(),
                journals: Vec::new(),
                method_lines: HashMap::new(),
                payment_types: vec![
                    SelectionOption::new("outbound", "Send"),
                    SelectionOption::new("inbound", "Receive"),
                ],
                invoices: BTreeMap::new(),
                next_invoice_id: 1,
                invoice_failure: None,
                render_failure: None,
                room_ready_failure: None,
            }),
        }
    }

    /// Store preloaded with a small hotel: one bank and one cash journal and
    /// bookings in the states the endpoints care about.
    pub fn seeded(clock: HotelClock) -> Self {
        let store = Self::with_clock(clock);
        let usd = CurrencyInfo {
            id: 2,
            name: "USD".into(),
            symbol: "$".into(),
        };

        store.insert_method_line(PaymentMethodLine {
            id: 1,
            name: "Manual Payment".into(),
            code: "manual".into(),
            payment_type: PaymentDirection::Inbound,
        });
        store.insert_method_line(PaymentMethodLine {
            id: 2,
            name: "Manual Payment".into(),
            code: "manual".into(),
            payment_type: PaymentDirection::Outbound,
        });
        store.insert_method_line(PaymentMethodLine {
            id: 3,
            name: "Cash".into(),
            code: "manual".into(),
            payment_type: PaymentDirection::Inbound,
        });
        store.insert_journal(Journal {
            id: 6,
            display_name: "Bank (USD)".into(),
            code: "BNK1".into(),
            journal_type: JournalType::Bank,
            company_id: 1,
            inbound_method_line_ids: vec![1],
            outbound_method_line_ids: vec![2],
        });
        store.insert_journal(Journal {
            id: 7,
            display_name: "Cash (USD)".into(),
            code: "CSH1".into(),
            journal_type: JournalType::Cash,
            company_id: 1,
            inbound_method_line_ids: vec![3],
            outbound_method_line_ids: vec![],
        });

        for (booking_id, order_id, status, total, paid) in [
            (3, 103, BookingStatus::CHECKIN, Decimal::new(32000, 2), Decimal::ZERO),
            (5, 105, BookingStatus::CLEANING_NEEDED, Decimal::new(18000, 2), Decimal::new(18000, 2)),
            (42, 142, "confirm", Decimal::new(50000, 2), Decimal::new(50000, 2)),
        ] {
            store.insert_sale_order(SaleOrder {
                id: order_id,
                name: format!("S{:05}", order_id),
                amount_total: total,
                paid_amount: paid,
                company: Some(RecordRef::new(1, "Hotel Company")),
                currency: usd.clone(),
                partner: RecordRef::new(10 + booking_id, format!("Guest {}", booking_id)),
                invoice_ids: vec![],
            });
            store.insert_booking(Booking {
                id: booking_id,
                status_bar: BookingStatus::new(status),
                order_id: Some(order_id),
            });
        }

        store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| AppError::internal("record store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| AppError::internal("record store lock poisoned"))
    }

    fn update(&self, f: impl FnOnce(&mut State)) {
        // A poisoned lock only happens after a panic in a test; keep going
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut state);
    }

    pub fn set_company(&self, company: Company) {
        self.update(|s| s.company = company);
    }

    /// Pin `context_today` instead of reading the clock
    pub fn set_today(&self, today: NaiveDate) {
        self.update(|s| s.today = Some(today));
    }

    pub fn insert_booking(&self, booking: Booking) {
        self.update(|s| {
            s.bookings.insert(booking.id, booking);
        });
    }

    pub fn insert_sale_order(&self, order: SaleOrder) {
        self.update(|s| {
            s.orders.insert(order.id, order);
        });
    }

    pub fn insert_journal(&self, journal: Journal) {
        self.update(|s| s.journals.push(journal));
    }

    pub fn insert_method_line(&self, line: PaymentMethodLine) {
        self.update(|s| {
            s.method_lines.insert(line.id, line);
        });
    }

    pub fn set_payment_types(&self, options: Vec<SelectionOption>) {
        self.update(|s| s.payment_types = options);
    }

    /// Make invoice-creation actions raise `message` until the store is rebuilt
    pub fn fail_invoice_creation(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|s| s.invoice_failure = Some(message));
    }

    pub fn fail_report_rendering(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|s| s.render_failure = Some(message));
    }

    pub fn fail_room_ready(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|s| s.room_ready_failure = Some(message));
    }

    /// Current status of a booking, for assertions
    pub fn booking_status(&self, id: i64) -> Option<BookingStatus> {
        self.read()
            .ok()?
            .bookings
            .get(&id)
            .map(|b| b.status_bar.clone())
    }

    pub fn invoice_count(&self) -> usize {
        self.read().map(|s| s.invoices.len()).unwrap_or_default()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_record(model: &str, id: i64) -> AppError {
    AppError::upstream(format!(
        "Record does not exist or has been deleted. (Record: {}({},))",
        model, id
    ))
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_booking(&self, id: i64) -> Result<Option<Booking>> {
        Ok(self.read()?.bookings.get(&id).cloned())
    }

    async fn find_sale_order(&self, id: i64) -> Result<Option<SaleOrder>> {
        Ok(self.read()?.orders.get(&id).cloned())
    }

    async fn current_company(&self) -> Result<Company> {
        Ok(self.read()?.company.clone())
    }

    async fn search_journals(
        &self,
        company_id: i64,
        types: &[JournalType],
    ) -> Result<Vec<Journal>> {
        Ok(self
            .read()?
            .journals
            .iter()
            .filter(|j| j.company_id == company_id && types.contains(&j.journal_type))
            .cloned()
            .collect())
    }

    async fn payment_method_lines(&self, ids: &[i64]) -> Result<Vec<PaymentMethodLine>> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.method_lines.get(id).cloned())
            .collect())
    }

    async fn payment_type_selection(&self) -> Result<Vec<SelectionOption>> {
        Ok(self.read()?.payment_types.clone())
    }

    async fn context_today(&self) -> Result<NaiveDate> {
        Ok(self.read()?.today.unwrap_or_else(|| self.clock.today()))
    }

    async fn render_report(&self, report: &str, booking_id: i64) -> Result<String> {
        let state = self.read()?;
        if let Some(message) = &state.render_failure {
            return Err(AppError::upstream(message.clone()));
        }

        let booking = state
            .bookings
            .get(&booking_id)
            .ok_or_else(|| missing_record("hotel.booking", booking_id))?;
        let order = booking.order_id.and_then(|id| state.orders.get(&id));

        let mut html = format!(
            "<div class=\"receipt\" data-report=\"{}\"><h2>Reserva #{}</h2>",
            report, booking.id
        );
        if let Some(order) = order {
            html.push_str(&format!(
                "<p>{}</p><p>{}</p><p>Total: {}{}</p><p>Pagado: {}{}</p>",
                order.name,
                order.partner.name,
                order.currency.symbol,
                order.amount_total,
                order.currency.symbol,
                order.paid_amount
            ));
        }
        html.push_str("</div>");
        Ok(html)
    }

    async fn create_booking_invoice(&self, booking_id: i64) -> Result<serde_json::Value> {
        let mut state = self.write()?;
        if let Some(message) = &state.invoice_failure {
            return Err(AppError::upstream(message.clone()));
        }

        let order_id = state
            .bookings
            .get(&booking_id)
            .ok_or_else(|| missing_record("hotel.booking", booking_id))?
            .order_id
            .ok_or_else(|| AppError::upstream("There is no sale order linked to this booking."))?;

        let invoice_ids = state
            .orders
            .get(&order_id)
            .ok_or_else(|| missing_record("sale.order", order_id))?
            .invoice_ids
            .clone();
        let invoiced: Decimal = invoice_ids
            .iter()
            .filter_map(|id| state.invoices.get(id))
            .filter(|inv| inv.state != "cancel")
            .map(|inv| inv.amount_total)
            .sum();
        let total = state
            .orders
            .get(&order_id)
            .map(|o| o.amount_total)
            .unwrap_or_default();

        let remainder = total - invoiced;
        if remainder <= Decimal::ZERO {
            return Err(AppError::upstream("There is no invoiceable line."));
        }

        let invoice_id = state.next_invoice_id;
        state.next_invoice_id += 1;
        state.invoices.insert(
            invoice_id,
            InvoiceSummary {
                id: invoice_id,
                name: "/".into(),
                state: "draft".into(),
                amount_total: remainder,
            },
        );
        if let Some(order) = state.orders.get_mut(&order_id) {
            order.invoice_ids.push(invoice_id);
        }

        Ok(serde_json::json!({
            "type": "ir.actions.act_window",
            "res_model": "account.move",
            "res_id": invoice_id,
        }))
    }

    async fn invoices(&self, ids: &[i64]) -> Result<Vec<InvoiceSummary>> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.invoices.get(id).cloned())
            .collect())
    }

    async fn mark_room_ready(&self, booking_id: i64) -> Result<()> {
        let mut state = self.write()?;
        if let Some(message) = &state.room_ready_failure {
            return Err(AppError::upstream(message.clone()));
        }

        let booking = state
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| missing_record("hotel.booking", booking_id))?;
        if !booking.status_bar.is_cleaning_needed() {
            return Err(AppError::upstream(format!(
                "Booking is in state {} and cannot be marked as room ready.",
                booking.status_bar
            )));
        }
        booking.status_bar = BookingStatus::new(BookingStatus::ROOM_READY);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }
}
