use std::sync::Arc;

use super::{load_booking, messages};
use crate::core::{AppError, Result};
use crate::modules::records::{JournalType, PaymentDirection, RecordStore};
use crate::modules::reservations::models::{
    AdvancePaymentDefaults, AdvancePaymentOptions, JournalOption, PaymentMethodOption,
};

/// Builds the defaults and choice lists of the advance-payment modal
pub struct AdvancePaymentService {
    store: Arc<dyn RecordStore>,
}

impl AdvancePaymentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Options for registering a customer payment against a booking's order
    ///
    /// The default journal is the first bank/cash journal of the order's
    /// company and the default method is that journal's first inbound line.
    pub async fn options(&self, booking_id: i64) -> Result<AdvancePaymentOptions> {
        let booking = load_booking(self.store.as_ref(), booking_id).await?;

        let order_id = booking
            .order_id
            .ok_or_else(|| AppError::precondition(messages::NO_SALE_ORDER))?;
        let order = self
            .store
            .find_sale_order(order_id)
            .await?
            .ok_or_else(|| AppError::precondition(messages::NO_SALE_ORDER))?;

        let company = match &order.company {
            Some(company) => company.clone(),
            None => self.store.current_company().await?,
        };

        let payment_type = PaymentDirection::Inbound;
        let journals = self
            .store
            .search_journals(company.id, &JournalType::PAYMENT)
            .await?;
        let default_journal = journals.first();

        let method_lines = match default_journal {
            Some(journal) => {
                self.store
                    .payment_method_lines(journal.method_line_ids(payment_type))
                    .await?
            }
            None => Vec::new(),
        };
        let default_line = method_lines.first();

        let payment_type_options = self.store.payment_type_selection().await?;
        let payment_date = self.store.context_today().await?;

        tracing::debug!(
            booking_id,
            order_id,
            journals = journals.len(),
            method_lines = method_lines.len(),
            "Built advance payment options"
        );

        Ok(AdvancePaymentOptions {
            defaults: AdvancePaymentDefaults {
                amount: order.amount_due(),
                payment_type,
                payment_date,
                journal_id: default_journal.map(|j| j.id),
                journal_name: default_journal.map(|j| j.display_name.clone()),
                payment_method_line_id: default_line.map(|l| l.id),
                payment_method_line_name: default_line.map(|l| l.name.clone()),
                currency: order.currency.clone(),
                partner: order.partner.clone(),
                company,
                sale_order_id: order.id,
                sale_order_name: order.name.clone(),
            },
            payment_type_options,
            journal_options: journals.iter().map(JournalOption::from).collect(),
            payment_method_options: method_lines.iter().map(PaymentMethodOption::from).collect(),
        })
    }
}
