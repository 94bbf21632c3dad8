use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::records::{
    Company, CurrencyInfo, Journal, JournalType, PaymentDirection, PaymentMethodLine, RecordRef,
    SelectionOption,
};

/// Everything the advance-payment modal needs in one response
#[derive(Debug, Clone, Serialize)]
pub struct AdvancePaymentOptions {
    pub defaults: AdvancePaymentDefaults,
    pub payment_type_options: Vec<SelectionOption>,
    pub journal_options: Vec<JournalOption>,
    pub payment_method_options: Vec<PaymentMethodOption>,
}

/// Pre-filled values of the payment form
///
/// Journal and method fields are `null` when the company has no bank/cash
/// journal or the journal has no method line for the direction.
#[derive(Debug, Clone, Serialize)]
pub struct AdvancePaymentDefaults {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub payment_type: PaymentDirection,
    pub payment_date: NaiveDate,
    pub journal_id: Option<i64>,
    pub journal_name: Option<String>,
    pub payment_method_line_id: Option<i64>,
    pub payment_method_line_name: Option<String>,
    pub currency: CurrencyInfo,
    pub partner: RecordRef,
    pub company: Company,
    pub sale_order_id: i64,
    pub sale_order_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalOption {
    pub value: i64,
    pub label: String,
    pub code: String,
    #[serde(rename = "type")]
    pub journal_type: JournalType,
}

impl From<&Journal> for JournalOption {
    fn from(journal: &Journal) -> Self {
        Self {
            value: journal.id,
            label: journal.display_name.clone(),
            code: journal.code.clone(),
            journal_type: journal.journal_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMethodOption {
    pub value: i64,
    pub label: String,
    pub code: String,
    pub method_type: PaymentDirection,
}

impl From<&PaymentMethodLine> for PaymentMethodOption {
    fn from(line: &PaymentMethodLine) -> Self {
        Self {
            value: line.id,
            label: line.name.clone(),
            code: line.code.clone(),
            method_type: line.payment_type,
        }
    }
}
