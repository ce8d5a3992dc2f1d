use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::select::sample_in_order;
use crate::config::PaymentConfig;
use crate::core::Invoice;

/// Latest day after the due date an overdue payment may land on.
pub const MAX_DAYS_OVERDUE: i64 = 30;

/// A bill as the backend reports it after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedInvoice {
    /// Backend identifier; absent when the insert was not acknowledged.
    pub invoice_id: Option<String>,
    pub reference: String,
    pub amount_due: Option<Decimal>,
    pub total: Option<Decimal>,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
}

impl PostedInvoice {
    /// Describe a generated invoice posted under `invoice_id`.
    pub fn from_invoice(invoice: &Invoice, invoice_id: impl Into<String>) -> Self {
        let total = invoice.subtotal();
        Self {
            invoice_id: Some(invoice_id.into()),
            reference: invoice.reference.clone(),
            amount_due: Some(total),
            total: Some(total),
            date: invoice.date,
            due_date: invoice.due_date,
        }
    }

    /// Amount to pay: `amount_due`, else `total`.
    pub fn payable_amount(&self) -> Option<Decimal> {
        self.amount_due.or(self.total)
    }
}

/// How payment dates are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOptions {
    pub account_code: String,
    /// Pay everything on this date, overriding every other rule.
    pub payment_date: Option<NaiveDate>,
    pub pay_on_due_date: bool,
    pub allow_overdue: bool,
    pub overdue_count: Option<usize>,
}

impl From<&PaymentConfig> for PaymentOptions {
    fn from(config: &PaymentConfig) -> Self {
        Self {
            account_code: config.account_code.clone(),
            payment_date: None,
            pay_on_due_date: config.pay_on_due_date,
            allow_overdue: config.allow_overdue,
            overdue_count: config.overdue_count,
        }
    }
}

impl Default for PaymentOptions {
    fn default() -> Self {
        Self::from(&PaymentConfig::default())
    }
}

/// A payment ready for posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub invoice_id: String,
    pub reference: String,
    pub account_code: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Keep the records whose reference was selected for payment.
pub fn filter_to_pay(records: &[PostedInvoice], references: &[String]) -> Vec<PostedInvoice> {
    let wanted: HashSet<&str> = references.iter().map(String::as_str).collect();
    records
        .iter()
        .filter(|r| wanted.contains(r.reference.as_str()))
        .cloned()
        .collect()
}

/// Build one payment per payable record.
///
/// Records without a backend id or an amount are skipped. Without an
/// explicit `payment_date`, a payment lands on the due date when
/// `pay_on_due_date` is set; overdue bills (all of them with
/// `allow_overdue`, else a sample of `overdue_count`) are paid 1–30 days
/// late; the rest are paid between the issue date and the day before the
/// due date.
pub fn generate_payments<R: Rng + ?Sized>(
    records: &[PostedInvoice],
    options: &PaymentOptions,
    rng: &mut R,
) -> Vec<PaymentRecord> {
    let mut payable = Vec::with_capacity(records.len());
    for record in records {
        match (&record.invoice_id, record.payable_amount()) {
            (Some(id), Some(amount)) if !id.trim().is_empty() => {
                payable.push((record, id, amount))
            }
            _ => warn!(
                reference = %record.reference,
                "skipping payment: missing invoice id or amount"
            ),
        }
    }

    let overdue: HashSet<usize> = match options.overdue_count {
        Some(n)
            if !options.allow_overdue
                && !options.pay_on_due_date
                && options.payment_date.is_none() =>
        {
            sample_in_order(rng, payable.len(), n.min(payable.len()))
                .into_iter()
                .collect()
        }
        _ => HashSet::new(),
    };

    let payments: Vec<PaymentRecord> = payable
        .into_iter()
        .enumerate()
        .map(|(i, (record, id, amount))| {
            let late = options.allow_overdue || overdue.contains(&i);
            PaymentRecord {
                invoice_id: id.clone(),
                reference: record.reference.clone(),
                account_code: options.account_code.clone(),
                date: payment_date(record, options, late, rng),
                amount,
            }
        })
        .collect();

    debug!(
        payments = payments.len(),
        overdue = overdue.len(),
        "payments generated"
    );
    payments
}

fn payment_date<R: Rng + ?Sized>(
    record: &PostedInvoice,
    options: &PaymentOptions,
    late: bool,
    rng: &mut R,
) -> NaiveDate {
    if let Some(date) = options.payment_date {
        return date;
    }
    if options.pay_on_due_date {
        return record.due_date;
    }
    if late {
        return record.due_date + Duration::days(rng.gen_range(1..=MAX_DAYS_OVERDUE));
    }
    let latest = (record.due_date - Duration::days(1)).max(record.date);
    let span = (latest - record.date).num_days();
    record.date + Duration::days(rng.gen_range(0..=span))
}
