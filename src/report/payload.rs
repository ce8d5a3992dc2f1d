use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{Invoice, InvoiceLine, InvoiceStatus, SynthError, ValidationError};

/// Invoice type for supplier bills.
pub const ACCPAY: &str = "ACCPAY";

/// A bill shaped for the accounts-payable endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoicePayload {
    #[serde(rename = "Type")]
    pub kind: String,
    pub invoice_number: String,
    pub contact: ContactRef,
    pub currency_code: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub reference: String,
    pub line_items: Vec<LineItemPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRef {
    #[serde(rename = "ContactID")]
    pub contact_id: String,
}

/// Amounts are sent as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItemPayload {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_amount: Decimal,
    pub account_code: String,
    pub tax_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_amount: Decimal,
}

impl From<&InvoiceLine> for LineItemPayload {
    fn from(line: &InvoiceLine) -> Self {
        Self {
            description: line.description.clone(),
            quantity: line.quantity,
            unit_amount: line.unit_amount,
            account_code: line.account_code.clone(),
            tax_type: line.tax_type.clone(),
            line_amount: line.line_amount,
        }
    }
}

/// Request body wrapping a batch of bills.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceBatchPayload {
    pub invoices: Vec<InvoicePayload>,
}

/// Shape one invoice for posting; the vendor must carry a contact id.
pub fn map_invoice(invoice: &Invoice) -> Result<InvoicePayload, SynthError> {
    let contact_id = invoice.contact_id.clone().ok_or_else(|| {
        ValidationError::with_rule(
            "contact_id",
            format!(
                "invoice {} has no contact id for vendor {}",
                invoice.reference, invoice.vendor_id
            ),
            "AP-01",
        )
    })?;
    Ok(InvoicePayload {
        kind: ACCPAY.into(),
        invoice_number: invoice.invoice_number.clone(),
        contact: ContactRef { contact_id },
        currency_code: invoice.currency.clone(),
        date: invoice.date,
        due_date: invoice.due_date,
        status: invoice.status,
        reference: invoice.reference.clone(),
        line_items: invoice.lines.iter().map(LineItemPayload::from).collect(),
    })
}

/// Shape a whole batch; fails on the first invoice without a contact.
pub fn map_invoices(invoices: &[Invoice]) -> Result<InvoiceBatchPayload, SynthError> {
    Ok(InvoiceBatchPayload {
        invoices: invoices
            .iter()
            .map(map_invoice)
            .collect::<Result<_, _>>()?,
    })
}

/// A payment shaped for the payments endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentPayload {
    pub invoice: InvoiceRef,
    pub account: AccountRef,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRef {
    #[serde(rename = "InvoiceID")]
    pub invoice_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRef {
    #[serde(rename = "Code")]
    pub code: String,
}

#[cfg(feature = "payments")]
impl From<&crate::payments::PaymentRecord> for PaymentPayload {
    fn from(record: &crate::payments::PaymentRecord) -> Self {
        Self {
            invoice: InvoiceRef {
                invoice_id: record.invoice_id.clone(),
            },
            account: AccountRef {
                code: record.account_code.clone(),
            },
            date: record.date,
            amount: record.amount,
        }
    }
}

/// Request body wrapping a batch of payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentBatchPayload {
    pub payments: Vec<PaymentPayload>,
}

#[cfg(feature = "payments")]
impl PaymentBatchPayload {
    pub fn from_records(records: &[crate::payments::PaymentRecord]) -> Self {
        Self {
            payments: records.iter().map(PaymentPayload::from).collect(),
        }
    }
}
