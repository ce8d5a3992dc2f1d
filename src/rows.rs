//! Columnar rows: one header row per invoice and one row per line, joined
//! by `reference`.
//!
//! With the `csv` feature the rows can be rendered as CSV text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::core::{Invoice, InvoiceStatus};
#[cfg(feature = "csv")]
use crate::core::SynthError;

/// Invoice header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRow {
    pub vendor_id: String,
    pub contact_id: Option<String>,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    pub status: InvoiceStatus,
    pub reference: String,
    pub invoice_number: String,
}

/// Invoice line row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRow {
    pub reference: String,
    pub description: String,
    pub quantity: Decimal,
    #[serde(serialize_with = "two_places")]
    pub unit_amount: Decimal,
    pub account_code: String,
    pub tax_type: String,
    #[serde(serialize_with = "two_places")]
    pub line_amount: Decimal,
    pub item_code: String,
}

fn two_places<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

/// Flatten a batch into header and line rows, preserving batch order.
pub fn to_rows(invoices: &[Invoice]) -> (Vec<InvoiceRow>, Vec<LineRow>) {
    let mut headers = Vec::with_capacity(invoices.len());
    let mut lines = Vec::new();
    for inv in invoices {
        headers.push(InvoiceRow {
            vendor_id: inv.vendor_id.clone(),
            contact_id: inv.contact_id.clone(),
            date: inv.date,
            due_date: inv.due_date,
            currency: inv.currency.clone(),
            status: inv.status,
            reference: inv.reference.clone(),
            invoice_number: inv.invoice_number.clone(),
        });
        lines.extend(inv.lines.iter().map(|l| LineRow {
            reference: inv.reference.clone(),
            description: l.description.clone(),
            quantity: l.quantity,
            unit_amount: l.unit_amount,
            account_code: l.account_code.clone(),
            tax_type: l.tax_type.clone(),
            line_amount: l.line_amount,
            item_code: l.item_code.clone(),
        }));
    }
    (headers, lines)
}

#[cfg(feature = "csv")]
fn write_csv<T: Serialize>(rows: &[T]) -> Result<String, SynthError> {
    let mut wrt = csv::WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        wrt.serialize(row)
            .map_err(|e| SynthError::Csv(e.to_string()))?;
    }
    let bytes = wrt
        .into_inner()
        .map_err(|e| SynthError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SynthError::Csv(e.to_string()))
}

/// Render invoice header rows as CSV with a header line.
#[cfg(feature = "csv")]
pub fn write_invoices_csv(rows: &[InvoiceRow]) -> Result<String, SynthError> {
    write_csv(rows)
}

/// Render line rows as CSV with a header line.
#[cfg(feature = "csv")]
pub fn write_lines_csv(rows: &[LineRow]) -> Result<String, SynthError> {
    write_csv(rows)
}
