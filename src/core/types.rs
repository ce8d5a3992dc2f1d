use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive calendar window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the window; zero when inverted.
    pub fn len_days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }
}

/// Accounting-backend invoice status.
///
/// Only [`InvoiceStatus::Authorised`] (posted, unpaid) is in scope for
/// generated batches; the other states exist so foreign data can be
/// represented and rejected by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Submitted,
    /// Approved and awaiting payment.
    #[default]
    Authorised,
    Paid,
    Voided,
    Deleted,
}

impl InvoiceStatus {
    /// Backend status string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Authorised => "AUTHORISED",
            Self::Paid => "PAID",
            Self::Voided => "VOIDED",
            Self::Deleted => "DELETED",
        }
    }

    /// Parse from backend status string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DRAFT" => Some(Self::Draft),
            "SUBMITTED" => Some(Self::Submitted),
            "AUTHORISED" => Some(Self::Authorised),
            "PAID" => Some(Self::Paid),
            "VOIDED" => Some(Self::Voided),
            "DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One generated bill line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Line description (the catalog item name).
    pub description: String,
    /// Integer-valued quantity.
    pub quantity: Decimal,
    /// Unit price, rounded to cents.
    pub unit_amount: Decimal,
    pub account_code: String,
    /// Tax code applied to the line (the item's, or the exempt code).
    pub tax_type: String,
    /// `round_half_up(quantity * unit_amount, 2)`.
    pub line_amount: Decimal,
    pub item_code: String,
}

/// One generated accounts-payable bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub vendor_id: String,
    /// External-system contact the bill is raised against.
    pub contact_id: Option<String>,
    pub contact_account_number: Option<String>,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    pub status: InvoiceStatus,
    /// Batch-unique human-readable reference.
    pub reference: String,
    /// Per-vendor sequential invoice number.
    pub invoice_number: String,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Sum of line amounts (tax-exclusive).
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|l| l.line_amount).sum()
    }
}
