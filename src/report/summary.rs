use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_CURRENCY, DateRange, Invoice, InvoiceStatus, Plan, SynthError};

/// References selected for payment in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToPayList {
    pub run_id: String,
    pub references: Vec<String>,
}

impl ToPayList {
    pub fn new(run_id: impl Into<String>, references: Vec<String>) -> Self {
        Self {
            run_id: run_id.into(),
            references,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, SynthError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Generation options as the generator resolved them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedConfig {
    pub allow_price_variation: bool,
    /// `None` means each item's own variance was used.
    pub price_variation_pct: Option<Decimal>,
    pub currency: String,
    pub status: InvoiceStatus,
    pub business_days_only: bool,
    pub force_no_tax: bool,
}

impl AppliedConfig {
    /// Resolve unset plan options the same way the generator does.
    pub fn from_plan(plan: &Plan, force_no_tax: bool) -> Self {
        let allow_price_variation = plan.allow_price_variation.unwrap_or(false);
        Self {
            allow_price_variation,
            price_variation_pct: plan
                .price_variation_pct
                .filter(|_| allow_price_variation),
            currency: plan
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            status: plan.status.unwrap_or_default(),
            business_days_only: plan.business_days_only.unwrap_or(true),
            force_no_tax,
        }
    }
}

/// What the caller asked to have paid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstructions {
    pub count: Option<usize>,
    pub all: bool,
    pub references: Vec<String>,
}

/// Diagnostic summary of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub seed_hex: String,
    pub invoice_count: usize,
    pub date_range: DateRange,
    pub config: AppliedConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_instructions: Option<PaymentInstructions>,
}

impl GenerationReport {
    pub fn new(
        run_id: impl Into<String>,
        seed: u64,
        plan: &Plan,
        invoices: &[Invoice],
        force_no_tax: bool,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            seed,
            seed_hex: format!("{seed:#x}"),
            invoice_count: invoices.len(),
            date_range: plan.date_range,
            config: AppliedConfig::from_plan(plan, force_no_tax),
            payment_instructions: None,
        }
    }

    pub fn with_payments(mut self, instructions: PaymentInstructions) -> Self {
        self.payment_instructions = Some(instructions);
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, SynthError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
