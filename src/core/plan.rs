//! The generation request.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::error::SynthError;
use super::types::{DateRange, InvoiceStatus};

/// Per-vendor share of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorPlan {
    pub vendor_id: String,
    /// Invoices to draw for this vendor.
    pub count: u32,
    #[serde(default = "default_min_lines", rename = "min_lines_per_invoice")]
    pub min_lines: u32,
    #[serde(default = "default_max_lines", rename = "max_lines_per_invoice")]
    pub max_lines: u32,
}

fn default_min_lines() -> u32 {
    1
}

fn default_max_lines() -> u32 {
    3
}

impl VendorPlan {
    pub fn new(vendor_id: impl Into<String>, count: u32) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            count,
            min_lines: default_min_lines(),
            max_lines: default_max_lines(),
        }
    }

    /// Set the per-invoice line bounds.
    pub fn lines(mut self, min: u32, max: u32) -> Self {
        self.min_lines = min;
        self.max_lines = max;
        self
    }
}

/// Generation plan: how many bills, when, and from whom.
///
/// Options left as `None` are filled from the runtime configuration by
/// [`crate::config::GeneratorConfig::apply_to`]; the generator applies the
/// same defaults when they are still unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub total_count: u32,
    pub date_range: DateRange,
    #[serde(default, rename = "vendor_mix")]
    pub vendors: Vec<VendorPlan>,
    #[serde(default)]
    pub allow_price_variation: Option<bool>,
    /// Fractional variance (0.05 = ±5%); falls back to the item's own variance.
    #[serde(default)]
    pub price_variation_pct: Option<Decimal>,
    #[serde(default)]
    pub business_days_only: Option<bool>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}

impl Plan {
    /// Sum of the vendor entry counts.
    pub fn allocated_count(&self) -> u64 {
        self.vendors.iter().map(|v| u64::from(v.count)).sum()
    }

    /// Nudge the first vendor entry so the entry counts sum to `total_count`.
    ///
    /// The first entry is clamped at zero, so a large surplus elsewhere can
    /// leave the sum above the total; the generator stops at `total_count`.
    pub fn normalize_counts(&mut self) {
        let sum = self.allocated_count() as i64;
        let total = i64::from(self.total_count);
        if sum == total {
            return;
        }
        if let Some(first) = self.vendors.first_mut() {
            let nudged = i64::from(first.count) + (total - sum);
            first.count = nudged.clamp(0, i64::from(u32::MAX)) as u32;
        }
    }

    /// Reject malformed plans; the first problem found is returned.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), SynthError> {
        if self.total_count == 0 {
            return Err(SynthError::Plan("total_count must be > 0".into()));
        }
        if self.date_range.start > self.date_range.end {
            return Err(SynthError::Plan(format!(
                "date range start {} is after end {}",
                self.date_range.start, self.date_range.end
            )));
        }
        if self.vendors.is_empty() {
            return Err(SynthError::Plan("vendor mix must not be empty".into()));
        }
        for (i, vp) in self.vendors.iter().enumerate() {
            if catalog.vendor(&vp.vendor_id).is_none() {
                return Err(SynthError::UnknownVendor(vp.vendor_id.clone()));
            }
            if vp.min_lines == 0 {
                return Err(SynthError::Plan(format!(
                    "vendor_mix[{i}]: min lines must be >= 1"
                )));
            }
            if vp.min_lines > vp.max_lines {
                return Err(SynthError::Plan(format!(
                    "vendor_mix[{i}]: min lines {} exceeds max lines {}",
                    vp.min_lines, vp.max_lines
                )));
            }
        }
        if let Some(pct) = self.price_variation_pct {
            if pct < Decimal::ZERO || pct > Decimal::ONE {
                return Err(SynthError::Plan(format!(
                    "price variation {pct} must be within 0..=1"
                )));
            }
        }
        Ok(())
    }

    /// Keep the window from reaching past `today`.
    ///
    /// A window that starts after `today` collapses to `[today, today]`.
    pub fn clamp_to_today(&mut self, today: NaiveDate) {
        if self.date_range.start > today {
            self.date_range = DateRange::new(today, today);
        } else if self.date_range.end > today {
            self.date_range.end = today;
        }
    }
}

/// Builder for [`Plan`].
///
/// ```
/// use apsynth::core::*;
/// use chrono::NaiveDate;
///
/// let plan = PlanBuilder::new(
///     5,
///     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
/// )
/// .vendor(VendorPlan::new("VEND-ACME", 5).lines(1, 1))
/// .business_days_only(true)
/// .build();
///
/// assert_eq!(plan.allocated_count(), 5);
/// ```
pub struct PlanBuilder {
    plan: Plan,
}

impl PlanBuilder {
    pub fn new(total_count: u32, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            plan: Plan {
                total_count,
                date_range: DateRange::new(start, end),
                vendors: Vec::new(),
                allow_price_variation: None,
                price_variation_pct: None,
                business_days_only: None,
                currency: None,
                status: None,
            },
        }
    }

    pub fn vendor(mut self, vendor: VendorPlan) -> Self {
        self.plan.vendors.push(vendor);
        self
    }

    /// Enable price variation with the given fraction.
    pub fn price_variation(mut self, pct: Decimal) -> Self {
        self.plan.allow_price_variation = Some(true);
        self.plan.price_variation_pct = Some(pct);
        self
    }

    pub fn business_days_only(mut self, on: bool) -> Self {
        self.plan.business_days_only = Some(on);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.plan.currency = Some(code.into());
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.plan.status = Some(status);
        self
    }

    pub fn build(self) -> Plan {
        self.plan
    }
}
