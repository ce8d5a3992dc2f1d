//! Deterministic invoice batch generation.
//!
//! One seeded [`StdRng`] drives every draw in a run, in a fixed order per
//! invoice: issue date, line count, item selection, then per line the
//! quantity and (when enabled) the price perturbation, then the reference
//! suffix and, on a vendor's first invoice, its number-sequence start.
//! Identical `(catalog, plan, seed, force_no_tax)` inputs therefore yield
//! identical batches.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::calendar;
use super::catalog::{Catalog, Item, Vendor};
use super::error::SynthError;
use super::money::{perturb, round2};
use super::numbering::{ReferenceBuilder, VendorInvoiceNumbers};
use super::plan::{Plan, VendorPlan};
use super::types::{DateRange, Invoice, InvoiceLine, InvoiceStatus};

/// Tax code applied to every line when tax is forced off.
pub const EXEMPT_TAX_CODE: &str = "EXEMPTEXPENSES";

/// Currency used when neither plan nor config names one.
pub const DEFAULT_CURRENCY: &str = "AUD";

/// Candidate issue dates for a window.
///
/// Fails with [`SynthError::EmptyDateUniverse`] when no date qualifies.
pub fn date_universe(
    range: DateRange,
    business_days_only: bool,
) -> Result<Vec<NaiveDate>, SynthError> {
    let days = if business_days_only {
        calendar::business_days(range.start, range.end)
    } else {
        calendar::all_days(range.start, range.end)
    };
    if days.is_empty() {
        return Err(SynthError::EmptyDateUniverse {
            start: range.start,
            end: range.end,
        });
    }
    Ok(days)
}

/// Quantity range for an item code.
///
/// Labour-like codes ("lab", "hour") bill 1–8 units; bulk or hire-like
/// codes ("water", "fence", "scaf", "hire", "pump") 1–40; everything else
/// 1–12. Matching is on the lowercased code only.
pub fn quantity_range(code: &str) -> RangeInclusive<u32> {
    let code = code.to_lowercase();
    if code.contains("lab") || code.contains("hour") {
        return 1..=8;
    }
    if ["water", "fence", "scaf", "hire", "pump"]
        .iter()
        .any(|k| code.contains(k))
    {
        return 1..=40;
    }
    1..=12
}

/// Choose the items for one invoice.
///
/// The line count is uniform in `[min_lines, max_lines]`. Items are sampled
/// without repetition when enough exist, otherwise with replacement.
pub fn pick_lines<'a, R: Rng + ?Sized>(
    items: &[&'a Item],
    vendor_plan: &VendorPlan,
    rng: &mut R,
) -> Vec<&'a Item> {
    let n = rng.gen_range(vendor_plan.min_lines..=vendor_plan.max_lines) as usize;
    if items.len() >= n {
        return rand::seq::index::sample(rng, items.len(), n)
            .into_iter()
            .map(|i| items[i])
            .collect();
    }
    (0..n).filter_map(|_| items.choose(rng).copied()).collect()
}

/// Plan options with defaults resolved.
#[derive(Debug, Clone)]
struct Settings {
    vary_prices: bool,
    /// Plan-wide variance; `None` uses each item's own.
    variation_pct: Option<Decimal>,
    currency: String,
    status: InvoiceStatus,
}

impl Settings {
    fn from_plan(plan: &Plan) -> Self {
        Self {
            vary_prices: plan.allow_price_variation.unwrap_or(false),
            variation_pct: plan.price_variation_pct,
            currency: plan
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            status: plan.status.unwrap_or_default(),
        }
    }
}

/// Generates one batch from a single seeded random stream.
///
/// A generator is consumed by [`InvoiceGenerator::generate`]; build a new one
/// (with the same seed) to reproduce a batch.
pub struct InvoiceGenerator<'a> {
    catalog: &'a Catalog,
    run_id: String,
    seed: u64,
    rng: StdRng,
    force_no_tax: bool,
    references: ReferenceBuilder,
    numbers: VendorInvoiceNumbers,
    items_by_vendor: HashMap<String, Vec<&'a Item>>,
}

impl<'a> InvoiceGenerator<'a> {
    pub fn new(catalog: &'a Catalog, run_id: impl Into<String>, seed: u64) -> Self {
        let run_id = run_id.into();
        Self {
            catalog,
            references: ReferenceBuilder::new(&run_id),
            run_id,
            seed,
            rng: StdRng::seed_from_u64(seed),
            force_no_tax: false,
            numbers: VendorInvoiceNumbers::new(),
            items_by_vendor: HashMap::new(),
        }
    }

    /// Replace every line's tax code with [`EXEMPT_TAX_CODE`].
    pub fn force_no_tax(mut self, on: bool) -> Self {
        self.force_no_tax = on;
        self
    }

    /// Generate exactly `plan.total_count` invoices.
    ///
    /// Vendor entries are consumed in order. Once the target is reached the
    /// remaining entries are ignored; if the entries fall short, further
    /// invoices are drawn from the first entry until the target is met.
    pub fn generate(mut self, plan: &Plan) -> Result<Vec<Invoice>, SynthError> {
        plan.validate(self.catalog)?;
        let days = date_universe(plan.date_range, plan.business_days_only.unwrap_or(true))?;
        let settings = Settings::from_plan(plan);
        let target = plan.total_count as usize;

        info!(
            run_id = %self.run_id,
            seed = self.seed,
            target,
            window_days = plan.date_range.len_days(),
            candidate_days = days.len(),
            "generating invoice batch"
        );

        let mut invoices = Vec::with_capacity(target);
        'entries: for vp in &plan.vendors {
            if vp.count == 0 {
                continue;
            }
            let vendor = self.vendor(&vp.vendor_id)?;
            debug!(vendor = %vendor.id, count = vp.count, "drawing vendor invoices");
            for _ in 0..vp.count {
                if invoices.len() >= target {
                    break 'entries;
                }
                invoices.push(self.draw_invoice(vendor, vp, &days, &settings)?);
            }
        }

        if invoices.len() < target {
            let vp = &plan.vendors[0];
            let vendor = self.vendor(&vp.vendor_id)?;
            debug!(
                vendor = %vendor.id,
                shortfall = target - invoices.len(),
                "topping up from first vendor entry"
            );
            while invoices.len() < target {
                invoices.push(self.draw_invoice(vendor, vp, &days, &settings)?);
            }
        }

        info!(run_id = %self.run_id, count = invoices.len(), "invoice batch generated");
        Ok(invoices)
    }

    fn vendor(&self, id: &str) -> Result<&'a Vendor, SynthError> {
        self.catalog
            .vendor(id)
            .ok_or_else(|| SynthError::UnknownVendor(id.to_string()))
    }

    fn items_for(&mut self, vendor_id: &str) -> Vec<&'a Item> {
        let catalog = self.catalog;
        self.items_by_vendor
            .entry(vendor_id.to_string())
            .or_insert_with(|| catalog.items_for_vendor(vendor_id))
            .clone()
    }

    fn draw_invoice(
        &mut self,
        vendor: &'a Vendor,
        vp: &VendorPlan,
        days: &[NaiveDate],
        settings: &Settings,
    ) -> Result<Invoice, SynthError> {
        let items = self.items_for(&vendor.id);
        if items.is_empty() {
            return Err(SynthError::Catalog(format!(
                "no items available for vendor {}",
                vendor.id
            )));
        }

        let issue = *days
            .choose(&mut self.rng)
            .ok_or_else(|| SynthError::Plan("no candidate issue dates".into()))?;
        let due = calendar::due_date(issue, vendor)?;

        let chosen = pick_lines(&items, vp, &mut self.rng);
        let mut lines = Vec::with_capacity(chosen.len());
        for item in chosen {
            lines.push(self.draw_line(item, settings)?);
        }

        let reference = self.references.next_reference(&vendor.name, &mut self.rng);
        let invoice_number = self.numbers.next_number(&vendor.id, issue, &mut self.rng);

        Ok(Invoice {
            vendor_id: vendor.id.clone(),
            contact_id: vendor.contact_id.clone(),
            contact_account_number: vendor.contact_account_number.clone(),
            date: issue,
            due_date: due,
            currency: settings.currency.clone(),
            status: settings.status,
            reference,
            invoice_number,
            lines,
        })
    }

    fn draw_line(&mut self, item: &Item, settings: &Settings) -> Result<InvoiceLine, SynthError> {
        let quantity = Decimal::from(self.rng.gen_range(quantity_range(&item.code)));
        let unit_amount = if settings.vary_prices {
            let pct = settings.variation_pct.unwrap_or(item.price_variance_pct);
            perturb(item.unit_price, pct, self.rng.r#gen::<f64>())?
        } else {
            round2(item.unit_price)
        };
        let tax_type = if self.force_no_tax {
            EXEMPT_TAX_CODE.to_string()
        } else {
            item.tax_code.clone()
        };
        Ok(InvoiceLine {
            description: item.name.clone(),
            quantity,
            unit_amount,
            account_code: item.account_code.clone(),
            tax_type,
            line_amount: round2(quantity * unit_amount),
            item_code: item.code.clone(),
        })
    }
}

/// Generate a batch: `InvoiceGenerator::new(..).force_no_tax(..).generate(plan)`.
pub fn generate_from_plan(
    catalog: &Catalog,
    plan: &Plan,
    run_id: &str,
    seed: u64,
    force_no_tax: bool,
) -> Result<Vec<Invoice>, SynthError> {
    InvoiceGenerator::new(catalog, run_id, seed)
        .force_no_tax(force_no_tax)
        .generate(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(code: &str) -> Item {
        Item {
            id: code.to_lowercase(),
            code: code.into(),
            name: code.into(),
            unit_price: dec!(1),
            account_code: "400".into(),
            tax_code: "INPUT".into(),
            price_variance_pct: dec!(0.10),
        }
    }

    #[test]
    fn quantity_ranges_follow_code_keywords() {
        assert_eq!(quantity_range("SITE-LABOUR"), 1..=8);
        assert_eq!(quantity_range("Hourly-Rate"), 1..=8);
        assert_eq!(quantity_range("SCAFFOLD-01"), 1..=40);
        assert_eq!(quantity_range("pump-hire"), 1..=40);
        assert_eq!(quantity_range("WATER-TRUCK"), 1..=40);
        assert_eq!(quantity_range("CEMENT-20KG"), 1..=12);
    }

    #[test]
    fn labour_keyword_wins_over_hire() {
        assert_eq!(quantity_range("LABOUR-HIRE"), 1..=8);
    }

    #[test]
    fn pick_lines_unique_when_enough_items() {
        let owned = [item("A"), item("B"), item("C")];
        let items: Vec<&Item> = owned.iter().collect();
        let vp = VendorPlan::new("V", 1).lines(3, 3);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let mut codes: Vec<&str> = pick_lines(&items, &vp, &mut rng)
                .iter()
                .map(|i| i.code.as_str())
                .collect();
            codes.sort();
            assert_eq!(codes, vec!["A", "B", "C"]);
        }
    }

    #[test]
    fn pick_lines_repeats_when_short() {
        let owned = [item("A")];
        let items: Vec<&Item> = owned.iter().collect();
        let vp = VendorPlan::new("V", 1).lines(2, 2);
        let mut rng = StdRng::seed_from_u64(0);
        let picked = pick_lines(&items, &vp, &mut rng);
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|i| i.code == "A"));
    }

    #[test]
    fn date_universe_rejects_weekend_only_window() {
        let sat = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let sun = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let err = date_universe(DateRange::new(sat, sun), true).unwrap_err();
        assert!(matches!(err, SynthError::EmptyDateUniverse { .. }));
        assert_eq!(date_universe(DateRange::new(sat, sun), false).unwrap().len(), 2);
    }
}
