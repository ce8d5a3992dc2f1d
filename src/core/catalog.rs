//! Read-only reference data the generator draws from.
//!
//! A [`Catalog`] is a snapshot of vendors, items, accounts, tax codes, and
//! the vendor → item-code mapping. Loading it from disk is the caller's job;
//! [`Catalog::check_integrity`] verifies an in-memory snapshot before use.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calendar;
use super::error::SynthError;

/// Vendor payment terms, tagged by `type`.
///
/// The tag is matched case-insensitively and defaults to
/// `DAYSAFTERBILLDATE` when absent, so `{"days": 45}` and `{}` both parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPaymentTerms", into = "RawPaymentTerms")]
pub enum PaymentTerms {
    /// Due a fixed number of days after the bill date.
    DaysAfterBillDate { days: u32 },
    /// Due on a day of the month following the bill date, clamped to month length.
    EndOfFollowingMonth { day_of_month: u32 },
    /// Any other term type; resolves like the 30-day default.
    Unrecognised,
}

const DAYS_AFTER_BILL_DATE: &str = "DAYSAFTERBILLDATE";
const OF_FOLLOWING_MONTH: &str = "OFFOLLOWINGMONTH";
const UNRECOGNISED: &str = "UNRECOGNISED";

/// Wire shape of [`PaymentTerms`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawPaymentTerms {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_month: Option<u32>,
}

impl From<RawPaymentTerms> for PaymentTerms {
    fn from(raw: RawPaymentTerms) -> Self {
        let kind = raw
            .kind
            .map(|k| k.trim().to_ascii_uppercase())
            .unwrap_or_else(|| DAYS_AFTER_BILL_DATE.to_string());
        match kind.as_str() {
            DAYS_AFTER_BILL_DATE | "DAYS_AFTER_BILL_DATE" => Self::DaysAfterBillDate {
                days: raw.days.unwrap_or(30),
            },
            OF_FOLLOWING_MONTH | "END_OF_FOLLOWING_MONTH" => Self::EndOfFollowingMonth {
                day_of_month: raw.day_of_month.unwrap_or(31),
            },
            _ => Self::Unrecognised,
        }
    }
}

impl From<PaymentTerms> for RawPaymentTerms {
    fn from(terms: PaymentTerms) -> Self {
        match terms {
            PaymentTerms::DaysAfterBillDate { days } => Self {
                kind: Some(DAYS_AFTER_BILL_DATE.into()),
                days: Some(days),
                day_of_month: None,
            },
            PaymentTerms::EndOfFollowingMonth { day_of_month } => Self {
                kind: Some(OF_FOLLOWING_MONTH.into()),
                days: None,
                day_of_month: Some(day_of_month),
            },
            PaymentTerms::Unrecognised => Self {
                kind: Some(UNRECOGNISED.into()),
                ..Self::default()
            },
        }
    }
}

impl Default for PaymentTerms {
    fn default() -> Self {
        Self::DaysAfterBillDate { days: 30 }
    }
}

impl PaymentTerms {
    /// Resolve the due date for a bill issued on `issue`.
    ///
    /// Fails with [`SynthError::Catalog`] when the result falls outside the
    /// representable date range.
    pub fn due_date(&self, issue: NaiveDate) -> Result<NaiveDate, SynthError> {
        let due = match *self {
            Self::DaysAfterBillDate { days } => {
                issue.checked_add_signed(Duration::days(i64::from(days)))
            }
            Self::EndOfFollowingMonth { day_of_month } => {
                let (year, month) = calendar::next_month(issue);
                let day = day_of_month.clamp(1, calendar::last_day_of_month(year, month));
                NaiveDate::from_ymd_opt(year, month, day)
            }
            Self::Unrecognised => issue.checked_add_signed(Duration::days(30)),
        };
        due.ok_or_else(|| {
            SynthError::Catalog(format!("payment terms {self:?} overflow from {issue}"))
        })
    }
}

/// A supplier bills are raised against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    /// Contact identifier in the accounting backend, once created there.
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub contact_account_number: Option<String>,
    #[serde(default = "default_true")]
    pub is_supplier: bool,
    #[serde(default)]
    pub payment_terms: PaymentTerms,
}

fn default_true() -> bool {
    true
}

/// A billable catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    /// Unique within the catalog.
    pub code: String,
    pub name: String,
    pub unit_price: Decimal,
    pub account_code: String,
    pub tax_code: String,
    /// Fractional price variance (0.10 = ±10%).
    #[serde(default = "default_variance")]
    pub price_variance_pct: Decimal,
}

fn default_variance() -> Decimal {
    dec!(0.10)
}

/// Chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tax_code: String,
}

/// Tax code with its rate in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCode {
    pub code: String,
    pub rate: Decimal,
}

/// Reference data snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub vendors: Vec<Vendor>,
    pub items: Vec<Item>,
    pub accounts: Vec<Account>,
    pub tax_codes: Vec<TaxCode>,
    /// Vendor id → item codes, in preference order.
    #[serde(default)]
    pub vendor_items: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn vendor(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    pub fn item(&self, code: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.code == code)
    }

    /// Items a vendor supplies, in mapping order.
    ///
    /// Unknown codes are skipped. A vendor with no mapped items falls back to
    /// the full item list.
    pub fn items_for_vendor(&self, vendor_id: &str) -> Vec<&Item> {
        let mapped: Vec<&Item> = self
            .vendor_items
            .get(vendor_id)
            .map(|codes| codes.iter().filter_map(|c| self.item(c)).collect())
            .unwrap_or_default();
        if mapped.is_empty() {
            self.items.iter().collect()
        } else {
            mapped
        }
    }

    pub fn has_contact(&self, contact_id: &str) -> bool {
        self.vendors
            .iter()
            .any(|v| v.contact_id.as_deref() == Some(contact_id))
    }

    pub fn has_account(&self, code: &str) -> bool {
        self.accounts.iter().any(|a| a.code == code)
    }

    pub fn has_tax_code(&self, code: &str) -> bool {
        self.tax_codes.iter().any(|t| t.code == code)
    }

    /// Verify referential integrity; the first broken reference is returned.
    pub fn check_integrity(&self) -> Result<(), SynthError> {
        let accounts: HashSet<&str> = self.accounts.iter().map(|a| a.code.as_str()).collect();
        let tax: HashSet<&str> = self.tax_codes.iter().map(|t| t.code.as_str()).collect();
        let items: HashSet<&str> = self.items.iter().map(|i| i.code.as_str()).collect();
        let vendors: HashSet<&str> = self.vendors.iter().map(|v| v.id.as_str()).collect();

        for item in &self.items {
            if !accounts.contains(item.account_code.as_str()) {
                return Err(SynthError::Catalog(format!(
                    "item {} refers to missing account {}",
                    item.code, item.account_code
                )));
            }
            if !tax.contains(item.tax_code.as_str()) {
                return Err(SynthError::Catalog(format!(
                    "item {} refers to missing tax code {}",
                    item.code, item.tax_code
                )));
            }
        }

        for (vendor_id, codes) in &self.vendor_items {
            if !vendors.contains(vendor_id.as_str()) {
                return Err(SynthError::Catalog(format!(
                    "vendor_items: unknown vendor {vendor_id}"
                )));
            }
            if let Some(code) = codes.iter().find(|c| !items.contains(c.as_str())) {
                return Err(SynthError::Catalog(format!(
                    "vendor_items[{vendor_id}]: unknown item code {code}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(code: &str) -> Item {
        Item {
            id: format!("id-{code}"),
            code: code.into(),
            name: code.into(),
            unit_price: dec!(10),
            account_code: "400".into(),
            tax_code: "INPUT".into(),
            price_variance_pct: dec!(0.10),
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            vendors: vec![Vendor {
                id: "VEND-A".into(),
                name: "A".into(),
                contact_id: Some("c-a".into()),
                contact_account_number: None,
                is_supplier: true,
                payment_terms: PaymentTerms::default(),
            }],
            items: vec![item("X1"), item("X2"), item("X3")],
            accounts: vec![Account {
                code: "400".into(),
                name: "Purchases".into(),
                kind: "EXPENSE".into(),
                tax_code: "INPUT".into(),
            }],
            tax_codes: vec![TaxCode {
                code: "INPUT".into(),
                rate: dec!(10),
            }],
            vendor_items: BTreeMap::from([("VEND-A".into(), vec!["X3".into(), "X1".into()])]),
        }
    }

    #[test]
    fn days_after_bill_date() {
        let terms = PaymentTerms::DaysAfterBillDate { days: 30 };
        assert_eq!(terms.due_date(date(2024, 3, 1)).unwrap(), date(2024, 3, 31));
    }

    #[test]
    fn following_month_clamps_to_leap_february() {
        let terms = PaymentTerms::EndOfFollowingMonth { day_of_month: 31 };
        assert_eq!(terms.due_date(date(2024, 1, 15)).unwrap(), date(2024, 2, 29));
        assert_eq!(terms.due_date(date(2023, 1, 15)).unwrap(), date(2023, 2, 28));
    }

    #[test]
    fn following_month_wraps_year() {
        let terms = PaymentTerms::EndOfFollowingMonth { day_of_month: 20 };
        assert_eq!(terms.due_date(date(2024, 12, 5)).unwrap(), date(2025, 1, 20));
    }

    #[test]
    fn unrecognised_terms_default_to_thirty_days() {
        assert_eq!(
            PaymentTerms::Unrecognised.due_date(date(2024, 3, 1)).unwrap(),
            date(2024, 3, 31)
        );
    }

    #[test]
    fn huge_day_count_is_a_catalog_error() {
        let terms = PaymentTerms::DaysAfterBillDate { days: u32::MAX };
        assert!(matches!(
            terms.due_date(date(2024, 3, 1)),
            Err(SynthError::Catalog(_))
        ));
        assert!(matches!(
            PaymentTerms::Unrecognised.due_date(NaiveDate::MAX),
            Err(SynthError::Catalog(_))
        ));
    }

    // Wire format

    fn terms(json: &str) -> PaymentTerms {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_type_means_days_after_bill_date() {
        assert_eq!(terms(r#"{"days":45}"#), PaymentTerms::DaysAfterBillDate { days: 45 });
        assert_eq!(terms("{}"), PaymentTerms::DaysAfterBillDate { days: 30 });
    }

    #[test]
    fn type_is_case_insensitive() {
        let lower = terms(r#"{"type":"daysafterbilldate","days":14}"#);
        assert_eq!(lower, PaymentTerms::DaysAfterBillDate { days: 14 });
        assert_eq!(lower.due_date(date(2024, 3, 1)).unwrap(), date(2024, 3, 15));
        assert_eq!(
            terms(r#"{"type":"OfFollowingMonth","day_of_month":20}"#),
            PaymentTerms::EndOfFollowingMonth { day_of_month: 20 }
        );
    }

    #[test]
    fn aliases_and_field_defaults() {
        assert_eq!(
            terms(r#"{"type":"days_after_bill_date"}"#),
            PaymentTerms::DaysAfterBillDate { days: 30 }
        );
        assert_eq!(
            terms(r#"{"type":"END_OF_FOLLOWING_MONTH"}"#),
            PaymentTerms::EndOfFollowingMonth { day_of_month: 31 }
        );
    }

    #[test]
    fn unknown_type_is_unrecognised() {
        assert_eq!(
            terms(r#"{"type":"OFCURRENTMONTH","day":5}"#),
            PaymentTerms::Unrecognised
        );
    }

    #[test]
    fn terms_serialize_with_canonical_type() {
        let value = serde_json::to_value(PaymentTerms::EndOfFollowingMonth { day_of_month: 20 })
            .unwrap();
        assert_eq!(value, serde_json::json!({"type": "OFFOLLOWINGMONTH", "day_of_month": 20}));
        let back: PaymentTerms = serde_json::from_value(value).unwrap();
        assert_eq!(back, PaymentTerms::EndOfFollowingMonth { day_of_month: 20 });
    }

    #[test]
    fn vendor_without_terms_gets_default() {
        let v: Vendor = serde_json::from_str(r#"{"id":"V1","name":"Bob's Pumps"}"#).unwrap();
        assert_eq!(v.payment_terms, PaymentTerms::default());
        let v: Vendor =
            serde_json::from_str(r#"{"id":"V2","name":"Pumps","payment_terms":{"days":7}}"#)
                .unwrap();
        assert_eq!(v.payment_terms, PaymentTerms::DaysAfterBillDate { days: 7 });
    }

    #[test]
    fn items_for_vendor_keeps_mapping_order() {
        let cat = catalog();
        let codes: Vec<&str> = cat
            .items_for_vendor("VEND-A")
            .iter()
            .map(|i| i.code.as_str())
            .collect();
        assert_eq!(codes, vec!["X3", "X1"]);
    }

    #[test]
    fn items_for_unmapped_vendor_falls_back_to_all() {
        let cat = catalog();
        assert_eq!(cat.items_for_vendor("VEND-NONE").len(), 3);
    }

    #[test]
    fn integrity_ok() {
        assert!(catalog().check_integrity().is_ok());
    }

    #[test]
    fn integrity_rejects_missing_tax_code() {
        let mut cat = catalog();
        cat.items[1].tax_code = "GST".into();
        let err = cat.check_integrity().unwrap_err();
        assert!(err.to_string().contains("X2"));
    }

    #[test]
    fn integrity_rejects_unknown_mapped_item() {
        let mut cat = catalog();
        cat.vendor_items
            .insert("VEND-A".into(), vec!["X1".into(), "NOPE".into()]);
        assert!(matches!(cat.check_integrity(), Err(SynthError::Catalog(_))));
    }

    #[test]
    fn integrity_rejects_unknown_mapped_vendor() {
        let mut cat = catalog();
        cat.vendor_items.insert("VEND-GHOST".into(), vec![]);
        assert!(cat.check_integrity().is_err());
    }
}
