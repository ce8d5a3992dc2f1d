//! # apsynth
//!
//! Deterministic synthetic accounts-payable bill generation: seeded invoice
//! batches, payment selection, batch validation, and the payloads an
//! accounting backend expects.
//!
//! All monetary values use [`rust_decimal::Decimal`] rounded half-up to two
//! places. A batch is a pure function of `(catalog, plan, seed, force_no_tax)`.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use apsynth::core::*;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let catalog = Catalog {
//!     vendors: vec![Vendor {
//!         id: "VEND-ACME".into(),
//!         name: "ACME Supplies".into(),
//!         contact_id: Some("c-acme".into()),
//!         contact_account_number: None,
//!         is_supplier: true,
//!         payment_terms: PaymentTerms::DaysAfterBillDate { days: 30 },
//!     }],
//!     items: vec![Item {
//!         id: "i-1".into(),
//!         code: "CEMENT-20KG".into(),
//!         name: "Cement 20kg".into(),
//!         unit_price: dec!(12.50),
//!         account_code: "400".into(),
//!         tax_code: "INPUT".into(),
//!         price_variance_pct: dec!(0.10),
//!     }],
//!     accounts: vec![Account {
//!         code: "400".into(),
//!         name: "Purchases".into(),
//!         kind: "EXPENSE".into(),
//!         tax_code: "INPUT".into(),
//!     }],
//!     tax_codes: vec![TaxCode { code: "INPUT".into(), rate: dec!(10) }],
//!     vendor_items: BTreeMap::new(),
//! };
//!
//! let plan = PlanBuilder::new(
//!     3,
//!     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
//! )
//! .vendor(VendorPlan::new("VEND-ACME", 3))
//! .build();
//!
//! let invoices = generate_from_plan(&catalog, &plan, "run-1", 42, false).unwrap();
//! assert_eq!(invoices.len(), 3);
//! assert!(validate_invoices(&catalog, &invoices).is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Catalog, plan, generator, validator, numbering |
//! | `payments` (default) | Payment selection and payment records |
//! | `report` (default) | Backend payloads, to-pay list, generation report (JSON) |
//! | `csv` | Invoice and line rows as CSV |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod config;

#[cfg(feature = "core")]
pub mod rows;

#[cfg(feature = "payments")]
pub mod payments;

#[cfg(feature = "report")]
pub mod report;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
