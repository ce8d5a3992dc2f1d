//! Payment selection and payment records.
//!
//! Selection works on the references of a generated batch; payment records
//! are built from the backend's view of the posted bills.
//!
//! # Example
//!
//! ```
//! use apsynth::payments::{PaymentOptions, PostedInvoice, generate_payments, select_to_pay};
//! use chrono::NaiveDate;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rust_decimal_macros::dec;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let references = vec!["AP-1".to_string(), "AP-2".to_string()];
//! let to_pay = select_to_pay(&references, Some(1), false, false, &mut rng);
//! assert_eq!(to_pay.len(), 1);
//!
//! let posted = PostedInvoice {
//!     invoice_id: Some("b1".into()),
//!     reference: to_pay[0].clone(),
//!     amount_due: Some(dec!(42.00)),
//!     total: None,
//!     date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
//!     due_date: NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
//! };
//! let options = PaymentOptions { pay_on_due_date: true, ..Default::default() };
//! let payments = generate_payments(&[posted], &options, &mut rng);
//! assert_eq!(payments[0].date, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
//! ```

mod posting;
mod select;

pub use posting::{
    MAX_DAYS_OVERDUE, PaymentOptions, PaymentRecord, PostedInvoice, filter_to_pay,
    generate_payments,
};
pub use select::select_to_pay;
