//! Core accounts-payable types, generation, and validation.
//!
//! This module holds the catalog view, the generation plan, the seeded
//! invoice generator, and the fail-fast batch validator.

pub mod calendar;
mod catalog;
mod error;
mod generator;
pub mod money;
mod numbering;
mod plan;
mod types;
mod validation;

pub use catalog::*;
pub use error::*;
pub use generator::*;
pub use money::{round2, round_half_up};
pub use numbering::*;
pub use plan::*;
pub use types::*;
pub use validation::*;
