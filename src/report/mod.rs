//! Artifacts produced for collaborators.
//!
//! Backend payloads for bills and payments, the to-pay list, and the
//! generation report. All of them render to JSON through `serde_json`.

mod payload;
mod summary;

pub use payload::{
    ACCPAY, AccountRef, ContactRef, InvoiceBatchPayload, InvoicePayload, InvoiceRef,
    LineItemPayload, PaymentBatchPayload, PaymentPayload, map_invoice, map_invoices,
};
pub use summary::{AppliedConfig, GenerationReport, PaymentInstructions, ToPayList};
