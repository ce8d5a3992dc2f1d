use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::error::{SynthError, ValidationError};
use super::generator::DEFAULT_CURRENCY;
use super::money::round2;
use super::types::{Invoice, InvoiceLine, InvoiceStatus};

/// Currency and status every invoice in a batch must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub currency: String,
    pub status: InvoiceStatus,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            status: InvoiceStatus::Authorised,
        }
    }
}

/// Validate a generated batch against the default scope (AUD, AUTHORISED).
pub fn validate_invoices(catalog: &Catalog, invoices: &[Invoice]) -> Result<(), SynthError> {
    validate_invoices_in_scope(catalog, invoices, &Scope::default())
}

/// Validate a generated batch; the first violation aborts the check.
///
/// Per invoice: the contact is known to the catalog, and currency and
/// status match `scope`. Per line: account and tax codes exist and
/// `line_amount == round_half_up(quantity * unit_amount, 2)`.
pub fn validate_invoices_in_scope(
    catalog: &Catalog,
    invoices: &[Invoice],
    scope: &Scope,
) -> Result<(), SynthError> {
    let index = CatalogIndex::new(catalog);
    for (i, invoice) in invoices.iter().enumerate() {
        check_invoice(&index, scope, i, invoice)?;
    }
    Ok(())
}

struct CatalogIndex<'a> {
    contacts: HashSet<&'a str>,
    accounts: HashSet<&'a str>,
    tax_codes: HashSet<&'a str>,
}

impl<'a> CatalogIndex<'a> {
    fn new(catalog: &'a Catalog) -> Self {
        Self {
            contacts: catalog
                .vendors
                .iter()
                .filter_map(|v| v.contact_id.as_deref())
                .collect(),
            accounts: catalog.accounts.iter().map(|a| a.code.as_str()).collect(),
            tax_codes: catalog.tax_codes.iter().map(|t| t.code.as_str()).collect(),
        }
    }
}

fn check_invoice(
    index: &CatalogIndex<'_>,
    scope: &Scope,
    i: usize,
    invoice: &Invoice,
) -> Result<(), ValidationError> {
    // AP-01: contact must resolve to a catalog vendor
    match invoice.contact_id.as_deref() {
        Some(id) if index.contacts.contains(id) => {}
        Some(id) => {
            return Err(ValidationError::with_rule(
                format!("invoices[{i}].contact_id"),
                format!("unknown contact_id {id}"),
                "AP-01",
            ));
        }
        None => {
            return Err(ValidationError::with_rule(
                format!("invoices[{i}].contact_id"),
                format!("vendor {} has no contact_id", invoice.vendor_id),
                "AP-01",
            ));
        }
    }

    // AP-02
    if invoice.currency != scope.currency {
        return Err(ValidationError::with_rule(
            format!("invoices[{i}].currency"),
            format!(
                "currency must be {}, got {}",
                scope.currency, invoice.currency
            ),
            "AP-02",
        ));
    }

    // AP-03
    if invoice.status != scope.status {
        return Err(ValidationError::with_rule(
            format!("invoices[{i}].status"),
            format!("status must be {}, got {}", scope.status, invoice.status),
            "AP-03",
        ));
    }

    for (j, line) in invoice.lines.iter().enumerate() {
        check_line(index, i, j, line)?;
    }
    Ok(())
}

fn check_line(
    index: &CatalogIndex<'_>,
    i: usize,
    j: usize,
    line: &InvoiceLine,
) -> Result<(), ValidationError> {
    if !index.accounts.contains(line.account_code.as_str()) {
        return Err(ValidationError::with_rule(
            format!("invoices[{i}].lines[{j}].account_code"),
            format!("invalid account {}", line.account_code),
            "AP-04",
        ));
    }
    if !index.tax_codes.contains(line.tax_type.as_str()) {
        return Err(ValidationError::with_rule(
            format!("invoices[{i}].lines[{j}].tax_type"),
            format!("invalid tax code {}", line.tax_type),
            "AP-05",
        ));
    }
    let expected = round2(line.quantity * line.unit_amount);
    if line.line_amount != expected {
        return Err(ValidationError::with_rule(
            format!("invoices[{i}].lines[{j}].line_amount"),
            format!(
                "line amount {} does not match {} x {} = {}",
                line.line_amount, line.quantity, line.unit_amount, expected
            ),
            "AP-06",
        ));
    }
    Ok(())
}
