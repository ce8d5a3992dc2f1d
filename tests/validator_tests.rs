use std::collections::BTreeMap;

use apsynth::core::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn catalog() -> Catalog {
    Catalog {
        vendors: vec![
            Vendor {
                id: "VEND-ACME".into(),
                name: "ACME Building Supplies".into(),
                contact_id: Some("c-acme".into()),
                contact_account_number: None,
                is_supplier: true,
                payment_terms: PaymentTerms::default(),
            },
            Vendor {
                id: "VEND-NOCONTACT".into(),
                name: "Walk-in Supplier".into(),
                contact_id: None,
                contact_account_number: None,
                is_supplier: true,
                payment_terms: PaymentTerms::default(),
            },
        ],
        items: vec![
            Item {
                id: "i1".into(),
                code: "CEMENT-20KG".into(),
                name: "Cement 20kg bag".into(),
                unit_price: dec!(12.50),
                account_code: "400".into(),
                tax_code: "INPUT".into(),
                price_variance_pct: dec!(0.10),
            },
            Item {
                id: "i2".into(),
                code: "SITE-LABOUR".into(),
                name: "Site labour".into(),
                unit_price: dec!(65.00),
                account_code: "477".into(),
                tax_code: "INPUT".into(),
                price_variance_pct: dec!(0.10),
            },
        ],
        accounts: vec![
            Account {
                code: "400".into(),
                name: "Purchases".into(),
                kind: "EXPENSE".into(),
                tax_code: "INPUT".into(),
            },
            Account {
                code: "477".into(),
                name: "Wages".into(),
                kind: "EXPENSE".into(),
                tax_code: "INPUT".into(),
            },
        ],
        tax_codes: vec![TaxCode {
            code: "INPUT".into(),
            rate: dec!(10),
        }],
        vendor_items: BTreeMap::new(),
    }
}

fn batch() -> Vec<Invoice> {
    let plan = PlanBuilder::new(6, date(2024, 3, 1), date(2024, 3, 31))
        .vendor(VendorPlan::new("VEND-ACME", 6).lines(2, 2))
        .price_variation(dec!(0.1))
        .build();
    generate_from_plan(&catalog(), &plan, "run", 17, false).unwrap()
}

fn violation(invoices: &[Invoice]) -> ValidationError {
    match validate_invoices(&catalog(), invoices) {
        Err(SynthError::Validation(e)) => e,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn generated_batch_is_valid() {
    assert!(validate_invoices(&catalog(), &batch()).is_ok());
}

#[test]
fn catalog_fixture_is_consistent() {
    assert!(catalog().check_integrity().is_ok());
}

#[test]
fn unknown_contact_is_ap01() {
    let mut invoices = batch();
    invoices[2].contact_id = Some("c-nobody".into());
    let err = violation(&invoices);
    assert_eq!(err.rule.as_deref(), Some("AP-01"));
    assert_eq!(err.field, "invoices[2].contact_id");
}

#[test]
fn vendor_without_contact_fails_validation() {
    let plan = PlanBuilder::new(1, date(2024, 3, 1), date(2024, 3, 31))
        .vendor(VendorPlan::new("VEND-NOCONTACT", 1))
        .build();
    let invoices = generate_from_plan(&catalog(), &plan, "run", 1, false).unwrap();
    assert_eq!(violation(&invoices).rule.as_deref(), Some("AP-01"));
}

#[test]
fn foreign_currency_is_ap02() {
    let mut invoices = batch();
    invoices[5].currency = "USD".into();
    let err = violation(&invoices);
    assert_eq!(err.rule.as_deref(), Some("AP-02"));
    assert_eq!(err.field, "invoices[5].currency");
}

#[test]
fn paid_status_is_ap03() {
    let mut invoices = batch();
    invoices[0].status = InvoiceStatus::Paid;
    assert_eq!(violation(&invoices).rule.as_deref(), Some("AP-03"));
}

#[test]
fn removed_account_is_ap04() {
    let invoices = batch();
    let mut cat = catalog();
    cat.accounts.retain(|a| a.code != "477");
    let uses_wages = invoices
        .iter()
        .flat_map(|i| &i.lines)
        .any(|l| l.account_code == "477");
    assert!(uses_wages);
    match validate_invoices(&cat, &invoices) {
        Err(SynthError::Validation(e)) => assert_eq!(e.rule.as_deref(), Some("AP-04")),
        other => panic!("expected AP-04, got {other:?}"),
    }
}

#[test]
fn unknown_tax_code_is_ap05() {
    let mut invoices = batch();
    invoices[1].lines[1].tax_type = "GST".into();
    let err = violation(&invoices);
    assert_eq!(err.rule.as_deref(), Some("AP-05"));
    assert_eq!(err.field, "invoices[1].lines[1].tax_type");
}

#[test]
fn exempt_code_needs_catalog_entry() {
    let plan = PlanBuilder::new(2, date(2024, 3, 1), date(2024, 3, 31))
        .vendor(VendorPlan::new("VEND-ACME", 2))
        .build();
    let invoices = generate_from_plan(&catalog(), &plan, "run", 1, true).unwrap();
    assert_eq!(violation(&invoices).rule.as_deref(), Some("AP-05"));
}

#[test]
fn tampered_line_amount_is_ap06() {
    let mut invoices = batch();
    invoices[3].lines[0].line_amount += dec!(0.01);
    let err = violation(&invoices);
    assert_eq!(err.rule.as_deref(), Some("AP-06"));
    assert_eq!(err.field, "invoices[3].lines[0].line_amount");
}

#[test]
fn earliest_invoice_is_reported_first() {
    let mut invoices = batch();
    invoices[4].currency = "USD".into();
    invoices[1].lines[0].tax_type = "GST".into();
    assert_eq!(violation(&invoices).field, "invoices[1].lines[0].tax_type");
}
