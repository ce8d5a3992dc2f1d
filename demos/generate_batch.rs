use apsynth::config::RuntimeConfig;
use apsynth::core::*;
use apsynth::payments::{PaymentOptions, PostedInvoice, filter_to_pay, generate_payments, select_to_pay};
use apsynth::report::{GenerationReport, PaymentBatchPayload, PaymentInstructions, ToPayList, map_invoices};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

const CATALOG: &str = r#"{
  "vendors": [
    {"id": "VEND-ACME", "name": "ACME Building Supplies", "contact_id": "c-acme",
     "payment_terms": {"type": "DAYSAFTERBILLDATE", "days": 30}},
    {"id": "VEND-PUMPS", "name": "Pumps & Hire Pty Ltd", "contact_id": "c-pumps",
     "payment_terms": {"type": "OFFOLLOWINGMONTH", "day_of_month": 31}}
  ],
  "items": [
    {"id": "i1", "code": "CEMENT-20KG", "name": "Cement 20kg bag", "unit_price": "12.50",
     "account_code": "400", "tax_code": "INPUT"},
    {"id": "i2", "code": "SITE-LABOUR", "name": "Site labour (hour)", "unit_price": "65.00",
     "account_code": "477", "tax_code": "INPUT"},
    {"id": "i3", "code": "PUMP-HIRE", "name": "Dewatering pump hire", "unit_price": "95.00",
     "account_code": "400", "tax_code": "INPUT"}
  ],
  "accounts": [
    {"code": "400", "name": "Purchases", "type": "EXPENSE", "tax_code": "INPUT"},
    {"code": "477", "name": "Wages", "type": "EXPENSE", "tax_code": "INPUT"}
  ],
  "tax_codes": [
    {"code": "INPUT", "rate": "10"},
    {"code": "EXEMPTEXPENSES", "rate": "0"}
  ],
  "vendor_items": {
    "VEND-ACME": ["CEMENT-20KG", "SITE-LABOUR"],
    "VEND-PUMPS": ["PUMP-HIRE"]
  }
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let catalog: Catalog = serde_json::from_str(CATALOG).unwrap();
    catalog.check_integrity().unwrap();

    let config = RuntimeConfig::merged(
        &serde_json::to_value(RuntimeConfig::default()).unwrap(),
        &serde_json::json!({
            "generator": {"allow_price_variation": true, "price_variation_pct": "0.05"},
            "payments": {"overdue_count": 1}
        }),
    )
    .unwrap();

    // Last AU fiscal quarter, as seen from a fixed "today"
    let today = NaiveDate::from_ymd_opt(2024, 11, 12).unwrap();
    let window = calendar::previous_au_quarter(today).unwrap();

    let mut plan = PlanBuilder::new(8, window.start, window.end)
        .vendor(VendorPlan::new("VEND-ACME", 5).lines(1, 2))
        .vendor(VendorPlan::new("VEND-PUMPS", 2))
        .build();
    plan.normalize_counts();
    plan.clamp_to_today(today);
    config.generator.apply_to(&mut plan);

    let seed = 42;
    let run_id = run_id_for(today, seed);
    let invoices = generate_from_plan(&catalog, &plan, &run_id, seed, config.force_no_tax).unwrap();
    validate_invoices_in_scope(&catalog, &invoices, &config.scope()).unwrap();

    let payload = map_invoices(&invoices).unwrap();
    println!("{}", serde_json::to_string_pretty(&payload).unwrap());

    // Pay half the batch
    let mut rng = StdRng::seed_from_u64(seed);
    let references: Vec<String> = invoices.iter().map(|i| i.reference.clone()).collect();
    let to_pay = select_to_pay(
        &references,
        Some(invoices.len() / 2),
        false,
        config.payments.pay_when_unspecified,
        &mut rng,
    );
    println!("{}", ToPayList::new(&run_id, to_pay.clone()).to_json_pretty().unwrap());

    // Stand-in for the ids the backend would hand back
    let posted: Vec<PostedInvoice> = invoices
        .iter()
        .enumerate()
        .map(|(i, inv)| PostedInvoice::from_invoice(inv, format!("bill-{i:03}")))
        .collect();
    let payments = generate_payments(
        &filter_to_pay(&posted, &to_pay),
        &PaymentOptions::from(&config.payments),
        &mut rng,
    );
    let payments_json = serde_json::to_string_pretty(&PaymentBatchPayload::from_records(&payments));
    println!("{}", payments_json.unwrap());

    let report = GenerationReport::new(&run_id, seed, &plan, &invoices, config.force_no_tax)
        .with_payments(PaymentInstructions {
            count: Some(to_pay.len()),
            all: false,
            references: to_pay,
        });
    println!("{}", report.to_json_pretty().unwrap());
}
