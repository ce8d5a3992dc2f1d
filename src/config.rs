//! Runtime configuration.
//!
//! Every section deserializes with defaults for missing keys, so a partial
//! JSON document is a valid configuration.
//!
//! ```
//! use apsynth::config::RuntimeConfig;
//! use apsynth::InvoiceStatus;
//!
//! let config = RuntimeConfig::default();
//! assert_eq!(config.generator.currency, "AUD");
//! assert_eq!(config.generator.status, InvoiceStatus::Authorised);
//! assert_eq!(config.payments.account_code, "101");
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_CURRENCY, InvoiceStatus, Plan, Scope};
#[cfg(feature = "report")]
use crate::core::SynthError;

/// Bank account payments are drawn from when none is configured.
pub const DEFAULT_PAYMENT_ACCOUNT: &str = "101";

/// Generator defaults applied to plans that leave an option unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub allow_price_variation: bool,
    /// Fractional variance (0.10 = ±10%).
    pub price_variation_pct: Decimal,
    pub currency: String,
    pub status: InvoiceStatus,
    pub business_days_only: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            allow_price_variation: false,
            price_variation_pct: dec!(0.10),
            currency: DEFAULT_CURRENCY.into(),
            status: InvoiceStatus::Authorised,
            business_days_only: true,
        }
    }
}

impl GeneratorConfig {
    /// Fill every plan option that is still `None`; explicit plan values win.
    pub fn apply_to(&self, plan: &mut Plan) {
        plan.allow_price_variation
            .get_or_insert(self.allow_price_variation);
        plan.price_variation_pct
            .get_or_insert(self.price_variation_pct);
        plan.business_days_only
            .get_or_insert(self.business_days_only);
        plan.currency.get_or_insert_with(|| self.currency.clone());
        plan.status.get_or_insert(self.status);
    }
}

/// Payment posting policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Bank account code payments are made from.
    pub account_code: String,
    pub pay_on_due_date: bool,
    /// Treat every paid bill as overdue.
    pub allow_overdue: bool,
    /// With no pay directive, pay a random non-empty subset instead of nothing.
    pub pay_when_unspecified: bool,
    /// Number of paid bills to settle after their due date.
    pub overdue_count: Option<usize>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            account_code: DEFAULT_PAYMENT_ACCOUNT.into(),
            pay_on_due_date: false,
            allow_overdue: false,
            pay_when_unspecified: false,
            overdue_count: None,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub generator: GeneratorConfig,
    pub payments: PaymentConfig,
    /// Replace every line's tax code with the exempt code.
    pub force_no_tax: bool,
}

impl RuntimeConfig {
    /// Currency and status the validator enforces.
    pub fn scope(&self) -> Scope {
        Scope {
            currency: self.generator.currency.clone(),
            status: self.generator.status,
        }
    }

    /// Parse a JSON document; missing keys take their defaults.
    #[cfg(feature = "report")]
    pub fn from_json(json: &str) -> Result<Self, SynthError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Deep-merge `overrides` onto `defaults` and parse the result.
    ///
    /// Objects merge key by key; any other override value replaces the
    /// default outright.
    #[cfg(feature = "report")]
    pub fn merged(
        defaults: &serde_json::Value,
        overrides: &serde_json::Value,
    ) -> Result<Self, SynthError> {
        let mut doc = defaults.clone();
        deep_merge(&mut doc, overrides);
        if !doc.is_object() {
            return Err(SynthError::Config(
                "merged configuration is not a JSON object".into(),
            ));
        }
        Ok(serde_json::from_value(doc)?)
    }
}

/// Recursively merge `overlay` into `base`.
#[cfg(feature = "report")]
pub fn deep_merge(base: &mut serde_json::Value, overlay: &serde_json::Value) {
    use serde_json::Value;

    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Builder for [`RuntimeConfig`].
///
/// # Example
///
/// ```
/// use apsynth::config::RuntimeConfigBuilder;
/// use rust_decimal_macros::dec;
///
/// let config = RuntimeConfigBuilder::new()
///     .price_variation(dec!(0.05))
///     .force_no_tax(true)
///     .overdue_count(2)
///     .build();
///
/// assert!(config.generator.allow_price_variation);
/// assert_eq!(config.payments.overdue_count, Some(2));
/// ```
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    config: RuntimeConfig,
}

impl RuntimeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable price variation with the given fraction.
    pub fn price_variation(mut self, pct: Decimal) -> Self {
        self.config.generator.allow_price_variation = true;
        self.config.generator.price_variation_pct = pct;
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.config.generator.currency = code.into();
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.config.generator.status = status;
        self
    }

    pub fn business_days_only(mut self, on: bool) -> Self {
        self.config.generator.business_days_only = on;
        self
    }

    pub fn force_no_tax(mut self, on: bool) -> Self {
        self.config.force_no_tax = on;
        self
    }

    /// Set the bank account payments are drawn from.
    pub fn payment_account(mut self, code: impl Into<String>) -> Self {
        self.config.payments.account_code = code.into();
        self
    }

    pub fn pay_on_due_date(mut self, on: bool) -> Self {
        self.config.payments.pay_on_due_date = on;
        self
    }

    pub fn allow_overdue(mut self, on: bool) -> Self {
        self.config.payments.allow_overdue = on;
        self
    }

    pub fn pay_when_unspecified(mut self, on: bool) -> Self {
        self.config.payments.pay_when_unspecified = on;
        self
    }

    pub fn overdue_count(mut self, count: usize) -> Self {
        self.config.payments.overdue_count = Some(count);
        self
    }

    pub fn build(self) -> RuntimeConfig {
        self.config
    }
}
