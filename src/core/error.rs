use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while planning, generating, or validating a batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// The plan is malformed (non-positive count, inverted window, bad line bounds).
    #[error("plan error: {0}")]
    Plan(String),

    /// A plan entry names a vendor the catalog does not contain.
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),

    /// No candidate issue dates exist in the plan window.
    #[error("no days in period {start}..={end}")]
    EmptyDateUniverse { start: NaiveDate, end: NaiveDate },

    /// Catalog referential integrity failure.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A generated batch violated a batch-level invariant.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// Decimal conversion or arithmetic failure.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Runtime configuration could not be interpreted.
    #[error("config error: {0}")]
    Config(String),

    /// JSON rendering or parsing error.
    #[cfg(feature = "report")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV rendering error.
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the offending field (e.g. "invoices[3].lines[1].tax_type").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Batch rule identifier if applicable (e.g. "AP-04").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error tagged with a batch rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

impl From<ValidationError> for SynthError {
    fn from(err: ValidationError) -> Self {
        SynthError::Validation(err)
    }
}
