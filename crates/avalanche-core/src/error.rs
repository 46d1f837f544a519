use rust_decimal::Decimal;
use thiserror::Error;

/// Pre-simulation input failures. The month loop itself cannot fail once
/// an input has passed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Non-finite or out-of-range value in {field}")]
    NonFiniteInput { field: String },

    #[error(
        "EMI for {loan_name} ({emi}) does not cover first-month interest ({first_month_interest:.2})"
    )]
    EmiBelowInterest {
        loan_id: String,
        loan_name: String,
        emi: Decimal,
        first_month_interest: Decimal,
    },

    #[error("Lumpsum month index {month_index} falls before the first simulated month")]
    InvalidLumpsumMonth { month_index: i64 },

    #[error("Lumpsum amount must be positive, got {amount}")]
    InvalidLumpsumAmount { amount: Decimal },
}

impl ValidationError {
    /// Stable machine-readable tag for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::NonFiniteInput { .. } => "NonFiniteInput",
            ValidationError::EmiBelowInterest { .. } => "EmiBelowInterest",
            ValidationError::InvalidLumpsumMonth { .. } => "InvalidLumpsumMonth",
            ValidationError::InvalidLumpsumAmount { .. } => "InvalidLumpsumAmount",
        }
    }
}

#[derive(Debug, Error)]
pub enum AvalancheError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AvalancheError {
    fn from(e: serde_json::Error) -> Self {
        AvalancheError::SerializationError(e.to_string())
    }
}
