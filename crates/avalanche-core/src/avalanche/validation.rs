use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{round_money, EPSILON, MAX_MONEY, MAX_RATE};

use super::input::{RawSimulationInput, SimulationInput};

/// Reject values too large to carry through the month loop. Reported as
/// `NonFiniteInput`: such a value has no usable finite representation.
fn bounded(field: impl Into<String>, value: Decimal, limit: Decimal) -> Result<(), ValidationError> {
    if value.abs() > limit {
        return Err(ValidationError::NonFiniteInput {
            field: field.into(),
        });
    }
    Ok(())
}

/// Check a simulation request for arithmetic sanity.
///
/// Cash-flow magnitudes are checked first, then loans, then lumpsums; the
/// first violation wins. Nothing is mutated; a failure means no simulation
/// is run at all.
pub fn validate(input: &SimulationInput) -> Result<(), ValidationError> {
    bounded("salary", input.salary, MAX_MONEY)?;
    bounded("extraIncome", input.extra_income, MAX_MONEY)?;
    bounded("expenses", input.expenses, MAX_MONEY)?;

    for (i, loan) in input.normalized_loans().into_iter().enumerate() {
        bounded(format!("loans[{i}].principal"), loan.principal, MAX_MONEY)?;
        bounded(format!("loans[{i}].annualRate"), loan.annual_rate, MAX_RATE)?;
        bounded(format!("loans[{i}].emi"), loan.emi, MAX_MONEY)?;

        let first_interest = loan.monthly_interest();
        if loan.emi <= first_interest - EPSILON {
            return Err(ValidationError::EmiBelowInterest {
                loan_id: loan.id,
                loan_name: loan.name,
                emi: loan.emi,
                first_month_interest: round_money(first_interest),
            });
        }
    }

    for (i, lump) in input.lumps.iter().enumerate() {
        if lump.month_index < 1 {
            return Err(ValidationError::InvalidLumpsumMonth {
                month_index: lump.month_index,
            });
        }
        if lump.amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidLumpsumAmount {
                amount: lump.amount,
            });
        }
        bounded(format!("lumps[{i}].amount"), lump.amount, MAX_MONEY)?;
    }

    Ok(())
}

/// Convert a floating-point request, rejecting NaN/±Infinity, then
/// run [`validate`] on the result.
pub fn validate_raw(raw: &RawSimulationInput) -> Result<SimulationInput, ValidationError> {
    let input = SimulationInput::try_from(raw)?;
    validate(&input)?;
    Ok(input)
}
