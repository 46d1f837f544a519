use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calendar::MonthStamp;
use crate::error::ValidationError;
use crate::types::{Money, Rate};

/// Horizon used when the caller does not supply a months cap.
pub const DEFAULT_MONTHS_LIMIT: i64 = 600;

/// An interest-bearing installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub principal: Money,
    pub annual_rate: Rate,
    pub emi: Money,
}

impl LoanAccount {
    /// Interest charged on the current principal for one month.
    pub fn monthly_interest(&self) -> Money {
        self.principal * self.annual_rate / Decimal::from(12)
    }
}

/// Recurring monthly cash position. Not floored: a negative base simply
/// leaves nothing for extra payments.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProfile {
    pub salary: Money,
    pub extra_income: Money,
    pub expenses: Money,
}

impl CashFlowProfile {
    pub fn base_monthly_cash(&self) -> Money {
        self.salary + self.extra_income - self.expenses
    }
}

/// A one-time extra payment due in simulation month `month_index` (1-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpsumPayment {
    pub month_index: i64,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LumpsumPayment {
    pub fn new(month_index: i64, amount: Money) -> Self {
        Self {
            month_index,
            amount,
            note: None,
            label: None,
        }
    }

    /// Schedule a lumpsum for calendar month `month` of a run starting at `start`.
    pub fn for_calendar_month(start: MonthStamp, month: MonthStamp, amount: Money) -> Self {
        Self::new(start.index_of(month), amount)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Immutable request for one avalanche simulation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    #[serde(default)]
    pub salary: Money,
    #[serde(default)]
    pub extra_income: Money,
    #[serde(default)]
    pub expenses: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_limit: Option<i64>,
    #[serde(default)]
    pub loans: Vec<LoanAccount>,
    #[serde(default)]
    pub lumps: Vec<LumpsumPayment>,
}

impl SimulationInput {
    pub fn cash_flow(&self) -> CashFlowProfile {
        CashFlowProfile {
            salary: self.salary,
            extra_income: self.extra_income,
            expenses: self.expenses,
        }
    }

    pub fn effective_months_limit(&self) -> i64 {
        self.months_limit.unwrap_or(DEFAULT_MONTHS_LIMIT)
    }

    /// Deep copy of the loans with blank ids and names filled in:
    /// `loan_<n>` for ids, the id for names.
    pub fn normalized_loans(&self) -> Vec<LoanAccount> {
        self.loans
            .iter()
            .enumerate()
            .map(|(i, loan)| {
                let mut loan = loan.clone();
                if loan.id.trim().is_empty() {
                    loan.id = format!("loan_{}", i + 1);
                }
                if loan.name.trim().is_empty() {
                    loan.name = loan.id.clone();
                }
                loan
            })
            .collect()
    }

    pub fn initial_outstanding(&self) -> Money {
        self.loans.iter().map(|l| l.principal).sum()
    }
}

// ---------------------------------------------------------------------------
// Raw floating-point intake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLoanAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub principal: f64,
    pub annual_rate: f64,
    pub emi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLumpsumPayment {
    pub month_index: i64,
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Simulation request as produced by callers holding IEEE doubles
/// (form inputs, JavaScript). Converting it is where non-finite values
/// are caught.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSimulationInput {
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub extra_income: f64,
    #[serde(default)]
    pub expenses: f64,
    #[serde(default)]
    pub months_limit: Option<f64>,
    #[serde(default)]
    pub loans: Vec<RawLoanAccount>,
    #[serde(default)]
    pub lumps: Vec<RawLumpsumPayment>,
}

fn finite(field: impl Into<String>, value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteInput {
            field: field.into(),
        });
    }
    // Shortest round-trip text keeps 0.14 as 0.14 rather than its binary expansion.
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .ok_or_else(|| ValidationError::NonFiniteInput {
            field: field.into(),
        })
}

impl TryFrom<&RawSimulationInput> for SimulationInput {
    type Error = ValidationError;

    fn try_from(raw: &RawSimulationInput) -> Result<Self, Self::Error> {
        let salary = finite("salary", raw.salary)?;
        let extra_income = finite("extraIncome", raw.extra_income)?;
        let expenses = finite("expenses", raw.expenses)?;

        let months_limit = match raw.months_limit {
            None => None,
            Some(v) if !v.is_finite() => {
                return Err(ValidationError::NonFiniteInput {
                    field: "monthsLimit".into(),
                })
            }
            Some(v) => Some(v.trunc() as i64),
        };

        let loans = raw
            .loans
            .iter()
            .enumerate()
            .map(|(i, l)| {
                Ok(LoanAccount {
                    id: l.id.clone(),
                    name: l.name.clone(),
                    principal: finite(format!("loans[{i}].principal"), l.principal)?,
                    annual_rate: finite(format!("loans[{i}].annualRate"), l.annual_rate)?,
                    emi: finite(format!("loans[{i}].emi"), l.emi)?,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let lumps = raw
            .lumps
            .iter()
            .enumerate()
            .map(|(i, lp)| {
                Ok(LumpsumPayment {
                    month_index: lp.month_index,
                    amount: finite(format!("lumps[{i}].amount"), lp.amount)?,
                    note: lp.note.clone(),
                    label: lp.label.clone(),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(SimulationInput {
            salary,
            extra_income,
            expenses,
            months_limit,
            loans,
            lumps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw_loan(principal: f64, annual_rate: f64, emi: f64) -> RawLoanAccount {
        RawLoanAccount {
            id: "L1".into(),
            name: "Personal loan".into(),
            principal,
            annual_rate,
            emi,
        }
    }

    #[test]
    fn test_base_monthly_cash_not_floored() {
        let cf = CashFlowProfile {
            salary: dec!(30000),
            extra_income: dec!(0),
            expenses: dec!(45000),
        };
        assert_eq!(cf.base_monthly_cash(), dec!(-15000));
    }

    #[test]
    fn test_monthly_interest() {
        let loan = LoanAccount {
            id: "L1".into(),
            name: "x".into(),
            principal: dec!(10000),
            annual_rate: dec!(0.12),
            emi: dec!(1000),
        };
        assert_eq!(loan.monthly_interest(), dec!(100));
    }

    #[test]
    fn test_normalized_loans_fill_blank_ids_and_names() {
        let input = SimulationInput {
            loans: vec![
                LoanAccount {
                    id: "".into(),
                    name: "".into(),
                    principal: dec!(1),
                    annual_rate: dec!(0),
                    emi: dec!(1),
                },
                LoanAccount {
                    id: "CAR".into(),
                    name: " ".into(),
                    principal: dec!(1),
                    annual_rate: dec!(0),
                    emi: dec!(1),
                },
            ],
            ..Default::default()
        };
        let loans = input.normalized_loans();
        assert_eq!(loans[0].id, "loan_1");
        assert_eq!(loans[0].name, "loan_1");
        assert_eq!(loans[1].id, "CAR");
        assert_eq!(loans[1].name, "CAR");
        // caller's records untouched
        assert_eq!(input.loans[0].id, "");
    }

    #[test]
    fn test_default_months_limit() {
        let input = SimulationInput::default();
        assert_eq!(input.effective_months_limit(), 600);
        let capped = SimulationInput {
            months_limit: Some(0),
            ..Default::default()
        };
        assert_eq!(capped.effective_months_limit(), 0);
    }

    #[test]
    fn test_lumpsum_for_calendar_month() {
        let start = MonthStamp::new(2026, 10).unwrap();
        let lp = LumpsumPayment::for_calendar_month(
            start,
            MonthStamp::new(2027, 3).unwrap(),
            dec!(5000),
        )
        .with_note("bonus");
        assert_eq!(lp.month_index, 6);
        assert_eq!(lp.note.as_deref(), Some("bonus"));
    }

    #[test]
    fn test_raw_conversion_rejects_nan() {
        let raw = RawSimulationInput {
            salary: 1000.0,
            loans: vec![raw_loan(1000.0, f64::NAN, 100.0)],
            ..Default::default()
        };
        let err = SimulationInput::try_from(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonFiniteInput {
                field: "loans[0].annualRate".into()
            }
        );
    }

    #[test]
    fn test_raw_conversion_rejects_infinite_cap_and_income() {
        let raw = RawSimulationInput {
            months_limit: Some(f64::INFINITY),
            ..Default::default()
        };
        assert_eq!(
            SimulationInput::try_from(&raw).unwrap_err().kind(),
            "NonFiniteInput"
        );

        let raw = RawSimulationInput {
            expenses: f64::NEG_INFINITY,
            ..Default::default()
        };
        assert_eq!(
            SimulationInput::try_from(&raw).unwrap_err(),
            ValidationError::NonFiniteInput {
                field: "expenses".into()
            }
        );
    }

    #[test]
    fn test_raw_conversion_values() {
        let raw = RawSimulationInput {
            salary: 80000.0,
            extra_income: 10000.0,
            expenses: 40000.0,
            months_limit: Some(240.7),
            loans: vec![raw_loan(50000.0, 0.14, 3000.0)],
            lumps: vec![RawLumpsumPayment {
                month_index: 2,
                amount: 2500.5,
                note: Some("bonus".into()),
                label: None,
            }],
        };
        let input = SimulationInput::try_from(&raw).unwrap();
        assert_eq!(input.salary, dec!(80000));
        assert_eq!(input.months_limit, Some(240));
        assert_eq!(input.loans[0].annual_rate, dec!(0.14));
        assert_eq!(input.lumps[0].amount, dec!(2500.5));
    }

    #[test]
    fn test_deserialize_camel_case_payload() {
        let json = r#"{
            "salary": 80000,
            "extraIncome": 10000,
            "expenses": 40000,
            "loans": [{"id": "L1", "name": "Personal loan", "principal": 50000, "emi": 3000, "annualRate": 0.14}],
            "lumps": [{"monthIndex": 3, "amount": "1500", "note": "bonus"}]
        }"#;
        let input: SimulationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.extra_income, dec!(10000));
        assert_eq!(input.months_limit, None);
        assert_eq!(input.loans[0].annual_rate, dec!(0.14));
        assert_eq!(input.lumps[0].month_index, 3);
        assert_eq!(input.lumps[0].amount, dec!(1500));
    }
}
