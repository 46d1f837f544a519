use rust_decimal::Decimal;

use crate::types::{round_money, Money, Rate, EPSILON};

use super::input::LoanAccount;
use super::recorder::LoanLedgerEntry;

/// Engine-owned mutable copy of a loan.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingLoan {
    pub id: String,
    pub name: String,
    pub principal: Money,
    pub annual_rate: Rate,
    pub emi: Money,
}

impl WorkingLoan {
    pub fn is_paid_off(&self) -> bool {
        self.principal <= EPSILON
    }
}

impl From<LoanAccount> for WorkingLoan {
    fn from(loan: LoanAccount) -> Self {
        Self {
            id: loan.id,
            name: loan.name,
            principal: loan.principal,
            annual_rate: loan.annual_rate,
            emi: loan.emi,
        }
    }
}

/// Result of distributing one month's payments.
#[derive(Debug, Clone)]
pub struct MonthAllocation {
    pub entries: Vec<LoanLedgerEntry>,
    /// Unrounded interest charged across all loans.
    pub interest: Money,
    /// Unrounded cash paid across all loans.
    pub paid: Money,
    /// Pool left over after every loan was visited.
    pub unspent_pool: Money,
}

/// Pay every loan its EMI and cascade `pool` down the list.
///
/// `loans` must already be ordered highest rate first. The first loan gets
/// the whole pool; whatever it does not need to reach zero flows on to the
/// next loan in the same month.
pub fn allocate(loans: &mut [WorkingLoan], pool: Money) -> MonthAllocation {
    let mut pool = pool.max(Decimal::ZERO);
    let mut entries = Vec::with_capacity(loans.len());
    let mut month_interest = Decimal::ZERO;
    let mut month_paid = Decimal::ZERO;

    for loan in loans.iter_mut() {
        let interest = loan.principal * loan.annual_rate / Decimal::from(12);

        let mut payment = loan.emi;
        let mut extra_paid = Decimal::ZERO;
        if pool > Decimal::ZERO {
            extra_paid = pool;
            payment += extra_paid;
        }

        let payoff_amount = loan.principal + interest;
        if payment >= payoff_amount - EPSILON {
            payment = payoff_amount;
            let used_extra = (payoff_amount - loan.emi).max(Decimal::ZERO);
            pool = (pool - used_extra).max(Decimal::ZERO);
            extra_paid = used_extra;
        } else {
            extra_paid = extra_paid.min(pool);
            pool = Decimal::ZERO;
        }

        let principal_paid = payment - interest;
        loan.principal = (loan.principal - principal_paid).max(Decimal::ZERO);

        entries.push(LoanLedgerEntry {
            id: loan.id.clone(),
            name: loan.name.clone(),
            rate: loan.annual_rate,
            interest: round_money(interest),
            emi: round_money(loan.emi),
            extra_paid: round_money(extra_paid),
            payment: round_money(payment),
            principal_paid: round_money(principal_paid),
            balance_after: round_money(loan.principal),
        });

        month_interest += interest;
        month_paid += payment;
    }

    MonthAllocation {
        entries,
        interest: month_interest,
        paid: month_paid,
        unspent_pool: pool,
    }
}
