//! Property tests for simulation invariants.
//!
//! 1. Monotonic principal: no loan balance ever grows month over month
//! 2. Monotonic aggregate outstanding
//! 3. Mass balance: principal paid = payment - interest per month
//! 4. Lumpsum one-shot: each lumpsum shows up in exactly its own month
//! 5. Interest floor: loans whose EMI is below first-month interest are rejected

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use avalanche_core::avalanche::{simulate, validate, LoanAccount, LumpsumPayment, SimulationInput};
use avalanche_core::calendar::MonthStamp;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_loan(idx: usize) -> impl Strategy<Value = LoanAccount> {
    (1_000u32..200_000, 0u32..3_600, 0u32..5_000).prop_map(move |(principal, rate_bps, cushion)| {
        let principal = Decimal::from(principal);
        let annual_rate = Decimal::new(rate_bps as i64, 4);
        let interest = principal * annual_rate / dec!(12);
        // always amortising: EMI is first-month interest plus a cushion
        let emi = (interest + Decimal::from(cushion) + dec!(50)).round_dp(0);
        LoanAccount {
            id: format!("L{idx}"),
            name: format!("Loan {idx}"),
            principal,
            annual_rate,
            emi,
        }
    })
}

fn arb_input() -> impl Strategy<Value = SimulationInput> {
    (
        prop::collection::vec(Just(()), 1..5),
        0u32..60_000,
        prop::collection::vec((1i64..30, 1u32..50_000), 0..4),
    )
        .prop_flat_map(|(slots, salary, lumps)| {
            let loans: Vec<_> = (0..slots.len()).map(arb_loan).collect();
            (loans, Just(salary), Just(lumps))
        })
        .prop_map(|(loans, salary, lumps)| SimulationInput {
            salary: Decimal::from(salary),
            extra_income: Decimal::ZERO,
            expenses: Decimal::ZERO,
            months_limit: Some(120),
            loans,
            lumps: lumps
                .into_iter()
                .enumerate()
                .map(|(i, (m, amt))| {
                    LumpsumPayment::new(m, Decimal::from(amt)).with_note(format!("lump {i}"))
                })
                .collect(),
        })
}

fn start() -> MonthStamp {
    MonthStamp::new(2026, 1).unwrap()
}

proptest! {
    #[test]
    fn balances_never_increase(input in arb_input()) {
        let out = simulate(&input, start()).unwrap();
        let mut last: HashMap<String, Decimal> = input
            .loans
            .iter()
            .map(|l| (l.id.clone(), l.principal))
            .collect();
        for row in &out.schedule {
            for e in &row.loans {
                let prev = last[&e.id];
                prop_assert!(e.balance_after <= prev, "{} grew: {} -> {}", e.id, prev, e.balance_after);
                last.insert(e.id.clone(), e.balance_after);
            }
        }
    }

    #[test]
    fn total_outstanding_non_increasing(input in arb_input()) {
        let out = simulate(&input, start()).unwrap();
        for pair in out.schedule.windows(2) {
            prop_assert!(pair[1].total_outstanding <= pair[0].total_outstanding);
        }
    }

    #[test]
    fn mass_balance_per_month(input in arb_input()) {
        let out = simulate(&input, start()).unwrap();
        for row in &out.schedule {
            let principal: Decimal = row.loans.iter().map(|e| e.principal_paid).sum();
            let payment: Decimal = row.loans.iter().map(|e| e.payment).sum();
            let interest: Decimal = row.loans.iter().map(|e| e.interest).sum();
            let tolerance = dec!(0.01) * Decimal::from(row.loans.len());
            prop_assert!((principal - (payment - interest)).abs() <= tolerance);
        }
    }

    #[test]
    fn lumpsums_are_one_shot(input in arb_input()) {
        let out = simulate(&input, start()).unwrap();
        for (i, lump) in input.lumps.iter().enumerate() {
            let note = format!("lump {i}");
            let months: Vec<u32> = out
                .schedule
                .iter()
                .filter(|r| r.lumps_this_month.iter().any(|l| l.note == note))
                .map(|r| r.month)
                .collect();
            if lump.month_index <= out.summary.total_months as i64 {
                prop_assert_eq!(months, vec![lump.month_index as u32]);
            } else {
                prop_assert!(months.is_empty());
            }
        }
    }

    #[test]
    fn emi_below_interest_always_rejected(
        principal in 10_000u32..500_000,
        rate_bps in 100u32..4_000,
        shortfall in 1u32..1_000,
    ) {
        let principal = Decimal::from(principal);
        let annual_rate = Decimal::new(rate_bps as i64, 4);
        let interest = principal * annual_rate / dec!(12);
        let emi = interest - Decimal::from(shortfall) / dec!(100);
        let input = SimulationInput {
            loans: vec![LoanAccount {
                id: "X".into(),
                name: "X".into(),
                principal,
                annual_rate,
                emi,
            }],
            ..Default::default()
        };
        let err = validate(&input).unwrap_err();
        prop_assert_eq!(err.kind(), "EmiBelowInterest");
    }

    #[test]
    fn summary_months_match_schedule(input in arb_input()) {
        let out = simulate(&input, start()).unwrap();
        prop_assert_eq!(out.summary.total_months as usize, out.schedule.len());
        prop_assert!(out.schedule.len() <= 120);
        if !out.summary.months_limit_reached {
            prop_assert_eq!(out.summary.total_outstanding, Decimal::ZERO);
        }
    }
}

#[test]
fn zero_cap_reports_initial_principal() {
    let input = SimulationInput {
        months_limit: Some(0),
        loans: vec![
            LoanAccount {
                id: "A".into(),
                name: "A".into(),
                principal: dec!(1234.56),
                annual_rate: dec!(0.1),
                emi: dec!(100),
            },
            LoanAccount {
                id: "B".into(),
                name: "B".into(),
                principal: dec!(1000),
                annual_rate: dec!(0.2),
                emi: dec!(100),
            },
        ],
        ..Default::default()
    };
    let out = simulate(&input, start()).unwrap();
    assert!(out.schedule.is_empty());
    assert_eq!(out.summary.total_outstanding, dec!(2234.56));
}
