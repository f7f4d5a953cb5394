//! Loan amortization schedules: level-payment (EMI) computation and the
//! month-by-month principal/interest ledger.
//!
//! Given a principal, an annual rate in percent and a term in months, builds
//! the ordered schedule of interest paid, principal paid and remaining
//! balance. The EMI is rounded to two decimal places once and held fixed for
//! every row; row amounts are displayed at whole-unit precision while the
//! running balance keeps two decimal places. All math in
//! `rust_decimal::Decimal`.

use log::trace;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EmiError;
use crate::types::*;
use crate::EmiResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Residual balance (absolute, whole units) above which a warning is attached
const RESIDUAL_WARNING_THRESHOLD: Decimal = dec!(1);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Loan terms for a schedule computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed
    pub principal: Money,
    /// Annual nominal rate in percent (12 = 12% p.a.)
    pub annual_rate_pct: Decimal,
    /// Term in months
    pub term_months: u32,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single month of the amortization schedule.
///
/// Money fields carry display precision: rounded to the nearest whole unit,
/// with the ending balance floored at zero. The precise two-decimal balance
/// lives only in the running computation and in
/// [`AmortizationSchedule::final_balance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub starting_balance: Money,
    pub emi: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub ending_balance: Money,
}

/// Full amortization schedule for a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub rows: Vec<ScheduleRow>,
    /// Level payment at two decimal places, identical across rows
    pub emi: Money,
    /// Sum of the displayed interest values
    pub total_interest_paid: Money,
    /// Sum of the displayed principal values
    pub total_principal_paid: Money,
    /// Precise balance after the final month, before the zero floor
    pub final_balance: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check loan terms against the constraints required for a schedule.
/// A rate of exactly zero is rejected, not treated as flat amortization.
pub fn validate(input: &LoanInput) -> EmiResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.annual_rate_pct <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Annual rate must be positive".into(),
        });
    }
    if input.term_months == 0 {
        return Err(EmiError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Payment math
// ---------------------------------------------------------------------------

/// Monthly rate as a decimal fraction: 12 (% p.a.) becomes 0.01
pub fn monthly_rate(annual_rate_pct: Decimal) -> Rate {
    annual_rate_pct / MONTHS_PER_YEAR / PERCENT
}

/// (1 + rate)^n via iterative multiplication (avoids Decimal::powd drift).
/// Checked so extreme rates surface as an error instead of a panic.
fn compound(rate: Rate, n: u32) -> EmiResult<Decimal> {
    let mut acc = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        acc = acc.checked_mul(factor).ok_or_else(|| EmiError::NumericOverflow {
            context: "compound growth factor".into(),
        })?;
    }
    Ok(acc)
}

/// Round to two decimal places, ties away from zero
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the nearest whole unit for display, ties away from zero
fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Level monthly payment by the annuity formula, rounded to two decimals.
///
/// The denominator `(1+r)^n - 1` is zero only when the rate is zero, which
/// `validate` rejects; the guard returns an error instead of panicking.
pub fn level_payment(principal: Money, monthly_rate: Rate, term_months: u32) -> EmiResult<Money> {
    let factor = compound(monthly_rate, term_months)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(EmiError::DivisionByZero {
            context: "EMI annuity factor".into(),
        });
    }
    let numerator = principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| EmiError::NumericOverflow {
            context: "EMI numerator".into(),
        })?;
    Ok(round2(numerator / denominator))
}

// ---------------------------------------------------------------------------
// Schedule construction
// ---------------------------------------------------------------------------

/// Build the month-by-month amortization schedule for a loan.
///
/// The EMI is computed once and held fixed. Each month's interest, principal
/// and ending balance are carried at two decimal places; row values are
/// rounded to whole units for display, with the ending balance clamped to
/// zero when the precise value has gone negative. The balance that feeds the
/// next month is always the precise unfloored value.
pub fn build_schedule(input: &LoanInput) -> EmiResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let rate = monthly_rate(input.annual_rate_pct);
    let emi = level_payment(input.principal, rate, input.term_months)?;

    let mut rows = Vec::with_capacity(input.term_months as usize);
    let mut outstanding = input.principal;
    let mut total_interest_paid = Decimal::ZERO;
    let mut total_principal_paid = Decimal::ZERO;

    for month in 1..=input.term_months {
        let interest = round2(outstanding * rate);
        let principal_paid = round2(emi - interest);
        let ending = round2(outstanding - principal_paid);

        trace!("month {month}: interest {interest}, principal {principal_paid}, ending {ending}");

        let row = ScheduleRow {
            month,
            starting_balance: round_display(outstanding),
            emi: round_display(emi),
            interest_paid: round_display(interest),
            principal_paid: round_display(principal_paid),
            ending_balance: if ending < Decimal::ZERO {
                Decimal::ZERO
            } else {
                round_display(ending)
            },
        };
        total_interest_paid += row.interest_paid;
        total_principal_paid += row.principal_paid;
        rows.push(row);

        // Continuation uses the precise balance, not the displayed one;
        // the zero floor applies to display only.
        outstanding = ending;
    }

    if outstanding.abs() > RESIDUAL_WARNING_THRESHOLD {
        warnings.push(format!(
            "Residual balance of {outstanding} after the final payment; EMI rounding does not close the loan exactly"
        ));
    }

    let output = AmortizationSchedule {
        rows,
        emi,
        total_interest_paid,
        total_principal_paid,
        final_balance: outstanding,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment (EMI) Amortization",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "term_months": input.term_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn year_loan() -> LoanInput {
        LoanInput {
            principal: dec!(100000),
            annual_rate_pct: dec!(12),
            term_months: 12,
        }
    }

    fn run_schedule(input: &LoanInput) -> AmortizationSchedule {
        build_schedule(input).unwrap().result
    }

    // -----------------------------------------------------------------------
    // 1. Rate conversion
    // -----------------------------------------------------------------------
    #[test]
    fn test_monthly_rate_conversion() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(dec!(7.5)), dec!(0.00625));
    }

    // -----------------------------------------------------------------------
    // 2. EMI annuity value
    // -----------------------------------------------------------------------
    #[test]
    fn test_level_payment_year_loan() {
        let emi = level_payment(dec!(100000), dec!(0.01), 12).unwrap();
        assert_eq!(emi, dec!(8884.88));
    }

    #[test]
    fn test_level_payment_zero_rate_guard() {
        let err = level_payment(dec!(100000), Decimal::ZERO, 12).unwrap_err();
        assert!(matches!(err, EmiError::DivisionByZero { .. }));
    }

    #[test]
    fn test_extreme_rate_overflows_to_error() {
        let input = LoanInput {
            principal: dec!(100000),
            annual_rate_pct: dec!(10000000),
            term_months: 600,
        };
        let err = build_schedule(&input).unwrap_err();
        assert!(matches!(err, EmiError::NumericOverflow { .. }));
    }

    // -----------------------------------------------------------------------
    // 3. Worked example: 100000 at 12% over 12 months
    // -----------------------------------------------------------------------
    #[test]
    fn test_year_loan_first_row() {
        let sched = run_schedule(&year_loan());
        assert_eq!(
            sched.rows[0],
            ScheduleRow {
                month: 1,
                starting_balance: dec!(100000),
                emi: dec!(8885),
                interest_paid: dec!(1000),
                principal_paid: dec!(7885),
                ending_balance: dec!(92115),
            }
        );
    }

    #[test]
    fn test_year_loan_last_row() {
        let sched = run_schedule(&year_loan());
        assert_eq!(
            sched.rows[11],
            ScheduleRow {
                month: 12,
                starting_balance: dec!(8797),
                emi: dec!(8885),
                interest_paid: dec!(88),
                principal_paid: dec!(8797),
                ending_balance: dec!(0),
            }
        );
    }

    #[test]
    fn test_year_loan_totals() {
        let sched = run_schedule(&year_loan());
        assert_eq!(sched.emi, dec!(8884.88));
        assert_eq!(sched.total_interest_paid, dec!(6619));
        assert_eq!(sched.total_principal_paid, dec!(100001));
    }

    // -----------------------------------------------------------------------
    // 4. Two-tier rounding: display floors at zero, continuation does not
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_floor_is_display_only() {
        let sched = run_schedule(&year_loan());
        assert_eq!(sched.rows[11].ending_balance, Decimal::ZERO);
        assert_eq!(sched.final_balance, dec!(-0.03));
    }

    #[test]
    fn test_continuation_balance_feeds_next_row() {
        // Month 10 ends at 17506.69 precise; month 11 starts from it and
        // displays the rounded 17507.
        let sched = run_schedule(&year_loan());
        assert_eq!(sched.rows[9].ending_balance, dec!(17507));
        assert_eq!(sched.rows[10].starting_balance, dec!(17507));
        assert_eq!(sched.rows[10].interest_paid, dec!(175));
    }

    // -----------------------------------------------------------------------
    // 5. Structural properties
    // -----------------------------------------------------------------------
    #[test]
    fn test_row_count_and_month_sequence() {
        let input = LoanInput {
            principal: dec!(250000),
            annual_rate_pct: dec!(9),
            term_months: 360,
        };
        let sched = run_schedule(&input);
        assert_eq!(sched.rows.len(), 360);
        for (i, row) in sched.rows.iter().enumerate() {
            assert_eq!(row.month, i as u32 + 1);
        }
    }

    #[test]
    fn test_emi_constant_across_rows() {
        let sched = run_schedule(&year_loan());
        let first = sched.rows[0].emi;
        assert!(sched.rows.iter().all(|row| row.emi == first));
    }

    #[test]
    fn test_ending_balance_never_negative() {
        let inputs = [
            year_loan(),
            LoanInput {
                principal: dec!(250000),
                annual_rate_pct: dec!(9),
                term_months: 360,
            },
            LoanInput {
                principal: dec!(5000),
                annual_rate_pct: dec!(18),
                term_months: 7,
            },
        ];
        for input in &inputs {
            let sched = run_schedule(input);
            for row in &sched.rows {
                assert!(
                    row.ending_balance >= Decimal::ZERO,
                    "month {} ended at {}",
                    row.month,
                    row.ending_balance
                );
            }
        }
    }

    #[test]
    fn test_principal_sum_within_tolerance() {
        let inputs = [
            year_loan(),
            LoanInput {
                principal: dec!(250000),
                annual_rate_pct: dec!(9),
                term_months: 360,
            },
        ];
        for input in &inputs {
            let sched = run_schedule(input);
            let tolerance = Decimal::from(input.term_months) * dec!(0.5);
            let diff = (sched.total_principal_paid - input.principal).abs();
            assert!(
                diff <= tolerance,
                "principal sum off by {diff}, tolerance {tolerance}"
            );
        }
    }

    #[test]
    fn test_idempotent_for_identical_input() {
        let first = run_schedule(&year_loan());
        let second = run_schedule(&year_loan());
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.final_balance, second.final_balance);
    }

    // -----------------------------------------------------------------------
    // 6. Single-month loan closes exactly
    // -----------------------------------------------------------------------
    #[test]
    fn test_single_month_loan() {
        let input = LoanInput {
            principal: dec!(1000),
            annual_rate_pct: dec!(12),
            term_months: 1,
        };
        let sched = run_schedule(&input);
        assert_eq!(
            sched.rows[0],
            ScheduleRow {
                month: 1,
                starting_balance: dec!(1000),
                emi: dec!(1010),
                interest_paid: dec!(10),
                principal_paid: dec!(1000),
                ending_balance: dec!(0),
            }
        );
        assert_eq!(sched.final_balance, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 7. Validation rejections
    // -----------------------------------------------------------------------
    fn assert_rejected(input: LoanInput, expected_field: &str) {
        match validate(&input) {
            Err(EmiError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidInput for {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_zero_principal() {
        let mut input = year_loan();
        input.principal = Decimal::ZERO;
        assert_rejected(input, "principal");
    }

    #[test]
    fn test_validate_rejects_negative_principal() {
        let mut input = year_loan();
        input.principal = dec!(-100);
        assert_rejected(input, "principal");
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let mut input = year_loan();
        input.annual_rate_pct = Decimal::ZERO;
        assert_rejected(input, "annual_rate_pct");
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let mut input = year_loan();
        input.annual_rate_pct = dec!(-5);
        assert_rejected(input, "annual_rate_pct");
    }

    #[test]
    fn test_validate_rejects_zero_term() {
        let mut input = year_loan();
        input.term_months = 0;
        assert_rejected(input, "term_months");
    }

    #[test]
    fn test_build_schedule_short_circuits_on_invalid_input() {
        let mut input = year_loan();
        input.principal = dec!(-1);
        assert!(build_schedule(&input).is_err());
    }

    // -----------------------------------------------------------------------
    // 8. Envelope
    // -----------------------------------------------------------------------
    #[test]
    fn test_envelope_methodology_and_warnings() {
        let output = build_schedule(&year_loan()).unwrap();
        assert_eq!(output.methodology, "Level-Payment (EMI) Amortization");
        // Residual of -0.03 stays under the warning threshold
        assert!(output.warnings.is_empty());
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_residual_balance_warning_on_long_loan() {
        // 250000 at 9% over 360 months overpays by 6.40 in total
        let input = LoanInput {
            principal: dec!(250000),
            annual_rate_pct: dec!(9),
            term_months: 360,
        };
        let output = build_schedule(&input).unwrap();
        assert_eq!(output.result.emi, dec!(2011.56));
        assert_eq!(output.result.final_balance, dec!(-6.40));
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("Residual balance of -6.40"));
    }
}
