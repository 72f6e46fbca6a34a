//! Schedule generator: period-by-period amortisation of a housing loan.
//!
//! Walks the outstanding balance month by month, applying the ordinary
//! instalment and the semi-annual bonus instalment, and emits one row per
//! period or one aggregated row per year. The periodic figures come from
//! the same helpers as the payment solver.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::HomeLoanResult;

use super::{
    equal_principal_per_period, split_equal_total, validate, LoanParameters, RepaymentMethod,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum balance threshold: anything below this is a settled loan.
const BALANCE_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Row granularity of the generated schedule. Controls aggregation only,
/// never the underlying amortisation math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// One row per ordinary period.
    Monthly,
    /// One row per twelve periods, plus a closing row at payoff.
    Yearly,
}

/// A single schedule row: one period, or one year when aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based period number, or year number under yearly aggregation.
    pub index: u32,
    /// Ordinary instalment for the span: principal portion + interest.
    pub payment_total: Money,
    /// Principal repaid by the ordinary instalment(s).
    pub principal_portion: Money,
    /// Interest accrued on the outstanding balance.
    pub interest_portion: Money,
    /// Bonus instalment applied in the span, zero when none fell due.
    pub bonus_portion: Money,
    /// Outstanding balance after the span; exactly zero at payoff.
    pub remaining_balance: Money,
}

/// A complete amortisation schedule with its lifetime totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub rows: Vec<ScheduleRow>,
    /// Number of ordinary periods actually elapsed; less than the full term
    /// when bonus overpayment retires the loan early.
    pub periods_elapsed: u32,
    /// Ordinary instalments plus bonus instalments over the whole schedule.
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_bonus: Money,
}

#[derive(Serialize)]
struct ScheduleAssumptions<'a> {
    #[serde(flatten)]
    params: &'a LoanParameters,
    frequency: Frequency,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the amortisation schedule for the given loan.
pub fn generate_schedule(
    params: &LoanParameters,
    frequency: Frequency,
) -> HomeLoanResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    validate(params)?;

    let (output, warnings) = build_schedule(params, frequency)?;

    let methodology = match frequency {
        Frequency::Monthly => "Period-by-Period Amortisation Schedule (Monthly Rows)",
        Frequency::Yearly => "Period-by-Period Amortisation Schedule (Yearly Aggregation)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &ScheduleAssumptions { params, frequency },
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Amortisation loop
// ---------------------------------------------------------------------------

fn build_schedule(
    params: &LoanParameters,
    frequency: Frequency,
) -> HomeLoanResult<(ScheduleOutput, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();

    let total_periods = params.total_periods();
    let rate = params.periodic_rate();
    let bonus = params.bonus_per_installment;

    // Ordinary-track figure, shared with the payment solver: the level
    // instalment under equal-total, the level principal slice otherwise.
    let level = match params.method {
        RepaymentMethod::EqualTotalPayment => {
            let split = split_equal_total(params);
            if split.clamped {
                warnings.push(
                    "Bonus track covers the entire principal; ordinary instalments carry no principal"
                        .to_string(),
                );
            }
            annuity::payment(split.monthly_principal, rate, total_periods)?
        }
        RepaymentMethod::EqualPrincipalPayment => equal_principal_per_period(params),
    };

    let mut rows: Vec<ScheduleRow> = Vec::new();
    let mut balance = params.principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_bonus = Decimal::ZERO;
    let mut periods_elapsed = 0;

    let mut year_payment = Decimal::ZERO;
    let mut year_principal = Decimal::ZERO;
    let mut year_interest = Decimal::ZERO;
    let mut year_bonus = Decimal::ZERO;

    for period in 1..=total_periods {
        let interest = balance * rate;

        let (mut principal_portion, mut payment_total) = match params.method {
            RepaymentMethod::EqualTotalPayment => (level - interest, level),
            RepaymentMethod::EqualPrincipalPayment => (level, level + interest),
        };
        // The ordinary instalment never draws more principal than remains.
        if principal_portion > balance {
            principal_portion = balance;
            payment_total = principal_portion + interest;
        }

        let mut bonus_portion = Decimal::ZERO;
        if period % 6 == 0 {
            let headroom = balance - principal_portion;
            bonus_portion = if bonus > headroom { headroom } else { bonus };
            if bonus_portion < Decimal::ZERO {
                bonus_portion = Decimal::ZERO;
            }
        }

        // The six-month compounding convention on the bonus track leaves a
        // small residual at term; the final instalment settles it.
        if period == total_periods {
            let residual = balance - principal_portion - bonus_portion;
            if residual > Decimal::ZERO {
                principal_portion += residual;
                payment_total += residual;
            }
        }

        balance -= principal_portion + bonus_portion;
        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }

        total_paid += payment_total + bonus_portion;
        total_interest += interest;
        total_bonus += bonus_portion;
        periods_elapsed = period;

        match frequency {
            Frequency::Monthly => {
                rows.push(ScheduleRow {
                    index: period,
                    payment_total,
                    principal_portion,
                    interest_portion: interest,
                    bonus_portion,
                    remaining_balance: balance,
                });
            }
            Frequency::Yearly => {
                year_payment += payment_total;
                year_principal += principal_portion;
                year_interest += interest;
                year_bonus += bonus_portion;

                if period % 12 == 0 || balance.is_zero() {
                    rows.push(ScheduleRow {
                        index: (period + 11) / 12,
                        payment_total: year_payment,
                        principal_portion: year_principal,
                        interest_portion: year_interest,
                        bonus_portion: year_bonus,
                        remaining_balance: balance,
                    });
                    year_payment = Decimal::ZERO;
                    year_principal = Decimal::ZERO;
                    year_interest = Decimal::ZERO;
                    year_bonus = Decimal::ZERO;
                }
            }
        }

        if balance.is_zero() {
            break;
        }
    }

    Ok((
        ScheduleOutput {
            rows,
            periods_elapsed,
            total_paid,
            total_interest,
            total_bonus,
        },
        warnings,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
