//! Payment solver: steady repayment figures for a housing loan.
//!
//! Derives the periodic payment under the chosen amortisation method,
//! apportions principal between the ordinary monthly track and the
//! semi-annual bonus track, and totals the cost of the loan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::HomeLoanResult;

use super::{split_equal_total, validate, LoanParameters, RepaymentMethod};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Steady payment figures for a loan.
///
/// The meaning of the periodic fields depends on the method. Under
/// equal-total-payment both are constant instalments; under
/// equal-principal-payment they are the *first* period's instalment, since
/// later instalments decline as the balance falls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Ordinary periodic payment with the bonus track folded in.
    pub primary_periodic_payment: Money,
    /// Ordinary periodic payment if no bonus track existed at all.
    pub standalone_periodic_payment: Money,
    /// Total amount repaid over the life of the loan.
    pub total_paid: Money,
    /// Interest share of the total: `total_paid - principal`.
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Solve the steady payment figures for the given loan.
pub fn solve_payment(
    params: &LoanParameters,
) -> HomeLoanResult<ComputationOutput<PaymentResult>> {
    let start = Instant::now();
    validate(params)?;

    let (result, methodology, warnings) = match params.method {
        RepaymentMethod::EqualTotalPayment => {
            let (out, w) = solve_equal_total(params)?;
            (
                out,
                "Equal-Total-Payment Annuity with Semi-Annual Bonus Track",
                w,
            )
        }
        RepaymentMethod::EqualPrincipalPayment => {
            let (out, w) = solve_equal_principal(params);
            (
                out,
                "Equal-Principal-Payment with Semi-Annual Bonus Track",
                w,
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, params, warnings, elapsed, result))
}

// ---------------------------------------------------------------------------
// Equal-total-payment
// ---------------------------------------------------------------------------

fn solve_equal_total(
    params: &LoanParameters,
) -> HomeLoanResult<(PaymentResult, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();

    let n = params.total_periods();
    let rate = params.periodic_rate();

    let standalone_periodic_payment = annuity::payment(params.principal, rate, n)?;

    let split = split_equal_total(params);
    if split.clamped {
        warnings.push(
            "Bonus track covers the entire principal; ordinary instalments carry no principal"
                .to_string(),
        );
    }

    let primary_periodic_payment = annuity::payment(split.monthly_principal, rate, n)?;

    // At zero rate every instalment is pure principal, so the loan costs
    // exactly its principal regardless of how the tracks are split.
    let total_paid = if params.annual_rate.is_zero() {
        params.principal
    } else {
        primary_periodic_payment * Decimal::from(n)
            + params.bonus_per_installment * Decimal::from(params.bonus_count())
    };
    let total_interest = total_paid - params.principal;

    Ok((
        PaymentResult {
            primary_periodic_payment,
            standalone_periodic_payment,
            total_paid,
            total_interest,
        },
        warnings,
    ))
}

// ---------------------------------------------------------------------------
// Equal-principal-payment
// ---------------------------------------------------------------------------

fn solve_equal_principal(params: &LoanParameters) -> (PaymentResult, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let n = params.total_periods();
    let rate = params.periodic_rate();
    let bonus_rate = params.bonus_period_rate();
    let bonus_count = params.bonus_count();

    // First-period instalment if no bonus track existed.
    let standalone_periodic_payment =
        params.principal / Decimal::from(n) + params.principal * rate;

    let bonus_principal_total =
        params.bonus_per_installment * Decimal::from(bonus_count);
    let monthly_principal_total = params.principal - bonus_principal_total;

    let (primary_periodic_payment, total_interest) =
        if monthly_principal_total < Decimal::ZERO {
            warnings.push(
                "Bonus instalments alone repay the principal; ordinary instalments are zero"
                    .to_string(),
            );
            let interest =
                annuity::linear_decline_interest(params.principal, bonus_rate, bonus_count);
            (Decimal::ZERO, interest)
        } else {
            let principal_per_period = monthly_principal_total / Decimal::from(n);
            let first_period_interest = params.principal * rate;
            let interest = annuity::linear_decline_interest(monthly_principal_total, rate, n)
                + annuity::linear_decline_interest(
                    bonus_principal_total,
                    bonus_rate,
                    bonus_count,
                );
            (principal_per_period + first_period_interest, interest)
        };

    let total_paid = params.principal + total_interest;

    (
        PaymentResult {
            primary_periodic_payment,
            standalone_periodic_payment,
            total_paid,
            total_interest,
        },
        warnings,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_loan() -> LoanParameters {
        LoanParameters {
            principal: dec!(30_000_000),
            term_years: 35,
            annual_rate: dec!(0.01),
            bonus_per_installment: Decimal::ZERO,
            method: RepaymentMethod::EqualTotalPayment,
        }
    }

    // -----------------------------------------------------------------------
    // 1. Equal-total: standalone payment matches the annuity formula
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_total_standalone_payment() {
        let result = solve_payment(&standard_loan()).unwrap().result;
        assert_close(
            result.standalone_periodic_payment,
            dec!(84685.71),
            dec!(0.5),
            "35y 1% standalone payment",
        );
        assert!(result.total_interest > Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 2. Equal-total: total paid = principal + interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_total_cost_identity() {
        let result = solve_payment(&standard_loan()).unwrap().result;
        assert_eq!(
            result.total_paid,
            dec!(30_000_000) + result.total_interest
        );
    }

    // -----------------------------------------------------------------------
    // 3. Equal-total at zero rate: loan costs exactly its principal
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_total_zero_rate() {
        let params = LoanParameters {
            annual_rate: Decimal::ZERO,
            ..standard_loan()
        };
        let result = solve_payment(&params).unwrap().result;
        assert_eq!(
            result.standalone_periodic_payment,
            dec!(30_000_000) / dec!(420)
        );
        assert_eq!(result.total_paid, dec!(30_000_000));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 4. Equal-total with bonus: bonus track lightens the monthly payment
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_total_with_bonus() {
        let params = LoanParameters {
            bonus_per_installment: dec!(100_000),
            ..standard_loan()
        };
        let result = solve_payment(&params).unwrap().result;
        assert_close(
            result.primary_periodic_payment,
            dec!(68047.95),
            dec!(0.5),
            "primary payment with 100k bonus",
        );
        assert!(result.primary_periodic_payment < result.standalone_periodic_payment);
        assert_close(
            result.total_paid,
            dec!(35_580_141.10),
            dec!(1),
            "total paid with 100k bonus",
        );
    }

    // -----------------------------------------------------------------------
    // 5. Equal-total at zero rate with bonus: uncapped split, exact payoff
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_total_zero_rate_with_bonus() {
        let params = LoanParameters {
            annual_rate: Decimal::ZERO,
            bonus_per_installment: dec!(100_000),
            ..standard_loan()
        };
        let result = solve_payment(&params).unwrap().result;
        // 30M - 100k * 70 bonus instalments leaves 23M on the monthly track.
        assert_eq!(
            result.primary_periodic_payment,
            dec!(23_000_000) / dec!(420)
        );
        assert_eq!(result.total_paid, dec!(30_000_000));
    }

    // -----------------------------------------------------------------------
    // 6. Equal-total: oversized bonus is capped, never a negative payment
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_total_bonus_capped() {
        let params = LoanParameters {
            principal: dec!(1_000_000),
            bonus_per_installment: dec!(1_000_000),
            ..standard_loan()
        };
        let output = solve_payment(&params).unwrap();
        assert_eq!(output.result.primary_periodic_payment, Decimal::ZERO);
        assert!(
            !output.warnings.is_empty(),
            "capping the bonus track should warn"
        );
    }

    // -----------------------------------------------------------------------
    // 7. Equal-principal: first-period figures and closed-form interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_principal_no_bonus() {
        let params = LoanParameters {
            principal: dec!(10_000_000),
            term_years: 10,
            annual_rate: dec!(0.02),
            bonus_per_installment: Decimal::ZERO,
            method: RepaymentMethod::EqualPrincipalPayment,
        };
        let result = solve_payment(&params).unwrap().result;
        // First instalment: 10M/120 principal + 10M * 0.02/12 interest.
        assert_close(
            result.standalone_periodic_payment,
            dec!(100_000),
            dec!(0.0000001),
            "first-period instalment",
        );
        assert_close(
            result.primary_periodic_payment,
            result.standalone_periodic_payment,
            dec!(0.0000001),
            "no bonus: primary equals standalone",
        );
        assert_close(
            result.total_interest,
            dec!(1_008_333.33),
            dec!(0.01),
            "arithmetic-series total interest",
        );
    }

    // -----------------------------------------------------------------------
    // 8. Equal-principal: bonus splits interest across the two tracks
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_principal_with_bonus() {
        let params = LoanParameters {
            principal: dec!(10_000_000),
            term_years: 10,
            annual_rate: dec!(0.02),
            bonus_per_installment: dec!(100_000),
            method: RepaymentMethod::EqualPrincipalPayment,
        };
        let result = solve_payment(&params).unwrap().result;

        // Ordinary track: 8M at 0.02/12 over 120; bonus track: 2M at 0.01 over 20.
        let rate = dec!(0.02) / dec!(12);
        let expected = dec!(8_000_000) * rate * dec!(121) / dec!(2)
            + dec!(2_000_000) * dec!(0.01) * dec!(21) / dec!(2);
        assert_close(
            result.total_interest,
            expected,
            dec!(0.0000001),
            "two-track interest",
        );
        assert_eq!(result.total_paid, dec!(10_000_000) + result.total_interest);
    }

    // -----------------------------------------------------------------------
    // 9. Equal-principal: bonus alone repays the loan
    // -----------------------------------------------------------------------
    #[test]
    fn test_equal_principal_bonus_only() {
        let params = LoanParameters {
            principal: dec!(5_000_000),
            term_years: 10,
            annual_rate: dec!(0.015),
            bonus_per_installment: dec!(1_000_000),
            method: RepaymentMethod::EqualPrincipalPayment,
        };
        let output = solve_payment(&params).unwrap();
        let result = &output.result;

        assert_eq!(result.primary_periodic_payment, Decimal::ZERO);
        // 5M * 0.0075 * 21 / 2 on the bonus track alone.
        assert_eq!(result.total_interest, dec!(393_750));
        assert_eq!(result.total_paid, dec!(5_393_750));
        assert!(!output.warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 10. Idempotence: same inputs, same outputs
    // -----------------------------------------------------------------------
    #[test]
    fn test_idempotent() {
        let params = LoanParameters {
            bonus_per_installment: dec!(150_000),
            ..standard_loan()
        };
        let first = solve_payment(&params).unwrap().result;
        let second = solve_payment(&params).unwrap().result;
        assert_eq!(first, second);
    }

    // -----------------------------------------------------------------------
    // 11. Validation failures surface as errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_invalid_input_rejected() {
        let params = LoanParameters {
            term_years: 0,
            ..standard_loan()
        };
        assert!(solve_payment(&params).is_err());

        let params = LoanParameters {
            principal: dec!(-1),
            ..standard_loan()
        };
        assert!(solve_payment(&params).is_err());
    }

    // -----------------------------------------------------------------------
    // 12. Methodology names the selected method
    // -----------------------------------------------------------------------
    #[test]
    fn test_methodology_reflects_method() {
        let output = solve_payment(&standard_loan()).unwrap();
        assert!(output.methodology.contains("Equal-Total-Payment"));

        let params = LoanParameters {
            method: RepaymentMethod::EqualPrincipalPayment,
            ..standard_loan()
        };
        let output = solve_payment(&params).unwrap();
        assert!(output.methodology.contains("Equal-Principal-Payment"));
    }
}
