//! Shared annuity arithmetic for the repayment engine.
//!
//! Both the payment solver and the schedule generator derive their periodic
//! figures from these helpers, so the two can never disagree on the same
//! inputs. All math in `rust_decimal::Decimal`; exponents are whole period
//! counts, computed by iterative multiplication.

use rust_decimal::Decimal;

use crate::error::HomeLoanError;
use crate::types::{Money, Rate};
use crate::HomeLoanResult;

/// Level (annuity) payment that amortises `principal` over `periods`
/// at `rate` per period: `P * r * (1+r)^n / ((1+r)^n - 1)`.
///
/// At zero rate this degenerates to straight division.
pub fn payment(principal: Money, rate: Rate, periods: u32) -> HomeLoanResult<Money> {
    if periods == 0 {
        return Err(HomeLoanError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = pow_int(Decimal::ONE + rate, periods);
    Ok(principal * rate * factor / (factor - Decimal::ONE))
}

/// Present value of a level instalment stream:
/// `B * ((1+r)^n - 1) / (r * (1+r)^n)`.
///
/// At zero rate the stream is worth its undiscounted sum.
pub fn present_value(instalment: Money, rate: Rate, periods: u32) -> Money {
    if periods == 0 {
        return Decimal::ZERO;
    }

    if rate.is_zero() {
        return instalment * Decimal::from(periods);
    }

    let factor = pow_int(Decimal::ONE + rate, periods);
    instalment * (factor - Decimal::ONE) / (rate * factor)
}

/// Total interest on a balance repaid in equal principal slices, so that it
/// declines linearly to zero: `P * r * (n+1) / 2`.
///
/// Exact for equal-principal amortisation, not an approximation.
pub fn linear_decline_interest(principal: Money, rate: Rate, periods: u32) -> Money {
    if periods == 0 {
        return Decimal::ZERO;
    }
    principal * rate * Decimal::from(periods + 1) / Decimal::TWO
}

/// Compute base^n for a whole-number exponent via iterative multiplication.
fn pow_int(base: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= base;
    }
    result
}
