//! Fixed-rate housing-loan repayment with an optional semi-annual bonus track.
//!
//! The loan is amortised over `term_years * 12` ordinary monthly periods,
//! with a bonus instalment added on every sixth period. Two methods are
//! supported: equal-total-payment (level instalment, 元利均等返済) and
//! equal-principal-payment (level principal slice, 元金均等返済).
//!
//! [`payment::solve_payment`] derives the steady payment figures;
//! [`schedule::generate_schedule`] walks the loan period by period. Both
//! draw their periodic figures from the same helpers in this module and in
//! [`crate::annuity`], so the solver and the schedule cannot drift apart.

pub mod payment;
pub mod schedule;

pub use payment::{solve_payment, PaymentResult};
pub use schedule::{generate_schedule, Frequency, ScheduleOutput, ScheduleRow};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::annuity;
use crate::error::HomeLoanError;
use crate::types::{Money, Rate};
use crate::HomeLoanResult;

/// Amortisation method for the ordinary monthly track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentMethod {
    /// Constant instalment (principal + interest) every ordinary period;
    /// the interest portion declines and the principal portion grows.
    EqualTotalPayment,
    /// Constant principal slice every ordinary period; the interest portion
    /// declines linearly, so the total instalment falls over time.
    EqualPrincipalPayment,
}

/// Input parameters for a repayment calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Total borrowed amount in currency units.
    pub principal: Money,
    /// Loan term in whole years.
    pub term_years: u32,
    /// Annual interest rate as a decimal (e.g. 0.015 = 1.5%).
    pub annual_rate: Rate,
    /// Extra amount added to each of the twice-yearly bonus instalments.
    pub bonus_per_installment: Money,
    /// Amortisation method for the ordinary monthly track.
    pub method: RepaymentMethod,
}

impl LoanParameters {
    /// Number of ordinary monthly periods.
    pub fn total_periods(&self) -> u32 {
        self.term_years * 12
    }

    /// Number of bonus instalments (two per year).
    pub fn bonus_count(&self) -> u32 {
        self.term_years * 2
    }

    /// Interest rate per ordinary period.
    pub fn periodic_rate(&self) -> Rate {
        self.annual_rate / Decimal::from(12)
    }

    /// Six-month rate used to annuitise the bonus track.
    pub fn bonus_period_rate(&self) -> Rate {
        self.periodic_rate() * Decimal::from(6)
    }
}

pub(crate) fn validate(params: &LoanParameters) -> HomeLoanResult<()> {
    if params.principal <= Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if params.term_years == 0 {
        return Err(HomeLoanError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least one year".into(),
        });
    }
    if params.annual_rate < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if params.bonus_per_installment < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "bonus_per_installment".into(),
            reason: "Bonus instalment cannot be negative".into(),
        });
    }
    Ok(())
}

/// Principal apportioned between the ordinary monthly track and the bonus
/// track under equal-total-payment.
pub(crate) struct PrincipalSplit {
    /// Principal amortised by the ordinary monthly instalments.
    pub monthly_principal: Money,
    /// Principal amortised by the bonus instalments, capped at the total.
    pub bonus_principal: Money,
    /// True when the raw bonus-stream value exceeded the principal.
    pub clamped: bool,
}

/// Apportion the principal for equal-total-payment: the bonus track takes
/// the present value of the bonus stream annuitised at the six-month rate,
/// never more than the whole principal.
pub(crate) fn split_equal_total(params: &LoanParameters) -> PrincipalSplit {
    let raw = if params.annual_rate.is_zero() {
        params.bonus_per_installment * Decimal::from(params.bonus_count())
    } else {
        annuity::present_value(
            params.bonus_per_installment,
            params.bonus_period_rate(),
            params.bonus_count(),
        )
    };

    let clamped = raw > params.principal;
    let bonus_principal = if clamped { params.principal } else { raw };

    PrincipalSplit {
        monthly_principal: params.principal - bonus_principal,
        bonus_principal,
        clamped,
    }
}

/// Principal slice per ordinary period under equal-principal-payment.
/// Floored at zero when the bonus instalments alone cover the principal.
pub(crate) fn equal_principal_per_period(params: &LoanParameters) -> Money {
    let bonus_total = params.bonus_per_installment * Decimal::from(params.bonus_count());
    let monthly_total = params.principal - bonus_total;
    if monthly_total < Decimal::ZERO {
        return Decimal::ZERO;
    }
    monthly_total / Decimal::from(params.total_periods())
}
