use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use home_loan_core::repayment::{self, Frequency, LoanParameters, RepaymentMethod};

use crate::input;

/// Repayment method as exposed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Constant instalment every month (principal + interest)
    EqualTotal,
    /// Constant principal slice every month; instalments decline
    EqualPrincipal,
}

impl From<MethodArg> for RepaymentMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::EqualTotal => RepaymentMethod::EqualTotalPayment,
            MethodArg::EqualPrincipal => RepaymentMethod::EqualPrincipalPayment,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    Yearly,
}

impl From<FrequencyArg> for Frequency {
    fn from(f: FrequencyArg) -> Self {
        match f {
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Yearly => Frequency::Yearly,
        }
    }
}

/// Loan parameters shared by the payment and schedule commands.
#[derive(Args)]
pub struct LoanArgs {
    /// Loan principal in currency units
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Loan term in whole years
    #[arg(long)]
    pub years: Option<u32>,

    /// Annual interest rate in percent (e.g. 1.5)
    #[arg(long, default_value = "0")]
    pub rate: Decimal,

    /// Amount added to each twice-yearly bonus instalment
    #[arg(long, default_value = "0")]
    pub bonus: Decimal,

    /// Repayment method
    #[arg(long, value_enum, default_value = "equal-total")]
    pub method: MethodArg,

    /// Read core-native LoanParameters JSON from a file instead of flags
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Row granularity of the schedule
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,
}

/// Assemble LoanParameters from a JSON file, piped stdin, or flags.
///
/// JSON inputs are core-native (rate as a decimal fraction); the `--rate`
/// flag follows the calculator convention of percent and is divided by 100
/// here, before anything reaches the core.
fn resolve_params(args: &LoanArgs) -> Result<LoanParameters, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return Ok(input::read_json(path)?);
    }
    if let Some(data) = input::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    let (principal, years) = match (args.principal, args.years) {
        (Some(p), Some(y)) => (p, y),
        _ => {
            return Err(
                "--principal and --years are required unless --input or stdin supplies parameters"
                    .into(),
            )
        }
    };

    Ok(LoanParameters {
        principal,
        term_years: years,
        annual_rate: args.rate / dec!(100),
        bonus_per_installment: args.bonus,
        method: args.method.into(),
    })
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_params(&args.loan)?;
    let result = repayment::solve_payment(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_params(&args.loan)?;
    let result = repayment::generate_schedule(&params, args.frequency.into())?;
    Ok(serde_json::to_value(result)?)
}
