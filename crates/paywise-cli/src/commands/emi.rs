use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use paywise_core::emi::{
    build_schedule, compute_emi_comparison, shifts_with, summarize, what_if, yearly_schedule,
    LoanTerms,
};

use crate::input;

/// Loan terms shared by every EMI subcommand. Terms come from flags, a
/// JSON/YAML file, or piped JSON on stdin.
#[derive(Args)]
pub struct TermsArgs {
    /// Path to a JSON/YAML file with the loan terms
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Nominal annual interest rate in percent (12 = 12% p.a.)
    #[arg(long, default_value = "0")]
    pub rate: Decimal,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<u32>,

    /// Processing fee amount
    #[arg(long, default_value = "0")]
    pub fee: Decimal,

    /// Fee handling: fixed (billed upfront in month 1) or percentage (financed)
    #[arg(long, default_value = "fixed")]
    pub fee_mode: String,

    /// Cashback on full payment
    #[arg(long, default_value = "0")]
    pub cashback_full: Decimal,

    /// Cashback on regular EMI
    #[arg(long, default_value = "0")]
    pub cashback_emi: Decimal,

    /// Cashback on no-cost EMI
    #[arg(long, default_value = "0")]
    pub cashback_nocost: Decimal,
}

impl TermsArgs {
    pub fn resolve(&self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return Ok(input::file::read_input(path)?);
        }
        if self.amount.is_none() && self.tenure.is_none() {
            if let Some(data) = input::stdin::read_stdin()? {
                return Ok(serde_json::from_value(data)?);
            }
        }

        let purchase_amount = self
            .amount
            .ok_or("Provide --amount or --input file or pipe JSON via stdin")?;
        let tenure_months = self
            .tenure
            .ok_or("Provide --tenure or --input file or pipe JSON via stdin")?;

        Ok(LoanTerms {
            purchase_amount,
            annual_rate_percent: self.rate,
            tenure_months,
            processing_fee_base: self.fee,
            fee_mode: self.fee_mode.parse()?,
            cashback_full: self.cashback_full,
            cashback_emi: self.cashback_emi,
            cashback_nocost: self.cashback_nocost,
        })
    }
}

#[derive(Args)]
pub struct EmiArgs {
    #[command(flatten)]
    pub terms: TermsArgs,
}

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Collapse the schedule into per-year rows
    #[arg(long)]
    pub yearly: bool,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub terms: TermsArgs,
}

#[derive(Args)]
pub struct WhatIfArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Interest rate perturbation in percentage points
    #[arg(long, default_value = "0.5")]
    pub rate_bump: Decimal,

    /// Tenure perturbation in months
    #[arg(long, default_value = "1")]
    pub tenure_bump: u32,

    /// Processing fee perturbation
    #[arg(long, default_value = "100")]
    pub fee_bump: Decimal,

    /// EMI cashback perturbation
    #[arg(long, default_value = "500")]
    pub cashback_bump: Decimal,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.terms.resolve()?;
    let output = compute_emi_comparison(&terms)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.terms.resolve()?;
    let (rows, _) = build_schedule(&terms)?;

    if args.yearly {
        Ok(serde_json::to_value(yearly_schedule(&rows))?)
    } else {
        Ok(serde_json::to_value(rows)?)
    }
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.terms.resolve()?;
    let output = compute_emi_comparison(&terms)?;
    Ok(serde_json::to_value(summarize(&output.result))?)
}

pub fn run_what_if(args: WhatIfArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.terms.resolve()?;
    let shifts = shifts_with(
        &terms,
        args.rate_bump,
        args.tenure_bump,
        args.fee_bump,
        args.cashback_bump,
    );
    let rows = what_if(&terms, &shifts)?;
    Ok(serde_json::to_value(rows)?)
}
