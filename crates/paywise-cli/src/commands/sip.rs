use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use paywise_core::sip::{project_growth, rollup_yearly, SipInput};

use crate::input;

#[derive(Args)]
pub struct SipArgs {
    /// Path to a JSON/YAML file with the projection inputs
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly contribution
    #[arg(long)]
    pub monthly_sip: Option<Decimal>,

    /// Annual step-up of the contribution in percent (applied at each 12-month boundary)
    #[arg(long, default_value = "0")]
    pub stepup: Decimal,

    /// Expected annual return in percent
    #[arg(long, default_value = "12")]
    pub annual_return: Decimal,

    /// Assumed annual inflation in percent
    #[arg(long, default_value = "0")]
    pub inflation: Decimal,

    /// Projection horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Calendar year of the first contribution (labelling only)
    #[arg(long, default_value = "2025")]
    pub start_year: i32,

    /// Report year-end snapshots instead of monthly rows
    #[arg(long)]
    pub yearly: bool,
}

impl SipArgs {
    fn resolve(&self) -> Result<SipInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return Ok(input::file::read_input(path)?);
        }
        if self.monthly_sip.is_none() && self.years.is_none() {
            if let Some(data) = input::stdin::read_stdin()? {
                return Ok(serde_json::from_value(data)?);
            }
        }

        let monthly_sip = self
            .monthly_sip
            .ok_or("Provide --monthly-sip or --input file or pipe JSON via stdin")?;
        let years = self
            .years
            .ok_or("Provide --years or --input file or pipe JSON via stdin")?;

        Ok(SipInput {
            monthly_sip,
            annual_stepup_percent: self.stepup,
            annual_return_percent: self.annual_return,
            annual_inflation_percent: self.inflation,
            years,
            start_year: self.start_year,
        })
    }
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.resolve()?;
    let rows = project_growth(&input)?;

    if args.yearly {
        Ok(serde_json::to_value(rollup_yearly(&rows))?)
    } else {
        Ok(serde_json::to_value(rows)?)
    }
}
