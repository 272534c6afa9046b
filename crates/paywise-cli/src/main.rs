mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::emi::{EmiArgs, ScheduleArgs, SummaryArgs, WhatIfArgs};
use commands::sip::SipArgs;

/// Personal-finance comparison calculations
#[derive(Parser)]
#[command(
    name = "paywise",
    version,
    about = "EMI comparison and step-up SIP projection calculations",
    long_about = "A CLI for comparing the total cost of a purchase under full payment, \
                  regular EMI, and no-cost EMI financing — with GST on interest and fees, \
                  fixed or financed processing fees, and cashback allocation — plus \
                  inflation-adjusted step-up SIP growth projections."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Three-way cost comparison (full / regular EMI / no-cost EMI)
    Emi(EmiArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Flat cost summary for one scenario
    Summary(SummaryArgs),
    /// Cost deltas for small perturbations of a scenario
    WhatIf(WhatIfArgs),
    /// Step-up SIP growth projection (nominal and inflation-adjusted)
    Sip(SipArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Schedule(args) => commands::emi::run_schedule(args),
        Commands::Summary(args) => commands::emi::run_summary(args),
        Commands::WhatIf(args) => commands::emi::run_what_if(args),
        Commands::Sip(args) => commands::sip::run_sip(args),
        Commands::Version => {
            println!("paywise {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
