use crate::domain::model::LoanApplication;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "loansdb")]
#[command(about = "Store loan applications scored by the credit risk services")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the loans directory from the configuration
    #[arg(long, global = true)]
    pub loans_dir: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print every stored loan, newest first
    List,
    /// Score a loan application and store it
    Save(SaveArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SaveArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub amount: f64,
    /// Loan term in years
    #[arg(long)]
    pub duration: f64,
    #[arg(long)]
    pub age: f64,
    /// Housing status, e.g. RENT, OWN, MORTGAGE
    #[arg(long)]
    pub ownership: String,
    #[arg(long)]
    pub income: f64,
}

impl From<SaveArgs> for LoanApplication {
    fn from(args: SaveArgs) -> Self {
        LoanApplication {
            name: args.name,
            email: args.email,
            amount: args.amount,
            duration: args.duration,
            age: args.age,
            ownership: args.ownership,
            income: args.income,
        }
    }
}
