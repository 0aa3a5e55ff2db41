use anyhow::Context;
use clap::Parser;
use loansdb::config::cli::Command;
use loansdb::utils::{logger, validation::Validate};
use loansdb::{CliConfig, DefaultLoanBook, LoansConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            LoansConfig::from_file(path)?
        }
        None => LoansConfig::default(),
    };

    if let Some(loans_dir) = cli.loans_dir {
        config.storage.loans_dir = loans_dir;
    }

    config.validate().context("invalid configuration")?;
    tracing::debug!("Config: {:?}", config);

    let book = DefaultLoanBook::from_config(&config)?;

    match cli.command {
        Command::List => {
            let loans = book.get_loans().await?;
            tracing::info!("Found {} loans in {}", loans.len(), config.loans_dir().display());
            println!("{}", serde_json::to_string_pretty(&loans)?);
        }
        Command::Save(args) => {
            let loan = book.save_loan(args.into()).await?;
            println!("{}", serde_json::to_string_pretty(&loan)?);
        }
    }

    Ok(())
}
