pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::{CreditGradeClient, PredictionClient, ServiceClient};
pub use adapters::storage::LocalLoanStore;
pub use config::LoansConfig;
pub use core::loans::{DefaultLoanBook, LoanBook};
pub use domain::model::{Loan, LoanApplication};
pub use utils::error::{LoanError, Result};
