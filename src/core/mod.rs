pub mod loans;

pub use crate::domain::model::{format_timestamp, Loan, LoanApplication, PredictionRequest};
pub use crate::domain::ports::{Clock, CreditGradeService, DefaultPredictor, LoanStore, SystemClock};
pub use crate::utils::error::Result;
