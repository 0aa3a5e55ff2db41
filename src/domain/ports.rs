use crate::domain::model::{Loan, PredictionRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::PathBuf;

#[async_trait]
pub trait LoanStore: Send + Sync {
    /// 取得所有貸款，最新的在前
    async fn get_loans(&self) -> Result<Vec<Loan>>;
    /// 以時間戳為鍵儲存，同名檔案直接覆寫
    async fn save(&self, loan: &Loan) -> Result<PathBuf>;
}

#[async_trait]
pub trait CreditGradeService: Send + Sync {
    async fn find_credit_grade(&self, email: &str) -> Result<String>;
}

#[async_trait]
pub trait DefaultPredictor: Send + Sync {
    async fn predict_proba(&self, request: &PredictionRequest) -> Result<f64>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// 本地時間
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
