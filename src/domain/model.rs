use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 時間戳格式：同時作為排序鍵與檔名。
/// 去掉冒號的 ISO-8601，任何檔案系統都可用。
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H%M%S%.6f";

/// 申請人提交的資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub name: String,
    pub email: String,
    pub amount: f64,
    /// 貸款年限
    pub duration: f64,
    pub age: f64,
    pub ownership: String,
    pub income: f64,
}

/// 已儲存的貸款：申請資料加上評等與違約機率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub name: String,
    pub email: String,
    pub amount: f64,
    pub duration: f64,
    pub age: f64,
    pub ownership: String,
    pub income: f64,
    pub grade: String,
    pub p_default: f64,
    pub timestamp: String,
}

impl Loan {
    pub fn new(
        application: LoanApplication,
        grade: String,
        p_default: f64,
        timestamp: String,
    ) -> Self {
        let LoanApplication {
            name,
            email,
            amount,
            duration,
            age,
            ownership,
            income,
        } = application;

        Self {
            name,
            email,
            amount,
            duration,
            age,
            ownership,
            income,
            grade,
            p_default,
            timestamp,
        }
    }

    /// 儲存檔名
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.timestamp, LOAN_FILE_EXTENSION)
    }
}

pub const LOAN_FILE_EXTENSION: &str = "loan";

/// 違約機率服務的參數，欄位名稱依服務端定義
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub amount: f64,
    pub years: f64,
    pub age: f64,
    pub ownership: String,
    pub income: f64,
    pub grade: String,
}

impl PredictionRequest {
    pub fn new(application: &LoanApplication, grade: &str) -> Self {
        Self {
            amount: application.amount,
            years: application.duration,
            age: application.age,
            ownership: application.ownership.clone(),
            income: application.income,
            grade: grade.to_string(),
        }
    }
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
