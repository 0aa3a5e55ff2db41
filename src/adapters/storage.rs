use crate::domain::model::{Loan, LOAN_FILE_EXTENSION};
use crate::domain::ports::LoanStore;
use crate::utils::error::{LoanError, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

/// 每筆貸款存成一個 JSON 檔，檔名為 `<timestamp>.loan`
#[derive(Debug, Clone)]
pub struct LocalLoanStore {
    loans_dir: PathBuf,
}

impl LocalLoanStore {
    pub fn new(loans_dir: impl Into<PathBuf>) -> Self {
        Self {
            loans_dir: loans_dir.into(),
        }
    }

    pub fn loans_dir(&self) -> &Path {
        &self.loans_dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.loans_dir).map_err(|e| LoanError::storage(&self.loans_dir, e))
    }

    fn read_loan(path: &Path) -> Result<Loan> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => LoanError::CorruptDataError {
                path: path.to_path_buf(),
                message: "file is not valid UTF-8".to_string(),
            },
            _ => LoanError::storage(path, e),
        })?;

        serde_json::from_str(&content).map_err(|e| LoanError::CorruptDataError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn is_loan_file(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(LOAN_FILE_EXTENSION)
    }
}

#[async_trait]
impl LoanStore for LocalLoanStore {
    async fn get_loans(&self) -> Result<Vec<Loan>> {
        self.ensure_dir()?;

        let entries =
            fs::read_dir(&self.loans_dir).map_err(|e| LoanError::storage(&self.loans_dir, e))?;

        let mut loans = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoanError::storage(&self.loans_dir, e))?;
            let path = entry.path();

            if !Self::is_loan_file(&path) {
                continue;
            }
            let file_type = entry.file_type().map_err(|e| LoanError::storage(&path, e))?;
            if !file_type.is_file() {
                tracing::warn!("Skipping non-file entry {}", path.display());
                continue;
            }

            loans.push(Self::read_loan(&path)?);
        }

        tracing::debug!(
            "Read {} loans from {}",
            loans.len(),
            self.loans_dir.display()
        );

        loans.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(loans)
    }

    async fn save(&self, loan: &Loan) -> Result<PathBuf> {
        self.ensure_dir()?;

        let path = self.loans_dir.join(loan.file_name());
        let data = serde_json::to_vec(loan).map_err(|e| {
            LoanError::storage(&path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        fs::write(&path, data).map_err(|e| LoanError::storage(&path, e))?;

        tracing::info!("Saved loan {}", path.display());
        Ok(path)
    }
}
