#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{LoanError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_resolved,
    validate_url, Validate, PLACEHOLDER_PATTERN,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOANS_DIR: &str = "/data/loans";
pub const DEFAULT_CREDIT_GRADE_URL: &str =
    "https://credit-risk-service--creditgrade.rorocloud.io/";
pub const DEFAULT_PREDICTION_URL: &str = "https://credit-risk-service--api.rorocloud.io/";

/// Debug 輸出中取代憑證的字串
pub const REDACTED: &str = "<redacted>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoansConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "ServiceConfig::credit_grade")]
    pub credit_grade: ServiceConfig,
    #[serde(default = "ServiceConfig::prediction")]
    pub prediction: ServiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_loans_dir")]
    pub loans_dir: PathBuf,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

fn default_loans_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOANS_DIR)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            loans_dir: default_loans_dir(),
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| REDACTED))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            timeout_seconds: None,
        }
    }

    fn credit_grade() -> Self {
        Self::new(DEFAULT_CREDIT_GRADE_URL)
    }

    fn prediction() -> Self {
        Self::new(DEFAULT_PREDICTION_URL)
    }

    fn validate_section(&self, section: &str) -> Result<()> {
        validate_url(&format!("{}.base_url", section), &self.base_url)?;
        if let Some(token) = &self.auth_token {
            let field = format!("{}.auth_token", section);
            validate_non_empty_string(&field, token)?;
            validate_resolved(&field, token)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number(&format!("{}.timeout_seconds", section), timeout, 1)?;
        }
        Ok(())
    }
}

impl Default for LoansConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            credit_grade: ServiceConfig::credit_grade(),
            prediction: ServiceConfig::prediction(),
        }
    }
}

impl LoansConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LoanError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，先替換 `${VAR}` 環境變數
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LoanError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(PLACEHOLDER_PATTERN).map_err(|e| LoanError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn loans_dir(&self) -> &Path {
        &self.storage.loans_dir
    }
}

impl Validate for LoansConfig {
    fn validate(&self) -> Result<()> {
        let loans_dir = self
            .storage
            .loans_dir
            .to_str()
            .ok_or_else(|| LoanError::InvalidConfigValueError {
                field: "storage.loans_dir".to_string(),
                value: self.storage.loans_dir.display().to_string(),
                reason: "Path is not valid UTF-8".to_string(),
            })?;
        validate_path("storage.loans_dir", loans_dir)?;

        self.credit_grade.validate_section("credit_grade")?;
        self.prediction.validate_section("prediction")?;
        Ok(())
    }
}
