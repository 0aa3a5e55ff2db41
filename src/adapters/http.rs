use crate::config::{ServiceConfig, REDACTED};
use crate::domain::model::PredictionRequest;
use crate::domain::ports::{CreditGradeService, DefaultPredictor};
use crate::utils::error::{LoanError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::Url;

/// 遠端模型服務的呼叫端
///
/// 函式以 `POST <base_url>/<function>` 呼叫，參數為 JSON 物件，
/// 回應內容即為 JSON 編碼的回傳值。
#[derive(Clone)]
pub struct ServiceClient {
    name: String,
    base_url: Url,
    auth_token: Option<String>,
    timeout: Option<Duration>,
    client: Client,
}

impl ServiceClient {
    pub fn new(name: impl Into<String>, base_url: &str) -> Result<Self> {
        let name = name.into();
        let mut base_url = validate_url(&format!("{}.base_url", name), base_url)?;
        // 路徑不以 '/' 結尾時 Url::join 會取代最後一段
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            name,
            base_url,
            auth_token: None,
            timeout: None,
            client: Client::new(),
        })
    }

    pub fn from_config(name: impl Into<String>, config: &ServiceConfig) -> Result<Self> {
        let mut client = Self::new(name, &config.base_url)?;
        client.auth_token = config.auth_token.clone();
        client.timeout = config.timeout_seconds.map(Duration::from_secs);
        Ok(client)
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn call<A, T>(&self, function: &str, args: &A) -> Result<T>
    where
        A: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(function)
            .map_err(|e| LoanError::remote(&self.name, format!("invalid function URL: {}", e)))?;

        tracing::debug!("Calling {} at {}", self.name, url);

        let mut request = self.client.post(url).json(args);
        if let Some(token) = &self.auth_token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Token {}", token));
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LoanError::remote(&self.name, e.to_string()))?;

        let status = response.status();
        tracing::debug!("{} response status: {}", self.name, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoanError::remote(&self.name, error_message(status, &body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LoanError::remote(&self.name, format!("unexpected response: {}", e)))
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("name", &self.name)
            .field("base_url", &self.base_url.as_str())
            .field("auth_token", &self.auth_token.as_ref().map(|_| REDACTED))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(str::to_string));

    match detail {
        Some(detail) => format!("HTTP {}: {}", status, detail),
        None => format!("HTTP {}", status),
    }
}

#[derive(Serialize)]
struct GradeLookup<'a> {
    email: &'a str,
}

#[derive(Debug, Clone)]
pub struct CreditGradeClient {
    service: ServiceClient,
}

impl CreditGradeClient {
    pub const SERVICE_NAME: &'static str = "credit_grade";

    pub fn new(service: ServiceClient) -> Self {
        Self { service }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self::new(ServiceClient::from_config(Self::SERVICE_NAME, config)?))
    }
}

#[async_trait]
impl CreditGradeService for CreditGradeClient {
    async fn find_credit_grade(&self, email: &str) -> Result<String> {
        self.service
            .call("find_credit_grade", &GradeLookup { email })
            .await
    }
}

#[derive(Debug, Clone)]
pub struct PredictionClient {
    service: ServiceClient,
}

impl PredictionClient {
    pub const SERVICE_NAME: &'static str = "prediction";

    pub fn new(service: ServiceClient) -> Self {
        Self { service }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self::new(ServiceClient::from_config(Self::SERVICE_NAME, config)?))
    }
}

#[async_trait]
impl DefaultPredictor for PredictionClient {
    async fn predict_proba(&self, request: &PredictionRequest) -> Result<f64> {
        self.service.call("predict", request).await
    }
}
