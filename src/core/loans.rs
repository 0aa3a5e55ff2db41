use crate::adapters::http::{CreditGradeClient, PredictionClient};
use crate::adapters::storage::LocalLoanStore;
use crate::config::LoansConfig;
use crate::core::{
    format_timestamp, Clock, CreditGradeService, DefaultPredictor, Loan, LoanApplication,
    LoanStore, PredictionRequest, SystemClock,
};
use crate::utils::error::Result;

/// 向信用風險服務取得評等與違約機率，並將結果存入 [`LoanStore`]
pub struct LoanBook<S, G, P, C = SystemClock> {
    store: S,
    grades: G,
    predictor: P,
    clock: C,
}

/// 正式環境組合：本地檔案、HTTP 服務、系統時間
pub type DefaultLoanBook = LoanBook<LocalLoanStore, CreditGradeClient, PredictionClient>;

impl<S, G, P> LoanBook<S, G, P>
where
    S: LoanStore,
    G: CreditGradeService,
    P: DefaultPredictor,
{
    pub fn new(store: S, grades: G, predictor: P) -> Self {
        Self::with_clock(store, grades, predictor, SystemClock)
    }
}

impl DefaultLoanBook {
    pub fn from_config(config: &LoansConfig) -> Result<Self> {
        let store = LocalLoanStore::new(config.loans_dir());
        let grades = CreditGradeClient::from_config(&config.credit_grade)?;
        let predictor = PredictionClient::from_config(&config.prediction)?;
        Ok(Self::new(store, grades, predictor))
    }
}

impl<S, G, P, C> LoanBook<S, G, P, C>
where
    S: LoanStore,
    G: CreditGradeService,
    P: DefaultPredictor,
    C: Clock,
{
    pub fn with_clock(store: S, grades: G, predictor: P, clock: C) -> Self {
        Self {
            store,
            grades,
            predictor,
            clock,
        }
    }

    /// 取得所有貸款，最新的在前
    pub async fn get_loans(&self) -> Result<Vec<Loan>> {
        self.store.get_loans().await
    }

    /// 查詢評等、預測違約機率後儲存
    ///
    /// 兩個遠端呼叫都成功才會寫檔
    pub async fn save_loan(&self, application: LoanApplication) -> Result<Loan> {
        tracing::debug!("Looking up credit grade for {}", application.email);
        let grade = self.grades.find_credit_grade(&application.email).await?;

        let request = PredictionRequest::new(&application, &grade);
        let p_default = self.predictor.predict_proba(&request).await?;
        tracing::debug!("Grade {} with p_default {}", grade, p_default);

        let timestamp = format_timestamp(self.clock.now());
        let loan = Loan::new(application, grade, p_default, timestamp);

        self.store.save(&loan).await?;
        Ok(loan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::LoanError;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FixedGrade(Option<&'static str>);

    #[async_trait]
    impl CreditGradeService for FixedGrade {
        async fn find_credit_grade(&self, _email: &str) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| LoanError::remote("credit_grade", "HTTP 503 Service Unavailable"))
        }
    }

    #[derive(Default)]
    struct RecordingPredictor {
        answer: Option<f64>,
        requests: Mutex<Vec<PredictionRequest>>,
    }

    impl RecordingPredictor {
        fn answering(answer: f64) -> Self {
            Self {
                answer: Some(answer),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl DefaultPredictor for RecordingPredictor {
        async fn predict_proba(&self, request: &PredictionRequest) -> Result<f64> {
            self.requests.lock().unwrap().push(request.clone());
            self.answer
                .ok_or_else(|| LoanError::remote("prediction", "connection refused"))
        }
    }

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    /// 每次呼叫前進一秒
    struct SteppingClock {
        start: NaiveDateTime,
        calls: AtomicUsize,
    }

    impl Clock for SteppingClock {
        fn now(&self) -> NaiveDateTime {
            let step = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
            self.start + chrono::Duration::seconds(step)
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn application(name: &str) -> LoanApplication {
        LoanApplication {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            amount: 7500.0,
            duration: 4.0,
            age: 38.0,
            ownership: "RENT".to_string(),
            income: 52000.0,
        }
    }

    fn dir_entries(dir: &std::path::Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_save_loan_then_get_loans() {
        let temp_dir = TempDir::new().unwrap();
        let book = LoanBook::new(
            LocalLoanStore::new(temp_dir.path()),
            FixedGrade(Some("C")),
            RecordingPredictor::answering(0.31),
        );

        let saved = book.save_loan(application("Alice")).await.unwrap();
        let loans = book.get_loans().await.unwrap();

        assert_eq!(loans, vec![saved.clone()]);
        let loan = &loans[0];
        assert_eq!(loan.name, "Alice");
        assert_eq!(loan.email, "alice@example.com");
        assert_eq!(loan.amount, 7500.0);
        assert_eq!(loan.duration, 4.0);
        assert_eq!(loan.age, 38.0);
        assert_eq!(loan.ownership, "RENT");
        assert_eq!(loan.income, 52000.0);
        assert_eq!(loan.grade, "C");
        assert_eq!(loan.p_default, 0.31);
        assert!(!loan.timestamp.contains(':'));
    }

    #[tokio::test]
    async fn test_prediction_receives_grade_and_years() {
        let temp_dir = TempDir::new().unwrap();
        let book = LoanBook::new(
            LocalLoanStore::new(temp_dir.path()),
            FixedGrade(Some("D")),
            RecordingPredictor::answering(0.5),
        );

        book.save_loan(application("Bob")).await.unwrap();

        let requests = book.predictor.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].grade, "D");
        assert_eq!(requests[0].years, 4.0);
        assert_eq!(requests[0].ownership, "RENT");
    }

    #[tokio::test]
    async fn test_grade_failure_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let book = LoanBook::new(
            LocalLoanStore::new(temp_dir.path()),
            FixedGrade(None),
            RecordingPredictor::answering(0.1),
        );
        let before = dir_entries(temp_dir.path());

        let result = book.save_loan(application("Alice")).await;

        assert!(matches!(
            result,
            Err(LoanError::RemoteServiceError { ref service, .. }) if service == "credit_grade"
        ));
        assert_eq!(dir_entries(temp_dir.path()), before);
        assert!(book.predictor.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prediction_failure_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let book = LoanBook::new(
            LocalLoanStore::new(temp_dir.path()),
            FixedGrade(Some("A")),
            RecordingPredictor::failing(),
        );

        let result = book.save_loan(application("Alice")).await;

        assert!(matches!(
            result,
            Err(LoanError::RemoteServiceError { ref service, .. }) if service == "prediction"
        ));
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_identical_timestamps_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let book = LoanBook::with_clock(
            LocalLoanStore::new(temp_dir.path()),
            FixedGrade(Some("B")),
            RecordingPredictor::answering(0.2),
            FixedClock(at(1, 10)),
        );

        book.save_loan(application("Alice")).await.unwrap();
        book.save_loan(application("Bob")).await.unwrap();

        assert_eq!(
            dir_entries(temp_dir.path()),
            vec!["2024-01-01T100000.000000.loan".to_string()]
        );
        let loans = book.get_loans().await.unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].name, "Bob");
    }

    #[tokio::test]
    async fn test_get_loans_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let book = LoanBook::with_clock(
            LocalLoanStore::new(temp_dir.path()),
            FixedGrade(Some("B")),
            RecordingPredictor::answering(0.2),
            SteppingClock {
                start: at(1, 10),
                calls: AtomicUsize::new(0),
            },
        );

        for name in ["First", "Second", "Third"] {
            book.save_loan(application(name)).await.unwrap();
        }

        let loans = book.get_loans().await.unwrap();
        let names: Vec<&str> = loans.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_storage_failure_after_scoring() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("loans");
        std::fs::write(&blocker, "occupied").unwrap();
        let book = LoanBook::new(
            LocalLoanStore::new(&blocker),
            FixedGrade(Some("B")),
            RecordingPredictor::answering(0.2),
        );

        let result = book.save_loan(application("Alice")).await;

        assert!(matches!(result, Err(LoanError::StorageError { .. })));
        assert_eq!(book.predictor.requests.lock().unwrap().len(), 1);
    }
}
