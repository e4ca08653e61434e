use crate::domain::model::{AnalysisResult, InputRecord, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Credentials and endpoint for one generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> Option<&str>;
    fn batch_size(&self) -> Option<usize>;
    fn record_delay(&self) -> Duration;
    fn record_timeout(&self) -> Duration;
    fn gemini(&self) -> Option<BackendSettings>;
    fn openai(&self) -> Option<BackendSettings>;
}

/// 對外 HTTP 存取（網站探測、首頁抓取）
#[async_trait]
pub trait WebClient: Send + Sync {
    /// Any transport error or non-success status counts as not accessible.
    async fn is_accessible(&self, url: &str) -> bool;
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

/// One analysis strategy. Implementations never fail; every field is populated.
#[async_trait]
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;
    async fn analyze(&self, company_name: &str, content: &str) -> AnalysisResult;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<InputRecord>>;
    async fn transform(&self, records: Vec<InputRecord>) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
