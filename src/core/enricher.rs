use crate::adapters::http::{build_client, HttpWebClient};
use crate::core::analysis::{select_analyzer, RuleBasedAnalyzer};
use crate::core::content::fetch_content;
use crate::core::website::resolve_website;
use crate::domain::model::{EnrichedRecord, EnrichmentOutcome};
use crate::domain::ports::{Analyzer, ConfigProvider, WebClient};
use crate::utils::error::{EnrichError, Result};
use std::sync::Arc;
use std::time::Duration;

/// 單筆公司資料的補全流程：網站猜測 → 首頁抓取 → 內容分析
pub struct CompanyEnricher {
    web: Arc<dyn WebClient>,
    analyzer: Box<dyn Analyzer>,
    fallback: RuleBasedAnalyzer,
    delay: Duration,
}

impl CompanyEnricher {
    pub fn new(web: Arc<dyn WebClient>, analyzer: Box<dyn Analyzer>, delay: Duration) -> Self {
        Self {
            web,
            analyzer,
            fallback: RuleBasedAnalyzer::new(),
            delay,
        }
    }

    /// Builds the shared HTTP client and picks the analyzer from the configured credentials.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = build_client()?;
        let web = Arc::new(HttpWebClient::new(client.clone()));
        let analyzer = select_analyzer(&client, config.gemini(), config.openai());
        Ok(Self::new(web, analyzer, config.record_delay()))
    }

    /// Always returns a complete record; failures come back as `Degraded`.
    pub async fn enrich(&self, company_name: &str) -> EnrichmentOutcome {
        tracing::info!("🔎 Enriching data for: {}", company_name);

        let outcome = match self.try_enrich(company_name).await {
            Ok(record) => EnrichmentOutcome::Enriched(record),
            Err(e) => {
                tracing::error!("❌ Error processing {}: {}", company_name, e);
                EnrichmentOutcome::Degraded {
                    record: EnrichedRecord::degraded(company_name),
                    reason: e.to_string(),
                }
            }
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        outcome
    }

    async fn try_enrich(&self, company_name: &str) -> Result<EnrichedRecord> {
        let website = resolve_website(self.web.as_ref(), company_name)
            .await
            .ok_or_else(|| EnrichError::ValidationError {
                message: "company name is blank".to_string(),
            })?;
        tracing::info!("🌐 Website: {}", website);

        let content = fetch_content(self.web.as_ref(), &website).await;
        let analysis = if content.is_empty() {
            // 沒有內容就不浪費模型呼叫，只用名稱做關鍵字分析
            self.fallback.classify(company_name, company_name)
        } else {
            tracing::info!("📄 Scraped {} characters of content", content.chars().count());
            self.analyzer.analyze(company_name, &content).await
        };

        Ok(EnrichedRecord::assemble(company_name, &website, analysis))
    }
}
