use crate::domain::model::{AnalysisResult, CompanySize, Industry};
use crate::domain::ports::Analyzer;
use async_trait::async_trait;

/// 依優先順序比對；子字串比對，與既有輸出保持一致
const INDUSTRY_KEYWORDS: [(Industry, &[&str]); 4] = [
    (Industry::Technology, &["software", "tech", "ai", "saas", "app"]),
    (Industry::Finance, &["financial", "banking", "fintech"]),
    (Industry::Healthcare, &["health", "medical", "healthcare"]),
    (Industry::Retail, &["retail", "ecommerce", "shopping"]),
];

const LARGE_THRESHOLD: usize = 2000;
const MEDIUM_THRESHOLD: usize = 1000;

pub const DEFAULT_TARGET_CUSTOMER: &str = "Businesses and consumers";

/// Keyword and length-threshold classifier used when no generation backend answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, company_name: &str, content: &str) -> AnalysisResult {
        let subject = if content.is_empty() { company_name } else { content };
        let industry = detect_industry(subject);
        let company_size = estimate_size(content);

        AnalysisResult {
            summary: format!(
                "{} is a {} company.",
                company_name,
                industry.as_str().to_lowercase()
            ),
            target_customer: DEFAULT_TARGET_CUSTOMER.to_string(),
            industry: industry.to_string(),
            company_size: company_size.as_str().to_string(),
            automation_pitch: format!("AI chatbot and process automation for {}", company_name),
        }
    }
}

#[async_trait]
impl Analyzer for RuleBasedAnalyzer {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    async fn analyze(&self, company_name: &str, content: &str) -> AnalysisResult {
        self.classify(company_name, content)
    }
}

pub fn detect_industry(text: &str) -> Industry {
    let lowered = text.to_lowercase();
    INDUSTRY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(industry, _)| *industry)
        .unwrap_or(Industry::BusinessServices)
}

pub fn estimate_size(content: &str) -> CompanySize {
    let length = content.chars().count();
    if length > LARGE_THRESHOLD {
        CompanySize::Large
    } else if length > MEDIUM_THRESHOLD {
        CompanySize::Medium
    } else {
        CompanySize::Small
    }
}
