use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN: &str = "Unknown";
pub const CONTACT_PITCH: &str = "Please contact us for custom solution";

/// 輸出 CSV 的固定欄位順序
pub const OUTPUT_COLUMNS: [&str; 7] = [
    "company_name",
    "website",
    "industry",
    "company_size",
    "summary_from_llm",
    "target_customer",
    "automation_pitch_from_llm",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub company_name: String,
}

impl InputRecord {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
        }
    }
}

/// Serialized field order must match [`OUTPUT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub company_name: String,
    pub website: String,
    pub industry: String,
    pub company_size: String,
    #[serde(rename = "summary_from_llm")]
    pub summary: String,
    pub target_customer: String,
    #[serde(rename = "automation_pitch_from_llm")]
    pub automation_pitch: String,
}

impl EnrichedRecord {
    pub fn assemble(company_name: &str, website: &str, analysis: AnalysisResult) -> Self {
        Self {
            company_name: company_name.to_string(),
            website: website.to_string(),
            industry: analysis.industry,
            company_size: analysis.company_size,
            summary: analysis.summary,
            target_customer: analysis.target_customer,
            automation_pitch: analysis.automation_pitch,
        }
    }

    /// 單筆處理失敗時的降級紀錄
    pub fn degraded(company_name: &str) -> Self {
        if company_name.trim().is_empty() {
            Self::failed(company_name)
        } else {
            Self::sentinel(company_name, format!("Error processing {}", company_name))
        }
    }

    /// Substituted by the batch runner when `enrich` itself never finished.
    pub fn failed(company_name: &str) -> Self {
        Self::sentinel(company_name, "Error processing company".to_string())
    }

    fn sentinel(company_name: &str, summary: String) -> Self {
        Self {
            company_name: company_name.to_string(),
            website: UNKNOWN.to_string(),
            industry: UNKNOWN.to_string(),
            company_size: UNKNOWN.to_string(),
            summary,
            target_customer: UNKNOWN.to_string(),
            automation_pitch: CONTACT_PITCH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub target_customer: String,
    pub industry: String,
    pub company_size: String,
    pub automation_pitch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Enriched(EnrichedRecord),
    Degraded { record: EnrichedRecord, reason: String },
}

impl EnrichmentOutcome {
    pub fn record(&self) -> &EnrichedRecord {
        match self {
            EnrichmentOutcome::Enriched(record) => record,
            EnrichmentOutcome::Degraded { record, .. } => record,
        }
    }

    pub fn into_record(self) -> EnrichedRecord {
        match self {
            EnrichmentOutcome::Enriched(record) => record,
            EnrichmentOutcome::Degraded { record, .. } => record,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, EnrichmentOutcome::Degraded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Industry {
    Technology,
    Finance,
    Healthcare,
    Retail,
    BusinessServices,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Finance => "Finance",
            Industry::Healthcare => "Healthcare",
            Industry::Retail => "Retail",
            Industry::BusinessServices => "Business Services",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanySize {
    Small,
    Medium,
    Large,
}

impl CompanySize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Small => "small",
            CompanySize::Medium => "medium",
            CompanySize::Large => "large",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<EnrichedRecord>,
    pub degraded: usize,
    pub csv_output: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub records: Vec<EnrichedRecord>,
    pub degraded: usize,
    /// `None` when neither the target nor the backup file could be written
    pub output_path: Option<String>,
}
