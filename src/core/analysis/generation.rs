//! Model-backed analyzers.
//!
//! Both backends send the same bounded prompt and expect a small JSON object
//! back. Any transport failure or unusable reply degrades to the rule-based
//! result for the same inputs, so callers never see an error.

use super::rules::RuleBasedAnalyzer;
use crate::config::{GENERATION_TEMPERATURE, GENERATION_TIMEOUT, MAX_OUTPUT_TOKENS, PROMPT_CHAR_LIMIT};
use crate::core::content::truncate_chars;
use crate::domain::model::{AnalysisResult, UNKNOWN};
use crate::domain::ports::{Analyzer, BackendSettings};
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex"));

pub fn build_prompt(company_name: &str, content: &str) -> String {
    format!(
        r#"Company: {}
Content: {}

Provide JSON only:
{{
    "summary": "Brief 1-sentence summary",
    "target_customer": "Main target market",
    "industry": "Industry category",
    "company_size": "startup/small/medium/large",
    "automation_pitch": "Quick AI automation idea"
}}"#,
        company_name,
        truncate_chars(content, PROMPT_CHAR_LIMIT)
    )
}

#[derive(Debug, Deserialize)]
struct GeneratedAnalysis {
    summary: Option<String>,
    target_customer: Option<String>,
    industry: Option<String>,
    company_size: Option<String>,
    automation_pitch: Option<String>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parses the span from the first `{` to the last `}` of the generated text.
pub fn parse_analysis(backend: &str, generated: &str) -> Result<AnalysisResult> {
    let span = JSON_OBJECT
        .find(generated)
        .ok_or_else(|| EnrichError::MalformedResponseError {
            backend: backend.to_string(),
            message: "no JSON object in response".to_string(),
        })?;

    let parsed: GeneratedAnalysis =
        serde_json::from_str(span.as_str()).map_err(|e| EnrichError::MalformedResponseError {
            backend: backend.to_string(),
            message: e.to_string(),
        })?;

    Ok(AnalysisResult {
        summary: or_default(parsed.summary, "No summary available"),
        target_customer: or_default(parsed.target_customer, UNKNOWN),
        industry: or_default(parsed.industry, UNKNOWN),
        company_size: or_default(parsed.company_size, UNKNOWN),
        automation_pitch: or_default(parsed.automation_pitch, "Custom AI solution available"),
    })
}

fn envelope_text(backend: &str, body: &serde_json::Value, pointer: &str) -> Result<String> {
    body.pointer(pointer)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| EnrichError::MalformedResponseError {
            backend: backend.to_string(),
            message: format!("response has no text at {}", pointer),
        })
}

async fn send_json(
    backend: &str,
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<serde_json::Value> {
    let to_generation_error = |e: reqwest::Error| EnrichError::GenerationError {
        backend: backend.to_string(),
        message: e.to_string(),
    };

    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(to_generation_error)?
        .error_for_status()
        .map_err(to_generation_error)?;

    response.json().await.map_err(|e| EnrichError::MalformedResponseError {
        backend: backend.to_string(),
        message: e.to_string(),
    })
}

/// Google Gemini `generateContent`.
pub struct GeminiAnalyzer {
    client: Client,
    settings: BackendSettings,
    timeout: Duration,
    fallback: RuleBasedAnalyzer,
}

impl GeminiAnalyzer {
    pub fn new(client: Client, settings: BackendSettings) -> Self {
        Self {
            client,
            settings,
            timeout: GENERATION_TIMEOUT,
            fallback: RuleBasedAnalyzer::new(),
        }
    }

    pub async fn try_analyze(&self, company_name: &str, content: &str) -> Result<AnalysisResult> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint, self.settings.model
        );
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(company_name, content) }] }],
            "generationConfig": {
                "temperature": GENERATION_TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS
            }
        });

        let request = self
            .client
            .post(&url)
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&payload);

        let body = send_json(self.name(), request, self.timeout).await?;
        let text = envelope_text(self.name(), &body, "/candidates/0/content/parts/0/text")?;
        parse_analysis(self.name(), &text)
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn analyze(&self, company_name: &str, content: &str) -> AnalysisResult {
        match self.try_analyze(company_name, content).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("⚠️ Gemini analysis failed for {}: {}", company_name, e);
                self.fallback.classify(company_name, content)
            }
        }
    }
}

/// OpenAI chat completions.
pub struct OpenAiAnalyzer {
    client: Client,
    settings: BackendSettings,
    timeout: Duration,
    fallback: RuleBasedAnalyzer,
}

impl OpenAiAnalyzer {
    pub fn new(client: Client, settings: BackendSettings) -> Self {
        Self {
            client,
            settings,
            timeout: GENERATION_TIMEOUT,
            fallback: RuleBasedAnalyzer::new(),
        }
    }

    pub async fn try_analyze(&self, company_name: &str, content: &str) -> Result<AnalysisResult> {
        let url = format!("{}/v1/chat/completions", self.settings.endpoint);
        let payload = serde_json::json!({
            "model": self.settings.model,
            "messages": [{ "role": "user", "content": build_prompt(company_name, content) }],
            "temperature": GENERATION_TEMPERATURE,
            "max_tokens": MAX_OUTPUT_TOKENS
        });

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&payload);

        let body = send_json(self.name(), request, self.timeout).await?;
        let text = envelope_text(self.name(), &body, "/choices/0/message/content")?;
        parse_analysis(self.name(), &text)
    }
}

#[async_trait]
impl Analyzer for OpenAiAnalyzer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn analyze(&self, company_name: &str, content: &str) -> AnalysisResult {
        match self.try_analyze(company_name, content).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("⚠️ OpenAI analysis failed for {}: {}", company_name, e);
                self.fallback.classify(company_name, content)
            }
        }
    }
}
