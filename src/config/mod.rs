#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::BackendSettings;
use std::time::Duration;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const COMPANY_NAME_COLUMN: &str = "company_name";

/// 首頁文字截斷長度（字元）
pub const FETCH_CHAR_LIMIT: usize = 2000;
/// 送入提示詞的內容長度（字元）
pub const PROMPT_CHAR_LIMIT: usize = 1500;
pub const MAX_OUTPUT_TOKENS: u32 = 300;
pub const GENERATION_TEMPERATURE: f64 = 0.3;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_DELAY_MS: u64 = 500;
pub const MAX_DELAY_MS: u64 = 60_000;
pub const DEFAULT_RECORD_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Blank keys and unsubstituted `${VAR}` placeholders mean the backend is not configured.
pub fn backend_settings(
    api_key: Option<&str>,
    model: Option<&str>,
    endpoint: Option<&str>,
    default_model: &str,
    default_endpoint: &str,
) -> Option<BackendSettings> {
    let api_key = api_key.map(str::trim).filter(|key| !key.is_empty())?;
    if api_key.starts_with("${") && api_key.ends_with('}') {
        return None;
    }

    Some(BackendSettings {
        api_key: api_key.to_string(),
        model: model.unwrap_or(default_model).to_string(),
        endpoint: endpoint
            .unwrap_or(default_endpoint)
            .trim_end_matches('/')
            .to_string(),
    })
}
