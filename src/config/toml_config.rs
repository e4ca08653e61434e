use crate::config::{
    backend_settings, DEFAULT_DELAY_MS, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL,
    DEFAULT_OPENAI_ENDPOINT, DEFAULT_OPENAI_MODEL, DEFAULT_RECORD_TIMEOUT_SECS, MAX_DELAY_MS,
};
use crate::domain::ports::{BackendSettings, ConfigProvider};
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub backends: BackendsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    pub batch_size: Option<usize>,
    pub delay_ms: Option<u64>,
    pub record_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendsConfig {
    pub gemini: Option<BackendConfig>,
    pub openai: Option<BackendConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EnrichError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EnrichError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    fn backend(
        config: Option<&BackendConfig>,
        default_model: &str,
        default_endpoint: &str,
    ) -> Option<BackendSettings> {
        let config = config?;
        backend_settings(
            config.api_key.as_deref(),
            config.model.as_deref(),
            config.endpoint.as_deref(),
            default_model,
            default_endpoint,
        )
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }

    fn batch_size(&self) -> Option<usize> {
        self.enrichment.batch_size
    }

    fn record_delay(&self) -> Duration {
        Duration::from_millis(self.enrichment.delay_ms.unwrap_or(DEFAULT_DELAY_MS))
    }

    fn record_timeout(&self) -> Duration {
        Duration::from_secs(
            self.enrichment
                .record_timeout_seconds
                .unwrap_or(DEFAULT_RECORD_TIMEOUT_SECS),
        )
    }

    fn gemini(&self) -> Option<BackendSettings> {
        Self::backend(
            self.backends.gemini.as_ref(),
            DEFAULT_GEMINI_MODEL,
            DEFAULT_GEMINI_ENDPOINT,
        )
    }

    fn openai(&self) -> Option<BackendSettings> {
        Self::backend(
            self.backends.openai.as_ref(),
            DEFAULT_OPENAI_MODEL,
            DEFAULT_OPENAI_ENDPOINT,
        )
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension("input.path", &self.input.path, &["csv"])?;

        if let Some(output) = &self.output.path {
            validation::validate_path("output.path", output)?;
            validation::validate_file_extension("output.path", output, &["csv"])?;
        }

        if let Some(batch_size) = self.enrichment.batch_size {
            validation::validate_positive_number("enrichment.batch_size", batch_size, 1)?;
        }

        if let Some(delay_ms) = self.enrichment.delay_ms {
            validation::validate_range("enrichment.delay_ms", delay_ms, 0, MAX_DELAY_MS)?;
        }

        if let Some(timeout) = self.enrichment.record_timeout_seconds {
            validation::validate_positive_number(
                "enrichment.record_timeout_seconds",
                timeout as usize,
                1,
            )?;
        }

        for (field, backend) in [
            ("backends.gemini.endpoint", &self.backends.gemini),
            ("backends.openai.endpoint", &self.backends.openai),
        ] {
            if let Some(endpoint) = backend.as_ref().and_then(|b| b.endpoint.as_deref()) {
                validation::validate_url(field, endpoint)?;
            }
        }

        Ok(())
    }
}
