use crate::config::{
    backend_settings, DEFAULT_DELAY_MS, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL,
    DEFAULT_OPENAI_ENDPOINT, DEFAULT_OPENAI_MODEL, DEFAULT_RECORD_TIMEOUT_SECS, MAX_DELAY_MS,
};
use crate::domain::ports::{BackendSettings, ConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "lead-enricher")]
#[command(about = "Enrich a CSV of company names with website, industry and sales insights")]
pub struct CliConfig {
    /// Input CSV with a `company_name` column
    #[arg(short, long, default_value = "companies.csv")]
    pub input: String,

    /// Output CSV (defaults to `<input>_enriched.csv`)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Load settings from a TOML file instead of flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long, default_value = DEFAULT_OPENAI_MODEL)]
    pub openai_model: String,

    #[arg(long, default_value = DEFAULT_GEMINI_ENDPOINT)]
    pub gemini_endpoint: String,

    #[arg(long, default_value = DEFAULT_OPENAI_ENDPOINT)]
    pub openai_endpoint: String,

    /// Only enrich the first N rows
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause after each company, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = DEFAULT_RECORD_TIMEOUT_SECS)]
    pub record_timeout_secs: u64,

    /// Write a sample input file when the input does not exist
    #[arg(long)]
    pub create_sample: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log process CPU and memory usage per phase")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn batch_size(&self) -> Option<usize> {
        self.batch_size
    }

    fn record_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn record_timeout(&self) -> Duration {
        Duration::from_secs(self.record_timeout_secs)
    }

    fn gemini(&self) -> Option<BackendSettings> {
        backend_settings(
            self.gemini_api_key.as_deref(),
            Some(&self.gemini_model),
            Some(&self.gemini_endpoint),
            DEFAULT_GEMINI_MODEL,
            DEFAULT_GEMINI_ENDPOINT,
        )
    }

    fn openai(&self) -> Option<BackendSettings> {
        backend_settings(
            self.openai_api_key.as_deref(),
            Some(&self.openai_model),
            Some(&self.openai_endpoint),
            DEFAULT_OPENAI_MODEL,
            DEFAULT_OPENAI_ENDPOINT,
        )
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["csv"])?;

        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
            validation::validate_file_extension("output", output, &["csv"])?;
        }

        if let Some(batch_size) = self.batch_size {
            validation::validate_positive_number("batch_size", batch_size, 1)?;
        }

        validation::validate_range("delay_ms", self.delay_ms, 0, MAX_DELAY_MS)?;
        validation::validate_positive_number(
            "record_timeout_secs",
            self.record_timeout_secs as usize,
            1,
        )?;
        validation::validate_url("gemini_endpoint", &self.gemini_endpoint)?;
        validation::validate_url("openai_endpoint", &self.openai_endpoint)?;

        Ok(())
    }
}
