pub mod generation;
pub mod rules;

pub use generation::{GeminiAnalyzer, OpenAiAnalyzer};
pub use rules::RuleBasedAnalyzer;

use crate::domain::ports::{Analyzer, BackendSettings};
use reqwest::Client;

/// 依可用憑證選擇分析策略：Gemini > OpenAI > 關鍵字規則
pub fn select_analyzer(
    client: &Client,
    gemini: Option<BackendSettings>,
    openai: Option<BackendSettings>,
) -> Box<dyn Analyzer> {
    let analyzer: Box<dyn Analyzer> = match (gemini, openai) {
        (Some(settings), _) => Box::new(GeminiAnalyzer::new(client.clone(), settings)),
        (None, Some(settings)) => Box::new(OpenAiAnalyzer::new(client.clone(), settings)),
        (None, None) => Box::new(RuleBasedAnalyzer::new()),
    };

    tracing::info!("🧠 Using {} analysis", analyzer.name());
    analyzer
}
