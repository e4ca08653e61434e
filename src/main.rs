use clap::Parser;
use lead_enricher::core::batch::{derive_output_path, write_sample_input};
use lead_enricher::domain::ports::ConfigProvider;
use lead_enricher::utils::error::{EnrichError, ErrorSeverity};
use lead_enricher::utils::{logger, validation::Validate};
use lead_enricher::{BatchPipeline, CliConfig, CompanyEnricher, EtlEngine, LocalStorage, TomlConfig};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting lead-enricher");

    let outcome = match cli.config.clone() {
        Some(config_path) => {
            tracing::info!("📁 Loading configuration from: {}", config_path);
            let config = match TomlConfig::from_file(&config_path) {
                Ok(config) => config,
                Err(e) => exit_with(&e),
            };
            run(config, cli.create_sample, cli.monitor).await
        }
        None => {
            let create_sample = cli.create_sample;
            let monitor = cli.monitor;
            run(cli, create_sample, monitor).await
        }
    };

    if let Err(e) = outcome {
        exit_with(&e);
    }

    Ok(())
}

async fn run<C>(config: C, create_sample: bool, monitor: bool) -> lead_enricher::Result<()>
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    config.validate()?;

    let storage = LocalStorage::new(".");
    let input_path = config.input_path().to_string();
    let target = config
        .output_path()
        .map(str::to_string)
        .unwrap_or_else(|| derive_output_path(&input_path));
    if create_sample && !Path::new(&input_path).exists() {
        write_sample_input(&storage, &input_path).await?;
    }

    match (config.gemini().is_some(), config.openai().is_some()) {
        (false, false) => {
            tracing::warn!("⚠️ No API keys found. Using keyword analysis only.");
        }
        (true, true) => {
            tracing::info!("Both Gemini and OpenAI keys present; Gemini takes priority");
        }
        _ => {}
    }

    let enricher = CompanyEnricher::from_config(&config)?;
    let pipeline = BatchPipeline::new(storage, config, enricher);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);

    let report = engine.run().await?;

    println!(
        "✅ Successfully enriched {} companies ({} degraded)",
        report.records.len(),
        report.degraded
    );

    if let Some(first) = report.records.first() {
        println!("\nDetailed results for {}:", first.company_name);
        println!("  website: {}", first.website);
        println!("  industry: {}", first.industry);
        println!("  company_size: {}", first.company_size);
        println!("  summary_from_llm: {}", first.summary);
        println!("  target_customer: {}", first.target_customer);
        println!("  automation_pitch_from_llm: {}", first.automation_pitch);
    }

    match report.output_path {
        Some(path) => {
            println!("📁 Output file: {}", path);
            Ok(())
        }
        None => Err(EnrichError::OutputWriteError {
            path: target,
            message: "neither the target nor the backup file could be written".to_string(),
        }),
    }
}

fn exit_with(e: &EnrichError) -> ! {
    tracing::error!(
        "❌ Enrichment failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
