use crate::config::COMPANY_NAME_COLUMN;
use crate::core::enricher::CompanyEnricher;
use crate::domain::model::{EnrichedRecord, InputRecord, TransformResult, OUTPUT_COLUMNS};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{EnrichError, Result};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::Path;

const SAMPLE_COMPANIES: [&str; 6] = ["Microsoft", "Google", "Amazon", "Apple", "Tesla", "Netflix"];

/// `companies.csv` → `companies_enriched.csv`
pub fn derive_output_path(input_path: &str) -> String {
    match input_path.strip_suffix(".csv") {
        Some(stem) => format!("{}_enriched.csv", stem),
        None => format!("{}_enriched.csv", input_path),
    }
}

/// Backup file placed next to the failed target.
pub fn backup_output_path(target: &str, timestamp: i64) -> String {
    let file_name = format!("enriched_companies_backup_{}.csv", timestamp);
    Path::new(target)
        .with_file_name(file_name)
        .to_string_lossy()
        .into_owned()
}

/// Reads `company_name` values in file order, keeping at most `batch_size` rows.
pub fn parse_input(data: &[u8], batch_size: Option<usize>) -> Result<Vec<InputRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let index = headers
        .iter()
        .position(|h| h == COMPANY_NAME_COLUMN)
        .ok_or_else(|| EnrichError::MissingColumnError {
            column: COMPANY_NAME_COLUMN.to_string(),
            available: headers.clone(),
        })?;

    let mut records = Vec::new();
    for row in reader.records().take(batch_size.unwrap_or(usize::MAX)) {
        let row = row?;
        records.push(InputRecord::new(row.get(index).unwrap_or("").trim()));
    }

    Ok(records)
}

/// Header row is always written, even for an empty batch.
pub fn write_csv(records: &[EnrichedRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer.into_inner().map_err(|e| EnrichError::ProcessingError {
        message: format!("failed to finish CSV output: {}", e),
    })
}

pub fn sample_input_csv() -> Vec<u8> {
    let mut csv = format!("{}\n", COMPANY_NAME_COLUMN);
    for company in SAMPLE_COMPANIES {
        csv.push_str(company);
        csv.push('\n');
    }
    csv.into_bytes()
}

pub async fn write_sample_input<S: Storage>(storage: &S, path: &str) -> Result<()> {
    storage.write_file(path, &sample_input_csv()).await?;
    tracing::info!("📝 Created sample file: {}", path);
    Ok(())
}

pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    enricher: CompanyEnricher,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C, enricher: CompanyEnricher) -> Self {
        Self {
            storage,
            config,
            enricher,
        }
    }

    pub fn output_target(&self) -> String {
        self.config
            .output_path()
            .map(str::to_string)
            .unwrap_or_else(|| derive_output_path(self.config.input_path()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<InputRecord>> {
        let input_path = self.config.input_path();
        tracing::info!("📥 Reading companies from: {}", input_path);

        let data = self.storage.read_file(input_path).await?;
        let records = parse_input(&data, self.config.batch_size())?;

        tracing::info!("📊 Loaded {} companies", records.len());
        Ok(records)
    }

    async fn transform(&self, records: Vec<InputRecord>) -> Result<TransformResult> {
        let total = records.len();
        let timeout = self.config.record_timeout();
        let mut enriched = Vec::with_capacity(total);
        let mut degraded = 0;

        for (index, input) in records.iter().enumerate() {
            tracing::info!("Processing {}/{}: {}", index + 1, total, input.company_name);

            // panic 或逾時都以佔位紀錄取代，維持一列輸入對一列輸出
            let guarded = AssertUnwindSafe(self.enricher.enrich(&input.company_name)).catch_unwind();
            let record = match tokio::time::timeout(timeout, guarded).await {
                Ok(Ok(outcome)) => {
                    if outcome.is_degraded() {
                        degraded += 1;
                    }
                    outcome.into_record()
                }
                Ok(Err(_)) => {
                    tracing::error!(
                        "❌ Enrichment of {} panicked, writing placeholder",
                        input.company_name
                    );
                    degraded += 1;
                    EnrichedRecord::failed(&input.company_name)
                }
                Err(_) => {
                    tracing::error!(
                        "❌ Enrichment of {} exceeded {:?}, writing placeholder",
                        input.company_name,
                        timeout
                    );
                    degraded += 1;
                    EnrichedRecord::failed(&input.company_name)
                }
            };
            enriched.push(record);
        }

        let csv_output = write_csv(&enriched)?;
        tracing::info!(
            "✅ Enriched {} companies ({} degraded)",
            enriched.len(),
            degraded
        );

        Ok(TransformResult {
            records: enriched,
            degraded,
            csv_output,
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let target = self.output_target();

        match self.storage.write_file(&target, &result.csv_output).await {
            Ok(()) => {
                tracing::info!("💾 Results saved to: {}", target);
                Ok(target)
            }
            Err(e) => {
                tracing::error!("❌ Error saving to {}: {}", target, e);
                let backup = backup_output_path(&target, chrono::Utc::now().timestamp());

                self.storage
                    .write_file(&backup, &result.csv_output)
                    .await
                    .map_err(|err| EnrichError::OutputWriteError {
                        path: backup.clone(),
                        message: err.to_string(),
                    })?;

                tracing::warn!("⚠️ Results saved to backup file: {}", backup);
                Ok(backup)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::RuleBasedAnalyzer;
    use crate::domain::ports::{BackendSettings, WebClient};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        read_only: Arc<HashSet<String>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
                read_only: Arc::new(HashSet::new()),
            }
        }

        fn with_read_only(paths: &[&str]) -> Self {
            Self {
                read_only: Arc::new(paths.iter().map(|p| p.to_string()).collect()),
                ..Self::new()
            }
        }

        async fn put(&self, path: &str, data: &str) {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }

        async fn paths(&self) -> Vec<String> {
            self.files.lock().await.keys().cloned().collect()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EnrichError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.read_only.contains(path) {
                return Err(EnrichError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("read-only: {}", path),
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        output_path: Option<String>,
        batch_size: Option<usize>,
        record_timeout: Duration,
    }

    impl MockConfig {
        fn new(input_path: &str) -> Self {
            Self {
                input_path: input_path.to_string(),
                output_path: None,
                batch_size: None,
                record_timeout: Duration::from_secs(5),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> Option<&str> {
            self.output_path.as_deref()
        }

        fn batch_size(&self) -> Option<usize> {
            self.batch_size
        }

        fn record_delay(&self) -> Duration {
            Duration::ZERO
        }

        fn record_timeout(&self) -> Duration {
            self.record_timeout
        }

        fn gemini(&self) -> Option<BackendSettings> {
            None
        }

        fn openai(&self) -> Option<BackendSettings> {
            None
        }
    }

    /// Nothing is reachable; `hang` makes every probe stall.
    struct OfflineWebClient {
        hang: bool,
    }

    #[async_trait]
    impl WebClient for OfflineWebClient {
        async fn is_accessible(&self, _url: &str) -> bool {
            if self.hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            false
        }

        async fn fetch_html(&self, url: &str) -> Result<String> {
            Err(EnrichError::ProcessingError {
                message: format!("offline: {}", url),
            })
        }
    }

    /// Panics whenever a probed URL contains "boom".
    struct PanickingWebClient;

    #[async_trait]
    impl WebClient for PanickingWebClient {
        async fn is_accessible(&self, url: &str) -> bool {
            if url.contains("boom") {
                panic!("web client failure for {}", url);
            }
            false
        }

        async fn fetch_html(&self, url: &str) -> Result<String> {
            Err(EnrichError::ProcessingError {
                message: format!("offline: {}", url),
            })
        }
    }

    fn offline_enricher(hang: bool) -> CompanyEnricher {
        CompanyEnricher::new(
            Arc::new(OfflineWebClient { hang }),
            Box::new(RuleBasedAnalyzer::new()),
            Duration::ZERO,
        )
    }

    #[test]
    fn test_derive_output_path() {
        assert_eq!(derive_output_path("companies.csv"), "companies_enriched.csv");
        assert_eq!(derive_output_path("data/leads.csv"), "data/leads_enriched.csv");
        assert_eq!(derive_output_path("leads"), "leads_enriched.csv");
    }

    #[test]
    fn test_backup_output_path_same_directory() {
        assert_eq!(
            backup_output_path("out/leads.csv", 1700000000),
            "out/enriched_companies_backup_1700000000.csv"
        );
        assert_eq!(
            backup_output_path("leads.csv", 42),
            "enriched_companies_backup_42.csv"
        );
    }

    #[test]
    fn test_parse_input_keeps_order_and_limit() {
        let data = b"id,company_name,country\n1,Acme,US\n2, Globex ,DE\n3,Initech,US\n";

        let all = parse_input(data, None).unwrap();
        assert_eq!(
            all,
            vec![
                InputRecord::new("Acme"),
                InputRecord::new("Globex"),
                InputRecord::new("Initech"),
            ]
        );

        let limited = parse_input(data, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].company_name, "Globex");
    }

    #[test]
    fn test_parse_input_strips_bom() {
        let data = "\u{feff}company_name\nAcme\n".as_bytes();
        assert_eq!(parse_input(data, None).unwrap(), vec![InputRecord::new("Acme")]);
    }

    #[test]
    fn test_parse_input_missing_column_lists_headers() {
        let err = parse_input(b"name,country\nAcme,US\n", None).unwrap_err();

        match err {
            EnrichError::MissingColumnError { column, available } => {
                assert_eq!(column, "company_name");
                assert_eq!(available, vec!["name", "country"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_write_csv_header_only_for_empty_batch() {
        let csv = String::from_utf8(write_csv(&[]).unwrap()).unwrap();
        assert_eq!(
            csv,
            "company_name,website,industry,company_size,summary_from_llm,target_customer,automation_pitch_from_llm\n"
        );
    }

    #[test]
    fn test_write_csv_quotes_fields() {
        let record = EnrichedRecord::degraded("Acme, Inc.");
        let csv = String::from_utf8(write_csv(&[record]).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("\"Acme, Inc.\",Unknown,Unknown,Unknown,"));
    }

    #[test]
    fn test_sample_input_round_trips() {
        let records = parse_input(&sample_input_csv(), None).unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].company_name, "Microsoft");
    }

    #[tokio::test]
    async fn test_extract_missing_column_before_enrichment() {
        let storage = MockStorage::new();
        storage.put("companies.csv", "name\nAcme\n").await;
        let pipeline = BatchPipeline::new(storage, MockConfig::new("companies.csv"), offline_enricher(false));

        let result = pipeline.extract().await;

        assert!(matches!(result, Err(EnrichError::MissingColumnError { .. })));
    }

    #[tokio::test]
    async fn test_transform_one_record_per_input_in_order() {
        let storage = MockStorage::new();
        let pipeline = BatchPipeline::new(storage, MockConfig::new("companies.csv"), offline_enricher(false));

        let inputs = vec![
            InputRecord::new("Zeta Software"),
            InputRecord::new(""),
            InputRecord::new("Alpha Banking"),
        ];
        let result = pipeline.transform(inputs).await.unwrap();

        let names: Vec<&str> = result.records.iter().map(|r| r.company_name.as_str()).collect();
        assert_eq!(names, vec!["Zeta Software", "", "Alpha Banking"]);
        assert_eq!(result.degraded, 1);
        assert_eq!(result.records[0].industry, "Technology");
        assert_eq!(result.records[0].website, "https://www.zetasoftware.com");
        assert_eq!(result.records[1].summary, "Error processing company");
        assert_eq!(result.records[2].industry, "Finance");

        let csv = String::from_utf8(result.csv_output).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_transform_timeout_substitutes_placeholder() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new("companies.csv");
        config.record_timeout = Duration::from_millis(50);
        let pipeline = BatchPipeline::new(storage, config, offline_enricher(true));

        let result = pipeline
            .transform(vec![InputRecord::new("Slowpoke")])
            .await
            .unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.degraded, 1);
        assert_eq!(result.records[0], EnrichedRecord::failed("Slowpoke"));
    }

    #[tokio::test]
    async fn test_transform_panic_substitutes_placeholder() {
        let storage = MockStorage::new();
        let enricher = CompanyEnricher::new(
            Arc::new(PanickingWebClient),
            Box::new(RuleBasedAnalyzer::new()),
            Duration::ZERO,
        );
        let pipeline = BatchPipeline::new(storage, MockConfig::new("companies.csv"), enricher);

        let result = pipeline
            .transform(vec![
                InputRecord::new("Alpha"),
                InputRecord::new("Boom"),
                InputRecord::new("Gamma"),
            ])
            .await
            .unwrap();

        let names: Vec<&str> = result.records.iter().map(|r| r.company_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Boom", "Gamma"]);
        assert_eq!(result.degraded, 1);
        assert_eq!(result.records[1], EnrichedRecord::failed("Boom"));
        assert_eq!(result.records[2].website, "https://www.gamma.com");

        let csv = String::from_utf8(result.csv_output).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_load_writes_default_target() {
        let storage = MockStorage::new();
        let pipeline = BatchPipeline::new(storage.clone(), MockConfig::new("companies.csv"), offline_enricher(false));
        let result = TransformResult {
            records: vec![],
            degraded: 0,
            csv_output: write_csv(&[]).unwrap(),
        };

        let path = pipeline.load(&result).await.unwrap();

        assert_eq!(path, "companies_enriched.csv");
        assert!(storage.get_file("companies_enriched.csv").await.is_some());
    }

    #[tokio::test]
    async fn test_load_falls_back_to_backup_file() {
        let storage = MockStorage::with_read_only(&["locked.csv"]);
        let mut config = MockConfig::new("companies.csv");
        config.output_path = Some("locked.csv".to_string());
        let pipeline = BatchPipeline::new(storage.clone(), config, offline_enricher(false));
        let result = TransformResult {
            records: vec![],
            degraded: 0,
            csv_output: write_csv(&[]).unwrap(),
        };

        let path = pipeline.load(&result).await.unwrap();

        assert!(path.starts_with("enriched_companies_backup_"));
        assert!(path.ends_with(".csv"));
        assert_eq!(storage.paths().await, vec![path.clone()]);
        assert_eq!(storage.get_file(&path).await.unwrap(), result.csv_output);
    }
}
