use crate::core::Pipeline;
use crate::domain::model::BatchReport;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Input errors abort before any enrichment; a failed write still returns the records.
    pub async fn run(&self) -> Result<BatchReport> {
        tracing::info!("🚀 Starting enrichment batch");

        let inputs = self.pipeline.extract().await?;
        self.monitor.log_phase("extract", inputs.len());

        let result = self.pipeline.transform(inputs).await?;
        self.monitor.log_phase("enrich", result.records.len());

        let output_path = match self.pipeline.load(&result).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("❌ Could not write results: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                None
            }
        };
        self.monitor.log_phase("write", result.records.len());
        self.monitor.log_final_stats();

        Ok(BatchReport {
            records: result.records,
            degraded: result.degraded,
            output_path,
        })
    }
}
