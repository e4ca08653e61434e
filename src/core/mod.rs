pub mod analysis;
pub mod batch;
pub mod content;
pub mod enricher;
pub mod etl;
pub mod website;

pub use crate::domain::model::{
    AnalysisResult, BatchReport, EnrichedRecord, EnrichmentOutcome, InputRecord, TransformResult,
};
pub use crate::domain::ports::{Analyzer, ConfigProvider, Pipeline, Storage, WebClient};
pub use crate::utils::error::Result;
