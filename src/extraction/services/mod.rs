//! Extraction orchestration services.

mod extractor;

pub use extractor::{ExtractionReport, ExtractionSettings, ExtractionStatus, TaskExtractor};
