pub mod export;
pub mod ingest;
pub mod payload;

pub use export::{export_prefix, OutputSeries, OUTPUT_SERIES_COUNT};
pub use payload::{StreamAncillary, StreamPayload, StreamSource};
