//! RateLab Runner — batch orchestration around the pure engine.
//!
//! This crate builds on `ratelab-core` to provide:
//! - TOML config loading and validation
//! - CSV market, availability and event loading, joined into signals
//! - Parallel batch execution with output identical to `compute`
//! - Batch summaries and JSON/CSV export

pub mod batch;
pub mod loader;
pub mod report;

pub use batch::BatchRunner;
pub use loader::{
    assemble_signals, load_availability, load_config, load_events, load_market, AvailabilityRow,
    LoadError, MarketEvent, MarketRow,
};
pub use report::{export_csv, export_json, to_csv, to_json, BatchSummary, ExportError};
