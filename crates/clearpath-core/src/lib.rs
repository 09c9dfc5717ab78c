//! ClearPath Core Library
//!
//! Looks up vehicle safety recalls from the recall registry and asks a
//! text-generation service for a plain-language RED/YELLOW risk verdict.
//!
//! ## Key Components
//!
//! - `RecallClient`: fetches recall records over HTTPS (`RecallFetcher`)
//! - `PromptBuilder`: renders records into the classification prompt
//! - `GeminiClient`: the shipped `TextGenerator`
//! - `VerdictParser`: tolerant reply parsing into a `RiskVerdict`
//! - `RiskPipeline`: one lookup, start to finish

pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod fakes;
pub mod generation;
pub mod metrics;
pub mod obs;
pub mod pipeline;
pub mod prompt;
pub mod registry;
pub mod telemetry;
pub mod verdict_parser;

pub use config::{ClearPathConfig, GeminiConfig, RegistryConfig};
pub use domain::{RecallRecord, RiskLevel, RiskVerdict, VehicleIdentifier};
pub use error::{ClearPathError, Result};
pub use export::RecallTable;
pub use generation::{GeminiClient, TextGenerator};
pub use metrics::{LookupOutcome, MetricsSnapshot, METRICS};
pub use obs::{
    emit_generation_completed, emit_lookup_failed, emit_lookup_finished, emit_lookup_started,
    emit_registry_fetched, lookup_span,
};
pub use pipeline::{PipelineResult, RecallExplanation, RiskPipeline, DEFAULT_EXPLAIN_LIMIT};
pub use prompt::{PromptBuilder, VerdictFormat};
pub use registry::{parse_results, RecallClient, RecallFetcher};
pub use telemetry::{init_tracing, LogFormat};
pub use verdict_parser::VerdictParser;

/// ClearPath version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
