//! Structured observability hooks for the recall lookup lifecycle.
//!
//! This module provides:
//! - A lookup-scoped span via [`lookup_span`], tagged with a fresh lookup id
//! - Emission functions for key events: start, registry fetch, generation, finish, failure
//!
//! Events are emitted at `info!` level (failures at `warn!`). Verbosity is
//! controlled by `RUST_LOG`; JSON output is selected in [`crate::init_tracing`].

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{RiskLevel, VehicleIdentifier};

/// Create a span for one lookup. Attach it with `tracing::Instrument`.
///
/// # Example
///
/// ```ignore
/// let span = lookup_span(&Uuid::new_v4(), &vehicle);
/// pipeline.run(&vehicle).instrument(span).await?;
/// ```
pub fn lookup_span(lookup_id: &Uuid, vehicle: &VehicleIdentifier) -> tracing::Span {
    tracing::info_span!(
        "clearpath.lookup",
        lookup_id = %lookup_id,
        year = %vehicle.year,
        make = %vehicle.make,
        model = %vehicle.model,
    )
}

/// Emit event: lookup started.
pub fn emit_lookup_started(vehicle: &VehicleIdentifier) {
    info!(event = "lookup.started", vehicle = %vehicle);
}

/// Emit event: registry answered with `record_count` records.
pub fn emit_registry_fetched(record_count: usize, duration_ms: u64) {
    info!(
        event = "registry.fetched",
        record_count = record_count,
        duration_ms = duration_ms,
    );
}

/// Emit event: one text-generation call completed.
pub fn emit_generation_completed(prompt_chars: usize, reply_chars: usize, duration_ms: u64) {
    info!(
        event = "generation.completed",
        prompt_chars = prompt_chars,
        reply_chars = reply_chars,
        duration_ms = duration_ms,
    );
}

/// Emit event: lookup finished. `level` is `None` when no recalls were found.
pub fn emit_lookup_finished(record_count: usize, level: Option<RiskLevel>, duration_ms: u64) {
    info!(
        event = "lookup.finished",
        record_count = record_count,
        level = level.map(|l| l.as_str()).unwrap_or("NONE"),
        duration_ms = duration_ms,
    );
}

/// Emit event: lookup failed (warning level).
pub fn emit_lookup_failed(stage: &str, error: &dyn std::fmt::Display) {
    warn!(event = "lookup.failed", stage = %stage, error = %error);
}
