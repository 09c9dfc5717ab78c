//! Recall-risk classification pipeline
//!
//! Orchestrates one lookup: registry fetch, prompt rendering, a single
//! text-generation call, and verdict parsing. Holds no state across runs,
//! so one pipeline can serve concurrent lookups.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::config::ClearPathConfig;
use crate::domain::{RecallRecord, RiskVerdict, VehicleIdentifier};
use crate::error::{ClearPathError, Result};
use crate::generation::{GeminiClient, TextGenerator};
use crate::metrics::{LookupOutcome, METRICS};
use crate::obs;
use crate::prompt::{PromptBuilder, VerdictFormat};
use crate::registry::{RecallClient, RecallFetcher};
use crate::verdict_parser::VerdictParser;

/// Number of recalls explained individually when no limit is given.
pub const DEFAULT_EXPLAIN_LIMIT: usize = 3;

/// Outcome of one lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineResult {
    /// The registry lists no recalls; no generation call was made
    NoRecalls,
    /// Recalls exist; `verdict` covers all of them
    RecallsFound {
        records: Vec<RecallRecord>,
        verdict: RiskVerdict,
    },
}

impl PipelineResult {
    pub fn records(&self) -> &[RecallRecord] {
        match self {
            PipelineResult::NoRecalls => &[],
            PipelineResult::RecallsFound { records, .. } => records,
        }
    }

    pub fn verdict(&self) -> Option<&RiskVerdict> {
        match self {
            PipelineResult::NoRecalls => None,
            PipelineResult::RecallsFound { verdict, .. } => Some(verdict),
        }
    }
}

/// Plain-language explanation of one recall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecallExplanation {
    pub component: String,
    pub action_number: String,
    pub explanation: String,
}

/// Wires the registry, prompt builder, generator and parser together.
pub struct RiskPipeline {
    fetcher: Arc<dyn RecallFetcher>,
    generator: Arc<dyn TextGenerator>,
    prompt_builder: PromptBuilder,
    parser: VerdictParser,
}

impl RiskPipeline {
    /// Pipeline with the default `VERDICT:` reply format.
    pub fn new(fetcher: Arc<dyn RecallFetcher>, generator: Arc<dyn TextGenerator>) -> Self {
        RiskPipeline {
            fetcher,
            generator,
            prompt_builder: PromptBuilder::default(),
            parser: VerdictParser::default(),
        }
    }

    /// Use `format` for both the requested skeleton and the parser.
    pub fn with_format(mut self, format: VerdictFormat) -> Self {
        self.prompt_builder = PromptBuilder::new(format.clone());
        self.parser = VerdictParser::new(format);
        self
    }

    /// Build the HTTP-backed pipeline described by `config`.
    pub fn from_config(config: &ClearPathConfig) -> Result<Self> {
        let fetcher = RecallClient::new(config.registry.clone())?;
        let generator = GeminiClient::new(config.gemini.clone())?;
        Ok(Self::new(Arc::new(fetcher), Arc::new(generator))
            .with_format(VerdictFormat::with_token(config.verdict_token())))
    }

    pub fn format(&self) -> &VerdictFormat {
        self.prompt_builder.format()
    }

    /// Look up recalls for `vehicle` and classify them.
    ///
    /// At most one registry call and one generation call. Registry and
    /// generation errors propagate unchanged.
    pub async fn run(&self, vehicle: &VehicleIdentifier) -> Result<PipelineResult> {
        vehicle.ensure_lookup_ready()?;
        let span = obs::lookup_span(&Uuid::new_v4(), vehicle);
        let result = self.run_inner(vehicle).instrument(span).await;
        METRICS.record_lookup(lookup_outcome(&result));
        result
    }

    async fn run_inner(&self, vehicle: &VehicleIdentifier) -> Result<PipelineResult> {
        let started = Instant::now();
        obs::emit_lookup_started(vehicle);

        let fetch_started = Instant::now();
        let records = self.fetcher.fetch(vehicle).await.inspect_err(|e| {
            obs::emit_lookup_failed("registry", e);
        })?;
        obs::emit_registry_fetched(records.len(), elapsed_ms(fetch_started));

        if records.is_empty() {
            obs::emit_lookup_finished(0, None, elapsed_ms(started));
            return Ok(PipelineResult::NoRecalls);
        }

        let prompt = self.prompt_builder.build(vehicle, &records);
        debug!(prompt_chars = prompt.len(), "classification prompt rendered");

        let reply = self.generate(&prompt).await.inspect_err(|e| {
            obs::emit_lookup_failed("generation", e);
        })?;

        let verdict = self.parser.parse(&reply).inspect_err(|e| {
            obs::emit_lookup_failed("parse", e);
        })?;

        obs::emit_lookup_finished(records.len(), Some(verdict.level), elapsed_ms(started));
        Ok(PipelineResult::RecallsFound { records, verdict })
    }

    /// Explain the first `limit` records one by one, in order.
    ///
    /// One generation call per explained record; stops at the first failure.
    pub async fn explain(
        &self,
        records: &[RecallRecord],
        limit: usize,
    ) -> Result<Vec<RecallExplanation>> {
        let mut explanations = Vec::with_capacity(limit.min(records.len()));

        for record in records.iter().take(limit) {
            let prompt = self.prompt_builder.build_explanation(record);
            let reply = self.generate(&prompt).await?;
            let explanation = reply.trim();
            if explanation.is_empty() {
                return Err(ClearPathError::EmptyReply);
            }
            explanations.push(RecallExplanation {
                component: record.component.clone(),
                action_number: record.action_number.clone(),
                explanation: explanation.to_string(),
            });
        }

        Ok(explanations)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        METRICS.record_generation_call();
        let reply = self.generator.generate(prompt).await?;
        obs::emit_generation_completed(prompt.len(), reply.len(), elapsed_ms(started));
        Ok(reply)
    }
}

fn lookup_outcome(result: &Result<PipelineResult>) -> LookupOutcome {
    match result {
        Ok(PipelineResult::NoRecalls) => LookupOutcome::NoRecalls,
        Ok(PipelineResult::RecallsFound { records, verdict }) => LookupOutcome::Classified {
            records: records.len(),
            level: verdict.level,
        },
        Err(_) => LookupOutcome::Failed,
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
