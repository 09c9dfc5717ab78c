//! In-memory fakes for the pipeline collaborators (testing only)
//!
//! Provides `StaticRecallFetcher`, `FailingRecallFetcher` and
//! `ScriptedGenerator`, which record their calls so tests can assert on
//! how often and with what the pipeline reached out.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{RecallRecord, VehicleIdentifier};
use crate::error::{ClearPathError, Result};
use crate::generation::TextGenerator;
use crate::registry::RecallFetcher;

// ---------------------------------------------------------------------------
// StaticRecallFetcher
// ---------------------------------------------------------------------------

/// Returns the same records for every vehicle.
#[derive(Debug, Default)]
pub struct StaticRecallFetcher {
    records: Vec<RecallRecord>,
    calls: Mutex<Vec<VehicleIdentifier>>,
}

impl StaticRecallFetcher {
    pub fn new(records: Vec<RecallRecord>) -> Self {
        Self {
            records,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Vehicles passed to `fetch`, in call order.
    pub fn calls(&self) -> Vec<VehicleIdentifier> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecallFetcher for StaticRecallFetcher {
    async fn fetch(&self, vehicle: &VehicleIdentifier) -> Result<Vec<RecallRecord>> {
        self.calls.lock().unwrap().push(vehicle.clone());
        Ok(self.records.clone())
    }
}

// ---------------------------------------------------------------------------
// FailingRecallFetcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum FailureKind {
    Unavailable,
    Malformed,
}

/// Fails every fetch with a registry error.
#[derive(Debug)]
pub struct FailingRecallFetcher {
    kind: FailureKind,
    message: String,
}

impl FailingRecallFetcher {
    pub fn unavailable(message: &str) -> Self {
        Self {
            kind: FailureKind::Unavailable,
            message: message.to_string(),
        }
    }

    pub fn malformed(message: &str) -> Self {
        Self {
            kind: FailureKind::Malformed,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl RecallFetcher for FailingRecallFetcher {
    async fn fetch(&self, _vehicle: &VehicleIdentifier) -> Result<Vec<RecallRecord>> {
        Err(match self.kind {
            FailureKind::Unavailable => ClearPathError::RegistryUnavailable(self.message.clone()),
            FailureKind::Malformed => {
                ClearPathError::RegistryMalformedResponse(self.message.clone())
            }
        })
    }
}

// ---------------------------------------------------------------------------
// ScriptedGenerator
// ---------------------------------------------------------------------------

/// Replays scripted replies in order, then falls back to a fixed reply.
///
/// With no fallback, calls past the end of the script fail with
/// `GenerationUnavailable`.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String>>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer every prompt with `reply`.
    pub fn always(reply: &str) -> Self {
        Self {
            fallback: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        self.fallback.clone().ok_or_else(|| {
            ClearPathError::GenerationUnavailable("scripted generator exhausted".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_generator_replays_then_falls_back() {
        let generator = ScriptedGenerator {
            fallback: Some("later".to_string()),
            ..ScriptedGenerator::new(vec![Ok("first".to_string())])
        };

        assert_eq!(generator.generate("p1").await.unwrap(), "first");
        assert_eq!(generator.generate("p2").await.unwrap(), "later");
        assert_eq!(generator.prompts(), vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_exhausted_script_fails() {
        let generator = ScriptedGenerator::new(vec![]);
        let err = generator.generate("p").await.unwrap_err();
        assert!(matches!(err, ClearPathError::GenerationUnavailable(_)));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_fetcher_kinds() {
        let vehicle = VehicleIdentifier::new("2018", "Tesla", "Model 3");
        assert!(matches!(
            FailingRecallFetcher::unavailable("down").fetch(&vehicle).await,
            Err(ClearPathError::RegistryUnavailable(_))
        ));
        assert!(matches!(
            FailingRecallFetcher::malformed("bad").fetch(&vehicle).await,
            Err(ClearPathError::RegistryMalformedResponse(_))
        ));
    }
}
