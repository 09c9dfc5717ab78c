//! Prompt rendering for the risk classification call.
//!
//! The rubric and reply skeleton are constant text; only the vehicle line
//! and the recall list vary between calls. Rendering is pure.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_VERDICT_TOKEN;
use crate::domain::{RecallRecord, VehicleIdentifier};

/// Reply format shared by the prompt builder and the verdict parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictFormat {
    /// Token preceding the RED/YELLOW classification, e.g. `VERDICT` or `RISK`
    pub verdict_token: String,
    /// Upper bound on summary length, in sentences
    pub max_summary_sentences: usize,
}

impl Default for VerdictFormat {
    fn default() -> Self {
        VerdictFormat {
            verdict_token: DEFAULT_VERDICT_TOKEN.to_string(),
            max_summary_sentences: 3,
        }
    }
}

impl VerdictFormat {
    /// A blank token keeps the default.
    pub fn with_token(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return Self::default();
        }
        VerdictFormat {
            verdict_token: token.to_ascii_uppercase(),
            ..Self::default()
        }
    }
}

const ROLE: &str = "You are a vehicle safety advisor. You explain government safety \
recalls to car owners who are not mechanics, using plain words and no jargon.";

const RUBRIC: &str = "\
Classify the combined risk of ALL recalls above as exactly one level:

RED: at least one defect can cause a crash, fire, loss of steering, loss of braking, \
loss of drive power, or injury without warning. The owner should stop or limit \
driving until the repair is done.
YELLOW: every defect needs a repair appointment but none poses an immediate danger \
in normal driving (labels, manuals, software notices, minor trim or comfort parts).

Calibration examples:
- \"Brake fluid may leak, reducing braking performance\" -> RED
- \"Airbag inflator may rupture, striking occupants with metal fragments\" -> RED
- \"Fuel line may crack and leak near an ignition source\" -> RED
- \"Tire placard lists an incorrect load rating\" -> YELLOW
- \"Owner's manual omits towing instructions\" -> YELLOW

If any single recall meets the RED criteria, the verdict is RED.";

/// Renders recall records into the classification prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    format: VerdictFormat,
}

impl PromptBuilder {
    pub fn new(format: VerdictFormat) -> Self {
        PromptBuilder { format }
    }

    pub fn format(&self) -> &VerdictFormat {
        &self.format
    }

    /// Render one `- {component}: {summary}` line per record, input order kept.
    pub fn recall_lines(records: &[RecallRecord]) -> String {
        records
            .iter()
            .map(|r| format!("- {}: {}", r.component, r.summary))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the single classification prompt for `vehicle`.
    pub fn build(&self, vehicle: &VehicleIdentifier, records: &[RecallRecord]) -> String {
        format!(
            "{ROLE}\n\n\
Vehicle: {vehicle}\n\n\
Recalls on file:\n{lines}\n\n\
{RUBRIC}\n\n\
Use exactly one of the words RED or YELLOW. The summary must be factual, \
at most {sentences} sentences, and say what can fail and what the owner should do.\n\n\
Reply in exactly this format and nothing else:\n\
{token}: <RED|YELLOW>\n\
SUMMARY: <text>",
            lines = Self::recall_lines(records),
            sentences = self.format.max_summary_sentences,
            token = self.format.verdict_token,
        )
    }

    /// Build a plain-language explanation prompt for one recall.
    pub fn build_explanation(&self, record: &RecallRecord) -> String {
        format!(
            "Explain this car recall simply for a non-expert.\n\n\
Component: {}\n\
Recall: {}",
            record.component, record.summary
        )
    }
}
