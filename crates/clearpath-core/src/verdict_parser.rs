//! Tolerant parsing of the text-generation reply.
//!
//! The generator is asked for `VERDICT: <RED|YELLOW>\nSUMMARY: <text>` but
//! nothing guarantees it complies, so parsing degrades instead of failing:
//!
//! - Classification is RED iff the verdict token is followed (after any run
//!   of whitespace, `:`, `*`, `_`, `-`, `=`) by `RED`, anywhere in the reply,
//!   case-insensitively. Everything else is YELLOW.
//! - The summary is the text after the last `SUMMARY:` marker, or the whole
//!   trimmed reply when there is no marker.
//! - Only an empty or all-whitespace reply is an error.

use regex::Regex;

use crate::domain::{RiskLevel, RiskVerdict};
use crate::error::{ClearPathError, Result};
use crate::prompt::VerdictFormat;

/// `SUMMARY:` with optional Markdown emphasis, e.g. `**SUMMARY:**` or `SUMMARY :`.
const SUMMARY_PATTERN: &str = r"(?i)SUMMARY[ *]*:\**";

/// Parses free-form replies into a [`RiskVerdict`].
#[derive(Debug, Clone)]
pub struct VerdictParser {
    format: VerdictFormat,
    red_pattern: Option<Regex>,
    summary_pattern: Option<Regex>,
}

impl Default for VerdictParser {
    fn default() -> Self {
        Self::new(VerdictFormat::default())
    }
}

impl VerdictParser {
    pub fn new(format: VerdictFormat) -> Self {
        let red_pattern = format!(r"(?i){}[\s:*_=-]*RED", regex::escape(&format.verdict_token));
        VerdictParser {
            red_pattern: Regex::new(&red_pattern).ok(),
            summary_pattern: Regex::new(SUMMARY_PATTERN).ok(),
            format,
        }
    }

    pub fn format(&self) -> &VerdictFormat {
        &self.format
    }

    pub fn parse(&self, raw_reply: &str) -> Result<RiskVerdict> {
        let trimmed = raw_reply.trim();
        if trimmed.is_empty() {
            return Err(ClearPathError::EmptyReply);
        }

        let level = self.classify(trimmed);
        let summary = self.extract_summary(trimmed).unwrap_or(trimmed);

        Ok(RiskVerdict::new(level, summary))
    }

    /// RED iff some occurrence of the verdict token is followed by `RED`.
    pub fn classify(&self, reply: &str) -> RiskLevel {
        match &self.red_pattern {
            Some(re) if re.is_match(reply) => RiskLevel::Red,
            _ => RiskLevel::Yellow,
        }
    }

    /// Text after the last `SUMMARY:` marker, trimmed, if non-empty.
    fn extract_summary<'a>(&self, reply: &'a str) -> Option<&'a str> {
        let marker = self.summary_pattern.as_ref()?.find_iter(reply).last()?;
        let summary = reply[marker.end()..].trim();
        (!summary.is_empty()).then_some(summary)
    }
}
