//! Risk verdicts.

use serde::{Deserialize, Serialize};

/// Aggregate risk classification for one vehicle.
///
/// There is no "green" level: a verdict only exists when recalls were found.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Stop driving / immediate danger
    Red,
    /// Needs a repair appointment, not an immediate hazard
    Yellow,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Red => "RED",
            RiskLevel::Yellow => "YELLOW",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification plus a plain-language summary, derived once per lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskVerdict {
    pub level: RiskLevel,
    pub summary: String,
}

impl RiskVerdict {
    pub fn new(level: RiskLevel, summary: impl Into<String>) -> Self {
        Self {
            level,
            summary: summary.into(),
        }
    }

    pub fn is_red(&self) -> bool {
        self.level == RiskLevel::Red
    }
}
