//! Vehicle identifiers.

use serde::{Deserialize, Serialize};

use crate::error::{ClearPathError, Result};

/// The (year, make, model) triple a recall lookup runs against.
///
/// Fields are free text as entered by the user. The only validation is
/// [`VehicleIdentifier::ensure_lookup_ready`], which rejects blank fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleIdentifier {
    pub year: String,
    pub make: String,
    pub model: String,
}

impl VehicleIdentifier {
    pub fn new(year: impl Into<String>, make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            make: make.into(),
            model: model.into(),
        }
    }

    /// Fail with `InvalidIdentifier` if any field is empty after trimming.
    pub fn ensure_lookup_ready(&self) -> Result<()> {
        for (field, value) in [
            ("year", &self.year),
            ("make", &self.make),
            ("model", &self.model),
        ] {
            if value.trim().is_empty() {
                return Err(ClearPathError::InvalidIdentifier { field });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for VehicleIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.year, self.make, self.model)
    }
}
