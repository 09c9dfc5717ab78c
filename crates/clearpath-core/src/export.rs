//! Tabular projection of recall records for display and CSV export.
//!
//! Columns are the four essential fields followed by the union of
//! pass-through keys across all records, sorted by key. A record lacking a
//! pass-through key gets an empty cell.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::domain::RecallRecord;
use crate::error::Result;

const LEADING_COLUMNS: [&str; 4] = ["Component", "Summary", "Action Number", "Report Date"];

/// Rows of strings with a header, built from recall records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecallTable {
    pub fn from_records(records: &[RecallRecord]) -> Self {
        let extra_keys: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.extra.keys().map(String::as_str))
            .collect();

        let headers = LEADING_COLUMNS
            .iter()
            .copied()
            .chain(extra_keys.iter().copied())
            .map(str::to_string)
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                let mut row = vec![
                    record.component.clone(),
                    record.summary.clone(),
                    record.action_number.clone(),
                    record.report_date.clone(),
                ];
                row.extend(
                    extra_keys
                        .iter()
                        .map(|key| record.extra.get(*key).map(cell_text).unwrap_or_default()),
                );
                row
            })
            .collect();

        RecallTable { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as RFC 4180 CSV with CRLF line endings.
    pub fn to_csv(&self) -> String {
        std::iter::once(&self.headers)
            .chain(self.rows.iter())
            .map(|row| {
                row.iter()
                    .map(|cell| csv_field(cell))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .map(|line| line + "\r\n")
            .collect()
    }

    pub fn write_csv(&self, mut writer: impl Write) -> Result<()> {
        writer.write_all(self.to_csv().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}

/// Display text for a pass-through value; strings are unquoted.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_field(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
