//! Recall records as published by the recall registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ClearPathError, Result};

/// One government-issued recall notice.
///
/// Sourced verbatim from the registry and never mutated. Fields other than
/// the four essential ones are carried in `extra` for tabular display only.
/// Both the registry spelling (`Component`, `NHTSACampaignNumber`, ...) and
/// the camel-case spelling (`component`, `actionNumber`, ...) are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallRecord {
    /// Affected part, e.g. `AIR BAGS`
    #[serde(alias = "Component")]
    pub component: String,
    /// Technical description of the defect
    #[serde(alias = "Summary")]
    pub summary: String,
    /// Registry campaign identifier (empty when the source omits it)
    #[serde(
        default,
        alias = "NHTSACampaignNumber",
        alias = "actionNumber",
        deserialize_with = "string_or_null"
    )]
    pub action_number: String,
    /// Report date exactly as the source formats it
    #[serde(
        default,
        alias = "ReportReceivedDate",
        alias = "reportDate",
        deserialize_with = "string_or_null"
    )]
    pub report_date: String,
    /// Opaque pass-through fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RecallRecord {
    pub fn new(component: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            summary: summary.into(),
            action_number: String::new(),
            report_date: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_action_number(mut self, action_number: impl Into<String>) -> Self {
        self.action_number = action_number.into();
        self
    }

    pub fn with_report_date(mut self, report_date: impl Into<String>) -> Self {
        self.report_date = report_date.into();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Decode element `index` of the registry's `results` array.
    pub fn from_json(index: usize, value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            ClearPathError::RegistryMalformedResponse(format!("results[{index}]: {e}"))
        })
    }
}

fn string_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_spelling_is_accepted() {
        let raw = json!({
            "Manufacturer": "Tesla, Inc.",
            "NHTSACampaignNumber": "20V001000",
            "ReportReceivedDate": "07/01/2020",
            "Component": "AIR BAGS",
            "Summary": "The airbag may deploy with excess force.",
            "Remedy": "Dealers will replace the inflator."
        });

        let record = RecallRecord::from_json(0, raw).unwrap();
        assert_eq!(record.component, "AIR BAGS");
        assert_eq!(record.summary, "The airbag may deploy with excess force.");
        assert_eq!(record.action_number, "20V001000");
        assert_eq!(record.report_date, "07/01/2020");
        assert_eq!(record.extra.len(), 2);
        assert_eq!(record.extra["Remedy"], json!("Dealers will replace the inflator."));
        assert!(!record.extra.contains_key("Component"));
    }

    #[test]
    fn test_camel_case_spelling_is_accepted() {
        let raw = json!({
            "component": "AIRBAG",
            "summary": "Airbag may deploy with excess force.",
            "actionNumber": "A-1",
            "reportDate": "2020-07-01"
        });

        let record = RecallRecord::from_json(0, raw).unwrap();
        let expected = RecallRecord::new("AIRBAG", "Airbag may deploy with excess force.")
            .with_action_number("A-1")
            .with_report_date("2020-07-01");
        assert_eq!(record, expected);
    }

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let raw = json!({"component": "AIRBAG", "summary": "Airbag may deploy."});
        let record = RecallRecord::from_json(0, raw).unwrap();
        assert!(record.action_number.is_empty());
        assert!(record.report_date.is_empty());
    }

    #[test]
    fn test_missing_component_is_malformed() {
        let raw = json!({"summary": "Airbag may deploy."});
        let err = RecallRecord::from_json(3, raw).unwrap_err();
        match err {
            ClearPathError::RegistryMalformedResponse(msg) => {
                assert!(msg.contains("results[3]"));
                assert!(msg.contains("component"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_string_summary_is_malformed() {
        let raw = json!({"component": "AIRBAG", "summary": 42});
        let err = RecallRecord::from_json(0, raw).unwrap_err();
        assert!(matches!(err, ClearPathError::RegistryMalformedResponse(msg) if msg.contains("invalid type")));
    }

    #[test]
    fn test_non_object_record_is_malformed() {
        let err = RecallRecord::from_json(1, json!("AIRBAG")).unwrap_err();
        assert!(matches!(err, ClearPathError::RegistryMalformedResponse(_)));
    }

    #[test]
    fn test_null_optional_fields_default_to_empty() {
        let raw = json!({
            "Component": "AIRBAG",
            "Summary": "Airbag may deploy.",
            "NHTSACampaignNumber": null,
            "parkIt": null
        });
        let record = RecallRecord::from_json(0, raw).unwrap();
        assert!(record.action_number.is_empty());
        assert_eq!(record.extra["parkIt"], Value::Null);
    }

    #[test]
    fn test_non_string_campaign_number_is_malformed() {
        let raw = json!({"Component": "AIRBAG", "Summary": "x", "NHTSACampaignNumber": 7});
        let err = RecallRecord::from_json(0, raw).unwrap_err();
        assert!(matches!(err, ClearPathError::RegistryMalformedResponse(_)));
    }

    #[test]
    fn test_serialize_flattens_extra_fields() {
        let record = RecallRecord::new("AIRBAG", "Airbag may deploy.")
            .with_extra("parkIt", json!(false));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["component"], "AIRBAG");
        assert_eq!(value["parkIt"], json!(false));
    }
}
