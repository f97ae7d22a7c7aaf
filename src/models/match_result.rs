//! Match result emitted by the template matcher. Ephemeral, never persisted.

use rust_decimal::Decimal;
use serde::Serialize;

/// Why a template did not match a message.
///
/// Carried on negative results so the dashboard's Check Response tool can
/// explain a "no response data found" outcome instead of a bare null.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoMatchReason {
    /// The `txt_required` gate text is not present in the message.
    RequiredTextMissing { txt_required: String },
    /// The `txt_not_required` gate text is present in the message.
    DisqualifyingTextPresent { txt_not_required: String },
    /// A configured marker was not found at or after the scan cursor.
    MarkerNotFound { field: &'static str, marker: String },
    /// A numeric field's slice did not parse as a decimal number.
    InvalidNumber { field: &'static str, value: String },
}

/// Structured result of applying one response group to one raw message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchResult {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_bal: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lapu_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roffer: Option<String>,
    /// Echo of the evaluated message for audit display.
    pub raw_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NoMatchReason>,
}

impl MatchResult {
    /// A negative result carrying the reason the template was rejected.
    pub fn no_match(raw_message: &str, reason: NoMatchReason) -> Self {
        Self {
            matched: false,
            status_code: None,
            status_label: None,
            number: None,
            amount: None,
            sn: None,
            ref_id: None,
            module_bal: None,
            lapu_id: None,
            roffer: None,
            raw_message: raw_message.to_string(),
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_serializes_reason() {
        let result = MatchResult::no_match(
            "PAYMENT OK",
            NoMatchReason::RequiredTextMissing {
                txt_required: "RCH".to_string(),
            },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["matched"], false);
        assert_eq!(json["raw_message"], "PAYMENT OK");
        assert_eq!(json["reason"]["kind"], "required_text_missing");
        assert_eq!(json["reason"]["txt_required"], "RCH");
        // absent fields are omitted, not null
        assert!(json.get("number").is_none());
        assert!(json.get("status_code").is_none());
    }

    #[test]
    fn marker_not_found_reason_names_the_field() {
        let reason = NoMatchReason::MarkerNotFound {
            field: "amount",
            marker: "AMT:".to_string(),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["kind"], "marker_not_found");
        assert_eq!(json["field"], "amount");
        assert_eq!(json["marker"], "AMT:");
    }
}
