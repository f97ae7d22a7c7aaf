//! Check-response tester and multi-group classification.
//!
//! Both paths are dry runs: they resolve templates, run the matcher, and
//! package the outcome. No transaction is created or mutated here.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matcher;
use crate::models::match_result::{MatchResult, NoMatchReason};
use crate::store::TemplateStore;

/// Request body for the single-group check tool.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    pub message: String,
    /// Name of the group whose template to apply.
    pub group: String,
}

/// Outcome of a single-group check.
///
/// `response` is null on no-match, which the dashboard renders as
/// "no response data found"; `reason` explains the negative.
#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    pub response: Option<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NoMatchReason>,
}

/// Request body for multi-group classification.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    pub message: String,
}

/// Outcome of classifying a message against every stored group.
#[derive(Debug, Serialize)]
pub struct ClassifyOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub response: Option<MatchResult>,
}

/// Apply one named group's template to a message.
pub fn check(store: &TemplateStore, request: &CheckRequest) -> Result<CheckOutcome, AppError> {
    let group = store.find_by_name(&request.group).ok_or_else(|| {
        AppError::NotFound(format!("Response group '{}' not found", request.group))
    })?;

    let result = matcher::match_template(&group, &request.message);
    tracing::debug!(
        group_name = %group.group_name,
        matched = result.matched,
        "Checked response"
    );

    if result.matched {
        Ok(CheckOutcome {
            response: Some(result),
            reason: None,
        })
    } else {
        Ok(CheckOutcome {
            response: None,
            reason: result.reason,
        })
    }
}

/// Try every stored group against a message, in group_name order, returning
/// the first match. This is the inference path used when responses arrive
/// without an explicit group selection.
pub fn classify(store: &TemplateStore, request: &ClassifyRequest) -> ClassifyOutcome {
    for group in store.all() {
        let result = matcher::match_template(&group, &request.message);
        if result.matched {
            tracing::debug!(group_name = %group.group_name, "Classified response");
            return ClassifyOutcome {
                group_name: Some(group.group_name),
                response: Some(result),
            };
        }
    }

    tracing::debug!("No response group matched");
    ClassifyOutcome {
        group_name: None,
        response: None,
    }
}
