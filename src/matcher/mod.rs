//! Template matcher: applies one response group's markers to one raw message.
//!
//! The matcher is a pure, synchronous function over (template, message) with
//! no I/O and no shared state, so it is safe to evaluate concurrently for
//! unrelated inputs. Markers are literal substrings and match
//! case-sensitively. Extraction walks the message left to right: each field's
//! before-marker is searched at or after the cursor left by the previous
//! field, which keeps repeated markers (multiple colons, repeated separators)
//! deterministic and stops a later field from matching text that belongs to
//! an earlier one.

use rust_decimal::Decimal;

use crate::models::match_result::{MatchResult, NoMatchReason};
use crate::models::response_group::{ExtractField, ResponseGroup, TxnStatus};

/// Apply `group`'s template to `message`.
///
/// Negative outcomes are normal results, never errors: a failed gate, a
/// missing marker, or a non-numeric amount slice all produce
/// `matched: false` with a reason.
pub fn match_template(group: &ResponseGroup, message: &str) -> MatchResult {
    if !message.contains(&group.txt_required) {
        return MatchResult::no_match(
            message,
            NoMatchReason::RequiredTextMissing {
                txt_required: group.txt_required.clone(),
            },
        );
    }

    if let Some(disqualifier) = group.txt_not_required.as_deref() {
        if !disqualifier.is_empty() && message.contains(disqualifier) {
            return MatchResult::no_match(
                message,
                NoMatchReason::DisqualifyingTextPresent {
                    txt_not_required: disqualifier.to_string(),
                },
            );
        }
    }

    let mut number = None;
    let mut amount = None;
    let mut sn = None;
    let mut ref_id = None;
    let mut module_bal = None;
    let mut lapu_id = None;
    let mut roffer = None;

    let mut cursor = 0usize;
    for field in ExtractField::ALL {
        // Fields without a complete marker pair are not extracted. Stored
        // groups have passed validation, so a skipped mandatory field only
        // occurs for templates built outside the CRUD path.
        let Some((before, after)) = group.marker_pair(field) else {
            continue;
        };

        let Some(before_idx) = find_from(message, before, cursor) else {
            return MatchResult::no_match(
                message,
                NoMatchReason::MarkerNotFound {
                    field: field.key(),
                    marker: before.to_string(),
                },
            );
        };
        let value_start = before_idx + before.len();

        let Some(after_idx) = find_from(message, after, value_start) else {
            return MatchResult::no_match(
                message,
                NoMatchReason::MarkerNotFound {
                    field: field.key(),
                    marker: after.to_string(),
                },
            );
        };

        let value = message[value_start..after_idx].trim();
        cursor = after_idx + after.len();

        if field.is_numeric() {
            let Ok(parsed) = value.parse::<Decimal>() else {
                return MatchResult::no_match(
                    message,
                    NoMatchReason::InvalidNumber {
                        field: field.key(),
                        value: value.to_string(),
                    },
                );
            };
            match field {
                ExtractField::Amount => amount = Some(parsed),
                ExtractField::ModuleBal => module_bal = Some(parsed),
                _ => unreachable!("only amount and module_bal are numeric"),
            }
        } else {
            let value = value.to_string();
            match field {
                ExtractField::Number => number = Some(value),
                ExtractField::Sn => sn = Some(value),
                ExtractField::RefId => ref_id = Some(value),
                ExtractField::LapuId => lapu_id = Some(value),
                ExtractField::Roffer => roffer = Some(value),
                _ => unreachable!("amount and module_bal handled above"),
            }
        }
    }

    MatchResult {
        matched: true,
        status_code: Some(group.status_code),
        status_label: TxnStatus::from_code(group.status_code).map(|s| s.label()),
        number,
        amount,
        sn,
        ref_id,
        module_bal,
        lapu_id,
        roffer,
        raw_message: message.to_string(),
        reason: None,
    }
}

/// First occurrence of `needle` at or after byte offset `from`.
///
/// `from` is always a marker boundary produced by a previous `find`, so it
/// sits on a char boundary.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack[from..].find(needle).map(|idx| from + idx)
}
