//! Reasoning-trace removal.
//!
//! Reasoning models wrap their deliberation in a marker pair (e.g.
//! `<think>` … `</think>`) ahead of the answer. Given raw text, the
//! first well-formed span between the markers is removed and the
//! trimmed remainder is returned.

use serde::{Deserialize, Serialize};

use crate::error::ExplainError;

/// Default opening marker.
pub const DEFAULT_REASONING_OPEN: &str = "<think>";

/// Default closing marker.
pub const DEFAULT_REASONING_CLOSE: &str = "</think>";

/// The marker pair delimiting a reasoning trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningMarkers {
    pub open: String,
    pub close: String,
}

impl Default for ReasoningMarkers {
    fn default() -> Self {
        Self {
            open: DEFAULT_REASONING_OPEN.to_string(),
            close: DEFAULT_REASONING_CLOSE.to_string(),
        }
    }
}

impl ReasoningMarkers {
    /// Creates a marker pair.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Removes the first delimited reasoning span from `raw` and trims the rest.
///
/// Text without markers is returned trimmed. An opening marker without a
/// closing one after it, or a closing marker with no opening one before
/// it, is `ExplainError::UnmatchedDelimiter`.
pub fn strip_reasoning_trace(
    raw: &str,
    markers: &ReasoningMarkers,
) -> Result<String, ExplainError> {
    let open_at = raw.find(&markers.open);
    let close_at = raw.find(&markers.close);

    match (open_at, close_at) {
        (None, None) => Ok(raw.trim().to_string()),
        (None, Some(_)) => Err(ExplainError::UnmatchedDelimiter {
            marker: markers.close.clone(),
        }),
        (Some(open), Some(close)) if close < open => Err(ExplainError::UnmatchedDelimiter {
            marker: markers.close.clone(),
        }),
        (Some(open), _) => {
            let body_start = open + markers.open.len();
            let close = raw[body_start..]
                .find(&markers.close)
                .map(|offset| body_start + offset)
                .ok_or_else(|| ExplainError::UnmatchedDelimiter {
                    marker: markers.open.clone(),
                })?;
            let span_end = close + markers.close.len();

            let mut cleaned = String::with_capacity(raw.len() - (span_end - open));
            cleaned.push_str(&raw[..open]);
            cleaned.push_str(&raw[span_end..]);
            Ok(cleaned.trim().to_string())
        }
    }
}
