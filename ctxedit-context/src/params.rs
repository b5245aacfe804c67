//! Typed parameter schemas, one per strategy type.
//!
//! The wire-level params bag is a loose JSON object. Each schema is decoded
//! once, here, and numeric fields accept any JSON number that denotes a whole
//! quantity (`3` and `3.0` alike). Range checks happen in the strategy
//! constructors, which know the defaults.

use ctxedit_types::EditError;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};

/// Params for `remove_tool_result`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoveToolResultParams {
    /// Number of most recent tool results to keep verbatim.
    #[serde(default, deserialize_with = "whole_number")]
    pub keep_recent_n_tool_results: Option<i64>,
    /// Replacement text for redacted results.
    #[serde(default)]
    pub tool_result_placeholder: Option<String>,
    /// Tools whose results are never redacted.
    #[serde(default)]
    pub keep_tools: Option<Vec<String>>,
    /// Results at or below this many tokens are kept.
    #[serde(default, deserialize_with = "whole_number")]
    pub gt_token: Option<i64>,
}

/// Params for `remove_tool_call_params`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoveToolCallParamsParams {
    /// Number of most recent tool calls to keep verbatim.
    #[serde(default, deserialize_with = "whole_number")]
    pub keep_recent_n_tool_calls: Option<i64>,
    /// Tools whose call arguments are never redacted.
    #[serde(default)]
    pub keep_tools: Option<Vec<String>>,
    /// Arguments at or below this many tokens are kept.
    #[serde(default, deserialize_with = "whole_number")]
    pub gt_token: Option<i64>,
}

/// Params for `token_limit`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenLimitParams {
    /// Hard ceiling on the returned sequence.
    #[serde(default, deserialize_with = "whole_number")]
    pub limit_tokens: Option<i64>,
}

/// Params for `middle_out`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MiddleOutParams {
    /// Total the middle trim reduces to.
    #[serde(default, deserialize_with = "whole_number")]
    pub token_reduce_to: Option<i64>,
}

/// Decode a params bag into the schema `P`, labelling failures with `strategy`.
///
/// An absent (`null`) bag decodes like an empty object.
pub fn decode_params<P: DeserializeOwned>(
    strategy: &str,
    params: &serde_json::Value,
) -> Result<P, EditError> {
    let params = if params.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(params).map_err(|e| EditError::invalid_params(strategy, e.to_string()))
}

/// Read a required positive whole number.
pub(crate) fn require_positive(
    strategy: &str,
    field: &str,
    value: Option<i64>,
) -> Result<usize, EditError> {
    match value {
        None => Err(EditError::invalid_params(strategy, format!("{field} is required"))),
        Some(n) => positive(strategy, field, n),
    }
}

/// Check that `n` is strictly positive.
pub(crate) fn positive(strategy: &str, field: &str, n: i64) -> Result<usize, EditError> {
    if n <= 0 {
        return Err(EditError::invalid_params(strategy, format!("{field} must be > 0, got {n}")));
    }
    usize::try_from(n)
        .map_err(|_| EditError::invalid_params(strategy, format!("{field} is too large")))
}

/// Check that `n` is not negative.
pub(crate) fn non_negative(strategy: &str, field: &str, n: i64) -> Result<usize, EditError> {
    if n < 0 {
        return Err(EditError::invalid_params(strategy, format!("{field} must be >= 0, got {n}")));
    }
    usize::try_from(n)
        .map_err(|_| EditError::invalid_params(strategy, format!("{field} is too large")))
}

fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    as_whole(&number)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {number}")))
}

fn as_whole(number: &serde_json::Number) -> Option<i64> {
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    if number.is_u64() {
        return None;
    }
    let f = number.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
