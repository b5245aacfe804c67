//! Policy defaults applied when a strategy config omits a parameter.

use serde::{Deserialize, Serialize};

/// How many of the most recent tool results or calls redaction leaves untouched.
pub const DEFAULT_KEEP_RECENT_N: usize = 3;

/// Text that replaces a redacted tool result.
pub const DEFAULT_TOOL_RESULT_PLACEHOLDER: &str = "Done";

/// Overridable defaults for optional strategy parameters.
///
/// Hosts typically deserialize this from their own configuration file and pass
/// it to [`ContextEditor::with_defaults`](crate::ContextEditor::with_defaults).
/// Missing keys fall back to the constants in this module.
///
/// # Example
///
/// ```
/// use ctxedit_context::EditDefaults;
///
/// let defaults: EditDefaults =
///     serde_json::from_str(r#"{"tool_result_placeholder": "[cleared]"}"#).unwrap();
/// assert_eq!(defaults.tool_result_placeholder, "[cleared]");
/// assert_eq!(defaults.keep_recent_n_tool_results, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditDefaults {
    /// Default for `keep_recent_n_tool_results`.
    pub keep_recent_n_tool_results: usize,
    /// Default for `keep_recent_n_tool_calls`.
    pub keep_recent_n_tool_calls: usize,
    /// Default for `tool_result_placeholder`.
    pub tool_result_placeholder: String,
}

impl Default for EditDefaults {
    fn default() -> Self {
        Self {
            keep_recent_n_tool_results: DEFAULT_KEEP_RECENT_N,
            keep_recent_n_tool_calls: DEFAULT_KEEP_RECENT_N,
            tool_result_placeholder: DEFAULT_TOOL_RESULT_PLACEHOLDER.to_string(),
        }
    }
}
