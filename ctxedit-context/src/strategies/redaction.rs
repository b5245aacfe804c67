//! Redaction strategies: replace old tool payloads, keep their structure.

use std::collections::{HashMap, HashSet};

use ctxedit_types::{EditError, EditStrategy, Message, Part, Tokenizer};

use crate::config::{DEFAULT_KEEP_RECENT_N, DEFAULT_TOOL_RESULT_PLACEHOLDER, EditDefaults};
use crate::params::{RemoveToolCallParamsParams, RemoveToolResultParams, non_negative, positive};

/// Position of a part: (message index, part index).
type Position = (usize, usize);

/// The oldest eligible positions that fall outside the `keep_recent_n` window.
fn oldest_beyond_window(positions: &[Position], keep_recent_n: usize) -> &[Position] {
    let to_redact = positions.len().saturating_sub(keep_recent_n);
    &positions[..to_redact]
}

/// Whether a payload is large enough to be worth redacting.
///
/// Without a threshold everything qualifies. A tokenizer failure keeps the
/// payload.
fn above_threshold(
    strategy: &'static str,
    tokenizer: &dyn Tokenizer,
    payload: &str,
    gt_token: Option<usize>,
) -> bool {
    let Some(threshold) = gt_token else {
        return true;
    };
    match tokenizer.count_tokens(payload) {
        Ok(tokens) => tokens > threshold,
        Err(error) => {
            tracing::warn!(strategy, %error, "token count failed, keeping payload");
            false
        }
    }
}

// ---- RemoveToolResultStrategy -----------------------------------------------

/// Replaces old tool result text with a placeholder to reduce token usage.
///
/// Keeps the most recent `keep_recent_n` tool results intact, as well as any
/// result produced by a tool listed in `keep_tools`. The `tool_call_id` is
/// preserved so the conversation still pairs up.
///
/// # Example
///
/// ```
/// use ctxedit_context::RemoveToolResultStrategy;
///
/// let strategy = RemoveToolResultStrategy::new(2)
///     .with_placeholder("[cleared]")
///     .with_keep_tools(["read_file"]);
/// ```
#[derive(Debug, Clone)]
pub struct RemoveToolResultStrategy {
    keep_recent_n: usize,
    placeholder: String,
    keep_tools: HashSet<String>,
    gt_token: Option<usize>,
}

impl Default for RemoveToolResultStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_RECENT_N)
    }
}

impl RemoveToolResultStrategy {
    /// Strategy type identifier.
    pub const NAME: &'static str = "remove_tool_result";

    /// Creates a strategy keeping the `keep_recent_n` most recent results.
    #[must_use]
    pub fn new(keep_recent_n: usize) -> Self {
        Self {
            keep_recent_n,
            placeholder: DEFAULT_TOOL_RESULT_PLACEHOLDER.to_string(),
            keep_tools: HashSet::new(),
            gt_token: None,
        }
    }

    /// Sets the replacement text.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Never redact results of these tools.
    #[must_use]
    pub fn with_keep_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Only redact results larger than `gt_token` tokens.
    #[must_use]
    pub fn with_gt_token(mut self, gt_token: usize) -> Self {
        self.gt_token = Some(gt_token);
        self
    }

    /// Builds the strategy from decoded params, filling gaps from `defaults`.
    pub fn from_params(
        params: RemoveToolResultParams,
        defaults: &EditDefaults,
    ) -> Result<Self, EditError> {
        let keep_recent_n = match params.keep_recent_n_tool_results {
            Some(n) => non_negative(Self::NAME, "keep_recent_n_tool_results", n)?,
            None => defaults.keep_recent_n_tool_results,
        };
        let mut strategy = Self::new(keep_recent_n)
            .with_placeholder(
                params
                    .tool_result_placeholder
                    .unwrap_or_else(|| defaults.tool_result_placeholder.clone()),
            )
            .with_keep_tools(params.keep_tools.unwrap_or_default());
        if let Some(gt) = params.gt_token {
            strategy = strategy.with_gt_token(positive(Self::NAME, "gt_token", gt)?);
        }
        Ok(strategy)
    }
}

impl EditStrategy for RemoveToolResultStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(
        &self,
        mut messages: Vec<Message>,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Vec<Message>, EditError> {
        // Results carry only the call id; the tool name lives on the call.
        let tool_names: HashMap<&str, &str> = messages
            .iter()
            .flat_map(|m| &m.parts)
            .filter_map(|part| match part {
                Part::ToolCall { id, name, .. } => Some((id.as_str(), name.as_str())),
                _ => None,
            })
            .collect();

        let mut positions: Vec<Position> = Vec::new();
        for (msg_idx, msg) in messages.iter().enumerate() {
            for (part_idx, part) in msg.parts.iter().enumerate() {
                if let Part::ToolResult { tool_call_id, .. } = part {
                    let protected = tool_names
                        .get(tool_call_id.as_str())
                        .is_some_and(|name| self.keep_tools.contains(*name));
                    if !protected {
                        positions.push((msg_idx, part_idx));
                    }
                }
            }
        }

        let candidates = oldest_beyond_window(&positions, self.keep_recent_n);
        let mut redacted = 0usize;
        for &(msg_idx, part_idx) in candidates {
            if let Part::ToolResult { text, .. } = &mut messages[msg_idx].parts[part_idx] {
                if *text == self.placeholder
                    || !above_threshold(Self::NAME, tokenizer, text, self.gt_token)
                {
                    continue;
                }
                *text = self.placeholder.clone();
                redacted += 1;
            }
        }

        tracing::debug!(
            strategy = Self::NAME,
            eligible = positions.len(),
            redacted,
            "tool results redacted"
        );
        Ok(messages)
    }
}

// ---- RemoveToolCallParamsStrategy -------------------------------------------

/// Replaces old tool call arguments with an empty JSON object.
///
/// The call's id and name survive, so results still pair with their call.
/// The `keep_recent_n` most recent calls and calls to tools in `keep_tools`
/// are left untouched.
///
/// # Example
///
/// ```
/// use ctxedit_context::RemoveToolCallParamsStrategy;
///
/// let strategy = RemoveToolCallParamsStrategy::new(1).with_gt_token(64);
/// ```
#[derive(Debug, Clone)]
pub struct RemoveToolCallParamsStrategy {
    keep_recent_n: usize,
    keep_tools: HashSet<String>,
    gt_token: Option<usize>,
}

impl Default for RemoveToolCallParamsStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_RECENT_N)
    }
}

impl RemoveToolCallParamsStrategy {
    /// Strategy type identifier.
    pub const NAME: &'static str = "remove_tool_call_params";

    /// Creates a strategy keeping the `keep_recent_n` most recent calls.
    #[must_use]
    pub fn new(keep_recent_n: usize) -> Self {
        Self { keep_recent_n, keep_tools: HashSet::new(), gt_token: None }
    }

    /// Never redact arguments of these tools.
    #[must_use]
    pub fn with_keep_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Only redact arguments larger than `gt_token` tokens.
    #[must_use]
    pub fn with_gt_token(mut self, gt_token: usize) -> Self {
        self.gt_token = Some(gt_token);
        self
    }

    /// Builds the strategy from decoded params, filling gaps from `defaults`.
    pub fn from_params(
        params: RemoveToolCallParamsParams,
        defaults: &EditDefaults,
    ) -> Result<Self, EditError> {
        let keep_recent_n = match params.keep_recent_n_tool_calls {
            Some(n) => non_negative(Self::NAME, "keep_recent_n_tool_calls", n)?,
            None => defaults.keep_recent_n_tool_calls,
        };
        let mut strategy =
            Self::new(keep_recent_n).with_keep_tools(params.keep_tools.unwrap_or_default());
        if let Some(gt) = params.gt_token {
            strategy = strategy.with_gt_token(positive(Self::NAME, "gt_token", gt)?);
        }
        Ok(strategy)
    }
}

impl EditStrategy for RemoveToolCallParamsStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(
        &self,
        mut messages: Vec<Message>,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Vec<Message>, EditError> {
        let mut positions: Vec<Position> = Vec::new();
        for (msg_idx, msg) in messages.iter().enumerate() {
            for (part_idx, part) in msg.parts.iter().enumerate() {
                if let Part::ToolCall { name, .. } = part {
                    if !self.keep_tools.contains(name) {
                        positions.push((msg_idx, part_idx));
                    }
                }
            }
        }

        let candidates = oldest_beyond_window(&positions, self.keep_recent_n);
        let mut redacted = 0usize;
        for &(msg_idx, part_idx) in candidates {
            if let Part::ToolCall { arguments, .. } = &mut messages[msg_idx].parts[part_idx] {
                let serialized = arguments.to_string();
                if arguments.as_object().is_some_and(|map| map.is_empty())
                    || !above_threshold(Self::NAME, tokenizer, &serialized, self.gt_token)
                {
                    continue;
                }
                *arguments = serde_json::Value::Object(serde_json::Map::new());
                redacted += 1;
            }
        }

        tracing::debug!(
            strategy = Self::NAME,
            eligible = positions.len(),
            redacted,
            "tool call arguments redacted"
        );
        Ok(messages)
    }
}
