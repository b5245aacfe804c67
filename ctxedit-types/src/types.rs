//! Core message, part and strategy configuration types.

use serde::{Deserialize, Serialize};

/// The role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human user.
    User,
    /// An AI assistant.
    Assistant,
    /// A system message.
    System,
}

/// A typed part within a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain text content.
    Text {
        /// The text.
        text: String,
    },
    /// A tool invocation request from the assistant.
    ToolCall {
        /// Unique identifier for this tool call.
        id: String,
        /// Name of the tool to invoke.
        name: String,
        /// JSON arguments.
        arguments: serde_json::Value,
    },
    /// Result of a tool invocation.
    ToolResult {
        /// References the `id` of the corresponding `ToolCall`.
        tool_call_id: String,
        /// Textual output of the tool.
        text: String,
    },
}

impl Part {
    /// Create a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a tool-call part.
    #[must_use]
    pub fn tool_call(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self::ToolCall { id: id.into(), name: name.into(), arguments }
    }

    /// Create a tool-result part answering the call with `tool_call_id`.
    #[must_use]
    pub fn tool_result(tool_call_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::ToolResult { tool_call_id: tool_call_id.into(), text: text.into() }
    }
}

/// A message in a stored conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable identifier of the message.
    pub id: String,
    /// The role of the message author.
    pub role: Role,
    /// The ordered parts of this message.
    pub parts: Vec<Part>,
}

impl Message {
    /// Create a message from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role, parts: Vec<Part>) -> Self {
        Self { id: id.into(), role, parts }
    }

    /// Create a user message with a single text part.
    ///
    /// # Example
    ///
    /// ```
    /// use ctxedit_types::Message;
    /// let msg = Message::user("m1", "What is Rust?");
    /// ```
    #[must_use]
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Role::User, vec![Part::text(text)])
    }

    /// Create an assistant message with a single text part.
    ///
    /// # Example
    ///
    /// ```
    /// use ctxedit_types::Message;
    /// let msg = Message::assistant("m2", "Rust is a systems programming language.");
    /// ```
    #[must_use]
    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Role::Assistant, vec![Part::text(text)])
    }

    /// Create a system message with a single text part.
    #[must_use]
    pub fn system(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Role::System, vec![Part::text(text)])
    }

    /// Ids of the tool calls carried by this message, in part order.
    pub fn tool_call_ids(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            Part::ToolCall { id, .. } => Some(id.as_str()),
            _ => None,
        })
    }

    /// Ids of the tool calls answered by results in this message, in part order.
    pub fn tool_result_ids(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            Part::ToolResult { tool_call_id, .. } => Some(tool_call_id.as_str()),
            _ => None,
        })
    }
}

// --- Request-level types ---

/// One requested transformation, as it arrives from the caller.
///
/// `params` is a loosely typed JSON object; each strategy decodes it into its
/// own schema when the strategy is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Strategy type identifier, e.g. `"token_limit"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Strategy-specific parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl StrategyConfig {
    /// Create a config with the given type and parameter object.
    ///
    /// # Example
    ///
    /// ```
    /// use ctxedit_types::StrategyConfig;
    /// let config = StrategyConfig::new("token_limit", serde_json::json!({"limit_tokens": 2048}));
    /// assert_eq!(config.kind, "token_limit");
    /// ```
    #[must_use]
    pub fn new(kind: impl Into<String>, params: serde_json::Value) -> Self {
        Self { kind: kind.into(), params }
    }

    /// Create a config with no parameters.
    #[must_use]
    pub fn bare(kind: impl Into<String>) -> Self {
        Self::new(kind, serde_json::Value::Object(serde_json::Map::new()))
    }
}

/// Everything a caller supplies alongside the stored messages for one edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    /// Requested strategies, in caller order.
    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,
    /// Message up to which edits must be reproducible across calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_at_message_id: Option<String>,
}

/// Output of one edit: the transformed messages and the stable boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditResult {
    /// The edited sequence.
    pub messages: Vec<Message>,
    /// Id of the last message covered by the edit. Empty for an empty input.
    pub edit_boundary_message_id: String,
}
