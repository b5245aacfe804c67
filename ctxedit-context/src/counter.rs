//! Heuristic token counting for messages.

use ctxedit_types::{Message, Part, Tokenizer, TokenizerError};

/// Per-message overhead for role markers and formatting.
const MESSAGE_OVERHEAD: usize = 4;

/// Estimates token counts from text using a configurable chars-per-token ratio.
///
/// This is a heuristic estimator; real tokenization varies per model. The
/// default ratio of 4.0 chars/token approximates GPT-family and Claude models.
/// Hosts with a real encoder implement [`Tokenizer`] themselves and hand it to
/// [`ContextEditor::with_tokenizer`](crate::ContextEditor::with_tokenizer).
///
/// # Example
///
/// ```
/// use ctxedit_context::TokenCounter;
///
/// let counter = TokenCounter::new();
/// let estimate = counter.estimate_text("Hello, world!");
/// assert!(estimate > 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokenCounter {
    chars_per_token: f32,
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter {
    /// Creates a new `TokenCounter` with the default ratio of 4.0 chars/token.
    #[must_use]
    pub fn new() -> Self {
        Self { chars_per_token: 4.0 }
    }

    /// Creates a new `TokenCounter` with a custom chars-per-token ratio.
    #[must_use]
    pub fn with_ratio(chars_per_token: f32) -> Self {
        Self { chars_per_token }
    }

    /// Estimates the number of tokens in a text string.
    #[must_use]
    pub fn estimate_text(&self, text: &str) -> usize {
        (text.len() as f32 / self.chars_per_token).ceil() as usize
    }

    /// Estimates the total token count for a slice of messages.
    #[must_use]
    pub fn estimate_messages(&self, messages: &[Message]) -> usize {
        messages.iter().map(|m| self.estimate_message(m)).sum()
    }

    /// Estimates a single message, including the fixed per-message overhead.
    #[must_use]
    pub fn estimate_message(&self, message: &Message) -> usize {
        let content_tokens: usize =
            message.parts.iter().map(|part| self.estimate_part(part)).sum();
        MESSAGE_OVERHEAD + content_tokens
    }

    fn estimate_part(&self, part: &Part) -> usize {
        match part {
            Part::Text { text } => self.estimate_text(text),
            Part::ToolCall { name, arguments, .. } => {
                self.estimate_text(name) + self.estimate_text(&arguments.to_string())
            }
            Part::ToolResult { text, .. } => self.estimate_text(text),
        }
    }
}

impl Tokenizer for TokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(self.estimate_text(text))
    }

    fn count_message_tokens(&self, message: &Message) -> Result<usize, TokenizerError> {
        Ok(self.estimate_message(message))
    }

    fn count_sequence_tokens(&self, messages: &[Message]) -> Result<usize, TokenizerError> {
        Ok(self.estimate_messages(messages))
    }
}
