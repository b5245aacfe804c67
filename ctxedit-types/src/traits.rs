//! Collaborator and strategy traits.

use crate::error::{EditError, TokenizerError};
use crate::types::Message;

/// Counts language-model tokens.
///
/// The encoding itself is owned by the implementor; the editing engine only
/// ever asks for counts.
pub trait Tokenizer: Send + Sync {
    /// Count the tokens of a bare string.
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError>;

    /// Count the tokens a single message occupies in a request.
    fn count_message_tokens(&self, message: &Message) -> Result<usize, TokenizerError>;

    /// Count the tokens of a whole sequence.
    ///
    /// Defaults to the sum of [`Tokenizer::count_message_tokens`], which keeps
    /// per-message subtraction consistent with the total.
    fn count_sequence_tokens(&self, messages: &[Message]) -> Result<usize, TokenizerError> {
        messages
            .iter()
            .try_fold(0usize, |acc, m| Ok(acc + self.count_message_tokens(m)?))
    }
}

/// A named, parameterized transformation of a message sequence.
///
/// Implementations take the sequence by value and hand back a new one, so a
/// caller that still needs the original must clone it first.
pub trait EditStrategy: Send + Sync {
    /// The strategy type identifier, used to label errors and logs.
    fn name(&self) -> &'static str;

    /// Apply the transformation.
    fn apply(
        &self,
        messages: Vec<Message>,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Vec<Message>, EditError>;
}
