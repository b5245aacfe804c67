//! Hard token ceiling enforced by dropping the oldest messages.

use ctxedit_types::{EditError, EditStrategy, Message, Tokenizer};

use super::pairing::Removal;
use crate::params::{TokenLimitParams, require_positive};

/// Drops whole messages, oldest first, until the sequence fits `limit_tokens`.
///
/// Dropping a message also drops every message paired with it through a tool
/// call id, even when the partner sits later in the sequence. The newest
/// message is never chosen for removal on its own, so a single oversized
/// final message survives.
///
/// # Example
///
/// ```
/// use ctxedit_context::{TokenCounter, TokenLimitStrategy};
/// use ctxedit_types::{EditStrategy, Message};
///
/// let strategy = TokenLimitStrategy::new(10).unwrap();
/// let messages = vec![
///     Message::user("m1", "a fairly long opening message"),
///     Message::assistant("m2", "ok"),
/// ];
/// let kept = strategy.apply(messages, &TokenCounter::new()).unwrap();
/// assert_eq!(kept.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TokenLimitStrategy {
    limit_tokens: usize,
}

impl TokenLimitStrategy {
    /// Strategy type identifier.
    pub const NAME: &'static str = "token_limit";

    /// Creates a strategy with the given ceiling, which must be positive.
    pub fn new(limit_tokens: usize) -> Result<Self, EditError> {
        if limit_tokens == 0 {
            return Err(EditError::invalid_params(Self::NAME, "limit_tokens must be > 0, got 0"));
        }
        Ok(Self { limit_tokens })
    }

    /// Builds the strategy from decoded params.
    pub fn from_params(params: TokenLimitParams) -> Result<Self, EditError> {
        let limit_tokens = require_positive(Self::NAME, "limit_tokens", params.limit_tokens)?;
        Ok(Self { limit_tokens })
    }

    /// The configured ceiling.
    #[must_use]
    pub fn limit_tokens(&self) -> usize {
        self.limit_tokens
    }
}

impl EditStrategy for TokenLimitStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(
        &self,
        messages: Vec<Message>,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Vec<Message>, EditError> {
        let total = tokenizer
            .count_sequence_tokens(&messages)
            .map_err(|e| EditError::tokenizer(Self::NAME, e))?;
        if total <= self.limit_tokens {
            return Ok(messages);
        }

        let mut removal = Removal::new(Self::NAME, &messages, tokenizer, total)?;
        let newest = messages.len().saturating_sub(1);
        for idx in 0..newest {
            if removal.total() <= self.limit_tokens {
                break;
            }
            if !removal.is_removed(idx) {
                removal.remove(idx);
            }
        }

        tracing::debug!(
            strategy = Self::NAME,
            limit = self.limit_tokens,
            before = total,
            after = removal.total(),
            dropped = removal.removed_count(),
            "token limit applied"
        );
        Ok(removal.survivors(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_is_rejected() {
        let err = TokenLimitStrategy::new(0).unwrap_err();
        assert!(err.to_string().contains("token_limit"));
    }

    #[test]
    fn missing_limit_is_rejected() {
        let err = TokenLimitStrategy::from_params(TokenLimitParams::default()).unwrap_err();
        assert!(err.to_string().contains("limit_tokens is required"));
    }

    #[test]
    fn negative_limit_is_rejected() {
        let params = TokenLimitParams { limit_tokens: Some(-5) };
        assert!(TokenLimitStrategy::from_params(params).is_err());
    }
}
