//! Trim from the middle, keeping the opening and the latest turns.

use ctxedit_types::{EditError, EditStrategy, Message, Tokenizer};

use super::pairing::Removal;
use crate::params::{MiddleOutParams, require_positive};

/// Removes a run of interior messages grown outward from the midpoint.
///
/// The message at `len / 2` goes first, then its neighbours alternately,
/// earlier side first, until the sequence fits `token_reduce_to`. The first
/// and last messages are never chosen directly, though a tool-call pairing
/// cascade can still take them. Sequences of two messages or fewer have no
/// interior and pass through unchanged.
#[derive(Debug, Clone)]
pub struct MiddleOutStrategy {
    token_reduce_to: usize,
}

impl MiddleOutStrategy {
    /// Strategy type identifier.
    pub const NAME: &'static str = "middle_out";

    /// Creates a strategy with the given target, which must be positive.
    pub fn new(token_reduce_to: usize) -> Result<Self, EditError> {
        if token_reduce_to == 0 {
            return Err(EditError::invalid_params(Self::NAME, "token_reduce_to must be > 0, got 0"));
        }
        Ok(Self { token_reduce_to })
    }

    /// Builds the strategy from decoded params.
    pub fn from_params(params: MiddleOutParams) -> Result<Self, EditError> {
        let token_reduce_to =
            require_positive(Self::NAME, "token_reduce_to", params.token_reduce_to)?;
        Ok(Self { token_reduce_to })
    }

    /// The configured target.
    #[must_use]
    pub fn token_reduce_to(&self) -> usize {
        self.token_reduce_to
    }
}

/// Removal order for a sequence of `len` messages: `len / 2`, then alternately
/// one step earlier and one step later, bounded to `1..=len - 2`.
fn removal_order(len: usize) -> Vec<usize> {
    if len <= 2 {
        return Vec::new();
    }
    let (first, last) = (1, len - 2);
    let mid = len / 2;
    let mut order = vec![mid];
    let (mut lo, mut hi) = (mid, mid);
    while lo > first || hi < last {
        if lo > first {
            lo -= 1;
            order.push(lo);
        }
        if hi < last {
            hi += 1;
            order.push(hi);
        }
    }
    order
}

impl EditStrategy for MiddleOutStrategy {
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
        if total <= self.token_reduce_to {
            return Ok(messages);
        }
        if messages.len() <= 2 {
            tracing::warn!(
                strategy = Self::NAME,
                messages = messages.len(),
                total,
                target = self.token_reduce_to,
                "no interior message to trim, passing through"
            );
            return Ok(messages);
        }

        let mut removal = Removal::new(Self::NAME, &messages, tokenizer, total)?;
        for idx in removal_order(messages.len()) {
            if removal.total() <= self.token_reduce_to {
                break;
            }
            if !removal.is_removed(idx) {
                removal.remove(idx);
            }
        }

        tracing::debug!(
            strategy = Self::NAME,
            target = self.token_reduce_to,
            before = total,
            after = removal.total(),
            dropped = removal.removed_count(),
            "middle trimmed"
        );
        Ok(removal.survivors(messages))
    }
}
