//! Error types for all ctxedit crates.

/// Errors from a tokenizing collaborator.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    /// The text could not be encoded.
    #[error("encoding failed: {0}")]
    Encoding(String),
    /// Any other tokenizer error.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from building or applying edit strategies.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// The requested strategy type is not known.
    #[error("unknown strategy type: {0}")]
    UnknownStrategy(String),
    /// Parameters were missing, out of range, or of the wrong shape.
    #[error("invalid params for strategy {strategy}: {message}")]
    InvalidParams {
        /// Name of the strategy being built.
        strategy: String,
        /// What was wrong.
        message: String,
    },
    /// The tokenizer failed during a token-count-dependent step.
    #[error("strategy {strategy}: tokenizer failed: {source}")]
    Tokenizer {
        /// Name of the strategy that was running.
        strategy: String,
        /// The underlying tokenizer error.
        #[source]
        source: TokenizerError,
    },
}

impl EditError {
    /// Build an [`EditError::InvalidParams`] for `strategy`.
    pub fn invalid_params(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParams { strategy: strategy.into(), message: message.into() }
    }

    /// Wrap a tokenizer failure with the name of the running strategy.
    pub fn tokenizer(strategy: impl Into<String>, source: TokenizerError) -> Self {
        Self::Tokenizer { strategy: strategy.into(), source }
    }

    /// Whether this error comes from the request's configuration rather than a collaborator.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownStrategy(_) | Self::InvalidParams { .. })
    }
}
