//! Edit strategies and the factory that builds them from caller configs.

mod middle_out;
mod pairing;
mod redaction;
mod token_limit;

use std::fmt;
use std::str::FromStr;

use ctxedit_types::{EditError, EditStrategy, Message, StrategyConfig, Tokenizer};

use crate::config::EditDefaults;
use crate::params::decode_params;

pub use middle_out::MiddleOutStrategy;
pub use redaction::{RemoveToolCallParamsStrategy, RemoveToolResultStrategy};
pub use token_limit::TokenLimitStrategy;

/// Execution tier of a strategy type. Lower tiers run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyTier {
    /// Content redaction; runs before anything drops messages.
    Redaction,
    /// Types without a dedicated tier, including unrecognized ones.
    Custom,
    /// Hard token ceilings; always last.
    Budget,
}

/// The closed set of strategy types this engine knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// `remove_tool_result`
    RemoveToolResult,
    /// `remove_tool_call_params`
    RemoveToolCallParams,
    /// `token_limit`
    TokenLimit,
    /// `middle_out`
    MiddleOut,
}

impl StrategyKind {
    /// All known kinds.
    pub const ALL: [StrategyKind; 4] =
        [Self::RemoveToolResult, Self::RemoveToolCallParams, Self::TokenLimit, Self::MiddleOut];

    /// The wire identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RemoveToolResult => RemoveToolResultStrategy::NAME,
            Self::RemoveToolCallParams => RemoveToolCallParamsStrategy::NAME,
            Self::TokenLimit => TokenLimitStrategy::NAME,
            Self::MiddleOut => MiddleOutStrategy::NAME,
        }
    }

    /// The tier this kind runs in.
    #[must_use]
    pub fn tier(self) -> StrategyTier {
        match self {
            Self::RemoveToolResult | Self::RemoveToolCallParams => StrategyTier::Redaction,
            Self::MiddleOut => StrategyTier::Custom,
            Self::TokenLimit => StrategyTier::Budget,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EditError::UnknownStrategy(s.to_string()))
    }
}

/// A built, validated strategy.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// See [`RemoveToolResultStrategy`].
    RemoveToolResult(RemoveToolResultStrategy),
    /// See [`RemoveToolCallParamsStrategy`].
    RemoveToolCallParams(RemoveToolCallParamsStrategy),
    /// See [`TokenLimitStrategy`].
    TokenLimit(TokenLimitStrategy),
    /// See [`MiddleOutStrategy`].
    MiddleOut(MiddleOutStrategy),
}

impl Strategy {
    /// The kind of this strategy.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::RemoveToolResult(_) => StrategyKind::RemoveToolResult,
            Self::RemoveToolCallParams(_) => StrategyKind::RemoveToolCallParams,
            Self::TokenLimit(_) => StrategyKind::TokenLimit,
            Self::MiddleOut(_) => StrategyKind::MiddleOut,
        }
    }
}

impl EditStrategy for Strategy {
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn apply(
        &self,
        messages: Vec<Message>,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Vec<Message>, EditError> {
        match self {
            Self::RemoveToolResult(s) => s.apply(messages, tokenizer),
            Self::RemoveToolCallParams(s) => s.apply(messages, tokenizer),
            Self::TokenLimit(s) => s.apply(messages, tokenizer),
            Self::MiddleOut(s) => s.apply(messages, tokenizer),
        }
    }
}

/// Builds a validated [`Strategy`] from one caller config.
///
/// Unknown types fail with [`EditError::UnknownStrategy`]; bad params fail with
/// [`EditError::InvalidParams`] naming the strategy.
///
/// # Example
///
/// ```
/// use ctxedit_context::{EditDefaults, StrategyKind, build_strategy};
/// use ctxedit_types::StrategyConfig;
///
/// let config = StrategyConfig::new("middle_out", serde_json::json!({"token_reduce_to": 4096.0}));
/// let strategy = build_strategy(&config, &EditDefaults::default()).unwrap();
/// assert_eq!(strategy.kind(), StrategyKind::MiddleOut);
/// ```
pub fn build_strategy(
    config: &StrategyConfig,
    defaults: &EditDefaults,
) -> Result<Strategy, EditError> {
    let kind: StrategyKind = config.kind.parse()?;
    let name = kind.as_str();
    let strategy = match kind {
        StrategyKind::RemoveToolResult => Strategy::RemoveToolResult(
            RemoveToolResultStrategy::from_params(decode_params(name, &config.params)?, defaults)?,
        ),
        StrategyKind::RemoveToolCallParams => {
            Strategy::RemoveToolCallParams(RemoveToolCallParamsStrategy::from_params(
                decode_params(name, &config.params)?,
                defaults,
            )?)
        }
        StrategyKind::TokenLimit => Strategy::TokenLimit(TokenLimitStrategy::from_params(
            decode_params(name, &config.params)?,
        )?),
        StrategyKind::MiddleOut => Strategy::MiddleOut(MiddleOutStrategy::from_params(
            decode_params(name, &config.params)?,
        )?),
    };
    Ok(strategy)
}
