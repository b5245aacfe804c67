//! Fixed execution order for requested strategies.

use ctxedit_types::StrategyConfig;

use crate::strategies::{StrategyKind, StrategyTier};

/// The tier of a raw type identifier. Unrecognized types land in
/// [`StrategyTier::Custom`]; the factory rejects them later.
#[must_use]
pub fn tier_of(kind: &str) -> StrategyTier {
    kind.parse::<StrategyKind>().map_or(StrategyTier::Custom, StrategyKind::tier)
}

/// Reorders configs by tier, keeping caller order within a tier.
///
/// # Example
///
/// ```
/// use ctxedit_context::sequence_configs;
/// use ctxedit_types::StrategyConfig;
///
/// let configs = vec![
///     StrategyConfig::bare("token_limit"),
///     StrategyConfig::bare("remove_tool_result"),
/// ];
/// let order: Vec<_> = sequence_configs(&configs).iter().map(|c| c.kind.as_str()).collect();
/// assert_eq!(order, ["remove_tool_result", "token_limit"]);
/// ```
#[must_use]
pub fn sequence_configs(configs: &[StrategyConfig]) -> Vec<&StrategyConfig> {
    let mut ordered: Vec<&StrategyConfig> = configs.iter().collect();
    // `sort_by_key` is stable.
    ordered.sort_by_key(|config| tier_of(&config.kind));
    ordered
}
