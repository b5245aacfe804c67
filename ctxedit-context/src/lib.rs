#![doc = include_str!("../README.md")]

pub mod config;
pub mod counter;
pub mod editor;
pub mod params;
pub mod pin;
pub mod sequencer;
pub mod strategies;

pub use config::{DEFAULT_KEEP_RECENT_N, DEFAULT_TOOL_RESULT_PLACEHOLDER, EditDefaults};
pub use counter::TokenCounter;
pub use editor::ContextEditor;
pub use pin::{PinSplit, split_at_pin};
pub use sequencer::{sequence_configs, tier_of};
pub use strategies::{
    MiddleOutStrategy, RemoveToolCallParamsStrategy, RemoveToolResultStrategy, Strategy,
    StrategyKind, StrategyTier, TokenLimitStrategy, build_strategy,
};
