//! The editing pipeline: sequence, build, split at the pin, apply, rejoin.

use std::sync::Arc;

use ctxedit_types::{
    EditError, EditRequest, EditResult, EditStrategy, Message, StrategyConfig, Tokenizer,
};

use crate::config::EditDefaults;
use crate::counter::TokenCounter;
use crate::pin::split_at_pin;
use crate::sequencer::sequence_configs;
use crate::strategies::{Strategy, build_strategy};

/// Applies a list of strategy configs to a stored conversation.
///
/// The editor holds no per-request state; one instance can serve concurrent
/// requests. Strategies run in tier order (see
/// [`sequence_configs`](crate::sequence_configs)) on the prefix up to the
/// pinned message, and the suffix after the pin is returned untouched.
///
/// # Example
///
/// ```
/// use ctxedit_context::ContextEditor;
/// use ctxedit_types::{Message, Part, Role, StrategyConfig};
///
/// let messages = vec![
///     Message::user("m1", "list the files"),
///     Message::new(
///         "m2",
///         Role::Assistant,
///         vec![Part::tool_call("c1", "ls", serde_json::json!({}))],
///     ),
///     Message::new("m3", Role::User, vec![Part::tool_result("c1", "a.rs b.rs")]),
/// ];
/// let configs = vec![StrategyConfig::new(
///     "remove_tool_result",
///     serde_json::json!({"keep_recent_n_tool_results": 0}),
/// )];
///
/// let result = ContextEditor::new().edit(messages, &configs, None).unwrap();
/// assert_eq!(result.messages[2].parts[0], Part::tool_result("c1", "Done"));
/// assert_eq!(result.edit_boundary_message_id, "m3");
/// ```
#[derive(Clone)]
pub struct ContextEditor {
    tokenizer: Arc<dyn Tokenizer>,
    defaults: EditDefaults,
}

impl Default for ContextEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContextEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextEditor").field("defaults", &self.defaults).finish_non_exhaustive()
    }
}

impl ContextEditor {
    /// Creates an editor backed by the heuristic [`TokenCounter`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_tokenizer(TokenCounter::new())
    }

    /// Creates an editor backed by a custom tokenizer.
    #[must_use]
    pub fn with_tokenizer(tokenizer: impl Tokenizer + 'static) -> Self {
        Self { tokenizer: Arc::new(tokenizer), defaults: EditDefaults::default() }
    }

    /// Replaces the policy defaults used for omitted params.
    #[must_use]
    pub fn with_defaults(mut self, defaults: EditDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// The policy defaults in effect.
    #[must_use]
    pub fn defaults(&self) -> &EditDefaults {
        &self.defaults
    }

    /// Sequences and builds every config, failing on the first bad one.
    pub fn build_pipeline(&self, configs: &[StrategyConfig]) -> Result<Vec<Strategy>, EditError> {
        sequence_configs(configs)
            .into_iter()
            .map(|config| build_strategy(config, &self.defaults))
            .collect()
    }

    /// Edits `messages` with `configs`, reproducibly up to `pin`.
    ///
    /// The boundary is `pin` when it matches a message and otherwise the id of
    /// the last input message (empty for an empty input). Any error aborts the
    /// whole edit; no partially edited sequence is returned.
    pub fn edit(
        &self,
        messages: Vec<Message>,
        configs: &[StrategyConfig],
        pin: Option<&str>,
    ) -> Result<EditResult, EditError> {
        let _span = tracing::debug_span!(
            "ctxedit.edit",
            messages = messages.len(),
            strategies = configs.len(),
            pin = pin.unwrap_or_default(),
        )
        .entered();

        let pipeline = self.build_pipeline(configs)?;
        let last_id = messages.last().map(|m| m.id.clone()).unwrap_or_default();

        let mut split = split_at_pin(messages, pin);
        let edit_boundary_message_id = match pin {
            Some(pin) if split.pinned => pin.to_string(),
            Some(pin) => {
                tracing::debug!(pin, "pin matched no message, editing the whole sequence");
                last_id
            }
            None => last_id,
        };

        let mut prefix = std::mem::take(&mut split.prefix);
        for strategy in &pipeline {
            let before = prefix.len();
            prefix = strategy.apply(prefix, self.tokenizer.as_ref())?;
            tracing::debug!(
                strategy = strategy.name(),
                before,
                after = prefix.len(),
                "strategy applied"
            );
        }

        Ok(EditResult { messages: split.rejoin(prefix), edit_boundary_message_id })
    }

    /// Convenience wrapper over [`ContextEditor::edit`] for a decoded request.
    pub fn edit_request(
        &self,
        messages: Vec<Message>,
        request: &EditRequest,
    ) -> Result<EditResult, EditError> {
        self.edit(messages, &request.strategies, request.pin_at_message_id.as_deref())
    }
}
