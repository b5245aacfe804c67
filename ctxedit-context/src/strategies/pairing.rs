//! Tool-call/tool-result pairing shared by the message-dropping strategies.

use std::collections::HashMap;

use ctxedit_types::{EditError, Message, Tokenizer};

/// Links between messages that must be dropped together.
///
/// A message carrying a tool call is linked to every message carrying a result
/// for that call, and the other way round. Results without a visible call
/// (and calls without a result) have no links.
pub(crate) struct Pairing {
    links: Vec<Vec<usize>>,
}

impl Pairing {
    pub(crate) fn new(messages: &[Message]) -> Self {
        let mut calls: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut results: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, msg) in messages.iter().enumerate() {
            for id in msg.tool_call_ids() {
                calls.entry(id).or_default().push(idx);
            }
            for id in msg.tool_result_ids() {
                results.entry(id).or_default().push(idx);
            }
        }

        let mut links = vec![Vec::new(); messages.len()];
        for (id, call_msgs) in &calls {
            let Some(result_msgs) = results.get(id) else {
                continue;
            };
            for &call in call_msgs {
                for &result in result_msgs {
                    if call != result {
                        links[call].push(result);
                        links[result].push(call);
                    }
                }
            }
        }
        Self { links }
    }
}

/// Running removal state over one message sequence.
pub(crate) struct Removal {
    pairing: Pairing,
    costs: Vec<usize>,
    removed: Vec<bool>,
    total: usize,
}

impl Removal {
    /// Prices every message; tokenizer failures are wrapped with `strategy`.
    pub(crate) fn new(
        strategy: &'static str,
        messages: &[Message],
        tokenizer: &dyn Tokenizer,
        total: usize,
    ) -> Result<Self, EditError> {
        let costs = messages
            .iter()
            .map(|m| tokenizer.count_message_tokens(m))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EditError::tokenizer(strategy, e))?;
        Ok(Self {
            pairing: Pairing::new(messages),
            costs,
            removed: vec![false; messages.len()],
            total,
        })
    }

    /// Tokens still held by the surviving messages.
    pub(crate) fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn is_removed(&self, idx: usize) -> bool {
        self.removed[idx]
    }

    /// Drops `idx` together with everything paired to it, transitively.
    ///
    /// The cascade may reach messages on either side of `idx`.
    pub(crate) fn remove(&mut self, idx: usize) {
        let mut pending = vec![idx];
        while let Some(i) = pending.pop() {
            if self.removed[i] {
                continue;
            }
            self.removed[i] = true;
            self.total = self.total.saturating_sub(self.costs[i]);
            pending.extend(self.pairing.links[i].iter().copied().filter(|&j| !self.removed[j]));
        }
    }

    /// Number of messages dropped so far.
    pub(crate) fn removed_count(&self) -> usize {
        self.removed.iter().filter(|&&r| r).count()
    }

    /// The survivors, in original order.
    pub(crate) fn survivors(self, messages: Vec<Message>) -> Vec<Message> {
        debug_assert_eq!(messages.len(), self.removed.len());
        messages
            .into_iter()
            .zip(self.removed)
            .filter_map(|(msg, removed)| (!removed).then_some(msg))
            .collect()
    }
}
