//! Splitting a sequence at a pinned message.

use ctxedit_types::Message;

/// A sequence divided into an editable prefix and a frozen suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct PinSplit {
    /// Messages up to and including the pinned one; the only part edited.
    pub prefix: Vec<Message>,
    /// Messages after the pin, returned verbatim.
    pub suffix: Vec<Message>,
    /// Whether the pin id matched a message.
    pub pinned: bool,
}

impl PinSplit {
    /// Puts an edited prefix back in front of the untouched suffix.
    #[must_use]
    pub fn rejoin(self, mut edited_prefix: Vec<Message>) -> Vec<Message> {
        edited_prefix.extend(self.suffix);
        edited_prefix
    }
}

/// Splits `messages` after the first message whose id equals `pin`.
///
/// A missing or unmatched pin leaves the whole sequence in the prefix.
///
/// # Example
///
/// ```
/// use ctxedit_context::split_at_pin;
/// use ctxedit_types::Message;
///
/// let messages = vec![Message::user("a", "1"), Message::user("b", "2"), Message::user("c", "3")];
/// let split = split_at_pin(messages, Some("b"));
/// assert!(split.pinned);
/// assert_eq!(split.prefix.len(), 2);
/// assert_eq!(split.suffix.len(), 1);
/// ```
#[must_use]
pub fn split_at_pin(mut messages: Vec<Message>, pin: Option<&str>) -> PinSplit {
    let Some(idx) = pin.and_then(|pin| messages.iter().position(|m| m.id == pin)) else {
        return PinSplit { prefix: messages, suffix: Vec::new(), pinned: false };
    };
    let suffix = messages.split_off(idx + 1);
    PinSplit { prefix: messages, suffix, pinned: true }
}
