//! Per-message view state: modal mode, reply capture, action loading
//!
//! One [`MessageViewState`] lives for as long as a message is open. It holds
//! only view-local state; the message itself stays in the store.

use std::collections::BTreeSet;

use crate::error::ActionError;
use crate::model::{Message, MessageKind, Priority, RecordId};

/// How forcefully a message is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalMode {
    /// Severe treatment with an explicit acknowledge control
    Blocking,
    Standard,
}

/// Critical priority or error kind opens in blocking mode.
pub fn modal_mode(message: &Message) -> ModalMode {
    if message.priority == Priority::Critical || message.kind == MessageKind::Error {
        ModalMode::Blocking
    } else {
        ModalMode::Standard
    }
}

/// View-local state of one open message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageViewState {
    pub message: RecordId,
    requires_response: bool,
    pub reply_open: bool,
    pub reply_text: String,
    pending: BTreeSet<String>,
    pub last_error: Option<String>,
}

impl MessageViewState {
    pub fn new(message: &Message) -> Self {
        Self {
            message: message.id.clone(),
            requires_response: message.requires_response,
            reply_open: false,
            reply_text: String::new(),
            pending: BTreeSet::new(),
            last_error: None,
        }
    }

    /// The reply box is visible when a response is required or was opened.
    pub fn shows_reply(&self) -> bool {
        self.requires_response || self.reply_open
    }

    pub fn open_reply(&mut self) {
        self.reply_open = true;
    }

    /// Close the reply box and drop its text.
    pub fn cancel_reply(&mut self) {
        self.reply_open = false;
        self.reply_text.clear();
    }

    pub fn can_submit(&self) -> bool {
        !self.reply_text.trim().is_empty()
    }

    /// Take the reply for forwarding and reset local reply state.
    ///
    /// Returns `None` (and changes nothing) when the text is blank.
    pub fn take_reply(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        self.reply_open = false;
        Some(std::mem::take(&mut self.reply_text))
    }

    /// Mark an action as loading.
    ///
    /// Returns `false` only if that same action is already pending.
    pub fn begin_action(&mut self, action: &str) -> bool {
        if self.pending.contains(action) {
            return false;
        }
        self.pending.insert(action.to_string());
        self.last_error = None;
        true
    }

    /// Clear the loading flag. A failure is kept in `last_error`.
    pub fn finish_action(&mut self, action: &str, result: &Result<(), ActionError>) {
        self.pending.remove(action);
        if let Err(e) = result {
            self.last_error = Some(e.to_string());
        }
    }

    pub fn is_pending(&self, action: &str) -> bool {
        self.pending.contains(action)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageInput;
    use chrono::Utc;

    fn message(kind: MessageKind, priority: Priority) -> Message {
        MessageInput::new(kind, priority, "Title", "Body").into_record("m_1_0".into(), Utc::now())
    }

    #[test]
    fn test_modal_mode() {
        assert_eq!(
            modal_mode(&message(MessageKind::Info, Priority::Critical)),
            ModalMode::Blocking
        );
        assert_eq!(
            modal_mode(&message(MessageKind::Error, Priority::Low)),
            ModalMode::Blocking
        );
        assert_eq!(
            modal_mode(&message(MessageKind::Warning, Priority::High)),
            ModalMode::Standard
        );
    }

    #[test]
    fn test_new_view_starts_clean() {
        let msg = message(MessageKind::Info, Priority::Low);
        let state = MessageViewState::new(&msg);
        assert_eq!(state.message, msg.id);
        assert!(!state.reply_open);
        assert!(state.reply_text.is_empty());
        assert!(!state.has_pending());
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn test_reply_visibility() {
        let mut plain = MessageViewState::new(&message(MessageKind::Info, Priority::Low));
        assert!(!plain.shows_reply());
        plain.open_reply();
        assert!(plain.shows_reply());
        plain.cancel_reply();
        assert!(!plain.shows_reply());

        let mut msg = message(MessageKind::Info, Priority::Low);
        msg.requires_response = true;
        assert!(MessageViewState::new(&msg).shows_reply());
    }

    #[test]
    fn test_take_reply() {
        let mut state = MessageViewState::new(&message(MessageKind::Info, Priority::Low));
        state.open_reply();
        state.reply_text = "  ".into();
        assert!(!state.can_submit());
        assert_eq!(state.take_reply(), None);
        assert!(state.reply_open);

        state.reply_text = "Will call home".into();
        assert_eq!(state.take_reply().as_deref(), Some("Will call home"));
        assert!(state.reply_text.is_empty());
        assert!(!state.reply_open);
    }

    #[test]
    fn test_actions_load_independently() {
        let mut state = MessageViewState::new(&message(MessageKind::Info, Priority::Low));
        assert!(state.begin_action("a"));
        assert!(!state.begin_action("a"));
        assert!(state.begin_action("b"));

        state.finish_action("a", &Ok(()));
        assert!(!state.is_pending("a"));
        assert!(state.is_pending("b"));

        state.finish_action("b", &Err(ActionError::failed("offline")));
        assert!(!state.has_pending());
        assert_eq!(state.last_error.as_deref(), Some("action failed: offline"));
    }
}
