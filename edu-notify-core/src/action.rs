//! Store actions: the only way records change

use std::fmt::Debug;

use chrono::{DateTime, Utc};

use crate::model::{MessageInput, NotificationInput, RecordId};

/// Marker trait for actions that can be dispatched to a store
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions may be logged or replayed
/// - Debug: For debugging and logging
/// - Send + 'static: For async dispatch across tasks
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Concise one-line description of an action for logs.
///
/// Defaults to the `Debug` output; override for data-heavy variants.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

/// Mutations accepted by the notification store.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreAction {
    /// Store a new notification under an already generated id
    AddNotification {
        id: RecordId,
        created_at: DateTime<Utc>,
        input: NotificationInput,
    },
    /// Store a new message under an already generated id
    AddMessage {
        id: RecordId,
        created_at: DateTime<Utc>,
        input: MessageInput,
    },
    MarkAsRead(RecordId),
    MarkAllAsRead,
    /// Remove a notification permanently
    Dismiss(RecordId),
    /// Remove a message permanently
    DismissMessage(RecordId),
    /// Empty the notification collection (messages are kept)
    ClearAll,
}

impl Action for StoreAction {
    fn name(&self) -> &'static str {
        match self {
            StoreAction::AddNotification { .. } => "AddNotification",
            StoreAction::AddMessage { .. } => "AddMessage",
            StoreAction::MarkAsRead(_) => "MarkAsRead",
            StoreAction::MarkAllAsRead => "MarkAllAsRead",
            StoreAction::Dismiss(_) => "Dismiss",
            StoreAction::DismissMessage(_) => "DismissMessage",
            StoreAction::ClearAll => "ClearAll",
        }
    }
}

impl ActionSummary for StoreAction {
    fn summary(&self) -> String {
        match self {
            // Show id and title instead of the whole input
            StoreAction::AddNotification { id, input, .. } => format!(
                "AddNotification {{ id: {}, priority: {:?}, title: {:?} }}",
                id, input.priority, input.title
            ),
            StoreAction::AddMessage { id, input, .. } => format!(
                "AddMessage {{ id: {}, kind: {:?}, title: {:?} }}",
                id, input.kind, input.title
            ),
            _ => format!("{:?}", self),
        }
    }
}
