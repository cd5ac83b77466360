//! Effects declared by the store reducer
//!
//! The reducer never talks to the outside world. When a stored record should
//! raise an ambient alert (toast), the reducer returns an [`Effect`] and the
//! dispatcher hands it to the alert sink after the state has changed.
//!
//! ```ignore
//! let result = store.dispatch(action);
//! for effect in result.effects {
//!     match effect {
//!         Effect::AmbientAlert(alert) => sink.alert(&alert),
//!     }
//! }
//! ```

use crate::model::{Message, MessageKind, Notification, Priority, RecordId};

/// Result of dispatching an action to the store.
///
/// Contains both the state change indicator and any effects to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// State changed with a single effect.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// Add an effect to this result.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add an effect if present.
    #[inline]
    pub fn with_opt(self, effect: Option<E>) -> Self {
        match effect {
            Some(effect) => self.with(effect),
            None => self,
        }
    }

    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// Severity carried by an ambient alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
}

/// A transient, non-modal cue for a high-severity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbientAlert {
    /// Record that raised the alert
    pub record: RecordId,
    pub title: String,
    pub body: String,
    pub severity: AlertSeverity,
}

impl AmbientAlert {
    /// Alert for a freshly added notification, if its priority warrants one.
    pub fn for_notification(notification: &Notification) -> Option<Self> {
        let severity = match notification.priority {
            Priority::Critical => AlertSeverity::Error,
            Priority::High => AlertSeverity::Warning,
            Priority::Low | Priority::Medium => return None,
        };
        Some(Self {
            record: notification.id.clone(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            severity,
        })
    }

    /// Alert for a freshly added message: critical priority or error kind.
    pub fn for_message(message: &Message) -> Option<Self> {
        if message.kind != MessageKind::Error && message.priority != Priority::Critical {
            return None;
        }
        Some(Self {
            record: message.id.clone(),
            title: message.title.clone(),
            body: message.body.clone(),
            severity: AlertSeverity::Error,
        })
    }
}

/// Side effects the store can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a toast-equivalent alert
    AmbientAlert(AmbientAlert),
}
