//! The notification center: intake, alert routing, actions and replies
//!
//! [`NotificationCenter`] is the single owner of the store. Producers hand it
//! inputs (directly or as [`IncomingEvent`]s from an
//! [`EventSources`](crate::source::EventSources) channel), it stores them and
//! forwards any ambient alert to its [`AlertSink`]. Views call back into it for
//! every mutation.
//!
//! # Example
//!
//! ```ignore
//! let (alert_tx, alert_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut center = NotificationCenter::new(NotificationStore::new())
//!     .with_alert_sink(ChannelAlertSink::new(alert_tx));
//!
//! center.registry_mut().register("contact_student", |ctx: ActionContext| async move {
//!     tracing::info!(record = %ctx.record, "Contacting student");
//!     Ok::<(), ActionError>(())
//! });
//!
//! let id = center.add_notification(NotificationInput::new(
//!     Category::Student,
//!     Priority::High,
//!     "Low attendance",
//!     "Three absences this week",
//! ));
//! center.invoke_action(&id, "contact_student", &mut tasks);
//! ```

use crate::action::StoreAction;
use crate::effect::{DispatchResult, Effect};
use crate::model::{MessageInput, NotificationInput, RecordId};
use crate::sink::{AlertSink, ReplySink, TracingAlertSink, TracingReplySink};
use crate::source::IncomingEvent;
use crate::store::{Middleware, NoopMiddleware, NotificationState, NotificationStore};
use crate::tasks::{ActionContext, ActionRegistry, ActionTasks, RecordKind};

/// Owns the store and its outbound collaborators.
pub struct NotificationCenter<M: Middleware<StoreAction> = NoopMiddleware> {
    store: NotificationStore<M>,
    alerts: Box<dyn AlertSink>,
    replies: Box<dyn ReplySink>,
    registry: ActionRegistry,
}

impl Default for NotificationCenter<NoopMiddleware> {
    fn default() -> Self {
        Self::new(NotificationStore::new())
    }
}

impl<M: Middleware<StoreAction>> NotificationCenter<M> {
    /// Wrap a store. Alerts and replies go to the tracing log until replaced.
    pub fn new(store: NotificationStore<M>) -> Self {
        Self {
            store,
            alerts: Box::new(TracingAlertSink),
            replies: Box::new(TracingReplySink),
            registry: ActionRegistry::new(),
        }
    }

    pub fn with_alert_sink(mut self, sink: impl AlertSink + 'static) -> Self {
        self.alerts = Box::new(sink);
        self
    }

    pub fn with_reply_sink(mut self, sink: impl ReplySink + 'static) -> Self {
        self.replies = Box::new(sink);
        self
    }

    pub fn with_registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn state(&self) -> &NotificationState {
        self.store.state()
    }

    pub fn store(&self) -> &NotificationStore<M> {
        &self.store
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    /// Store a notification and raise its ambient alert, if any.
    pub fn add_notification(&mut self, input: NotificationInput) -> RecordId {
        let (id, result) = self.store.add_notification(input);
        self.route(result);
        id
    }

    /// Store a message and raise its ambient alert, if any.
    pub fn add_message(&mut self, input: MessageInput) -> RecordId {
        let (id, result) = self.store.add_message(input);
        self.route(result);
        id
    }

    /// Accept an external event and produce a record.
    pub fn handle_event(&mut self, event: IncomingEvent) -> RecordId {
        match event {
            IncomingEvent::Notification(input) => self.add_notification(input),
            IncomingEvent::Message(input) => self.add_message(input),
        }
    }

    /// Apply a store action produced by a view.
    pub fn apply(&mut self, action: StoreAction) -> bool {
        let result = self.store.dispatch(action);
        let changed = result.changed;
        self.route(result);
        changed
    }

    pub fn mark_as_read(&mut self, id: &RecordId) -> bool {
        self.store.mark_as_read(id)
    }

    pub fn mark_all_as_read(&mut self) -> bool {
        self.store.mark_all_as_read()
    }

    pub fn dismiss(&mut self, id: &RecordId) -> bool {
        self.store.dismiss(id)
    }

    pub fn dismiss_message(&mut self, id: &RecordId) -> bool {
        self.store.dismiss_message(id)
    }

    pub fn clear_all(&mut self) -> bool {
        self.store.clear_all()
    }

    /// Resolve the context for invoking `action` on a stored record.
    ///
    /// `None` if the record is gone or does not carry that action.
    pub fn action_context(&self, record: &RecordId, action: &str) -> Option<ActionContext> {
        let state = self.store.state();
        let kind = if let Some(n) = state.notification(record) {
            n.actions.iter().any(|a| a.id == action).then_some(RecordKind::Notification)
        } else if let Some(m) = state.message(record) {
            m.actions.iter().any(|a| a.id == action).then_some(RecordKind::Message)
        } else {
            None
        }?;
        Some(ActionContext::new(record.clone(), kind, action))
    }

    /// Start the effect behind an action. The store is left untouched.
    ///
    /// Returns `false` when the record or action is unknown, or when the same
    /// action on the same record is still running.
    pub fn invoke_action(&self, record: &RecordId, action: &str, tasks: &mut ActionTasks) -> bool {
        let Some(ctx) = self.action_context(record, action) else {
            tracing::debug!(record = %record, action, "No such action on record");
            return false;
        };
        let key = ctx.key();
        if tasks.is_pending(&key) {
            tracing::debug!(action = %key, "Action already pending");
            return false;
        }
        tracing::info!(action = %key, "Invoking action");
        tasks.spawn(key, self.registry.resolve(ctx))
    }

    /// Forward a reply. Blank text is dropped and reported as `false`.
    pub fn submit_reply(&self, message: &RecordId, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.replies.on_reply(message, text);
        true
    }

    fn route(&self, result: DispatchResult<Effect>) {
        for effect in result.effects {
            match effect {
                Effect::AmbientAlert(alert) => self.alerts.alert(&alert),
            }
        }
    }
}
