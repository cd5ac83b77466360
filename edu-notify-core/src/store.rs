//! Notification store with reducer pattern
//!
//! The store owns the two record collections. All writes go through
//! [`StoreAction`]s processed by [`reducer`]; every write replaces the
//! affected collection with a freshly built one, so snapshots handed out by
//! [`NotificationState::notifications`] are never mutated afterwards.
//!
//! # Example
//! ```ignore
//! let mut store = NotificationStore::new();
//! let (id, result) = store.add_notification(NotificationInput::new(
//!     Category::Alert,
//!     Priority::Critical,
//!     "System Maintenance",
//!     "Scheduled downtime tonight",
//! ));
//! assert_eq!(store.state().urgent_count(), 1);
//! store.mark_as_read(&id);
//! assert_eq!(store.state().urgent_count(), 0);
//! ```

use std::sync::Arc;

use crate::action::{Action, ActionSummary, StoreAction};
use crate::clock::{next_id, Clock, IdPrefix, SystemClock};
use crate::effect::{AmbientAlert, DispatchResult, Effect};
use crate::model::{Message, MessageInput, Notification, NotificationInput, RecordId};

/// The canonical record collections, most-recent-first.
#[derive(Clone, Debug, Default)]
pub struct NotificationState {
    notifications: Arc<Vec<Notification>>,
    messages: Arc<Vec<Message>>,
}

impl NotificationState {
    /// Snapshot of all notifications, most-recent-first.
    pub fn notifications(&self) -> Arc<Vec<Notification>> {
        Arc::clone(&self.notifications)
    }

    /// Snapshot of all messages, most-recent-first.
    pub fn messages(&self) -> Arc<Vec<Message>> {
        Arc::clone(&self.messages)
    }

    pub fn notification(&self, id: &RecordId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    pub fn message(&self, id: &RecordId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Number of notifications not yet read.
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    /// Number of unread notifications with high or critical priority.
    pub fn urgent_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| !n.is_read && n.priority.is_urgent())
            .count()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Apply a store action.
///
/// Unknown ids are not an error: the action is a no-op and reports
/// `changed == false`.
pub fn reducer(state: &mut NotificationState, action: StoreAction) -> DispatchResult<Effect> {
    match action {
        StoreAction::AddNotification {
            id,
            created_at,
            input,
        } => {
            let record = input.into_record(id, created_at);
            let alert = AmbientAlert::for_notification(&record).map(Effect::AmbientAlert);
            state.notifications = Arc::new(prepend(record, &state.notifications));
            DispatchResult::changed().with_opt(alert)
        }

        StoreAction::AddMessage {
            id,
            created_at,
            input,
        } => {
            let record = input.into_record(id, created_at);
            let alert = AmbientAlert::for_message(&record).map(Effect::AmbientAlert);
            state.messages = Arc::new(prepend(record, &state.messages));
            DispatchResult::changed().with_opt(alert)
        }

        StoreAction::MarkAsRead(id) => {
            let needs_update = state
                .notifications
                .iter()
                .any(|n| n.id == id && !n.is_read);
            if !needs_update {
                return DispatchResult::unchanged();
            }
            state.notifications = Arc::new(
                state
                    .notifications
                    .iter()
                    .map(|n| {
                        if n.id == id {
                            Notification {
                                is_read: true,
                                ..n.clone()
                            }
                        } else {
                            n.clone()
                        }
                    })
                    .collect(),
            );
            DispatchResult::changed()
        }

        StoreAction::MarkAllAsRead => {
            if state.notifications.iter().all(|n| n.is_read) {
                return DispatchResult::unchanged();
            }
            state.notifications = Arc::new(
                state
                    .notifications
                    .iter()
                    .map(|n| Notification {
                        is_read: true,
                        ..n.clone()
                    })
                    .collect(),
            );
            DispatchResult::changed()
        }

        StoreAction::Dismiss(id) => match remove_by_id(&state.notifications, &id, |n| &n.id) {
            Some(remaining) => {
                state.notifications = Arc::new(remaining);
                DispatchResult::changed()
            }
            None => DispatchResult::unchanged(),
        },

        StoreAction::DismissMessage(id) => match remove_by_id(&state.messages, &id, |m| &m.id) {
            Some(remaining) => {
                state.messages = Arc::new(remaining);
                DispatchResult::changed()
            }
            None => DispatchResult::unchanged(),
        },

        StoreAction::ClearAll => {
            if state.notifications.is_empty() {
                return DispatchResult::unchanged();
            }
            // Messages are point-in-time modal events and survive a clear
            state.notifications = Arc::new(Vec::new());
            DispatchResult::changed()
        }
    }
}

fn prepend<T: Clone>(record: T, existing: &[T]) -> Vec<T> {
    let mut next = Vec::with_capacity(existing.len() + 1);
    next.push(record);
    next.extend_from_slice(existing);
    next
}

/// Copy of `records` without the one matching `id`, or `None` if absent.
fn remove_by_id<T: Clone>(
    records: &[T],
    id: &RecordId,
    id_of: impl Fn(&T) -> &RecordId,
) -> Option<Vec<T>> {
    if !records.iter().any(|r| id_of(r) == id) {
        return None;
    }
    Some(
        records
            .iter()
            .filter(|r| id_of(r) != id)
            .cloned()
            .collect(),
    )
}

/// Middleware trait for intercepting store actions
///
/// Implement this trait to add logging, auditing, or other
/// cross-cutting concerns to the store.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that logs actions through `tracing`
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingMiddleware {
    /// Log after dispatch only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Log both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl<A: ActionSummary> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before {
            tracing::debug!(action = %action.summary(), "Dispatching store action");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if !self.log_after {
            return;
        }
        if state_changed {
            tracing::debug!(action = %action.summary(), "Store action applied");
        } else {
            tracing::trace!(action = %action.name(), "Store action was a no-op");
        }
    }
}

/// Owned notification store.
///
/// Generates ids and timestamps, runs actions through the middleware and
/// reducer, and returns the effects for the caller to route.
pub struct NotificationStore<M: Middleware<StoreAction> = NoopMiddleware> {
    state: NotificationState,
    clock: Arc<dyn Clock>,
    middleware: M,
}

impl Default for NotificationStore<NoopMiddleware> {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore<NoopMiddleware> {
    /// Empty store on the system clock.
    pub fn new() -> Self {
        Self::with_middleware(NoopMiddleware)
    }
}

impl<M: Middleware<StoreAction>> NotificationStore<M> {
    pub fn with_middleware(middleware: M) -> Self {
        Self {
            state: NotificationState::default(),
            clock: Arc::new(SystemClock),
            middleware,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }

    /// Dispatch an action through middleware and reducer
    pub fn dispatch(&mut self, action: StoreAction) -> DispatchResult<Effect> {
        self.middleware.before(&action);
        let result = reducer(&mut self.state, action.clone());
        self.middleware.after(&action, result.changed);
        result
    }

    /// Store a notification, returning its new id.
    pub fn add_notification(
        &mut self,
        input: NotificationInput,
    ) -> (RecordId, DispatchResult<Effect>) {
        let created_at = self.clock.now();
        let id = next_id(IdPrefix::Notification, created_at);
        let result = self.dispatch(StoreAction::AddNotification {
            id: id.clone(),
            created_at,
            input,
        });
        (id, result)
    }

    /// Store a message, returning its new id.
    pub fn add_message(&mut self, input: MessageInput) -> (RecordId, DispatchResult<Effect>) {
        let created_at = self.clock.now();
        let id = next_id(IdPrefix::Message, created_at);
        let result = self.dispatch(StoreAction::AddMessage {
            id: id.clone(),
            created_at,
            input,
        });
        (id, result)
    }

    pub fn mark_as_read(&mut self, id: &RecordId) -> bool {
        self.dispatch(StoreAction::MarkAsRead(id.clone())).changed
    }

    pub fn mark_all_as_read(&mut self) -> bool {
        self.dispatch(StoreAction::MarkAllAsRead).changed
    }

    pub fn dismiss(&mut self, id: &RecordId) -> bool {
        self.dispatch(StoreAction::Dismiss(id.clone())).changed
    }

    pub fn dismiss_message(&mut self, id: &RecordId) -> bool {
        self.dispatch(StoreAction::DismissMessage(id.clone())).changed
    }

    pub fn clear_all(&mut self) -> bool {
        self.dispatch(StoreAction::ClearAll).changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::effect::AlertSeverity;
    use crate::model::{Category, MessageKind, Priority};
    use chrono::{TimeZone, Utc};

    fn input(priority: Priority, title: &str) -> NotificationInput {
        NotificationInput::new(Category::Student, priority, title, "body")
    }

    fn store() -> NotificationStore {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap());
        NotificationStore::new().with_clock(Arc::new(clock))
    }

    #[test]
    fn test_add_prepends_and_assigns_fields() {
        let mut store = store();
        let (a, _) = store.add_notification(input(Priority::Low, "A"));
        let (b, _) = store.add_notification(input(Priority::Low, "B"));

        let titles: Vec<_> = store
            .state()
            .notifications()
            .iter()
            .map(|n| n.title.clone())
            .collect();
        assert_eq!(titles, vec!["B", "A"]);

        let record = store.state().notification(&a).unwrap();
        assert!(!record.is_read);
        assert_eq!(record.created_at, store.clock().now());
        assert_ne!(a, b);
    }

    #[test]
    fn test_snapshot_survives_mutation() {
        let mut store = store();
        let (id, _) = store.add_notification(input(Priority::Low, "A"));
        let before = store.state().notifications();

        store.mark_as_read(&id);
        store.add_notification(input(Priority::Low, "B"));

        assert_eq!(before.len(), 1);
        assert!(!before[0].is_read);
        assert!(store.state().notification(&id).unwrap().is_read);
    }

    #[test]
    fn test_mark_as_read_unknown_id_is_noop() {
        let mut store = store();
        store.add_notification(input(Priority::Low, "A"));

        assert!(!store.mark_as_read(&RecordId::from("n_missing")));
        assert_eq!(store.state().unread_count(), 1);
    }

    #[test]
    fn test_mark_as_read_twice_reports_unchanged() {
        let mut store = store();
        let (id, _) = store.add_notification(input(Priority::Low, "A"));

        assert!(store.mark_as_read(&id));
        assert!(!store.mark_as_read(&id));
    }

    #[test]
    fn test_mark_all_as_read() {
        let mut store = store();
        store.add_notification(input(Priority::High, "A"));
        store.add_notification(input(Priority::Low, "B"));

        assert!(store.mark_all_as_read());
        assert_eq!(store.state().unread_count(), 0);
        assert_eq!(store.state().urgent_count(), 0);
        assert!(!store.mark_all_as_read());
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut store = store();
        let (id, _) = store.add_notification(input(Priority::Low, "A"));

        assert!(store.dismiss(&id));
        assert!(!store.dismiss(&id));
        assert_eq!(store.state().notification_count(), 0);
    }

    #[test]
    fn test_clear_all_keeps_messages() {
        let mut store = store();
        store.add_notification(input(Priority::Low, "A"));
        store.add_message(MessageInput::new(
            MessageKind::Info,
            Priority::Low,
            "Hello",
            "World",
        ));

        assert!(store.clear_all());
        assert_eq!(store.state().notification_count(), 0);
        assert_eq!(store.state().message_count(), 1);
    }

    #[test]
    fn test_dismiss_message() {
        let mut store = store();
        let (id, _) = store.add_message(MessageInput::new(
            MessageKind::Info,
            Priority::Low,
            "Hello",
            "World",
        ));

        assert!(store.dismiss_message(&id));
        assert!(store.state().message(&id).is_none());
        assert!(!store.dismiss_message(&id));
    }

    #[test]
    fn test_urgent_count_scenario() {
        let mut store = store();
        store.add_notification(input(Priority::Low, "Routine"));
        let (id, result) = store.add_notification(NotificationInput::new(
            Category::Alert,
            Priority::Critical,
            "System Maintenance",
            "Scheduled downtime tonight",
        ));

        assert_eq!(store.state().urgent_count(), 1);
        assert_eq!(result.effects.len(), 1);
        let Effect::AmbientAlert(alert) = &result.effects[0];
        assert_eq!(alert.severity, AlertSeverity::Error);
        assert_eq!(alert.title, "System Maintenance");

        store.mark_as_read(&id);
        assert_eq!(store.state().urgent_count(), 0);
        assert_eq!(store.state().notification_count(), 2);
    }

    #[test]
    fn test_low_priority_add_has_no_effects() {
        let mut store = store();
        let (_, result) = store.add_notification(input(Priority::Medium, "A"));
        assert!(result.changed);
        assert!(!result.has_effects());
    }

    #[derive(Default)]
    struct CountingMiddleware {
        before_count: usize,
        changed_count: usize,
    }

    impl Middleware<StoreAction> for CountingMiddleware {
        fn before(&mut self, _action: &StoreAction) {
            self.before_count += 1;
        }

        fn after(&mut self, _action: &StoreAction, state_changed: bool) {
            if state_changed {
                self.changed_count += 1;
            }
        }
    }

    #[test]
    fn test_store_with_middleware() {
        let mut store = NotificationStore::with_middleware(CountingMiddleware::default());
        let (id, _) = store.add_notification(input(Priority::Low, "A"));
        store.dismiss(&id);
        store.dismiss(&id);

        assert_eq!(store.middleware().before_count, 3);
        assert_eq!(store.middleware().changed_count, 2);
    }

    #[test]
    fn test_logging_middleware_modes() {
        let quiet = LoggingMiddleware::new();
        assert!(!quiet.log_before && quiet.log_after);
        let verbose = LoggingMiddleware::verbose();
        assert!(verbose.log_before && verbose.log_after);

        let mut store = NotificationStore::with_middleware(verbose);
        let (id, _) = store.add_notification(input(Priority::Low, "A"));
        assert!(store.mark_as_read(&id));
        assert!(store.middleware().log_before);
    }
}
