//! Action effects: command registry and in-flight task tracking
//!
//! Records only carry [`ActionDescriptor`](crate::model::ActionDescriptor)s.
//! The effect behind a descriptor is registered once, by id, in an
//! [`ActionRegistry`]. Invoking an action spawns its effect on the runtime via
//! [`ActionTasks`]; when the effect finishes, an [`ActionOutcome`] is sent
//! back to the owning loop.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ActionRegistry::new();
//! registry.register("contact_student", |ctx: ActionContext| async move {
//!     mailer.send(ctx.record.as_str()).await.map_err(|e| ActionError::failed(e.to_string()))
//! });
//!
//! let (outcome_tx, mut outcome_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = ActionTasks::new(outcome_tx);
//! tasks.spawn(ctx.key(), registry.resolve(ctx));
//!
//! // later, on the loop
//! let outcome = outcome_rx.recv().await;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::error::ActionError;
use crate::model::RecordId;

/// Boxed effect future.
pub type ActionFuture = Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send>>;

/// Which collection the record lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Notification,
    Message,
}

/// Everything a handler learns about the invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionContext {
    pub record: RecordId,
    pub record_kind: RecordKind,
    pub action: String,
}

impl ActionContext {
    pub fn new(record: RecordId, record_kind: RecordKind, action: impl Into<String>) -> Self {
        Self {
            record,
            record_kind,
            action: action.into(),
        }
    }

    pub fn key(&self) -> ActionKey {
        ActionKey {
            record: self.record.clone(),
            action: self.action.clone(),
        }
    }
}

/// Identifies one action on one record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub record: RecordId,
    pub action: String,
}

impl ActionKey {
    pub fn new(record: RecordId, action: impl Into<String>) -> Self {
        Self {
            record,
            action: action.into(),
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.record, self.action)
    }
}

/// An effect behind an action id.
pub trait ActionHandler: Send + Sync {
    fn call(&self, ctx: ActionContext) -> ActionFuture;
}

impl<F, Fut> ActionHandler for F
where
    F: Fn(ActionContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    fn call(&self, ctx: ActionContext) -> ActionFuture {
        Box::pin(self(ctx))
    }
}

/// Handlers keyed by action id.
#[derive(Default, Clone)]
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.handlers.keys().collect();
        ids.sort();
        f.debug_struct("ActionRegistry").field("actions", &ids).finish()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for an action id.
    pub fn register<H>(&mut self, action: impl Into<String>, handler: H) -> &mut Self
    where
        H: ActionHandler + 'static,
    {
        self.handlers.insert(action.into(), Arc::new(handler));
        self
    }

    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Build the effect future for an invocation.
    ///
    /// An unregistered id resolves to a future failing with
    /// [`ActionError::UnknownAction`].
    pub fn resolve(&self, ctx: ActionContext) -> ActionFuture {
        match self.handlers.get(&ctx.action) {
            Some(handler) => handler.call(ctx),
            None => {
                let action = ctx.action;
                Box::pin(async move { Err(ActionError::UnknownAction(action)) })
            }
        }
    }
}

/// Completion report of an action effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub key: ActionKey,
    /// Which spawn of `key` finished
    pub generation: u64,
    pub result: Result<(), ActionError>,
}

struct RunningTask {
    generation: u64,
    handle: AbortHandle,
}

/// Tracks in-flight action effects.
///
/// Different actions, even on the same record, run concurrently. Spawning a
/// key that is already in flight is refused rather than restarted. Every spawn
/// gets a fresh generation so a late outcome of a cancelled run never
/// completes its successor.
pub struct ActionTasks {
    tasks: HashMap<ActionKey, RunningTask>,
    next_generation: u64,
    outcome_tx: mpsc::UnboundedSender<ActionOutcome>,
}

impl ActionTasks {
    /// The `outcome_tx` channel receives one [`ActionOutcome`] per finished effect.
    pub fn new(outcome_tx: mpsc::UnboundedSender<ActionOutcome>) -> Self {
        Self {
            tasks: HashMap::new(),
            next_generation: 0,
            outcome_tx,
        }
    }

    /// Spawn an effect. Returns `false` if the same key is still running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&mut self, key: ActionKey, effect: ActionFuture) -> bool {
        if self.tasks.contains_key(&key) {
            tracing::debug!(action = %key, "Action already pending, ignoring");
            return false;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let inner = tokio::spawn(effect);
        self.tasks.insert(
            key.clone(),
            RunningTask {
                generation,
                handle: inner.abort_handle(),
            },
        );

        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = match inner.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => Err(ActionError::Aborted),
                Err(e) => Err(ActionError::failed(format!("handler panicked: {e}"))),
            };
            if let Err(e) = &result {
                tracing::warn!(action = %key, error = %e, "Action effect failed");
            }
            let _ = tx.send(ActionOutcome {
                key,
                generation,
                result,
            });
        });
        true
    }

    /// Forget the run an outcome belongs to. Call when an outcome is received.
    ///
    /// Returns `false` for a stale outcome (cancelled or superseded run); the
    /// caller should then ignore it.
    pub fn complete(&mut self, outcome: &ActionOutcome) -> bool {
        match self.tasks.get(&outcome.key) {
            Some(task) if task.generation == outcome.generation => {
                self.tasks.remove(&outcome.key);
                true
            }
            _ => {
                tracing::debug!(action = %outcome.key, "Ignoring stale action outcome");
                false
            }
        }
    }

    /// Abort a running effect. No-op if the key is not running.
    pub fn cancel(&mut self, key: &ActionKey) {
        if let Some(task) = self.tasks.remove(key) {
            task.handle.abort();
        }
    }

    /// Abort every running effect (shutdown).
    pub fn cancel_all(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    pub fn is_pending(&self, key: &ActionKey) -> bool {
        self.tasks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending_keys(&self) -> impl Iterator<Item = &ActionKey> {
        self.tasks.keys()
    }
}

impl Drop for ActionTasks {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
