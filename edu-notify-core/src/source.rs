//! Pluggable event sources feeding the dispatcher
//!
//! An [`EventSource`] turns some external producer into a stream of
//! [`IncomingEvent`]s. [`EventSources`] runs each attached source on its own
//! task and forwards events into a channel consumed by the loop that owns the
//! [`NotificationCenter`](crate::dispatcher::NotificationCenter).
//!
//! # Example
//!
//! ```ignore
//! let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut sources = EventSources::new(event_tx);
//!
//! // Demo adapter: random notifications every 30s
//! sources.attach("simulated", SimulatedSource::new(Duration::from_secs(30), 0.1));
//!
//! // Real producers push into a channel
//! let (producer_tx, producer_rx) = tokio::sync::mpsc::unbounded_channel();
//! sources.attach("grading", ChannelSource::new(producer_rx));
//!
//! while let Some(event) = event_rx.recv().await {
//!     center.handle_event(event);
//! }
//!
//! // Stop all sources on teardown
//! sources.cancel_all();
//! ```

use std::collections::HashMap;
use std::pin::Pin;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::{IntervalStream, UnboundedReceiverStream};
use tokio_stream::{Stream, StreamExt};

use crate::model::{Category, MessageInput, NotificationInput, Priority};

/// Boxed stream of incoming events.
pub type EventStream = Pin<Box<dyn Stream<Item = IncomingEvent> + Send>>;

/// Something another feature wants the user to know about.
#[derive(Clone, Debug, PartialEq)]
pub enum IncomingEvent {
    Notification(NotificationInput),
    Message(MessageInput),
}

impl From<NotificationInput> for IncomingEvent {
    fn from(input: NotificationInput) -> Self {
        Self::Notification(input)
    }
}

impl From<MessageInput> for IncomingEvent {
    fn from(input: MessageInput) -> Self {
        Self::Message(input)
    }
}

/// A producer of incoming events.
pub trait EventSource: Send + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Consume the source into its event stream.
    fn into_stream(self: Box<Self>) -> EventStream;
}

/// Identifies an attached source for cancellation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SourceKey(String);

impl SourceKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for SourceKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Runs attached sources until cancelled or dropped.
pub struct EventSources {
    handles: HashMap<SourceKey, JoinHandle<()>>,
    event_tx: mpsc::UnboundedSender<IncomingEvent>,
}

impl EventSources {
    /// Create a source manager forwarding into `event_tx`.
    pub fn new(event_tx: mpsc::UnboundedSender<IncomingEvent>) -> Self {
        Self {
            handles: HashMap::new(),
            event_tx,
        }
    }

    /// Attach a source. An existing source with the same key is cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach<S: EventSource>(&mut self, key: impl Into<SourceKey>, source: S) -> &mut Self {
        let key = key.into();
        tracing::debug!(key = key.name(), source = source.name(), "Attaching event source");
        let stream = Box::new(source).into_stream();
        self.stream(key, stream)
    }

    /// Attach any stream of events as a source.
    pub fn stream<S>(&mut self, key: impl Into<SourceKey>, stream: S) -> &mut Self
    where
        S: Stream<Item = IncomingEvent> + Send + 'static,
    {
        let key = key.into();

        // Cancel existing source with this key
        self.cancel(&key);

        let tx = self.event_tx.clone();
        let name = key.name().to_string();
        let handle = tokio::spawn(async move {
            tokio::pin!(stream);
            while let Some(event) = stream.next().await {
                if tx.send(event).is_err() {
                    // Channel closed, stop the source
                    break;
                }
            }
            tracing::debug!(source = %name, "Event source finished");
        });

        self.handles.insert(key, handle);
        self
    }

    /// Cancel a source by key. No-op if absent.
    pub fn cancel(&mut self, key: &SourceKey) {
        if let Some(handle) = self.handles.remove(key) {
            handle.abort();
        }
    }

    /// Cancel all sources.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    pub fn is_active(&self, key: &SourceKey) -> bool {
        self.handles.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn active_keys(&self) -> impl Iterator<Item = &SourceKey> {
        self.handles.keys()
    }
}

impl Drop for EventSources {
    fn drop(&mut self) {
        // Abort all sources on drop so no timer outlives its owner
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

/// Source backed by a channel that other features write into.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<IncomingEvent>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::UnboundedReceiver<IncomingEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelSource {
    fn name(&self) -> &str {
        "channel"
    }

    fn into_stream(self: Box<Self>) -> EventStream {
        Box::pin(UnboundedReceiverStream::new(self.rx))
    }
}

const SIMULATED_CATEGORIES: [Category; 4] = [
    Category::Ai,
    Category::Student,
    Category::Class,
    Category::System,
];

const SIMULATED_PRIORITIES: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

const SIMULATED_EVENTS: [(&str, &str); 4] = [
    (
        "New AI Insight",
        "Students are showing improved engagement in today's lesson",
    ),
    (
        "Assignment Submitted",
        "A student has submitted their homework early",
    ),
    (
        "Class Update",
        "Attendance has been recorded for the current period",
    ),
    (
        "Content Suggestion",
        "New teaching resources are available for this unit",
    ),
];

/// Demo source: on every tick, with probability `probability`, emits a
/// notification with a random category and priority.
#[derive(Debug)]
pub struct SimulatedSource {
    interval: Duration,
    probability: f64,
    rng: StdRng,
}

impl SimulatedSource {
    pub fn new(interval: Duration, probability: f64) -> Self {
        Self {
            interval,
            probability: probability.clamp(0.0, 1.0),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence of picks.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn roll(&mut self) -> Option<NotificationInput> {
        if !self.rng.gen_bool(self.probability) {
            return None;
        }
        let category = *SIMULATED_CATEGORIES.choose(&mut self.rng)?;
        let priority = *SIMULATED_PRIORITIES.choose(&mut self.rng)?;
        let (title, body) = *SIMULATED_EVENTS.choose(&mut self.rng)?;
        Some(NotificationInput::new(category, priority, title, body))
    }
}

impl EventSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    fn into_stream(self: Box<Self>) -> EventStream {
        let mut source = *self;
        let mut interval = tokio::time::interval(source.interval);
        // Skip the immediate first tick
        interval.reset();
        Box::pin(
            IntervalStream::new(interval)
                .filter_map(move |_| source.roll().map(IncomingEvent::Notification)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn recv(rx: &mut mpsc::UnboundedReceiver<IncomingEvent>, ms: u64) -> Option<IncomingEvent> {
        tokio::time::timeout(Duration::from_millis(ms), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[test]
    fn test_source_key() {
        let k1 = SourceKey::new("sim");
        let k2: SourceKey = "sim".into();
        assert_eq!(k1, k2);
        assert_eq!(k1.name(), "sim");
    }

    #[test]
    fn test_roll_respects_probability() {
        let mut always = SimulatedSource::new(Duration::from_secs(1), 1.0).with_seed(7);
        let mut never = SimulatedSource::new(Duration::from_secs(1), 0.0).with_seed(7);

        for _ in 0..50 {
            let input = always.roll().expect("probability 1 always emits");
            assert!(SIMULATED_CATEGORIES.contains(&input.category));
            assert!(SIMULATED_PRIORITIES.contains(&input.priority));
            assert!(never.roll().is_none());
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimulatedSource::new(Duration::from_secs(1), 0.5).with_seed(42);
        let mut b = SimulatedSource::new(Duration::from_secs(1), 0.5).with_seed(42);
        for _ in 0..20 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_probability_is_clamped() {
        assert_eq!(SimulatedSource::new(Duration::from_secs(1), 3.0).probability(), 1.0);
        assert_eq!(SimulatedSource::new(Duration::from_secs(1), -1.0).probability(), 0.0);
    }

    #[tokio::test]
    async fn test_simulated_source_emits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sources = EventSources::new(tx);
        sources.attach("sim", SimulatedSource::new(Duration::from_millis(10), 1.0));

        let event = recv(&mut rx, 200).await.expect("should emit");
        assert!(matches!(event, IncomingEvent::Notification(_)));
    }

    #[tokio::test]
    async fn test_channel_source_forwards_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sources = EventSources::new(tx);
        let (producer_tx, producer_rx) = mpsc::unbounded_channel();
        sources.attach("producer", ChannelSource::new(producer_rx));

        for title in ["one", "two"] {
            producer_tx
                .send(NotificationInput::new(Category::Class, Priority::Low, title, "").into())
                .unwrap();
        }

        let mut titles = vec![];
        for _ in 0..2 {
            if let Some(IncomingEvent::Notification(n)) = recv(&mut rx, 200).await {
                titles.push(n.title);
            }
        }
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_cancel_stops_source() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sources = EventSources::new(tx);
        sources.attach("sim", SimulatedSource::new(Duration::from_millis(10), 1.0));
        assert!(sources.is_active(&SourceKey::new("sim")));

        let _ = recv(&mut rx, 100).await;
        sources.cancel(&SourceKey::new("sim"));
        assert!(!sources.is_active(&SourceKey::new("sim")));

        // Let the abort land, then clear anything already queued
        tokio::time::sleep(Duration::from_millis(20)).await;
        while rx.try_recv().is_ok() {}

        assert!(recv(&mut rx, 50).await.is_none(), "no events after cancel");
    }

    #[tokio::test]
    async fn test_drop_stops_sources() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut sources = EventSources::new(tx);
            sources.attach("sim", SimulatedSource::new(Duration::from_millis(10), 1.0));
            let _ = recv(&mut rx, 100).await;
        }

        // Once every sender is gone the channel closes
        let closed = tokio::time::timeout(Duration::from_millis(200), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok(), "channel should close after drop");
    }

    #[tokio::test]
    async fn test_replace_existing_source() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut sources = EventSources::new(tx);

        sources.attach("sim", SimulatedSource::new(Duration::from_secs(10), 1.0));
        sources.attach("sim", SimulatedSource::new(Duration::from_secs(10), 0.5));
        sources.attach("other", SimulatedSource::new(Duration::from_secs(10), 0.5));

        assert_eq!(sources.len(), 2);
        let mut keys: Vec<_> = sources.active_keys().map(SourceKey::name).collect();
        keys.sort();
        assert_eq!(keys, vec!["other", "sim"]);

        sources.cancel_all();
        assert!(sources.is_empty());
    }
}
