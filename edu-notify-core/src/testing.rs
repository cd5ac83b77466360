//! Test utilities for notification center code
//!
//! - [`key`]: build a `KeyEvent` from a string such as `"shift+tab"`
//! - [`NotifyHarness`]: a center on a manual clock with recording sinks
//! - [`RenderHarness`]: render components into a `TestBackend` and read text
//! - Assertion macros over recorded alerts and emitted actions
//!
//! # Example
//!
//! ```ignore
//! use edu_notify_core::testing::NotifyHarness;
//!
//! let mut harness = NotifyHarness::new();
//! harness.center.add_notification(NotificationInput::new(
//!     Category::Alert,
//!     Priority::Critical,
//!     "System Maintenance",
//!     "Tonight",
//! ));
//! let alerts = harness.drain_alerts();
//! assert_alerted!(alerts, AmbientAlert { severity: AlertSeverity::Error, .. });
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::clock::ManualClock;
use crate::dispatcher::NotificationCenter;
use crate::effect::AmbientAlert;
use crate::event::EventKind;
use crate::model::RecordId;
use crate::sink::{AlertSink, Reply, ReplySink};
use crate::store::NotificationStore;
use crate::tasks::{ActionOutcome, ActionTasks};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Create a `KeyEvent` from a key string.
///
/// Accepts single characters, named keys (`esc`, `enter`, `tab`, `backspace`,
/// `up`, `down`, `left`, `right`, `home`, `end`, `delete`) and `ctrl+`,
/// `alt+` or `shift+` prefixes. `shift+tab` yields `BackTab`.
///
/// # Panics
///
/// Panics if the key string cannot be parsed.
pub fn key(s: &str) -> KeyEvent {
    let mut modifiers = KeyModifiers::empty();
    let mut rest = s;
    loop {
        if let Some(r) = rest.strip_prefix("ctrl+") {
            modifiers |= KeyModifiers::CONTROL;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("alt+") {
            modifiers |= KeyModifiers::ALT;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("shift+") {
            modifiers |= KeyModifiers::SHIFT;
            rest = r;
        } else {
            break;
        }
    }

    let code = match rest {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "space" => KeyCode::Char(' '),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => panic!("Invalid key string: {:?}", s),
            }
        }
    };

    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Key event for a string, wrapped for `handle_event`.
pub fn key_event(s: &str) -> EventKind {
    EventKind::Key(key(s))
}

/// Key event for typing a single character.
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Alert sink that records every alert.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlertSink {
    alerts: Arc<Mutex<Vec<AmbientAlert>>>,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<AmbientAlert> {
        std::mem::take(&mut *lock(&self.alerts))
    }
}

impl AlertSink for RecordingAlertSink {
    fn alert(&self, alert: &AmbientAlert) {
        lock(&self.alerts).push(alert.clone());
    }
}

/// Reply sink that records every forwarded reply.
#[derive(Debug, Clone, Default)]
pub struct RecordingReplySink {
    replies: Arc<Mutex<Vec<Reply>>>,
}

impl RecordingReplySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Reply> {
        std::mem::take(&mut *lock(&self.replies))
    }
}

impl ReplySink for RecordingReplySink {
    fn on_reply(&self, message: &RecordId, text: &str) {
        lock(&self.replies).push(Reply {
            message: message.clone(),
            text: text.to_string(),
        });
    }
}

/// A notification center wired for tests.
///
/// Time is frozen on a [`ManualClock`] starting at 2024-09-02 08:00 UTC.
/// Alerts and replies are recorded; action outcomes arrive on an internal
/// channel.
pub struct NotifyHarness {
    pub center: NotificationCenter,
    pub clock: ManualClock,
    pub tasks: ActionTasks,
    alerts: RecordingAlertSink,
    replies: RecordingReplySink,
    outcome_rx: mpsc::UnboundedReceiver<ActionOutcome>,
}

impl Default for NotifyHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHarness {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).single();
        Self::starting_at(start.unwrap_or_default())
    }

    pub fn starting_at(now: DateTime<Utc>) -> Self {
        let clock = ManualClock::new(now);
        let alerts = RecordingAlertSink::new();
        let replies = RecordingReplySink::new();
        let store = NotificationStore::new().with_clock(Arc::new(clock.clone()));
        let center = NotificationCenter::new(store)
            .with_alert_sink(alerts.clone())
            .with_reply_sink(replies.clone());
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            center,
            clock,
            tasks: ActionTasks::new(outcome_tx),
            alerts,
            replies,
            outcome_rx,
        }
    }

    /// Invoke an action through the center. Requires a tokio runtime.
    pub fn invoke(&mut self, record: &RecordId, action: &str) -> bool {
        self.center.invoke_action(record, action, &mut self.tasks)
    }

    /// Wait for the next action outcome and mark it complete.
    pub async fn next_outcome(&mut self) -> Option<ActionOutcome> {
        let outcome = tokio::time::timeout(Duration::from_secs(1), self.outcome_rx.recv())
            .await
            .ok()
            .flatten()?;
        self.tasks.complete(&outcome);
        Some(outcome)
    }

    pub fn drain_alerts(&self) -> Vec<AmbientAlert> {
        self.alerts.drain()
    }

    pub fn drain_replies(&self) -> Vec<Reply> {
        self.replies.drain()
    }
}

/// Renders into an in-memory terminal for assertions on output.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// # Panics
    ///
    /// Panics if the test terminal cannot be created.
    pub fn new(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .unwrap_or_else(|e| panic!("test terminal: {e}"));
        Self { terminal }
    }

    /// Draw one frame and return the buffer.
    pub fn render<F>(&mut self, draw: F) -> &Buffer
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal
            .draw(draw)
            .unwrap_or_else(|e| panic!("draw failed: {e}"));
        self.terminal.backend().buffer()
    }

    /// Draw one frame and return its text, one line per row, styles dropped.
    pub fn render_to_string_plain<F>(&mut self, draw: F) -> String
    where
        F: FnOnce(&mut Frame),
    {
        buffer_to_string_plain(self.render(draw))
    }
}

/// Text content of a buffer, one line per row, trailing spaces trimmed.
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Assert that an alert matching a pattern was recorded.
#[macro_export]
macro_rules! assert_alerted {
    ($alerts:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $alerts.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected alert matching `{}`, but got: {:?}",
            stringify!($pattern),
            $alerts
        );
    };
}

/// Count recorded alerts matching a pattern.
#[macro_export]
macro_rules! count_alerts {
    ($alerts:expr, $pattern:pat $(if $guard:expr)?) => {
        $alerts.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}

/// Assert that a component emitted an action matching a pattern.
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no emitted action matches a pattern.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}
