//! Terminal input events and the crossterm poller

use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Input delivered to components.
#[derive(Debug, Clone)]
pub enum EventKind {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Scroll wheel, positive `delta` is down
    Scroll { column: u16, row: u16, delta: isize },
    Resize(u16, u16),
    /// Periodic tick, used for toast expiry and spinners
    Tick,
}

impl EventKind {
    /// The key event, if this is one.
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            EventKind::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Ctrl+C or Ctrl+Q.
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            EventKind::Key(key)
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        )
    }
}

/// Event as read from crossterm, before normalisation.
#[derive(Debug, Clone)]
pub enum RawEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Poll crossterm on a background task until `cancel_token` fires.
///
/// Reads at most a small batch of events per `loop_sleep` so a flood of input
/// cannot starve the rest of the loop.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    tracing::info!("Event poller cancelled");
                    // Leave nothing in the crossterm buffer for the shell
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut read = 0;
                    while read < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        read += 1;
                        let raw = match event::read() {
                            Ok(event::Event::Key(key)) => RawEvent::Key(key),
                            Ok(event::Event::Mouse(mouse)) => RawEvent::Mouse(mouse),
                            Ok(event::Event::Resize(w, h)) => RawEvent::Resize(w, h),
                            _ => continue,
                        };
                        if tx.send(raw).is_err() {
                            tracing::debug!("Input channel closed, stopping poller");
                            return;
                        }
                    }
                }
            }
        }
    })
}

/// Normalise a raw event; wheel events become [`EventKind::Scroll`].
pub fn process_raw_event(raw: RawEvent) -> EventKind {
    match raw {
        RawEvent::Key(key) => EventKind::Key(key),
        RawEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => EventKind::Scroll {
                column: mouse.column,
                row: mouse.row,
                delta: 1,
            },
            MouseEventKind::ScrollUp => EventKind::Scroll {
                column: mouse.column,
                row: mouse.row,
                delta: -1,
            },
            _ => EventKind::Mouse(mouse),
        },
        RawEvent::Resize(w, h) => EventKind::Resize(w, h),
    }
}
