//! Ambient toasts for high-severity records

use std::time::{Duration, Instant};

use edu_notify_core::{display, AmbientAlert, Component};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// A visible alert and when it goes away.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub alert: AmbientAlert,
    pub expires_at: Instant,
}

/// Queue of live toasts, newest last.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    ttl: Duration,
    max_visible: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            ttl,
            max_visible: 3,
        }
    }

    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = max.max(1);
        self
    }

    /// Show an alert until `now + ttl`. The oldest toast is dropped when full.
    pub fn push(&mut self, alert: AmbientAlert, now: Instant) {
        self.toasts.push(Toast {
            alert,
            expires_at: now + self.ttl,
        });
        if self.toasts.len() > self.max_visible {
            self.toasts.remove(0);
        }
    }

    /// Drop expired toasts. Returns whether anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        self.toasts.len() != before
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Render-only stack of toasts in the top-right corner.
#[derive(Debug, Default)]
pub struct ToastStack;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

impl<A> Component<A> for ToastStack {
    type Props<'a> = &'a [Toast];

    fn render(&mut self, frame: &mut Frame, area: Rect, toasts: Self::Props<'_>) {
        let width = TOAST_WIDTH.min(area.width);
        let x = area.right().saturating_sub(width);
        let mut y = area.y;

        // Newest on top
        for toast in toasts.iter().rev() {
            if y + TOAST_HEIGHT > area.bottom() {
                break;
            }
            let rect = Rect::new(x, y, width, TOAST_HEIGHT);
            let severity = display::alert_severity(toast.alert.severity);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(severity.color))
                .title(Line::from(vec![
                    Span::raw(" "),
                    Span::styled(
                        format!("{} {}", severity.icon, toast.alert.title),
                        Style::default()
                            .fg(severity.color)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                ]));

            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(toast.alert.body.as_str())
                    .block(block)
                    .wrap(Wrap { trim: true }),
                rect,
            );
            y += TOAST_HEIGHT;
        }
    }
}
