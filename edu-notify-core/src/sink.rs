//! Outbound collaborators: ambient alerts and replies
//!
//! Both sinks are fire-and-forget. The dispatcher never inspects a return
//! value and a sink must not panic the caller.

use tokio::sync::mpsc;

use crate::effect::{AlertSeverity, AmbientAlert};
use crate::model::RecordId;

/// Receives toast-equivalent alerts for high-severity records.
pub trait AlertSink {
    fn alert(&self, alert: &AmbientAlert);
}

/// Receives replies typed into a message view.
pub trait ReplySink {
    fn on_reply(&self, message: &RecordId, text: &str);
}

/// Discards alerts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAlertSink;

impl AlertSink for NoopAlertSink {
    fn alert(&self, _alert: &AmbientAlert) {}
}

/// Writes alerts to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn alert(&self, alert: &AmbientAlert) {
        match alert.severity {
            AlertSeverity::Error => {
                tracing::error!(record = %alert.record, title = %alert.title, "{}", alert.body)
            }
            AlertSeverity::Warning => {
                tracing::warn!(record = %alert.record, title = %alert.title, "{}", alert.body)
            }
            AlertSeverity::Info => {
                tracing::info!(record = %alert.record, title = %alert.title, "{}", alert.body)
            }
        }
    }
}

/// Forwards alerts into a channel, e.g. a toast queue on the UI loop.
#[derive(Debug, Clone)]
pub struct ChannelAlertSink {
    tx: mpsc::UnboundedSender<AmbientAlert>,
}

impl ChannelAlertSink {
    pub fn new(tx: mpsc::UnboundedSender<AmbientAlert>) -> Self {
        Self { tx }
    }
}

impl AlertSink for ChannelAlertSink {
    fn alert(&self, alert: &AmbientAlert) {
        if self.tx.send(alert.clone()).is_err() {
            tracing::debug!(record = %alert.record, "Alert channel closed, dropping alert");
        }
    }
}

/// Writes replies to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReplySink;

impl ReplySink for TracingReplySink {
    fn on_reply(&self, message: &RecordId, text: &str) {
        tracing::info!(message = %message, len = text.len(), "Reply submitted");
    }
}

/// A reply captured from a message view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: RecordId,
    pub text: String,
}

/// Forwards replies into a channel.
#[derive(Debug, Clone)]
pub struct ChannelReplySink {
    tx: mpsc::UnboundedSender<Reply>,
}

impl ChannelReplySink {
    pub fn new(tx: mpsc::UnboundedSender<Reply>) -> Self {
        Self { tx }
    }
}

impl ReplySink for ChannelReplySink {
    fn on_reply(&self, message: &RecordId, text: &str) {
        let reply = Reply {
            message: message.clone(),
            text: text.to_string(),
        };
        if self.tx.send(reply).is_err() {
            tracing::debug!(message = %message, "Reply channel closed, dropping reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_alert_sink_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelAlertSink::new(tx);
        let alert = AmbientAlert {
            record: "n_1_0".into(),
            title: "Low attendance".into(),
            body: "Period 3".into(),
            severity: AlertSeverity::Warning,
        };

        sink.alert(&alert);

        assert_eq!(rx.try_recv().unwrap(), alert);
    }

    #[test]
    fn test_channel_sinks_survive_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ChannelReplySink::new(tx).on_reply(&"m_1_0".into(), "thanks");
    }
}
