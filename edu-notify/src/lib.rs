//! edu-notify: Notification and messaging state for education dashboards
//!
//! One store owns every notification and message. Producers add records,
//! the UI reads immutable snapshots, and every change goes through a
//! reducer. Severe records raise ambient alerts, action buttons run
//! asynchronously, and replies are forwarded to a sink.
//!
//! # Example
//! ```ignore
//! use edu_notify::prelude::*;
//!
//! let mut center = NotificationCenter::default();
//! let id = center.add_message(
//!     MessageInput::new(
//!         MessageKind::StudentAlert,
//!         Priority::High,
//!         "Student at risk",
//!         "Attendance dropped below 70%",
//!     )
//!     .requires_response(),
//! );
//!
//! let view = MessageViewState::new(&center.state().messages()[0]);
//! assert!(view.shows_reply());
//! center.dismiss_message(&id);
//! ```

// Re-export everything from core
pub use edu_notify_core::*;

// Test assertion macros
pub use edu_notify_core::{assert_alerted, assert_emitted, assert_not_emitted, count_alerts};

/// Terminal components
pub use edu_notify_components as components;

pub use edu_notify_components::{
    MessageModal, MessageModalProps, NotificationList, NotificationListProps, ReplyInput,
    ReplyInputProps, ToastQueue, ToastStack,
};

/// Prelude for convenient imports
pub mod prelude {
    // Records
    pub use edu_notify_core::{
        ActionDescriptor, Attachment, AttachmentKind, ButtonVariant, Category, Message,
        MessageInput, MessageKind, MessageMetadata, Notification, NotificationInput,
        NotificationMetadata, Priority, RecordId, Sender, SenderKind,
    };

    // Store and center
    pub use edu_notify_core::{
        Action, CenterConfig, LoggingMiddleware, Middleware, NoopMiddleware, NotificationCenter,
        NotificationState, NotificationStore, StoreAction,
    };

    // Effects, sinks and sources
    pub use edu_notify_core::{
        AlertSeverity, AlertSink, AmbientAlert, ChannelAlertSink, ChannelReplySink, ChannelSource,
        Effect, EventSource, EventSources, IncomingEvent, Reply, ReplySink, SimulatedSource,
    };

    // Action effects
    pub use edu_notify_core::{
        ActionContext, ActionError, ActionOutcome, ActionRegistry, ActionTasks,
    };

    // Views
    pub use edu_notify_core::{
        display, format_relative, modal_mode, MessageViewState, ModalMode, NotificationFilter,
    };

    // Event system
    pub use edu_notify_core::{
        process_raw_event, spawn_event_poller, Component, EventKind, RawEvent,
    };

    // Clock
    pub use edu_notify_core::{Clock, ManualClock, SystemClock};

    // Components
    pub use edu_notify_components::prelude::*;

    // Ratatui re-exports
    pub use edu_notify_core::{Color, Frame, Line, Modifier, Rect, Span, Style, Text};
}
