//! Core of the edu-notify notification center
//!
//! A single-owner, reducer-driven store for notifications and messages, plus
//! everything around it that is not rendering code.
//!
//! # Core Concepts
//!
//! - **Store**: [`NotificationStore`] applies [`StoreAction`]s through a
//!   reducer and hands out immutable `Arc` snapshots
//! - **Effects**: adding a severe record yields an [`AmbientAlert`] effect
//! - **Center**: [`NotificationCenter`] owns the store, routes alerts to an
//!   [`AlertSink`], runs action effects and forwards replies
//! - **Sources**: [`EventSource`]s feed [`IncomingEvent`]s into the center
//! - **Views**: pure projections in [`view`] and [`message_view`], with
//!   presentation tables in [`display`]
//!
//! # Basic Example
//!
//! ```ignore
//! use edu_notify_core::prelude::*;
//!
//! let mut center = NotificationCenter::default();
//! let id = center.add_notification(NotificationInput::new(
//!     Category::Student,
//!     Priority::High,
//!     "Low attendance",
//!     "Three absences this week",
//! ));
//! assert_eq!(center.state().urgent_count(), 1);
//!
//! center.mark_as_read(&id);
//! assert_eq!(center.state().urgent_count(), 0);
//! ```

pub mod action;
pub mod clock;
pub mod component;
pub mod config;
pub mod dispatcher;
pub mod display;
pub mod effect;
pub mod error;
pub mod event;
pub mod message_view;
pub mod model;
pub mod sink;
pub mod source;
pub mod store;
pub mod tasks;
pub mod testing;
pub mod view;

pub use action::{Action, ActionSummary, StoreAction};
pub use clock::{Clock, ManualClock, SystemClock};
pub use component::Component;
pub use config::CenterConfig;
pub use dispatcher::NotificationCenter;
pub use display::DisplayDescriptor;
pub use effect::{AlertSeverity, AmbientAlert, DispatchResult, Effect};
pub use error::{ActionError, ConfigError};
pub use event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
pub use message_view::{modal_mode, MessageViewState, ModalMode};
pub use model::{
    ActionDescriptor, Attachment, AttachmentKind, ButtonVariant, Category, Message, MessageInput,
    MessageKind, MessageMetadata, Notification, NotificationInput, NotificationMetadata, Priority,
    RecordId, Sender, SenderKind,
};
pub use sink::{
    AlertSink, ChannelAlertSink, ChannelReplySink, NoopAlertSink, Reply, ReplySink,
    TracingAlertSink, TracingReplySink,
};
pub use source::{
    ChannelSource, EventSource, EventSources, EventStream, IncomingEvent, SimulatedSource,
    SourceKey,
};
pub use store::{
    reducer, LoggingMiddleware, Middleware, NoopMiddleware, NotificationState, NotificationStore,
};
pub use tasks::{
    ActionContext, ActionHandler, ActionKey, ActionOutcome, ActionRegistry, ActionTasks,
    RecordKind,
};
pub use view::{
    dismiss_click_action, filter_notifications, format_relative, item_click_action, tab_counts,
    NotificationFilter,
};

// Re-export ratatui types for convenience
pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, StoreAction};
    pub use crate::component::Component;
    pub use crate::config::CenterConfig;
    pub use crate::dispatcher::NotificationCenter;
    pub use crate::effect::{AlertSeverity, AmbientAlert, Effect};
    pub use crate::error::ActionError;
    pub use crate::event::{EventKind, RawEvent};
    pub use crate::message_view::{MessageViewState, ModalMode};
    pub use crate::model::{
        ActionDescriptor, ButtonVariant, Category, Message, MessageInput, MessageKind,
        Notification, NotificationInput, Priority, RecordId, Sender, SenderKind,
    };
    pub use crate::sink::{AlertSink, ReplySink};
    pub use crate::source::{EventSource, EventSources, IncomingEvent};
    pub use crate::store::{LoggingMiddleware, NotificationStore};
    pub use crate::tasks::{ActionContext, ActionOutcome, ActionRegistry, ActionTasks};
    pub use crate::view::NotificationFilter;

    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}
