use edu_notify::{
    ActionOutcome, AmbientAlert, IncomingEvent, NotificationFilter, RecordId, StoreAction,
};

/// Everything the demo loop reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // ===== Notification list =====
    SetFilter(NotificationFilter),
    Store(StoreAction),
    Invoke(RecordId, String),

    // ===== Message modal =====
    OpenLatestMessage,
    CloseMessage(RecordId),
    OpenReply(RecordId),
    ReplyChange(String),
    ReplySubmit(String),
    ReplyCancel(RecordId),

    // ===== Background =====
    Incoming(IncomingEvent),
    Alert(AmbientAlert),
    ActionFinished(ActionOutcome),
    Tick,
    Redraw,

    Quit,
}
