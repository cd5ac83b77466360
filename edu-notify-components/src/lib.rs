//! Terminal components for the edu-notify notification center
//!
//! Components implement the `Component<A>` trait from `edu-notify-core` and
//! emit actions via callback functions passed through Props. None of them
//! touch the store; the owning loop applies what they emit.
//!
//! # Components
//!
//! - [`NotificationList`] - filter tabs and the filtered notification list
//! - [`MessageModal`] - centred dialog for one message with actions and reply
//! - [`ReplyInput`] - single-line reply editor
//! - [`ToastStack`] - ambient alerts in the top-right corner
//!
//! # Example
//!
//! ```ignore
//! use edu_notify_components::{NotificationList, NotificationListProps};
//!
//! let mut list = NotificationList::new();
//! list.render(frame, area, NotificationListProps {
//!     notifications: &state.notifications(),
//!     filter: app.filter,
//!     now: clock.now(),
//!     is_focused: true,
//!     on_filter: AppAction::SetFilter,
//!     on_store: AppAction::Store,
//!     on_invoke: AppAction::Invoke,
//! });
//! ```

mod message_modal;
mod modal;
mod notification_list;
mod reply_input;
mod toast;

pub use message_modal::{MessageModal, MessageModalProps};
pub use modal::{centered_rect, dim_buffer, render_modal, ModalStyle};
pub use notification_list::{NotificationList, NotificationListProps};
pub use reply_input::{ReplyInput, ReplyInputProps};
pub use toast::{Toast, ToastQueue, ToastStack};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        centered_rect, render_modal, MessageModal, MessageModalProps, ModalStyle,
        NotificationList, NotificationListProps, ReplyInput, ReplyInputProps, ToastQueue,
        ToastStack,
    };
}
