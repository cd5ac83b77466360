//! Notification list projection: filters, tab counts, relative time, clicks
//!
//! Everything here is a pure function of a store snapshot. Components render
//! from these projections and turn clicks into [`StoreAction`]s.

use chrono::{DateTime, Utc};

use crate::action::StoreAction;
use crate::model::{Category, Notification};

/// Which subset of notifications the list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    /// High or critical priority
    Priority,
    Category(Category),
}

impl NotificationFilter {
    /// Filter tabs in display order.
    pub fn tabs() -> Vec<NotificationFilter> {
        let mut tabs = vec![
            NotificationFilter::All,
            NotificationFilter::Unread,
            NotificationFilter::Priority,
        ];
        tabs.extend(Category::ALL.into_iter().map(NotificationFilter::Category));
        tabs
    }

    pub fn matches(self, notification: &Notification) -> bool {
        match self {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !notification.is_read,
            NotificationFilter::Priority => notification.priority.is_urgent(),
            NotificationFilter::Category(category) => notification.category == category,
        }
    }

    /// Next tab, wrapping around.
    pub fn next(self) -> Self {
        let tabs = Self::tabs();
        let idx = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }

    /// Previous tab, wrapping around.
    pub fn prev(self) -> Self {
        let tabs = Self::tabs();
        let idx = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(idx + tabs.len() - 1) % tabs.len()]
    }
}

/// Notifications matching `filter`, in store order.
pub fn filter_notifications(
    notifications: &[Notification],
    filter: NotificationFilter,
) -> Vec<&Notification> {
    notifications.iter().filter(|n| filter.matches(n)).collect()
}

/// Count per filter tab, in tab order.
pub fn tab_counts(notifications: &[Notification]) -> Vec<(NotificationFilter, usize)> {
    NotificationFilter::tabs()
        .into_iter()
        .map(|tab| {
            let count = notifications.iter().filter(|n| tab.matches(n)).count();
            (tab, count)
        })
        .collect()
}

/// Human-readable age of a timestamp.
///
/// Timestamps in the future read as "Just now".
pub fn format_relative(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = elapsed.num_days();
    if days < 7 {
        return format!("{days}d ago");
    }
    created_at.format("%Y-%m-%d").to_string()
}

/// Action for clicking a list item: mark it read, only if unread.
pub fn item_click_action(notification: &Notification) -> Option<StoreAction> {
    (!notification.is_read).then(|| StoreAction::MarkAsRead(notification.id.clone()))
}

/// Action for the dismiss control. Never marks read.
pub fn dismiss_click_action(notification: &Notification) -> StoreAction {
    StoreAction::Dismiss(notification.id.clone())
}
