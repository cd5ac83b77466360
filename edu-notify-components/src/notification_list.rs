//! Notification panel: filter tabs and the filtered list

use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;
use edu_notify_core::view::{
    dismiss_click_action, filter_notifications, format_relative, item_click_action, tab_counts,
    NotificationFilter,
};
use edu_notify_core::{display, Component, EventKind, Notification, RecordId, StoreAction};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Props for [`NotificationList`]
pub struct NotificationListProps<'a, A> {
    /// Store snapshot, most-recent-first
    pub notifications: &'a [Notification],
    pub filter: NotificationFilter,
    /// Reference time for relative timestamps
    pub now: DateTime<Utc>,
    pub is_focused: bool,
    /// Emitted when the user switches tabs
    pub on_filter: fn(NotificationFilter) -> A,
    /// Emitted for read/dismiss/clear requests
    pub on_store: fn(StoreAction) -> A,
    /// Emitted with (record, action id) when an item action is invoked
    pub on_invoke: fn(RecordId, String) -> A,
}

/// Filterable notification list.
///
/// Keys: `j`/`k`, arrows or the mouse wheel move, `Tab`/`Shift-Tab` switch filter, `Enter`
/// marks read, `d` dismisses, `a` marks all read, `c` clears all and `1`..`9`
/// invoke the selected item's actions.
#[derive(Debug, Default)]
pub struct NotificationList {
    selected: usize,
    scroll_offset: usize,
}

fn filter_label(filter: NotificationFilter) -> &'static str {
    match filter {
        NotificationFilter::All => "All",
        NotificationFilter::Unread => "Unread",
        NotificationFilter::Priority => "Priority",
        NotificationFilter::Category(category) => display::category(category).label,
    }
}

impl NotificationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Id of the highlighted notification under `filter`.
    pub fn selected_id(
        &self,
        notifications: &[Notification],
        filter: NotificationFilter,
    ) -> Option<RecordId> {
        filter_notifications(notifications, filter)
            .get(self.selected)
            .map(|n| n.id.clone())
    }

    fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn ensure_visible(&mut self, viewport_rows: usize) {
        if viewport_rows == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + viewport_rows {
            self.scroll_offset = self.selected + 1 - viewport_rows;
        }
    }

    fn render_tabs(
        frame: &mut Frame,
        area: Rect,
        notifications: &[Notification],
        active: NotificationFilter,
    ) {
        let mut spans = Vec::new();
        for (tab, count) in tab_counts(notifications) {
            let style = if tab == active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if count == 0 {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!(" {} ({}) ", filter_label(tab), count), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn item<'a>(notification: &'a Notification, now: DateTime<Utc>) -> ListItem<'a> {
        let category = display::category(notification.category);
        let priority = display::priority(notification.priority);

        let marker = if notification.is_read { "  " } else { "● " };
        let title_style = if notification.is_read {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let mut header = vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{} ", category.icon), Style::default().fg(category.color)),
            Span::styled(notification.title.as_str(), title_style),
            Span::raw("  "),
            Span::styled(priority.label, Style::default().fg(priority.color)),
        ];
        if notification.action_required {
            header.push(Span::styled(
                "  action required",
                Style::default().fg(Color::Yellow),
            ));
        }
        header.push(Span::styled(
            format!("  {}", format_relative(notification.created_at, now)),
            Style::default().fg(Color::DarkGray),
        ));

        let mut lines = vec![
            Line::from(header),
            Line::from(Span::styled(
                format!("    {}", notification.body),
                Style::default().fg(Color::Gray),
            )),
        ];

        if !notification.actions.is_empty() {
            let mut spans = vec![Span::raw("    ")];
            for (i, action) in notification.actions.iter().enumerate().take(9) {
                let variant = display::button_variant(action.variant);
                spans.push(Span::styled(
                    format!("[{}] {}", i + 1, action.label),
                    Style::default().fg(variant.color),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        ListItem::new(lines)
    }
}

impl<A> Component<A> for NotificationList {
    type Props<'a> = NotificationListProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused {
            return None;
        }

        let visible = filter_notifications(props.notifications, props.filter);
        let key = match event {
            EventKind::Key(key) => key,
            EventKind::Scroll { delta, .. } => {
                let last = visible.len().saturating_sub(1);
                self.selected = self.selected.saturating_add_signed(*delta).min(last);
                return None;
            }
            _ => return None,
        };

        self.clamp(visible.len());
        let current = visible.get(self.selected).copied();

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = (self.selected + 1).min(visible.len().saturating_sub(1));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Tab => {
                self.selected = 0;
                Some((props.on_filter)(props.filter.next()))
            }
            KeyCode::BackTab => {
                self.selected = 0;
                Some((props.on_filter)(props.filter.prev()))
            }
            KeyCode::Enter => current
                .and_then(item_click_action)
                .map(props.on_store),
            KeyCode::Char('d') | KeyCode::Delete => {
                current.map(|n| (props.on_store)(dismiss_click_action(n)))
            }
            KeyCode::Char('a') => Some((props.on_store)(StoreAction::MarkAllAsRead)),
            KeyCode::Char('c') => {
                self.selected = 0;
                Some((props.on_store)(StoreAction::ClearAll))
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                current.and_then(|n| {
                    n.actions
                        .get(index)
                        .map(|action| (props.on_invoke)(n.id.clone(), action.id.clone()))
                })
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let unread = props.notifications.iter().filter(|n| !n.is_read).count();
        let border = if props.is_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" Notifications ({unread} unread) "));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tabs_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        Self::render_tabs(frame, tabs_area, props.notifications, props.filter);

        let visible = filter_notifications(props.notifications, props.filter);
        if visible.is_empty() {
            let text = match props.filter {
                NotificationFilter::All => "No notifications",
                _ => "Nothing matches this filter",
            };
            frame.render_widget(
                Paragraph::new(Line::styled(text, Style::default().fg(Color::DarkGray)))
                    .alignment(Alignment::Center),
                list_area,
            );
            return;
        }

        self.clamp(visible.len());
        // Items are two or three rows tall
        self.ensure_visible((list_area.height / 3).max(1) as usize);

        let items: Vec<ListItem> = visible
            .iter()
            .map(|n| Self::item(n, props.now))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
            .highlight_symbol("▌");

        let mut state = ListState::default().with_selected(Some(self.selected));
        *state.offset_mut() = self.scroll_offset;
        frame.render_stateful_widget(list, list_area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use edu_notify_core::testing::{key_event, RenderHarness};
    use edu_notify_core::{assert_emitted, assert_not_emitted};
    use edu_notify_core::{ActionDescriptor, Category, NotificationInput, Priority, StoreAction};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Filter(NotificationFilter),
        Store(StoreAction),
        Invoke(RecordId, String),
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 12, 0, 0).unwrap()
    }

    fn record(id: &str, priority: Priority, is_read: bool, minutes_ago: i64) -> Notification {
        let input = NotificationInput::new(Category::Student, priority, format!("Title {id}"), "Body")
            .with_action(ActionDescriptor::new("view", "View profile"));
        Notification {
            id: id.into(),
            category: input.category,
            priority: input.priority,
            title: input.title,
            body: input.body,
            created_at: now() - Duration::minutes(minutes_ago),
            is_read,
            action_required: input.action_required,
            actions: input.actions,
            metadata: input.metadata,
        }
    }

    fn sample() -> Vec<Notification> {
        vec![
            record("n2", Priority::Critical, false, 5),
            record("n1", Priority::Low, true, 90),
        ]
    }

    fn props(
        items: &[Notification],
        filter: NotificationFilter,
    ) -> NotificationListProps<'_, TestAction> {
        NotificationListProps {
            notifications: items,
            filter,
            now: now(),
            is_focused: true,
            on_filter: TestAction::Filter,
            on_store: TestAction::Store,
            on_invoke: TestAction::Invoke,
        }
    }

    fn press(list: &mut NotificationList, items: &[Notification], k: &str) -> Vec<TestAction> {
        list.handle_event(&key_event(k), props(items, NotificationFilter::All))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_enter_marks_unread_only() {
        let items = sample();
        let mut list = NotificationList::new();

        let actions = press(&mut list, &items, "enter");
        assert_eq!(actions, vec![TestAction::Store(StoreAction::MarkAsRead("n2".into()))]);

        press(&mut list, &items, "j");
        assert!(press(&mut list, &items, "enter").is_empty());
    }

    #[test]
    fn test_dismiss_never_marks_read() {
        let items = sample();
        let mut list = NotificationList::new();

        let actions = press(&mut list, &items, "d");
        assert_emitted!(actions, TestAction::Store(StoreAction::Dismiss(_)));
        assert_not_emitted!(actions, TestAction::Store(StoreAction::MarkAsRead(_)));
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn test_number_keys_invoke_actions() {
        let items = sample();
        let mut list = NotificationList::new();

        let actions = press(&mut list, &items, "1");
        assert_eq!(
            actions,
            vec![TestAction::Invoke("n2".into(), "view".into())]
        );
        assert!(press(&mut list, &items, "2").is_empty());
    }

    #[test]
    fn test_tab_cycles_filter() {
        let items = sample();
        let mut list = NotificationList::new();

        let actions = press(&mut list, &items, "tab");
        assert_eq!(actions, vec![TestAction::Filter(NotificationFilter::Unread)]);

        let actions = press(&mut list, &items, "shift+tab");
        assert_emitted!(actions, TestAction::Filter(NotificationFilter::Category(Category::Alert)));
    }

    #[test]
    fn test_selection_is_clamped() {
        let items = sample();
        let mut list = NotificationList::new();
        for _ in 0..5 {
            press(&mut list, &items, "j");
        }
        assert_eq!(list.selected(), 1);
        assert_eq!(
            list.selected_id(&items, NotificationFilter::All),
            Some("n1".into())
        );
    }

    #[test]
    fn test_wheel_moves_selection() {
        let items = sample();
        let mut list = NotificationList::new();
        let wheel = |delta| EventKind::Scroll {
            column: 10,
            row: 5,
            delta,
        };

        for delta in [1, 1, 1] {
            let actions: Vec<TestAction> = list
                .handle_event(&wheel(delta), props(&items, NotificationFilter::All))
                .into_iter()
                .collect();
            assert!(actions.is_empty());
        }
        assert_eq!(list.selected(), 1);

        list.handle_event(&wheel(-3), props(&items, NotificationFilter::All));
        assert_eq!(list.selected(), 0);
        assert_eq!(
            list.selected_id(&items, NotificationFilter::All),
            Some("n2".into())
        );
    }

    #[test]
    fn test_empty_list_emits_nothing_for_item_keys() {
        let mut list = NotificationList::new();
        for k in ["enter", "d", "1"] {
            assert!(press(&mut list, &[], k).is_empty());
        }
    }

    #[test]
    fn test_render_shows_tabs_items_and_time() {
        let items = sample();
        let mut render = RenderHarness::new(100, 12);
        let mut list = NotificationList::new();

        let output = render.render_to_string_plain(|frame| {
            list.render(frame, frame.area(), props(&items, NotificationFilter::All));
        });

        assert!(output.contains("Notifications (1 unread)"));
        assert!(output.contains("All (2)"));
        assert!(output.contains("Unread (1)"));
        assert!(output.contains("Title n2"));
        assert!(output.contains("5m ago"));
        assert!(output.contains("1h ago"));
        assert!(output.contains("[1] View profile"));
    }

    #[test]
    fn test_render_empty_filter() {
        let items = sample();
        let mut render = RenderHarness::new(100, 8);
        let mut list = NotificationList::new();

        let output = render.render_to_string_plain(|frame| {
            let props = props(&items, NotificationFilter::Category(Category::Content));
            list.render(frame, frame.area(), props);
        });

        assert!(output.contains("Nothing matches this filter"));
    }
}
