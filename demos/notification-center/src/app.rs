//! Demo application state, update and render

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use edu_notify::components::{
    MessageModal, MessageModalProps, NotificationList, NotificationListProps, ToastQueue,
    ToastStack,
};
use edu_notify::{
    ActionOutcome, ActionTasks, Clock, Component, EventKind, IncomingEvent, LoggingMiddleware,
    MessageViewState, NotificationCenter, NotificationFilter,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::action::AppAction;

pub type Center = NotificationCenter<LoggingMiddleware>;

pub struct App {
    pub center: Center,
    pub tasks: ActionTasks,
    pub filter: NotificationFilter,
    pub toasts: ToastQueue,
    /// View state of the message shown in the modal, if any
    pub open: Option<MessageViewState>,
    list: NotificationList,
    modal: MessageModal,
}

impl App {
    pub fn new(
        center: Center,
        outcome_tx: mpsc::UnboundedSender<ActionOutcome>,
        toast_ttl: Duration,
    ) -> Self {
        Self {
            center,
            tasks: ActionTasks::new(outcome_tx),
            filter: NotificationFilter::All,
            toasts: ToastQueue::new(toast_ttl),
            open: None,
            list: NotificationList::new(),
            modal: MessageModal::new(),
        }
    }

    pub fn is_message_open(&self) -> bool {
        self.open.is_some()
    }

    /// Map a terminal event to actions. The modal, when open, takes all input.
    pub fn handle_event(&mut self, event: &EventKind) -> Vec<AppAction> {
        match event {
            EventKind::Resize(..) => return vec![AppAction::Redraw],
            EventKind::Tick => return vec![AppAction::Tick],
            _ => {}
        }
        if event.is_quit() {
            return vec![AppAction::Quit];
        }

        let now = self.center.store().clock().now();

        if let Some(view) = &self.open {
            let messages = self.center.state().messages();
            let Some(message) = messages.iter().find(|m| m.id == view.message) else {
                return Vec::new();
            };
            let props = MessageModalProps {
                message,
                view,
                now,
                on_close: AppAction::CloseMessage,
                on_invoke: AppAction::Invoke,
                on_open_reply: AppAction::OpenReply,
                on_reply_change: AppAction::ReplyChange,
                on_reply_submit: AppAction::ReplySubmit,
                on_reply_cancel: AppAction::ReplyCancel,
            };
            return self.modal.handle_event(event, props).into_iter().collect();
        }

        if let Some(key) = event.key() {
            match key.code {
                KeyCode::Char('q') => return vec![AppAction::Quit],
                KeyCode::Char('m') => return vec![AppAction::OpenLatestMessage],
                _ => {}
            }
        }

        let notifications = self.center.state().notifications();
        let props = NotificationListProps {
            notifications: &notifications,
            filter: self.filter,
            now,
            is_focused: true,
            on_filter: AppAction::SetFilter,
            on_store: AppAction::Store,
            on_invoke: AppAction::Invoke,
        };
        let before = self.list.selected();
        let mut actions: Vec<AppAction> =
            self.list.handle_event(event, props).into_iter().collect();
        if actions.is_empty() && self.list.selected() != before {
            actions.push(AppAction::Redraw);
        }
        actions
    }

    /// Apply an action. Returns whether a redraw is needed.
    pub fn update(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::SetFilter(filter) => {
                self.filter = filter;
                true
            }
            AppAction::Store(action) => self.center.apply(action),
            AppAction::Invoke(record, action) => {
                if !self.center.invoke_action(&record, &action, &mut self.tasks) {
                    return false;
                }
                if let Some(view) = self.open.as_mut().filter(|v| v.message == record) {
                    view.begin_action(&action);
                }
                true
            }
            AppAction::ActionFinished(outcome) => {
                if !self.tasks.complete(&outcome) {
                    return false;
                }
                if let Some(view) = self.open.as_mut().filter(|v| v.message == outcome.key.record) {
                    view.finish_action(&outcome.key.action, &outcome.result);
                }
                true
            }

            AppAction::OpenLatestMessage => {
                let Some(message) = self.center.state().messages().first().cloned() else {
                    return false;
                };
                self.modal.reset();
                self.open = Some(MessageViewState::new(&message));
                true
            }
            AppAction::CloseMessage(id) => {
                self.center.dismiss_message(&id);
                self.open = None;
                self.modal.reset();
                true
            }
            AppAction::OpenReply(_) => self.with_view(|view| view.open_reply()),
            AppAction::ReplyChange(text) => self.with_view(|view| view.reply_text = text),
            AppAction::ReplyCancel(_) => self.with_view(|view| view.cancel_reply()),
            AppAction::ReplySubmit(_) => {
                let Some(view) = self.open.as_mut() else {
                    return false;
                };
                if let Some(text) = view.take_reply() {
                    self.center.submit_reply(&view.message, &text);
                }
                true
            }

            AppAction::Incoming(event) => {
                let is_message = matches!(event, IncomingEvent::Message(_));
                let id = self.center.handle_event(event);
                if is_message && self.open.is_none() {
                    if let Some(message) = self.center.state().message(&id) {
                        self.modal.reset();
                        self.open = Some(MessageViewState::new(message));
                    }
                }
                true
            }
            AppAction::Alert(alert) => {
                self.toasts.push(alert, Instant::now());
                true
            }
            // Relative timestamps and toast expiry both move with time
            AppAction::Tick => {
                self.toasts.expire(Instant::now());
                true
            }
            AppAction::Redraw => true,
            AppAction::Quit => false,
        }
    }

    fn with_view(&mut self, f: impl FnOnce(&mut MessageViewState)) -> bool {
        match self.open.as_mut() {
            Some(view) => {
                f(view);
                true
            }
            None => false,
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let now = self.center.store().clock().now();
        let notifications = self.center.state().notifications();
        let messages = self.center.state().messages();

        self.render_header(frame, header, messages.len());

        self.list.render(
            frame,
            body,
            NotificationListProps {
                notifications: &notifications,
                filter: self.filter,
                now,
                is_focused: self.open.is_none(),
                on_filter: AppAction::SetFilter,
                on_store: AppAction::Store,
                on_invoke: AppAction::Invoke,
            },
        );

        let help = if self.open.is_some() {
            "Esc close  Enter acknowledge  r reply  1-9 actions"
        } else {
            "j/k move  Tab filter  Enter read  d dismiss  a read all  c clear  m messages  q quit"
        };
        frame.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            footer,
        );

        if let Some(view) = &self.open {
            if let Some(message) = messages.iter().find(|m| m.id == view.message) {
                self.modal.render(
                    frame,
                    area,
                    MessageModalProps {
                        message,
                        view,
                        now,
                        on_close: AppAction::CloseMessage,
                        on_invoke: AppAction::Invoke,
                        on_open_reply: AppAction::OpenReply,
                        on_reply_change: AppAction::ReplyChange,
                        on_reply_submit: AppAction::ReplySubmit,
                        on_reply_cancel: AppAction::ReplyCancel,
                    },
                );
            }
        }

        Component::<AppAction>::render(&mut ToastStack, frame, area, self.toasts.toasts());
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, message_count: usize) {
        let state = self.center.state();
        let urgent = state.urgent_count();
        let urgent_style = if urgent > 0 {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let line = Line::from(vec![
            Span::styled(" EduNotify ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(format!("‼ {urgent} urgent"), urgent_style),
            Span::raw("  "),
            Span::styled(
                format!("✉ {message_count} messages"),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("  {} running", self.tasks.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use chrono::{TimeZone, Utc};
    use edu_notify::testing::key_event;
    use edu_notify::{
        ManualClock, MessageInput, MessageKind, NotificationInput, NotificationStore, Priority,
    };

    fn app() -> App {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap());
        let store =
            NotificationStore::with_middleware(LoggingMiddleware::new()).with_clock(Arc::new(clock));
        let (outcome_tx, _outcome_rx) = mpsc::unbounded_channel();
        App::new(NotificationCenter::new(store), outcome_tx, Duration::from_secs(5))
    }

    fn message(requires_response: bool) -> IncomingEvent {
        let input = MessageInput::new(MessageKind::StudentAlert, Priority::High, "At risk", "");
        let input = if requires_response {
            input.requires_response()
        } else {
            input
        };
        IncomingEvent::from(input)
    }

    #[test]
    fn test_incoming_message_opens_modal() {
        let mut app = app();
        app.update(AppAction::Incoming(message(false)));
        assert!(app.is_message_open());

        // A second message does not replace the open one
        let first = app.open.as_ref().unwrap().message.clone();
        app.update(AppAction::Incoming(message(false)));
        assert_eq!(app.open.as_ref().unwrap().message, first);
    }

    #[test]
    fn test_close_dismisses_message() {
        let mut app = app();
        app.update(AppAction::Incoming(message(false)));
        let id = app.open.as_ref().unwrap().message.clone();
        app.update(AppAction::CloseMessage(id));
        assert!(!app.is_message_open());
        assert_eq!(app.center.state().message_count(), 0);
    }

    #[test]
    fn test_keys_go_to_modal_when_open() {
        let mut app = app();
        app.update(AppAction::Incoming(IncomingEvent::from(NotificationInput::new(
            edu_notify::Category::Class,
            Priority::Low,
            "Roster",
            "",
        ))));
        app.update(AppAction::Incoming(message(false)));

        let actions = app.handle_event(&key_event("esc"));
        assert!(matches!(actions.as_slice(), [AppAction::CloseMessage(_)]));

        // 'q' quits only from the list
        assert!(app.handle_event(&key_event("q")).is_empty());
    }

    #[test]
    fn test_list_keys_when_no_modal() {
        let mut app = app();
        assert_eq!(app.handle_event(&key_event("q")), vec![AppAction::Quit]);
        assert_eq!(app.handle_event(&key_event("m")), vec![AppAction::OpenLatestMessage]);
        assert_eq!(app.handle_event(&key_event("ctrl+c")), vec![AppAction::Quit]);
    }

    #[test]
    fn test_reply_submit_forwards_and_resets() {
        let mut app = app();
        app.update(AppAction::Incoming(message(true)));
        app.update(AppAction::ReplyChange("   ".into()));
        app.update(AppAction::ReplySubmit("   ".into()));
        assert_eq!(app.open.as_ref().unwrap().reply_text, "   ");

        app.update(AppAction::ReplyChange("Calling home".into()));
        app.update(AppAction::ReplySubmit("Calling home".into()));
        let view = app.open.as_ref().unwrap();
        assert!(view.reply_text.is_empty());
        assert!(view.shows_reply());
    }

    #[test]
    fn test_alerts_become_toasts() {
        let mut app = app();
        app.update(AppAction::Alert(edu_notify::AmbientAlert {
            record: "n_1_0".into(),
            title: "Outage".into(),
            body: "".into(),
            severity: edu_notify::AlertSeverity::Error,
        }));
        assert_eq!(app.toasts.toasts().len(), 1);
    }

    #[test]
    fn test_filter_change() {
        let mut app = app();
        assert!(app.update(AppAction::SetFilter(NotificationFilter::Unread)));
        assert_eq!(app.filter, NotificationFilter::Unread);
    }
}
