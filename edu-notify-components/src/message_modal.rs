//! Modal presentation of a single message

use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;
use edu_notify_core::message_view::{modal_mode, MessageViewState, ModalMode};
use edu_notify_core::view::format_relative;
use edu_notify_core::{display, Component, EventKind, Message, RecordId};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::modal::{centered_rect, render_modal, ModalStyle};
use crate::reply_input::{ReplyInput, ReplyInputProps};

/// Props for [`MessageModal`]
pub struct MessageModalProps<'a, A> {
    pub message: &'a Message,
    pub view: &'a MessageViewState,
    pub now: DateTime<Utc>,
    /// Esc, or Enter outside the reply box
    pub on_close: fn(RecordId) -> A,
    /// Emitted with (message, action id)
    pub on_invoke: fn(RecordId, String) -> A,
    pub on_open_reply: fn(RecordId) -> A,
    pub on_reply_change: fn(String) -> A,
    /// Emitted with the reply text on Enter, only when it is not blank
    pub on_reply_submit: fn(String) -> A,
    pub on_reply_cancel: fn(RecordId) -> A,
}

/// Centred message dialog over a dimmed background.
///
/// Keys: `Esc` closes (or leaves the reply box), `Enter` acknowledges, `r`
/// opens the reply box, `Tab` moves focus in and out of it and `1`..`9`
/// invoke actions.
#[derive(Debug, Default)]
pub struct MessageModal {
    reply: ReplyInput,
    reply_focused: bool,
}

const SPINNER: &str = "⟳";
const REPLY_PLACEHOLDER: &str = "Write a reply...";

impl MessageModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reply_focused(&self) -> bool {
        self.reply_focused
    }

    /// Drop local focus state when a different message is opened.
    pub fn reset(&mut self) {
        self.reply = ReplyInput::new();
        self.reply_focused = false;
    }

    fn body_lines<'a>(message: &'a Message, now: DateTime<Utc>) -> Vec<Line<'a>> {
        let kind = display::message_kind(message.kind);
        let priority = display::priority(message.priority);
        let muted = Style::default().fg(Color::DarkGray);

        let mut header = vec![
            Span::styled(
                format!("{} {}", kind.icon, kind.label),
                Style::default().fg(kind.color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(priority.label, Style::default().fg(priority.color)),
        ];
        if let Some(from) = &message.from {
            let sender = display::sender(from.kind);
            header.push(Span::styled(
                format!("  from {} ({})", from.name, sender.label),
                Style::default().fg(sender.color),
            ));
        }
        header.push(Span::styled(
            format!("  {}", format_relative(message.created_at, now)),
            muted,
        ));

        let mut lines = vec![Line::from(header), Line::raw(""), Line::raw(message.body.as_str())];

        if let Some(details) = &message.details {
            lines.push(Line::raw(""));
            lines.push(Line::styled(details.as_str(), Style::default().fg(Color::Gray)));
        }

        if let Some(meta) = &message.metadata {
            let mut facts = Vec::new();
            if let Some(student) = &meta.student_name {
                facts.push(format!("Student: {student}"));
            }
            if let Some(class) = &meta.class_name {
                facts.push(format!("Class: {class}"));
            }
            if let Some(risk) = meta.risk_score {
                facts.push(format!("Risk score: {:.0}%", risk * 100.0));
            }
            if let Some(deadline) = meta.deadline {
                facts.push(format!("Deadline: {}", deadline.format("%Y-%m-%d %H:%M")));
            }
            if !facts.is_empty() {
                lines.push(Line::raw(""));
                lines.extend(facts.into_iter().map(|f| Line::styled(f, muted)));
            }
        }

        if !message.attachments.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::styled("Attachments", Style::default().add_modifier(Modifier::BOLD)));
            for attachment in &message.attachments {
                let size = attachment
                    .size
                    .map(|s| format!(" ({} KB)", s.div_ceil(1024)))
                    .unwrap_or_default();
                lines.push(Line::raw(format!(
                    "  {} {}{}",
                    display::attachment(attachment.kind).icon,
                    attachment.name,
                    size
                )));
            }
        }

        lines
    }

    fn button_line<'a>(
        message: &'a Message,
        view: &MessageViewState,
        mode: ModalMode,
    ) -> Line<'a> {
        let mut spans = Vec::new();
        for (i, action) in message.actions.iter().enumerate().take(9) {
            let variant = display::button_variant(action.variant);
            let pending = view.is_pending(&action.id);
            let label = if pending {
                format!(" {SPINNER} {} ", action.label)
            } else {
                format!(" [{}] {} ", i + 1, action.label)
            };
            let style = if pending {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Black).bg(variant.color)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }

        let close = match mode {
            ModalMode::Blocking => Span::styled(
                " [Enter] Acknowledge ",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            ModalMode::Standard => {
                Span::styled(" [Esc] Close ", Style::default().fg(Color::Gray))
            }
        };
        spans.push(close);
        if !message.requires_response && !view.reply_open {
            spans.push(Span::styled("  [r] Reply", Style::default().fg(Color::Gray)));
        }
        Line::from(spans)
    }
}

impl<A> Component<A> for MessageModal {
    type Props<'a> = MessageModalProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        let EventKind::Key(key) = event else {
            return None;
        };
        let id = props.message.id.clone();
        let reply_visible = props.view.shows_reply();
        if !reply_visible {
            self.reply_focused = false;
        }

        if self.reply_focused {
            return match key.code {
                KeyCode::Esc => {
                    self.reply_focused = false;
                    if props.message.requires_response {
                        None
                    } else {
                        Some((props.on_reply_cancel)(id))
                    }
                }
                KeyCode::Tab => {
                    self.reply_focused = false;
                    None
                }
                _ => self
                    .reply
                    .handle_event(
                        event,
                        ReplyInputProps {
                            value: &props.view.reply_text,
                            placeholder: REPLY_PLACEHOLDER,
                            is_focused: true,
                            can_submit: props.view.can_submit(),
                            on_change: props.on_reply_change,
                            on_submit: props.on_reply_submit,
                        },
                    )
                    .into_iter()
                    .next(),
            };
        }

        match key.code {
            KeyCode::Esc => Some((props.on_close)(id)),
            KeyCode::Enter => Some((props.on_close)(id)),
            KeyCode::Tab if reply_visible => {
                self.reply_focused = true;
                self.reply.move_to_end(&props.view.reply_text);
                None
            }
            KeyCode::Char('r') => {
                self.reply_focused = true;
                self.reply.move_to_end(&props.view.reply_text);
                if reply_visible {
                    None
                } else {
                    Some((props.on_open_reply)(id))
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                props
                    .message
                    .actions
                    .get(index)
                    .map(|action| (props.on_invoke)(id, action.id.clone()))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let mode = modal_mode(props.message);
        let kind = display::message_kind(props.message.kind);
        let show_reply = props.view.shows_reply();

        let height = if show_reply { 22 } else { 18 };
        let modal_area = centered_rect(72, height, area);
        let style = match mode {
            ModalMode::Blocking => ModalStyle::severe(),
            ModalMode::Standard => ModalStyle::with_bg(Color::Rgb(24, 24, 32)),
        };
        render_modal(frame, modal_area, &style);

        let (border_type, border_color) = match mode {
            ModalMode::Blocking => (BorderType::Double, Color::Red),
            ModalMode::Standard => (BorderType::Rounded, kind.color),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(border_color))
            .title(Line::from(format!(" {} {} ", kind.icon, props.message.title)).bold());
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let error_rows = u16::from(props.view.last_error.is_some());
        let reply_rows = if show_reply { 3 } else { 0 };
        let [body_area, error_area, reply_area, buttons_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(error_rows),
            Constraint::Length(reply_rows),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Self::body_lines(props.message, props.now)).wrap(Wrap { trim: false }),
            body_area,
        );

        if let Some(error) = &props.view.last_error {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    format!("✖ {error}"),
                    Style::default().fg(Color::Red),
                )),
                error_area,
            );
        }

        if show_reply {
            let reply_props: ReplyInputProps<'_, ()> = ReplyInputProps {
                value: &props.view.reply_text,
                placeholder: REPLY_PLACEHOLDER,
                is_focused: self.reply_focused,
                can_submit: props.view.can_submit(),
                on_change: |_| (),
                on_submit: |_| (),
            };
            self.reply.render(frame, reply_area, reply_props);
        }

        frame.render_widget(
            Paragraph::new(Self::button_line(props.message, props.view, mode)),
            buttons_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_notify_core::testing::{key_event, NotifyHarness, RenderHarness};
    use edu_notify_core::{
        ActionDescriptor, ActionError, ButtonVariant, MessageInput, MessageKind, MessageMetadata,
        Priority, Sender, SenderKind,
    };
    use edu_notify_core::{assert_emitted, assert_not_emitted};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Close(RecordId),
        Invoke(RecordId, String),
        OpenReply(RecordId),
        ReplyChange(String),
        ReplySubmit(String),
        ReplyCancel(RecordId),
    }

    fn stored(input: MessageInput) -> Message {
        let mut harness = NotifyHarness::new();
        let id = harness.center.add_message(input);
        harness.center.state().message(&id).cloned().unwrap()
    }

    fn at_risk() -> Message {
        stored(
            MessageInput::new(
                MessageKind::StudentAlert,
                Priority::High,
                "Student at risk",
                "Maya has missed three assignments",
            )
            .from_sender(Sender::new(SenderKind::Ai, "Insights"))
            .with_metadata(MessageMetadata {
                student_name: Some("Maya".into()),
                risk_score: Some(0.82),
                ..Default::default()
            })
            .with_action(ActionDescriptor::new("contact", "Contact parent"))
            .with_action(
                ActionDescriptor::new("schedule", "Schedule meeting")
                    .variant(ButtonVariant::Secondary),
            ),
        )
    }

    fn props<'a>(
        message: &'a Message,
        view: &'a MessageViewState,
    ) -> MessageModalProps<'a, TestAction> {
        MessageModalProps {
            message,
            view,
            now: message.created_at,
            on_close: TestAction::Close,
            on_invoke: TestAction::Invoke,
            on_open_reply: TestAction::OpenReply,
            on_reply_change: TestAction::ReplyChange,
            on_reply_submit: TestAction::ReplySubmit,
            on_reply_cancel: TestAction::ReplyCancel,
        }
    }

    fn press(
        modal: &mut MessageModal,
        message: &Message,
        view: &MessageViewState,
        k: &str,
    ) -> Vec<TestAction> {
        modal
            .handle_event(&key_event(k), props(message, view))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_escape_and_enter_close() {
        let message = at_risk();
        let view = MessageViewState::new(&message);
        let mut modal = MessageModal::new();

        let close = vec![TestAction::Close(message.id.clone())];
        assert_eq!(press(&mut modal, &message, &view, "esc"), close);
        assert_eq!(press(&mut modal, &message, &view, "enter"), close);
    }

    #[test]
    fn test_number_keys_invoke_actions() {
        let message = at_risk();
        let view = MessageViewState::new(&message);
        let mut modal = MessageModal::new();

        let actions = press(&mut modal, &message, &view, "2");
        assert_eq!(actions, vec![TestAction::Invoke(message.id.clone(), "schedule".into())]);
        assert!(press(&mut modal, &message, &view, "3").is_empty());
    }

    #[test]
    fn test_reply_flow() {
        let message = at_risk();
        let mut view = MessageViewState::new(&message);
        let mut modal = MessageModal::new();

        let actions = press(&mut modal, &message, &view, "r");
        assert_eq!(actions, vec![TestAction::OpenReply(message.id.clone())]);
        view.open_reply();
        assert!(modal.is_reply_focused());

        // Typing goes to the reply box, not to the action keys
        let actions = press(&mut modal, &message, &view, "1");
        assert_eq!(actions, vec![TestAction::ReplyChange("1".into())]);
        assert_not_emitted!(actions, TestAction::Invoke(..));

        // Blank replies cannot be submitted
        view.reply_text = "   ".into();
        assert!(press(&mut modal, &message, &view, "enter").is_empty());

        view.reply_text = "Calling home today".into();
        let actions = press(&mut modal, &message, &view, "enter");
        assert_eq!(actions, vec![TestAction::ReplySubmit("Calling home today".into())]);

        let actions = press(&mut modal, &message, &view, "esc");
        assert_emitted!(actions, TestAction::ReplyCancel(_));
        assert!(!modal.is_reply_focused());
    }

    #[test]
    fn test_required_reply_is_not_cancelled() {
        let message = stored(
            MessageInput::new(MessageKind::Info, Priority::Medium, "Survey", "Please answer")
                .requires_response(),
        );
        let view = MessageViewState::new(&message);
        let mut modal = MessageModal::new();

        // The reply box is already visible, so `r` only focuses it
        assert!(press(&mut modal, &message, &view, "r").is_empty());
        assert!(modal.is_reply_focused());
        assert!(press(&mut modal, &message, &view, "esc").is_empty());
        assert!(!modal.is_reply_focused());
    }

    #[test]
    fn test_render_standard_message() {
        let message = at_risk();
        let view = MessageViewState::new(&message);
        let mut modal = MessageModal::new();
        let mut render = RenderHarness::new(90, 26);

        let output = render.render_to_string_plain(|frame| {
            modal.render(frame, frame.area(), props(&message, &view));
        });

        assert!(output.contains("Student at risk"));
        assert!(output.contains("Student Alert"));
        assert!(output.contains("from Insights (AI Assistant)"));
        assert!(output.contains("Risk score: 82%"));
        assert!(output.contains("[1] Contact parent"));
        assert!(output.contains("[Esc] Close"));
        assert!(!output.contains("Acknowledge"));
    }

    #[test]
    fn test_render_blocking_message_with_pending_action_and_error() {
        let message = stored(
            MessageInput::new(MessageKind::Error, Priority::Critical, "Sync failed", "Grades not saved")
                .with_action(ActionDescriptor::new("retry", "Retry"))
                .with_action(ActionDescriptor::new("report", "Report")),
        );
        let mut view = MessageViewState::new(&message);
        view.begin_action("retry");
        view.begin_action("report");
        view.finish_action("report", &Err(ActionError::failed("offline")));
        let mut modal = MessageModal::new();
        let mut render = RenderHarness::new(90, 26);

        let output = render.render_to_string_plain(|frame| {
            modal.render(frame, frame.area(), props(&message, &view));
        });

        assert!(output.contains("[Enter] Acknowledge"));
        assert!(output.contains("⟳ Retry"));
        assert!(output.contains("[2] Report"));
        assert!(output.contains("action failed: offline"));
    }

    #[test]
    fn test_render_reply_box() {
        let message = at_risk();
        let mut view = MessageViewState::new(&message);
        view.open_reply();
        view.reply_text = "On it".into();
        let mut modal = MessageModal::new();
        let mut render = RenderHarness::new(90, 26);

        let output = render.render_to_string_plain(|frame| {
            modal.render(frame, frame.area(), props(&message, &view));
        });

        assert!(output.contains("Reply"));
        assert!(output.contains("On it"));
        assert!(!output.contains("[r] Reply"));
    }
}
