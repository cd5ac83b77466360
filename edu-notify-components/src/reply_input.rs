//! Reply box for messages that ask for a response

use crossterm::event::{KeyCode, KeyModifiers};
use edu_notify_core::{Component, EventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Props for [`ReplyInput`]
pub struct ReplyInputProps<'a, A> {
    /// Current reply text
    pub value: &'a str,
    pub placeholder: &'a str,
    pub is_focused: bool,
    /// Whether Enter may submit (text is not blank)
    pub can_submit: bool,
    /// Emitted with the new text on every edit
    pub on_change: fn(String) -> A,
    /// Emitted with the text on Enter when `can_submit`
    pub on_submit: fn(String) -> A,
}

/// Single-line reply editor with a cursor.
///
/// Typing, backspace, delete and cursor keys edit the text; Ctrl+U clears it.
#[derive(Debug, Default)]
pub struct ReplyInput {
    /// Cursor position (byte index)
    cursor: usize,
}

impl ReplyInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the cursor after the last character.
    pub fn move_to_end(&mut self, value: &str) {
        self.cursor = value.len();
    }

    fn clamp_cursor(&mut self, value: &str) {
        self.cursor = self.cursor.min(value.len());
        while !value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn prev_boundary(&self, value: &str) -> usize {
        value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self, value: &str) -> usize {
        value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    fn insert(&mut self, value: &str, c: char) -> String {
        let mut next = String::with_capacity(value.len() + c.len_utf8());
        next.push_str(&value[..self.cursor]);
        next.push(c);
        next.push_str(&value[self.cursor..]);
        self.cursor += c.len_utf8();
        next
    }

    fn backspace(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        let start = self.prev_boundary(value);
        let next = format!("{}{}", &value[..start], &value[self.cursor..]);
        self.cursor = start;
        Some(next)
    }

    fn delete(&self, value: &str) -> Option<String> {
        if self.cursor >= value.len() {
            return None;
        }
        let end = self.next_boundary(value);
        Some(format!("{}{}", &value[..self.cursor], &value[end..]))
    }
}

impl<A> Component<A> for ReplyInput {
    type Props<'a> = ReplyInputProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        self.clamp_cursor(props.value);

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor = props.value.len();
                    None
                }
                KeyCode::Char('u') => {
                    self.cursor = 0;
                    Some((props.on_change)(String::new()))
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some((props.on_change)(self.insert(props.value, c))),
            KeyCode::Backspace => self.backspace(props.value).map(props.on_change),
            KeyCode::Delete => self.delete(props.value).map(props.on_change),
            KeyCode::Left => {
                self.cursor = self.prev_boundary(props.value);
                None
            }
            KeyCode::Right => {
                self.cursor = self.next_boundary(props.value);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = props.value.len();
                None
            }
            KeyCode::Enter if props.can_submit => Some((props.on_submit)(props.value.to_string())),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.clamp_cursor(props.value);

        let text = if props.value.is_empty() {
            Line::from(Span::styled(
                props.placeholder,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::raw(props.value)
        };

        let hint = if props.can_submit {
            " Enter to send "
        } else {
            " Type a reply "
        };
        let border = if props.is_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Reply ")
            .title_bottom(Line::from(hint).right_aligned());

        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
            area,
        );

        if props.is_focused {
            let width = props.value[..self.cursor].chars().count() as u16;
            let x = area.x + 1 + width;
            if x < area.right().saturating_sub(1) {
                frame.set_cursor_position((x, area.y + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_notify_core::testing::{char_key, key, RenderHarness};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Change(String),
        Submit(String),
    }

    fn props(value: &str, can_submit: bool) -> ReplyInputProps<'_, TestAction> {
        ReplyInputProps {
            value,
            placeholder: "Write a reply...",
            is_focused: true,
            can_submit,
            on_change: TestAction::Change,
            on_submit: TestAction::Submit,
        }
    }

    fn send(
        input: &mut ReplyInput,
        event: EventKind,
        value: &str,
        can_submit: bool,
    ) -> Vec<TestAction> {
        input
            .handle_event(&event, props(value, can_submit))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_typing_appends() {
        let mut input = ReplyInput::new();
        input.move_to_end("Hi");
        let actions = send(&mut input, EventKind::Key(char_key('!')), "Hi", true);
        assert_eq!(actions, vec![TestAction::Change("Hi!".into())]);
    }

    #[test]
    fn test_backspace_handles_multibyte() {
        let mut input = ReplyInput::new();
        input.move_to_end("café");
        let actions = send(&mut input, EventKind::Key(key("backspace")), "café", true);
        assert_eq!(actions, vec![TestAction::Change("caf".into())]);
    }

    #[test]
    fn test_enter_submits_only_when_allowed() {
        let mut input = ReplyInput::new();
        assert!(send(&mut input, EventKind::Key(key("enter")), "   ", false).is_empty());
        assert_eq!(
            send(&mut input, EventKind::Key(key("enter")), "ok", true),
            vec![TestAction::Submit("ok".into())]
        );
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut input = ReplyInput::new();
        let mut p = props("", false);
        p.is_focused = false;
        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(char_key('a')), p)
            .into_iter()
            .collect();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = ReplyInput::new();
        let actions = send(&mut input, EventKind::Key(key("ctrl+u")), "draft", true);
        assert_eq!(actions, vec![TestAction::Change(String::new())]);
    }

    #[test]
    fn test_render_placeholder_and_value() {
        let mut render = RenderHarness::new(40, 3);
        let mut input = ReplyInput::new();

        let output = render.render_to_string_plain(|frame| {
            input.render(frame, frame.area(), props("", false));
        });
        assert!(output.contains("Write a reply..."));

        let output = render.render_to_string_plain(|frame| {
            input.render(frame, frame.area(), props("Thanks", true));
        });
        assert!(output.contains("Thanks"));
        assert!(output.contains("Enter to send"));
    }
}
