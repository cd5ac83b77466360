//! Modal overlay helpers with background dimming
//!
//! The background is dimmed fresh on each frame, so list updates behind an
//! open message keep showing.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Clear, Widget},
    Frame,
};

/// Configuration for modal appearance
#[derive(Debug, Clone, Copy)]
pub struct ModalStyle {
    /// Dim factor for background (0.0 = no dim, 1.0 = black)
    pub dim_factor: f32,
    /// Background color for the modal area (None = cleared only)
    pub bg_color: Option<Color>,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            dim_factor: 0.5,
            bg_color: None,
        }
    }
}

impl ModalStyle {
    pub fn with_bg(bg_color: Color) -> Self {
        Self {
            bg_color: Some(bg_color),
            ..Default::default()
        }
    }

    /// Stronger dimming for messages that demand attention.
    pub fn severe() -> Self {
        Self {
            dim_factor: 0.75,
            bg_color: Some(Color::Rgb(40, 16, 16)),
        }
    }
}

/// Dim everything rendered so far and clear the modal area.
///
/// Call after the background and before the modal content.
pub fn render_modal(frame: &mut Frame, area: Rect, style: &ModalStyle) {
    dim_buffer(frame.buffer_mut(), style.dim_factor);
    frame.render_widget(Clear, area);
    if let Some(bg) = style.bg_color {
        frame.render_widget(BgFill(bg), area);
    }
}

struct BgFill(Color);

impl Widget for BgFill {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                buf[(x, y)].set_bg(self.0).set_symbol(" ");
            }
        }
    }
}

/// Darken every cell of the buffer by `factor`.
pub fn dim_buffer(buffer: &mut Buffer, factor: f32) {
    let scale = 1.0 - factor.clamp(0.0, 1.0);
    for cell in buffer.content.iter_mut() {
        cell.fg = dim_color(cell.fg, scale);
        cell.bg = dim_color(cell.bg, scale);
    }
}

fn dim_color(color: Color, scale: f32) -> Color {
    let (r, g, b) = match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Red | Color::LightRed => (205, 0, 0),
        Color::Green | Color::LightGreen => (0, 205, 0),
        Color::Yellow | Color::LightYellow => (205, 205, 0),
        Color::Blue | Color::LightBlue => (0, 0, 238),
        Color::Magenta | Color::LightMagenta => (205, 0, 205),
        Color::Cyan | Color::LightCyan => (0, 205, 205),
        Color::Gray | Color::White => (229, 229, 229),
        Color::DarkGray => (127, 127, 127),
        // Reset, black and indexed colours stay as they are
        other => return other,
    };
    let s = |c: u8| ((c as f32) * scale) as u8;
    Color::Rgb(s(r), s(g), s(b))
}

/// A rectangle of the given size centred in `area`, keeping a one-cell margin.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_notify_core::testing::RenderHarness;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_modal_covers_background() {
        let mut harness = RenderHarness::new(40, 10);

        let output = harness.render_to_string_plain(|frame| {
            frame.render_widget(Paragraph::new("Background content"), frame.area());
            let area = centered_rect(20, 4, frame.area());
            render_modal(frame, area, &ModalStyle::default());
            frame.render_widget(Paragraph::new("Modal content"), area);
        });

        assert!(output.contains("Modal content"));
    }

    #[test]
    fn test_centered_rect() {
        let centered = centered_rect(40, 10, Rect::new(0, 0, 80, 24));
        assert_eq!(centered, Rect::new(20, 7, 40, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let centered = centered_rect(100, 50, Rect::new(0, 0, 30, 10));
        assert_eq!(centered.width, 28);
        assert_eq!(centered.height, 8);
    }

    #[test]
    fn test_dim_darkens_named_colours() {
        assert_eq!(dim_color(Color::Red, 0.5), Color::Rgb(102, 0, 0));
        assert_eq!(dim_color(Color::Reset, 0.5), Color::Reset);
        assert_eq!(dim_color(Color::Rgb(100, 50, 10), 0.0), Color::Rgb(0, 0, 0));
    }
}
