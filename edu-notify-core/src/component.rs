//! Component trait for the notification UI

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A UI element that renders from props and emits actions.
///
/// Props carry all data needed to render, usually borrowed store snapshots.
/// `handle_event` never touches the store; it returns actions for the owning
/// loop to apply through the notification center. Local UI state such as the
/// selected row or the reply cursor may live in `&mut self`.
///
/// # Example
///
/// ```ignore
/// struct UnreadBadge;
///
/// impl Component<AppAction> for UnreadBadge {
///     type Props<'a> = usize;
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, unread: usize) {
///         frame.render_widget(Paragraph::new(format!("{unread} unread")), area);
///     }
/// }
/// ```
pub trait Component<A> {
    /// Data required to render the component (read-only)
    type Props<'a>;

    /// Handle an event and return actions to apply.
    ///
    /// Returns `None`, `Some(action)` or any other `IntoIterator`. Defaults to
    /// no actions for render-only components.
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
