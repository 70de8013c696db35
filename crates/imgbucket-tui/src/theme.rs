use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Block;

pub(crate) const FOCUS: Style = Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD);
pub(crate) const SUCCESS: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
pub(crate) const ERROR: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
pub(crate) const MUTED: Style = Style::new().fg(Color::Gray).add_modifier(Modifier::DIM);
/// Label of the bucket-name field being edited.
pub(crate) const ACTIVE_FIELD: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

pub(crate) fn panel<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::bordered().title(title)
}

pub(crate) fn keys_panel() -> Block<'static> {
    panel("Keys")
}
