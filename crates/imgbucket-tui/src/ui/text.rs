use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::theme;

/// Terminal widths at which a footer drops to its shorter wording.
const FULL_HINT_WIDTH: u16 = 110;
const MEDIUM_HINT_WIDTH: u16 = 78;

/// Key help in three lengths; the longest one that fits the terminal is shown.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyHint {
    full: &'static str,
    medium: &'static str,
    compact: &'static str,
}

impl KeyHint {
    pub(crate) const fn new(full: &'static str, medium: &'static str, compact: &'static str) -> Self {
        Self {
            full,
            medium,
            compact,
        }
    }

    pub(crate) fn for_width(self, width: u16) -> &'static str {
        match width {
            w if w >= FULL_HINT_WIDTH => self.full,
            w if w >= MEDIUM_HINT_WIDTH => self.medium,
            _ => self.compact,
        }
    }
}

pub(crate) const RESULTS_HINT: KeyHint = KeyHint::new(
    "Enter/Esc/q: finish and print summary",
    "Enter/Esc/q: finish",
    "Enter/Esc/q finish",
);

pub(crate) fn wrapped_paragraph<'a>(text: impl Into<Text<'a>>) -> Paragraph<'a> {
    Paragraph::new(text).wrap(Wrap { trim: false })
}

/// Centered key help inside the bordered "Keys" panel.
pub(crate) fn keys_paragraph(text: &str) -> Paragraph<'_> {
    wrapped_paragraph(text)
        .alignment(Alignment::Center)
        .block(theme::keys_panel())
}

/// Rows needed by [`keys_paragraph`] at `total_width`, borders included.
pub(crate) fn keys_height(total_width: u16, text: &str) -> u16 {
    let inner = usize::from(total_width.saturating_sub(2));
    wrapped_rows(text, inner).saturating_add(2).max(3)
}

pub(crate) fn focus_line(message: impl Into<String>) -> Line<'static> {
    Line::styled(message.into(), theme::FOCUS)
}

pub(crate) fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from_iter([
        Span::styled(format!("{label}: "), theme::MUTED),
        Span::raw(value.into()),
    ])
}

/// Like [`field_line`], with the label in focus colors and the value underlined.
pub(crate) fn selection_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from_iter([
        Span::styled(format!("{label}: "), theme::FOCUS),
        Span::styled(value.into(), Style::new().add_modifier(Modifier::UNDERLINED)),
    ])
}

pub(crate) fn error_line(message: impl AsRef<str>) -> Line<'static> {
    Line::styled(format!("Invalid: {}", message.as_ref()), theme::ERROR)
}

/// Hard-wrapped row count; tabs take four cells and every line takes at least one row.
fn wrapped_rows(text: &str, width: usize) -> u16 {
    let width = width.max(1);
    let rows: usize = text
        .split('\n')
        .map(|line| {
            let cells: usize = line.chars().map(|ch| if ch == '\t' { 4 } else { 1 }).sum();
            cells.div_ceil(width).max(1)
        })
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};

    use super::{
        KeyHint, RESULTS_HINT, error_line, field_line, focus_line, keys_height, selection_line,
        wrapped_rows,
    };

    #[test]
    fn key_hint_picks_wording_by_width() {
        let hint = KeyHint::new("full", "medium", "compact");
        assert_eq!(hint.for_width(120), "full");
        assert_eq!(hint.for_width(110), "full");
        assert_eq!(hint.for_width(90), "medium");
        assert_eq!(hint.for_width(60), "compact");
    }

    #[test]
    fn keys_height_is_one_row_plus_borders_when_hint_fits() {
        assert_eq!(keys_height(80, "Enter: continue    Esc: quit"), 3);
    }

    #[test]
    fn keys_height_grows_when_hint_wraps() {
        assert!(keys_height(20, "Enter: continue    Tab/Up/Down: move    Esc: quit") > 3);
    }

    #[test]
    fn wrapped_rows_counts_each_line_and_tab_width() {
        assert_eq!(wrapped_rows("a    b", 3), 2);
        assert_eq!(wrapped_rows("a b", 3), 1);
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("one\n\nthree", 10), 3);
        assert_eq!(wrapped_rows("\tx", 4), 2);
    }

    #[test]
    fn focus_line_uses_blue_bold_style() {
        let line = focus_line("Amount of Buckets (2 to 9)");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content.as_ref(), "Amount of Buckets (2 to 9)");
        assert_eq!(line.style.fg, Some(Color::Blue));
        assert!(line.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn field_line_joins_label_and_value() {
        let line = field_line("Native size", "3000x1000");
        assert_eq!(line.to_string(), "Native size: 3000x1000");
        assert_eq!(line.spans[0].style.fg, Some(Color::Gray));
    }

    #[test]
    fn selection_line_underlines_value() {
        let line = selection_line("Current Selection", "Yes");
        assert_eq!(line.to_string(), "Current Selection: Yes");
        assert_eq!(line.spans[0].style.fg, Some(Color::Blue));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn error_line_is_prefixed_and_red() {
        let line = error_line("duplicate bucket name 'a'");
        assert_eq!(line.to_string(), "Invalid: duplicate bucket name 'a'");
        assert_eq!(line.style.fg, Some(Color::Red));
    }

    #[test]
    fn results_hint_compacts_by_width() {
        assert_eq!(RESULTS_HINT.for_width(120), "Enter/Esc/q: finish and print summary");
        assert_eq!(RESULTS_HINT.for_width(90), "Enter/Esc/q: finish");
        assert_eq!(RESULTS_HINT.for_width(60), "Enter/Esc/q finish");
    }
}
