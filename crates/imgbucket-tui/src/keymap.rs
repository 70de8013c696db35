use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(crate) fn is_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

/// Field navigation for text entry screens. Letters stay typeable.
pub(crate) fn is_next_field(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Tab | KeyCode::Down)
}

pub(crate) fn is_prev_field(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::BackTab | KeyCode::Up)
}

pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(' '))
}

pub(crate) fn is_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
}

/// The character of an unmodified (or shifted) key press.
pub(crate) fn plain_char(key: KeyEvent) -> Option<char> {
    let modified = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(character) if !modified => Some(character),
        _ => None,
    }
}
