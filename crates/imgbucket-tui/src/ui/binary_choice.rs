use crossterm::event::{KeyCode, KeyEvent};

use crate::keymap;

/// Yes/No selector behind the copy confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BinaryChoice {
    pub(crate) yes_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryChoiceEvent {
    Continue,
    Decided(bool),
}

impl BinaryChoice {
    pub(crate) fn new(default_yes: bool) -> Self {
        Self {
            yes_selected: default_yes,
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> BinaryChoiceEvent {
        if keymap::is_back(key) {
            return BinaryChoiceEvent::Decided(false);
        }

        if keymap::is_toggle(key) {
            self.yes_selected = !self.yes_selected;
            return BinaryChoiceEvent::Continue;
        }

        if keymap::is_confirm(key) {
            return BinaryChoiceEvent::Decided(self.yes_selected);
        }

        match key.code {
            KeyCode::Char('y' | 'Y') => BinaryChoiceEvent::Decided(true),
            KeyCode::Char('n' | 'N') => BinaryChoiceEvent::Decided(false),
            _ => BinaryChoiceEvent::Continue,
        }
    }

    pub(crate) fn selected_label(&self) -> &'static str {
        if self.yes_selected { "Yes" } else { "No" }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{BinaryChoice, BinaryChoiceEvent};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn space_toggles_selection() {
        let mut choice = BinaryChoice::new(true);
        assert_eq!(choice.selected_label(), "Yes");

        assert_eq!(
            choice.on_key(key(KeyCode::Char(' '))),
            BinaryChoiceEvent::Continue
        );
        assert_eq!(choice.selected_label(), "No");
    }

    #[test]
    fn enter_decides_current_selection() {
        let mut choice = BinaryChoice::new(true);
        assert_eq!(
            choice.on_key(key(KeyCode::Enter)),
            BinaryChoiceEvent::Decided(true)
        );

        let mut choice = BinaryChoice::new(false);
        assert_eq!(
            choice.on_key(key(KeyCode::Enter)),
            BinaryChoiceEvent::Decided(false)
        );
    }

    #[test]
    fn esc_cancels_regardless_of_selection() {
        let mut choice = BinaryChoice::new(true);
        assert_eq!(
            choice.on_key(key(KeyCode::Esc)),
            BinaryChoiceEvent::Decided(false)
        );
    }

    #[test]
    fn y_and_n_answer_directly() {
        let mut choice = BinaryChoice::new(false);
        assert_eq!(
            choice.on_key(key(KeyCode::Char('y'))),
            BinaryChoiceEvent::Decided(true)
        );
        assert_eq!(
            choice.on_key(key(KeyCode::Char('N'))),
            BinaryChoiceEvent::Decided(false)
        );
    }

    #[test]
    fn unrelated_keys_do_not_change_state() {
        let mut choice = BinaryChoice::new(true);
        assert_eq!(
            choice.on_key(key(KeyCode::Char('1'))),
            BinaryChoiceEvent::Continue
        );
        assert_eq!(choice.selected_label(), "Yes");
    }
}
