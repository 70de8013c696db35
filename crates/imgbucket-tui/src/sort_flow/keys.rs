use anyhow::Result;
use crossterm::event::{Event, KeyEvent};
use imgbucket_core::workflow::{Action, Outcome, WorkflowState};
use tracing::debug;
use tui_input::backend::crossterm::EventHandler;

use crate::UiExit;
use crate::keymap;
use crate::ui::binary_choice::{BinaryChoice, BinaryChoiceEvent};

use super::{FlowSignal, SortFlow, SortFlowOps};

impl SortFlow {
    pub(super) fn on_key(&mut self, key: KeyEvent, ops: &dyn SortFlowOps) -> Result<FlowSignal> {
        let signal = match self.session.state() {
            WorkflowState::ConfiguringAmount => self.on_key_amount(key, ops)?,
            WorkflowState::ConfiguringNames => self.on_key_names(key, ops)?,
            WorkflowState::ReviewingImage { .. } => self.on_key_review(key, ops)?,
            WorkflowState::Committing => FlowSignal::Continue,
            WorkflowState::ShowingResults => self.on_key_results(key),
        };

        self.refresh_preview(ops);
        Ok(signal)
    }

    fn on_key_amount(&mut self, key: KeyEvent, ops: &dyn SortFlowOps) -> Result<FlowSignal> {
        if keymap::is_back(key) {
            return Ok(FlowSignal::Exit(UiExit::Canceled));
        }

        if keymap::is_confirm(key) {
            let action = Action::SubmitAmount(self.amount_input.value().to_string());
            match self.session.handle(action, ops.committer())? {
                Outcome::Transitioned => {
                    self.input_error = None;
                    self.reset_name_inputs();
                }
                Outcome::Rejected(reason) => self.input_error = Some(reason),
                _ => {}
            }
            return Ok(FlowSignal::Continue);
        }

        if self.amount_input.handle_event(&Event::Key(key)).is_some() {
            self.input_error = None;
        }
        Ok(FlowSignal::Continue)
    }

    fn on_key_names(&mut self, key: KeyEvent, ops: &dyn SortFlowOps) -> Result<FlowSignal> {
        if keymap::is_back(key) {
            return Ok(FlowSignal::Exit(UiExit::Canceled));
        }

        let count = self.name_inputs.len();
        if keymap::is_next_field(key) {
            if count > 0 {
                self.focused_name = (self.focused_name + 1) % count;
            }
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_prev_field(key) {
            if count > 0 {
                self.focused_name = (self.focused_name + count - 1) % count;
            }
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_confirm(key) {
            let names = self
                .name_inputs
                .iter()
                .map(|input| input.value().to_string())
                .collect();
            match self.session.handle(Action::SubmitNames(names), ops.committer())? {
                Outcome::Transitioned => self.input_error = None,
                Outcome::Rejected(reason) => self.input_error = Some(reason),
                _ => {}
            }
            return Ok(FlowSignal::Continue);
        }

        if let Some(input) = self.name_inputs.get_mut(self.focused_name)
            && input.handle_event(&Event::Key(key)).is_some()
        {
            self.input_error = None;
        }
        Ok(FlowSignal::Continue)
    }

    fn on_key_review(&mut self, key: KeyEvent, ops: &dyn SortFlowOps) -> Result<FlowSignal> {
        if let Some(choice) = self.confirm.as_mut() {
            let BinaryChoiceEvent::Decided(confirmed) = choice.on_key(key) else {
                return Ok(FlowSignal::Continue);
            };

            self.confirm = None;
            let outcome = self
                .session
                .handle(Action::Confirm(confirmed), ops.committer())?;
            debug!(?outcome, confirmed, "copy confirmation answered");
            return Ok(FlowSignal::Continue);
        }

        let Some(character) = keymap::plain_char(key) else {
            return Ok(FlowSignal::Continue);
        };

        if let Outcome::ConfirmationRequested(_) = self
            .session
            .handle(Action::PressKey(character), ops.committer())?
        {
            self.confirm = Some(BinaryChoice::new(true));
        }
        Ok(FlowSignal::Continue)
    }

    fn on_key_results(&mut self, key: KeyEvent) -> FlowSignal {
        if self.showing_commit_errors() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                self.errors_acknowledged = true;
            } else if keymap::is_down(key) {
                self.error_scroll = self.error_scroll.saturating_add(1);
            } else if keymap::is_up(key) {
                self.error_scroll = self.error_scroll.saturating_sub(1);
            }
            return FlowSignal::Continue;
        }

        if keymap::is_confirm(key) || keymap::is_back(key) || keymap::is_quit(key) {
            return FlowSignal::Exit(UiExit::Completed);
        }
        FlowSignal::Continue
    }
}
