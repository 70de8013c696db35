mod keymap;
mod sort_flow;
mod terminal;
mod theme;
mod ui;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use imgbucket_app::App;
use imgbucket_core::run_log::RunLog;
use imgbucket_core::workflow::Session;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use sort_flow::SortScreen;
use terminal::TerminalSession;
use tracing::info;

use crate::ui::modal::render_error_modal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiExit {
    Completed,
    Canceled,
}

/// How an interactive sort ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortExit {
    Completed(RunLog),
    Canceled,
}

pub(crate) fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Runs the interactive sort until the results screen is dismissed or the user aborts.
///
/// Nothing is copied unless the session reaches its commit; aborting earlier
/// leaves the directory untouched.
pub fn run_sort(app: &App, session: Session) -> Result<SortExit> {
    let mut terminal = TerminalSession::enter()?;
    let mut screen = SortScreen::new(session, app);
    let mut global_error: Option<String> = None;

    loop {
        terminal.draw(|frame| {
            screen.render(frame);

            if let Some(message) = global_error.as_deref() {
                render_global_error(frame, message);
            }
        })?;

        let event = event::read().context("failed to read terminal event")?;
        let key = match event {
            Event::Resize(_, _) => {
                terminal.autoresize()?;
                continue;
            }
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => key,
            _ => continue,
        };

        if is_ctrl_c(key) {
            info!("sort aborted with ctrl-c");
            return Ok(SortExit::Canceled);
        }

        if global_error.is_some() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                global_error = None;
            }
            continue;
        }

        match screen.on_key(key, app) {
            Ok(None) => {}
            Ok(Some(UiExit::Canceled)) => {
                info!("sort canceled before commit");
                return Ok(SortExit::Canceled);
            }
            Ok(Some(UiExit::Completed)) => {
                let log = screen
                    .run_log()
                    .cloned()
                    .context("sort finished without a run log")?;
                return Ok(SortExit::Completed(log));
            }
            Err(error) => global_error = Some(format!("{error:#}")),
        }
    }
}

fn render_global_error(frame: &mut ratatui::Frame<'_>, message: &str) {
    let text = format!("Operation failed.\n\n{message}");
    render_error_modal(frame, "Error", &text, 0, "Enter/Esc: continue");
}

/// A `percent_x` by `percent_y` box centered in `area`; percentages above 100 clamp.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y.min(100))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x.min(100))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
