use std::io::{Stdout, stdout};

use anyhow::{Context, Result, anyhow};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

type Backend = CrosstermBackend<Stdout>;

/// The side effects needed to take over and hand back the terminal.
trait ScreenOps {
    type Handle;

    fn raw_on(&mut self) -> Result<()>;
    fn raw_off(&mut self) -> Result<()>;
    fn alt_on(&mut self) -> Result<()>;
    fn alt_off(&mut self) -> Result<()>;
    fn open(&mut self) -> Result<Self::Handle>;
}

struct Crossterm;

impl ScreenOps for Crossterm {
    type Handle = Terminal<Backend>;

    fn raw_on(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")
    }

    fn raw_off(&mut self) -> Result<()> {
        disable_raw_mode().context("failed to disable raw mode")
    }

    fn alt_on(&mut self) -> Result<()> {
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, Hide).context("failed to enter alternate screen")
    }

    fn alt_off(&mut self) -> Result<()> {
        let mut out = stdout();
        execute!(out, Show, LeaveAlternateScreen).context("failed to leave alternate screen")
    }

    fn open(&mut self) -> Result<Self::Handle> {
        Terminal::new(CrosstermBackend::new(stdout())).context("failed to create terminal backend")
    }
}

/// Enables raw mode, then the alternate screen, then opens the handle.
///
/// A failing step undoes whatever already succeeded, newest first. Undo
/// failures are appended to the setup error.
fn acquire<O: ScreenOps>(ops: &mut O) -> Result<O::Handle> {
    ops.raw_on()?;

    let mut undo_errors = Vec::new();
    let setup_error = match ops.alt_on() {
        Err(error) => error,
        Ok(()) => match ops.open() {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if let Err(undo) = ops.alt_off() {
                    undo_errors.push(format!("{undo:#}"));
                }
                error
            }
        },
    };

    if let Err(undo) = ops.raw_off() {
        undo_errors.push(format!("{undo:#}"));
    }

    if undo_errors.is_empty() {
        Err(setup_error)
    } else {
        Err(anyhow!(
            "{setup_error:#}\nterminal rollback cleanup failed: {}",
            undo_errors.join("\n")
        ))
    }
}

/// Owns the terminal while the sort screens run; restores it on drop.
pub(crate) struct TerminalSession {
    terminal: Terminal<Backend>,
}

impl TerminalSession {
    pub(crate) fn enter() -> Result<Self> {
        Ok(Self {
            terminal: acquire(&mut Crossterm)?,
        })
    }

    pub(crate) fn draw<F>(&mut self, draw_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame<'_>),
    {
        self.terminal
            .draw(draw_fn)
            .context("failed to render terminal")?;
        Ok(())
    }

    pub(crate) fn autoresize(&mut self) -> Result<()> {
        self.terminal
            .autoresize()
            .context("failed to autoresize terminal")
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = Crossterm.alt_off();
        let _ = Crossterm.raw_off();
    }
}
