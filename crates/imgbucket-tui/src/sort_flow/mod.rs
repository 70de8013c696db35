mod keys;
mod render;

use anyhow::Result;
use crossterm::event::KeyEvent;
use imgbucket_app::App;
use imgbucket_core::items::Item;
use imgbucket_core::preview::scale_to_fit;
use imgbucket_core::workflow::{CommitOps, Session, WorkflowState};
use tracing::warn;
use tui_input::Input;

use crate::UiExit;
use crate::ui::binary_choice::BinaryChoice;
use crate::ui::preview::PreviewImage;

pub(crate) trait SortFlowOps {
    fn committer(&self) -> &dyn CommitOps;
    fn load_preview(&self, item: &Item) -> Result<PreviewImage>;
    fn preview_box(&self) -> (u32, u32);
    fn log_lines(&self) -> usize;
}

impl SortFlowOps for App {
    fn committer(&self) -> &dyn CommitOps {
        self
    }

    fn load_preview(&self, item: &Item) -> Result<PreviewImage> {
        let (max_width, max_height) = self.preview_box();
        PreviewImage::load(&self.item_path(&item.name), max_width, max_height)
    }

    fn preview_box(&self) -> (u32, u32) {
        let preview = &self.settings().preview;
        (preview.max_width, preview.max_height)
    }

    fn log_lines(&self) -> usize {
        self.settings().results.log_lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlowSignal {
    Continue,
    Exit(UiExit),
}

struct LoadedPreview {
    cursor: usize,
    image: Result<PreviewImage, String>,
}

pub(crate) struct SortFlow {
    session: Session,
    amount_input: Input,
    name_inputs: Vec<Input>,
    focused_name: usize,
    input_error: Option<String>,
    confirm: Option<BinaryChoice>,
    preview: Option<LoadedPreview>,
    preview_box: (u32, u32),
    log_lines: usize,
    errors_acknowledged: bool,
    error_scroll: u16,
}

pub(crate) struct SortScreen {
    flow: SortFlow,
}

impl SortScreen {
    pub(crate) fn new(session: Session, app: &App) -> Self {
        Self {
            flow: SortFlow::new(session, app),
        }
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        self.flow.render(frame);
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent, app: &App) -> Result<Option<UiExit>> {
        match self.flow.on_key(key, app)? {
            FlowSignal::Continue => Ok(None),
            FlowSignal::Exit(exit) => Ok(Some(exit)),
        }
    }

    pub(crate) fn run_log(&self) -> Option<&imgbucket_core::run_log::RunLog> {
        self.flow.session.run_log()
    }
}

impl SortFlow {
    fn new(session: Session, ops: &dyn SortFlowOps) -> Self {
        let mut flow = Self {
            name_inputs: Vec::new(),
            session,
            amount_input: Input::default(),
            focused_name: 0,
            input_error: None,
            confirm: None,
            preview: None,
            preview_box: ops.preview_box(),
            log_lines: ops.log_lines(),
            errors_acknowledged: false,
            error_scroll: 0,
        };
        flow.reset_name_inputs();
        flow.refresh_preview(ops);
        flow
    }

    fn reset_name_inputs(&mut self) {
        self.name_inputs = (0..self.session.bucket_count())
            .map(|_| Input::default())
            .collect();
        self.focused_name = 0;
    }

    /// Decodes the current item once per cursor position.
    fn refresh_preview(&mut self, ops: &dyn SortFlowOps) {
        let WorkflowState::ReviewingImage { cursor } = self.session.state() else {
            self.preview = None;
            return;
        };
        if self
            .preview
            .as_ref()
            .is_some_and(|loaded| loaded.cursor == cursor)
        {
            return;
        }

        let Some(item) = self.session.current_item() else {
            self.preview = None;
            return;
        };

        let image = ops.load_preview(item).map_err(|error| {
            warn!(item = %item.name, "preview unavailable: {error:#}");
            format!("{error:#}")
        });
        self.preview = Some(LoadedPreview { cursor, image });
    }

    /// Preview dimensions for the current item, preferring the decoded image.
    fn preview_sizes(&self) -> Option<((u32, u32), (u32, u32))> {
        if let Some(LoadedPreview {
            image: Ok(image), ..
        }) = &self.preview
        {
            return Some((image.native(), image.scaled()));
        }

        let dimensions = self.session.current_item()?.dimensions?;
        let (max_width, max_height) = self.preview_box;
        Some((
            (dimensions.width, dimensions.height),
            scale_to_fit(dimensions.width, dimensions.height, max_width, max_height),
        ))
    }

    fn showing_commit_errors(&self) -> bool {
        !self.errors_acknowledged
            && self
                .session
                .run_log()
                .is_some_and(|log| log.error_count() > 0)
    }
}
