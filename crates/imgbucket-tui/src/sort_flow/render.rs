use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use tui_input::Input;

use imgbucket_core::buckets::{AMOUNT_INSTRUCTION, NAMING_INSTRUCTION, default_bucket_name};
use imgbucket_core::run_log::{EntryKind, RunLog};
use imgbucket_core::workflow::WorkflowState;

use super::{LoadedPreview, SortFlow};
use crate::theme;
use crate::ui::modal::{ModalSpec, numbered_errors, render_error_modal, render_modal};
use crate::ui::text::{
    KeyHint, RESULTS_HINT, error_line, field_line, focus_line, keys_height, keys_paragraph,
    selection_line, wrapped_paragraph,
};

const TITLE: &str = "Image Bucket Sort";

const AMOUNT_HINT: KeyHint = KeyHint::new(
    "Type a number    Enter: continue (empty keeps default)    Esc: quit",
    "Type    Enter: continue    Esc: quit",
    "Type | Enter continue | Esc quit",
);

const NAMES_HINT: KeyHint = KeyHint::new(
    "Type to edit    Tab/Up/Down: move    Enter: continue (all empty keeps defaults)    Esc: quit",
    "Type    Tab/Up/Down: move    Enter: continue    Esc: quit",
    "Tab move | Enter continue | Esc quit",
);

const REVIEW_HINT: KeyHint = KeyHint::new(
    "Bucket number: choose bucket    Ctrl-C: abort without copying",
    "Number: choose bucket    Ctrl-C: abort",
    "Number bucket | Ctrl-C abort",
);

const CONFIRM_HINT: KeyHint = KeyHint::new(
    "Space: toggle    Enter: confirm    y/n: answer    Esc: cancel",
    "Space toggle    Enter confirm    Esc cancel",
    "Space | Enter | Esc",
);

const ERRORS_HINT: KeyHint = KeyHint::new(
    "Enter/Esc: continue to results    Up/Down: scroll",
    "Enter/Esc: continue    Up/Down: scroll",
    "Enter/Esc | Up/Down",
);

impl SortFlow {
    pub(super) fn render(&self, frame: &mut Frame<'_>) {
        match self.session.state() {
            WorkflowState::ConfiguringAmount => self.render_amount(frame),
            WorkflowState::ConfiguringNames => self.render_names(frame),
            WorkflowState::ReviewingImage { .. } | WorkflowState::Committing => {
                self.render_review(frame)
            }
            WorkflowState::ShowingResults => self.render_results(frame),
        }
    }

    fn render_amount(&self, frame: &mut Frame<'_>) {
        let key_text = AMOUNT_HINT.for_width(frame.area().width);
        let default_hint = format!("Leave empty for {}", self.session.bucket_count());
        let rendered = render_modal(
            frame,
            ModalSpec {
                title: AMOUNT_INSTRUCTION,
                title_style: Some(theme::FOCUS),
                body: Text::from(vec![
                    Line::from(""),
                    Line::from(Span::styled(default_hint, theme::MUTED)),
                ]),
                key_hint: Some(key_text),
                width_pct: 60,
                height_pct: 40,
                scroll: 0,
            },
        );

        let inner = rendered.body_area.inner(Margin {
            vertical: 1,
            horizontal: 1,
        });
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
        render_input(frame, &self.amount_input, input_area, true);

        if let Some(error) = &self.input_error
            && inner.height > 2
        {
            let error_area = Rect::new(inner.x, inner.y + 2, inner.width, inner.height - 2);
            frame.render_widget(wrapped_paragraph(error_line(error.clone())), error_area);
        }
    }

    fn render_names(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = NAMES_HINT.for_width(area.width);
        let footer_height = keys_height(area.width, key_text);
        let fields_height = u16::try_from(self.name_inputs.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let [header, fields, error, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(fields_height),
                Constraint::Min(1),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let header_text = Text::from(vec![
            Line::from(TITLE),
            focus_line(NAMING_INSTRUCTION),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::panel("Bucket names")),
            header,
        );

        let block = theme::panel(format!("{} buckets", self.name_inputs.len()));
        let inner = block.inner(fields);
        frame.render_widget(block, fields);

        for (index, input) in self.name_inputs.iter().enumerate() {
            let Ok(offset) = u16::try_from(index) else {
                break;
            };
            if offset >= inner.height {
                break;
            }

            let focused = index == self.focused_name;
            let label = format!("{}: ", index + 1);
            let label_width = u16::try_from(label.len()).unwrap_or(u16::MAX);
            let row = Rect::new(inner.x, inner.y + offset, inner.width, 1);
            let label_style = if focused {
                theme::ACTIVE_FIELD
            } else {
                theme::MUTED
            };
            frame.render_widget(Paragraph::new(Span::styled(label, label_style)), row);

            let field = Rect::new(
                row.x.saturating_add(label_width),
                row.y,
                row.width.saturating_sub(label_width),
                1,
            );
            if input.value().is_empty() && !focused {
                let placeholder = Span::styled(default_bucket_name(index + 1), theme::MUTED);
                frame.render_widget(Paragraph::new(placeholder), field);
            } else {
                render_input(frame, input, field, focused);
            }
        }

        if let Some(message) = &self.input_error {
            frame.render_widget(wrapped_paragraph(error_line(message.clone())), error);
        }

        frame.render_widget(keys_paragraph(key_text), footer);
    }

    fn render_review(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = REVIEW_HINT.for_width(area.width);
        let footer_height = keys_height(area.width, key_text);
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Min(4),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let mut lines = Vec::new();
        match (self.session.current_item(), self.session.progress()) {
            (Some(item), Some((position, total))) => {
                lines.push(focus_line(format!("[{position} / {total}] {}", item.name)));
            }
            _ => lines.push(focus_line("Copying files...")),
        }
        match self.preview_sizes() {
            Some(((native_width, native_height), (scaled_width, scaled_height))) => {
                lines.push(field_line("Native size", format!("{native_width}x{native_height}")));
                lines.push(field_line("Preview size", format!("{scaled_width}x{scaled_height}")));
            }
            None => lines.push(field_line("Size", "unknown")),
        }
        lines.push(field_line("Buckets", self.session.key_mapping().legend()));
        frame.render_widget(
            wrapped_paragraph(Text::from(lines)).block(theme::panel(TITLE)),
            header,
        );

        let preview_block = theme::panel("Preview");
        let preview_area = preview_block.inner(body);
        frame.render_widget(preview_block, body);
        match &self.preview {
            Some(LoadedPreview {
                image: Ok(image), ..
            }) => frame.render_widget(image, preview_area),
            Some(LoadedPreview {
                image: Err(message),
                ..
            }) => frame.render_widget(
                wrapped_paragraph(Text::from(vec![
                    Line::from(Span::styled("Preview unavailable", theme::ERROR)),
                    Line::from(message.clone()),
                    Line::from(""),
                    Line::from("The file can still be sorted."),
                ])),
                preview_area,
            ),
            None => {}
        }

        frame.render_widget(keys_paragraph(key_text), footer);

        if let (Some(choice), Some(pending)) = (&self.confirm, self.session.pending()) {
            let key_text = CONFIRM_HINT.for_width(area.width);
            render_modal(
                frame,
                ModalSpec {
                    title: "Confirm Copy",
                    title_style: Some(theme::FOCUS),
                    body: Text::from(vec![
                        Line::from(pending.prompt()),
                        Line::from(""),
                        selection_line("Current Selection", choice.selected_label()),
                    ]),
                    key_hint: Some(key_text),
                    width_pct: 70,
                    height_pct: 36,
                    scroll: 0,
                },
            );
        }
    }

    fn render_results(&self, frame: &mut Frame<'_>) {
        let Some(log) = self.session.run_log() else {
            return;
        };

        let area = frame.area();
        let key_text = RESULTS_HINT.for_width(area.width);
        let footer_height = keys_height(area.width, key_text);
        let [summary, entries, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(3),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        frame.render_widget(
            wrapped_paragraph(summary_text(log)).block(theme::panel(TITLE)),
            summary,
        );
        frame.render_widget(
            wrapped_paragraph(log_text(log, self.log_lines)).block(theme::panel("Log")),
            entries,
        );
        frame.render_widget(keys_paragraph(key_text), footer);

        if self.showing_commit_errors() {
            let title = format!("Errors captured ({})", log.error_count());
            let listing = numbered_errors(log.errors().map(|entry| entry.message.as_str()));
            let key_text = ERRORS_HINT.for_width(area.width);
            render_error_modal(frame, &title, &listing, self.error_scroll, key_text);
        }
    }
}

fn render_input(frame: &mut Frame<'_>, input: &Input, area: Rect, focused: bool) {
    let width = area.width as usize;
    let scroll = input.visual_scroll(width);
    let paragraph = Paragraph::new(input.value()).scroll((0, scroll as u16));
    frame.render_widget(paragraph, area);

    if focused && width > 0 {
        let visual = input.visual_cursor();
        let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
        frame.set_cursor_position((area.x + relative as u16, area.y));
    }
}

fn summary_text(log: &RunLog) -> Text<'static> {
    let error_style = if log.error_count() > 0 {
        theme::ERROR
    } else {
        theme::MUTED
    };
    Text::from(vec![
        Line::from(Span::styled(
            format!("{} files copied!", log.copied_count()),
            theme::SUCCESS,
        )),
        Line::from(Span::styled(
            format!("{} errors captured!", log.error_count()),
            error_style,
        )),
        Line::from(format!("{} files skipped", log.skipped_count())),
    ])
}

fn log_text(log: &RunLog, limit: usize) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = log
        .head(limit)
        .iter()
        .map(|entry| match entry.kind {
            EntryKind::Error => Line::from(Span::styled(entry.message.clone(), theme::ERROR)),
            _ => Line::from(entry.message.clone()),
        })
        .collect();

    let hidden = log.entries().len().saturating_sub(limit);
    if hidden > 0 {
        lines.push(Line::from(Span::styled(
            format!("... {hidden} more"),
            theme::MUTED,
        )));
    }
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use imgbucket_core::run_log::{EntryKind, RunLog};

    use super::{log_text, summary_text};

    #[test]
    fn summary_text_lists_counters() {
        let mut log = RunLog::start();
        log.record(EntryKind::Copied, "Successfully copied a.png to cats");
        log.record(EntryKind::Error, "failed to copy b.png to dogs");

        let text = summary_text(&log);
        let lines: Vec<String> = text.lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(
            lines,
            vec!["1 files copied!", "1 errors captured!", "0 files skipped"]
        );
    }

    #[test]
    fn log_text_truncates_to_limit() {
        let mut log = RunLog::start();
        for index in 0..5 {
            log.record(EntryKind::Copied, format!("Successfully copied {index}.png to cats"));
        }

        let text = log_text(&log, 3);
        assert_eq!(text.lines.len(), 4);
        assert_eq!(text.lines[0].to_string(), "Successfully copied 0.png to cats");
        assert_eq!(text.lines[3].to_string(), "... 2 more");

        assert_eq!(log_text(&log, 30).lines.len(), 5);
    }
}
