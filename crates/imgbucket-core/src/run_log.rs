use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    DirectoryCreated,
    Copied,
    Skipped,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: EntryKind,
    pub message: String,
}

/// Append-only record of a commit run. Counters always agree with the entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLog {
    entries: Vec<LogEntry>,
    copied: usize,
    skipped: usize,
    errors: usize,
    started_at: Option<String>,
    finished_at: Option<String>,
}

impl RunLog {
    pub fn start() -> Self {
        Self {
            started_at: now_utc_rfc3339(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, kind: EntryKind, message: impl Into<String>) {
        match kind {
            EntryKind::Copied => self.copied += 1,
            EntryKind::Skipped => self.skipped += 1,
            EntryKind::Error => self.errors += 1,
            EntryKind::DirectoryCreated => {}
        }
        self.entries.push(LogEntry {
            kind,
            message: message.into(),
        });
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = now_utc_rfc3339();
        self
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The first `limit` entries, for display.
    pub fn head(&self, limit: usize) -> &[LogEntry] {
        &self.entries[..self.entries.len().min(limit)]
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Error)
    }

    pub fn copied_count(&self) -> usize {
        self.copied
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn started_at(&self) -> Option<&str> {
        self.started_at.as_deref()
    }

    pub fn finished_at(&self) -> Option<&str> {
        self.finished_at.as_deref()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} files copied!\n{} errors captured!\n{} files skipped",
            self.copied, self.errors, self.skipped
        )
    }
}

fn now_utc_rfc3339() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_updates_matching_counter() {
        let mut log = RunLog::start();
        log.record(EntryKind::DirectoryCreated, "created cats");
        log.record(EntryKind::Copied, "copied a.png to cats");
        log.record(EntryKind::Copied, "copied b.png to cats");
        log.record(EntryKind::Skipped, "skipped c.png");
        log.record(EntryKind::Error, "failed d.png");

        assert_eq!(log.copied_count(), 2);
        assert_eq!(log.skipped_count(), 1);
        assert_eq!(log.error_count(), 1);
        assert_eq!(log.entries().len(), 5);
        assert_eq!(log.errors().count(), 1);
    }

    #[test]
    fn head_truncates_without_touching_counters() {
        let mut log = RunLog::start();
        for index in 0..40 {
            log.record(EntryKind::Copied, format!("copied {index}.png"));
        }

        assert_eq!(log.head(30).len(), 30);
        assert_eq!(log.head(30)[0].message, "copied 0.png");
        assert_eq!(log.head(100).len(), 40);
        assert_eq!(log.copied_count(), 40);
    }

    #[test]
    fn start_and_finish_stamp_rfc3339_times() {
        let log = RunLog::start().finish();
        let started = log.started_at().expect("started");
        let finished = log.finished_at().expect("finished");
        assert!(started.ends_with('Z') && started.contains('T'));
        assert!(finished.ends_with('Z'));
    }

    #[test]
    fn summary_lists_all_counters() {
        let mut log = RunLog::start();
        log.record(EntryKind::Copied, "copied a.png to cats");
        log.record(EntryKind::Error, "failed b.png");
        assert_eq!(
            log.summary(),
            "1 files copied!\n1 errors captured!\n0 files skipped"
        );
    }
}
