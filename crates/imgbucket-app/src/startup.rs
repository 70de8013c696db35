use std::path::PathBuf;

use anyhow::Result;
use imgbucket_core::config::{bucket_file_path, load_bucket_file};
use imgbucket_core::items::discover_required_items;
use imgbucket_core::workflow::Session;
use tracing::info;

use crate::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketSource {
    SavedFile(PathBuf),
    Interactive,
}

impl App {
    /// Discovers images and builds the session. Fails before any screen is shown
    /// when there is nothing to sort or the saved bucket file is invalid.
    pub fn start_session(&self) -> Result<(Session, BucketSource)> {
        let items = discover_required_items(&self.cwd)?;
        info!(count = items.len(), dir = %self.cwd.display(), "images ready for review");

        let started = match load_bucket_file(&self.cwd)? {
            Some(names) => {
                info!(buckets = names.len(), "using saved bucket file");
                (
                    Session::with_saved_buckets(items, names)?,
                    BucketSource::SavedFile(bucket_file_path(&self.cwd)),
                )
            }
            None => (
                Session::new(items, self.settings.default_bucket_count)?,
                BucketSource::Interactive,
            ),
        };

        Ok(started)
    }
}
