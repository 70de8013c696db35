use imgbucket_core::commit::commit;
use imgbucket_core::model::BucketModel;
use imgbucket_core::run_log::RunLog;
use imgbucket_core::workflow::CommitOps;
use tracing::info;

use crate::App;

impl CommitOps for App {
    fn commit(&self, model: &BucketModel) -> RunLog {
        let on_existing = self.settings.commit.on_existing;
        info!(dir = %self.cwd.display(), ?on_existing, "committing bucket model");

        let log = commit(model, &self.cwd, on_existing);
        info!(
            copied = log.copied_count(),
            skipped = log.skipped_count(),
            errors = log.error_count(),
            "commit finished"
        );
        log
    }
}
