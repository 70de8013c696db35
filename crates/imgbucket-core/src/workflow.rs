use thiserror::Error;
use tracing::{debug, info};

use crate::buckets::{AmountInput, BucketConfigError, BucketNames, KeyMapping, parse_bucket_amount};
use crate::items::Item;
use crate::model::{BucketModel, UnknownBucket};
use crate::run_log::RunLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    ConfiguringAmount,
    ConfiguringNames,
    ReviewingImage { cursor: usize },
    Committing,
    ShowingResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SubmitAmount(String),
    SubmitNames(Vec<String>),
    PressKey(char),
    Confirm(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAssignment {
    pub bucket: String,
    pub item: String,
}

impl PendingAssignment {
    pub fn prompt(&self) -> String {
        format!("File '{}' will be copied to '{}'", self.item, self.bucket)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action has no meaning in the current state.
    Ignored,
    /// Input failed validation; the state is unchanged.
    Rejected(String),
    ConfirmationRequested(PendingAssignment),
    Cancelled,
    Transitioned,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no eligible images to review")]
    NoItems,
    #[error("invalid default bucket count: {0}")]
    DefaultCount(#[from] BucketConfigError),
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    UnknownBucket(#[from] UnknownBucket),
}

/// Materializes the bucket model once every item has been reviewed.
pub trait CommitOps {
    fn commit(&self, model: &BucketModel) -> RunLog;
}

/// One sorting run: the active screen plus the data it works on.
#[derive(Debug, Clone)]
pub struct Session {
    state: WorkflowState,
    items: Vec<Item>,
    default_count: usize,
    names: BucketNames,
    key_mapping: KeyMapping,
    model: BucketModel,
    pending: Option<PendingAssignment>,
    run_log: Option<RunLog>,
}

impl Session {
    /// Starts at the amount screen with `bucket_1..bucket_N` defaults.
    pub fn new(items: Vec<Item>, default_count: usize) -> Result<Self, StartupError> {
        if items.is_empty() {
            return Err(StartupError::NoItems);
        }

        let names = BucketNames::defaults(default_count)?;
        Ok(Self::build(
            WorkflowState::ConfiguringAmount,
            items,
            default_count,
            names,
        ))
    }

    /// Starts directly at the first image with a saved bucket configuration.
    pub fn with_saved_buckets(items: Vec<Item>, names: BucketNames) -> Result<Self, StartupError> {
        if items.is_empty() {
            return Err(StartupError::NoItems);
        }

        let count = names.len();
        Ok(Self::build(
            WorkflowState::ReviewingImage { cursor: 0 },
            items,
            count,
            names,
        ))
    }

    fn build(
        state: WorkflowState,
        items: Vec<Item>,
        default_count: usize,
        names: BucketNames,
    ) -> Self {
        Self {
            state,
            items,
            default_count,
            key_mapping: KeyMapping::from_names(&names),
            model: BucketModel::new(&names),
            names,
            pending: None,
            run_log: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn current_item(&self) -> Option<&Item> {
        match self.state {
            WorkflowState::ReviewingImage { cursor } => self.items.get(cursor),
            _ => None,
        }
    }

    /// `(reviewed so far + 1, total)` while reviewing.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.state {
            WorkflowState::ReviewingImage { cursor } if cursor < self.items.len() => {
                Some((cursor + 1, self.items.len()))
            }
            _ => None,
        }
    }

    pub fn bucket_names(&self) -> &BucketNames {
        &self.names
    }

    pub fn bucket_count(&self) -> usize {
        self.names.len()
    }

    pub fn key_mapping(&self) -> &KeyMapping {
        &self.key_mapping
    }

    pub fn model(&self) -> &BucketModel {
        &self.model
    }

    pub fn pending(&self) -> Option<&PendingAssignment> {
        self.pending.as_ref()
    }

    pub fn run_log(&self) -> Option<&RunLog> {
        self.run_log.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state == WorkflowState::ShowingResults
    }

    pub fn handle(
        &mut self,
        action: Action,
        ops: &dyn CommitOps,
    ) -> Result<Outcome, WorkflowError> {
        let outcome = match (self.state, action) {
            (WorkflowState::ConfiguringAmount, Action::SubmitAmount(input)) => {
                self.submit_amount(&input)
            }
            (WorkflowState::ConfiguringNames, Action::SubmitNames(names)) => {
                self.submit_names(names, ops)
            }
            (WorkflowState::ReviewingImage { cursor }, Action::PressKey(key)) => {
                self.press_key(cursor, key)
            }
            (WorkflowState::ReviewingImage { cursor }, Action::Confirm(confirmed)) => {
                self.confirm(cursor, confirmed, ops)?
            }
            _ => Outcome::Ignored,
        };

        debug!(state = ?self.state, outcome = ?outcome, "handled action");
        Ok(outcome)
    }

    fn submit_amount(&mut self, input: &str) -> Outcome {
        let count = match parse_bucket_amount(input) {
            AmountInput::Default => self.default_count,
            AmountInput::Count(count) => count,
            AmountInput::Invalid(reason) => return Outcome::Rejected(reason),
        };

        match BucketNames::defaults(count) {
            Ok(names) => {
                self.replace_buckets(names);
                self.state = WorkflowState::ConfiguringNames;
                Outcome::Transitioned
            }
            Err(error) => Outcome::Rejected(error.to_string()),
        }
    }

    fn submit_names(&mut self, names: Vec<String>, ops: &dyn CommitOps) -> Outcome {
        let names: Vec<String> = names.iter().map(|name| name.trim().to_string()).collect();

        if names.iter().all(String::is_empty) {
            self.enter_review(0, ops);
            return Outcome::Transitioned;
        }

        if names.len() != self.names.len() {
            return Outcome::Rejected(format!(
                "expected {} bucket names, got {}",
                self.names.len(),
                names.len()
            ));
        }

        match BucketNames::validate(names) {
            Ok(validated) => {
                self.replace_buckets(validated);
                self.enter_review(0, ops);
                Outcome::Transitioned
            }
            Err(error) => Outcome::Rejected(error.to_string()),
        }
    }

    fn press_key(&mut self, cursor: usize, key: char) -> Outcome {
        if self.pending.is_some() {
            return Outcome::Ignored;
        }

        let (Some(bucket), Some(item)) = (self.key_mapping.bucket_for(key), self.items.get(cursor))
        else {
            return Outcome::Ignored;
        };

        let pending = PendingAssignment {
            bucket: bucket.to_string(),
            item: item.name.clone(),
        };
        self.pending = Some(pending.clone());
        Outcome::ConfirmationRequested(pending)
    }

    fn confirm(
        &mut self,
        cursor: usize,
        confirmed: bool,
        ops: &dyn CommitOps,
    ) -> Result<Outcome, WorkflowError> {
        let Some(pending) = self.pending.take() else {
            return Ok(Outcome::Ignored);
        };

        if !confirmed {
            return Ok(Outcome::Cancelled);
        }

        self.model.assign(&pending.bucket, &pending.item)?;
        info!(bucket = %pending.bucket, item = %pending.item, "assigned");
        self.enter_review(cursor + 1, ops);
        Ok(Outcome::Transitioned)
    }

    fn replace_buckets(&mut self, names: BucketNames) {
        self.key_mapping = KeyMapping::from_names(&names);
        self.model = BucketModel::new(&names);
        self.names = names;
    }

    fn enter_review(&mut self, cursor: usize, ops: &dyn CommitOps) {
        if cursor < self.items.len() {
            self.state = WorkflowState::ReviewingImage { cursor };
            return;
        }

        self.state = WorkflowState::Committing;
        info!(
            assignments = self.model.assignment_count(),
            "all images reviewed, committing"
        );
        self.run_log = Some(ops.commit(&self.model));
        self.state = WorkflowState::ShowingResults;
    }
}
