use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::BucketModel;
use crate::run_log::{EntryKind, RunLog};

/// What to do when `<bucket>/<item>` already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnExisting {
    #[default]
    Skip,
    Overwrite,
    Fail,
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("failed to create bucket directory {} for '{bucket}': {source}", .path.display())]
    CreateDirectory {
        bucket: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot copy {item} to {bucket}: bucket directory {} is unavailable", .path.display())]
    DirectoryUnavailable {
        item: String,
        bucket: String,
        path: PathBuf,
    },
    #[error("failed to copy {item} to {bucket}: {source}")]
    Copy {
        item: String,
        bucket: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy {item} to {bucket}: {} already exists", .path.display())]
    DestinationExists {
        item: String,
        bucket: String,
        path: PathBuf,
    },
    #[error("refusing to copy {item} to {bucket}: {} is the original file", .path.display())]
    SameFile {
        item: String,
        bucket: String,
        path: PathBuf,
    },
    #[error("copied {item} to {bucket} but failed to preserve timestamps: {source}")]
    Timestamps {
        item: String,
        bucket: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    Existing,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    Copied,
    Skipped,
}

pub fn bucket_dir(root: &Path, bucket: &str) -> PathBuf {
    root.join(bucket)
}

pub fn ensure_bucket_dir(root: &Path, bucket: &str) -> Result<DirectoryStatus, CommitError> {
    let path = bucket_dir(root, bucket);
    if path.is_dir() {
        return Ok(DirectoryStatus::Existing);
    }

    fs::create_dir(&path).map_err(|source| CommitError::CreateDirectory {
        bucket: bucket.to_string(),
        path: path.clone(),
        source,
    })?;
    Ok(DirectoryStatus::Created)
}

/// Copies `root/item` into `root/bucket/`, keeping timestamps. The source is never written.
pub fn copy_item(
    root: &Path,
    bucket: &str,
    item: &str,
    on_existing: OnExisting,
) -> Result<CopyStatus, CommitError> {
    let source = root.join(item);
    let target = bucket_dir(root, bucket).join(item);

    if let Ok(existing) = fs::symlink_metadata(&target) {
        match on_existing {
            OnExisting::Skip => return Ok(CopyStatus::Skipped),
            OnExisting::Fail => {
                return Err(CommitError::DestinationExists {
                    item: item.to_string(),
                    bucket: bucket.to_string(),
                    path: target,
                });
            }
            OnExisting::Overwrite => {}
        }

        if is_same_file(&source, &target) {
            return Err(CommitError::SameFile {
                item: item.to_string(),
                bucket: bucket.to_string(),
                path: target,
            });
        }

        // Overwrite replaces the link itself, never the file behind it.
        if existing.file_type().is_symlink() {
            fs::remove_file(&target).map_err(|source| CommitError::Copy {
                item: item.to_string(),
                bucket: bucket.to_string(),
                source,
            })?;
        }
    }

    fs::copy(&source, &target).map_err(|source| CommitError::Copy {
        item: item.to_string(),
        bucket: bucket.to_string(),
        source,
    })?;

    preserve_timestamps(&source, &target).map_err(|source| CommitError::Timestamps {
        item: item.to_string(),
        bucket: bucket.to_string(),
        source,
    })?;

    Ok(CopyStatus::Copied)
}

/// True when both paths resolve to one file, through symlinks or hard links.
fn is_same_file(source: &Path, target: &Path) -> bool {
    let (Ok(source_real), Ok(target_real)) = (fs::canonicalize(source), fs::canonicalize(target))
    else {
        return false;
    };
    source_real == target_real || same_inode(&source_real, &target_real)
}

#[cfg(unix)]
fn same_inode(left: &Path, right: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(left), fs::metadata(right)) {
        (Ok(left), Ok(right)) => left.dev() == right.dev() && left.ino() == right.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_inode(_left: &Path, _right: &Path) -> bool {
    false
}

fn preserve_timestamps(source: &Path, target: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    let file = match File::options().write(true).open(target) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::PermissionDenied => File::open(target)?,
        Err(error) => return Err(error),
    };
    file.set_times(times)
}

/// Materializes every assignment in `model` as a copy under `root`.
///
/// Failures are recorded in the returned log and never stop the run.
pub fn commit(model: &BucketModel, root: &Path, on_existing: OnExisting) -> RunLog {
    let mut log = RunLog::start();

    for (bucket, members) in model.all_buckets() {
        match ensure_bucket_dir(root, bucket) {
            Ok(DirectoryStatus::Created) => {
                info!(bucket, "created bucket directory");
                log.record(
                    EntryKind::DirectoryCreated,
                    format!("Successfully created {bucket}"),
                );
            }
            Ok(DirectoryStatus::Existing) => {}
            Err(error) => {
                warn!(bucket, "{error}");
                log.record(EntryKind::Error, error.to_string());
            }
        }

        let path = bucket_dir(root, bucket);
        if !path.is_dir() {
            for item in members {
                let error = CommitError::DirectoryUnavailable {
                    item: item.clone(),
                    bucket: bucket.to_string(),
                    path: path.clone(),
                };
                warn!(bucket, item = %item, "{error}");
                log.record(EntryKind::Error, error.to_string());
            }
            continue;
        }

        for item in members {
            match copy_item(root, bucket, item, on_existing) {
                Ok(CopyStatus::Copied) => {
                    info!(bucket, item = %item, "copied");
                    log.record(
                        EntryKind::Copied,
                        format!("Successfully copied {item} to {bucket}"),
                    );
                }
                Ok(CopyStatus::Skipped) => {
                    info!(bucket, item = %item, "skipped existing copy");
                    log.record(
                        EntryKind::Skipped,
                        format!("Skipped {item}: already present in {bucket}"),
                    );
                }
                Err(error) => {
                    warn!(bucket, item = %item, "{error}");
                    log.record(EntryKind::Error, error.to_string());
                }
            }
        }
    }

    log.finish()
}
