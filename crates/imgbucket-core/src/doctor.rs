use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use crate::config::{BUCKET_FILE_NAME, load_bucket_file, load_settings, resolve_settings_path};
use crate::items::discover_items;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

const SETTINGS_CHECK: &str = "settings file valid";
const BUCKET_FILE_CHECK: &str = "bucket file valid";
const IMAGES_CHECK: &str = "eligible images present";
const WRITABLE_CHECK: &str = "working directory writable";

pub fn run_doctor(dir: &Path) -> DoctorReport {
    match resolve_settings_path() {
        Ok(settings_path) => run_doctor_with_settings(dir, &settings_path),
        Err(error) => {
            let mut checks = vec![fail_check(SETTINGS_CHECK, error.to_string())];
            checks.extend(working_directory_checks(dir));
            DoctorReport { checks }
        }
    }
}

pub fn run_doctor_with_settings(dir: &Path, settings_path: &Path) -> DoctorReport {
    let mut checks = vec![check_settings(settings_path)];
    checks.extend(working_directory_checks(dir));
    DoctorReport { checks }
}

fn working_directory_checks(dir: &Path) -> Vec<DoctorCheck> {
    if !dir.is_dir() {
        let reason = format!("{} is not a directory", dir.display());
        return [BUCKET_FILE_CHECK, IMAGES_CHECK, WRITABLE_CHECK]
            .into_iter()
            .map(|name| skipped_check(name, &reason))
            .collect();
    }

    vec![
        check_bucket_file(dir),
        check_images(dir),
        check_writable(dir),
    ]
}

fn check_settings(path: &Path) -> DoctorCheck {
    if !path.exists() {
        return pass_check(
            SETTINGS_CHECK,
            format!("not found at {}, using defaults", path.display()),
        );
    }

    match load_settings(path) {
        Ok(_) => pass_check(SETTINGS_CHECK, format!("valid at {}", path.display())),
        Err(error) => fail_check(SETTINGS_CHECK, error.to_string()),
    }
}

fn check_bucket_file(dir: &Path) -> DoctorCheck {
    match load_bucket_file(dir) {
        Ok(Some(names)) => pass_check(
            BUCKET_FILE_CHECK,
            format!(
                "{} buckets: {}",
                names.len(),
                names.iter().collect::<Vec<_>>().join(", ")
            ),
        ),
        Ok(None) => pass_check(
            BUCKET_FILE_CHECK,
            format!("no {BUCKET_FILE_NAME}, buckets are configured interactively"),
        ),
        Err(error) => fail_check(BUCKET_FILE_CHECK, error.to_string()),
    }
}

fn check_images(dir: &Path) -> DoctorCheck {
    match discover_items(dir) {
        Ok(items) if items.is_empty() => fail_check(
            IMAGES_CHECK,
            format!("No image files in target directory: {}", dir.display()),
        ),
        Ok(items) => {
            let unreadable = items.iter().filter(|item| item.dimensions.is_none()).count();
            if unreadable == 0 {
                pass_check(IMAGES_CHECK, format!("{} images found", items.len()))
            } else {
                pass_check(
                    IMAGES_CHECK,
                    format!(
                        "{} images found, {unreadable} without readable dimensions",
                        items.len()
                    ),
                )
            }
        }
        Err(error) => fail_check(IMAGES_CHECK, error.to_string()),
    }
}

fn check_writable(dir: &Path) -> DoctorCheck {
    let check_file = dir.join(format!(".imgbucket-write-check-{}", std::process::id()));
    match OpenOptions::new().write(true).create_new(true).open(&check_file) {
        Ok(file) => {
            drop(file);
            write_check_outcome(&check_file, fs::remove_file(&check_file))
        }
        Err(error) => fail_check(
            WRITABLE_CHECK,
            format!("cannot write to {}: {error}", dir.display()),
        ),
    }
}

/// Fails the check when the temporary file could not be removed, naming its path.
fn write_check_outcome(check_file: &Path, removal: io::Result<()>) -> DoctorCheck {
    match removal {
        Ok(()) => pass_check(WRITABLE_CHECK, "bucket directories can be created"),
        Err(error) => fail_check(
            WRITABLE_CHECK,
            format!(
                "writable, but could not remove {}: {error}; delete it manually",
                check_file.display()
            ),
        ),
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::bucket_file_path;
    use crate::test_support::write_png;

    fn check<'a>(report: &'a DoctorReport, name: &str) -> &'a DoctorCheck {
        report
            .checks
            .iter()
            .find(|check| check.name == name)
            .expect("check present")
    }

    #[test]
    fn check_state_display_is_uppercase_label() {
        assert_eq!(CheckState::Pass.to_string(), "PASS");
        assert_eq!(CheckState::Fail.to_string(), "FAIL");
    }

    #[test]
    fn doctor_summary_counts_pass_and_fail() {
        let report = DoctorReport {
            checks: vec![
                pass_check("a", "ok"),
                fail_check("b", "no"),
                pass_check("c", "ok"),
            ],
        };

        assert_eq!(report.summary(), "2 passed, 1 failed");
        assert!(report.has_failures());
    }

    #[test]
    fn healthy_directory_passes_every_check() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_png(temp.path(), "a.png", 4, 4);
        fs::write(bucket_file_path(temp.path()), "keep\ntoss\n").expect("bucket file");

        let report = run_doctor_with_settings(temp.path(), &temp.path().join("missing.toml"));

        assert!(!report.has_failures(), "{report:?}");
        assert_eq!(report.checks.len(), 4);
        assert_eq!(check(&report, BUCKET_FILE_CHECK).details, "2 buckets: keep, toss");
        assert_eq!(check(&report, IMAGES_CHECK).details, "1 images found");
        assert!(check(&report, SETTINGS_CHECK).details.contains("using defaults"));
    }

    #[test]
    fn empty_directory_fails_image_check_only() {
        let temp = tempfile::tempdir().expect("temp dir");

        let report = run_doctor_with_settings(temp.path(), &temp.path().join("missing.toml"));

        assert_eq!(report.summary(), "3 passed, 1 failed");
        assert_eq!(check(&report, IMAGES_CHECK).state, CheckState::Fail);
        assert!(!temp.path().read_dir().expect("read dir").any(|_| true));
    }

    #[test]
    fn invalid_settings_and_bucket_file_fail() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_png(temp.path(), "a.png", 2, 2);
        let settings = temp.path().join("config.toml");
        fs::write(&settings, "default_bucket_count = 1\n").expect("settings");
        fs::write(bucket_file_path(temp.path()), "same\nsame\n").expect("bucket file");

        let report = run_doctor_with_settings(temp.path(), &settings);

        assert_eq!(check(&report, SETTINGS_CHECK).state, CheckState::Fail);
        let bucket = check(&report, BUCKET_FILE_CHECK);
        assert_eq!(bucket.state, CheckState::Fail);
        assert!(bucket.details.contains(BUCKET_FILE_NAME));
    }

    #[test]
    fn missing_directory_skips_directory_checks() {
        let temp = tempfile::tempdir().expect("temp dir");
        let missing = temp.path().join("missing");

        let report = run_doctor_with_settings(&missing, &temp.path().join("missing.toml"));

        assert_eq!(report.summary(), "1 passed, 3 failed");
        assert!(check(&report, WRITABLE_CHECK).details.starts_with("skipped because"));
    }

    #[test]
    fn leftover_write_check_file_is_reported() {
        let check_file = Path::new("/photos/.imgbucket-write-check-7");
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        let check = write_check_outcome(check_file, Err(denied));

        assert_eq!(check.state, CheckState::Fail);
        assert!(check.details.contains(".imgbucket-write-check-7"));
        assert!(check.details.contains("delete it manually"));
        assert_eq!(write_check_outcome(check_file, Ok(())).state, CheckState::Pass);
    }
}
