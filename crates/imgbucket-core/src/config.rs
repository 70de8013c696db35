use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buckets::{
    AMOUNT_INSTRUCTION, BucketConfigError, BucketNames, DEFAULT_BUCKET_COUNT, NAMING_INSTRUCTION,
    validate_bucket_count,
};
use crate::commit::OnExisting;

pub const BUCKET_FILE_NAME: &str = "image_bucket_sort_config.txt";
pub const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub default_bucket_count: usize,
    pub preview: PreviewSettings,
    pub commit: CommitSettings,
    pub results: ResultsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub max_width: u32,
    pub max_height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommitSettings {
    pub on_existing: OnExisting,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResultsSettings {
    pub log_lines: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            default_bucket_count: DEFAULT_BUCKET_COUNT,
            preview: PreviewSettings::default(),
            commit: CommitSettings::default(),
            results: ResultsSettings::default(),
        }
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_width: 1850,
            max_height: 900,
        }
    }
}

impl Default for ResultsSettings {
    fn default() -> Self {
        Self { log_lines: 30 }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for settings path")]
    HomeDirectoryUnavailable,
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid settings: {message}")]
    Validation { message: String },
    #[error(
        "{amount} {naming} in \"{file}\": {source}",
        amount = AMOUNT_INSTRUCTION,
        naming = NAMING_INSTRUCTION,
        file = BUCKET_FILE_NAME
    )]
    InvalidBucketFile {
        path: PathBuf,
        #[source]
        source: BucketConfigError,
    },
}

pub fn resolve_settings_path() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("imgbucket")
        .join("config.toml"))
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Settings = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_settings(&parsed)?;
    Ok(parsed)
}

/// A missing settings file means defaults; anything unreadable or invalid is an error.
pub fn load_settings_or_default(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    load_settings(path)
}

pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.version != SETTINGS_VERSION {
        return Err(ConfigError::Validation {
            message: format!("version must be {SETTINGS_VERSION}"),
        });
    }

    if let Err(error) = validate_bucket_count(settings.default_bucket_count) {
        return Err(ConfigError::Validation {
            message: format!("default_bucket_count: {error}"),
        });
    }

    if settings.preview.max_width == 0 || settings.preview.max_height == 0 {
        return Err(ConfigError::Validation {
            message: "preview.max_width and preview.max_height must be positive".to_string(),
        });
    }

    if settings.results.log_lines == 0 {
        return Err(ConfigError::Validation {
            message: "results.log_lines must be positive".to_string(),
        });
    }

    Ok(())
}

pub fn bucket_file_path(dir: &Path) -> PathBuf {
    dir.join(BUCKET_FILE_NAME)
}

/// One bucket name per non-blank line, surrounding whitespace removed.
pub fn parse_bucket_file(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `Ok(None)` when the working directory has no bucket file.
pub fn load_bucket_file(dir: &Path) -> Result<Option<BucketNames>, ConfigError> {
    let path = bucket_file_path(dir);
    if !path.is_file() {
        return Ok(None);
    }

    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    BucketNames::validate(parse_bucket_file(&raw))
        .map(Some)
        .map_err(|source| ConfigError::InvalidBucketFile { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_settings_from_toml(raw: &str) -> Result<Settings, ConfigError> {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        fs::write(file.path(), raw).expect("write temp settings");
        load_settings(file.path())
    }

    #[test]
    fn empty_settings_file_uses_defaults() {
        let settings = load_settings_from_toml("").expect("defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.preview.max_width, 1850);
        assert_eq!(settings.preview.max_height, 900);
        assert_eq!(settings.results.log_lines, 30);
        assert_eq!(settings.commit.on_existing, OnExisting::Skip);
    }

    #[test]
    fn accepts_full_settings() {
        let raw = r#"
version = 1
default_bucket_count = 5

[preview]
max_width = 800
max_height = 600

[commit]
on_existing = "overwrite"

[results]
log_lines = 10
"#;

        let settings = load_settings_from_toml(raw).expect("valid settings");
        assert_eq!(settings.default_bucket_count, 5);
        assert_eq!(settings.preview.max_width, 800);
        assert_eq!(settings.commit.on_existing, OnExisting::Overwrite);
        assert_eq!(settings.results.log_lines, 10);
    }

    #[test]
    fn rejects_unknown_policy() {
        let error = load_settings_from_toml("[commit]\non_existing = \"delete\"\n")
            .expect_err("policy should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_out_of_range_default_count() {
        let error =
            load_settings_from_toml("default_bucket_count = 12\n").expect_err("count should fail");
        assert!(error.to_string().contains("default_bucket_count"));
    }

    #[test]
    fn rejects_zero_preview_box() {
        let error = load_settings_from_toml("[preview]\nmax_width = 0\n")
            .expect_err("preview should fail");
        assert!(error.to_string().contains("must be positive"));
    }

    #[test]
    fn rejects_wrong_version() {
        let error = load_settings_from_toml("version = 2\n").expect_err("version should fail");
        assert!(error.to_string().contains("version must be 1"));
    }

    #[test]
    fn missing_settings_file_means_defaults() {
        let temp = tempfile::tempdir().expect("temp dir");
        let settings =
            load_settings_or_default(&temp.path().join("config.toml")).expect("defaults");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn parse_bucket_file_skips_blank_lines() {
        assert_eq!(
            parse_bucket_file("cats\n\n  dogs  \r\n\t\nbirds"),
            vec!["cats".to_string(), "dogs".to_string(), "birds".to_string()]
        );
    }

    #[test]
    fn load_bucket_file_absent_returns_none() {
        let temp = tempfile::tempdir().expect("temp dir");
        assert_eq!(load_bucket_file(temp.path()).expect("no file"), None);
    }

    #[test]
    fn load_bucket_file_returns_validated_names() {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::write(bucket_file_path(temp.path()), "keep\nmaybe\n\ntoss\n").expect("write");

        let names = load_bucket_file(temp.path())
            .expect("valid")
            .expect("present");
        assert_eq!(names.as_slice(), &["keep", "maybe", "toss"]);
    }

    #[test]
    fn load_bucket_file_rejects_duplicates_with_instructions() {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::write(bucket_file_path(temp.path()), "a\na\n").expect("write");

        let error = load_bucket_file(temp.path()).expect_err("duplicate names");
        let message = error.to_string();
        assert!(message.contains(AMOUNT_INSTRUCTION));
        assert!(message.contains(NAMING_INSTRUCTION));
        assert!(message.contains(BUCKET_FILE_NAME));
        assert!(matches!(
            error,
            ConfigError::InvalidBucketFile {
                source: BucketConfigError::DuplicateName { .. },
                ..
            }
        ));
    }

    #[test]
    fn load_bucket_file_rejects_single_bucket() {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::write(bucket_file_path(temp.path()), "lonely\n").expect("write");

        let error = load_bucket_file(temp.path()).expect_err("too few");
        assert!(matches!(
            error,
            ConfigError::InvalidBucketFile {
                source: BucketConfigError::InvalidCount { count: 1 },
                ..
            }
        ));
    }
}
