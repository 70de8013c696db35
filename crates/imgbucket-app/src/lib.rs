mod commit;
mod startup;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use imgbucket_core::config::{Settings, load_settings_or_default, resolve_settings_path};
use imgbucket_core::doctor::{DoctorReport, run_doctor};

pub use startup::BucketSource;

/// Application façade over one working directory.
pub struct App {
    cwd: PathBuf,
    settings: Settings,
}

impl App {
    pub fn new(cwd: PathBuf) -> Self {
        Self::with_settings(cwd, Settings::default())
    }

    pub fn with_settings(cwd: PathBuf, settings: Settings) -> Self {
        Self { cwd, settings }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn item_path(&self, name: &str) -> PathBuf {
        self.cwd.join(name)
    }

    pub fn doctor(&self) -> Result<DoctorReport> {
        Ok(run_doctor(&self.cwd))
    }

    /// Loads `~/.config/imgbucket/config.toml`, falling back to defaults when it is absent.
    pub fn ensure_settings_ready(&mut self) -> Result<&Settings> {
        let settings_path =
            resolve_settings_path().context("failed to resolve settings path")?;

        self.settings = load_settings_or_default(&settings_path).map_err(|error| {
            anyhow!(
                "invalid settings at {}: {error}\nFix or remove the file and retry.",
                settings_path.display()
            )
        })?;

        Ok(&self.settings)
    }
}
