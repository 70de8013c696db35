use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// An eligible image file in the working directory, in review order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub order: usize,
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read directory {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No image files in target directory: {}", .path.display())]
    NoEligibleItems { path: PathBuf },
}

pub fn is_eligible_image(path: &Path) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|extension| IMAGE_EXTENSIONS.contains(&extension.as_str()))
}

/// Lists eligible images directly under `dir`, sorted by file name.
pub fn discover_items(dir: &Path) -> Result<Vec<Item>, DiscoveryError> {
    let entries = fs::read_dir(dir).map_err(|source| DiscoveryError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoveryError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || !is_eligible_image(&path) {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("skipping image with non UTF-8 name: {}", raw.to_string_lossy()),
        }
    }
    names.sort();

    let dimensions: Vec<Option<Dimensions>> = names
        .par_iter()
        .map(|name| read_dimensions(&dir.join(name)))
        .collect();

    let items: Vec<Item> = names
        .into_iter()
        .zip(dimensions)
        .enumerate()
        .map(|(order, (name, dimensions))| Item {
            name,
            order,
            dimensions,
        })
        .collect();

    debug!(count = items.len(), dir = %dir.display(), "discovered images");
    Ok(items)
}

/// Like [`discover_items`] but an empty result is an error.
pub fn discover_required_items(dir: &Path) -> Result<Vec<Item>, DiscoveryError> {
    let items = discover_items(dir)?;
    if items.is_empty() {
        return Err(DiscoveryError::NoEligibleItems {
            path: dir.to_path_buf(),
        });
    }
    Ok(items)
}

fn read_dimensions(path: &Path) -> Option<Dimensions> {
    match image::image_dimensions(path) {
        Ok((width, height)) => Some(Dimensions { width, height }),
        Err(error) => {
            warn!("could not read dimensions of {}: {error}", path.display());
            None
        }
    }
}
