//! Turn command-line paths into an [`ImageLibrary`].
//!
//! Directories are walked (one level unless recursive); anything that is not a
//! readable file with an image extension is skipped with a warning.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use croquis_core::{ImageEntry, ImageLibrary};
use tracing::{debug, warn};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "avif", "tif", "tiff",
];

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn entry_for(path: &Path) -> Option<ImageEntry> {
    let metadata = match path.metadata() {
        Ok(m) => m,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable file");
            return None;
        }
    };
    if metadata.len() == 0 {
        warn!(path = %path.display(), "skipping empty file");
        return None;
    }
    let modified_ms = metadata
        .modified()
        .map(|t| DateTime::<Utc>::from(t).timestamp_millis().max(0) as u64)
        .unwrap_or_default();

    Some(ImageEntry {
        id: path.to_string_lossy().to_string(),
        name: path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string(),
        size_bytes: metadata.len(),
        modified_ms,
    })
}

pub fn load_library(paths: &[PathBuf], recursive: bool) -> ImageLibrary {
    let mut library = ImageLibrary::new();
    let max_depth = if recursive { usize::MAX } else { 1 };

    for root in paths {
        if !root.exists() {
            warn!(path = %root.display(), "path does not exist");
            continue;
        }
        let entries = WalkDir::new(root)
            .max_depth(max_depth)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_image(e.path()))
            .filter_map(|e| entry_for(e.path()));
        let added = library.add(entries);
        debug!(path = %root.display(), added, "scanned");
    }
    library
}
