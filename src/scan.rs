//! File set listing: the read-only view of a directory the rest of the
//! workflow operates on.
//!
//! A listing is the immediate regular files of one directory whose name ends
//! with an accepted extension, sorted by file name. Ordering is plain
//! lexicographic, not numeric-aware:
//!
//! ```text
//! Lot001.jpg
//! Lot002.jpg
//! Lot10.jpg      ← sorts before Lot2.jpg
//! Lot2.jpg
//! ```
//!
//! Callers that need numeric order rely on zero-padded canonical names, which
//! is exactly what the rename engine produces.
//!
//! Listings are snapshots. Nothing here holds on to the directory, so a
//! listing can go stale the moment another program touches the folder; the
//! rename engine checks occupancy again at commit time.

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions the dump accepts when nothing else is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory unavailable: {}: {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    fn unavailable(path: &Path, source: io::Error) -> Self {
        Self::DirectoryUnavailable {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One image file as seen by the last listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageFile {
    pub path: PathBuf,
    /// File name only, e.g. `Lot001.jpg`.
    pub display_name: String,
    /// Lowercased extension without the dot, e.g. `jpg`.
    pub extension: String,
}

impl ImageFile {
    /// Build from a path, deriving the display name and lowercased extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self {
            path,
            display_name,
            extension,
        }
    }

    /// Directory containing this file.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }
}

/// Normalize configured extensions: lowercase, no leading dot, no blanks.
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Whether `name` ends with `.ext` for one of the (normalized) extensions,
/// ignoring case.
pub fn has_accepted_extension(name: &str, extensions: &[String]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| {
        lower
            .strip_suffix(ext.as_str())
            .is_some_and(|stem| stem.ends_with('.') && stem.len() > 1)
    })
}

/// List the image files directly inside `directory`, sorted by file name.
pub fn list<S: AsRef<str>>(directory: &Path, extensions: &[S]) -> Result<Vec<ImageFile>, ScanError> {
    let extensions = normalize_extensions(extensions);
    let mut files = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ScanError::unavailable(directory, e.into()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if has_accepted_extension(&name, &extensions) {
            files.push(ImageFile::from_path(path));
        }
    }

    Ok(files)
}

/// Whether `directory` holds at least one accepted image.
pub fn has_images<S: AsRef<str>>(directory: &Path, extensions: &[S]) -> Result<bool, ScanError> {
    Ok(!list(directory, extensions)?.is_empty())
}

/// Create `directory` (and parents) if missing. Idempotent.
pub fn ensure_dir(directory: &Path) -> Result<(), ScanError> {
    std::fs::create_dir_all(directory).map_err(|e| ScanError::unavailable(directory, e))
}
