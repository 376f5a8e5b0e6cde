//! Convert-and-Archive: turn raw lot-sticker images in the dump into
//! canonical fixed-size JPEGs and archive the originals.
//!
//! ## Steps
//!
//! 1. **Purge**: canonical files already in the dump (`Lot001.jpg`, …) are
//!    leftovers of an earlier run. They are moved into the temp-processing
//!    directory so the new sequence starts at 1 without overwriting anything.
//!    Auction photos (`Auction001.jpg`, …) are neither purged nor converted.
//! 2. **Convert**: every remaining image, in listing order, is identified,
//!    sized by orientation, converted to RGB, resized exactly, and encoded as
//!    the next canonical name. The counter only advances on success, so the
//!    produced names are gapless even when some sources fail to decode.
//! 3. **Archive**: the original is moved into the archive directory. A name
//!    already taken there gets a ` (k)` suffix.
//!
//! ```text
//! ADump/photo_a.png (2000×1000) → ADump/Lot001.jpg (800×600)
//!                                 ADump/Original Lot Sticker Images/photo_a.png
//! ADump/photo_b.png (1000×2000) → ADump/Lot002.jpg (600×800)
//!                                 ADump/Original Lot Sticker Images/photo_b.png
//! ```
//!
//! Per-file failures are reported and never stop the batch. Only problems
//! with the directories themselves abort the call.

use crate::config::LotConfig;
use crate::imaging::{ConvertConfig, ImageBackend, convert_to_canonical};
use crate::layout::Layout;
use crate::naming::NamingTemplate;
use crate::scan::{self, ScanError};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Directory(#[from] ScanError),
    #[error("Could not purge {}: {source}", path.display())]
    Purge {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What to produce and what to accept.
#[derive(Debug, Clone)]
pub struct ConvertSettings {
    /// Canonical names of the produced files.
    pub template: NamingTemplate,
    /// Canonical names of auction photos. Never converted or purged.
    pub auction: NamingTemplate,
    /// Extensions of source images.
    pub extensions: Vec<String>,
    pub sizes: ConvertConfig,
}

impl ConvertSettings {
    pub fn from_config(config: &LotConfig) -> Self {
        Self {
            template: config.lot_template(),
            auction: config.auction_template(),
            extensions: config.extensions(),
            sizes: config.convert_config(),
        }
    }

    /// Whether `name` is canonical under either template.
    pub fn is_canonical(&self, name: &str) -> bool {
        self.template.is_canonical(name) || self.auction.is_canonical(name)
    }
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self::from_config(&LotConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConvertOutcome {
    /// Converted and the original moved to `archived`.
    Converted { archived: PathBuf },
    /// Converted, but the original could not be archived and is still in
    /// the dump.
    ConvertedNotArchived(String),
    /// Nothing was produced for this source.
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertResult {
    pub source: PathBuf,
    /// Canonical file produced, if any.
    pub output: Option<PathBuf>,
    /// Output dimensions, if produced.
    pub size: Option<(u32, u32)>,
    pub outcome: ConvertOutcome,
}

impl ConvertResult {
    pub fn is_converted(&self) -> bool {
        self.output.is_some()
    }
}

/// A stale canonical file moved out of the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Purged {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    pub purged: Vec<Purged>,
    pub results: Vec<ConvertResult>,
}

impl ConvertReport {
    pub fn converted(&self) -> usize {
        self.results.iter().filter(|r| r.is_converted()).count()
    }

    /// Canonical files were moved aside but nothing replaced them.
    pub fn purge_only(&self) -> bool {
        self.results.is_empty() && !self.purged.is_empty()
    }
}

/// Purge, convert, and archive everything in the dump.
pub fn convert_and_archive(
    layout: &Layout,
    settings: &ConvertSettings,
    backend: &impl ImageBackend,
) -> Result<ConvertReport, ConvertError> {
    scan::ensure_dir(&layout.archive)?;
    scan::ensure_dir(&layout.temp)?;

    let purged = purge_canonical(&layout.dump, &layout.temp, settings)?;

    let sources: Vec<_> = scan::list(&layout.dump, &settings.extensions)?
        .into_iter()
        .filter(|f| !settings.is_canonical(&f.display_name))
        .collect();

    let mut results = Vec::with_capacity(sources.len());
    let mut next = 1;

    for source in sources {
        let output = layout.dump.join(settings.template.render(next));
        let result = convert_one(&source.path, &output, &layout.archive, settings, backend);
        if result.is_converted() {
            next += 1;
        }
        results.push(result);
    }

    Ok(ConvertReport { purged, results })
}

fn convert_one(
    source: &Path,
    output: &Path,
    archive: &Path,
    settings: &ConvertSettings,
    backend: &impl ImageBackend,
) -> ConvertResult {
    let skipped = |reason: String| ConvertResult {
        source: source.to_path_buf(),
        output: None,
        size: None,
        outcome: ConvertOutcome::Skipped(reason),
    };

    if occupied(output) {
        return skipped(format!("{} already exists", output.display()));
    }

    let size = match convert_to_canonical(backend, source, output, &settings.sizes) {
        Ok(size) => size,
        Err(e) => {
            // Encoders may leave a partial file behind
            if occupied(output) {
                if let Err(cleanup) = fs::remove_file(output) {
                    return skipped(format!(
                        "{e}; partial output {} could not be removed: {cleanup}",
                        output.display()
                    ));
                }
            }
            return skipped(e.to_string());
        }
    };

    let outcome = match archive_original(source, archive) {
        Ok(archived) => ConvertOutcome::Converted { archived },
        Err(e) => ConvertOutcome::ConvertedNotArchived(e.to_string()),
    };

    ConvertResult {
        source: source.to_path_buf(),
        output: Some(output.to_path_buf()),
        size: Some(size),
        outcome,
    }
}

/// Move canonical files out of the dump into `temp`.
fn purge_canonical(
    dump: &Path,
    temp: &Path,
    settings: &ConvertSettings,
) -> Result<Vec<Purged>, ConvertError> {
    let mut purged = Vec::new();
    for file in scan::list(dump, &settings.extensions)? {
        if !settings.template.is_canonical(&file.display_name) {
            continue;
        }
        let destination = unique_destination(temp, &file.display_name);
        move_file(&file.path, &destination).map_err(|source| ConvertError::Purge {
            path: file.path.clone(),
            source,
        })?;
        purged.push(Purged {
            source: file.path,
            destination,
        });
    }
    Ok(purged)
}

fn archive_original(source: &Path, archive: &Path) -> io::Result<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"))?;
    let destination = unique_destination(archive, &name.to_string_lossy());
    move_file(source, &destination)?;
    Ok(destination)
}

/// `dir/name`, or `dir/stem (k).ext` with the smallest free `k`.
pub fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !occupied(&candidate) {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1..)
        .map(|k| match ext {
            Some(ext) => dir.join(format!("{stem} ({k}).{ext}")),
            None => dir.join(format!("{stem} ({k})")),
        })
        .find(|p| !occupied(p))
        .unwrap_or(candidate)
}

/// Move a file, falling back to copy + remove across filesystems.
///
/// Refuses to replace an existing destination.
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    if occupied(destination) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", destination.display()),
        ));
    }
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}

fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
