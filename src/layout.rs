//! Fixed directory layout under the base directory.
//!
//! ```text
//! <base>/
//! ├── ADump/                                # new images land here
//! │   ├── Original Lot Sticker Images/      # archived originals
//! │   ├── Final Lot Sticker Images/         # finalized Lot###.jpg
//! │   └── Temp Processing/                  # purged stale canonical files
//! └── zBin/                                 # optional logo.png, logo2.png
//! ```
//!
//! Every directory is configurable through `[layout]`; the tree above is the
//! default. Subdirectories of the dump are never listed as images because
//! listings only look at regular files.

use crate::config::LayoutConfig;
use crate::imaging::ImageBackend;
use crate::scan::{ScanError, ensure_dir};
use std::path::{Path, PathBuf};

/// Small header logo.
pub const LOGO_ASSET: &str = "logo.png";
/// Background image.
pub const BACKGROUND_ASSET: &str = "logo2.png";

/// Resolved absolute-or-base-relative paths of every workflow directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub base: PathBuf,
    pub dump: PathBuf,
    pub archive: PathBuf,
    pub final_output: PathBuf,
    pub temp: PathBuf,
    pub assets: PathBuf,
}

impl Layout {
    /// Resolve `config` against `base`.
    pub fn new(base: impl Into<PathBuf>, config: &LayoutConfig) -> Self {
        let base = base.into();
        Self {
            dump: base.join(&config.dump),
            archive: base.join(&config.archive),
            final_output: base.join(&config.final_output),
            temp: base.join(&config.temp),
            assets: base.join(&config.assets),
            base,
        }
    }

    /// Create every directory of the layout. Idempotent.
    pub fn ensure(&self) -> Result<(), ScanError> {
        for dir in self.directories() {
            ensure_dir(dir)?;
        }
        Ok(())
    }

    /// All directories in creation order.
    pub fn directories(&self) -> [&Path; 6] {
        [
            &self.base,
            &self.dump,
            &self.archive,
            &self.final_output,
            &self.temp,
            &self.assets,
        ]
    }

    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.assets.join(name)
    }

    /// Whether the decorative asset `name` exists and decodes.
    ///
    /// Missing or unreadable assets only mean the decoration is skipped, so
    /// this never fails.
    pub fn probe_asset(&self, backend: &impl ImageBackend, name: &str) -> bool {
        let path = self.asset_path(name);
        path.is_file() && backend.identify(&path).is_ok()
    }
}
