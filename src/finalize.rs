//! Move committed lot images out of the dump into the final output directory.
//!
//! Only files that are canonical for the given template move; converted
//! images that were never committed under a canonical name, auction photos,
//! and anything else stay in the dump. An existing file in the final
//! directory is never replaced: that one file fails and the rest continue.

use crate::convert::move_file;
use crate::naming::NamingTemplate;
use crate::scan::{self, ScanError};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    Moved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: MoveOutcome,
}

impl MoveResult {
    pub fn is_moved(&self) -> bool {
        self.outcome == MoveOutcome::Moved
    }
}

/// Move every canonical `template` file from `dump` to `final_dir`, in
/// listing order.
pub fn finalize<S: AsRef<str>>(
    dump: &Path,
    final_dir: &Path,
    template: &NamingTemplate,
    extensions: &[S],
) -> Result<Vec<MoveResult>, ScanError> {
    scan::ensure_dir(final_dir)?;

    let results = scan::list(dump, extensions)?
        .into_iter()
        .filter(|f| template.is_canonical(&f.display_name))
        .map(|file| {
            let destination = final_dir.join(&file.display_name);
            let outcome = match move_file(&file.path, &destination) {
                Ok(()) => MoveOutcome::Moved,
                Err(e) => MoveOutcome::Failed(e.to_string()),
            };
            MoveResult {
                source: file.path,
                destination,
                outcome,
            }
        })
        .collect();

    Ok(results)
}
