//! Ordered rename engine: commit a user-chosen order to disk as a gapless
//! `Prefix001.ext … PrefixNNN.ext` sequence.
//!
//! # Two-Phase Rename
//!
//! Source and target names overlap whenever an already-canonical set is
//! reordered. Renaming in a single pass would, for a swap, try to move
//! `Lot001.jpg` onto `Lot002.jpg` before the latter has moved, which either
//! fails or silently overwrites it. The engine therefore works in two
//! phases:
//!
//! ```text
//! phase 1 (stage)   Lot003.jpg → Lot001.jpg.tmp
//!                   Lot001.jpg → Lot002.jpg.tmp
//!                   Lot002.jpg → Lot003.jpg.tmp
//! phase 2 (claim)   Lot001.jpg.tmp → Lot001.jpg
//!                   Lot002.jpg.tmp → Lot002.jpg
//!                   Lot003.jpg.tmp → Lot003.jpg
//! ```
//!
//! Temp names derive from targets, which are unique, so temp names are unique
//! too. After phase 1 every staged source name has been vacated, so no claim
//! can collide with a file that is still waiting to move.
//!
//! # Failure Policy
//!
//! Failures are per pair and never abort the batch. There is no rollback:
//! pairs that succeeded stay applied. Neither phase ever overwrites a file:
//!
//! - a temp name that already exists (a leftover from an earlier failed run)
//!   fails the pair in phase 1 and the source stays where it was;
//! - a target that is still occupied in phase 2 (its own source failed to
//!   stage, or a file appeared that was not part of the listing) fails the
//!   pair and leaves the file at its temp name.
//!
//! A file left at a temp name is an *orphan*. Orphans are reported on the
//! failed [`RenameResult`] so the caller can surface them for manual cleanup;
//! listings never show them because `.tmp` is not an image extension.

use crate::naming::NamingTemplate;
use crate::scan::ImageFile;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix appended to a target file name while it is staged.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Precondition violations. Nothing on disk is touched when these occur.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenameError {
    #[error("Files span more than one directory: {} and {}", expected.display(), found.display())]
    MixedDirectories { expected: PathBuf, found: PathBuf },
    #[error("Path appears more than once in the order: {}", .0.display())]
    DuplicatePath(PathBuf),
}

/// Which half of the two-phase rename a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Source → temp name.
    Stage,
    /// Temp name → target.
    Claim,
}

/// Why a single pair failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RenameFailure {
    #[error("temporary name {} already exists", .0.display())]
    TempOccupied(PathBuf),
    #[error("could not move to temporary name: {0}")]
    Stage(String),
    #[error("{} is still occupied; file left at {}", target.display(), orphan.display())]
    TargetOccupied { target: PathBuf, orphan: PathBuf },
    #[error("could not claim final name: {message}; file left at {}", orphan.display())]
    Claim { orphan: PathBuf, message: String },
}

impl RenameFailure {
    pub fn phase(&self) -> Phase {
        match self {
            Self::TempOccupied(_) | Self::Stage(_) => Phase::Stage,
            Self::TargetOccupied { .. } | Self::Claim { .. } => Phase::Claim,
        }
    }

    /// The temp file this failure left behind, if any.
    pub fn orphan(&self) -> Option<&Path> {
        match self {
            Self::TargetOccupied { orphan, .. } | Self::Claim { orphan, .. } => Some(orphan),
            Self::TempOccupied(_) | Self::Stage(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Applied,
    Failed(RenameFailure),
}

/// Outcome of one planned rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameResult {
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: Outcome,
}

impl RenameResult {
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, Outcome::Applied)
    }

    pub fn failure(&self) -> Option<&RenameFailure> {
        match &self.outcome {
            Outcome::Applied => None,
            Outcome::Failed(f) => Some(f),
        }
    }
}

/// One `current → target` entry of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRename {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl PlannedRename {
    /// `target` with [`TEMP_SUFFIX`] appended to its file name.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.target.file_name().unwrap_or_default().to_os_string();
        name.push(TEMP_SUFFIX);
        self.target.with_file_name(name)
    }
}

/// Renames needed to turn an ordered listing into the template sequence.
///
/// Targets are unique and cover `1..=N` for the N input files. Files already
/// sitting at their target are not part of `entries`; they are counted in
/// `unchanged`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    pub entries: Vec<PlannedRename>,
    pub unchanged: usize,
}

impl RenamePlan {
    pub fn is_noop(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the plan for `files` in their given order. Pure apart from
/// validating the precondition; touches nothing on disk.
pub fn plan(files: &[ImageFile], template: &NamingTemplate) -> Result<RenamePlan, RenameError> {
    let Some(first) = files.first() else {
        return Ok(RenamePlan {
            entries: Vec::new(),
            unchanged: 0,
        });
    };
    let directory = first.directory();

    let mut seen = HashSet::new();
    for file in files {
        if file.directory() != directory {
            return Err(RenameError::MixedDirectories {
                expected: directory.to_path_buf(),
                found: file.directory().to_path_buf(),
            });
        }
        if !seen.insert(&file.path) {
            return Err(RenameError::DuplicatePath(file.path.clone()));
        }
    }

    let mut entries = Vec::new();
    let mut unchanged = 0;
    for (i, file) in files.iter().enumerate() {
        let target = directory.join(template.render(i + 1));
        if file.path == target {
            unchanged += 1;
        } else {
            entries.push(PlannedRename {
                source: file.path.clone(),
                target,
            });
        }
    }

    Ok(RenamePlan { entries, unchanged })
}

/// Commit `files`, in their given order, as the template sequence.
///
/// Returns one [`RenameResult`] per rename that was needed, in order
/// position. Committing an order that is already on disk returns an empty
/// list. The input is not modified; re-list the directory to see the result.
pub fn commit_order(
    files: &[ImageFile],
    template: &NamingTemplate,
) -> Result<Vec<RenameResult>, RenameError> {
    let plan = plan(files, template)?;
    Ok(execute(&plan))
}

/// Run both phases of a plan.
pub fn execute(plan: &RenamePlan) -> Vec<RenameResult> {
    let mut results: Vec<RenameResult> = plan
        .entries
        .iter()
        .map(|e| RenameResult {
            source: e.source.clone(),
            target: e.target.clone(),
            outcome: Outcome::Applied,
        })
        .collect();

    let mut staged = Vec::with_capacity(plan.entries.len());

    for (i, entry) in plan.entries.iter().enumerate() {
        let temp = entry.temp_path();
        if occupied(&temp) {
            results[i].outcome = Outcome::Failed(RenameFailure::TempOccupied(temp));
            continue;
        }
        match fs::rename(&entry.source, &temp) {
            Ok(()) => staged.push((i, temp)),
            Err(e) => {
                results[i].outcome = Outcome::Failed(RenameFailure::Stage(e.to_string()));
            }
        }
    }

    for (i, temp) in staged {
        let target = &plan.entries[i].target;
        if occupied(target) {
            results[i].outcome = Outcome::Failed(RenameFailure::TargetOccupied {
                target: target.clone(),
                orphan: temp,
            });
            continue;
        }
        if let Err(e) = fs::rename(&temp, target) {
            results[i].outcome = Outcome::Failed(RenameFailure::Claim {
                orphan: temp,
                message: e.to_string(),
            });
        }
    }

    results
}

/// Temp files left behind by failed claims.
pub fn orphans(results: &[RenameResult]) -> Vec<&Path> {
    results
        .iter()
        .filter_map(|r| r.failure().and_then(RenameFailure::orphan))
        .collect()
}

/// Anything at `path`, including a dangling symlink.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{DEFAULT_EXTENSIONS, list};
    use crate::test_helpers::{names, read, write_text};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn canonical_dir(n: usize) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let t = NamingTemplate::lot();
        for i in 1..=n {
            write_text(&tmp.path().join(t.render(i)), &format!("content-{i}"));
        }
        tmp
    }

    fn listing(dir: &Path) -> Vec<ImageFile> {
        list(dir, DEFAULT_EXTENSIONS).unwrap()
    }

    fn pick(files: &[ImageFile], order: &[usize]) -> Vec<ImageFile> {
        order.iter().map(|&i| files[i].clone()).collect()
    }

    fn contents(dir: &Path) -> Vec<String> {
        listing(dir).iter().map(|f| read(&f.path)).collect()
    }

    // =========================================================================
    // plan
    // =========================================================================

    #[test]
    fn plan_elides_files_already_in_place() {
        let tmp = canonical_dir(3);
        let files = listing(tmp.path());

        let p = plan(&files, &NamingTemplate::lot()).unwrap();
        assert!(p.is_noop());
        assert_eq!(p.unchanged, 3);
    }

    #[test]
    fn plan_targets_are_gapless() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.jpg", "a.png", "c.jpeg"] {
            write_text(&tmp.path().join(name), name);
        }
        let files = listing(tmp.path());

        let p = plan(&files, &NamingTemplate::lot()).unwrap();
        let targets: Vec<_> = p
            .entries
            .iter()
            .map(|e| e.target.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(targets, ["Lot001.jpg", "Lot002.jpg", "Lot003.jpg"]);
    }

    #[test]
    fn plan_of_empty_order_is_noop() {
        let p = plan(&[], &NamingTemplate::lot()).unwrap();
        assert!(p.is_noop());
        assert_eq!(p.unchanged, 0);
    }

    #[test]
    fn plan_rejects_mixed_directories() {
        let files = vec![
            ImageFile::from_path("/a/Lot001.jpg"),
            ImageFile::from_path("/b/Lot002.jpg"),
        ];
        assert!(matches!(
            plan(&files, &NamingTemplate::lot()),
            Err(RenameError::MixedDirectories { .. })
        ));
    }

    #[test]
    fn plan_rejects_duplicates() {
        let f = ImageFile::from_path("/a/x.jpg");
        assert_eq!(
            plan(&[f.clone(), f], &NamingTemplate::lot()),
            Err(RenameError::DuplicatePath(PathBuf::from("/a/x.jpg")))
        );
    }

    #[test]
    fn temp_path_appends_suffix() {
        let entry = PlannedRename {
            source: "/d/x.jpg".into(),
            target: "/d/Lot001.jpg".into(),
        };
        assert_eq!(entry.temp_path(), PathBuf::from("/d/Lot001.jpg.tmp"));
    }

    // =========================================================================
    // commit_order
    // =========================================================================

    #[test]
    fn rotation_moves_content_and_keeps_names() {
        let tmp = canonical_dir(3);
        let files = listing(tmp.path());
        let order = pick(&files, &[2, 0, 1]);

        let results = commit_order(&order, &NamingTemplate::lot()).unwrap();

        let summary: Vec<_> = results
            .iter()
            .map(|r| {
                (
                    r.source.file_name().unwrap().to_string_lossy().into_owned(),
                    r.target.file_name().unwrap().to_string_lossy().into_owned(),
                    r.is_applied(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            [
                ("Lot003.jpg".to_string(), "Lot001.jpg".to_string(), true),
                ("Lot001.jpg".to_string(), "Lot002.jpg".to_string(), true),
                ("Lot002.jpg".to_string(), "Lot003.jpg".to_string(), true),
            ]
        );
        assert_eq!(
            names(&listing(tmp.path())),
            ["Lot001.jpg", "Lot002.jpg", "Lot003.jpg"]
        );
        assert_eq!(
            contents(tmp.path()),
            ["content-3", "content-1", "content-2"]
        );
    }

    #[test]
    fn pairwise_swap() {
        let tmp = canonical_dir(2);
        let files = listing(tmp.path());

        let results = commit_order(&pick(&files, &[1, 0]), &NamingTemplate::lot()).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(RenameResult::is_applied));
        assert_eq!(contents(tmp.path()), ["content-2", "content-1"]);
    }

    #[test]
    fn committing_twice_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        for name in ["zeta.jpg", "alpha.png"] {
            write_text(&tmp.path().join(name), name);
        }
        let t = NamingTemplate::lot();

        let first = commit_order(&listing(tmp.path()), &t).unwrap();
        assert_eq!(first.len(), 2);

        let second = commit_order(&listing(tmp.path()), &t).unwrap();
        assert!(second.is_empty());
        assert_eq!(contents(tmp.path()), ["alpha.png", "zeta.jpg"]);
    }

    #[test]
    fn only_moved_files_are_reported() {
        let tmp = canonical_dir(4);
        let files = listing(tmp.path());

        // Swap the middle two; first and last stay put.
        let results = commit_order(&pick(&files, &[0, 2, 1, 3]), &NamingTemplate::lot()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(
            contents(tmp.path()),
            ["content-1", "content-3", "content-2", "content-4"]
        );
    }

    #[test]
    fn mixes_canonical_and_raw_names() {
        let tmp = TempDir::new().unwrap();
        write_text(&tmp.path().join("Lot001.jpg"), "old-first");
        write_text(&tmp.path().join("new.jpg"), "new");
        let files = listing(tmp.path()); // [Lot001.jpg, new.jpg]

        let results = commit_order(&pick(&files, &[1, 0]), &NamingTemplate::lot()).unwrap();

        assert!(results.iter().all(RenameResult::is_applied));
        assert_eq!(names(&listing(tmp.path())), ["Lot001.jpg", "Lot002.jpg"]);
        assert_eq!(contents(tmp.path()), ["new", "old-first"]);
    }

    #[test]
    fn input_order_is_not_mutated() {
        let tmp = canonical_dir(2);
        let order = pick(&listing(tmp.path()), &[1, 0]);
        let before = order.clone();

        commit_order(&order, &NamingTemplate::lot()).unwrap();
        assert_eq!(order, before);
    }

    #[test]
    fn precondition_failure_touches_nothing() {
        let a = canonical_dir(1);
        let b = canonical_dir(1);
        let mut order = listing(b.path());
        order.extend(listing(a.path()));

        let result = commit_order(&order, &NamingTemplate::lot());
        assert!(matches!(result, Err(RenameError::MixedDirectories { .. })));
        assert_eq!(names(&listing(a.path())), ["Lot001.jpg"]);
        assert_eq!(names(&listing(b.path())), ["Lot001.jpg"]);
    }

    // =========================================================================
    // Partial failure containment
    // =========================================================================

    #[test]
    fn stale_temp_fails_only_its_pair() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            write_text(&tmp.path().join(name), name);
        }
        write_text(&tmp.path().join("Lot002.jpg.tmp"), "leftover");

        let results = commit_order(&listing(tmp.path()), &NamingTemplate::lot()).unwrap();

        assert!(results[0].is_applied());
        assert!(results[2].is_applied());
        assert_eq!(results[1].source, tmp.path().join("b.jpg"));
        assert_eq!(results[1].target, tmp.path().join("Lot002.jpg"));
        assert_eq!(
            results[1].failure(),
            Some(&RenameFailure::TempOccupied(
                tmp.path().join("Lot002.jpg.tmp")
            ))
        );
        assert_eq!(results[1].failure().unwrap().phase(), Phase::Stage);

        // Nothing lost, nothing clobbered.
        assert_eq!(read(&tmp.path().join("Lot001.jpg")), "a.jpg");
        assert_eq!(read(&tmp.path().join("b.jpg")), "b.jpg");
        assert_eq!(read(&tmp.path().join("Lot003.jpg")), "c.jpg");
        assert_eq!(read(&tmp.path().join("Lot002.jpg.tmp")), "leftover");
        assert!(orphans(&results).is_empty());
    }

    #[test]
    fn blocked_source_leaves_orphan_instead_of_clobbering() {
        let tmp = canonical_dir(3);
        let order = pick(&listing(tmp.path()), &[2, 0, 1]);
        // Lot001 → Lot002.jpg.tmp cannot stage, so Lot001.jpg stays occupied
        // and the file destined for it must not overwrite it.
        std::fs::create_dir(tmp.path().join("Lot002.jpg.tmp")).unwrap();

        let results = commit_order(&order, &NamingTemplate::lot()).unwrap();

        assert_eq!(
            results[0].failure(),
            Some(&RenameFailure::TargetOccupied {
                target: tmp.path().join("Lot001.jpg"),
                orphan: tmp.path().join("Lot001.jpg.tmp"),
            })
        );
        assert!(matches!(
            results[1].failure(),
            Some(RenameFailure::TempOccupied(_))
        ));
        assert!(results[2].is_applied());

        assert_eq!(read(&tmp.path().join("Lot001.jpg")), "content-1");
        assert_eq!(read(&tmp.path().join("Lot001.jpg.tmp")), "content-3");
        assert_eq!(read(&tmp.path().join("Lot003.jpg")), "content-2");
        assert_eq!(
            orphans(&results),
            [tmp.path().join("Lot001.jpg.tmp").as_path()]
        );
    }

    #[test]
    fn file_appearing_after_listing_is_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        write_text(&tmp.path().join("a.jpg"), "mine");
        let order = listing(tmp.path());
        write_text(&tmp.path().join("Lot001.jpg"), "foreign");

        let results = commit_order(&order, &NamingTemplate::lot()).unwrap();

        let failure = results[0].failure().unwrap();
        assert_eq!(failure.phase(), Phase::Claim);
        assert_eq!(failure.orphan(), Some(tmp.path().join("Lot001.jpg.tmp").as_path()));
        assert_eq!(read(&tmp.path().join("Lot001.jpg")), "foreign");
        assert_eq!(read(&tmp.path().join("Lot001.jpg.tmp")), "mine");
    }

    #[test]
    fn vanished_source_fails_in_stage_phase() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.jpg", "b.jpg"] {
            write_text(&tmp.path().join(name), name);
        }
        let order = listing(tmp.path());
        std::fs::remove_file(tmp.path().join("a.jpg")).unwrap();

        let results = commit_order(&order, &NamingTemplate::lot()).unwrap();

        assert!(matches!(
            results[0].failure(),
            Some(RenameFailure::Stage(_))
        ));
        assert!(results[1].is_applied());
        assert_eq!(read(&tmp.path().join("Lot002.jpg")), "b.jpg");
    }

    // =========================================================================
    // Permutation safety
    // =========================================================================

    fn permutation() -> impl Strategy<Value = Vec<usize>> {
        (1usize..9).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn any_permutation_keeps_every_file(perm in permutation()) {
            let n = perm.len();
            let tmp = canonical_dir(n);
            let files = listing(tmp.path());
            let t = NamingTemplate::lot();

            let results = commit_order(&pick(&files, &perm), &t).unwrap();
            prop_assert!(results.iter().all(RenameResult::is_applied));

            let after = listing(tmp.path());
            let expected_names: Vec<String> = (1..=n).map(|i| t.render(i)).collect();
            prop_assert_eq!(names(&after), expected_names);

            let expected_contents: Vec<String> =
                perm.iter().map(|i| format!("content-{}", i + 1)).collect();
            prop_assert_eq!(contents(tmp.path()), expected_contents);

            let leftovers = std::fs::read_dir(tmp.path()).unwrap().count();
            prop_assert_eq!(leftovers, n);
        }
    }
}
