//! # Lot Builder
//!
//! Organizes batches of auction-lot images through a fixed workflow. The
//! filesystem is the data source: images are dropped into a dump directory,
//! converted to fixed-size JPEGs, put in order by the user, and committed to
//! disk as `Lot001.jpg … LotNNN.jpg` and later `Auction001.jpg …`.
//!
//! # Architecture: List → Reorder → Commit
//!
//! ```text
//! 1. List      ADump/          →  Vec<ImageFile>   (sorted by file name)
//! 2. Reorder   OrderedSet      →  OrderedSet       (pure, in memory)
//! 3. Commit    OrderedSet      →  Lot###.jpg       (two-phase rename)
//! 4. Re-list   ADump/          →  Vec<ImageFile>
//! ```
//!
//! Listings are snapshots and never cached: the folder can change under the
//! tool at any time, so every commit is followed by a fresh listing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Lists the image files of one directory, sorted by name |
//! | [`order`] | In-memory ordered set and the `move_element` list move |
//! | [`rename`] | Commits an order as a gapless canonical sequence via a two-phase rename |
//! | [`naming`] | `Prefix` + zero-padded index + `.ext` templates |
//! | [`convert`] | Purge stale canonical files, convert by orientation, archive originals |
//! | [`finalize`] | Moves committed lot images into the final output directory |
//! | [`imaging`] | Image backend trait and the pure-Rust `image` implementation |
//! | [`layout`] | The fixed directory tree under the base directory |
//! | [`wizard`] | Step controller holding the workflow state |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`output`] | Status line formatting and the persistent status log |
//!
//! # Design Decisions
//!
//! ## Two-Phase Rename
//!
//! Reordering an already-canonical set always produces overlapping source
//! and target names. Every file is first moved to `<target>.tmp`, then every
//! temp file to its target. Temp names derive from unique targets, so neither
//! phase can collide with a file that is still waiting to move. Neither phase
//! overwrites anything; a pair that cannot complete is reported together with
//! the temp file it left behind.
//!
//! ## Fixed Output Sizes
//!
//! Converted images are resized to exactly 800×600 (width ≥ height) or
//! 600×800 (portrait), without preserving the aspect ratio. The auction site
//! these images are uploaded to expects one of the two sizes.
//!
//! ## Nothing Is Deleted
//!
//! Originals go to the archive directory, stale canonical files to the
//! temp-processing directory, finalized lots to the final output directory.
//! Name clashes get a ` (k)` suffix or fail the single file; the tool never
//! removes a user image.

pub mod config;
pub mod convert;
pub mod finalize;
pub mod imaging;
pub mod layout;
pub mod naming;
pub mod order;
pub mod output;
pub mod rename;
pub mod scan;
pub mod wizard;

#[cfg(test)]
pub(crate) mod test_helpers;
