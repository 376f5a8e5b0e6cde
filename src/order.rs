//! In-memory ordering of a listing.
//!
//! The thumbnail strip lets the user drag an image to a new slot. That
//! gesture is modelled here as a pure list operation, [`move_element`]; no
//! disk I/O happens until the order is committed through
//! [`rename::commit_order`](crate::rename::commit_order).

use crate::scan::ImageFile;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderError {
    #[error("Index {index} out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
    #[error("Duplicate path in order: {0}")]
    DuplicatePath(String),
}

/// Move the element at `from` so that it ends up at index `to`.
///
/// Equivalent to `remove(from)` followed by `insert(to, ..)`. Both indices
/// refer to positions in the list as it was before the move, and both must
/// be in range; the list is left untouched on error.
///
/// ```
/// # use lot_builder::order::move_element;
/// let mut v = vec!['a', 'b', 'c', 'd'];
/// move_element(&mut v, 3, 0).unwrap();
/// assert_eq!(v, ['d', 'a', 'b', 'c']);
/// ```
pub fn move_element<T>(list: &mut Vec<T>, from: usize, to: usize) -> Result<(), OrderError> {
    let len = list.len();
    for index in [from, to] {
        if index >= len {
            return Err(OrderError::OutOfRange { index, len });
        }
    }
    if from != to {
        let item = list.remove(from);
        list.insert(to, item);
    }
    Ok(())
}

/// An ordered sequence of image files with no duplicate paths.
///
/// Insertion order is the display and processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    files: Vec<ImageFile>,
}

impl OrderedSet {
    /// Wrap a listing, rejecting duplicate paths.
    pub fn new(files: Vec<ImageFile>) -> Result<Self, OrderError> {
        let mut seen = HashSet::new();
        for file in &files {
            if !seen.insert(&file.path) {
                return Err(OrderError::DuplicatePath(
                    file.path.to_string_lossy().into_owned(),
                ));
            }
        }
        Ok(Self { files })
    }

    /// Reorder by moving one file. See [`move_element`].
    pub fn move_element(&mut self, from: usize, to: usize) -> Result<(), OrderError> {
        move_element(&mut self.files, from, to)
    }

    /// Rebuild the order from display names, e.g. as typed on a command line.
    ///
    /// Every name must match exactly one file of the set, and every file must
    /// be named, so the result is a permutation of the current set.
    pub fn reorder_by_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ReorderError> {
        if names.len() != self.files.len() {
            return Err(ReorderError::CountMismatch {
                expected: self.files.len(),
                given: names.len(),
            });
        }
        let mut remaining = self.files.clone();
        let mut ordered = Vec::with_capacity(remaining.len());
        for name in names {
            let name = name.as_ref();
            let pos = remaining
                .iter()
                .position(|f| f.display_name == name)
                .ok_or_else(|| ReorderError::UnknownName(name.to_string()))?;
            ordered.push(remaining.remove(pos));
        }
        self.files = ordered;
        Ok(())
    }

    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.display_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReorderError {
    #[error("Expected {expected} names, got {given}")]
    CountMismatch { expected: usize, given: usize },
    #[error("Unknown or repeated file name: {0}")]
    UnknownName(String),
}
