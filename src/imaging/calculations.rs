//! Pure calculation functions for output dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Orientation of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Width at least as large as height (square counts as landscape).
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(dims: (u32, u32)) -> Self {
        let (w, h) = dims;
        if w >= h {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Pick the fixed output size for a source image.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `landscape` - Output size for landscape and square sources
/// * `portrait` - Output size for portrait sources
///
/// # Examples
/// ```
/// # use lot_builder::imaging::target_size;
/// assert_eq!(target_size((2000, 1000), (800, 600), (600, 800)), (800, 600));
/// assert_eq!(target_size((1000, 2000), (800, 600), (600, 800)), (600, 800));
/// ```
pub fn target_size(source: (u32, u32), landscape: (u32, u32), portrait: (u32, u32)) -> (u32, u32) {
    match Orientation::of(source) {
        Orientation::Landscape => landscape,
        Orientation::Portrait => portrait,
    }
}
