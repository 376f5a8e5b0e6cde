//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::target_size;
use super::params::{ConvertParams, Quality};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Fixed output sizes and encoding quality for canonical images.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    /// Output size for landscape (and square) sources.
    pub landscape: (u32, u32),
    /// Output size for portrait sources.
    pub portrait: (u32, u32),
    pub quality: Quality,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            landscape: (800, 600),
            portrait: (600, 800),
            quality: Quality::default(),
        }
    }
}

/// Plan a conversion without executing it.
pub fn plan_conversion(
    source: &Path,
    output: &Path,
    source_dims: (u32, u32),
    config: &ConvertConfig,
) -> ConvertParams {
    let (width, height) = target_size(source_dims, config.landscape, config.portrait);
    ConvertParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Identify, size, and convert one image. Returns the output dimensions.
pub fn convert_to_canonical(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &ConvertConfig,
) -> Result<(u32, u32)> {
    let dims = get_dimensions(backend, source)?;
    let params = plan_conversion(source, output, dims, config);
    backend.convert(&params)?;
    Ok((params.width, params.height))
}
