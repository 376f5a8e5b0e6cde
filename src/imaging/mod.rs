//! Image conversion in pure Rust via the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF, WebP, BMP) |
//! | **Color** | `DynamicImage::to_rgb8` (alpha and palettes dropped) |
//! | **Resize** | `resize_exact` with Lanczos3 |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: orientation and target-size selection (unit testable)
//! - **Parameters**: data structures describing a conversion
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: high-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{Orientation, target_size};
pub use operations::{ConvertConfig, convert_to_canonical, get_dimensions, plan_conversion};
pub use params::{ConvertParams, Quality};
pub use rust_backend::RustBackend;
