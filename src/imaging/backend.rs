//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the workflow needs:
//! identify (read dimensions) and convert (decode → RGB → resize → encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use a recording
//! mock so conversion logic can be exercised without encoding pixels.

use super::params::ConvertParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Execute a conversion.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock backend that records operations instead of touching pixels.
    ///
    /// `convert` writes a small marker file to the output path so callers
    /// that move or list files afterwards see a real file on disk.
    #[derive(Default)]
    pub struct MockBackend {
        pub dimensions: Mutex<HashMap<PathBuf, Dimensions>>,
        pub failing: Mutex<Vec<PathBuf>>,
        pub failing_convert: Mutex<Vec<(PathBuf, PartialOutput)>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    /// What a failed convert leaves at the output path.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum PartialOutput {
        /// A truncated file.
        File,
        /// A non-empty directory, which `remove_file` cannot delete.
        Directory,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Convert {
            source: String,
            output: String,
            width: u32,
            height: u32,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Report `dims` for `path` on identify.
        pub fn with_image(self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
            self.dimensions
                .lock()
                .unwrap()
                .insert(path.into(), Dimensions { width, height });
            self
        }

        /// Make identify fail with a decode error for `path`.
        pub fn with_broken(self, path: impl Into<PathBuf>) -> Self {
            self.failing.lock().unwrap().push(path.into());
            self
        }

        /// Make convert of `source` fail with an encode error after leaving
        /// `partial` at the output path.
        pub fn with_failing_convert(
            self,
            source: impl Into<PathBuf>,
            partial: PartialOutput,
        ) -> Self {
            self.failing_convert
                .lock()
                .unwrap()
                .push((source.into(), partial));
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            if self.failing.lock().unwrap().iter().any(|p| p == path) {
                return Err(BackendError::Decode(format!(
                    "mock cannot decode {}",
                    path.display()
                )));
            }
            self.dimensions
                .lock()
                .unwrap()
                .get(path)
                .copied()
                .ok_or_else(|| BackendError::Decode("No mock dimensions".to_string()))
        }

        fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Convert {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            let partial = self
                .failing_convert
                .lock()
                .unwrap()
                .iter()
                .find(|(p, _)| *p == params.source)
                .map(|(_, partial)| *partial);
            if let Some(partial) = partial {
                match partial {
                    PartialOutput::File => std::fs::write(&params.output, "trunc")?,
                    PartialOutput::Directory => {
                        std::fs::create_dir_all(&params.output)?;
                        std::fs::write(params.output.join("chunk"), "trunc")?;
                    }
                }
                return Err(BackendError::Encode(format!(
                    "mock encoder failed on {}",
                    params.output.display()
                )));
            }
            std::fs::write(
                &params.output,
                format!("{}x{}", params.width, params.height),
            )?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::new().with_image("/test/image.jpg", 800, 600);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.as_tuple(), (800, 600));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_broken_image_is_decode_error() {
        let backend = MockBackend::new().with_broken("/test/bad.jpg");
        let result = backend.identify(Path::new("/test/bad.jpg"));
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn mock_records_convert() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("Lot001.jpg");
        let backend = MockBackend::new();

        backend
            .convert(&ConvertParams {
                source: "/source.png".into(),
                output: output.clone(),
                width: 800,
                height: 600,
                quality: super::super::params::Quality::new(85),
            })
            .unwrap();

        assert!(output.exists());
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Convert {
                width: 800,
                height: 600,
                quality: 85,
                ..
            }
        ));
    }
}
