//! Input validation: reject anything that is not an existing `.pdf` file
//! before the engine is ever started.
//!
//! The checks run in a fixed order and stop at the first failure:
//! empty path, extension, then a filesystem status check.

use crate::error::Pdf2ImgError;
use std::ffi::OsStr;
use std::path::Path;
use tracing::debug;

/// The only document extension accepted. Compared case-sensitively.
pub const PDF_EXTENSION: &str = "pdf";

/// Validate the input path. Has no side effects.
pub async fn validate_input(input: &Path) -> Result<(), Pdf2ImgError> {
    if input.as_os_str().is_empty() {
        return Err(Pdf2ImgError::InvalidInput);
    }

    if input.extension() != Some(OsStr::new(PDF_EXTENSION)) {
        return Err(Pdf2ImgError::UnsupportedType {
            path: input.to_path_buf(),
        });
    }

    match tokio::fs::metadata(input).await {
        Ok(meta) if meta.is_file() => {
            debug!("Validated input: {} ({} bytes)", input.display(), meta.len());
            Ok(())
        }
        _ => Err(Pdf2ImgError::NotFound {
            path: input.to_path_buf(),
        }),
    }
}
