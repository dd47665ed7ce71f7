//! Error types for the pdf2img library.
//!
//! Every failure of a `convert` call is reported as one [`Pdf2ImgError`].
//! None is retried and none is fatal to the process; the [`Converter`]
//! that produced it stays usable for the next call.
//!
//! Pages rendered before a failure stay on disk but are not reported.
//! Callers that need a clean output directory must inspect it themselves.
//!
//! [`Converter`]: crate::convert::Converter

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2img library.
#[derive(Debug, Error)]
pub enum Pdf2ImgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input path was empty.
    #[error("Invalid input: no input file given")]
    InvalidInput,

    /// The input does not carry the `.pdf` extension.
    #[error("Unsupported file type: '{path}' (expected a .pdf file)")]
    UnsupportedType { path: PathBuf },

    /// The input is missing, unreadable, or not a regular file.
    #[error("Input file not found: '{path}'\nCheck the path exists and is a regular file.")]
    NotFound { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The engine could not enumerate the document's pages.
    #[error("Could not determine page count of '{path}': {detail}")]
    PageDiscoveryError { path: PathBuf, detail: String },

    /// The selected page is outside the document.
    #[error("Invalid page number: {page} (document has {total} pages)")]
    InvalidPageNumber { page: usize, total: usize },

    /// The engine failed to write the page image.
    #[error("Can not write output file for page {page}: {detail}")]
    RenderError { page: usize, detail: String },

    /// The engine reported success but wrote zero bytes.
    #[error("Zero sized output image detected for page {page}: '{path}'")]
    EmptyOutput { page: usize, path: PathBuf },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error outside the pipeline (e.g. runtime setup).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2ImgError {
    /// The payload-free kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2ImgError::InvalidInput => ErrorKind::InvalidInput,
            Pdf2ImgError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Pdf2ImgError::NotFound { .. } => ErrorKind::NotFound,
            Pdf2ImgError::DirectoryError { .. } => ErrorKind::DirectoryError,
            Pdf2ImgError::PageDiscoveryError { .. } => ErrorKind::PageDiscoveryError,
            Pdf2ImgError::InvalidPageNumber { .. } => ErrorKind::InvalidPageNumber,
            Pdf2ImgError::RenderError { .. } => ErrorKind::RenderError,
            Pdf2ImgError::EmptyOutput { .. } => ErrorKind::EmptyOutput,
            Pdf2ImgError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Discriminant of [`Pdf2ImgError`], for matching and serialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    UnsupportedType,
    NotFound,
    DirectoryError,
    PageDiscoveryError,
    InvalidPageNumber,
    RenderError,
    EmptyOutput,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_page_display() {
        let e = Pdf2ImgError::InvalidPageNumber { page: 3, total: 3 };
        let msg = e.to_string();
        assert!(msg.contains("Invalid page number: 3"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::InvalidPageNumber);
    }

    #[test]
    fn discovery_display_carries_engine_detail() {
        let e = Pdf2ImgError::PageDiscoveryError {
            path: "fake.pdf".into(),
            detail: "gm identify: Request did not return an image.".into(),
        };
        assert!(e.to_string().contains("Request did not return an image"));
        assert!(e.to_string().contains("fake.pdf"));
    }

    #[test]
    fn directory_error_keeps_source() {
        use std::error::Error as _;

        let e = Pdf2ImgError::DirectoryError {
            path: "out".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.kind(), ErrorKind::DirectoryError);
        assert!(e.source().is_some());
    }

    #[test]
    fn kind_serialises_as_name() {
        let json = serde_json::to_string(&ErrorKind::EmptyOutput).unwrap();
        assert_eq!(json, "\"EmptyOutput\"");
        assert_eq!(ErrorKind::NotFound.to_string(), "NotFound");
    }
}
