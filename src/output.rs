//! Result types returned by a conversion.

use crate::error::{ErrorKind, Pdf2ImgError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One successfully rendered page.
///
/// Only produced after the output file was found on disk with a non-zero
/// size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number that was requested for this render.
    pub page: usize,
    /// Output file name, e.g. `test_1.jpg`.
    pub name: String,
    /// Output size in decimal kilobytes (bytes / 1000).
    #[serde(rename = "size")]
    pub size_kb: f64,
    /// Absolute path of the output file.
    pub path: PathBuf,
    /// Pixel width, when the image header could be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height, when the image header could be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Timing and counts for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages enumerated by the engine.
    pub total_pages: usize,
    /// Pages written to disk and reported.
    pub rendered_pages: usize,
    pub total_duration_ms: u64,
    pub render_duration_ms: u64,
}

/// The successful result of [`Converter::convert`](crate::convert::Converter::convert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Rendered pages, in page order.
    pub pages: Vec<PageResult>,
    /// Directory every page was written to.
    pub output_dir: PathBuf,
    pub stats: ConversionStats,
}

/// Serialisable success/error envelope.
///
/// Serialises as `{"result":"success","message":[…pages…]}` or
/// `{"result":"error","kind":"NotFound","message":"…"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum ConversionOutcome {
    Success { message: Vec<PageResult> },
    Error { kind: ErrorKind, message: String },
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }
}

impl From<Result<ConversionOutput, Pdf2ImgError>> for ConversionOutcome {
    fn from(result: Result<ConversionOutput, Pdf2ImgError>) -> Self {
        match result {
            Ok(output) => ConversionOutcome::Success {
                message: output.pages,
            },
            Err(e) => ConversionOutcome::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}
