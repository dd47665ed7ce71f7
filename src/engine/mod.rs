//! The raster engine: the external program that actually reads the PDF.
//!
//! The pipeline needs exactly two capabilities from it:
//!
//! * **identify**: enumerate the document's pages, one token per page;
//! * **render page**: rasterise one page to an image file with the given
//!   density, maximum dimension, and quality.
//!
//! [`GraphicsMagick`] is the production implementation. The trait is object
//! safe so a [`Converter`](crate::convert::Converter) can hold any engine
//! behind an `Arc`, which is also how tests substitute a scripted one.

pub mod gm;

pub use gm::GraphicsMagick;

use crate::config::ConversionConfig;
use futures::future::BoxFuture;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures reported by a [`RasterEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran and exited unsuccessfully.
    #[error("'{program} {operation}' exited with {status}: {stderr}")]
    Failed {
        program: PathBuf,
        operation: &'static str,
        status: String,
        stderr: String,
    },

    /// Any other I/O failure while driving the engine.
    ///
    /// [`GraphicsMagick`] reports everything through `Spawn` and `Failed`;
    /// this variant is for custom [`RasterEngine`] implementations that read
    /// or write files themselves.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// An engine-addressable reference to one page of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub path: PathBuf,
    /// Zero-based page offset.
    pub index: usize,
}

impl PageRef {
    /// Reference the 1-indexed `page` of `path`.
    pub fn new(path: impl Into<PathBuf>, page: usize) -> Self {
        Self {
            path: path.into(),
            index: page.saturating_sub(1),
        }
    }

    /// The `file.pdf[N]` argument understood by ImageMagick-family tools.
    pub fn to_engine_arg(&self) -> OsString {
        let mut arg = self.path.as_os_str().to_os_string();
        arg.push(format!("[{}]", self.index));
        arg
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.path.display(), self.index)
    }
}

/// Rasterisation parameters for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParams {
    /// Output format; also the output file's extension.
    pub image_type: String,
    /// DPI, applied to both axes.
    pub density: u32,
    /// Longest output edge in pixels.
    pub size: u32,
    pub quality: u32,
}

impl From<&ConversionConfig> for RenderParams {
    fn from(config: &ConversionConfig) -> Self {
        Self {
            image_type: config.image_type.clone(),
            density: config.density,
            size: config.size,
            quality: config.quality,
        }
    }
}

/// An external page rasteriser.
///
/// Implementations must be `Send + Sync`; the pipeline never calls one
/// concurrently within a single conversion.
pub trait RasterEngine: Send + Sync {
    /// Enumerate the pages of `input`, returning one token per page.
    ///
    /// The raw tokens are returned unparsed; the pipeline validates them.
    fn identify<'a>(&'a self, input: &'a Path) -> BoxFuture<'a, Result<Vec<String>, EngineError>>;

    /// Rasterise `page` to `output`.
    fn render_page<'a>(
        &'a self,
        page: &'a PageRef,
        output: &'a Path,
        params: &'a RenderParams,
    ) -> BoxFuture<'a, Result<(), EngineError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ref_is_zero_based() {
        let r = PageRef::new("docs/test.pdf", 1);
        assert_eq!(r.index, 0);
        assert_eq!(r.to_engine_arg(), OsString::from("docs/test.pdf[0]"));
        assert_eq!(PageRef::new("a.pdf", 3).to_string(), "a.pdf[2]");
    }

    #[test]
    fn params_follow_config() {
        let config = ConversionConfig::builder()
            .image_type("png")
            .density(300)
            .size(800)
            .quality(90)
            .build();
        let p = RenderParams::from(&config);
        assert_eq!(p.image_type, "png");
        assert_eq!(p.density, 300);
        assert_eq!(p.size, 800);
        assert_eq!(p.quality, 90);
    }

    #[test]
    fn io_error_keeps_context_and_source() {
        use std::error::Error as _;

        let e = EngineError::Io {
            context: "write out/test_1.jpg".into(),
            source: std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"),
        };
        assert_eq!(e.to_string(), "write out/test_1.jpg: disk full");
        assert!(e.source().is_some());
    }

    #[test]
    fn failed_display_includes_stderr() {
        let e = EngineError::Failed {
            program: "gm".into(),
            operation: "identify",
            status: "exit status: 1".into(),
            stderr: "gm identify: Request did not return an image.".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gm identify"), "got: {msg}");
        assert!(msg.contains("Request did not return an image"), "got: {msg}");
    }
}
