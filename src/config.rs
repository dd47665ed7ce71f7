//! Configuration types for PDF-to-image conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`]. A
//! [`Converter`] owns one and snapshots it at the start of every `convert`
//! call, so a conversion never observes a change made halfway through.
//!
//! Partial updates go through [`ConversionOptions`]: only fields that are
//! present *and* truthy (non-empty, non-zero) overwrite the current value.
//! Nothing is validated when options are set; a bad value such as an unknown
//! image type surfaces later as a render failure.
//!
//! [`Converter`]: crate::convert::Converter

use crate::error::Pdf2ImgError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a PDF-to-image conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2img::{ConversionConfig, PageSelection};
///
/// let config = ConversionConfig::builder()
///     .image_type("png")
///     .density(300)
///     .page(PageSelection::Single(2))
///     .build();
/// assert_eq!(config.size, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Output image format, used both as the engine's target format and as
    /// the file extension. Default: `"jpg"`.
    pub image_type: String,

    /// Longest edge of the output image in pixels. Default: 1024.
    pub size: u32,

    /// Rasterisation density in DPI, applied to both axes. Default: 600.
    pub density: u32,

    /// Compression quality, 0–100. Default: 100.
    pub quality: u32,

    /// Destination directory. If None, a directory named after the input
    /// file's stem is used, relative to the working directory.
    pub output_dir: Option<PathBuf>,

    /// Output file stem. If None, the input file's stem is used.
    pub output_name: Option<String>,

    /// Page selection. Default: All pages.
    pub page: PageSelection,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            image_type: "jpg".to_string(),
            size: 1024,
            density: 600,
            quality: 100,
            output_dir: None,
            output_name: None,
            page: PageSelection::default(),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Return a copy of `self` with the truthy fields of `options` applied.
    pub fn merged(&self, options: &ConversionOptions) -> Self {
        let mut next = self.clone();
        next.apply(options);
        next
    }

    /// Apply the truthy fields of `options` in place.
    ///
    /// Absent, empty, and zero fields leave the current value untouched, so
    /// a field once set can only be replaced, never reset.
    pub fn apply(&mut self, options: &ConversionOptions) {
        if let Some(t) = options.image_type.as_ref().filter(|t| !t.is_empty()) {
            self.image_type = t.clone();
        }
        if let Some(size) = options.size.filter(|&n| n > 0) {
            self.size = size;
        }
        if let Some(density) = options.density.filter(|&n| n > 0) {
            self.density = density;
        }
        if let Some(quality) = options.quality.filter(|&n| n > 0) {
            self.quality = quality;
        }
        if let Some(dir) = options
            .output_dir
            .as_ref()
            .filter(|d| !d.as_os_str().is_empty())
        {
            self.output_dir = Some(dir.clone());
        }
        if let Some(name) = options.output_name.as_ref().filter(|n| !n.is_empty()) {
            self.output_name = Some(name.clone());
        }
        if let Some(page) = options.page.filter(|&p| p > 0) {
            self.page = PageSelection::Single(page);
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn image_type(mut self, image_type: impl Into<String>) -> Self {
        self.config.image_type = image_type.into();
        self
    }

    pub fn size(mut self, px: u32) -> Self {
        self.config.size = px;
        self
    }

    pub fn density(mut self, dpi: u32) -> Self {
        self.config.density = dpi;
        self
    }

    pub fn quality(mut self, quality: u32) -> Self {
        self.config.quality = quality;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_name = Some(name.into());
        self
    }

    pub fn page(mut self, selection: PageSelection) -> Self {
        self.config.page = selection;
        self
    }

    /// Build the configuration. Values are not range-checked here.
    pub fn build(self) -> ConversionConfig {
        self.config
    }
}

/// A partial configuration update, as passed to
/// [`Converter::set_options`](crate::convert::Converter::set_options).
///
/// Field names on the wire follow the historical option names
/// (`type`, `outputdir`, `outputname`, …).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    #[serde(rename = "type")]
    pub image_type: Option<String>,
    pub size: Option<u32>,
    pub density: Option<u32>,
    pub quality: Option<u32>,
    #[serde(rename = "outputdir")]
    pub output_dir: Option<PathBuf>,
    #[serde(rename = "outputname")]
    pub output_name: Option<String>,
    pub page: Option<usize>,
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
}

impl PageSelection {
    /// Expand the selection into the ordered list of 1-indexed pages to render.
    ///
    /// `page_count` is the number of pages the engine enumerated. A single
    /// page must satisfy `1 <= page < page_count`; the last enumerated page
    /// is not selectable on its own.
    pub fn resolve(&self, page_count: usize) -> Result<Vec<usize>, Pdf2ImgError> {
        match *self {
            PageSelection::All => Ok((1..=page_count).collect()),
            PageSelection::Single(page) if page >= 1 && page < page_count => Ok(vec![page]),
            PageSelection::Single(page) => Err(Pdf2ImgError::InvalidPageNumber {
                page,
                total: page_count,
            }),
        }
    }
}
