//! # pdf2img
//!
//! Convert a PDF document into one raster image per page (or a single
//! selected page), delegating rasterisation to
//! [GraphicsMagick](http://www.graphicsmagick.org/) run as a subprocess.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Validate  non-empty path, `.pdf` extension, regular file
//!  ├─ 2. Output    derive directory + file stem, create the directory
//!  ├─ 3. Pages     `gm identify` → page count → page set
//!  ├─ 4. Render    `gm convert` once per page, strictly in order
//!  └─ 5. Output    ordered PageResults (name, size in kB, absolute path)
//! ```
//!
//! The first failing step ends the conversion with a [`Pdf2ImgError`].
//! Pages written before the failure are left on disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img::{ConversionOptions, Converter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut converter = Converter::new();
//!     converter.set_options(&ConversionOptions {
//!         image_type: Some("png".into()),
//!         page: Some(2),
//!         ..Default::default()
//!     });
//!     let output = converter.convert("test.pdf").await?;
//!     for page in &output.pages {
//!         println!("{} {:.1} kB {}", page.name, page.size_kb, page.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2img = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ConversionOptions, PageSelection};
pub use convert::{convert, convert_sync, ConversionRequest, Converter};
pub use engine::{EngineError, GraphicsMagick, PageRef, RasterEngine, RenderParams};
pub use error::{ErrorKind, Pdf2ImgError};
pub use output::{ConversionOutcome, ConversionOutput, ConversionStats, PageResult};
pub use progress::{
    ConversionProgressCallback, NoopProgressCallback, ProgressCallback, RequestId, Stage,
};
