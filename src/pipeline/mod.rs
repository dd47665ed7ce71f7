//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements one step; [`crate::convert`] runs them in
//! sequence.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ output_dir ──▶ pages ──▶ render (× N, in order)
//! (path/ext)   (mkdir)       (identify)  (gm convert + verify)
//! ```
//!
//! 1. [`validate`]  : reject empty paths, non-`.pdf` names, and anything
//!    that is not a regular file
//! 2. [`output_dir`]: derive the output directory and file stem, create the
//!    directory (one level)
//! 3. [`pages`]     : count pages through the engine and resolve the page
//!    selection
//! 4. [`render`]    : rasterise one page and check the written file

pub mod output_dir;
pub mod pages;
pub mod render;
pub mod validate;
