//! Progress-callback trait for per-conversion events.
//!
//! Attach an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::convert::Converter::with_progress`] to receive events as the
//! pipeline moves through its stages and renders each page.
//!
//! Every event carries the [`RequestId`] of the `convert` call that emitted
//! it, so one observer can follow several conversions without relying on the
//! output name (which may differ from call to call).
//!
//! # Example
//!
//! ```rust
//! use pdf2img::{ConversionProgressCallback, PageResult, RequestId};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, request: RequestId, page: &PageResult, total: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("[{request}] page {}/{} → {}", page.page, total, page.name);
//!     }
//! }
//! ```

use crate::output::PageResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifies one `convert` call on a [`crate::convert::Converter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Pipeline states of a single conversion.
///
/// `Idle → Validating → ResolvingOutput → CountingPages →
/// RenderingPages(1..=N) → Done`, with `Failed` reachable from every
/// working state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Validating,
    ResolvingOutput,
    CountingPages,
    /// Rendering the i-th entry (1-based) of the page set, not the page
    /// number itself: with only page 2 selected this is `RenderingPages(1)`.
    RenderingPages(usize),
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validating => f.write_str("validating"),
            Stage::ResolvingOutput => f.write_str("resolving output"),
            Stage::CountingPages => f.write_str("counting pages"),
            Stage::RenderingPages(i) => write!(f, "rendering {i} of page set"),
            Stage::Done => f.write_str("done"),
            Stage::Failed => f.write_str("failed"),
        }
    }
}

/// Called by the conversion pipeline as it progresses.
///
/// Events for one request arrive in pipeline order, on the task that called
/// `convert`. All methods have default no-op implementations so callers only
/// override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called on every state transition, including the terminal one.
    fn on_stage(&self, request: RequestId, stage: Stage) {
        let _ = (request, stage);
    }

    /// Called once the page set is known, before the first render.
    ///
    /// # Arguments
    /// * `total_pages`: number of pages that will be rendered
    fn on_conversion_start(&self, request: RequestId, total_pages: usize) {
        let _ = (request, total_pages);
    }

    /// Called just before the engine is invoked for a page.
    fn on_page_start(&self, request: RequestId, page: usize, total_pages: usize) {
        let _ = (request, page, total_pages);
    }

    /// Called when a page has been written and verified.
    fn on_page_complete(&self, request: RequestId, page: &PageResult, total_pages: usize) {
        let _ = (request, page, total_pages);
    }

    /// Called when a page fails. No further pages are attempted.
    fn on_page_error(&self, request: RequestId, page: usize, total_pages: usize, error: &str) {
        let _ = (request, page, total_pages, error);
    }

    /// Called after the last page was rendered successfully.
    ///
    /// # Arguments
    /// * `rendered`: pages written and reported
    fn on_conversion_complete(&self, request: RequestId, rendered: usize) {
        let _ = (request, rendered);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::convert::Converter`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
