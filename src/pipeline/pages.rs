//! Page discovery: ask the engine how many pages it can rasterise, then
//! turn the configured [`PageSelection`] into the ordered page set.
//!
//! The count comes from the engine's own enumeration rather than the PDF's
//! metadata, so it always matches what the engine can actually render.

use crate::config::PageSelection;
use crate::engine::RasterEngine;
use crate::error::Pdf2ImgError;
use std::path::Path;
use tracing::{debug, info};

/// Count pages from the engine's per-page tokens.
///
/// Every token must be a page number; an empty list or any other token
/// means the engine's output cannot be trusted.
pub fn parse_page_tokens(tokens: &[String]) -> Result<usize, String> {
    if tokens.is_empty() {
        return Err("engine reported no pages".to_string());
    }
    if let Some(bad) = tokens.iter().find(|t| t.parse::<usize>().is_err()) {
        return Err(format!("unexpected page token {bad:?} in engine output"));
    }
    Ok(tokens.len())
}

/// Ask the engine for the page count of `input`.
pub async fn count_pages(engine: &dyn RasterEngine, input: &Path) -> Result<usize, Pdf2ImgError> {
    let tokens = engine
        .identify(input)
        .await
        .map_err(|e| Pdf2ImgError::PageDiscoveryError {
            path: input.to_path_buf(),
            detail: e.to_string(),
        })?;
    debug!("identify tokens: {:?}", tokens);

    let count = parse_page_tokens(&tokens).map_err(|detail| Pdf2ImgError::PageDiscoveryError {
        path: input.to_path_buf(),
        detail,
    })?;
    info!("{} has {} pages", input.display(), count);
    Ok(count)
}

/// Count pages and resolve `selection` against the count.
///
/// Returns `(page_count, pages_to_render)`.
pub async fn discover_pages(
    engine: &dyn RasterEngine,
    input: &Path,
    selection: PageSelection,
) -> Result<(usize, Vec<usize>), Pdf2ImgError> {
    let count = count_pages(engine, input).await?;
    let pages = selection.resolve(count)?;
    Ok((count, pages))
}
