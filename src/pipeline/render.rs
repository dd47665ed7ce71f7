//! Page rasterisation: one engine invocation per page, then verify the file.
//!
//! A [`PageResult`] is only produced for an output file that exists and is
//! non-empty. Its size is reported in decimal kilobytes (bytes / 1000).
//!
//! ## Why spawn_blocking for the dimension probe?
//!
//! `image::image_dimensions` does synchronous file I/O. It is cheap (header
//! only), but it still must not run on a Tokio worker thread.

use crate::engine::{PageRef, RasterEngine, RenderParams};
use crate::error::Pdf2ImgError;
use crate::output::PageResult;
use crate::pipeline::output_dir::OutputTarget;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rasterise 1-indexed `page` of `input` into `target`.
pub async fn render_page(
    engine: &dyn RasterEngine,
    input: &Path,
    target: &OutputTarget,
    page: usize,
    params: &RenderParams,
) -> Result<PageResult, Pdf2ImgError> {
    let page_ref = PageRef::new(input, page);
    let output = target.file_path(page, &params.image_type);

    engine
        .render_page(&page_ref, &output, params)
        .await
        .map_err(|e| Pdf2ImgError::RenderError {
            page,
            detail: e.to_string(),
        })?;

    let meta = tokio::fs::metadata(&output)
        .await
        .map_err(|e| Pdf2ImgError::RenderError {
            page,
            detail: format!(
                "engine reported success but '{}' is unreadable: {}",
                output.display(),
                e
            ),
        })?;

    let bytes = meta.len();
    if bytes == 0 {
        return Err(Pdf2ImgError::EmptyOutput { page, path: output });
    }

    let path = absolute_path(&output).await;
    let (width, height) = probe_dimensions(&path).await.unzip();

    debug!(
        "Rendered {} → {} ({} bytes)",
        page_ref,
        path.display(),
        bytes
    );

    Ok(PageResult {
        page,
        name: target.file_name(page, &params.image_type),
        size_kb: bytes as f64 / 1000.0,
        path,
        width,
        height,
    })
}

async fn absolute_path(output: &Path) -> PathBuf {
    match tokio::fs::canonicalize(output).await {
        Ok(p) => p,
        Err(_) => std::path::absolute(output).unwrap_or_else(|_| output.to_path_buf()),
    }
}

/// Best-effort read of the image header; `None` for formats `image` can't read.
async fn probe_dimensions(path: &Path) -> Option<(u32, u32)> {
    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || image::image_dimensions(&owned)).await {
        Ok(Ok(dims)) => Some(dims),
        Ok(Err(e)) => {
            debug!("Could not read dimensions of {}: {}", path.display(), e);
            None
        }
        Err(e) => {
            debug!("Dimension probe task failed: {}", e);
            None
        }
    }
}
