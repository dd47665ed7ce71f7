//! The conversion orchestrator.
//!
//! A [`Converter`] owns a [`ConversionConfig`], a [`RasterEngine`], and an
//! optional progress observer. Each [`Converter::convert`] call runs the
//! pipeline stages strictly in order:
//!
//! ```text
//! validate ──▶ resolve output ──▶ count pages ──▶ render page 1 ──▶ … ──▶ render page N
//! ```
//!
//! Page N+1 is never started before page N's file is on disk and verified.
//! The first failure ends the call; pages already written stay on disk but
//! are not reported.

use crate::config::{ConversionConfig, ConversionOptions};
use crate::engine::{GraphicsMagick, RasterEngine, RenderParams};
use crate::error::Pdf2ImgError;
use crate::output::{ConversionOutput, ConversionStats, PageResult};
use crate::pipeline::{output_dir, pages, render, validate};
use crate::progress::{ProgressCallback, RequestId, Stage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// An immutable snapshot of one `convert` call.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub id: RequestId,
    pub input: PathBuf,
    pub config: ConversionConfig,
}

/// Reusable PDF-to-image converter.
///
/// # Example
/// ```rust,no_run
/// use pdf2img::{ConversionOptions, Converter};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut converter = Converter::new();
/// converter.set_options(&ConversionOptions {
///     output_dir: Some("./output".into()),
///     output_name: Some("test".into()),
///     ..Default::default()
/// });
/// let output = converter.convert("test.pdf").await?;
/// for page in &output.pages {
///     println!("{} → {} ({} kB)", page.page, page.name, page.size_kb);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Converter {
    config: ConversionConfig,
    engine: Arc<dyn RasterEngine>,
    progress: Option<ProgressCallback>,
    next_request: AtomicU64,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// A converter with default options, driving `gm` from `PDF2IMG_GM_PATH` or `PATH`.
    pub fn new() -> Self {
        Self::with_engine(Arc::new(GraphicsMagick::default()))
    }

    /// A converter with default options and a custom engine.
    pub fn with_engine(engine: Arc<dyn RasterEngine>) -> Self {
        Self {
            config: ConversionConfig::default(),
            engine,
            progress: None,
            next_request: AtomicU64::new(1),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: ConversionConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a progress observer.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Merge the truthy fields of `options` into the configuration.
    ///
    /// Unset fields keep their current value; nothing is validated here.
    pub fn set_options(&mut self, options: &ConversionOptions) {
        self.config.apply(options);
        debug!("Options updated: {:?}", self.config);
    }

    /// Convert `input` to one image per selected page.
    ///
    /// # Errors
    /// Returns the first failure of any stage; see [`Pdf2ImgError`].
    pub async fn convert(&self, input: impl AsRef<Path>) -> Result<ConversionOutput, Pdf2ImgError> {
        let request = ConversionRequest {
            id: RequestId(self.next_request.fetch_add(1, Ordering::Relaxed)),
            input: input.as_ref().to_path_buf(),
            config: self.config.clone(),
        };

        let result = self.run(&request).await;
        match &result {
            Ok(output) => {
                self.stage(request.id, Stage::Done);
                if let Some(ref cb) = self.progress {
                    cb.on_conversion_complete(request.id, output.pages.len());
                }
            }
            Err(e) => {
                warn!("[{}] Conversion of {} failed: {}", request.id, request.input.display(), e);
                self.stage(request.id, Stage::Failed);
            }
        }
        result
    }

    async fn run(&self, request: &ConversionRequest) -> Result<ConversionOutput, Pdf2ImgError> {
        let total_start = Instant::now();
        let id = request.id;
        let input = request.input.as_path();
        let config = &request.config;
        info!("[{}] Starting conversion: {}", id, input.display());

        // ── Step 1: Validate input ───────────────────────────────────────────
        self.stage(id, Stage::Validating);
        validate::validate_input(input).await?;

        // ── Step 2: Resolve output directory and name ────────────────────────
        self.stage(id, Stage::ResolvingOutput);
        let target = output_dir::resolve_output(input, config).await?;

        // ── Step 3: Discover pages ───────────────────────────────────────────
        self.stage(id, Stage::CountingPages);
        let (total_pages, page_set) =
            pages::discover_pages(self.engine.as_ref(), input, config.page).await?;
        debug!("[{}] Selected pages: {:?}", id, page_set);

        if let Some(ref cb) = self.progress {
            cb.on_conversion_start(id, page_set.len());
        }

        // ── Step 4: Render pages, one at a time ──────────────────────────────
        let render_start = Instant::now();
        let params = RenderParams::from(config);
        let selected = page_set.len();
        let mut results: Vec<PageResult> = Vec::with_capacity(selected);

        for (position, page) in page_set.into_iter().enumerate() {
            self.stage(id, Stage::RenderingPages(position + 1));
            if let Some(ref cb) = self.progress {
                cb.on_page_start(id, page, selected);
            }

            match render::render_page(self.engine.as_ref(), input, &target, page, &params).await {
                Ok(result) => {
                    if let Some(ref cb) = self.progress {
                        cb.on_page_complete(id, &result, selected);
                    }
                    results.push(result);
                }
                Err(e) => {
                    if let Some(ref cb) = self.progress {
                        cb.on_page_error(id, page, selected, &e.to_string());
                    }
                    return Err(e);
                }
            }
        }

        let stats = ConversionStats {
            total_pages,
            rendered_pages: results.len(),
            total_duration_ms: total_start.elapsed().as_millis() as u64,
            render_duration_ms: render_start.elapsed().as_millis() as u64,
        };

        info!(
            "[{}] Conversion complete: {}/{} pages → {} in {}ms",
            id,
            stats.rendered_pages,
            total_pages,
            target.dir.display(),
            stats.total_duration_ms
        );

        Ok(ConversionOutput {
            pages: results,
            output_dir: target.dir,
            stats,
        })
    }

    fn stage(&self, id: RequestId, stage: Stage) {
        debug!("[{}] → {}", id, stage);
        if let Some(ref cb) = self.progress {
            cb.on_stage(id, stage);
        }
    }
}

/// Convert a PDF with `config` using `gm` from `PDF2IMG_GM_PATH` or `PATH`.
///
/// A one-shot shortcut for `Converter::new().with_config(config.clone())`.
pub async fn convert(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2ImgError> {
    Converter::new()
        .with_config(config.clone())
        .convert(input)
        .await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary current-thread tokio runtime internally. Must not be
/// called from within an async context.
pub fn convert_sync(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2ImgError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Pdf2ImgError::Internal(format!("Failed to create tokio runtime: {e}")))?;
    runtime.block_on(convert(input, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::progress::ConversionProgressCallback;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Stages(Mutex<Vec<Stage>>);

    impl ConversionProgressCallback for Stages {
        fn on_stage(&self, _request: RequestId, stage: Stage) {
            self.0.lock().unwrap().push(stage);
        }
    }

    #[tokio::test]
    async fn validation_failure_stops_before_output() {
        let stages = Arc::new(Stages::default());
        let converter = Converter::new().with_progress(stages.clone());

        let err = converter.convert("notes.txt").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(
            *stages.0.lock().unwrap(),
            vec![Stage::Validating, Stage::Failed]
        );
    }

    #[tokio::test]
    async fn request_ids_increase() {
        #[derive(Default)]
        struct Ids(Mutex<Vec<RequestId>>);
        impl ConversionProgressCallback for Ids {
            fn on_stage(&self, request: RequestId, stage: Stage) {
                if stage == Stage::Validating {
                    self.0.lock().unwrap().push(request);
                }
            }
        }

        let ids = Arc::new(Ids::default());
        let converter = Converter::new().with_progress(ids.clone());
        let _ = converter.convert("").await;
        let _ = converter.convert("").await;
        assert_eq!(*ids.0.lock().unwrap(), vec![RequestId(1), RequestId(2)]);
    }

    #[test]
    fn set_options_is_additive() {
        let mut converter = Converter::new();
        converter.set_options(&ConversionOptions {
            output_dir: Some("./output".into()),
            output_name: Some("test".into()),
            ..Default::default()
        });
        converter.set_options(&ConversionOptions {
            image_type: Some("png".into()),
            ..Default::default()
        });
        let c = converter.config();
        assert_eq!(c.image_type, "png");
        assert_eq!(c.output_name.as_deref(), Some("test"));
        assert_eq!(c.output_dir, Some(PathBuf::from("./output")));
    }

    #[test]
    fn convert_sync_reports_invalid_input() {
        let err = convert_sync("", &ConversionConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
