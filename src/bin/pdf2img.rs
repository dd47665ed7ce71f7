//! CLI binary for pdf2img.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionOptions` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2img::{
    ConversionOptions, ConversionOutcome, ConversionProgressCallback, Converter, GraphicsMagick,
    PageResult, RequestId, Stage,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live progress bar plus one log line per
/// rendered page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_conversion_start`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Identifying pages…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Rendering");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_stage(&self, _request: RequestId, stage: Stage) {
        // stop the spinner before anyhow prints the error
        if stage == Stage::Failed {
            self.bar.abandon();
        }
    }

    fn on_conversion_start(&self, _request: RequestId, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_start(&self, _request: RequestId, page: usize, _total: usize) {
        self.bar.set_message(format!("page {page}"));
    }

    fn on_page_complete(&self, _request: RequestId, page: &PageResult, total: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            green("✓"),
            page.page,
            total,
            page.name,
            dim(&format!("{:.1} kB", page.size_kb)),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, _request: RequestId, page: usize, total: usize, error: &str) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page,
            total,
            red(error),
        ));
    }

    fn on_conversion_complete(&self, _request: RequestId, rendered: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages converted successfully",
            green("✔"),
            bold(&rendered.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page to ./test/test_N.jpg
  pdf2img test.pdf

  # Into a chosen directory and file stem
  pdf2img test.pdf --outputdir ./output --outputname test

  # Only page 2, as PNG
  pdf2img test.pdf --type png --page 2

  # Machine-readable result
  pdf2img test.pdf --json > result.json

PAGE SELECTION:
  --page N renders page N only. N must be lower than the page count the
  engine reports, so the last page of a document is not selectable alone;
  omit --page to render every page.

ENVIRONMENT VARIABLES:
  PDF2IMG_GM_PATH         Path to the `gm` executable (skips the PATH search)
  RUST_LOG                Override the log filter (e.g. pdf2img=debug)

SETUP:
  GraphicsMagick (with Ghostscript for PDF support) must be installed:
    apt install graphicsmagick ghostscript     # Debian/Ubuntu
    brew install graphicsmagick ghostscript    # macOS
"#;

/// Convert PDF files to one image per page using GraphicsMagick.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Convert PDF files to one image per page using GraphicsMagick",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Output image format and extension [default: jpg].
    #[arg(short = 't', long = "type", env = "PDF2IMG_TYPE")]
    image_type: Option<String>,

    /// Longest output edge in pixels [default: 1024].
    #[arg(short, long, env = "PDF2IMG_SIZE")]
    size: Option<u32>,

    /// Rasterisation density in DPI [default: 600].
    #[arg(short, long, env = "PDF2IMG_DENSITY")]
    density: Option<u32>,

    /// Compression quality, 1–100 [default: 100].
    #[arg(short, long, env = "PDF2IMG_QUALITY",
          value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Output directory [default: the input file's stem].
    #[arg(short, long = "outputdir", env = "PDF2IMG_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Output file stem [default: the input file's stem].
    #[arg(short = 'n', long = "outputname", env = "PDF2IMG_OUTPUT_NAME")]
    output_name: Option<String>,

    /// Render only this 1-indexed page.
    #[arg(short, long, env = "PDF2IMG_PAGE",
          value_parser = clap::value_parser!(u64).range(1..))]
    page: Option<u64>,

    /// Path to the `gm` executable.
    #[arg(long, env = "PDF2IMG_GM_PATH")]
    gm_path: Option<PathBuf>,

    /// Print the result envelope as JSON on stdout.
    #[arg(long, env = "PDF2IMG_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2IMG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(long, env = "PDF2IMG_QUIET")]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> ConversionOptions {
        ConversionOptions {
            image_type: self.image_type.clone(),
            size: self.size,
            density: self.density,
            quality: self.quality,
            output_dir: self.output_dir.clone(),
            output_name: self.output_name.clone(),
            page: self.page.map(|p| p as usize),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar provides all the feedback that matters, so library
    // INFO logs are hidden while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure GraphicsMagick is available ───────────────────────────────
    let gm = match cli.gm_path {
        Some(ref path) => gm_locate::verify_gm(path),
        None => gm_locate::ensure_gm(),
    }
    .context("GraphicsMagick is required")?;

    if !cli.quiet && !cli.json {
        eprintln!(
            "{}",
            dim(&format!("GraphicsMagick {} ({})", gm.version, gm.path.display()))
        );
    }

    // ── Build converter ──────────────────────────────────────────────────
    let mut converter = Converter::with_engine(Arc::new(GraphicsMagick::from(&gm)));
    converter.set_options(&cli.options());
    if show_progress {
        let cb: Arc<dyn ConversionProgressCallback> = CliProgressCallback::new_dynamic();
        converter = converter.with_progress(cb);
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let result = converter.convert(&cli.input).await;

    if cli.json {
        let failed = result.is_err();
        let outcome = ConversionOutcome::from(result);
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialise result")?
        );
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    let output = result.context("Conversion failed")?;

    if !cli.quiet && !show_progress {
        for page in &output.pages {
            println!(
                "{:>3}  {}  {:.1} kB  {}",
                page.page,
                page.name,
                page.size_kb,
                page.path.display()
            );
        }
    }

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} pages  {}ms  →  {}",
            cyan("◆"),
            output.stats.rendered_pages,
            output.stats.total_pages,
            output.stats.total_duration_ms,
            bold(&output.output_dir.display().to_string()),
        );
    }

    Ok(())
}
