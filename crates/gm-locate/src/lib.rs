//! # gm-locate
//!
//! Find and verify the [GraphicsMagick](http://www.graphicsmagick.org/) `gm`
//! executable, so that `pdf2img` can refuse to start with a clear message
//! instead of failing on the first page with a spawn error.
//!
//! ## How it works
//!
//! On first call to [`ensure_gm`]:
//!
//! 1. If `PDF2IMG_GM_PATH` is set, that file is used (and must exist).
//! 2. Otherwise `PATH` is searched for an executable `gm` with the
//!    [`which`] crate (`gm.exe` and `PATHEXT` on Windows).
//! 3. The candidate is run as `gm version`; the first line must announce
//!    GraphicsMagick, and its version token is recorded.
//!
//! The resolved [`GmInstallation`] is cached for the rest of the process.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gm_locate::ensure_gm;
//!
//! let gm = ensure_gm().expect("GraphicsMagick is not installed");
//! println!("using {} ({})", gm.path.display(), gm.version);
//! ```
//!
//! ## Environment variable overrides
//!
//! - `PDF2IMG_GM_PATH`: path to an existing `gm` executable; skips the
//!   `PATH` search.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable that pins the `gm` executable.
pub const GM_PATH_ENV: &str = "PDF2IMG_GM_PATH";

/// Banner printed on the first line of `gm version`.
const GM_BANNER: &str = "GraphicsMagick";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by gm-locate operations.
#[derive(Error, Debug)]
pub enum GmLocateError {
    /// `PDF2IMG_GM_PATH` points at a file that does not exist.
    #[error("{GM_PATH_ENV} is set to '{path}', but no such file exists")]
    OverrideMissing { path: PathBuf },

    /// No `gm` executable on any `PATH` entry.
    #[error(
        "GraphicsMagick (`{name}`) was not found on PATH.\n\
Please install graphicsmagick in order to run pdf2img, or set {GM_PATH_ENV}."
    )]
    NotFound { name: &'static str },

    /// The candidate could not be executed.
    #[error("Failed to run '{path}': {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The candidate ran but does not look like GraphicsMagick.
    #[error("'{path}' is not a GraphicsMagick executable: {detail}")]
    NotGraphicsMagick { path: PathBuf, detail: String },
}

/// A verified GraphicsMagick installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmInstallation {
    /// Absolute or `PATH`-relative location of the `gm` executable.
    pub path: PathBuf,
    /// Version token from the `gm version` banner, e.g. `1.3.38`.
    pub version: String,
}

// ── Platform ─────────────────────────────────────────────────────────────────

/// File name of the GraphicsMagick driver on the current platform.
pub fn gm_executable_name() -> &'static str {
    if cfg!(windows) {
        "gm.exe"
    } else {
        "gm"
    }
}

/// The program to spawn for `gm`, without searching or verifying it.
///
/// `PDF2IMG_GM_PATH` when set, otherwise the bare executable name, which the
/// OS resolves against `PATH` at spawn time.
pub fn gm_program() -> PathBuf {
    std::env::var_os(GM_PATH_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(gm_executable_name()))
}

// ── Thread-safe singleton cache ──────────────────────────────────────────────

static RESOLVED: OnceLock<GmInstallation> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Returns `true` if a verified `gm` can be resolved.
pub fn is_gm_available() -> bool {
    ensure_gm().is_ok()
}

/// Resolves the `gm` executable without running it.
///
/// Honours `PDF2IMG_GM_PATH` first, then searches `PATH`.
pub fn locate_gm() -> Result<PathBuf, GmLocateError> {
    if let Some(env_path) = std::env::var_os(GM_PATH_ENV) {
        let p = PathBuf::from(env_path);
        if p.is_file() {
            return Ok(p);
        }
        return Err(GmLocateError::OverrideMissing { path: p });
    }

    search_path(gm_executable_name(), std::env::var_os("PATH"))
}

/// Locates and verifies `gm`, caching the result for the process lifetime.
///
/// # Thread safety
///
/// Safe to call from multiple threads; concurrent first calls may each run
/// `gm version`, and one result wins.
pub fn ensure_gm() -> Result<GmInstallation, GmLocateError> {
    if let Some(found) = RESOLVED.get() {
        return Ok(found.clone());
    }

    let path = locate_gm()?;
    let installation = verify_gm(&path)?;

    let _ = RESOLVED.set(installation.clone());

    Ok(installation)
}

/// Runs `<path> version` and checks the banner.
///
/// Does not interact with the cache.
pub fn verify_gm(path: &Path) -> Result<GmInstallation, GmLocateError> {
    let output = Command::new(path)
        .arg("version")
        .output()
        .map_err(|source| GmLocateError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(GmLocateError::NotGraphicsMagick {
            path: path.to_path_buf(),
            detail: format!(
                "`version` exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = parse_version(&stdout).ok_or_else(|| GmLocateError::NotGraphicsMagick {
        path: path.to_path_buf(),
        detail: format!(
            "unexpected banner {:?}",
            stdout.lines().next().unwrap_or_default()
        ),
    })?;

    Ok(GmInstallation {
        path: path.to_path_buf(),
        version,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────────

/// Searches a `PATH`-style list for an executable `name`.
fn search_path(name: &'static str, paths: Option<OsString>) -> Result<PathBuf, GmLocateError> {
    which::which_in(name, paths, ".").map_err(|_| GmLocateError::NotFound { name })
}

/// Extracts `1.3.38` from `GraphicsMagick 1.3.38 2022-03-26 Q16 http://…`.
fn parse_version(banner: &str) -> Option<String> {
    let first = banner.lines().next()?.trim();
    let mut tokens = first.split_whitespace();
    if tokens.next()? != GM_BANNER {
        return None;
    }
    tokens.next().map(str::to_string)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
