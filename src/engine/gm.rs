//! GraphicsMagick subprocess engine.
//!
//! Each operation spawns one `gm` process via `tokio::process` and waits for
//! it to exit; nothing is kept running between calls. stderr is captured so
//! that failures carry GraphicsMagick's own diagnostic.

use super::{EngineError, PageRef, RasterEngine, RenderParams};
use futures::future::BoxFuture;
use futures::FutureExt;
use gm_locate::{GmInstallation, GmLocateError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Format string that prints the page number of every frame.
const IDENTIFY_FORMAT: &str = "%p ";

/// Drives the `gm` command-line tool.
#[derive(Debug, Clone)]
pub struct GraphicsMagick {
    program: PathBuf,
}

impl Default for GraphicsMagick {
    /// Uses `PDF2IMG_GM_PATH` if set, else `gm` as found on `PATH` at spawn
    /// time.
    fn default() -> Self {
        Self::new(gm_locate::gm_program())
    }
}

impl GraphicsMagick {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate and verify `gm` (see [`gm_locate::ensure_gm`]).
    pub fn locate() -> Result<Self, GmLocateError> {
        gm_locate::ensure_gm().map(|found| Self::from(&found))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn identify_args(input: &Path) -> Vec<OsString> {
        vec![
            "identify".into(),
            "-format".into(),
            IDENTIFY_FORMAT.into(),
            input.into(),
        ]
    }

    fn convert_args(page: &PageRef, output: &Path, params: &RenderParams) -> Vec<OsString> {
        vec![
            "convert".into(),
            "-density".into(),
            format!("{0}x{0}", params.density).into(),
            page.to_engine_arg(),
            "-resize".into(),
            format!("{0}x{0}", params.size).into(),
            "-quality".into(),
            params.quality.to_string().into(),
            output.into(),
        ]
    }

    async fn run(&self, operation: &'static str, args: Vec<OsString>) -> Result<Output, EngineError> {
        debug!("{} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                program: self.program.clone(),
                operation,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

impl From<&GmInstallation> for GraphicsMagick {
    fn from(found: &GmInstallation) -> Self {
        Self::new(found.path.clone())
    }
}

impl RasterEngine for GraphicsMagick {
    fn identify<'a>(&'a self, input: &'a Path) -> BoxFuture<'a, Result<Vec<String>, EngineError>> {
        async move {
            let output = self.run("identify", Self::identify_args(input)).await?;
            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(stdout.split_whitespace().map(str::to_string).collect())
        }
        .boxed()
    }

    fn render_page<'a>(
        &'a self,
        page: &'a PageRef,
        output: &'a Path,
        params: &'a RenderParams,
    ) -> BoxFuture<'a, Result<(), EngineError>> {
        async move {
            self.run("convert", Self::convert_args(page, output, params))
                .await
                .map(|_| ())
        }
        .boxed()
    }
}
