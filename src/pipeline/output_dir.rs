//! Output planning: where the page images go and what they are called.
//!
//! Defaults are derived from the input file's stem (`docs/report.pdf` →
//! directory `report`, files `report_N.<type>`). They are computed per
//! conversion and never written back into the configuration, so reusing a
//! converter for differently named inputs yields differently named outputs.

use crate::config::ConversionConfig;
use crate::error::Pdf2ImgError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory and file stem shared by every page of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub stem: String,
}

impl OutputTarget {
    /// Derive the target from the input path and configuration. Pure.
    pub fn plan(input: &Path, config: &ConversionConfig) -> Self {
        let base = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let dir = config
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&base));
        let stem = config.output_name.clone().unwrap_or(base);

        Self { dir, stem }
    }

    /// File name of the image for 1-indexed `page`, e.g. `test_2.png`.
    pub fn file_name(&self, page: usize, image_type: &str) -> String {
        format!("{}_{}.{}", self.stem, page, image_type)
    }

    /// Full output path of the image for 1-indexed `page`.
    pub fn file_path(&self, page: usize, image_type: &str) -> PathBuf {
        self.dir.join(self.file_name(page, image_type))
    }
}

/// Make sure `dir` exists as a directory.
///
/// Creates exactly one level; a missing parent is an error, as is an
/// existing non-directory at `dir`.
pub async fn ensure_output_dir(dir: &Path) -> Result<(), Pdf2ImgError> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {
            debug!("Output directory exists: {}", dir.display());
            Ok(())
        }
        _ => {
            tokio::fs::create_dir(dir)
                .await
                .map_err(|source| Pdf2ImgError::DirectoryError {
                    path: dir.to_path_buf(),
                    source,
                })?;
            info!("Created output directory: {}", dir.display());
            Ok(())
        }
    }
}

/// Plan the output target and ensure its directory exists.
pub async fn resolve_output(
    input: &Path,
    config: &ConversionConfig,
) -> Result<OutputTarget, Pdf2ImgError> {
    let target = OutputTarget::plan(input, config);
    ensure_output_dir(&target.dir).await?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults_derive_from_input_stem() {
        let t = OutputTarget::plan(Path::new("docs/report.pdf"), &ConversionConfig::default());
        assert_eq!(t.dir, PathBuf::from("report"));
        assert_eq!(t.stem, "report");
        assert_eq!(t.file_name(3, "jpg"), "report_3.jpg");
    }

    #[test]
    fn explicit_dir_and_name_are_verbatim() {
        let config = ConversionConfig::builder()
            .output_dir("./output")
            .output_name("test")
            .build();
        let t = OutputTarget::plan(Path::new("whatever.pdf"), &config);
        assert_eq!(t.file_path(2, "png"), Path::new("./output").join("test_2.png"));
    }

    #[test]
    fn only_name_overridden() {
        let config = ConversionConfig::builder().output_name("scan").build();
        let t = OutputTarget::plan(Path::new("a/b/doc.pdf"), &config);
        assert_eq!(t.dir, PathBuf::from("doc"));
        assert_eq!(t.stem, "scan");
    }

    #[tokio::test]
    async fn creates_missing_directory_once() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("output");

        ensure_output_dir(&dir).await.unwrap();
        assert!(dir.is_dir());
        // second call sees the existing directory
        ensure_output_dir(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn does_not_create_parents() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("missing").join("output");
        let err = ensure_output_dir(&dir).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DirectoryError);
    }

    #[tokio::test]
    async fn file_in_the_way_is_directory_error() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("output");
        std::fs::write(&blocker, b"").unwrap();
        let err = ensure_output_dir(&blocker).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DirectoryError);
    }
}
