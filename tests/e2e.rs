//! End-to-end tests against a real GraphicsMagick installation.
//!
//! The input document is generated at runtime (a minimal three-page PDF),
//! so no fixtures are needed, but `gm` and Ghostscript must be installed.
//! Gated behind the `E2E_ENABLED` environment variable so they do not run
//! in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use pdf2img::{
    convert_sync, ConversionConfig, ConversionOptions, Converter, ErrorKind, PageSelection,
};
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set and `gm` can be found.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        if !gm_locate::is_gm_available() {
            println!("SKIP — GraphicsMagick not found on PATH or PDF2IMG_GM_PATH");
            return;
        }
    }};
}

/// Write a minimal PDF with `pages` US-letter pages, each showing its number.
fn write_pdf(path: &Path, pages: usize) {
    let mut objects: Vec<String> = Vec::new();
    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", 4 + i * 2)).collect();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".into());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".into());
    for i in 0..pages {
        let content_id = 5 + i * 2;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = format!("BT /F1 96 Tf 250 400 Td (Page {}) Tj ET", i + 1);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }
    let xref = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref
    ));

    std::fs::write(path, pdf).expect("write test pdf");
}

fn fixture(pages: usize) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("test.pdf");
    write_pdf(&input, pages);
    (dir, input)
}

fn small_options(dir: &Path) -> ConversionOptions {
    ConversionOptions {
        output_dir: Some(dir.join("output")),
        output_name: Some("test".into()),
        density: Some(72),
        size: Some(200),
        ..Default::default()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_page_to_jpeg() {
    e2e_skip_unless_ready!();
    let (dir, input) = fixture(3);

    let mut converter = Converter::new();
    converter.set_options(&small_options(dir.path()));
    let output = converter.convert(&input).await.expect("conversion failed");

    let names: Vec<&str> = output.pages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["test_1.jpg", "test_2.jpg", "test_3.jpg"]);
    for page in &output.pages {
        println!("{} {:.1} kB {:?}x{:?}", page.name, page.size_kb, page.width, page.height);
        assert!(page.path.is_absolute());
        assert!(page.size_kb > 0.0);
        assert!(page.width.unwrap_or(0) <= 200);
        assert!(page.height.unwrap_or(0) <= 200);
    }
}

#[tokio::test]
async fn test_single_page_to_png() {
    e2e_skip_unless_ready!();
    let (dir, input) = fixture(3);

    let mut converter = Converter::new();
    converter.set_options(&small_options(dir.path()));
    converter.set_options(&ConversionOptions {
        image_type: Some("png".into()),
        page: Some(2),
        ..Default::default()
    });
    let output = converter.convert(&input).await.expect("conversion failed");

    assert_eq!(output.pages.len(), 1);
    assert_eq!(output.pages[0].page, 2);
    assert_eq!(output.pages[0].name, "test_2.png");
    let bytes = std::fs::read(&output.pages[0].path).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_last_page_is_not_selectable() {
    e2e_skip_unless_ready!();
    let (dir, input) = fixture(3);

    let mut converter = Converter::new();
    converter.set_options(&small_options(dir.path()));
    converter.set_options(&ConversionOptions {
        page: Some(3),
        ..Default::default()
    });
    let err = converter.convert(&input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPageNumber);
}

#[tokio::test]
async fn test_text_file_with_pdf_extension() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("fake.pdf");
    std::fs::write(&fake, "this is not a pdf\n").unwrap();

    let mut converter = Converter::new();
    converter.set_options(&small_options(dir.path()));
    let err = converter.convert(&fake).await.unwrap_err();
    println!("{err}");
    assert_eq!(err.kind(), ErrorKind::PageDiscoveryError);
}

#[test]
fn test_convert_sync_with_built_config() {
    e2e_skip_unless_ready!();
    let (dir, input) = fixture(2);

    let config = ConversionConfig::builder()
        .image_type("png")
        .density(72)
        .size(150)
        .output_dir(dir.path().join("sync"))
        .page(PageSelection::Single(1))
        .build();

    let output = convert_sync(&input, &config).expect("conversion failed");
    assert_eq!(output.pages.len(), 1);
    assert_eq!(output.pages[0].name, "test_1.png");
    assert_eq!(output.stats.total_pages, 2);
}
