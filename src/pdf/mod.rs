//! PDF access through external Poppler tools.
//!
//! The pipeline needs two things from a PDF: per-page text for the
//! pre-filter (pdftotext) and per-page PNG renders for the vision model
//! (pdftoppm). Page counts come from pdfinfo.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors that can occur while reading or rendering PDF pages.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Not a PDF file: {0}")]
    NotAPdf(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, PdfError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(PdfError::CommandFailed(format!(
                    "{}: {}",
                    error_prefix, stderr
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PdfError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(PdfError::Io(e)),
    }
}

/// Verify that a file exists and its content sniffs as PDF.
pub fn ensure_pdf(path: &Path) -> Result<(), PdfError> {
    let buffer = std::fs::read(path)?;
    match infer::get(&buffer) {
        Some(kind) if kind.mime_type() == "application/pdf" => Ok(()),
        Some(kind) => Err(PdfError::NotAPdf(format!(
            "{} looks like {}",
            path.display(),
            kind.mime_type()
        ))),
        None => Err(PdfError::NotAPdf(path.display().to_string())),
    }
}

/// Get the page count of a PDF via pdfinfo.
pub fn page_count(path: &Path) -> Option<u32> {
    let output = Command::new("pdfinfo").arg(path).output().ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if line.starts_with("Pages:") {
            return line.split_whitespace().nth(1).and_then(|s| s.parse().ok());
        }
    }
    None
}

/// Extract the text of a single page via pdftotext.
pub fn page_text(path: &Path, page: u32) -> Result<String, PdfError> {
    let page_str = page.to_string();
    let output = Command::new("pdftotext")
        .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
        .arg(path)
        .arg("-") // Output to stdout
        .output();

    handle_cmd_output(
        output,
        "pdftotext (install poppler-utils)",
        &format!("pdftotext failed on page {}", page),
    )
}

/// Render a single page to a PNG image via pdftoppm.
///
/// Returns the path of the generated image inside `output_dir`.
pub fn render_page(
    path: &Path,
    page: u32,
    dpi: u32,
    output_dir: &Path,
) -> Result<PathBuf, PdfError> {
    let page_str = page.to_string();
    let dpi_str = dpi.to_string();
    let output_prefix = output_dir.join("page");

    let status = Command::new("pdftoppm")
        .args(["-png", "-r", &dpi_str, "-f", &page_str, "-l", &page_str])
        .arg(path)
        .arg(&output_prefix)
        .status();

    match status {
        Ok(s) if s.success() => find_page_image(output_dir, page).ok_or_else(|| {
            PdfError::CommandFailed(format!("No image generated for page {}", page))
        }),
        Ok(_) => Err(PdfError::CommandFailed(format!(
            "pdftoppm failed to convert page {}",
            page
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PdfError::ToolNotFound(
            "pdftoppm (install poppler-utils)".to_string(),
        )),
        Err(e) => Err(PdfError::Io(e)),
    }
}

/// Render a single page and return the PNG bytes.
///
/// The temporary render directory is cleaned up before returning.
pub fn render_page_bytes(path: &Path, page: u32, dpi: u32) -> Result<Vec<u8>, PdfError> {
    let temp_dir = tempfile::TempDir::new()?;
    let image_path = render_page(path, page, dpi, temp_dir.path())?;
    Ok(std::fs::read(image_path)?)
}

/// Find the image file for a specific page number.
///
/// pdftoppm names files like page-01.png, page-02.png, etc.
/// The padding width varies based on total page count.
pub fn find_page_image(dir: &Path, page_num: u32) -> Option<PathBuf> {
    for digits in [2, 3, 4] {
        let filename = format!("page-{:0width$}.png", page_num, width = digits);
        let path = dir.join(&filename);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Check if required external tools are available.
pub fn check_tools() -> Vec<(String, bool)> {
    ["pdftotext", "pdftoppm", "pdfinfo"]
        .iter()
        .map(|tool| (tool.to_string(), which::which(tool).is_ok()))
        .collect()
}
