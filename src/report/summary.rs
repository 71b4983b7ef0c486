//! Per-run JSON summaries.
//!
//! Written next to the CSV so a run can be audited later: which pages were
//! skipped and why, which failed, and what the document hashed to.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ReportError;
use crate::models::PageOutcome;

/// Outcome of one page, flattened for the summary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub page: u32,
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub products: usize,
}

impl PageSummary {
    pub fn new(page: u32, outcome: &PageOutcome) -> Self {
        let products = match outcome {
            PageOutcome::Extracted { products } => *products,
            _ => 0,
        };
        Self {
            page,
            outcome: outcome.as_str().to_string(),
            detail: outcome.detail(),
            products,
        }
    }
}

/// Summary of a full document run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Source PDF path.
    pub source: PathBuf,
    /// SHA-256 of the source PDF content.
    pub sha256: String,
    /// Vision model used.
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Total pages in the document.
    pub page_count: u32,
    /// Per-page outcomes, in page order.
    pub pages: Vec<PageSummary>,
    /// Product rows written to the report (after cleaning).
    pub products: usize,
}

impl RunSummary {
    /// Write the summary as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Compute the SHA-256 hash of a file, hex-encoded.
pub fn file_sha256(path: &Path) -> std::io::Result<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}
