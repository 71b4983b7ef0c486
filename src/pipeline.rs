//! Document processing pipeline.
//!
//! Runs the cheap text pre-filter over every selected page first, then fans
//! the surviving pages out to the vision model with bounded concurrency.
//! Results are re-sorted by page number so report order is stable.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::Settings;
use crate::extract::{self, region};
use crate::llm::LlmClient;
use crate::models::{PageDisposition, PageOutcome, SkipReason};
use crate::pdf;
use crate::prefilter::Prefilter;
use crate::report::summary::{file_sha256, PageSummary, RunSummary};
use crate::report::{clean_records, write_report, CleanStats, ProductRecord};
use crate::rules::RuleSet;
use crate::utils::{parse_page_range, truncate};

/// Options resolved from CLI flags.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Output directory for reports.
    pub output_dir: PathBuf,
    /// Page selection like "1,3,5-10" (all pages when None).
    pub pages: Option<String>,
    /// Concurrent in-flight model calls.
    pub workers: usize,
    /// Cap on pages sent to the model per document (0 = unlimited).
    pub limit: usize,
    /// Only run the pre-filter; no model calls, no report.
    pub dry_run: bool,
    /// Show a progress bar.
    pub progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            pages: None,
            workers: 2,
            limit: 0,
            dry_run: false,
            progress: false,
        }
    }
}

/// Result of processing one document.
#[derive(Debug)]
pub struct DocumentOutput {
    /// CSV report path (None for dry runs).
    pub csv_path: Option<PathBuf>,
    /// Run summary path, when enabled.
    pub summary_path: Option<PathBuf>,
    /// Product rows written to the report.
    pub records: Vec<ProductRecord>,
    /// Per-page outcomes, in page order.
    pub outcomes: Vec<(u32, PageOutcome)>,
    /// Pages that would be sent to the model (dry runs only).
    pub candidates: Vec<u32>,
    /// Cleaning pass counters.
    pub stats: CleanStats,
    /// Total pages in the document.
    pub page_count: u32,
}

/// Process one PDF into a product report.
pub async fn process_document(
    pdf_path: &Path,
    settings: &Settings,
    llm: &LlmClient,
    rules: &RuleSet,
    opts: &PipelineOptions,
) -> anyhow::Result<DocumentOutput> {
    pdf::ensure_pdf(pdf_path)?;

    let page_count = pdf::page_count(pdf_path)
        .with_context(|| format!("Could not determine page count for {}", pdf_path.display()))?;

    let started_at = Utc::now();
    let stem = pdf_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    let selected: Vec<u32> = match opts.pages.as_deref() {
        Some(range) => parse_page_range(range, page_count),
        None => (1..=page_count).collect(),
    };
    if selected.is_empty() {
        anyhow::bail!("No pages selected in {}", pdf_path.display());
    }

    // Pre-filter pass: cheap, synchronous, no model calls.
    let prefilter = Prefilter::new(rules.clone());
    let mut outcomes: Vec<(u32, PageOutcome)> = Vec::new();
    let mut candidates: Vec<u32> = Vec::new();

    for &page in &selected {
        let text = pdf::page_text(pdf_path, page).unwrap_or_default();
        match prefilter.assess(&text) {
            PageDisposition::Process => candidates.push(page),
            PageDisposition::Skip(reason) => {
                info!("{} page {}: skipped ({})", stem, page, reason.describe());
                outcomes.push((page, PageOutcome::Skipped(reason)));
            }
        }
    }

    if opts.limit > 0 && candidates.len() > opts.limit {
        warn!(
            "{}: page limit {} reached, {} candidate pages dropped",
            stem,
            opts.limit,
            candidates.len() - opts.limit
        );
        for &page in &candidates[opts.limit..] {
            outcomes.push((page, PageOutcome::Skipped(SkipReason::PageLimit)));
        }
        candidates.truncate(opts.limit);
    }

    if opts.dry_run {
        outcomes.sort_by_key(|(page, _)| *page);
        return Ok(DocumentOutput {
            csv_path: None,
            summary_path: None,
            records: Vec::new(),
            outcomes,
            candidates,
            stats: CleanStats::default(),
            page_count,
        });
    }

    // Vision pass: bounded concurrency over the surviving pages.
    let bar = if opts.progress && !candidates.is_empty() {
        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {prefix:>20} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_prefix(stem.clone());
        Some(pb)
    } else {
        None
    };

    let dpi = settings.extraction.render_dpi;
    let crop_percent = settings.extraction.crop_percent;
    let classify = settings.extraction.classify_pages;
    let workers = opts.workers.max(1);

    let results: Vec<(u32, PageOutcome, Vec<ProductRecord>)> =
        stream::iter(candidates.iter().copied().map(|page| {
            let pdf_path = pdf_path.to_path_buf();
            let bar = bar.clone();
            async move {
                let (outcome, records) =
                    process_page(&pdf_path, page, dpi, crop_percent, classify, llm, rules).await;
                if let Some(pb) = &bar {
                    pb.inc(1);
                }
                (page, outcome, records)
            }
        }))
        .buffer_unordered(workers)
        .collect()
        .await;

    if let Some(pb) = &bar {
        pb.finish_and_clear();
    }

    let mut rows = Vec::new();
    for (page, outcome, records) in results {
        outcomes.push((page, outcome));
        rows.extend(records);
    }
    outcomes.sort_by_key(|(page, _)| *page);
    rows.sort_by_key(|record| record.page);

    let (records, stats) = if settings.output.clean {
        clean_records(rows)
    } else {
        (rows, CleanStats::default())
    };

    let csv_path = opts.output_dir.join(format!("{}_products.csv", stem));
    write_report(&csv_path, &records)?;

    let summary_path = if settings.output.write_summary {
        let path = opts.output_dir.join(format!("{}_summary.json", stem));
        let summary = RunSummary {
            source: pdf_path.to_path_buf(),
            sha256: file_sha256(pdf_path)?,
            model: llm.config().model().to_string(),
            started_at,
            finished_at: Utc::now(),
            page_count,
            pages: outcomes
                .iter()
                .map(|(page, outcome)| PageSummary::new(*page, outcome))
                .collect(),
            products: records.len(),
        };
        summary.write(&path)?;
        Some(path)
    } else {
        None
    };

    Ok(DocumentOutput {
        csv_path: Some(csv_path),
        summary_path,
        records,
        outcomes,
        candidates: Vec::new(),
        stats,
        page_count,
    })
}

/// Render, classify, crop, and extract one page.
///
/// Failures are folded into the outcome; one bad page never aborts the
/// document.
async fn process_page(
    pdf_path: &Path,
    page: u32,
    dpi: u32,
    crop_percent: u32,
    classify: bool,
    llm: &LlmClient,
    rules: &RuleSet,
) -> (PageOutcome, Vec<ProductRecord>) {
    match page_products(pdf_path, page, dpi, crop_percent, classify, llm, rules).await {
        Ok(result) => result,
        Err(e) => {
            warn!("page {} failed: {:#}", page, e);
            (
                PageOutcome::Failed(truncate(&format!("{:#}", e), 200)),
                Vec::new(),
            )
        }
    }
}

async fn page_products(
    pdf_path: &Path,
    page: u32,
    dpi: u32,
    crop_percent: u32,
    classify: bool,
    llm: &LlmClient,
    rules: &RuleSet,
) -> anyhow::Result<(PageOutcome, Vec<ProductRecord>)> {
    // pdftoppm is a blocking subprocess; keep it off the async workers.
    let owned = pdf_path.to_path_buf();
    let png = tokio::task::spawn_blocking(move || pdf::render_page_bytes(&owned, page, dpi))
        .await
        .context("render task panicked")??;

    if classify && !extract::classify_page(llm, &png).await? {
        return Ok((PageOutcome::NotProductPage, Vec::new()));
    }

    let cropped = region::crop_top(&png, crop_percent)?;
    let info = extract::extract_products(llm, &cropped, rules).await?;

    let records: Vec<ProductRecord> = info
        .products
        .iter()
        .map(|product| ProductRecord {
            product: product.clone(),
            manufacturer: info.manufacturer.clone(),
            page,
        })
        .collect();

    info!(
        "page {}: {} ({} product{})",
        page,
        info.manufacturer,
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    );

    Ok((
        PageOutcome::Extracted {
            products: records.len(),
        },
        records,
    ))
}
