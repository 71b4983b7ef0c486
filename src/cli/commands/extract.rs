//! The extract command: run the pipeline over one or more PDFs.

use std::path::PathBuf;

use console::style;

use crate::config::Settings;
use crate::llm::{LlmClient, LlmConfig, LlmDeviceConfig};
use crate::models::PageOutcome;
use crate::pipeline::{process_document, PipelineOptions};

/// CLI overrides applied on top of the config file and environment.
pub struct ExtractOverrides {
    pub dpi: Option<u32>,
    pub crop_percent: Option<u32>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub rules: Option<PathBuf>,
    pub no_clean: bool,
}

pub async fn cmd_extract(
    settings: &Settings,
    pdfs: &[PathBuf],
    pipeline: PipelineOptions,
    overrides: ExtractOverrides,
) -> anyhow::Result<()> {
    if pdfs.is_empty() {
        anyhow::bail!("No PDF files given. Usage: sift extract <PDFS>...");
    }

    let mut settings = settings.clone();
    if let Some(dpi) = overrides.dpi {
        settings.extraction.render_dpi = dpi;
    }
    if let Some(percent) = overrides.crop_percent {
        settings.extraction.crop_percent = percent;
    }
    if overrides.no_clean {
        settings.output.clean = false;
    }

    let rules = settings.load_rules(overrides.rules.as_deref())?;

    let mut llm_config = LlmConfig::new(settings.llm.clone(), LlmDeviceConfig::from_env());
    if let Some(endpoint) = overrides.endpoint {
        llm_config.set_endpoint(endpoint);
    }
    if let Some(model) = overrides.model {
        llm_config.set_model(model);
    }

    let llm = LlmClient::new(llm_config);

    if !pipeline.dry_run && !llm.is_available().await {
        anyhow::bail!("{}", llm.config().availability_hint());
    }

    if !pipeline.dry_run {
        println!(
            "Using {} model {} ({} worker{})",
            llm.config().provider_name(),
            style(llm.config().model()).cyan(),
            pipeline.workers,
            if pipeline.workers == 1 { "" } else { "s" }
        );
    }

    let mut failures = 0;
    for pdf in pdfs {
        println!("\n{} {}", style("Processing").bold(), pdf.display());

        match process_document(pdf, &settings, &llm, &rules, &pipeline).await {
            Ok(output) if pipeline.dry_run => {
                for (page, outcome) in &output.outcomes {
                    let detail = outcome.detail().unwrap_or_default();
                    println!("  page {:>4}: {} ({})", page, style("skip").yellow(), detail);
                }
                for page in &output.candidates {
                    println!("  page {:>4}: {}", page, style("would query model").green());
                }
                println!(
                    "{} {} of {} pages would reach the model",
                    style("✓").green(),
                    output.candidates.len(),
                    output.page_count
                );
            }
            Ok(output) => {
                for record in &output.records {
                    println!(
                        "  page {:>4}: {} - {}",
                        record.page,
                        style(&record.product).cyan(),
                        record.manufacturer
                    );
                }
                let dropped = output.stats.total_dropped();
                if dropped > 0 {
                    println!(
                        "  {} Cleaned report: removed {} row{} ({} unknown, {} duplicate)",
                        style("·").dim(),
                        dropped,
                        if dropped == 1 { "" } else { "s" },
                        output.stats.dropped_unknown,
                        output.stats.dropped_duplicates
                    );
                }
                if let Some(path) = &output.csv_path {
                    println!(
                        "{} {} product{} saved to {}",
                        style("✓").green(),
                        output.records.len(),
                        if output.records.len() == 1 { "" } else { "s" },
                        path.display()
                    );
                }
                let failed_pages = output
                    .outcomes
                    .iter()
                    .filter(|(_, o)| matches!(o, PageOutcome::Failed(_)))
                    .count();
                if failed_pages > 0 {
                    println!(
                        "{} {} page{} failed (see summary)",
                        style("!").yellow(),
                        failed_pages,
                        if failed_pages == 1 { "" } else { "s" }
                    );
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {:#}", style("✗").red(), pdf.display(), e);
            }
        }
    }

    if failures == pdfs.len() {
        anyhow::bail!("All {} document(s) failed", failures);
    }
    Ok(())
}
