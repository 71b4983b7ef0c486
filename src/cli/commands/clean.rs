//! Re-run the cleaning pass on existing report CSVs.

use std::path::PathBuf;

use console::style;

use crate::report::clean_file;

pub fn cmd_clean(files: &[PathBuf]) -> anyhow::Result<()> {
    if files.is_empty() {
        anyhow::bail!("No report files given. Usage: sift clean <FILES>...");
    }

    for file in files {
        match clean_file(file) {
            Ok(stats) => {
                println!(
                    "{} {}: removed {} row{} ({} unknown, {} duplicate)",
                    style("✓").green(),
                    file.display(),
                    stats.total_dropped(),
                    if stats.total_dropped() == 1 { "" } else { "s" },
                    stats.dropped_unknown,
                    stats.dropped_duplicates
                );
            }
            Err(e) => {
                eprintln!("{} {}: {}", style("✗").red(), file.display(), e);
            }
        }
    }

    Ok(())
}
