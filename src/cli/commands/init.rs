//! Initialize command.

use std::path::Path;

use console::style;

use crate::config::{Settings, CONFIG_FILE_NAME};
use crate::rules::RuleSet;

/// Write a skeleton config and example rules file into the working directory.
pub fn cmd_init(force: bool) -> anyhow::Result<()> {
    write_if_absent(
        Path::new(CONFIG_FILE_NAME),
        Settings::skeleton_toml(),
        force,
    )?;

    let example = serde_json::to_string_pretty(&RuleSet::example())?;
    write_if_absent(Path::new("manufacturers.json"), &example, force)?;

    println!(
        "\n{} Edit {} and set rules_path = \"manufacturers.json\" to enable the rules file",
        style("·").dim(),
        CONFIG_FILE_NAME
    );

    Ok(())
}

fn write_if_absent(path: &Path, contents: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        println!(
            "{} {} already exists (use --force to overwrite)",
            style("!").yellow(),
            path.display()
        );
        return Ok(());
    }

    std::fs::write(path, contents)?;
    println!("{} Wrote {}", style("✓").green(), path.display());
    Ok(())
}
