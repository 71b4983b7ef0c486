//! Tool and backend availability checks.

use console::style;

use crate::config::Settings;
use crate::llm::{LlmClient, LlmConfig, LlmDeviceConfig};
use crate::pdf;

/// Check external tool and vision backend availability.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("\n{}", style("PDF Tool Status").bold());
    println!("{}", "-".repeat(50));

    let tools = pdf::check_tools();
    let mut all_found = true;

    for (tool, available) in &tools {
        let status = if *available {
            style("✓ found").green()
        } else {
            all_found = false;
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }

    if !all_found {
        println!(
            "\n{} Some tools are missing. Install the poppler-utils package.",
            style("!").yellow()
        );
    }

    println!("\n{}", style("Vision Backend").bold());
    println!("{}", "-".repeat(50));

    let config = LlmConfig::new(settings.llm.clone(), LlmDeviceConfig::from_env());
    println!("  {:<15} {}", "Provider", config.provider_name());
    println!("  {:<15} {}", "Endpoint", config.endpoint());
    println!("  {:<15} {}", "Model", config.model());
    println!(
        "  {:<15} {}",
        "API Key",
        if config.api_key().is_some() {
            "set"
        } else {
            "not set"
        }
    );

    let client = LlmClient::new(config);
    if client.is_available().await {
        println!("\n{} Vision backend is available", style("✓").green());
    } else {
        println!(
            "\n{} {}",
            style("!").yellow(),
            client.config().availability_hint()
        );
    }

    Ok(())
}
