//! Vision model configuration display.

use console::style;

use crate::config::Settings;
use crate::llm::{LlmClient, LlmConfig, LlmDeviceConfig, LlmProvider};

/// Show vision model configuration and list available models.
pub async fn cmd_models(settings: &Settings) -> anyhow::Result<()> {
    let config = LlmConfig::new(settings.llm.clone(), LlmDeviceConfig::from_env());
    let client = LlmClient::new(config.clone());

    println!("\n{}", style("Vision Model Configuration").bold());
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {}",
        "Enabled:",
        if config.enabled() { "Yes" } else { "No" }
    );
    println!("{:<20} {}", "Provider:", config.provider_name());
    println!("{:<20} {}", "Endpoint:", config.endpoint());
    println!(
        "{:<20} {}",
        "API Key:",
        if config.api_key().is_some() {
            "Set"
        } else {
            "Not set"
        }
    );
    println!("{:<20} {}", "Current Model:", config.model());
    println!("{:<20} {:.2}", "Temperature:", config.temperature());

    if *config.provider() != LlmProvider::Ollama {
        println!(
            "\n{} Model listing is only supported for Ollama",
            style("·").dim()
        );
        return Ok(());
    }

    if !client.is_available().await {
        println!("\n{} {}", style("!").yellow(), config.availability_hint());
        return Ok(());
    }

    println!("\n{}", style("Available Models").bold());
    println!("{}", "-".repeat(40));

    match client.list_models().await {
        Ok(models) => {
            if models.is_empty() {
                println!("  No models available");
            } else {
                for model in models {
                    let marker = if model == config.model() {
                        style("*").green().to_string()
                    } else {
                        " ".to_string()
                    };
                    println!("{} {}", marker, model);
                }
            }
        }
        Err(e) => {
            println!("{} Failed to list models: {}", style("✗").red(), e);
        }
    }

    Ok(())
}
