//! Configuration management for specsift.
//!
//! Settings come from a TOML file (`--config`, `./specsift.toml`, or
//! `~/.config/specsift/config.toml`, first hit wins); connection details for
//! the vision backend come from environment variables (see `llm::config`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::LlmAppConfig;
use crate::rules::RuleSet;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "specsift.toml";

/// Page extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Percent of page height to crop for the product read.
    #[serde(default = "default_crop_percent")]
    pub crop_percent: u32,
    /// Render resolution for page images.
    #[serde(default = "default_render_dpi")]
    pub render_dpi: u32,
    /// Whether to run the yes/no classification before extraction.
    /// Disabling sends every surviving page straight to extraction.
    #[serde(default = "default_true")]
    pub classify_pages: bool,
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for CSV reports and run summaries.
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// Run the cleaning pass on the report after extraction.
    #[serde(default = "default_true")]
    pub clean: bool,
    /// Write a JSON run summary next to the CSV.
    #[serde(default = "default_true")]
    pub write_summary: bool,
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub llm: LlmAppConfig,
    /// Path to a manufacturer rules JSON file (supports ~ expansion).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<String>,
}

fn default_crop_percent() -> u32 {
    30
}

fn default_render_dpi() -> u32 {
    144
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            crop_percent: default_crop_percent(),
            render_dpi: default_render_dpi(),
            classify_pages: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            clean: true,
            write_summary: true,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when no config file exists.
    ///
    /// An explicit path that does not exist or fails to parse is an error;
    /// discovered paths fail only on parse errors.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            let data = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("Failed to read config {}: {}", path.display(), e)
            })?;
            return Ok(toml::from_str(&data)?);
        }

        for path in Self::discovery_paths() {
            if path.exists() {
                let data = std::fs::read_to_string(&path)?;
                let settings = toml::from_str(&data).map_err(|e| {
                    anyhow::anyhow!("Invalid config {}: {}", path.display(), e)
                })?;
                tracing::info!("Loaded config from {}", path.display());
                return Ok(settings);
            }
        }

        Ok(Self::default())
    }

    /// Candidate config file locations, in priority order.
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("specsift").join("config.toml"));
        }
        paths
    }

    /// Load the manufacturer rules file, if one is configured.
    pub fn load_rules(&self, override_path: Option<&Path>) -> anyhow::Result<RuleSet> {
        let path = match override_path {
            Some(p) => Some(p.to_path_buf()),
            None => self
                .rules_path
                .as_deref()
                .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref())),
        };

        match path {
            Some(path) => RuleSet::load(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load rules from {}: {}", path.display(), e)
            }),
            None => Ok(RuleSet::default()),
        }
    }

    /// A commented skeleton config for `sift init`.
    pub fn skeleton_toml() -> &'static str {
        r#"# specsift configuration

# Path to a manufacturer rules JSON file (optional)
# rules_path = "manufacturers.json"

[extraction]
# Percent of page height cropped for the product name read
crop_percent = 30
# Render resolution for page images
render_dpi = 144
# Ask the model whether a page is a product page before extracting
classify_pages = true

[output]
directory = "results"
clean = true
write_summary = true

[llm]
enabled = true
classify_max_tokens = 10
extract_max_tokens = 200
temperature = 0.1
# classify_prompt = "..."
# extract_prompt = "..."
"#
    }
}
