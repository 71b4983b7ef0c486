//! Manufacturer rules file.
//!
//! An optional JSON file tunes the pre-filter and normalizes manufacturer
//! names. Terms are matched case-insensitively against page text.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid rules file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rules for a single manufacturer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerRule {
    /// Canonical manufacturer name used in the report.
    pub name: String,
    /// Alternative spellings the model may return.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Extra page-text terms that exclude a page for this manufacturer.
    #[serde(default)]
    pub skip_terms: Vec<String>,
}

/// The full rules file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Page-text terms that exclude a page regardless of manufacturer.
    #[serde(default)]
    pub skip_terms: Vec<String>,
    /// Page-text terms that force a page through the pre-filter.
    #[serde(default)]
    pub keep_terms: Vec<String>,
    /// Per-manufacturer instructions.
    #[serde(default)]
    pub manufacturers: Vec<ManufacturerRule>,
}

impl RuleSet {
    /// Load rules from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// All skip terms: global ones plus every manufacturer's.
    pub fn all_skip_terms(&self) -> impl Iterator<Item = &str> {
        self.skip_terms
            .iter()
            .map(String::as_str)
            .chain(
                self.manufacturers
                    .iter()
                    .flat_map(|m| m.skip_terms.iter().map(String::as_str)),
            )
    }

    /// Resolve a manufacturer name the model returned to its canonical form.
    ///
    /// Matches the canonical name and aliases case-insensitively.
    pub fn canonical_manufacturer(&self, raw: &str) -> Option<&str> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        for rule in &self.manufacturers {
            if rule.name.to_lowercase() == needle {
                return Some(&rule.name);
            }
            if rule
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase() == needle)
            {
                return Some(&rule.name);
            }
        }
        None
    }

    /// An example rules file for `sift init`.
    pub fn example() -> Self {
        Self {
            skip_terms: vec!["warranty certificate".to_string()],
            keep_terms: vec![],
            manufacturers: vec![ManufacturerRule {
                name: "Greenheck".to_string(),
                aliases: vec!["Greenheck Fan Corporation".to_string()],
                skip_terms: vec!["installation manual".to_string()],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RuleSet {
        serde_json::from_str(
            r#"{
                "skip_terms": ["warranty"],
                "keep_terms": ["fan schedule"],
                "manufacturers": [
                    {
                        "name": "Greenheck",
                        "aliases": ["Greenheck Fan Corporation", "GREENHECK FAN CORP"],
                        "skip_terms": ["installation manual"]
                    },
                    { "name": "Victaulic" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_with_defaults() {
        let rules: RuleSet = serde_json::from_str(r#"{ "skip_terms": ["x"] }"#).unwrap();
        assert_eq!(rules.skip_terms, vec!["x"]);
        assert!(rules.keep_terms.is_empty());
        assert!(rules.manufacturers.is_empty());
    }

    #[test]
    fn test_all_skip_terms_includes_manufacturer_terms() {
        let rules = sample();
        let terms: Vec<&str> = rules.all_skip_terms().collect();
        assert_eq!(terms, vec!["warranty", "installation manual"]);
    }

    #[test]
    fn test_canonical_manufacturer_by_alias() {
        let rules = sample();
        assert_eq!(
            rules.canonical_manufacturer("greenheck fan corporation"),
            Some("Greenheck")
        );
        assert_eq!(rules.canonical_manufacturer("Victaulic"), Some("Victaulic"));
        assert_eq!(rules.canonical_manufacturer("Acme"), None);
        assert_eq!(rules.canonical_manufacturer("  "), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RuleSet::load(Path::new("/nonexistent/rules.json"));
        assert!(matches!(err, Err(RulesError::Io(_))));
    }
}
