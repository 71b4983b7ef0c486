//! Domain models for page dispositions and extracted products.

use serde::{Deserialize, Serialize};

/// Why a page was excluded before any model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Transmittal/cover boilerplate: mentions "submittal" with no model info.
    TransmittalBoilerplate,
    /// Bill-of-materials page.
    BillOfMaterials,
    /// Matched a skip term from the manufacturer rules file.
    RuleTerm(String),
    /// Dropped because the per-document page limit was reached.
    PageLimit,
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            Self::TransmittalBoilerplate => {
                "contains 'submittal' but no 'model'".to_string()
            }
            Self::BillOfMaterials => "contains a bill of materials".to_string(),
            Self::RuleTerm(term) => format!("matched rule term '{}'", term),
            Self::PageLimit => "page limit reached".to_string(),
        }
    }
}

/// Pre-filter verdict for a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageDisposition {
    /// Page passes the pre-filter and is sent to the vision model.
    Process,
    /// Page is excluded without a model call.
    Skip(SkipReason),
}

/// Final outcome of a page after the full pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Excluded by the pre-filter.
    Skipped(SkipReason),
    /// Classified as not a product page.
    NotProductPage,
    /// Products extracted from the page header region.
    Extracted { products: usize },
    /// Page processing failed; the rest of the document continues.
    Failed(String),
}

impl PageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped(_) => "skipped",
            Self::NotProductPage => "not_product_page",
            Self::Extracted { .. } => "extracted",
            Self::Failed(_) => "failed",
        }
    }

    /// Human-readable detail for summaries and logs, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Skipped(reason) => Some(reason.describe()),
            Self::Failed(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

/// Manufacturer and product names read from a page header region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub manufacturer: String,
    pub products: Vec<String>,
}

impl ProductInfo {
    /// A result with nothing identified.
    pub fn unknown() -> Self {
        Self {
            manufacturer: "Unknown".to_string(),
            products: vec!["Unknown".to_string()],
        }
    }

    /// True when neither field carries information.
    pub fn is_unknown(&self) -> bool {
        self.manufacturer == "Unknown" && self.products.iter().all(|p| p == "Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_describe() {
        assert!(SkipReason::TransmittalBoilerplate
            .describe()
            .contains("submittal"));
        assert_eq!(
            SkipReason::RuleTerm("warranty".to_string()).describe(),
            "matched rule term 'warranty'"
        );
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(PageOutcome::NotProductPage.as_str(), "not_product_page");
        assert_eq!(PageOutcome::Extracted { products: 2 }.as_str(), "extracted");
        assert!(PageOutcome::NotProductPage.detail().is_none());
        assert!(PageOutcome::Failed("boom".into()).detail().is_some());
    }

    #[test]
    fn test_product_info_unknown() {
        assert!(ProductInfo::unknown().is_unknown());
        let info = ProductInfo {
            manufacturer: "Unknown".to_string(),
            products: vec!["AHU-1".to_string()],
        };
        assert!(!info.is_unknown());
    }
}
