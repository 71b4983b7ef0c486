//! Text pre-filter for submittal pages.
//!
//! Runs before any model call on the pdftotext output of a page. Submittal
//! packages are padded with transmittal sheets, bills of material, and other
//! boilerplate that would otherwise waste vision-model requests.

use regex::Regex;

use crate::models::{PageDisposition, SkipReason};
use crate::rules::RuleSet;

/// Page-text pre-filter.
pub struct Prefilter {
    rules: RuleSet,
    bom_word: Regex,
}

impl Prefilter {
    pub fn new(rules: RuleSet) -> Self {
        // Word-bounded so terms like "bombproof" don't match.
        let bom_word = Regex::new(r"\bbom\b").expect("BOM regex should compile");
        Self { rules, bom_word }
    }

    /// Decide whether a page should reach the vision model.
    pub fn assess(&self, page_text: &str) -> PageDisposition {
        let text = page_text.to_lowercase();

        // Keep terms from the rules file override every skip heuristic.
        if self
            .rules
            .keep_terms
            .iter()
            .any(|term| text.contains(&term.to_lowercase()))
        {
            return PageDisposition::Process;
        }

        // Transmittal/cover sheets name the submittal but no model numbers.
        if text.contains("submittal") && !text.contains("model") {
            return PageDisposition::Skip(SkipReason::TransmittalBoilerplate);
        }

        if text.contains("bill of material") || self.bom_word.is_match(&text) {
            return PageDisposition::Skip(SkipReason::BillOfMaterials);
        }

        for term in self.rules.all_skip_terms() {
            if text.contains(&term.to_lowercase()) {
                return PageDisposition::Skip(SkipReason::RuleTerm(term.to_string()));
            }
        }

        PageDisposition::Process
    }
}

impl Default for Prefilter {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ManufacturerRule;

    #[test]
    fn test_plain_product_page_passes() {
        let filter = Prefilter::default();
        let text = "Greenheck Model CSP-A390 ceiling exhaust fan";
        assert_eq!(filter.assess(text), PageDisposition::Process);
    }

    #[test]
    fn test_submittal_without_model_is_skipped() {
        let filter = Prefilter::default();
        assert_eq!(
            filter.assess("SUBMITTAL TRANSMITTAL COVER SHEET"),
            PageDisposition::Skip(SkipReason::TransmittalBoilerplate)
        );
    }

    #[test]
    fn test_submittal_with_model_passes() {
        let filter = Prefilter::default();
        assert_eq!(
            filter.assess("Submittal data for Model ABC-123"),
            PageDisposition::Process
        );
    }

    #[test]
    fn test_bill_of_materials_is_skipped() {
        let filter = Prefilter::default();
        assert_eq!(
            filter.assess("Bill of Material for assembly 42"),
            PageDisposition::Skip(SkipReason::BillOfMaterials)
        );
        assert_eq!(
            filter.assess("See BOM on sheet 3"),
            PageDisposition::Skip(SkipReason::BillOfMaterials)
        );
    }

    #[test]
    fn test_bom_requires_word_boundary() {
        let filter = Prefilter::default();
        assert_eq!(
            filter.assess("bombproof enclosure, model X"),
            PageDisposition::Process
        );
    }

    #[test]
    fn test_rule_skip_terms() {
        let rules = RuleSet {
            skip_terms: vec!["Warranty Certificate".to_string()],
            ..Default::default()
        };
        let filter = Prefilter::new(rules);
        assert_eq!(
            filter.assess("Extended warranty certificate enclosed"),
            PageDisposition::Skip(SkipReason::RuleTerm("Warranty Certificate".to_string()))
        );
    }

    #[test]
    fn test_manufacturer_skip_terms_apply() {
        let rules = RuleSet {
            manufacturers: vec![ManufacturerRule {
                name: "Greenheck".to_string(),
                aliases: vec![],
                skip_terms: vec!["installation manual".to_string()],
            }],
            ..Default::default()
        };
        let filter = Prefilter::new(rules);
        assert_eq!(
            filter.assess("Greenheck Installation Manual"),
            PageDisposition::Skip(SkipReason::RuleTerm("installation manual".to_string()))
        );
    }

    #[test]
    fn test_keep_terms_override_skips() {
        let rules = RuleSet {
            keep_terms: vec!["fan schedule".to_string()],
            ..Default::default()
        };
        let filter = Prefilter::new(rules);
        assert_eq!(
            filter.assess("Submittal fan schedule (no model numbers)"),
            PageDisposition::Process
        );
    }
}
