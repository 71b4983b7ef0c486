//! Pre-filter + rules file integration.
//!
//! Loads a rules file from disk the way the extract command does and checks
//! the combined page dispositions.

use specsift::config::Settings;
use specsift::models::{PageDisposition, SkipReason};
use specsift::prefilter::Prefilter;
use tempfile::TempDir;

const RULES_JSON: &str = r#"{
    "skip_terms": ["transmittal log"],
    "keep_terms": ["pump schedule"],
    "manufacturers": [
        {
            "name": "Bell & Gossett",
            "aliases": ["Bell and Gossett", "B&G"],
            "skip_terms": ["seminar announcement"]
        }
    ]
}"#;

fn load_filter(dir: &TempDir) -> Prefilter {
    let path = dir.path().join("manufacturers.json");
    std::fs::write(&path, RULES_JSON).unwrap();

    let settings = Settings::default();
    let rules = settings.load_rules(Some(path.as_path())).unwrap();
    Prefilter::new(rules)
}

#[test]
fn built_in_heuristics_still_apply_with_rules_loaded() {
    let dir = TempDir::new().unwrap();
    let filter = load_filter(&dir);

    assert_eq!(
        filter.assess("SUBMITTAL COVER SHEET - Project 230000"),
        PageDisposition::Skip(SkipReason::TransmittalBoilerplate)
    );
    assert_eq!(
        filter.assess("Series e-90 pump, Model 2BB"),
        PageDisposition::Process
    );
}

#[test]
fn rules_file_terms_extend_the_skip_list() {
    let dir = TempDir::new().unwrap();
    let filter = load_filter(&dir);

    assert_eq!(
        filter.assess("Transmittal Log, revision C"),
        PageDisposition::Skip(SkipReason::RuleTerm("transmittal log".to_string()))
    );
    assert_eq!(
        filter.assess("Bell & Gossett seminar announcement"),
        PageDisposition::Skip(SkipReason::RuleTerm("seminar announcement".to_string()))
    );
}

#[test]
fn keep_terms_win_over_built_in_skips() {
    let dir = TempDir::new().unwrap();
    let filter = load_filter(&dir);

    // "submittal" with no "model" would normally be skipped.
    assert_eq!(
        filter.assess("Submittal: pump schedule for building A"),
        PageDisposition::Process
    );
}

#[test]
fn aliases_resolve_to_canonical_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manufacturers.json");
    std::fs::write(&path, RULES_JSON).unwrap();

    let rules = Settings::default().load_rules(Some(path.as_path())).unwrap();
    assert_eq!(
        rules.canonical_manufacturer("b&g"),
        Some("Bell & Gossett")
    );
    assert_eq!(
        rules.canonical_manufacturer("BELL AND GOSSETT"),
        Some("Bell & Gossett")
    );
    assert_eq!(rules.canonical_manufacturer("Grundfos"), None);
}
