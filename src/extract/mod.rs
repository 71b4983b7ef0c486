//! Page classification and product extraction.
//!
//! Two vision calls per surviving page: a cheap yes/no classification on the
//! full render, then a product read on the cropped header region.

pub mod region;

use tracing::debug;

use crate::llm::{LlmClient, LlmError};
use crate::models::ProductInfo;
use crate::rules::RuleSet;

/// Ask the model whether a page render shows a product page.
///
/// Anything other than a reply starting with "yes" counts as negative.
pub async fn classify_page(client: &LlmClient, png_bytes: &[u8]) -> Result<bool, LlmError> {
    let prompt = client.config().get_classify_prompt();
    let max_tokens = client.config().app.classify_max_tokens;

    let response = client.ask_about_image(prompt, png_bytes, max_tokens).await?;
    debug!("classification reply: {:?}", response.trim());

    Ok(is_affirmative(&response))
}

/// Extract manufacturer and product names from a cropped header image.
pub async fn extract_products(
    client: &LlmClient,
    cropped_png: &[u8],
    rules: &RuleSet,
) -> Result<ProductInfo, LlmError> {
    let prompt = client.config().get_extract_prompt();
    let max_tokens = client.config().app.extract_max_tokens;

    let response = client
        .ask_about_image(prompt, cropped_png, max_tokens)
        .await?;
    debug!("extraction reply: {:?}", response.trim());

    let mut info = parse_product_info(&response);
    if let Some(canonical) = rules.canonical_manufacturer(&info.manufacturer) {
        info.manufacturer = canonical.to_string();
    }
    Ok(info)
}

/// Interpret a classification reply as yes/no.
pub fn is_affirmative(response: &str) -> bool {
    response
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
        .starts_with("yes")
}

/// Parse the `Manufacturer:` / `Product:` lines of an extraction reply.
///
/// The first `Manufacturer:` line wins; every `Product:` line contributes one
/// product. An empty product list collapses to a single "Unknown" entry.
pub fn parse_product_info(response: &str) -> ProductInfo {
    let mut manufacturer = "Unknown".to_string();
    let mut products = Vec::new();

    for line in response.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Manufacturer:") {
            if manufacturer == "Unknown" {
                let value = clean_name(value);
                if !value.is_empty() {
                    manufacturer = value;
                }
            }
        } else if let Some(value) = line.strip_prefix("Product:") {
            let value = clean_name(value);
            if !value.is_empty() && value != "Unknown" {
                products.push(value);
            }
        }
    }

    if products.is_empty() {
        products.push("Unknown".to_string());
    }

    ProductInfo {
        manufacturer,
        products,
    }
}

/// Normalize a field the model returned: strip brackets and markdown
/// leftovers, collapse runs of whitespace.
fn clean_name(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_matches(|c| matches!(c, '[' | ']' | '*' | '"' | '\''))
        .trim();

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ManufacturerRule;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative(" Yes.\n"));
        assert!(is_affirmative("YES, this is a product page"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("Not a product page"));
        assert!(!is_affirmative(""));
    }

    #[test]
    fn test_parse_single_product() {
        let info = parse_product_info("Manufacturer: Greenheck\nProduct: CSP-A390");
        assert_eq!(info.manufacturer, "Greenheck");
        assert_eq!(info.products, vec!["CSP-A390"]);
    }

    #[test]
    fn test_parse_combined_products() {
        let info = parse_product_info("Manufacturer: Victaulic\nProduct: Style 77 & Style 107");
        assert_eq!(info.products, vec!["Style 77 & Style 107"]);
    }

    #[test]
    fn test_parse_multiple_product_lines() {
        let info =
            parse_product_info("Manufacturer: Acme\nProduct: Fan A\nProduct: Fan B");
        assert_eq!(info.products, vec!["Fan A", "Fan B"]);
    }

    #[test]
    fn test_parse_unknown_product_collapses() {
        let info = parse_product_info("Manufacturer: Acme\nProduct: Unknown");
        assert_eq!(info.manufacturer, "Acme");
        assert_eq!(info.products, vec!["Unknown"]);
    }

    #[test]
    fn test_parse_missing_fields() {
        let info = parse_product_info("I cannot read this image.");
        assert!(info.is_unknown());
    }

    #[test]
    fn test_parse_strips_brackets_and_whitespace() {
        let info = parse_product_info("Manufacturer: [Greenheck]\nProduct:  CSP   A390 ");
        assert_eq!(info.manufacturer, "Greenheck");
        assert_eq!(info.products, vec!["CSP A390"]);
    }

    #[test]
    fn test_parse_first_manufacturer_wins() {
        let info = parse_product_info(
            "Manufacturer: Greenheck\nProduct: X\nManufacturer: Other\nProduct: Y",
        );
        assert_eq!(info.manufacturer, "Greenheck");
        assert_eq!(info.products, vec!["X", "Y"]);
    }

    #[test]
    fn test_extract_normalizes_manufacturer_aliases() {
        let rules = RuleSet {
            manufacturers: vec![ManufacturerRule {
                name: "Greenheck".to_string(),
                aliases: vec!["Greenheck Fan Corp".to_string()],
                skip_terms: vec![],
            }],
            ..Default::default()
        };
        let mut info = parse_product_info("Manufacturer: greenheck fan corp\nProduct: SQ-95");
        if let Some(canonical) = rules.canonical_manufacturer(&info.manufacturer) {
            info.manufacturer = canonical.to_string();
        }
        assert_eq!(info.manufacturer, "Greenheck");
    }
}
