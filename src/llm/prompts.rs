//! Default vision prompts for page classification and product extraction.

/// Default prompt for deciding whether a page is a product page.
pub const DEFAULT_CLASSIFY_PROMPT: &str = r#"You are looking at one page of a construction submittal package. Decide whether this page presents a product. Look for:
- Product diagrams, photos, or cutaway drawings
- A manufacturer name with model designations

Return exactly 'yes' if this is a product page, 'no' if it is not. No other words."#;

/// Default prompt for reading manufacturer and product names from the
/// cropped top region of a product page.
pub const DEFAULT_EXTRACT_PROMPT: &str = r#"Look at the top portion of this product page and identify:
1. The manufacturer name (usually the largest text at the top)
2. The product name(s) (usually the second largest text)

If the product name is not noticeably larger than the surrounding text, it is not the product name; return 'Unknown' for the product in that case.

If the page presents multiple products together, return them as one combined product. If it says A & B, answer in the A & B format.

Return the information in this exact format, one line each:
Manufacturer: [name]
Product: [name] or Product: [name1] & [name2]

Use only alphanumeric characters and spaces in the names. If you cannot identify a field, use 'Unknown' for it."#;
