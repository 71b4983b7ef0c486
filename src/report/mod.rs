//! CSV product reports.
//!
//! One report per processed PDF, with a cleaning pass that drops unusable
//! rows, deduplicates product names, and scrubs trademark glyphs.

pub mod summary;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One extracted product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Product Name")]
    pub product: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Page Number")]
    pub page: u32,
}

/// Counts from a cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Rows dropped because product or manufacturer was Unknown.
    pub dropped_unknown: usize,
    /// Rows dropped as duplicate product names.
    pub dropped_duplicates: usize,
}

impl CleanStats {
    pub fn total_dropped(&self) -> usize {
        self.dropped_unknown + self.dropped_duplicates
    }
}

/// Write records to a CSV report.
pub fn write_report(path: &Path, records: &[ProductRecord]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        // serialize() emits headers with the first record; keep them for
        // empty reports too.
        writer.write_record(["Product Name", "Manufacturer", "Page Number"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read records back from a CSV report.
pub fn read_report(path: &Path) -> Result<Vec<ProductRecord>, ReportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// Scrub a field: drop replacement/trademark glyphs and trim.
pub fn scrub_field(field: &str) -> String {
    field
        .chars()
        .filter(|c| !matches!(c, '\u{FFFD}' | '®' | '™' | '©'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Clean a record set:
/// 1. Drop rows where product or manufacturer is 'Unknown'
/// 2. Scrub trademark/replacement glyphs from all fields
/// 3. Drop duplicate product names, keeping the first occurrence
pub fn clean_records(records: Vec<ProductRecord>) -> (Vec<ProductRecord>, CleanStats) {
    let mut stats = CleanStats::default();
    let mut seen_products = std::collections::HashSet::new();
    let mut cleaned = Vec::new();

    for record in records {
        if record.product == "Unknown" || record.manufacturer == "Unknown" {
            stats.dropped_unknown += 1;
            continue;
        }

        let record = ProductRecord {
            product: scrub_field(&record.product),
            manufacturer: scrub_field(&record.manufacturer),
            page: record.page,
        };

        if !seen_products.insert(record.product.clone()) {
            stats.dropped_duplicates += 1;
            continue;
        }

        cleaned.push(record);
    }

    (cleaned, stats)
}

/// Clean a CSV report in place.
pub fn clean_file(path: &Path) -> Result<CleanStats, ReportError> {
    let records = read_report(path)?;
    let (cleaned, stats) = clean_records(records);
    write_report(path, &cleaned)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(product: &str, manufacturer: &str, page: u32) -> ProductRecord {
        ProductRecord {
            product: product.to_string(),
            manufacturer: manufacturer.to_string(),
            page,
        }
    }

    #[test]
    fn test_scrub_field() {
        assert_eq!(scrub_field("Style 77®"), "Style 77");
        assert_eq!(scrub_field(" CSP\u{FFFD}A390 ™ "), "CSPA390");
        assert_eq!(scrub_field("plain"), "plain");
    }

    #[test]
    fn test_clean_drops_unknown_rows() {
        let (cleaned, stats) = clean_records(vec![
            record("Unknown", "Greenheck", 1),
            record("CSP-A390", "Unknown", 2),
            record("CSP-A390", "Greenheck", 3),
        ]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.dropped_unknown, 2);
        assert_eq!(cleaned[0].page, 3);
    }

    #[test]
    fn test_clean_deduplicates_keeping_first() {
        let (cleaned, stats) = clean_records(vec![
            record("SQ-95", "Greenheck", 2),
            record("SQ-95", "Greenheck", 7),
            record("Style 77", "Victaulic", 9),
        ]);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(stats.dropped_duplicates, 1);
        assert_eq!(cleaned[0].page, 2);
    }

    #[test]
    fn test_clean_dedupe_happens_after_scrub() {
        // "SQ-95®" and "SQ-95" are the same product once scrubbed.
        let (cleaned, stats) = clean_records(vec![
            record("SQ-95®", "Greenheck", 1),
            record("SQ-95", "Greenheck", 2),
        ]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.dropped_duplicates, 1);
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let records = vec![
            record("CSP-A390", "Greenheck", 4),
            record("Style 77", "Victaulic", 9),
        ];
        write_report(&path, &records).unwrap();

        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("Product Name,Manufacturer,Page Number"));

        let read_back = read_report(&path).unwrap();
        assert_eq!(read_back, records);
    }

    #[test]
    fn test_clean_file_rewrites_in_place() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.csv");

        write_report(
            &path,
            &[
                record("Unknown", "Acme", 1),
                record("Fan A", "Acme", 2),
                record("Fan A", "Acme", 3),
            ],
        )
        .unwrap();

        let stats = clean_file(&path).unwrap();
        assert_eq!(stats.total_dropped(), 2);

        let remaining = read_report(&path).unwrap();
        assert_eq!(remaining, vec![record("Fan A", "Acme", 2)]);
    }
}
