//! Extraction of recognized config lines from decoded payload text.

use crate::line::ConfigLine;

/// Scan `text` line by line and keep recognized config URIs in encounter
/// order, at most `cap` per call. The cap bounds downstream work from any
/// single oversized source.
pub fn extract_configs(text: &str, cap: usize) -> Vec<ConfigLine> {
    text.lines()
        .filter_map(ConfigLine::parse)
        .take(cap)
        .collect()
}
