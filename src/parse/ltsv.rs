//! LTSV (Labeled Tab-Separated Values) line splitting.

use std::collections::HashMap;

/// Splits one LTSV line into label/value pairs.
///
/// Fields without a `:` separator are dropped; a repeated label keeps the
/// last value. Trailing line endings are trimmed.
pub fn parse_line(line: &str) -> HashMap<&str, &str> {
    line.trim_end_matches(&['\r', '\n'][..])
        .split('\t')
        .filter_map(|field| field.split_once(':'))
        .collect()
}
