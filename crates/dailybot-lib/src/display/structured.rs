//! Structured output layout (tables, key-value panels)
//!
//! Layout is computed on plain text so widths stay correct; styling is
//! applied by the caller after padding.

use console::{measure_text_width, pad_str, truncate_str, Alignment};
use std::cmp;

/// Column separator
const SEPARATOR: &str = " | ";

/// Column widths for `headers` and `rows`, shrunk to fit `max_width`
pub fn column_widths(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> Vec<usize> {
    let num_cols = cmp::max(
        headers.len(),
        rows.iter().map(Vec::len).max().unwrap_or(0),
    );
    if num_cols == 0 {
        return Vec::new();
    }

    let mut widths = vec![0; num_cols];
    for (i, header) in headers.iter().enumerate() {
        widths[i] = cmp::max(widths[i], measure_text_width(header));
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = cmp::max(widths[i], measure_text_width(cell));
        }
    }

    let total: usize = widths.iter().sum::<usize>() + (num_cols - 1) * SEPARATOR.len();
    if total > max_width {
        // shrink the widest column first, never below its header
        let mut excess = total - max_width;
        while excess > 0 {
            let Some((idx, _)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            let floor = headers.get(idx).map_or(3, |h| cmp::max(3, measure_text_width(h)));
            if widths[idx] <= floor {
                break;
            }
            widths[idx] -= 1;
            excess -= 1;
        }
    }

    widths
}

/// One table line with cells padded or truncated to `widths`
pub fn format_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map_or("", |c| c.as_ref());
            let fitted = truncate_str(cell, *width, "...");
            pad_str(&fitted, *width, Alignment::Left, None).into_owned()
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
        .trim_end()
        .to_string()
}

/// Dashed line under the header
pub fn format_separator(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-")
}

/// Table lines: header, separator, rows
pub fn format_table(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> Vec<String> {
    let widths = column_widths(headers, rows, max_width);
    if widths.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    if !headers.is_empty() {
        lines.push(format_row(headers, &widths));
        lines.push(format_separator(&widths));
    }
    lines.extend(rows.iter().map(|row| format_row(row, &widths)));
    lines
}

/// `key  value` lines with keys padded to a common width
pub fn format_properties(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    let key_width = pairs
        .iter()
        .map(|(key, _)| measure_text_width(key))
        .max()
        .unwrap_or(0);

    pairs
        .iter()
        .map(|(key, value)| {
            (
                pad_str(key, key_width, Alignment::Left, None).into_owned(),
                value.to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    include!("structured.test.rs");
}
