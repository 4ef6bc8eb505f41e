//! Plain-text rendering of result tables.
//!
//! Column widths are measured in terminal cells so that emoji and CJK labels
//! line up with ASCII ones.

use unicode_width::UnicodeWidthStr;

use crate::models::{Cell, Report, Table};

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use chat_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Text shown for a single cell.
pub fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Count(n) => format_count(*n),
        Cell::Missing => "-".to_string(),
    }
}

/// Render a report as its title followed by an aligned table.
///
/// When `top` is set only the first `top` rows are printed and a trailing
/// line reports how many were left out.
pub fn render_report(report: &Report, top: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&report.title);
    out.push('\n');
    out.push_str(&render_table(&report.table, top));
    out
}

/// Render `table` with left-aligned labels and right-aligned counts.
pub fn render_table(table: &Table, top: Option<usize>) -> String {
    let shown = top.unwrap_or(table.rows.len()).min(table.rows.len());
    let body: Vec<Vec<(String, bool)>> = table.rows[..shown]
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| (format_cell(cell), matches!(cell, Cell::Text(_))))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.width()).collect();
    for row in &body {
        for (i, (text, _)) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(text.width());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<(String, bool)> = table.columns.iter().map(|c| (c.clone(), true)).collect();
    push_line(&mut out, &header, &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"─".repeat(rule_len));
    out.push('\n');
    for row in &body {
        push_line(&mut out, row, &widths);
    }

    let hidden = table.rows.len() - shown;
    if hidden > 0 {
        out.push_str(&format!("… {} more rows\n", format_count(hidden as u64)));
    }
    out
}

fn push_line(out: &mut String, cells: &[(String, bool)], widths: &[usize]) {
    let mut parts = Vec::with_capacity(cells.len());
    for (i, (text, left)) in cells.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(0);
        let pad = " ".repeat(width.saturating_sub(text.width()));
        if *left {
            parts.push(format!("{}{}", text, pad));
        } else {
            parts.push(format!("{}{}", pad, text));
        }
    }
    out.push_str(parts.join("  ").trim_end());
    out.push('\n');
}

/// Insert thousands separators into a string of digits.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
