//! Number formatting and the plain-text dashboard report.
//!
//! Formatting lives in one place so metric strings look identical in the TUI,
//! the text report, and the JSON chart specs.

use crate::chart::{ChartData, ChartKind, ChartSpec};
use crate::dashboard::{Dashboard, Panel};

/// Round to `decimals` places and group the integer part with commas.
///
/// `fmt_thousands(1234567.891, 2)` -> `1,234,567.89`
pub fn fmt_thousands(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    let raw = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // `-0` after rounding prints as `0`.
    let negative = v < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Whole-dollar amount, e.g. `$1,234`.
pub fn fmt_money(v: f64) -> String {
    let s = fmt_thousands(v, 0);
    match s.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${s}"),
    }
}

/// Percentage with two decimals, e.g. `13.25%`.
pub fn fmt_percent(v: f64) -> String {
    format!("{}%", fmt_thousands(v, 2))
}

/// Format the full dashboard as plain text.
pub fn format_dashboard(dashboard: &Dashboard, source: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", dashboard.title));
    out.push_str(&format!("Source: {source}\n\n"));

    for m in &dashboard.metrics {
        out.push_str(&format!("{:<24} {:>18}\n", m.label, m.value));
    }

    out.push_str("\n--- Time-Based Analysis ---\n");
    for panel in &dashboard.overview {
        out.push_str(&format_panel(panel));
    }

    out.push_str("\n--- Loan Performance ---\n");
    for panel in &dashboard.performance {
        out.push_str(&format_panel(panel));
    }

    out.push_str(&format!(
        "\n--- Financial Analysis (condition: {}) ---\n",
        dashboard.condition
    ));
    for panel in &dashboard.by_condition {
        out.push_str(&format_panel(panel));
    }

    out
}

/// Format one chart's data as a table under its heading.
pub fn format_panel(panel: &Panel) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n[{}] {}\n", panel.heading, panel.chart.title));

    if panel.chart.data.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    match &panel.chart.data {
        ChartData::Series { .. } => out.push_str(&format_series(&panel.chart)),
        ChartData::Slices { .. } => out.push_str(&format_slices(&panel.chart)),
        ChartData::Stacked { edges, groups } => {
            out.push_str(&format_stacked(&panel.chart, edges, groups))
        }
        ChartData::Boxes { boxes } => {
            out.push_str(&table_header(
                &[("purpose", 24), ("term", 12), ("n", 6), ("min", 10), ("q1", 10), ("median", 10), ("q3", 10), ("max", 10), ("outliers", 8)],
            ));
            for b in boxes {
                out.push_str(
                    format!(
                        "{:<24} {:<12} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8}\n",
                        truncate(&b.purpose, 24),
                        truncate(&b.term, 12),
                        b.n,
                        fmt_thousands(b.min, 0),
                        fmt_thousands(b.q1, 0),
                        fmt_thousands(b.median, 0),
                        fmt_thousands(b.q3, 0),
                        fmt_thousands(b.max, 0),
                        b.outliers.len(),
                    )
                    .trim_end(),
                );
                out.push('\n');
            }
        }
    }

    out
}

fn format_series(spec: &ChartSpec) -> String {
    let mut out = table_header(&[(spec.x_label.as_str(), 24), (spec.y_label.as_str(), 18)]);
    for p in spec.ordered_points() {
        out.push_str(&format!("{:<24} {:>18}\n", truncate(&p.label, 24), fmt_thousands(p.value, 0)));
    }
    out
}

fn format_slices(spec: &ChartSpec) -> String {
    let points = spec.ordered_points();
    let total: f64 = points.iter().map(|p| p.value).sum();
    let show_percent = matches!(spec.kind, ChartKind::Pie { .. }) && total > 0.0;

    let mut out = table_header(&[("category", 24), ("value", 18), ("percent", 8)]);
    for p in points {
        let pct = if show_percent {
            format!("{:.1}%", p.value / total * 100.0)
        } else {
            String::new()
        };
        out.push_str(
            format!("{:<24} {:>18} {:>8}\n", truncate(&p.label, 24), fmt_thousands(p.value, 0), pct)
                .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn format_stacked(spec: &ChartSpec, edges: &[f64], groups: &[crate::chart::StackGroup]) -> String {
    let mut columns: Vec<(&str, usize)> = vec![(spec.x_label.as_str(), 24)];
    columns.extend(groups.iter().map(|g| (g.name.as_str(), 12)));
    let mut out = table_header(&columns);

    for (i, w) in edges.windows(2).enumerate() {
        let range = format!("{}-{}", fmt_thousands(w[0], 0), fmt_thousands(w[1], 0));
        let mut line = format!("{range:<24}");
        for g in groups {
            let v = g.values.get(i).copied().unwrap_or(0.0);
            line.push_str(&format!(" {:>12}", fmt_thousands(v, 0)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn table_header(columns: &[(&str, usize)]) -> String {
    let names: Vec<String> = columns
        .iter()
        .map(|(name, width)| format!("{:<width$}", truncate(name, *width)))
        .collect();
    let rules: Vec<String> = columns.iter().map(|(_, width)| "-".repeat(*width)).collect();
    format!("{}\n{}\n", names.join(" ").trim_end(), rules.join(" "))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
