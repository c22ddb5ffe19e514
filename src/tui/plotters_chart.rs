//! Plotters-powered chart widget for Ratatui.
//!
//! One widget draws any `ChartSpec`: line, bar, stacked histogram and box
//! charts go through Plotters (rendered into the Ratatui buffer with
//! `plotters-ratatui-backend`); pie charts are drawn as a proportional legend
//! with plain Ratatui text since the terminal canvas has no wedge primitive.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::analysis::PurposeBox;
use crate::chart::{ChartData, ChartKind, ChartSpec, Rgb};
use crate::report::format::{fmt_thousands, truncate};

/// Render-only view over a chart specification.
pub struct ChartWidget<'a> {
    pub spec: &'a ChartSpec,
}

impl<'a> ChartWidget<'a> {
    pub fn new(spec: &'a ChartSpec) -> Self {
        Self { spec }
    }
}

impl<'a> Widget for ChartWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.spec.data.is_empty() {
            buf.set_string(area.x, area.y, "No data", Style::default().fg(TuiColor::Yellow));
            return;
        }
        if let ChartKind::Pie { .. } = self.spec.kind {
            render_slices(self.spec, area, buf);
            return;
        }

        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TuiColor::Yellow),
            );
            return;
        }

        match &self.spec.data {
            ChartData::Series { .. } => render_series(self.spec, area, buf),
            ChartData::Stacked { edges, groups } => {
                let colors = (0..groups.len()).map(|i| self.spec.series_color(i)).collect();
                let values = groups.iter().map(|g| g.values.clone()).collect();
                render_stacked(self.spec, edges.clone(), values, colors, area, buf)
            }
            ChartData::Boxes { boxes } => render_boxes(self.spec, boxes, area, buf),
            ChartData::Slices { .. } => {}
        }
    }
}

/// Distinct values in first-appearance order.
fn distinct<'b>(values: impl Iterator<Item = &'b str>) -> Vec<&'b str> {
    let mut out: Vec<&str> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// Where each box sits on a purpose axis.
struct BoxSlots {
    /// One label per purpose, in first-appearance order.
    labels: Vec<String>,
    /// Per box: x center and term index.
    positions: Vec<(f64, usize)>,
    /// Width reserved for one term inside a purpose slot.
    slot: f64,
}

fn box_slots(boxes: &[PurposeBox]) -> BoxSlots {
    let purposes = distinct(boxes.iter().map(|b| b.purpose.as_str()));
    let terms = distinct(boxes.iter().map(|b| b.term.as_str()));
    let slot = 0.8 / terms.len().max(1) as f64;

    let positions = boxes
        .iter()
        .map(|b| {
            let p = purposes.iter().position(|x| *x == b.purpose).unwrap_or(0);
            let t = terms.iter().position(|x| *x == b.term).unwrap_or(0);
            (p as f64 - 0.4 + slot * (t as f64 + 0.5), t)
        })
        .collect();

    BoxSlots {
        labels: purposes.into_iter().map(str::to_string).collect(),
        positions,
        slot,
    }
}

/// Compact tick label: `950`, `12k`, `1.5M`.
fn fmt_axis_value(v: f64) -> String {
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if a >= 10_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else if a >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}

/// Category label for a tick at `v`, blank when `v` is not on a category.
fn category_label(labels: &[String], v: f64, width: usize) -> String {
    let i = v.round();
    if (v - i).abs() > 0.05 || i < 0.0 {
        return String::new();
    }
    labels
        .get(i as usize)
        .map(|l| truncate(l, width))
        .unwrap_or_default()
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn tui_color(c: Rgb) -> TuiColor {
    TuiColor::Rgb(c.0, c.1, c.2)
}

/// Pad a value range so the data does not touch the frame.
fn padded(lo: f64, hi: f64, include_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = if include_zero {
        (lo.min(0.0), hi.max(0.0))
    } else {
        (lo, hi)
    };
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let pad = (hi - lo) * 0.05;
    (if include_zero && lo >= 0.0 { 0.0 } else { lo - pad }, hi + pad)
}

/// Line and bar charts: one value per category on an index axis.
fn render_series(spec: &ChartSpec, area: Rect, buf: &mut Buffer) {
    let points = spec.ordered_points();
    let labels: Vec<String> = points.iter().map(|p| p.label.clone()).collect();
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let is_bar = matches!(spec.kind, ChartKind::Bar);
    let color = rgb(spec.series_color(0));
    let markers = spec.markers;

    let n = values.len() as f64;
    let (x0, x1) = if is_bar || values.len() == 1 {
        (-0.5, n - 0.5)
    } else {
        (0.0, n - 1.0)
    };
    let (y_lo, y_hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (y0, y1) = padded(y_lo, y_hi, is_bar);

    let x_ticks = if is_bar { labels.len().min(8) } else { 5 };
    let label_width = if is_bar {
        (area.width as usize / labels.len().max(1)).clamp(3, 12)
    } else {
        10
    };
    let x_desc = spec.x_label.clone();
    let y_desc = spec.y_label.clone();

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 7)
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_desc.as_str())
            .y_desc(y_desc.as_str())
            .x_labels(x_ticks)
            .y_labels(5)
            .x_label_formatter(&|v| category_label(&labels, *v, label_width))
            .y_label_formatter(&|v| fmt_axis_value(*v))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .bold_line_style(&WHITE)
            .draw()?;

        if is_bar {
            chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
                let x = i as f64;
                Rectangle::new([(x - 0.35, 0.0), (x + 0.35, v)], color.filled())
            }))?;
        } else {
            chart.draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                &color,
            ))?;
            if markers {
                // `Circle` radii are mis-scaled by the terminal backend; a
                // `Pixel` gives a clean dot.
                chart.draw_series(
                    values
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| Pixel::new((i as f64, v), WHITE)),
                )?;
            }
        }

        Ok(())
    });

    widget.render(area, buf);
}

/// Stacked histogram: one rectangle per (bin, group), groups stacked in order.
fn render_stacked(
    spec: &ChartSpec,
    edges: Vec<f64>,
    groups: Vec<Vec<f64>>,
    colors: Vec<Rgb>,
    area: Rect,
    buf: &mut Buffer,
) {
    let bins = edges.len().saturating_sub(1);
    if bins == 0 {
        return;
    }
    let totals: Vec<f64> = (0..bins)
        .map(|b| groups.iter().map(|g| g.get(b).copied().unwrap_or(0.0)).sum())
        .collect();
    let y_hi = totals.iter().copied().fold(0.0_f64, f64::max);
    let (y0, y1) = padded(0.0, y_hi, true);
    let (x0, x1) = (edges[0], edges[bins]);
    let x_desc = spec.x_label.clone();
    let y_desc = spec.y_label.clone();

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 7)
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_desc.as_str())
            .y_desc(y_desc.as_str())
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&|v| fmt_axis_value(*v))
            .y_label_formatter(&|v| fmt_axis_value(*v))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .bold_line_style(&WHITE)
            .draw()?;

        let mut base = vec![0.0_f64; bins];
        for (g, values) in groups.iter().enumerate() {
            let color = rgb(colors[g % colors.len().max(1)]);
            let mut bars = Vec::with_capacity(bins);
            for b in 0..bins {
                let v = values.get(b).copied().unwrap_or(0.0);
                if v > 0.0 {
                    bars.push(Rectangle::new(
                        [(edges[b], base[b]), (edges[b + 1], base[b] + v)],
                        color.filled(),
                    ));
                }
                base[b] += v;
            }
            chart.draw_series(bars)?;
        }

        Ok(())
    });

    widget.render(area, buf);
}

/// Box plot: box from q1 to q3, median line, whiskers and outlier dots.
///
/// Each purpose gets one x slot; its term boxes sit side by side inside it.
fn render_boxes(spec: &ChartSpec, boxes: &[PurposeBox], area: Rect, buf: &mut Buffer) {
    let layout = box_slots(boxes);
    let shapes: Vec<(f64, f64, f64, f64, f64, f64, Vec<f64>, RGBColor)> = boxes
        .iter()
        .zip(&layout.positions)
        .map(|(b, &(x, t))| {
            (
                x,
                b.lower_whisker,
                b.q1,
                b.median,
                b.q3,
                b.upper_whisker,
                b.outliers.clone(),
                rgb(spec.series_color(t)),
            )
        })
        .collect();
    let labels = layout.labels;
    let half = layout.slot * 0.4;

    let (y_lo, y_hi) = boxes.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
        (lo.min(b.min), hi.max(b.max))
    });
    let (y0, y1) = padded(y_lo, y_hi, false);
    let (x0, x1) = (-0.5, labels.len() as f64 - 0.5);
    let x_ticks = labels.len().min(8);
    let label_width = (area.width as usize / x_ticks.max(1)).clamp(3, 12);
    let x_desc = spec.x_label.clone();
    let y_desc = spec.y_label.clone();

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 7)
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_desc.as_str())
            .y_desc(y_desc.as_str())
            .x_labels(x_ticks)
            .y_labels(5)
            .x_label_formatter(&|v| category_label(&labels, *v, label_width))
            .y_label_formatter(&|v| fmt_axis_value(*v))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .bold_line_style(&WHITE)
            .draw()?;

        for (x, lw, q1, median, q3, uw, outliers, color) in &shapes {
            let (x, color) = (*x, *color);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - half, *q1), (x + half, *q3)],
                color,
            )))?;
            chart.draw_series([
                PathElement::new(vec![(x - half, *median), (x + half, *median)], color),
                PathElement::new(vec![(x, *lw), (x, *q1)], color),
                PathElement::new(vec![(x, *q3), (x, *uw)], color),
                PathElement::new(vec![(x - half / 2.0, *lw), (x + half / 2.0, *lw)], color),
                PathElement::new(vec![(x - half / 2.0, *uw), (x + half / 2.0, *uw)], color),
            ])?;
            chart.draw_series(outliers.iter().map(|&y| Pixel::new((x, y), color)))?;
        }

        Ok(())
    });

    widget.render(area, buf);
}

/// Pie/donut as one line per slice: swatch, name, share bar, percent and value.
fn render_slices(spec: &ChartSpec, area: Rect, buf: &mut Buffer) {
    let slices = spec.ordered_points();
    let total: f64 = slices.iter().map(|s| s.value).sum();
    let name_width = slices.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
    let bar_width = (area.width as usize).saturating_sub(name_width + 24).max(4);

    let mut lines = Vec::with_capacity(slices.len() * 2);
    for (i, slice) in slices.iter().enumerate() {
        let share = if total > 0.0 { slice.value / total } else { 0.0 };
        let color = tui_color(spec.series_color(i));
        let filled = (share * bar_width as f64).round() as usize;
        let info = format!("{:.1}% ({})", share * 100.0, fmt_thousands(slice.value, 0));

        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::styled(
                format!("{:<name_width$} ", slice.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::styled(
                "░".repeat(bar_width - filled.min(bar_width)),
                Style::default().fg(TuiColor::DarkGray),
            ),
            Span::raw(format!(" {info}")),
        ]));
        lines.push(Line::raw(""));
    }

    Paragraph::new(lines).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::LoanTable;
    use crate::analysis::test_support::dated;
    use crate::chart::{DataPoint, line_chart, pie_chart};
    use crate::dashboard::render;
    use crate::domain::LoanCondition;
    use crate::state::DashboardState;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn empty_chart_shows_hint() {
        let spec = line_chart("t", Vec::new(), "x", "y");
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        ChartWidget::new(&spec).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("No data"));
    }

    #[test]
    fn tiny_area_shows_resize_hint() {
        let spec = line_chart("t", vec![DataPoint::new("a", 1.0)], "x", "y");
        let area = Rect::new(0, 0, 50, 4);
        let mut buf = Buffer::empty(area);
        ChartWidget::new(&spec).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("too small"));
    }

    #[test]
    fn pie_lists_slices_with_share_and_count() {
        let spec = pie_chart(
            "p",
            vec![DataPoint::new("Good Loan", 3.0), DataPoint::new("Bad Loan", 1.0)],
            0.4,
        );
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        ChartWidget::new(&spec).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Good Loan"));
        assert!(text.contains("75.0% (3)"));
        assert!(text.contains("25.0% (1)"));
    }

    fn sample_table() -> LoanTable {
        let purposes = ["debt consolidation", "credit card", "car"];
        let rows = (0..60)
            .map(|i| {
                let condition = if i % 4 == 0 { LoanCondition::Bad } else { LoanCondition::Good };
                let mut r = dated(&i.to_string(), 1000.0 + 450.0 * i as f64, (2015, 1 + i % 12, 1 + i % 27));
                r.loan_condition = condition;
                r.term = if i % 3 == 0 { "60 months" } else { "36 months" }.to_string();
                r.purpose = Some(purposes[i as usize % purposes.len()].to_string());
                r
            })
            .collect();
        LoanTable::new(rows)
    }

    #[test]
    fn every_dashboard_panel_draws() {
        let table = sample_table();
        for condition in LoanCondition::ALL {
            let dashboard = render(&DashboardState::with_condition(condition), &table);
            let panels = dashboard
                .overview
                .iter()
                .chain(&dashboard.performance)
                .chain(&dashboard.by_condition);

            for panel in panels {
                let area = Rect::new(0, 0, 80, 20);
                let mut buf = Buffer::empty(area);
                ChartWidget::new(&panel.chart).render(area, &mut buf);

                let drawn = buf.content.iter().filter(|c| c.symbol() != " ").count();
                assert!(drawn > 50, "{} drew only {drawn} cells", panel.chart.title);
                let text = buffer_text(&buf);
                assert!(!text.contains("No data"), "{} is empty", panel.chart.title);
                assert!(!text.contains("too small"));
            }
        }
    }

    #[test]
    fn term_boxes_share_their_purpose_slot() {
        let table = sample_table();
        let boxes = table.subset(LoanCondition::Good).box_stats_by_purpose();
        let layout = box_slots(&boxes);

        assert_eq!(layout.labels, vec!["credit card", "car", "debt consolidation"]);
        assert_eq!(layout.positions.len(), boxes.len());
        for (b, (x, _)) in boxes.iter().zip(&layout.positions) {
            let slot = layout.labels.iter().position(|l| *l == b.purpose).unwrap() as f64;
            assert!((x - slot).abs() < 0.4, "{} at {x}", b.purpose);
        }
        let terms: Vec<_> = layout.positions.iter().map(|(_, t)| *t).collect();
        assert!(terms.contains(&0) && terms.contains(&1));
    }

    #[test]
    fn axis_values_are_compact() {
        assert_eq!(fmt_axis_value(950.0), "950");
        assert_eq!(fmt_axis_value(1500.0), "1.5k");
        assert_eq!(fmt_axis_value(35_000.0), "35k");
        assert_eq!(fmt_axis_value(2_500_000.0), "2.5M");
    }

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = vec!["Monday".to_string(), "Tuesday".to_string()];
        assert_eq!(category_label(&labels, 1.0, 12), "Tuesday");
        assert_eq!(category_label(&labels, 0.5, 12), "");
        assert_eq!(category_label(&labels, 5.0, 12), "");
    }
}
