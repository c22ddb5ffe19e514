//! Declarative chart specifications.
//!
//! A `ChartSpec` fully describes one chart: its data, chart kind, axis and
//! color labels, theme and legend visibility. The builders in this module only
//! copy aggregate values into a spec; drawing is left to whichever renderer
//! consumes it (the TUI widget, or JSON for external tools).

use serde::Serialize;

use crate::analysis::{HistogramBins, PurposeBox};

pub mod theme;

pub use theme::{DARK_SLATE_BLUE, Rgb, TOMATO, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    /// Slices are labelled with their percent share and value.
    Pie { hole: f64 },
    Histogram { nbins: usize },
    Box,
}

/// One labelled value (a category or a date rendered as text).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A named group of per-bin values in a stacked histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackGroup {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ChartData {
    Series { points: Vec<DataPoint> },
    Slices { slices: Vec<DataPoint> },
    Stacked { edges: Vec<f64>, groups: Vec<StackGroup> },
    Boxes { boxes: Vec<PurposeBox> },
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Series { points } => points.is_empty(),
            ChartData::Slices { slices } => slices.iter().all(|s| s.value == 0.0),
            ChartData::Stacked { groups, .. } => groups.is_empty(),
            ChartData::Boxes { boxes } => boxes.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    /// Label of the color channel (e.g. `Loan Term`), when one is bound.
    pub color_label: Option<String>,
    pub theme: Theme,
    pub show_legend: bool,
    pub markers: bool,
    /// Preferred category order on the x axis.
    pub category_order: Option<Vec<String>>,
    /// Explicit series colors; empty means the theme colorway.
    pub palette: Vec<Rgb>,
    pub data: ChartData,
}

impl ChartSpec {
    fn new(title: &str, kind: ChartKind, data: ChartData) -> Self {
        Self {
            title: title.to_string(),
            kind,
            x_label: String::new(),
            y_label: String::new(),
            color_label: None,
            theme: Theme::Seaborn,
            show_legend: false,
            markers: false,
            category_order: None,
            palette: Vec::new(),
            data,
        }
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    /// Color for the `idx`-th series.
    pub fn series_color(&self, idx: usize) -> Rgb {
        if self.palette.is_empty() {
            self.theme.series_color(idx)
        } else {
            self.palette[idx % self.palette.len()]
        }
    }

    /// Series points in display order.
    ///
    /// Categories named in `category_order` come first, in that order;
    /// categories not named there follow in data order.
    pub fn ordered_points(&self) -> Vec<DataPoint> {
        let points = match &self.data {
            ChartData::Series { points } => points,
            ChartData::Slices { slices } => slices,
            _ => return Vec::new(),
        };
        let Some(order) = &self.category_order else {
            return points.clone();
        };

        let mut out: Vec<DataPoint> = order
            .iter()
            .filter_map(|label| points.iter().find(|p| &p.label == label).cloned())
            .collect();
        out.extend(points.iter().filter(|p| !order.contains(&p.label)).cloned());
        out
    }
}

/// Line chart with point markers; single series, legend hidden.
pub fn line_chart(title: &str, points: Vec<DataPoint>, x_label: &str, y_label: &str) -> ChartSpec {
    let mut spec = ChartSpec::new(title, ChartKind::Line, ChartData::Series { points })
        .with_labels(x_label, y_label);
    spec.markers = true;
    spec
}

/// Single-series bar chart with an explicit category order.
pub fn bar_chart(
    title: &str,
    points: Vec<DataPoint>,
    x_label: &str,
    y_label: &str,
    category_order: Vec<String>,
) -> ChartSpec {
    let mut spec = ChartSpec::new(title, ChartKind::Bar, ChartData::Series { points })
        .with_labels(x_label, y_label);
    spec.category_order = Some(category_order);
    spec
}

/// Donut/pie chart; each slice is one category, legend shown.
pub fn pie_chart(title: &str, slices: Vec<DataPoint>, hole: f64) -> ChartSpec {
    ChartSpec::new(
        title,
        ChartKind::Pie {
            hole: hole.clamp(0.0, 0.95),
        },
        ChartData::Slices { slices },
    )
    .with_legend(true)
}

/// Stacked histogram colored by a categorical field.
pub fn histogram_chart(
    title: &str,
    bins: &HistogramBins,
    x_label: &str,
    color_label: &str,
    palette: Vec<Rgb>,
) -> ChartSpec {
    let groups = bins
        .by_term
        .iter()
        .map(|g| StackGroup {
            name: g.term.clone(),
            values: g.counts.iter().map(|&c| c as f64).collect(),
        })
        .collect();
    let mut spec = ChartSpec::new(
        title,
        ChartKind::Histogram {
            nbins: bins.bin_count(),
        },
        ChartData::Stacked {
            edges: bins.edges.clone(),
            groups,
        },
    )
    .with_labels(x_label, "count");
    spec.color_label = Some(color_label.to_string());
    spec.palette = palette;
    spec
}

/// Box plot, one box per (category, color group); boxes of the same
/// category share one x slot. Uses the plotly default template.
pub fn box_chart(
    title: &str,
    boxes: Vec<PurposeBox>,
    x_label: &str,
    y_label: &str,
    color_label: &str,
) -> ChartSpec {
    let mut spec = ChartSpec::new(title, ChartKind::Box, ChartData::Boxes { boxes })
        .with_labels(x_label, y_label);
    spec.color_label = Some(color_label.to_string());
    spec.theme = Theme::Plotly;
    spec
}
