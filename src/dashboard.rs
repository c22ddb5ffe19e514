//! The dashboard render function.
//!
//! `render(state, table)` is pure: given the loaded table and the interaction
//! state it recomputes every aggregate and maps each one to a metric or a
//! chart specification. Front-ends call it again after every interaction.

use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::LoanTable;
use crate::chart::{self, ChartSpec, DARK_SLATE_BLUE, DataPoint, TOMATO};
use crate::domain::{Grade, HISTOGRAM_BINS, LoanCondition, Weekday};
use crate::report::format::{fmt_money, fmt_percent, fmt_thousands};
use crate::state::DashboardState;

pub const DASHBOARD_TITLE: &str = "Financial Insight Dashboard: Loan Performance & Trends";

/// A headline number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub help: Option<String>,
}

impl Metric {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            help: None,
        }
    }
}

/// A chart placed under a tab or column heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub heading: String,
    pub chart: ChartSpec,
}

impl Panel {
    fn new(heading: &str, chart: ChartSpec) -> Self {
        Self {
            heading: heading.to_string(),
            chart,
        }
    }
}

/// Everything one rerun displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub metrics: Vec<Metric>,
    /// Time-based tabs: loans over time, amount over time, weekday analysis.
    pub overview: Vec<Panel>,
    /// Condition pie and grade distribution (collapsible section).
    pub performance: Vec<Panel>,
    /// Condition the bottom section is scoped to.
    pub condition: LoanCondition,
    /// Amount histogram and box plot for `condition`.
    pub by_condition: Vec<Panel>,
}

pub fn render(state: &DashboardState, table: &LoanTable) -> Dashboard {
    debug!(condition = %state.condition, rows = table.total_count(), "rendering dashboard");

    Dashboard {
        title: DASHBOARD_TITLE.to_string(),
        metrics: metrics(table),
        overview: overview_panels(table),
        performance: performance_panels(table),
        condition: state.condition,
        by_condition: condition_panels(table, state.condition),
    }
}

fn metrics(table: &LoanTable) -> Vec<Metric> {
    let mut total = Metric::new("Total Loans", fmt_thousands(table.total_count() as f64, 0));
    total.help = Some("Total number of loans".to_string());

    vec![
        total,
        Metric::new("Total Loan Amount", fmt_money(table.total_amount())),
        Metric::new(
            "Average Interest Rate",
            table.average_rate().map(fmt_percent).unwrap_or_else(|| "-".to_string()),
        ),
        Metric::new(
            "Average Loan Amount",
            table.average_amount().map(fmt_money).unwrap_or_else(|| "-".to_string()),
        ),
    ]
}

fn overview_panels(table: &LoanTable) -> Vec<Panel> {
    let date_points = |series: crate::analysis::Series<chrono::NaiveDate>| {
        series
            .points
            .into_iter()
            .map(|(d, v)| DataPoint::new(d.format("%Y-%m-%d").to_string(), v))
            .collect::<Vec<_>>()
    };

    let count = chart::line_chart(
        "Number of Loans Over Time",
        date_points(table.count_by_date()),
        "Issue Date",
        "Number of Loans",
    );
    let amount = chart::line_chart(
        "Total Loans Over Time",
        date_points(table.sum_by_date()),
        "Issue Date",
        "Total Loan Amount",
    );

    let weekday_points = table
        .count_by_weekday()
        .points
        .into_iter()
        .map(|(d, v)| DataPoint::new(d.display_name(), v))
        .collect();
    let weekday = chart::bar_chart(
        "Distribution of Loans by Day of the Week",
        weekday_points,
        "Day of the Week",
        "Number of Loans",
        Weekday::DISPLAY_ORDER
            .iter()
            .map(|d| d.display_name().to_string())
            .collect(),
    );

    vec![
        Panel::new("Loans Issued Over Time", count),
        Panel::new("Loan Amount Over Time", amount),
        Panel::new("Issue Date Analysis", weekday),
    ]
}

fn performance_panels(table: &LoanTable) -> Vec<Panel> {
    let slices = table
        .distribution_by_condition()
        .points
        .into_iter()
        .map(|(c, v)| DataPoint::new(c.display_name(), v))
        .collect();
    let pie = chart::pie_chart("Distribution of Loans by Condition", slices, 0.4);

    let grade_points = table
        .count_by_grade()
        .points
        .into_iter()
        .map(|(g, v)| DataPoint::new(g.display_name(), v))
        .collect();
    let grade = chart::bar_chart(
        "Distribution of Grade of Loans",
        grade_points,
        "Grade",
        "Number of Loans",
        Grade::ALL.iter().map(|g| g.display_name().to_string()).collect(),
    );

    vec![
        Panel::new("Loan Condition", pie),
        Panel::new("Loan Grade", grade),
    ]
}

fn condition_panels(table: &LoanTable, condition: LoanCondition) -> Vec<Panel> {
    let subset = table.subset(condition);
    if subset.is_empty() {
        warn!(%condition, "no loans match the selected condition; charts will be empty");
    }

    let histogram = chart::histogram_chart(
        "Loan Amount Distribution",
        &subset.histogram_amount(HISTOGRAM_BINS),
        "Loan Amount",
        "Loan Term",
        vec![DARK_SLATE_BLUE, TOMATO],
    );
    let boxes = chart::box_chart(
        "Loan Amount Distribution by Purpose",
        subset.box_stats_by_purpose(),
        "Loan Purpose",
        "Loan Amount",
        "Loan Term",
    );

    vec![
        Panel::new("Loan Amount Distribution", histogram),
        Panel::new("Loan Amount Distribution by Purpose", boxes),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::record;
    use crate::chart::{ChartData, ChartKind};

    fn table() -> LoanTable {
        let mut rows = vec![
            record("1", 1000.0, LoanCondition::Good),
            record("2", 2000.0, LoanCondition::Good),
            record("3", 3000.0, LoanCondition::Bad),
        ];
        rows[2].term = "60 months".to_string();
        rows[2].purpose = Some("credit card".to_string());
        LoanTable::new(rows)
    }

    #[test]
    fn metrics_are_formatted() {
        let d = render(&DashboardState::default(), &table());
        let values: Vec<_> = d.metrics.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["3", "$6,000", "10.00%", "$2,000"]);
        assert_eq!(d.metrics[0].help.as_deref(), Some("Total number of loans"));
    }

    #[test]
    fn layout_has_expected_panels() {
        let d = render(&DashboardState::default(), &table());
        assert_eq!(d.title, DASHBOARD_TITLE);
        assert_eq!(d.overview.len(), 3);
        assert_eq!(d.performance.len(), 2);
        assert_eq!(d.by_condition.len(), 2);
        assert_eq!(d.overview[2].chart.kind, ChartKind::Bar);
        assert_eq!(
            d.by_condition[0].chart.kind,
            ChartKind::Histogram { nbins: HISTOGRAM_BINS }
        );
        assert!(matches!(d.performance[0].chart.kind, ChartKind::Pie { .. }));
    }

    #[test]
    fn condition_scopes_only_the_bottom_section() {
        let t = table();
        let good = render(&DashboardState::default(), &t);
        let bad = render(&DashboardState::with_condition(LoanCondition::Bad), &t);

        assert_eq!(good.metrics, bad.metrics);
        assert_eq!(good.overview, bad.overview);
        assert_eq!(good.performance, bad.performance);
        assert_ne!(good.by_condition, bad.by_condition);
    }

    #[test]
    fn toggling_condition_restores_aggregates() {
        let t = table();
        let mut state = DashboardState::default();
        let before = render(&state, &t);
        state.select(LoanCondition::Bad);
        let _ = render(&state, &t);
        state.select(LoanCondition::Good);
        assert_eq!(render(&state, &t), before);
    }

    #[test]
    fn empty_condition_renders_empty_charts() {
        let rows = vec![record("1", 1000.0, LoanCondition::Good)];
        let d = render(
            &DashboardState::with_condition(LoanCondition::Bad),
            &LoanTable::new(rows),
        );
        assert!(d.by_condition.iter().all(|p| p.chart.data.is_empty()));
        match &d.by_condition[0].chart.data {
            ChartData::Stacked { edges, groups } => {
                assert!(edges.is_empty());
                assert!(groups.is_empty());
            }
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn pie_has_both_conditions() {
        let d = render(&DashboardState::default(), &table());
        let slices = d.performance[0].chart.ordered_points();
        assert_eq!(
            slices,
            vec![DataPoint::new("Good Loan", 2.0), DataPoint::new("Bad Loan", 1.0)]
        );
    }
}
