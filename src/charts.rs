//! ECharts options for the reports.
//!
//! This module turns reports into chart configurations that the UI hands
//! straight to the ECharts library:
//! - **Line**: income, expenses and savings per period, with future periods
//!   left as gaps instead of zeros
//! - **Stack**: income-contained horizontal bars (a pie for the weekly total)
//! - **Cumulative**: income-contained bars of the monthly running totals
//!
//! The all-time report is always drawn as a pie.

use std::{fmt, str::FromStr};

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPoint,
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis, EmphasisFocus,
        JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie, bar},
};
use crate::{
    Error,
    report::{
        MonthlyReport, Report, TotalReport, WeeklyReport,
        bucket::{PeriodBucket, gapped},
        containment::{ContainedBucket, ContainedSeries},
    },
};

const INCOME_COLOR: &str = "#457b9d";
const EXPENSE_COLOR: &str = "#e76f51";
const SAVINGS_COLOR: &str = "#2a9d8f";
const REMAINING_COLOR: &str = "#a8dadc";

const OVERSPEND_NOTE: &str = "In some periods, expenses + savings exceeded income. \
    Bars are clipped to the income span.";

/// How a report should be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartView {
    /// Per-period lines.
    Line,
    /// Income-contained stacked bars, or a pie for totals.
    #[default]
    Stack,
    /// Income-contained stacked bars of the running totals.
    Cumulative,
}

impl FromStr for ChartView {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Self::Line),
            "stack" => Ok(Self::Stack),
            "cumulative" => Ok(Self::Cumulative),
            other => Err(Error::InvalidView(other.to_owned())),
        }
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Line => "line",
            Self::Stack => "stack",
            Self::Cumulative => "cumulative",
        };

        f.write_str(name)
    }
}

/// Build the chart for `report` drawn as `view`.
///
/// Views that do not apply to a report fall back to its stacked view, e.g.
/// a cumulative weekly chart is the weekly pie.
pub fn report_chart(report: &Report, view: ChartView) -> Chart {
    match report {
        Report::Weekly(weekly) => weekly_chart(weekly, view),
        Report::Monthly(monthly) => monthly_chart(monthly, view),
        Report::Total(total) => total_chart(total),
    }
}

fn weekly_chart(report: &WeeklyReport, view: ChartView) -> Chart {
    match view {
        ChartView::Line => line_chart(
            "This week",
            &report.buckets,
            &report.contained,
            &report.future_mask,
        ),
        ChartView::Stack | ChartView::Cumulative => {
            pie_chart("This week", "Monday to Sunday", &report.week)
        }
    }
}

fn monthly_chart(report: &MonthlyReport, view: ChartView) -> Chart {
    let title = format!("Monthly ({})", report.year);

    match view {
        ChartView::Line => line_chart(
            &title,
            &report.buckets,
            &report.contained,
            &report.future_mask,
        ),
        ChartView::Stack => stacked_bar_chart(&title, &labels(&report.buckets), &report.contained),
        ChartView::Cumulative => stacked_bar_chart(
            &format!("{title}, running total"),
            &labels(&report.buckets),
            &report.cumulative.contained,
        ),
    }
}

fn total_chart(report: &TotalReport) -> Chart {
    pie_chart("All time", "Since the first entry", &report.contained)
}

/// Lines of income, contained expenses and contained savings per period.
///
/// Masked periods are left empty so the lines stop at today.
pub fn line_chart(
    title: &str,
    buckets: &[PeriodBucket],
    contained: &ContainedSeries,
    future_mask: &[bool],
) -> Chart {
    Chart::new()
        .title(Title::new().text(title))
        .color(vec![
            Color::from(INCOME_COLOR),
            Color::from(EXPENSE_COLOR),
            Color::from(SAVINGS_COLOR),
        ])
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("bottom"))
        .grid(default_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(labels(buckets)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Income")
                .data(line_points(&contained.income(), future_mask)),
        )
        .series(
            Line::new()
                .name("Expense")
                .data(line_points(&contained.expense(), future_mask)),
        )
        .series(
            Line::new()
                .name("Savings")
                .data(line_points(&contained.savings(), future_mask)),
        )
}

/// Horizontal bars of expense, savings and remaining stacked up to income.
pub fn stacked_bar_chart(title: &str, labels: &[String], contained: &ContainedSeries) -> Chart {
    let mut title = Title::new().text(title);
    if contained.overspend_any {
        title = title.subtext(OVERSPEND_NOTE);
    }

    let stacked = [
        ("Expense", contained.expense()),
        ("Savings", contained.savings()),
        ("Remaining", contained.remaining()),
    ];

    let mut chart = Chart::new()
        .title(title)
        .color(vec![
            Color::from(EXPENSE_COLOR),
            Color::from(SAVINGS_COLOR),
            Color::from(REMAINING_COLOR),
        ])
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("bottom"))
        .grid(default_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(labels.to_vec()),
        );

    for (name, data) in stacked {
        chart = chart.series(
            bar::Bar::new()
                .name(name)
                .stack("Income")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

/// A pie of one income-contained bucket: expense, savings and remaining.
pub fn pie_chart(title: &str, subtitle: &str, bucket: &ContainedBucket) -> Chart {
    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .color(vec![
            Color::from(EXPENSE_COLOR),
            Color::from(SAVINGS_COLOR),
            Color::from(REMAINING_COLOR),
        ])
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().top("bottom"))
        .series(Pie::new().name("Income").radius("60%").data(vec![
            (bucket.expense, "Expense"),
            (bucket.savings, "Savings"),
            (bucket.remaining, "Remaining"),
        ]))
}

/// Masked values become "-", which ECharts draws as a gap in the line.
fn line_points(values: &[f64], future_mask: &[bool]) -> Vec<DataPoint> {
    gapped(values, future_mask)
        .into_iter()
        .map(|value| match value {
            Some(value) => DataPoint::from(value),
            None => DataPoint::from("-"),
        })
        .collect()
}

fn labels(buckets: &[PeriodBucket]) -> Vec<String> {
    buckets.iter().map(|bucket| bucket.label.clone()).collect()
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom(40)
        .contain_label(true)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR',
              maximumFractionDigits: 0
            });
            return (number === null || number === undefined) ? \"-\" : currencyFormatter.format(number);",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
