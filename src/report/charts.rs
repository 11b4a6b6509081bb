//! Chart generation for the dashboard.
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization
//! code.

use charming::{
    Chart,
    component::{Axis, Legend, Title},
    element::{AxisType, Tooltip, Trigger},
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    category::CategoryId,
    html::HeadElement,
    report::aggregation::{DailyBalancePoint, Totals},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section id="charts" class="charts-grid"
        {
            @for chart in charts {
                div id=(chart.id) class="chart" {}
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A pie chart of the month's expenses grouped by category.
pub(super) fn expense_pie_chart(breakdown: &[(CategoryId, String, f64)]) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|(_, name, total)| (*total, name.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Month expenses by category"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new())
        .series(Pie::new().radius("55%").data(data))
}

/// A line chart of the cumulative daily balance over the month.
pub(super) fn daily_balance_chart(series: &[DailyBalancePoint]) -> Chart {
    let labels: Vec<String> = series
        .iter()
        .map(|point| point.date.day().to_string())
        .collect();
    let values: Vec<f64> = series.iter().map(|point| point.balance).collect();

    Chart::new()
        .title(Title::new().text("Daily running balance"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().data(values))
}

/// A bar chart comparing the month's income and expenses.
pub(super) fn month_bar_chart(totals: &Totals) -> Chart {
    Chart::new()
        .title(Title::new().text("Month income vs expenses"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(vec!["Income", "Expenses"]),
        )
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().data(vec![totals.income, totals.expense]))
}
