//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations from the shapes in
//! [crate::dashboard::presentation]:
//! - **Income vs Expenses**: bar chart of the totals by type
//! - **Expenses/Income by Category**: one pie chart each
//! - **Expense Analysis**: bubble chart of transaction count against total per category
//! - **Spending Heatmap**: calendar of daily expenses over the last year
//!
//! The bar and pie charts are built with charming. The bubble and heatmap
//! charts need per-point sizes and names that charming's builders do not
//! expose, so their options are written as JSON directly.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip,
        Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};
use serde_json::{Value, json};

use crate::{
    dashboard::presentation::{BarChartData, BubblePoint, HeatmapData, PieSlice},
    html::HeadElement,
};

/// The colours of the heatmap steps, from no spending to the highest step.
const HEATMAP_COLORS: [&str; 5] = ["#ebedf0", "#c6e48b", "#7bc96f", "#239a3b", "#196127"];

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JavaScript object literal
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
///
/// # Arguments
/// * `charts` - The charts to render containers for
///
/// # Returns
/// Maud markup containing a grid of chart container divs.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
///
/// # Arguments
/// * `charts` - The charts to generate initialization scripts for
///
/// # Returns
/// HeadElement containing the initialization JavaScript.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                // Category names are user input and must not close the script tag.
                chart.options.replace("</", "<\\/")
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

pub(super) fn type_totals_chart(data: BarChartData) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text("Income vs Expenses")
                .subtext("Totals for the selected period")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(data.labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Total")
                .item_style(ItemStyle::new().color("#3b82f6"))
                .data(data.values),
        )
}

pub(super) fn category_pie_chart(title: &str, slices: &[PieSlice]) -> Chart {
    let data: Vec<(f64, &str)> = slices
        .iter()
        .map(|slice| (slice.value, slice.name.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title).left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left(20).bottom("1%"))
        .series(
            Pie::new()
                .name(title)
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// The bubble chart of expense categories.
///
/// Each point's name holds its precomputed tooltip, which the `{b}`
/// formatter prints as is. ECharts sizes symbols by diameter, so the radius
/// is doubled.
pub(super) fn expense_bubble_chart(points: &[BubblePoint]) -> Value {
    let data: Vec<Value> = points
        .iter()
        .map(|point| {
            json!({
                "name": point.tooltip,
                "value": [point.x, point.y],
                "symbolSize": point.size * 2.0,
                "label": { "show": true, "formatter": point.label.replace('{', "(").replace('}', ")") },
            })
        })
        .collect();

    json!({
        "title": {
            "text": "Expense Analysis",
            "subtext": "Transaction count and total spent per category",
            "left": 20,
            "top": "1%",
        },
        "tooltip": { "trigger": "item", "formatter": "{b}" },
        "grid": { "left": "3%", "right": "6%", "bottom": "8%", "top": 90, "containLabel": true },
        "xAxis": {
            "type": "value",
            "name": "Transaction count",
            "nameLocation": "middle",
            "nameGap": 30,
            "minInterval": 1,
        },
        "yAxis": { "type": "value", "name": "Total spent" },
        "series": [{
            "name": "Expenses",
            "type": "scatter",
            "itemStyle": { "opacity": 0.7 },
            "label": { "position": "top" },
            "data": data,
        }],
    })
}

/// The calendar heatmap of daily expenses.
///
/// Each value is `[date, total, level]` and the visual map colours cells by
/// the level.
pub(super) fn expense_heatmap_chart(heatmap: &HeatmapData) -> Value {
    let data: Vec<Value> = heatmap
        .cells
        .iter()
        .map(|cell| {
            json!({
                "name": cell.tooltip,
                "value": [cell.date.to_string(), cell.total, cell.level],
            })
        })
        .collect();

    let pieces: Vec<Value> = HEATMAP_COLORS
        .iter()
        .enumerate()
        .map(|(level, color)| json!({ "value": level, "color": color }))
        .collect();

    json!({
        "title": {
            "text": "Spending Heatmap",
            "subtext": "Daily expenses over the last year",
            "left": 20,
            "top": "1%",
        },
        "tooltip": { "formatter": "{b}" },
        "visualMap": {
            "type": "piecewise",
            "show": false,
            "dimension": 2,
            "pieces": pieces,
        },
        "calendar": {
            "range": [heatmap.start.to_string(), heatmap.end.to_string()],
            "top": 100,
            "left": 40,
            "right": 20,
            "cellSize": ["auto", 15],
            "yearLabel": { "show": false },
            "itemStyle": { "color": HEATMAP_COLORS[0] },
        },
        "series": [{
            "type": "heatmap",
            "coordinateSystem": "calendar",
            "data": data,
        }],
    })
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
