//! Chart-ready shapes derived from a [DashboardSummary].
//!
//! Nothing in here knows about the chart library. [crate::dashboard::charts]
//! turns these shapes into ECharts options, so swapping the renderer only
//! touches that module.

use time::{Date, Duration};

use crate::{
    dashboard::aggregation::{CategoryTotal, DailyTotal, DashboardSummary, TypeTotals},
    html::format_currency,
    transaction::TransactionType,
};

/// How many days the heatmap covers, ending today.
pub const HEATMAP_DAYS: i64 = 365;

/// The amount covered by each heatmap colour step.
const HEATMAP_LEVEL_STEP: f64 = 100.0;

/// The highest heatmap colour step.
pub const MAX_HEATMAP_LEVEL: u8 = 4;

/// Labels with one value each for a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartData {
    /// The label of each bar.
    pub labels: Vec<String>,
    /// The height of each bar, parallel to `labels`.
    pub values: Vec<f64>,
}

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// The category the slice represents.
    pub name: String,
    /// The size of the slice.
    pub value: f64,
}

/// One category in the expense bubble chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BubblePoint {
    /// The number of transactions in the category.
    pub x: usize,
    /// The total amount of the category.
    pub y: f64,
    /// The bubble radius.
    pub size: f64,
    /// The category label.
    pub label: String,
    /// The text to show when hovering over the bubble.
    pub tooltip: String,
}

/// One day in the heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    /// The day.
    pub date: Date,
    /// The total spent on the day.
    pub total: f64,
    /// The colour step, from 0 to [MAX_HEATMAP_LEVEL].
    pub level: u8,
    /// The text to show when hovering over the cell.
    pub tooltip: String,
}

/// A calendar of daily totals over a fixed range.
///
/// Days in the range without a cell are rendered as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapData {
    /// The first day of the range.
    pub start: Date,
    /// The last day of the range, inclusive.
    pub end: Date,
    /// The days in the range that have a total, sorted by date.
    pub cells: Vec<HeatmapCell>,
}

/// Income and expense totals as a two bar chart.
pub fn type_totals_bar(totals: &TypeTotals) -> BarChartData {
    let types = [TransactionType::Income, TransactionType::Expense];

    BarChartData {
        labels: types.iter().map(|type_| type_.label().to_owned()).collect(),
        values: types.iter().map(|&type_| totals.get(type_)).collect(),
    }
}

/// One pie slice per category, in the order given.
pub fn category_slices(categories: &[CategoryTotal]) -> Vec<PieSlice> {
    categories
        .iter()
        .map(|category| PieSlice {
            name: category.category.clone(),
            value: category.total,
        })
        .collect()
}

/// One bubble per expense category.
///
/// Each point carries everything its tooltip needs, so the renderer does not
/// have to recompute anything.
pub fn expense_bubbles(summary: &DashboardSummary) -> Vec<BubblePoint> {
    summary
        .expense_cloud
        .iter()
        .map(|entry| BubblePoint {
            x: entry.count,
            y: entry.total,
            size: entry.size(),
            label: entry.category.clone(),
            tooltip: bubble_tooltip(&entry.category, entry.count, entry.total),
        })
        .collect()
}

fn bubble_tooltip(label: &str, count: usize, total: f64) -> String {
    format!(
        "{label}: {count} transactions, Total {}",
        format_currency(total)
    )
}

/// Lays out daily totals over the [HEATMAP_DAYS] days ending on `today`.
///
/// Days outside of the range are dropped.
pub fn expense_heatmap(days: &[DailyTotal], today: Date) -> HeatmapData {
    let start = today
        .checked_sub(Duration::days(HEATMAP_DAYS - 1))
        .unwrap_or(Date::MIN);

    let cells = days
        .iter()
        .filter(|day| day.date >= start && day.date <= today)
        .map(|day| HeatmapCell {
            date: day.date,
            total: day.total,
            level: heatmap_level(day.total),
            tooltip: format!("{} on {}", format_currency(day.total), day.date),
        })
        .collect();

    HeatmapData {
        start,
        end: today,
        cells,
    }
}

/// The colour step for a daily total: one step per 100 spent, capped at [MAX_HEATMAP_LEVEL].
pub fn heatmap_level(total: f64) -> u8 {
    if !total.is_finite() || total <= 0.0 {
        return 0;
    }

    (total / HEATMAP_LEVEL_STEP)
        .ceil()
        .min(f64::from(MAX_HEATMAP_LEVEL)) as u8
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        dashboard::{
            aggregation::{
                BUBBLE_SCALE, CategoryTotal, DailyTotal, DashboardSummary, MIN_BUBBLE_SIZE,
                TypeTotals,
            },
            presentation::{
                BarChartData, PieSlice, category_slices, expense_bubbles, expense_heatmap,
                heatmap_level, type_totals_bar,
            },
        },
        html::format_currency,
        transaction::{Transaction, TransactionType},
    };

    fn expense(amount: f64, category: &str) -> Transaction {
        Transaction {
            id: None,
            description: String::new(),
            amount,
            type_: TransactionType::Expense,
            category: Some(category.to_owned()),
            date: None,
        }
    }

    #[test]
    fn bar_chart_has_income_then_expense() {
        let bar = type_totals_bar(&TypeTotals {
            income: 200.0,
            expense: 150.0,
        });

        assert_eq!(
            bar,
            BarChartData {
                labels: vec!["Income".to_owned(), "Expense".to_owned()],
                values: vec![200.0, 150.0],
            }
        );
    }

    #[test]
    fn pie_slices_keep_category_order() {
        let slices = category_slices(&[
            CategoryTotal {
                category: "Rent".to_owned(),
                total: 900.0,
            },
            CategoryTotal {
                category: "Food".to_owned(),
                total: 120.0,
            },
        ]);

        assert_eq!(
            slices,
            vec![
                PieSlice {
                    name: "Rent".to_owned(),
                    value: 900.0
                },
                PieSlice {
                    name: "Food".to_owned(),
                    value: 120.0
                },
            ]
        );
    }

    #[test]
    fn bubble_point_carries_tooltip_values() {
        let transactions = vec![
            expense(1000.0, "Rent"),
            expense(20.0, "Food"),
            expense(30.0, "Food"),
        ];
        let summary = DashboardSummary::new(Some(&transactions));

        let bubbles = expense_bubbles(&summary);

        assert_eq!(bubbles.len(), 2);
        assert_eq!(bubbles[0].label, "Rent");
        assert_eq!(bubbles[0].x, 1);
        assert_eq!(bubbles[0].y, 1000.0);
        assert_eq!(
            bubbles[0].size,
            MIN_BUBBLE_SIZE.max(1000.0_f64.ln() * BUBBLE_SCALE)
        );
        assert_eq!(
            bubbles[1].tooltip,
            format!("Food: 2 transactions, Total {}", format_currency(50.0))
        );
    }

    #[test]
    fn heatmap_covers_trailing_year() {
        let today = date!(2024 - 12 - 31);

        let heatmap = expense_heatmap(&[], today);

        assert_eq!(heatmap.start, date!(2024 - 01 - 02));
        assert_eq!(heatmap.end, today);
        assert!(heatmap.cells.is_empty());
    }

    #[test]
    fn heatmap_drops_days_outside_range() {
        let today = date!(2024 - 06 - 30);
        let days = [
            DailyTotal {
                date: date!(2023 - 07 - 01),
                total: 10.0,
            },
            DailyTotal {
                date: date!(2023 - 07 - 02),
                total: 20.0,
            },
            DailyTotal {
                date: date!(2024 - 06 - 30),
                total: 30.0,
            },
            DailyTotal {
                date: date!(2024 - 07 - 01),
                total: 40.0,
            },
        ];

        let heatmap = expense_heatmap(&days, today);

        let dates: Vec<_> = heatmap.cells.iter().map(|cell| cell.date).collect();
        assert_eq!(heatmap.start, date!(2023 - 07 - 02));
        assert_eq!(dates, vec![date!(2023 - 07 - 02), date!(2024 - 06 - 30)]);
    }

    #[test]
    fn heatmap_cell_has_level_and_tooltip() {
        let today = date!(2024 - 01 - 10);
        let days = [DailyTotal {
            date: date!(2024 - 01 - 01),
            total: 100.0,
        }];

        let heatmap = expense_heatmap(&days, today);

        assert_eq!(heatmap.cells[0].level, 1);
        assert_eq!(
            heatmap.cells[0].tooltip,
            format!("{} on 2024-01-01", format_currency(100.0))
        );
    }

    #[test]
    fn heatmap_level_steps_every_hundred_and_caps() {
        let cases = [
            (0.0, 0),
            (-5.0, 0),
            (f64::NAN, 0),
            (0.01, 1),
            (100.0, 1),
            (100.01, 2),
            (350.0, 4),
            (10_000.0, 4),
        ];

        for (total, want) in cases {
            assert_eq!(heatmap_level(total), want, "total {total}");
        }
    }
}
