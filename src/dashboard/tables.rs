//! Table views for dashboard data display.
//!
//! Provides HTML tables for the income and expense totals and the breakdown
//! of expenses by category.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::{CategoryCloudEntry, TypeTotals},
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency},
};

const TABLE_HEADER_STYLE: &str =
    "text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400";
const TABLE_ROW_HEADER_STYLE: &str =
    "px-6 py-4 font-medium text-gray-900 dark:text-white text-left";
const TABLE_NUMBER_CELL_STYLE: &str = "px-6 py-4 text-right whitespace-nowrap";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders a table with total income, total expenses and the balance.
pub(super) fn summary_table(totals: &TypeTotals) -> Markup {
    let balance = totals.balance();

    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { "Summary" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" data-summary-table {
                    tbody {
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_ROW_HEADER_STYLE) { "Income" }
                            td class={(TABLE_NUMBER_CELL_STYLE) " " (TABLE_CELL_GREEN_STYLE)} {
                                (format_currency(totals.income))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_ROW_HEADER_STYLE) { "Expenses" }
                            td class={(TABLE_NUMBER_CELL_STYLE) " " (TABLE_CELL_RED_STYLE)} {
                                (format_currency(totals.expense))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_ROW_HEADER_STYLE) { "Balance" }
                            td class={(TABLE_NUMBER_CELL_STYLE) " " (amount_color_class(balance)) " font-bold"} {
                                (format_currency(balance))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the expense categories, largest total first, with each category's
/// share of all expenses.
pub(super) fn expense_category_table(categories: &[CategoryCloudEntry], total_expense: f64) -> Markup {
    if categories.is_empty() {
        return html! {};
    }

    let mut categories: Vec<&CategoryCloudEntry> = categories.iter().collect();
    categories.sort_by(|a, b| b.total.total_cmp(&a.total));

    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { "Expenses by Category" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" data-category-table {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-3 text-right" { "Transactions" }
                            th scope="col" class="px-6 py-3 text-right" { "Total" }
                            th scope="col" class="px-6 py-3 text-right" { "Share" }
                        }
                    }
                    tbody {
                        @for entry in categories {
                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class=(TABLE_ROW_HEADER_STYLE) { (entry.category) }
                                td class=(TABLE_NUMBER_CELL_STYLE) { (entry.count) }
                                td class=(TABLE_NUMBER_CELL_STYLE) { (format_currency(entry.total)) }
                                td class=(TABLE_NUMBER_CELL_STYLE) { (format_share(entry.total, total_expense)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn format_share(total: f64, overall: f64) -> String {
    if overall > 0.0 {
        format!("{:.1}%", total / overall * 100.0)
    } else {
        "-".to_owned()
    }
}
