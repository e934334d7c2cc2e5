//! Renders the transactions table and the filter form above it.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    api::TransactionFilter,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
    transaction::{Transaction, TransactionType, core::UNCATEGORIZED_LABEL},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The page the table is shown on, so that edit and delete actions can
/// return the user to it.
pub struct TableContext<'a> {
    /// The URL of the current page, including filters and page number.
    pub current_url: &'a str,
    /// The query string appended to delete requests.
    pub delete_query: &'a str,
}

fn amount_class(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Expense => "text-red-700 dark:text-red-300",
        TransactionType::Income => "text-green-700 dark:text-green-300",
    }
}

/// The amount with a minus sign for expenses.
fn signed_amount(transaction: &Transaction) -> f64 {
    match transaction.type_ {
        TransactionType::Expense => -transaction.magnitude(),
        TransactionType::Income => transaction.magnitude(),
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}

fn with_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_owned()
    } else {
        format!("{url}?{query}")
    }
}

fn edit_url(transaction_id: i64, current_url: &str) -> String {
    let endpoint = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
    let query = serde_urlencoded::to_string([("redirect_url", current_url)]).unwrap_or_default();

    with_query(&endpoint, &query)
}

fn transaction_row(transaction: &Transaction, context: &TableContext<'_>) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);
    let category = transaction.category_label();

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(date) = transaction.date {
                    time datetime=(date) { (date) }
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                }
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                @if category == UNCATEGORIZED_LABEL {
                    span class="text-gray-400 dark:text-gray-500" { (category) }
                } @else {
                    span class=(CATEGORY_BADGE_STYLE) { (category) }
                }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.type_.label()) }
            td class={ "px-6 py-4 text-right " (amount_class(transaction.type_)) }
            {
                (format_currency(signed_amount(transaction)))
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(id) = transaction.id {
                    div class="flex gap-4"
                    {
                        a href=(edit_url(id, context.current_url)) class=(LINK_STYLE) { "Edit" }

                        button
                            type="button"
                            class=(BUTTON_DELETE_STYLE)
                            hx-delete=(with_query(
                                &format_endpoint(endpoints::TRANSACTION, id),
                                context.delete_query,
                            ))
                            hx-confirm={
                                "Are you sure you want to delete the transaction '"
                                (transaction.description)
                                "'? This cannot be undone."
                            }
                            hx-target-error="#alert-container"
                        {
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

/// A GET form for narrowing down transactions by description and date range.
///
/// Submitting the form reloads `action` with the filters in the query string.
pub fn filter_form(action: &str, filter: &TransactionFilter) -> Markup {
    let start_date = filter.start_date.map(|date| date.to_string());
    let end_date = filter.end_date.map(|date| date.to_string());

    html! {
        form
            method="get"
            action=(action)
            class="flex flex-wrap items-end gap-4 w-full"
            data-filter-form
        {
            div class="grow"
            {
                label for="filter-description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    type="search"
                    name="description"
                    id="filter-description"
                    placeholder="Search descriptions"
                    value=[filter.description.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-start-date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="start_date"
                    id="filter-start-date"
                    value=[start_date.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-end-date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="end_date"
                    id="filter-end-date"
                    value=[end_date.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-center gap-4"
            {
                button
                    type="submit"
                    class="px-4 py-2.5 rounded text-sm text-white bg-blue-500 hover:bg-blue-600"
                {
                    "Filter"
                }

                @if !filter.is_empty() {
                    a href=(action) class=(LINK_STYLE) { "Clear" }
                }
            }
        }
    }
}

/// The table of transactions, or a message if there are none.
pub fn transactions_table(transactions: &[Transaction], context: &TableContext<'_>) -> Markup {
    html! {
        @if transactions.is_empty() {
            div class="p-6 text-center text-gray-500 dark:text-gray-400" data-empty-state
            {
                p { "No transactions found." }
                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                {
                    "Create a transaction"
                }
            }
        } @else {
            div class="overflow-x-auto"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE)
                            {
                                span class="sr-only" { "Actions" }
                            }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(transaction, context))
                        }
                    }
                }
            }
        }
    }
}
