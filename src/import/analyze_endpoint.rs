use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    auth::Session,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_currency, loading_spinner,
    },
    import::ImportState,
    transaction::{Transaction, TransactionType},
};

fn preview_row(transaction: &Transaction) -> Markup {
    let amount_class = match transaction.type_ {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    };
    let date = transaction.date.map(|date| date.to_string()).unwrap_or_default();

    html! {
        tr class=(TABLE_ROW_STYLE) data-import-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                @if date.is_empty() { "Invalid date" } @else { (date) }
                input type="hidden" name="date" value=(date);
            }
            td class={ "px-6 py-4 text-right whitespace-nowrap " (amount_class) }
            {
                (format_currency(transaction.magnitude()))
                input type="hidden" name="amount" value=(transaction.magnitude());
            }
            td class=(TABLE_CELL_STYLE)
            {
                (transaction.type_.label())
                input type="hidden" name="type_" value=(transaction.type_.form_value());
            }
            td class=(TABLE_CELL_STYLE)
            {
                (transaction.description)
                input type="hidden" name="description" value=(transaction.description);
            }
            td class="px-6 py-2"
            {
                input
                    type="text"
                    name="category"
                    aria-label="Category"
                    placeholder="Set a category"
                    value=[transaction.category.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

fn import_preview(transactions: &[Transaction]) -> Markup {
    if transactions.is_empty() {
        return html! {
            p class="text-center text-gray-500 dark:text-gray-400" data-empty-state
            {
                "No new transactions were found in your bank statements."
            }
        };
    }

    html! {
        form
            hx-post=(endpoints::IMPORT_CONFIRM_API)
            hx-target-error="#alert-container"
            hx-indicator="#confirm-indicator"
            hx-disabled-elt="#confirm-button"
            class="space-y-4"
        {
            h2 class="text-lg font-bold"
            {
                "Review " (transactions.len()) " transactions"
            }

            div class="max-h-[60vh] overflow-auto rounded border border-gray-200 dark:border-gray-700"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class={ (TABLE_HEADER_STYLE) " sticky top-0" }
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (preview_row(transaction))
                        }
                    }
                }
            }

            button type="submit" id="confirm-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="confirm-indicator" { (loading_spinner()) }
                " Confirm Import"
            }
        }
    }
}

/// Ask the finance API for the transactions in the user's bank statement
/// emails and respond with a form for reviewing them.
pub async fn analyze_import_endpoint(
    Extension(session): Extension<Session>,
    State(state): State<ImportState>,
) -> Response {
    let config = &state.import_config;

    match state
        .api_client
        .analyze_import(&session, &config.sender, &config.subject)
        .await
    {
        Ok(transactions) => {
            tracing::info!("Found {} transactions to import", transactions.len());
            import_preview(&transactions).into_response()
        }
        Err(error) => {
            tracing::error!("Could not analyze bank statements: {error}");
            error.into_alert_response()
        }
    }
}
