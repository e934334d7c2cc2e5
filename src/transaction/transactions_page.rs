//! Defines the route handler for the page that lists the user's transactions
//! one page at a time.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState,
    api::{ApiClient, Page, TransactionFilter},
    auth::Session,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, load_error_panel},
    navigation::NavBar,
    pagination::{PaginationConfig, create_pagination_indicators, pagination_html},
    transaction::{
        Transaction,
        view::{TableContext, filter_form, transactions_table},
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The client for fetching transactions from the finance API.
    pub api_client: ApiClient,
    /// Config that controls how transactions are paged.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The page of transactions to display. Pages are 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// The URL of the transactions page showing `page` with `filter` applied.
pub(crate) fn transactions_page_url(filter: &TransactionFilter, page: u64) -> String {
    let mut query = filter.to_view_query();
    query.push(("page", page.to_string()));

    match serde_urlencoded::to_string(&query) {
        Ok(query) => format!("{}?{query}", endpoints::TRANSACTIONS_VIEW),
        Err(error) => {
            tracing::warn!("Could not encode transactions page query: {error}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

fn delete_query(filter: &TransactionFilter, page: u64, rows_on_page: usize) -> String {
    let mut query = filter.to_view_query();
    query.push(("page", page.to_string()));
    query.push(("rows_on_page", rows_on_page.to_string()));

    serde_urlencoded::to_string(&query).unwrap_or_default()
}

fn transactions_view(
    page: &Page<Transaction>,
    curr_page: u64,
    filter: &TransactionFilter,
    config: &PaginationConfig,
) -> Markup {
    let current_url = transactions_page_url(filter, curr_page);
    let delete_query = delete_query(filter, curr_page, page.content.len());
    let table = transactions_table(
        &page.content,
        &TableContext {
            current_url: &current_url,
            delete_query: &delete_query,
        },
    );
    let indicators = create_pagination_indicators(curr_page, page.total_pages, config.max_pages);

    let content = html! {
        (transactions_header())

        section class="w-full lg:max-w-5xl space-y-4"
        {
            (filter_form(endpoints::TRANSACTIONS_VIEW, filter))

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                (page.total_elements) " transactions"
            }

            div class="rounded bg-white dark:bg-gray-800 overflow-hidden"
            {
                (table)
            }

            @if page.total_pages > 1 {
                (pagination_html(&indicators, |page| transactions_page_url(filter, page)))
            }
        }
    };

    page_shell(&content)
}

fn transactions_header() -> Markup {
    html! {
        header class="flex justify-between flex-wrap items-end w-full lg:max-w-5xl mb-4"
        {
            h1 class="text-xl font-bold" { "Transactions" }

            div class="flex gap-4"
            {
                a href=(endpoints::IMPORT_VIEW) class=(LINK_STYLE) { "Import Transactions" }
                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "New Transaction" }
            }
        }
    }
}

fn page_shell(content: &Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (content)
        }
    };

    base("Transactions", &[], &content)
}

/// Render an overview of the user's transactions.
///
/// If the finance API cannot be reached, the page is still rendered with a
/// panel that lets the user try again.
pub async fn get_transactions_page(
    Extension(session): Extension<Session>,
    State(state): State<TransactionsViewState>,
    Query(filter): Query<TransactionFilter>,
    Query(page_query): Query<PageQuery>,
) -> Response {
    let curr_page = page_query.page.unwrap_or(1).max(1);
    let page_size = state.pagination_config.page_size;

    let result = state
        .api_client
        .list_transactions(&session, &filter, curr_page - 1, page_size)
        .await;

    match result {
        Ok(page) => transactions_view(&page, curr_page, &filter, &state.pagination_config)
            .into_response(),
        Err(error) => match error.load_failure_message() {
            Some(details) => {
                tracing::error!("Could not load transactions: {error}");
                let retry_url = transactions_page_url(&filter, curr_page);
                let content = html! {
                    (transactions_header())
                    (load_error_panel(&details, &retry_url))
                };

                (StatusCode::BAD_GATEWAY, page_shell(&content)).into_response()
            }
            None => error.into_response(),
        },
    }
}
