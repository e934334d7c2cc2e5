//! Dashboard HTTP handler and view rendering.
//!
//! The handler fetches the unpaginated snapshot of transactions for the
//! active filters, aggregates it into a [DashboardSummary] and renders the
//! charts and tables built from it.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    api::{ApiClient, TransactionFilter},
    auth::Session,
    dashboard::{
        aggregation::DashboardSummary,
        charts::{
            DashboardChart, category_pie_chart, charts_script, charts_view, expense_bubble_chart,
            expense_heatmap_chart, type_totals_chart,
        },
        presentation::{category_slices, expense_bubbles, expense_heatmap, type_totals_bar},
        tables::{expense_category_table, summary_table},
    },
    endpoints,
    html::{ECHARTS_SCRIPT, HeadElement, base, link, load_error_panel},
    import::{GmailQuery, gmail_status_alert},
    navigation::NavBar,
    timezone::local_today,
    transaction::filter_form,
};

const DASHBOARD_CONTAINER_STYLE: &str = "flex flex-col items-center px-2 lg:px-6 lg:py-8 \
    mx-auto max-w-screen-xl text-gray-900 dark:text-white";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the finance API that holds the user's transactions.
    pub api_client: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's transactions.
///
/// A failure to load the transactions is shown inline with a link to try
/// again. A rejected session ends the session and redirects to the log-in page.
pub async fn get_dashboard_page(
    Extension(session): Extension<Session>,
    State(state): State<DashboardState>,
    Query(filter): Query<TransactionFilter>,
    Query(gmail_query): Query<GmailQuery>,
) -> Response {
    let gmail_alert = gmail_status_alert(gmail_query.gmail.as_deref());

    let transactions = match state.api_client.all_transactions(&session, &filter).await {
        Ok(transactions) => transactions,
        Err(error) => {
            let Some(details) = error.load_failure_message() else {
                return error.into_response();
            };

            tracing::error!("Could not load transactions for the dashboard: {error}");
            let retry_url = dashboard_url(&filter);
            let content = html! {
                (filter_form(endpoints::DASHBOARD_VIEW, &filter))
                div class="w-full max-w-xl" { (load_error_panel(&details, &retry_url)) }
            };

            return (
                StatusCode::BAD_GATEWAY,
                dashboard_shell(&[], gmail_alert, &content),
            )
                .into_response();
        }
    };

    let Some(today) = local_today(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let summary = DashboardSummary::new(Some(&transactions));

    if summary.is_empty() {
        return dashboard_no_data_view(&filter, gmail_alert).into_response();
    }

    let charts = build_dashboard_charts(&summary, today);
    let content = html! {
        (filter_form(endpoints::DASHBOARD_VIEW, &filter))

        p class="w-full mb-4 text-sm text-gray-600 dark:text-gray-400" data-transaction-count
        {
            (summary.transaction_count) " transactions"
        }

        (charts_view(&charts))

        section class="w-full grid grid-cols-1 xl:grid-cols-2 gap-4 mb-8"
        {
            (summary_table(&summary.totals))
            (expense_category_table(&summary.expense_cloud, summary.totals.expense))
        }
    };

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
    ];

    dashboard_shell(&head_elements, gmail_alert, &content).into_response()
}

fn dashboard_url(filter: &TransactionFilter) -> String {
    let query = serde_urlencoded::to_string(filter.to_view_query()).unwrap_or_default();

    if query.is_empty() {
        endpoints::DASHBOARD_VIEW.to_owned()
    } else {
        format!("{}?{query}", endpoints::DASHBOARD_VIEW)
    }
}

/// Creates the dashboard charts from the aggregated transactions.
///
/// `today` is the last day shown on the spending heatmap.
fn build_dashboard_charts(summary: &DashboardSummary, today: Date) -> [DashboardChart; 5] {
    [
        DashboardChart {
            id: "type-totals-chart",
            options: type_totals_chart(type_totals_bar(&summary.totals)).to_string(),
        },
        DashboardChart {
            id: "expense-category-chart",
            options: category_pie_chart(
                "Expenses by Category",
                &category_slices(&summary.expense_categories),
            )
            .to_string(),
        },
        DashboardChart {
            id: "income-category-chart",
            options: category_pie_chart(
                "Income by Category",
                &category_slices(&summary.income_categories),
            )
            .to_string(),
        },
        DashboardChart {
            id: "expense-bubble-chart",
            options: expense_bubble_chart(&expense_bubbles(summary)).to_string(),
        },
        DashboardChart {
            id: "expense-heatmap-chart",
            options: expense_heatmap_chart(&expense_heatmap(&summary.expense_days, today))
                .to_string(),
        },
    ]
}

fn dashboard_no_data_view(filter: &TransactionFilter, gmail_alert: Option<Markup>) -> Markup {
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "manually");
    let import_transaction_link = link(endpoints::IMPORT_VIEW, "importing");

    let content = html!(
        (filter_form(endpoints::DASHBOARD_VIEW, filter))

        div class="flex flex-col items-center px-6 py-8" data-empty-state
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                @if filter.is_empty() {
                    "Charts will show up here once you add some transactions.
                    You can add transactions " (new_transaction_link) " or
                    by " (import_transaction_link) "."
                } @else {
                    "No transactions match these filters. Clear the filters or add transactions "
                    (new_transaction_link) "."
                }
            }
        }
    );

    dashboard_shell(&[], gmail_alert, &content)
}

fn dashboard_shell(
    head_elements: &[HeadElement],
    gmail_alert: Option<Markup>,
    content: &Markup,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main id="dashboard-content" class=(DASHBOARD_CONTAINER_STYLE)
        {
            @if let Some(alert) = gmail_alert {
                div class="w-full max-w-xl mb-4" { (alert) }
            }

            (content)
        }
    );

    base("Dashboard", head_elements, &content)
}
