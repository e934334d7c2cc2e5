//! Defines the route handler for the page for editing an existing transaction.

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    api::ApiClient,
    auth::{Session, normalize_redirect_url},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, currency_input_styles,
        load_error_panel, loading_spinner,
    },
    navigation::NavBar,
    transaction::{
        Transaction, TransactionId,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

/// Where to send the user once the transaction has been saved.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

impl RedirectQuery {
    /// The safe, same-site redirect URL, or the transactions page if there is none.
    pub fn redirect_url_or_default(&self) -> String {
        self.redirect_url
            .as_deref()
            .and_then(normalize_redirect_url)
            .unwrap_or_else(|| endpoints::TRANSACTIONS_VIEW.to_owned())
    }
}

fn edit_transaction_endpoint_url(transaction_id: TransactionId, redirect_url: &str) -> String {
    let endpoint = format_endpoint(endpoints::TRANSACTION, transaction_id);

    match serde_urlencoded::to_string([("redirect_url", redirect_url)]) {
        Ok(query) => format!("{endpoint}?{query}"),
        Err(error) => {
            tracing::warn!("Could not encode redirect URL {redirect_url}: {error}");
            endpoint
        }
    }
}

fn edit_transaction_view(transaction: &Transaction, redirect_url: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let transaction_id = transaction.id.unwrap_or_default();
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        type_: transaction.type_,
        amount: Some(transaction.magnitude()),
        date: transaction.date,
        description: Some(&transaction.description),
        category: transaction.category.as_deref(),
        autofocus_amount: false,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(edit_transaction_endpoint_url(transaction_id, redirect_url))
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (form_fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" id="indicator"
                    {
                        (loading_spinner())
                    }
                    "Save Changes"
                }

                a href=(redirect_url) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Transaction", &[currency_input_styles()], &content)
}

fn load_error_view(transaction_id: TransactionId, details: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let retry_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (load_error_panel(details, &retry_url))
        }
    };

    base("Edit Transaction", &[], &content)
}

/// Renders the page for editing a transaction.
///
/// Responds with the 404 page if the finance API has no transaction with the
/// given ID.
pub async fn get_edit_transaction_page(
    Extension(session): Extension<Session>,
    State(api_client): State<ApiClient>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let transaction = match api_client.find_transaction(&session, transaction_id).await {
        Ok(transaction) => transaction,
        Err(error) => {
            return match error.load_failure_message() {
                Some(details) => {
                    tracing::error!("Could not load transaction {transaction_id}: {error}");
                    (
                        StatusCode::BAD_GATEWAY,
                        load_error_view(transaction_id, &details),
                    )
                        .into_response()
                }
                None => error.into_response(),
            };
        }
    };

    edit_transaction_view(&transaction, &query.redirect_url_or_default()).into_response()
}
