//! Defines the route handler for the page for creating a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles, loading_spinner},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        core::TransactionType,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn create_transaction_view(today: Option<Date>) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        type_: TransactionType::Expense,
        amount: None,
        date: today,
        description: None,
        category: None,
        autofocus_amount: true,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                (form_fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" id="indicator"
                    {
                        (loading_spinner())
                    }
                    "Create Transaction"
                }
            }
        }
    };

    base("Create Transaction", &[currency_input_styles()], &content)
}

/// Renders the page for creating a transaction, with today's date filled in.
pub async fn get_new_transaction_page(State(state): State<CreateTransactionPageState>) -> Response {
    let today = local_today(&state.local_timezone);

    if today.is_none() {
        tracing::warn!(
            "Invalid timezone {}, leaving the transaction date blank",
            state.local_timezone
        );
    }

    create_transaction_view(today).into_response()
}
