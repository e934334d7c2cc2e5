use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner},
    import::{GmailQuery, ImportConfig, ImportState, gmail_status_alert},
    navigation::NavBar,
};

fn import_controls(config: &ImportConfig) -> Markup {
    html! {
        section class="w-full max-w-md space-y-4"
        {
            p
            {
                "Cashboard reads the bank statements sent by "
                strong { (config.sender) }
                " with the subject "
                strong { "\"" (config.subject) "\"" }
                " and lists the transactions it finds for you to review."
            }

            a href=(endpoints::GMAIL_CONNECT_VIEW) class=(BUTTON_SECONDARY_STYLE) role="button"
            {
                "Connect Gmail"
            }

            button
                type="button"
                id="analyze-button"
                hx-post=(endpoints::IMPORT_ANALYZE_API)
                hx-target="#import-preview"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="this"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                " Find Transactions"
            }
        }
    }
}

fn import_view(config: &ImportConfig, gmail_alert: Option<Markup>) -> Markup {
    let nav_bar = NavBar::new(endpoints::IMPORT_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Import Transactions" }

            @if let Some(alert) = gmail_alert {
                div class="w-full max-w-md mb-4" { (alert) }
            }

            (import_controls(config))

            section id="import-preview" class="w-full lg:max-w-5xl mt-6" {}
        }
    };

    base("Import Transactions", &[], &content)
}

/// Route handler for the page for importing transactions from bank statement emails.
pub async fn get_import_page(
    State(state): State<ImportState>,
    Query(query): Query<GmailQuery>,
) -> Response {
    let gmail_alert = gmail_status_alert(query.gmail.as_deref());

    import_view(&state.import_config, gmail_alert).into_response()
}
