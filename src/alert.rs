//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are returned by HTMX endpoints and swapped into the
//! `#alert-container` element that [crate::html::base] places on every page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A dismissible message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded and there is more to say about it.
    Success {
        /// The headline shown in bold.
        message: String,
        /// Supporting text shown under the headline.
        details: String,
    },
    /// The action succeeded.
    SuccessSimple {
        /// The headline shown in bold.
        message: String,
    },
    /// The action failed.
    Error {
        /// The headline shown in bold.
        message: String,
        /// What went wrong and, ideally, how to fix it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, None),
            Alert::Error { message, details } => (ERROR_STYLE, message, Some(details)),
        };

        html! {
            div role="alert" class=(container_style)
            {
                div class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        p class="font-bold" { (message) }

                        @if let Some(details) = details.filter(|details| !details.is_empty()) {
                            p class="text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold leading-none"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_html()).into_response()
    }
}

const SUCCESS_STYLE: &str = "p-4 mb-4 rounded border-l-4 border-green-600 \
    bg-green-100 text-green-800 shadow dark:bg-green-900 dark:text-green-100";

const ERROR_STYLE: &str = "p-4 mb-4 rounded border-l-4 border-red-600 \
    bg-red-100 text-red-800 shadow dark:bg-red-900 dark:text-red-100";

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    fn render(alert: Alert) -> Html {
        Html::parse_fragment(&alert.into_html().into_string())
    }

    #[test]
    fn error_alert_shows_message_and_details() {
        let html = render(Alert::Error {
            message: "Could not delete transaction".to_owned(),
            details: "The transaction could not be found.".to_owned(),
        });

        let paragraphs = html
            .select(&Selector::parse("[role=alert] p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();

        assert_eq!(
            paragraphs,
            [
                "Could not delete transaction",
                "The transaction could not be found."
            ]
        );
    }

    #[test]
    fn simple_alert_omits_details() {
        let html = render(Alert::SuccessSimple {
            message: "Imported 3 transactions".to_owned(),
        });

        let paragraphs = html.select(&Selector::parse("p").unwrap()).count();

        assert_eq!(paragraphs, 1);
    }
}
