//! Full-page responses for failures in this server or in the finance API behind it.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// An error page with a status code, a short description of what failed and
/// a hint on how to fix it.
pub struct ServerErrorPage<'a> {
    pub status: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for ServerErrorPage<'_> {
    fn default() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl ServerErrorPage<'_> {
    /// The page for when the finance API cannot be reached.
    pub fn finance_api_unavailable() -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            description: "The finance service is unavailable",
            fix: "Check that the finance API is running and try again.",
        }
    }
}

impl IntoResponse for ServerErrorPage<'_> {
    fn into_response(self) -> Response {
        let title = self.status.canonical_reason().unwrap_or("Server Error");
        let page = error_view(title, self.status.as_str(), self.description, self.fix);

        (self.status, Html(page.into_string())).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    ServerErrorPage::default().into_response()
}
