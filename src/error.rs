//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    alert::Alert, auth::expired_session_cookie, endpoints,
    internal_server_error::ServerErrorPage, not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The finance API rejected the email and password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The finance API refused to register the user, usually because the
    /// email address is already in use.
    ///
    /// Holds the message returned by the finance API.
    #[error("could not register user: {0}")]
    EmailTaken(String),

    /// The request has no session, or the finance API rejected the session's
    /// token.
    ///
    /// Handlers should end the session and send the user to the log-in page.
    #[error("the session is missing or was rejected by the finance API")]
    Unauthenticated,

    /// The session cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar")]
    CookieMissing,

    /// The session cookie could not be read or written.
    ///
    /// Callers should pass in the original error as a string.
    #[error("invalid session cookie: {0}")]
    InvalidSessionCookie(String),

    /// The finance API could not be reached.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not reach the finance API: {0}")]
    Network(String),

    /// The finance API responded with an unexpected status code.
    #[error("the finance API responded with {status}: {message}")]
    Api {
        /// The HTTP status code of the response.
        status: u16,
        /// The error message from the response body, if any.
        message: String,
    },

    /// The finance API responded with a body that could not be decoded.
    #[error("could not decode the finance API response: {0}")]
    InvalidApiResponse(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that does not exist")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that does not exist")]
    DeleteMissingTransaction,

    /// A transaction form was submitted with an amount that is not a finite
    /// number, e.g. "NaN" or "inf".
    #[error("the amount {0} is not a finite number")]
    InvalidAmount(f64),

    /// The import confirmation form had mismatched or malformed rows.
    #[error("invalid import form: {0}")]
    InvalidImportForm(String),

    /// The finance API returned something other than an HTTP(S) URL for the
    /// Gmail authorization page.
    #[error("invalid Gmail authorization URL \"{0}\"")]
    InvalidAuthorizeUrl(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthenticated => (
                AppendHeaders([(SET_COOKIE, expired_session_cookie().to_string())]),
                Redirect::to(endpoints::LOG_IN_VIEW),
            )
                .into_response(),
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => ServerErrorPage {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..Default::default()
            }
            .into_response(),
            Error::Network(error) => {
                tracing::error!("Could not reach the finance API: {error}");
                ServerErrorPage::finance_api_unavailable().into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ServerErrorPage::default().into_response()
            }
        }
    }
}

impl Error {
    /// A user-facing explanation for data that could not be loaded from the
    /// finance API.
    ///
    /// Returns `None` for errors that should not be shown inline, e.g.
    /// [Error::Unauthenticated], which must end the session instead.
    pub fn load_failure_message(&self) -> Option<String> {
        match self {
            Error::Network(_) => Some("Could not reach the finance service.".to_owned()),
            Error::Api { status, message } if message.is_empty() => Some(format!(
                "The finance service responded with status {status}."
            )),
            Error::Api { message, .. } => Some(message.clone()),
            Error::InvalidApiResponse(_) => {
                Some("The finance service sent data that could not be read.".to_owned())
            }
            _ => None,
        }
    }

    /// Convert the error into an HTTP response with an HTML alert.
    ///
    /// [Error::Unauthenticated] is the exception: it clears the session
    /// cookie and redirects the client to the log-in page via HTMX.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Unauthenticated => {
                return (
                    StatusCode::OK,
                    HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                    AppendHeaders([(SET_COOKIE, expired_session_cookie().to_string())]),
                )
                    .into_response();
            }
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::Network(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not reach the finance service".to_owned(),
                    details: "Check your connection and try again.".to_owned(),
                },
            ),
            Error::Api { status, message } => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "The finance service reported an error".to_owned(),
                    details: if message.is_empty() {
                        format!("The request failed with status {status}.")
                    } else {
                        message
                    },
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested item could not be found.".to_owned(),
                },
            ),
            Error::InvalidAmount(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: "Enter the amount as a number, e.g. 12.50.".to_owned(),
                },
            ),
            Error::InvalidImportForm(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not import transactions".to_owned(),
                    details: format!("The confirmation form was invalid: {reason}."),
                },
            ),
            Error::InvalidAuthorizeUrl(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not connect Gmail".to_owned(),
                    details: "The finance service did not return a valid authorization link."
                        .to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
