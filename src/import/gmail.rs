//! Connecting the user's Gmail account so the finance API can read their
//! bank statements.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::Markup;
use serde::Deserialize;

use crate::{Error, alert::Alert, api::ApiClient, auth::Session, endpoints};

/// The outcome of the Google consent screen, added to the URL by the finance
/// API when it sends the user back.
#[derive(Debug, Default, Deserialize)]
pub struct GmailQuery {
    /// "connected" or "error".
    pub gmail: Option<String>,
}

/// An alert describing the outcome of connecting Gmail, if there was one.
pub fn gmail_status_alert(status: Option<&str>) -> Option<Markup> {
    let alert = match status? {
        "connected" => Alert::SuccessSimple {
            message: "Gmail connected successfully.".to_owned(),
        },
        "error" => Alert::Error {
            message: "Could not connect Gmail".to_owned(),
            details: "Google did not grant access to your inbox. Please try again.".to_owned(),
        },
        other => {
            tracing::debug!("Ignoring unknown Gmail status {other:?}");
            return None;
        }
    };

    Some(alert.into_html())
}

/// Send the user to the Google consent screen.
///
/// If the finance API cannot provide the consent screen URL, the user is sent
/// to the import page with an error alert instead.
pub async fn get_gmail_connect(
    Extension(session): Extension<Session>,
    State(api_client): State<ApiClient>,
) -> Response {
    match api_client.gmail_authorize_url(&session).await {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(Error::Unauthenticated) => Error::Unauthenticated.into_response(),
        Err(error) => {
            tracing::error!("Could not get the Gmail authorization URL: {error}");
            Redirect::to(&format!("{}?gmail=error", endpoints::IMPORT_VIEW)).into_response()
        }
    }
}
