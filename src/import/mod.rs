//! Importing transactions from bank statement emails.
//!
//! The finance API reads the user's Gmail inbox and returns the transactions
//! it found. Nothing is saved until the user has reviewed the transactions,
//! adjusted their categories and confirmed the import.

mod analyze_endpoint;
mod confirm_endpoint;
mod gmail;
mod import_page;

pub use analyze_endpoint::analyze_import_endpoint;
pub use confirm_endpoint::confirm_import_endpoint;
pub use gmail::{GmailQuery, get_gmail_connect, gmail_status_alert};
pub use import_page::get_import_page;

use axum::extract::FromRef;

use crate::{AppState, api::ApiClient};

/// The sender of the bank statement emails to read by default.
pub const DEFAULT_IMPORT_SENDER: &str = "no-reply@inter.co";

/// The subject of the bank statement emails to read by default.
pub const DEFAULT_IMPORT_SUBJECT: &str = "Seu extrato está disponível";

/// Which emails the finance API should read bank statements from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// The email address the statements are sent from.
    pub sender: String,
    /// The subject line of the statement emails.
    pub subject: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            sender: DEFAULT_IMPORT_SENDER.to_owned(),
            subject: DEFAULT_IMPORT_SUBJECT.to_owned(),
        }
    }
}

/// The state needed for the import endpoints.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The client for the finance API that reads the emails.
    pub api_client: ApiClient,
    /// Which emails to read.
    pub import_config: ImportConfig,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            import_config: state.import_config.clone(),
        }
    }
}
