use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error,
    api::ApiClient,
    auth::Session,
    endpoints,
    transaction::{TransactionPayload, TransactionType, parse_date},
};

/// The rows of the import review form.
///
/// Each field holds one value per row, in the order the rows appear in the
/// form.
#[derive(Debug, Default, Deserialize)]
pub struct ImportConfirmForm {
    #[serde(default)]
    description: Vec<String>,
    #[serde(default)]
    amount: Vec<f64>,
    #[serde(default)]
    date: Vec<String>,
    #[serde(default)]
    type_: Vec<TransactionType>,
    #[serde(default)]
    category: Vec<String>,
}

impl ImportConfirmForm {
    fn into_payloads(self) -> Result<Vec<TransactionPayload>, Error> {
        let row_count = self.description.len();

        if row_count == 0 {
            return Err(Error::InvalidImportForm("no transactions selected".to_owned()));
        }

        if [
            self.amount.len(),
            self.date.len(),
            self.type_.len(),
            self.category.len(),
        ]
        .iter()
        .any(|&len| len != row_count)
        {
            return Err(Error::InvalidImportForm(
                "every transaction needs a description, amount, date, type and category field"
                    .to_owned(),
            ));
        }

        if self.amount.iter().any(|amount| !amount.is_finite()) {
            return Err(Error::InvalidImportForm(
                "every amount must be a finite number".to_owned(),
            ));
        }

        let payloads = self
            .description
            .into_iter()
            .zip(self.amount)
            .zip(self.date)
            .zip(self.type_)
            .zip(self.category)
            .map(|((((description, amount), date), type_), category)| {
                let category = category.trim();

                TransactionPayload {
                    description: description.trim().to_owned(),
                    amount: amount.abs(),
                    transaction_date: parse_date(&date),
                    category: (!category.is_empty()).then(|| category.to_owned()),
                    type_,
                }
            })
            .collect();

        Ok(payloads)
    }
}

/// Save the reviewed import rows through the finance API and send the client
/// to the transactions page.
pub async fn confirm_import_endpoint(
    Extension(session): Extension<Session>,
    State(api_client): State<ApiClient>,
    Form(form): Form<ImportConfirmForm>,
) -> Response {
    let payloads = match form.into_payloads() {
        Ok(payloads) => payloads,
        Err(error) => {
            tracing::warn!("Rejected import confirmation: {error}");
            return error.into_alert_response();
        }
    };

    match api_client.confirm_import(&session, &payloads).await {
        Ok(()) => {
            tracing::info!("Imported {} transactions", payloads.len());
            (
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not confirm import: {error}");
            error.into_alert_response()
        }
    }
}
