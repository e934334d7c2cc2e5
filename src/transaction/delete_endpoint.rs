use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    api::{ApiClient, TransactionFilter},
    auth::Session,
    pagination::page_after_delete,
    transaction::{TransactionId, transactions_page::transactions_page_url},
};

/// The page the transaction was deleted from.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// The 1-based page the user was looking at.
    pub page: Option<u64>,
    /// How many rows that page had before the delete.
    pub rows_on_page: Option<u64>,
}

/// A route handler for deleting a transaction.
///
/// On success the client is sent back to the transactions page it came from,
/// or the page before it if the deleted row was the last one on its page.
pub async fn delete_transaction_endpoint(
    Extension(session): Extension<Session>,
    State(api_client): State<ApiClient>,
    Path(transaction_id): Path<TransactionId>,
    Query(delete_query): Query<DeleteQuery>,
    Query(filter): Query<TransactionFilter>,
) -> Response {
    if let Err(error) = api_client
        .delete_transaction(&session, transaction_id)
        .await
    {
        tracing::error!("Could not delete transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    let page = page_after_delete(
        delete_query.page.unwrap_or(1),
        delete_query.rows_on_page.unwrap_or(0),
    );

    // The status code has to be 200 OK or HTMX will not follow the redirect.
    (
        HxRedirect(transactions_page_url(&filter, page)),
        StatusCode::OK,
    )
        .into_response()
}
