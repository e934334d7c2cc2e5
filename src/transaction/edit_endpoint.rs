use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    api::ApiClient,
    auth::Session,
    transaction::{TransactionId, edit_page::RedirectQuery, form::TransactionForm},
};

/// Saves the changes to a transaction and sends the user back to the page
/// they came from.
pub async fn edit_transaction_endpoint(
    Extension(session): Extension<Session>,
    State(api_client): State<ApiClient>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!("Rejected transaction form: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = api_client
        .update_transaction(&session, transaction_id, &payload)
        .await
    {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(query.redirect_url_or_default()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        routing::put,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use serde_json::Value;

    use crate::{
        auth::{AuthToken, Session},
        endpoints,
        test_utils::spawn_fake_api,
        transaction::{TransactionType, edit_page::RedirectQuery, form::TransactionForm},
    };

    use super::edit_transaction_endpoint;

    fn session() -> Session {
        Session::Anonymous.log_in(AuthToken::new("token"))
    }

    fn form() -> TransactionForm {
        TransactionForm {
            type_: TransactionType::Income,
            amount: 50.0,
            date: None,
            description: "Refund".to_owned(),
            category: None,
        }
    }

    #[tokio::test]
    async fn updates_transaction_and_redirects() {
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let api_client = spawn_fake_api(Router::new().route(
            "/transactions/{id}",
            put(
                move |axum::extract::Path(id): axum::extract::Path<i64>,
                      Json(body): Json<Value>| {
                    let sink = sink.clone();
                    async move {
                        *sink.lock().unwrap() = Some((id, body));
                        StatusCode::OK
                    }
                },
            ),
        ))
        .await;

        let response = edit_transaction_endpoint(
            Extension(session()),
            State(api_client),
            Path(7),
            Query(RedirectQuery {
                redirect_url: Some("/transactions?page=3".to_owned()),
            }),
            Form(form()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            "/transactions?page=3"
        );
        let (id, body) = received.lock().unwrap().take().unwrap();
        assert_eq!(id, 7);
        assert_eq!(body["type"], "RECEITA");
        assert_eq!(body["description"], "Refund");
    }

    #[tokio::test]
    async fn missing_transaction_returns_not_found_alert() {
        let api_client = spawn_fake_api(Router::new().route(
            "/transactions/{id}",
            put(|| async { StatusCode::NOT_FOUND }),
        ))
        .await;

        let response = edit_transaction_endpoint(
            Extension(session()),
            State(api_client),
            Path(7),
            Query(RedirectQuery::default()),
            Form(form()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(HX_REDIRECT).is_none());
    }

    #[tokio::test]
    async fn redirects_to_transactions_page_by_default() {
        let api_client = spawn_fake_api(
            Router::new().route("/transactions/{id}", put(|| async { StatusCode::OK })),
        )
        .await;

        let response = edit_transaction_endpoint(
            Extension(session()),
            State(api_client),
            Path(1),
            Query(RedirectQuery::default()),
            Form(form()),
        )
        .await;

        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::TRANSACTIONS_VIEW
        );
    }
}
