//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    api::ApiClient, auth::Session, endpoints, transaction::form::TransactionForm,
};

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    Extension(session): Extension<Session>,
    State(api_client): State<ApiClient>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!("Rejected transaction form: {error}");
            return error.into_alert_response();
        }
    };

    match api_client.create_transaction(&session, &payload).await {
        Ok(()) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json, Router,
        body::Body,
        extract::State,
        http::{Response, StatusCode},
        routing::post,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        auth::{AuthToken, Session},
        endpoints,
        test_utils::{parse_html_fragment, select_text, spawn_fake_api, unreachable_api_client},
        transaction::{TransactionType, create_transaction_endpoint, form::TransactionForm},
    };

    fn session() -> Session {
        Session::Anonymous.log_in(AuthToken::new("token"))
    }

    fn form() -> TransactionForm {
        TransactionForm {
            type_: TransactionType::Expense,
            amount: 12.3,
            date: Some(date!(2024 - 06 - 01)),
            description: "test transaction".to_owned(),
            category: Some("Food".to_owned()),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let api_client = spawn_fake_api(Router::new().route(
            "/transactions",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(body);
                    StatusCode::CREATED
                }
            }),
        ))
        .await;

        let response =
            create_transaction_endpoint(Extension(session()), State(api_client), Form(form()))
                .await;

        assert_redirects_to_transactions_view(response);
        assert_eq!(
            received.lock().unwrap().take().unwrap(),
            json!({
                "description": "test transaction",
                "amount": 12.3,
                "transactionDate": "2024-06-01",
                "category": "Food",
                "type": "DESPESA"
            })
        );
    }

    #[tokio::test]
    async fn unreachable_api_returns_alert() {
        let response = create_transaction_endpoint(
            Extension(session()),
            State(unreachable_api_client()),
            Form(form()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(HX_REDIRECT).is_none());
    }

    #[tokio::test]
    async fn non_finite_amount_shows_alert_without_calling_api() {
        let form = TransactionForm {
            amount: f64::NAN,
            ..form()
        };

        let response = create_transaction_endpoint(
            Extension(session()),
            State(unreachable_api_client()),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(HX_REDIRECT).is_none());
        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, "p.font-bold"), ["Invalid amount"]);
    }

    #[track_caller]
    fn assert_redirects_to_transactions_view(response: Response<Body>) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location,
            endpoints::TRANSACTIONS_VIEW,
            "got redirect to {location:?}, want redirect to {}",
            endpoints::TRANSACTIONS_VIEW
        );
    }
}
