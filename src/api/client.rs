//! The HTTP client for the finance API.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    Error,
    api::models::{
        AuthResponse, HealthStatus, LogInRequest, Page, RegisterRequest, TransactionFilter,
    },
    auth::{AuthToken, Session},
    transaction::{Transaction, TransactionId, TransactionPayload},
};

/// How long to wait for the finance API before giving up on a request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A client for the finance REST API.
///
/// Operations that act on behalf of a user take the user's [Session] and send
/// its token as a bearer token. They fail with [Error::Unauthenticated]
/// without touching the network when the session is anonymous.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the finance API at `base_url`, e.g. "http://localhost:8080/api".
    ///
    /// # Errors
    ///
    /// Returns [Error::Network] if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authorized(
        &self,
        session: &Session,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, Error> {
        let token = session.token().ok_or(Error::Unauthenticated)?;

        Ok(self.request(method, path).bearer_auth(token.as_str()))
    }

    /// Send `request` and map unsuccessful responses to errors.
    ///
    /// 401 and 403 become [Error::Unauthenticated], any other non-2xx status
    /// becomes [Error::Api] with the message from the response body.
    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request
            .send()
            .await
            .inspect_err(|e| tracing::warn!("Request to the finance API failed: {e}"))
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!("{} {} -> {status}", response.url().path(), status.as_u16());

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Unauthenticated);
        }

        let message = error_message(response).await;
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    // ========================================================================
    // AUTH
    // ========================================================================

    /// Exchange an email and password for a token.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCredentials] if the finance API rejects the credentials.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<AuthToken, Error> {
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&LogInRequest { email, password });

        let response = self.send(request).await.map_err(|error| match error {
            Error::Unauthenticated => Error::InvalidCredentials,
            error => error,
        })?;

        let body: AuthResponse = decode(response).await?;
        Ok(AuthToken::new(body.token))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmailTaken] with the finance API's message on a conflict.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), Error> {
        let request = self
            .request(Method::POST, "/auth/register")
            .json(&RegisterRequest {
                name,
                email,
                password,
            });

        self.send(request).await.map_err(|error| match error {
            Error::Api {
                status: 409,
                message,
            } => Error::EmailTaken(message),
            error => error,
        })?;

        Ok(())
    }

    // ========================================================================
    // TRANSACTIONS
    // ========================================================================

    /// Fetch one page of transactions matching `filter`. `page` is 0-based.
    pub async fn list_transactions(
        &self,
        session: &Session,
        filter: &TransactionFilter,
        page: u64,
        size: u64,
    ) -> Result<Page<Transaction>, Error> {
        let mut query = filter.to_api_query();
        query.push(("page", page.to_string()));
        query.push(("size", size.to_string()));

        let request = self
            .authorized(session, Method::GET, "/transactions")?
            .query(&query);

        let page: Page<Transaction> = decode(self.send(request).await?).await?;
        warn_on_signed_amounts(&page.content);

        Ok(page)
    }

    /// Fetch every transaction matching `filter`, without pagination.
    pub async fn all_transactions(
        &self,
        session: &Session,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        let request = self
            .authorized(session, Method::GET, "/transactions/all")?
            .query(&filter.to_api_query());

        let transactions = decode_list(self.send(request).await?).await?;
        warn_on_signed_amounts(&transactions);

        Ok(transactions)
    }

    /// Fetch the transaction with `id`.
    ///
    /// The finance API has no endpoint for a single transaction, so it is
    /// looked up in the full list.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    pub async fn find_transaction(
        &self,
        session: &Session,
        id: TransactionId,
    ) -> Result<Transaction, Error> {
        self.all_transactions(session, &TransactionFilter::default())
            .await?
            .into_iter()
            .find(|transaction| transaction.id == Some(id))
            .ok_or(Error::NotFound)
    }

    pub async fn create_transaction(
        &self,
        session: &Session,
        payload: &TransactionPayload,
    ) -> Result<(), Error> {
        let request = self
            .authorized(session, Method::POST, "/transactions")?
            .json(payload);

        self.send(request).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [Error::UpdateMissingTransaction] if there is no transaction with `id`.
    pub async fn update_transaction(
        &self,
        session: &Session,
        id: TransactionId,
        payload: &TransactionPayload,
    ) -> Result<(), Error> {
        let request = self
            .authorized(session, Method::PUT, &format!("/transactions/{id}"))?
            .json(payload);

        self.send(request).await.map_err(|error| match error {
            Error::Api { status: 404, .. } => Error::UpdateMissingTransaction,
            error => error,
        })?;

        Ok(())
    }

    /// # Errors
    ///
    /// Returns [Error::DeleteMissingTransaction] if there is no transaction with `id`.
    pub async fn delete_transaction(
        &self,
        session: &Session,
        id: TransactionId,
    ) -> Result<(), Error> {
        let request = self.authorized(session, Method::DELETE, &format!("/transactions/{id}"))?;

        self.send(request).await.map_err(|error| match error {
            Error::Api { status: 404, .. } => Error::DeleteMissingTransaction,
            error => error,
        })?;

        Ok(())
    }

    // ========================================================================
    // IMPORT
    // ========================================================================

    /// Ask the finance API to read the user's mailbox for bank statements
    /// from `sender` with `subject` and return the transactions it found.
    ///
    /// Nothing is saved until [ApiClient::confirm_import] is called.
    pub async fn analyze_import(
        &self,
        session: &Session,
        sender: &str,
        subject: &str,
    ) -> Result<Vec<Transaction>, Error> {
        let request = self
            .authorized(session, Method::GET, "/transactions/import/analyze")?
            .query(&[("remetente", sender), ("assunto", subject)]);

        decode_list(self.send(request).await?).await
    }

    /// Save the transactions the user confirmed from an import.
    pub async fn confirm_import(
        &self,
        session: &Session,
        payloads: &[TransactionPayload],
    ) -> Result<(), Error> {
        let request = self
            .authorized(session, Method::POST, "/transactions/import/confirm")?
            .json(payloads);

        self.send(request).await?;
        Ok(())
    }

    /// The URL of the Google consent screen for connecting the user's Gmail account.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAuthorizeUrl] if the finance API returns anything
    /// other than an HTTP(S) URL.
    pub async fn gmail_authorize_url(&self, session: &Session) -> Result<String, Error> {
        let request = self.authorized(session, Method::GET, "/gmail/authorize-url")?;

        let body = self
            .send(request)
            .await?
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let url = body.trim().trim_matches('"').trim();
        if url.starts_with("https://") || url.starts_with("http://") {
            Ok(url.to_owned())
        } else {
            Err(Error::InvalidAuthorizeUrl(url.to_owned()))
        }
    }

    // ========================================================================
    // HEALTH
    // ========================================================================

    /// Check that the finance API is up.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        let response = self.send(self.request(Method::GET, "/health")).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        // Some deployments answer with an empty 200.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(HealthStatus {
                success: true,
                message: None,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| Error::InvalidApiResponse(e.to_string()))
    }
}

/// Decode a JSON body that must be present.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    serde_json::from_slice(&bytes)
        .inspect_err(|e| tracing::error!("Could not decode finance API response: {e}"))
        .map_err(|e| Error::InvalidApiResponse(e.to_string()))
}

/// Decode a JSON list, treating an empty body or `null` as an empty list.
async fn decode_list<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, Error> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice::<Option<Vec<T>>>(&bytes)
        .map(Option::unwrap_or_default)
        .inspect_err(|e| tracing::error!("Could not decode finance API response: {e}"))
        .map_err(|e| Error::InvalidApiResponse(e.to_string()))
}

/// Extract a human readable error message from an unsuccessful response.
///
/// Uses the `message` field of a JSON body, then the plain text body, then
/// the status code's reason phrase.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let from_json = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_owned))
        });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_owned(),
        None => status.canonical_reason().unwrap_or_default().to_owned(),
    }
}

/// Amounts are expected to be unsigned with the type carrying the direction.
/// Negative amounts are still counted by magnitude, but are logged so the
/// convention can be revisited if the finance API starts sending them.
fn warn_on_signed_amounts(transactions: &[Transaction]) {
    let negative_count = transactions.iter().filter(|t| t.amount < 0.0).count();

    if negative_count > 0 {
        tracing::warn!(
            "The finance API returned {negative_count} transactions with negative amounts. \
            They are counted by absolute value and classified by type only."
        );
    }
}
