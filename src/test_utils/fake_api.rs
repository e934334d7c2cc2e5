//! An in-process stand-in for the finance API.

use axum::Router;
use tokio::net::TcpListener;

use crate::{AppState, api::ApiClient, import::ImportConfig, pagination::PaginationConfig};

/// Serve `routes` under `/api` on an ephemeral port and return a client for it.
///
/// Routes are written relative to the API base, e.g. `/transactions/all`.
pub(crate) async fn spawn_fake_api(routes: Router) -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind fake finance API");
    let address = listener
        .local_addr()
        .expect("Could not get fake finance API address");
    let app = Router::new().nest("/api", routes);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Fake finance API stopped");
    });

    ApiClient::new(&format!("http://{address}/api")).expect("Could not create API client")
}

/// A client whose requests always fail to connect.
pub(crate) fn unreachable_api_client() -> ApiClient {
    let address = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("Could not reserve a port");

    // The listener is dropped here, so nothing accepts connections on the port.
    ApiClient::new(&format!("http://{address}/api")).expect("Could not create API client")
}

/// App state backed by a fake finance API serving `routes`.
pub(crate) async fn fake_app_state(routes: Router) -> AppState {
    AppState::new(
        "test-secret",
        "Etc/UTC",
        PaginationConfig::default(),
        spawn_fake_api(routes).await,
        ImportConfig::default(),
    )
}
