use std::{env, fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use cashboard::{
    ApiClient, AppState, DEFAULT_IMPORT_SENDER, DEFAULT_IMPORT_SUBJECT, ImportConfig,
    PaginationConfig, build_router, graceful_shutdown, logging_middleware,
};

/// The web server for the cashboard finance dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the finance REST API.
    #[arg(long, default_value = "http://localhost:8080/api")]
    api_url: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// The number of transactions to show per page.
    #[arg(long, default_value_t = 10)]
    page_size: u64,

    /// The sender of the bank statement emails to import.
    #[arg(long, default_value = DEFAULT_IMPORT_SENDER)]
    import_sender: String,

    /// The subject of the bank statement emails to import.
    #[arg(long, default_value = DEFAULT_IMPORT_SUBJECT)]
    import_subject: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    if time_tz::timezones::get_by_name(&args.timezone).is_none() {
        tracing::error!(
            "Unknown timezone \"{}\", use a canonical name such as \"Pacific/Auckland\"",
            args.timezone
        );
        std::process::exit(1);
    }

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let api_client = match ApiClient::new(&args.api_url) {
        Ok(api_client) => api_client,
        Err(error) => {
            tracing::error!("Could not create the finance API client: {error}");
            std::process::exit(1);
        }
    };

    match api_client.health().await {
        Ok(status) if status.success => {
            tracing::info!("Finance API at {} is up", api_client.base_url())
        }
        Ok(status) => tracing::warn!(
            "Finance API at {} reported a problem: {}",
            api_client.base_url(),
            status.message.unwrap_or_default()
        ),
        Err(error) => tracing::warn!(
            "Could not check the finance API at {}: {error}",
            api_client.base_url()
        ),
    }

    let pagination_config = PaginationConfig {
        page_size: args.page_size.max(1),
        ..Default::default()
    };
    let import_config = ImportConfig {
        sender: args.import_sender,
        subject: args.import_subject,
    };
    let state = AppState::new(
        &secret,
        &args.timezone,
        pagination_config,
        api_client,
        import_config,
    );

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        std::process::exit(1);
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
