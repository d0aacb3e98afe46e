use std::{
    error::Error,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_control::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The REST API server for expense_control.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The IP address to serve the API from.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "EXPENSE_CONTROL_PORT", default_value_t = 3000)]
    port: u16,

    /// An origin that may call the API from a browser, e.g. the address of the web client.
    ///
    /// May be given more than once.
    #[arg(
        long = "allowed-origin",
        default_values = [
            "http://localhost:5173",
            "http://localhost:3000",
            "http://127.0.0.1:5173",
        ]
    )]
    allowed_origins: Vec<String>,

    /// File path to write debug logs to, in addition to stdout.
    #[arg(long)]
    log_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(args.log_path.as_ref())?;

    let addr = SocketAddr::from((args.address, args.port));

    let connection = Connection::open(&args.db_path)?;
    let state = AppState::new(connection)?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let cors = build_cors_layer(&args.allowed_origins)?;
    let router = add_tracing_layer(
        build_router(state)
            .layer(middleware::from_fn(logging_middleware))
            .layer(cors),
    );

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging(log_path: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = match log_path {
        Some(log_path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn build_cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, Box<dyn Error>> {
    let origins = allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]))
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
        // By default, `TraceLayer` will log 5xx responses but `Error` already
        // logs its internal errors, so disable that.
        .on_failure(());

    router.layer(tracing_layer)
}
