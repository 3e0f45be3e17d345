use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::{Instrument, error, field, info, info_span, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR: &str = "storage/logs";

/// Name of the request span field filled in once a session is verified.
pub const SUBJECT_FIELD: &str = "subject_id";

/// Wraps each request in a `request` span carrying a fresh request id, the
/// matched route and, for authenticated routes, the session subject.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!(
        "request",
        request_id = %uuid::Uuid::new_v4(),
        method = %method,
        path = %matched_path,
        subject_id = field::Empty,
    );

    async move {
        let start = Instant::now();
        info!("Incoming request");
        let response = next.run(req).await;
        log_completion(response.status(), start.elapsed());
        response
    }
    .instrument(span)
    .await
}

fn log_completion(status: StatusCode, latency: Duration) {
    let code = status.as_u16();
    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
    if status.is_server_error() {
        error!(status = code, latency_ms, "Server error");
    } else if status.is_client_error() {
        warn!(status = code, latency_ms, "Client error");
    } else {
        info!(status = code, latency_ms, "Request completed");
    }
}

/// Console output plus daily-rolling files under `storage/logs`:
/// `blog.log` (errors, plain text) and `blog.json` (info and up, JSON).
///
/// `RUST_LOG` overrides the console filter; otherwise `LOG_LEVEL`
/// (default `info`) applies to the workspace crates.
pub fn init_tracing() {
    use std::fs;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{krate}={level},blog_core={level},blog_auth={level},blog_db={level},tower_http=warn,sqlx=warn",
            krate = env!("CARGO_CRATE_NAME"),
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_layers = match fs::create_dir_all(LOG_DIR) {
        Ok(()) => {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "blog.log");
            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new("error"));

            let json_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "blog.json");
            let json_layer = fmt::layer()
                .json()
                .with_writer(json_appender)
                .with_current_span(true)
                .with_span_list(true)
                .with_filter(EnvFilter::new("info"));

            Some(file_layer.and_then(json_layer))
        }
        Err(e) => {
            eprintln!("Failed to create {LOG_DIR}: {e}. Logging to console only.");
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layers)
        .init();
}
