//! API server setup and configuration.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::core::extractor::Extractor;
use crate::{ExtractionConfig, Result};

use super::{
    handlers::{extract_handler, health_handler},
    types::{ApiSizeLimits, ApiState},
};

/// Parse size limits from the environment.
///
/// Reads `TEXTLIFT_MAX_UPLOAD_SIZE_MB`; falls back to the 50 MB default when
/// unset, zero, or unparseable.
fn parse_size_limits_from_env() -> ApiSizeLimits {
    if let Ok(value) = std::env::var("TEXTLIFT_MAX_UPLOAD_SIZE_MB") {
        match value.parse::<usize>() {
            Ok(mb) if mb > 0 => {
                tracing::info!("Upload size limit configured from environment: {} MB", mb);
                return ApiSizeLimits::from_mb(mb);
            }
            Ok(_) => {
                tracing::warn!("Invalid TEXTLIFT_MAX_UPLOAD_SIZE_MB value (must be > 0), using default");
            }
            Err(_) => {
                tracing::warn!(
                    "Failed to parse TEXTLIFT_MAX_UPLOAD_SIZE_MB='{}', must be a valid usize",
                    value
                );
            }
        }
    }

    let limits = ApiSizeLimits::default();
    tracing::info!(
        "Upload size limit: 50 MB (default, {} bytes) - Configure with TEXTLIFT_MAX_UPLOAD_SIZE_MB",
        limits.max_request_body_bytes
    );
    limits
}

/// Create the API router with all routes configured.
///
/// Public to allow embedding the router in a larger application.
///
/// # Examples
///
/// ```no_run
/// use textlift::{ExtractionConfig, api::create_router};
///
/// # #[tokio::main]
/// # async fn main() {
/// let router = create_router(ExtractionConfig::default());
/// # }
/// ```
pub fn create_router(config: ExtractionConfig) -> Router {
    create_router_with_limits(config, ApiSizeLimits::default())
}

/// Create the API router with custom size limits.
///
/// # Examples
///
/// ```no_run
/// use textlift::{ExtractionConfig, api::{ApiSizeLimits, create_router_with_limits}};
///
/// # #[tokio::main]
/// # async fn main() {
/// let router = create_router_with_limits(ExtractionConfig::default(), ApiSizeLimits::from_mb(200));
/// # }
/// ```
pub fn create_router_with_limits(config: ExtractionConfig, limits: ApiSizeLimits) -> Router {
    let state = ApiState {
        extractor: Arc::new(Extractor::new(config)),
    };

    let cors_layer = if let Ok(origins_str) = std::env::var("TEXTLIFT_CORS_ORIGINS") {
        let origins: Vec<_> = origins_str
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if !origins.is_empty() {
            tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            tracing::warn!("TEXTLIFT_CORS_ORIGINS set but empty/invalid, falling back to permissive CORS");
            CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
        }
    } else {
        tracing::warn!(
            "CORS configured to allow all origins (default). For production, set TEXTLIFT_CORS_ORIGINS \
             to a comma-separated list of allowed origins"
        );
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    };

    Router::new()
        .route("/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(limits.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server with config file discovery.
///
/// Searches for `textlift.toml` in the current and parent directories; uses
/// the default configuration when no file is found.
///
/// # Examples
///
/// ```no_run
/// use textlift::api::serve;
///
/// #[tokio::main]
/// async fn main() -> textlift::Result<()> {
///     serve("127.0.0.1", 8000).await?;
///     Ok(())
/// }
/// ```
pub async fn serve(host: impl AsRef<str>, port: u16) -> Result<()> {
    let config = match ExtractionConfig::discover()? {
        Some(config) => {
            tracing::info!("Loaded extraction config from discovered file");
            config
        }
        None => {
            tracing::info!("No config file found, using default configuration");
            ExtractionConfig::default()
        }
    };

    let limits = parse_size_limits_from_env();

    serve_with_config_and_limits(host, port, config, limits).await
}

/// Start the API server with explicit config and size limits.
pub async fn serve_with_config_and_limits(
    host: impl AsRef<str>,
    port: u16,
    config: ExtractionConfig,
    limits: ApiSizeLimits,
) -> Result<()> {
    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| crate::TextliftError::validation(format!("Invalid host address: {}", e)))?;

    let addr = SocketAddr::new(ip, port);
    let app = create_router_with_limits(config, limits);

    tracing::info!("Starting textlift API server on http://{}:{}", ip, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(crate::TextliftError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::TextliftError::Io(std::io::Error::other(e.to_string())))?;

    Ok(())
}
