//! REST API server for textlift document extraction.
//!
//! An Axum-based HTTP surface over the extraction pipeline. The handlers are
//! a thin boundary layer: they validate the upload framing, stage the bytes
//! on disk, and map library errors to status codes. No extraction decisions
//! live here.
//!
//! # Endpoints
//!
//! - `POST /extract` - Extract text from an uploaded file (multipart form data)
//! - `GET /health` - Health check endpoint
//!
//! # Examples
//!
//! ## Starting the server
//!
//! ```no_run
//! use textlift::api::serve;
//!
//! #[tokio::main]
//! async fn main() -> textlift::Result<()> {
//!     serve("127.0.0.1", 8000).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Embedding the router in your app
//!
//! ```no_run
//! use axum::Router;
//! use textlift::{ExtractionConfig, api::create_router};
//!
//! #[tokio::main]
//! async fn main() -> textlift::Result<()> {
//!     let router = create_router(ExtractionConfig::default());
//!     let app = Router::new().nest("/api", router);
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! # Extract a PDF
//! curl -F "file=@document.pdf" http://localhost:8000/extract
//!
//! # Override the detected content type
//! curl -F "file=@scan.bin" -F "contentType=image/png" http://localhost:8000/extract
//!
//! # Health check
//! curl http://localhost:8000/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, create_router_with_limits, serve, serve_with_config_and_limits};
pub use types::{ApiSizeLimits, ApiState, ErrorResponse, ExtractResponse, HealthResponse};
