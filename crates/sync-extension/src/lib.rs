//! Endpoint that rebuilds the browser extension bundle from the local
//! distribution build and uploads it to cloud storage.

use std::sync::Arc;

use axum::Router;
use axum::routing::any;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;

pub use config::SyncConfig;
pub use pipeline::{Pipeline, PipelineError, ShellPipeline, StepError};
pub use routes::{SYNC_ROUTE, SyncState};

/// Router serving [`SYNC_ROUTE`] with `pipeline`. Runs are serialized
/// across every request this router handles.
pub fn build_router(pipeline: Arc<dyn Pipeline>) -> Router {
	Router::new()
		.route(SYNC_ROUTE, any(routes::sync_extension_code))
		.layer(TraceLayer::new_for_http())
		.with_state(SyncState::new(pipeline))
}
