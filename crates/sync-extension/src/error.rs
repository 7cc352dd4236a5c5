//! Route errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

use crate::pipeline::PipelineError;

/// Failure of a sync request.
#[derive(Debug, Error)]
pub enum SyncError {
	/// A pipeline stage failed.
	#[error(transparent)]
	Pipeline(#[from] PipelineError),
	/// The blocking worker panicked or was cancelled.
	#[error("pipeline task failed: {0}")]
	Task(#[from] JoinError),
}

impl IntoResponse for SyncError {
	fn into_response(self) -> Response {
		error!(error = %self, "extension sync failed");
		let body = match &self {
			Self::Pipeline(e) => format!("{} failed", e.stage()),
			Self::Task(_) => "pipeline task failed".to_owned(),
		};
		(StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
	}
}
