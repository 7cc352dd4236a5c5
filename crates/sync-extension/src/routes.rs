//! HTTP handlers.

use std::sync::Arc;

use axum::extract::State;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::SyncError;
use crate::pipeline::Pipeline;

/// Path of the sync endpoint. Any method triggers it.
pub const SYNC_ROUTE: &str = "/api/syncExtensionCode";

/// Router state: the pipeline and the lock that keeps its runs from overlapping.
#[derive(Clone)]
pub struct SyncState {
	pipeline: Arc<dyn Pipeline>,
	run_lock: Arc<Mutex<()>>,
}

impl SyncState {
	/// State over `pipeline` with its own run lock.
	pub fn new(pipeline: Arc<dyn Pipeline>) -> Self {
		Self { pipeline, run_lock: Arc::new(Mutex::new(())) }
	}
}

/// Run the pipeline on a blocking worker and answer `ok` once it finishes.
///
/// Every run rewrites the same bundle directory and archive, so a request
/// waits for any run in flight before starting its own.
pub async fn sync_extension_code(State(state): State<SyncState>) -> Result<&'static str, SyncError> {
	let _running = state.run_lock.lock().await;
	debug!("pipeline lock acquired");
	let pipeline = state.pipeline.clone();
	tokio::task::spawn_blocking(move || pipeline.run()).await??;
	info!("extension bundle synced");
	Ok("ok")
}
