//! sync-extension server.
//!
//! Reads config from `SYNC_EXTENSION_*` env vars, see [`SyncConfig`].

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::sync::Arc;

use anyhow::Context;
use sync_extension::{ShellPipeline, SyncConfig, build_router};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "sync_extension=debug,tower_http=debug".into()),
		)
		.init();

	let config = SyncConfig::from_env()?;
	tracing::info!(
		distribution = %config.distribution_dir.display(),
		work_dir = %config.work_dir.display(),
		"loaded config"
	);

	let bind_addr = config.bind_addr;
	let app = build_router(Arc::new(ShellPipeline::new(config)));

	let listener = TcpListener::bind(bind_addr)
		.await
		.with_context(|| format!("failed to bind to {bind_addr}"))?;
	tracing::info!("sync-extension listening on {bind_addr}");

	axum::serve(listener, app).await.context("server error")?;
	Ok(())
}
