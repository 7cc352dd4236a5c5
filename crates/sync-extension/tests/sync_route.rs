//! HTTP-level tests for the sync endpoint against stub pipelines.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use sync_extension::{Pipeline, PipelineError, SYNC_ROUTE, StepError, build_router};
use tower::ServiceExt;

#[derive(Default)]
struct CountingPipeline {
	runs: AtomicUsize,
}

impl Pipeline for CountingPipeline {
	fn run(&self) -> Result<(), PipelineError> {
		self.runs.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

struct FailingPipeline(fn() -> PipelineError);

impl Pipeline for FailingPipeline {
	fn run(&self) -> Result<(), PipelineError> {
		Err((self.0)())
	}
}

/// Records how many runs are in flight at once.
#[derive(Default)]
struct SlowPipeline {
	running: AtomicUsize,
	max_running: AtomicUsize,
}

impl Pipeline for SlowPipeline {
	fn run(&self) -> Result<(), PipelineError> {
		let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_running.fetch_max(now, Ordering::SeqCst);
		thread::sleep(Duration::from_millis(200));
		self.running.fetch_sub(1, Ordering::SeqCst);
		Ok(())
	}
}

struct PanickingPipeline;

impl Pipeline for PanickingPipeline {
	fn run(&self) -> Result<(), PipelineError> {
		panic!("worker blew up");
	}
}

async fn call(pipeline: Arc<dyn Pipeline>, method: Method, uri: &str) -> (StatusCode, String) {
	let response = build_router(pipeline)
		.oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let body = response.into_body().collect().await.unwrap().to_bytes();
	(status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn any_method_runs_the_pipeline() {
	let pipeline = Arc::new(CountingPipeline::default());
	for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
		let (status, body) = call(pipeline.clone(), method, SYNC_ROUTE).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, "ok");
	}
	assert_eq!(pipeline.runs.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn failure_names_the_stage() {
	let cases: [(fn() -> PipelineError, &str); 4] = [
		(|| PipelineError::Copy(StepError::Manifest("x")), "copy failed"),
		(|| PipelineError::Patch(StepError::Manifest("x")), "patch failed"),
		(|| PipelineError::Archive(StepError::Manifest("x")), "archive failed"),
		(|| PipelineError::Upload(StepError::Manifest("x")), "upload failed"),
	];
	for (make, expected) in cases {
		let (status, body) = call(Arc::new(FailingPipeline(make)), Method::POST, SYNC_ROUTE).await;
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body, expected);
	}
}

#[tokio::test]
async fn panicking_worker_is_a_server_error() {
	let (status, body) = call(Arc::new(PanickingPipeline), Method::GET, SYNC_ROUTE).await;
	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body, "pipeline task failed");
}

#[tokio::test]
async fn other_paths_are_not_found() {
	let pipeline = Arc::new(CountingPipeline::default());
	let (status, _) = call(pipeline.clone(), Method::GET, "/api/other").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(pipeline.runs.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_requests_run_one_at_a_time() {
	let pipeline = Arc::new(SlowPipeline::default());
	let router = build_router(pipeline.clone());
	let request = || Request::builder().method(Method::POST).uri(SYNC_ROUTE).body(Body::empty()).unwrap();

	let (first, second) = tokio::join!(router.clone().oneshot(request()), router.oneshot(request()));
	assert_eq!(first.unwrap().status(), StatusCode::OK);
	assert_eq!(second.unwrap().status(), StatusCode::OK);
	assert_eq!(pipeline.max_running.load(Ordering::SeqCst), 1);
	assert_eq!(pipeline.running.load(Ordering::SeqCst), 0);
}
