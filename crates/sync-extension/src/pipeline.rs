//! Extension packaging pipeline: copy, patch manifest, archive, upload.

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SyncConfig;

/// Content script the packaged bundle injects.
pub const ENHANCE_SCRIPT: &str = "content-script/enhance.js";
/// `run_at` of the patched content script.
pub const RUN_AT: &str = "document_idle";

/// Failure inside a single pipeline step.
#[derive(Debug, Error)]
pub enum StepError {
	/// The program could not be started.
	#[error("failed to run `{program}`: {source}")]
	Spawn {
		/// Program name.
		program: String,
		/// Spawn error.
		source: io::Error,
	},
	/// The program ran and failed.
	#[error("`{program}` exited with {status}")]
	Exit {
		/// Program name.
		program: String,
		/// Its exit status.
		status: ExitStatus,
	},
	/// Filesystem error.
	#[error(transparent)]
	Io(#[from] io::Error),
	/// Manifest is not JSON.
	#[error("invalid manifest json: {0}")]
	Json(#[from] serde_json::Error),
	/// Manifest is JSON but has no content script to patch.
	#[error("malformed manifest: {0}")]
	Manifest(&'static str),
}

/// A failed pipeline run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// Copying the distribution build failed.
	#[error("copy failed: {0}")]
	Copy(#[source] StepError),
	/// Patching `manifest.json` failed.
	#[error("patch failed: {0}")]
	Patch(#[source] StepError),
	/// Creating the archive failed.
	#[error("archive failed: {0}")]
	Archive(#[source] StepError),
	/// Uploading the archive failed.
	#[error("upload failed: {0}")]
	Upload(#[source] StepError),
}

impl PipelineError {
	/// Name of the failed stage.
	pub fn stage(&self) -> &'static str {
		match self {
			Self::Copy(_) => "copy",
			Self::Patch(_) => "patch",
			Self::Archive(_) => "archive",
			Self::Upload(_) => "upload",
		}
	}
}

/// Something that rebuilds and publishes the extension bundle.
pub trait Pipeline: Send + Sync {
	/// Run every stage to completion. Blocking.
	fn run(&self) -> Result<(), PipelineError>;
}

/// Runs the stages on the local filesystem with `zip` and `gsutil`.
#[derive(Clone, Debug)]
pub struct ShellPipeline {
	config: SyncConfig,
}

impl ShellPipeline {
	/// Pipeline over the directories in `config`.
	pub fn new(config: SyncConfig) -> Self {
		Self { config }
	}
}

impl Pipeline for ShellPipeline {
	fn run(&self) -> Result<(), PipelineError> {
		let config = &self.config;
		let bundle = config.bundle_dir();
		let archive = config.archive_name();

		info!(from = %config.distribution_dir.display(), to = %bundle.display(), "copying bundle");
		copy_bundle(&config.distribution_dir, &bundle).map_err(PipelineError::Copy)?;

		debug!("patching manifest");
		patch_manifest_file(&bundle.join("manifest.json")).map_err(PipelineError::Patch)?;

		info!(archive = %archive, "archiving bundle");
		run_program("zip", &["-r", &archive, &config.bundle_name], &config.work_dir)
			.map_err(PipelineError::Archive)?;

		info!(destination = %config.upload_target, "uploading archive");
		run_program("gsutil", &["cp", &archive, &config.upload_target], &config.work_dir)
			.map_err(PipelineError::Upload)?;

		Ok(())
	}
}

/// Replace `to` with a fresh copy of the directory `from`.
pub fn copy_bundle(from: &Path, to: &Path) -> Result<(), StepError> {
	match fs::remove_dir_all(to) {
		Ok(()) => {}
		Err(e) if e.kind() == io::ErrorKind::NotFound => {}
		Err(e) => return Err(e.into()),
	}
	copy_dir(from, to)?;
	Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
	fs::create_dir_all(to)?;
	for entry in fs::read_dir(from)? {
		let entry = entry?;
		let target = to.join(entry.file_name());
		if entry.file_type()?.is_dir() {
			copy_dir(&entry.path(), &target)?;
		} else {
			fs::copy(entry.path(), target)?;
		}
	}
	Ok(())
}

/// Point the first content script at the enhance script, run when idle.
pub fn patch_manifest(manifest: &mut Value) -> Result<(), StepError> {
	let script = manifest
		.get_mut("content_scripts")
		.and_then(Value::as_array_mut)
		.and_then(|scripts| scripts.first_mut())
		.and_then(Value::as_object_mut)
		.ok_or(StepError::Manifest("no content script"))?;

	match script.get_mut("js").and_then(Value::as_array_mut) {
		Some(js) if !js.is_empty() => js[0] = ENHANCE_SCRIPT.into(),
		Some(js) => js.push(ENHANCE_SCRIPT.into()),
		None => {
			script.insert("js".into(), Value::Array(vec![ENHANCE_SCRIPT.into()]));
		}
	}
	script.insert("run_at".into(), RUN_AT.into());
	Ok(())
}

/// Rewrite the manifest at `path` in place.
pub fn patch_manifest_file(path: &Path) -> Result<(), StepError> {
	let mut manifest: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
	patch_manifest(&mut manifest)?;
	fs::write(path, serde_json::to_string_pretty(&manifest)?)?;
	Ok(())
}

/// Run `program` in `cwd`, failing on a non-zero exit.
pub fn run_program(program: &str, args: &[&str], cwd: &Path) -> Result<(), StepError> {
	let status = Command::new(program)
		.args(args)
		.current_dir(cwd)
		.status()
		.map_err(|source| StepError::Spawn {
			program: program.to_owned(),
			source,
		})?;
	if !status.success() {
		return Err(StepError::Exit {
			program: program.to_owned(),
			status,
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn patches_first_content_script() {
		let mut manifest = json!({
			"name": "ext",
			"content_scripts": [
				{"matches": ["<all_urls>"], "js": ["content-script/boot.js", "other.js"], "run_at": "document_start"},
				{"js": ["untouched.js"]}
			]
		});
		patch_manifest(&mut manifest).unwrap();
		assert_eq!(manifest["content_scripts"][0]["js"], json!([ENHANCE_SCRIPT, "other.js"]));
		assert_eq!(manifest["content_scripts"][0]["run_at"], RUN_AT);
		assert_eq!(manifest["content_scripts"][0]["matches"], json!(["<all_urls>"]));
		assert_eq!(manifest["content_scripts"][1], json!({"js": ["untouched.js"]}));
	}

	#[test]
	fn fills_missing_js_list() {
		let mut manifest = json!({"content_scripts": [{}]});
		patch_manifest(&mut manifest).unwrap();
		assert_eq!(
			manifest["content_scripts"][0],
			json!({"js": [ENHANCE_SCRIPT], "run_at": RUN_AT})
		);
	}

	#[test]
	fn rejects_manifest_without_content_script() {
		for mut manifest in [json!({}), json!({"content_scripts": []}), json!({"content_scripts": [1]})] {
			assert!(matches!(
				patch_manifest(&mut manifest),
				Err(StepError::Manifest(_))
			));
		}
	}

	#[test]
	fn copy_replaces_previous_bundle() {
		let dir = tempfile::tempdir().unwrap();
		let dist = dir.path().join("distribution");
		fs::create_dir_all(dist.join("content-script")).unwrap();
		fs::write(dist.join("manifest.json"), r#"{"content_scripts": [{}]}"#).unwrap();
		fs::write(dist.join("content-script/enhance.js"), "// enhance").unwrap();

		let bundle = dir.path().join("extension");
		fs::create_dir_all(&bundle).unwrap();
		fs::write(bundle.join("stale.js"), "old").unwrap();

		copy_bundle(&dist, &bundle).unwrap();
		assert!(!bundle.join("stale.js").exists());
		assert_eq!(
			fs::read_to_string(bundle.join("content-script/enhance.js")).unwrap(),
			"// enhance"
		);

		patch_manifest_file(&bundle.join("manifest.json")).unwrap();
		let patched: Value =
			serde_json::from_str(&fs::read_to_string(bundle.join("manifest.json")).unwrap()).unwrap();
		assert_eq!(patched["content_scripts"][0]["run_at"], RUN_AT);
		// the distribution build is left alone
		let source_manifest = fs::read_to_string(dist.join("manifest.json")).unwrap();
		assert!(!source_manifest.contains(RUN_AT));
	}

	#[test]
	fn copy_fails_for_missing_distribution() {
		let dir = tempfile::tempdir().unwrap();
		let err = copy_bundle(&dir.path().join("missing"), &dir.path().join("extension")).unwrap_err();
		assert!(matches!(err, StepError::Io(_)));
	}

	#[test]
	fn invalid_manifest_json_is_a_step_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("manifest.json");
		fs::write(&path, "not json").unwrap();
		assert!(matches!(patch_manifest_file(&path), Err(StepError::Json(_))));
	}

	#[test]
	fn program_failures() {
		let dir = tempfile::tempdir().unwrap();
		let missing = run_program("definitely-not-a-real-program", &[], dir.path()).unwrap_err();
		assert!(matches!(missing, StepError::Spawn { .. }));

		let exit = run_program("sh", &["-c", "exit 3"], dir.path()).unwrap_err();
		assert!(matches!(exit, StepError::Exit { .. }));
		run_program("sh", &["-c", "true"], dir.path()).unwrap();
	}

	#[test]
	fn errors_name_their_stage() {
		let err = PipelineError::Archive(StepError::Manifest("x"));
		assert_eq!(err.stage(), "archive");
		assert!(err.to_string().starts_with("archive failed"));
	}
}
