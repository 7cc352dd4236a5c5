//! Runtime configuration read from `SYNC_EXTENSION_*` environment variables.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Default listen address. Loopback only: the endpoint has no authentication.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
/// Extension build output, relative to the working directory.
pub const DEFAULT_DISTRIBUTION_DIR: &str = "../../../distribution";
/// Destination of the uploaded archive.
pub const DEFAULT_UPLOAD_TARGET: &str = "gs://unclutter-screenshots-serverless/extension.zip";
/// Name of the bundle directory and the archive stem.
pub const DEFAULT_BUNDLE_NAME: &str = "extension";

/// Errors in the environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// `SYNC_EXTENSION_BIND_ADDR` is not a socket address.
	#[error("invalid bind address `{value}`: {source}")]
	InvalidBindAddr {
		/// The rejected value.
		value: String,
		/// Parser error.
		source: AddrParseError,
	},
}

/// Where the pipeline reads, writes and uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
	/// Listen address.
	pub bind_addr: SocketAddr,
	/// Directory the bundle is copied from.
	pub distribution_dir: PathBuf,
	/// Directory holding the bundle copy and the archive.
	pub work_dir: PathBuf,
	/// Bundle directory name; the archive is `<bundle_name>.zip`.
	pub bundle_name: String,
	/// `gsutil` destination URL.
	pub upload_target: String,
}

impl SyncConfig {
	/// Read the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Build from an arbitrary variable source, falling back to the defaults.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

		let bind = var("SYNC_EXTENSION_BIND_ADDR", DEFAULT_BIND_ADDR);
		let bind_addr = bind
			.parse()
			.map_err(|source| ConfigError::InvalidBindAddr { value: bind, source })?;

		Ok(Self {
			bind_addr,
			distribution_dir: var("SYNC_EXTENSION_DISTRIBUTION_DIR", DEFAULT_DISTRIBUTION_DIR).into(),
			work_dir: var("SYNC_EXTENSION_WORK_DIR", ".").into(),
			bundle_name: var("SYNC_EXTENSION_BUNDLE_NAME", DEFAULT_BUNDLE_NAME),
			upload_target: var("SYNC_EXTENSION_UPLOAD_TARGET", DEFAULT_UPLOAD_TARGET),
		})
	}

	/// Bundle directory inside the working directory.
	pub fn bundle_dir(&self) -> PathBuf {
		self.work_dir.join(&self.bundle_name)
	}

	/// Archive file name, relative to the working directory.
	pub fn archive_name(&self) -> String {
		format!("{}.zip", self.bundle_name)
	}
}
