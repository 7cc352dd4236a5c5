//! Reactive library store.
//!
//! Holds the signed-in user, the article graph snapshot, saved articles and
//! highlights as signals. Views subscribe by reading them; replacing the
//! snapshot re-runs every dependent view.

use leptos::prelude::*;
use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::force_graph::GraphData;

mod models;

pub use models::{AccountTier, Article, Highlight, READING_PROGRESS_FULL_CLAMP, UserInfo};

/// Id of the `<script type="application/json">` element carrying library data.
pub const LIBRARY_DATA_ELEMENT: &str = "library-data";

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("no element with id `{0}`")]
	MissingElement(&'static str),
	#[error("element `{0}` is not a script tag")]
	NotAScript(&'static str),
	#[error("invalid library data: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Everything the store is seeded with.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LibrarySnapshot {
	pub user_info: Option<UserInfo>,
	pub graph: Option<GraphData>,
	pub articles: Vec<Article>,
	pub highlights: Vec<Highlight>,
}

impl LibrarySnapshot {
	pub fn from_json(text: &str) -> Result<Self, StoreError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Read the snapshot embedded in the page.
	pub fn load_embedded() -> Result<Self, StoreError> {
		let element = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.get_element_by_id(LIBRARY_DATA_ELEMENT))
			.ok_or(StoreError::MissingElement(LIBRARY_DATA_ELEMENT))?;
		let script: HtmlScriptElement = element
			.dyn_into()
			.map_err(|_| StoreError::NotAScript(LIBRARY_DATA_ELEMENT))?;
		let text = script.text().unwrap_or_default();
		Self::from_json(&text)
	}
}

#[derive(Clone, Copy, Debug)]
pub struct LibraryStore {
	pub user_info: RwSignal<Option<UserInfo>>,
	pub graph: RwSignal<Option<GraphData>>,
	pub articles: RwSignal<Vec<Article>>,
	pub highlights: RwSignal<Vec<Highlight>>,
}

impl LibraryStore {
	pub fn new(snapshot: LibrarySnapshot) -> Self {
		Self {
			user_info: RwSignal::new(snapshot.user_info),
			graph: RwSignal::new(snapshot.graph),
			articles: RwSignal::new(snapshot.articles),
			highlights: RwSignal::new(snapshot.highlights),
		}
	}

	pub fn replace(&self, snapshot: LibrarySnapshot) {
		self.user_info.set(snapshot.user_info);
		self.graph.set(snapshot.graph);
		self.articles.set(snapshot.articles);
		self.highlights.set(snapshot.highlights);
	}
}

/// Load the embedded snapshot and provide the store to descendants.
/// A missing or malformed document leaves the store empty.
pub fn provide_library_store() -> LibraryStore {
	let snapshot = match LibrarySnapshot::load_embedded() {
		Ok(snapshot) => {
			info!(
				"store: loaded {} articles, {} highlights",
				snapshot.articles.len(),
				snapshot.highlights.len()
			);
			snapshot
		}
		Err(e) => {
			warn!("store: {}", e);
			LibrarySnapshot::default()
		}
	};
	let store = LibraryStore::new(snapshot);
	provide_context(store);
	store
}

pub fn use_library_store() -> LibraryStore {
	expect_context::<LibraryStore>()
}
