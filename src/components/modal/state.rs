//! Session UI state of the library modal.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use leptos::prelude::*;
use serde_json::json;
use thiserror::Error;

use crate::common::EventReporter;

pub const CHANGE_TAB_EVENT: &str = "changeModalTab";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModalTab {
	List,
	Stats,
	Highlights,
	Settings,
}

impl ModalTab {
	/// Sidebar order.
	pub const ALL: [ModalTab; 4] = [Self::List, Self::Stats, Self::Highlights, Self::Settings];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::List => "list",
			Self::Stats => "stats",
			Self::Highlights => "highlights",
			Self::Settings => "settings",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::List => "Articles",
			Self::Stats => "Stats",
			Self::Highlights => "Highlights",
			Self::Settings => "Settings",
		}
	}
}

impl fmt::Display for ModalTab {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown modal tab `{0}`")]
pub struct UnknownTab(pub String);

impl FromStr for ModalTab {
	type Err = UnknownTab;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|tab| tab.as_str() == s)
			.ok_or_else(|| UnknownTab(s.to_owned()))
	}
}

/// Tab selected by a `?tab=` query value. No value selects the list; an
/// unrecognized one selects nothing.
pub fn initial_tab(query: Option<&str>) -> Option<ModalTab> {
	match query {
		None => Some(ModalTab::List),
		Some(value) => value.parse().ok(),
	}
}

/// Whether the panel for `tab` shows under the current selection.
pub fn is_panel_visible(current: Option<ModalTab>, tab: ModalTab) -> bool {
	current == Some(tab)
}

/// Current tab and filters, alive while the shell is mounted.
#[derive(Clone)]
pub struct ModalState {
	pub current_tab: RwSignal<Option<ModalTab>>,
	pub domain_filter: RwSignal<Option<String>>,
	pub tag_filter: RwSignal<Option<String>>,
	pub current_subscription: RwSignal<Option<String>>,
	reporter: Arc<dyn EventReporter>,
}

impl ModalState {
	pub fn new(
		initial_tab: Option<ModalTab>,
		domain_filter: Option<String>,
		tag_filter: Option<String>,
		reporter: Arc<dyn EventReporter>,
	) -> Self {
		Self {
			current_tab: RwSignal::new(initial_tab),
			domain_filter: RwSignal::new(domain_filter),
			tag_filter: RwSignal::new(tag_filter),
			current_subscription: RwSignal::new(None),
			reporter,
		}
	}

	pub fn set_current_tab(&self, tab: ModalTab) {
		if self.current_tab.get_untracked() == Some(tab) {
			return;
		}
		self.current_tab.set(Some(tab));
		self.reporter
			.report_event(CHANGE_TAB_EVENT, json!({ "tab": tab.as_str() }));
	}

	pub fn set_domain_filter(&self, domain: Option<String>) {
		self.domain_filter.set(domain);
	}

	pub fn set_tag_filter(&self, tag: Option<String>) {
		self.tag_filter.set(tag);
	}

	pub fn set_current_subscription(&self, subscription: Option<String>) {
		self.current_subscription.set(subscription);
	}

	/// Filter the article list down to one domain.
	pub fn show_domain(&self, domain: impl Into<String>) {
		self.domain_filter.set(Some(domain.into()));
		self.set_current_tab(ModalTab::List);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::Value;
	use std::sync::Mutex;

	#[derive(Default)]
	struct Recorder(Mutex<Vec<(String, Value)>>);

	impl EventReporter for Recorder {
		fn report_event(&self, name: &str, properties: Value) {
			self.0.lock().unwrap().push((name.to_owned(), properties));
		}
	}

	fn state_with(tab: Option<ModalTab>) -> (ModalState, Arc<Recorder>) {
		let recorder = Arc::new(Recorder::default());
		(ModalState::new(tab, None, None, recorder.clone()), recorder)
	}

	#[test]
	fn parses_tab_names() {
		for tab in ModalTab::ALL {
			assert_eq!(tab.as_str().parse::<ModalTab>(), Ok(tab));
		}
		assert_eq!(
			"archive".parse::<ModalTab>(),
			Err(UnknownTab("archive".into()))
		);
	}

	#[test]
	fn query_selects_initial_tab() {
		assert_eq!(initial_tab(None), Some(ModalTab::List));
		assert_eq!(initial_tab(Some("stats")), Some(ModalTab::Stats));
		assert_eq!(initial_tab(Some("nope")), None);
	}

	#[test]
	fn exactly_one_panel_for_known_tab() {
		for current in ModalTab::ALL {
			let visible: Vec<_> = ModalTab::ALL
				.into_iter()
				.filter(|tab| is_panel_visible(Some(current), *tab))
				.collect();
			assert_eq!(visible, vec![current]);
		}
		assert!(
			ModalTab::ALL
				.into_iter()
				.all(|tab| !is_panel_visible(None, tab))
		);
	}

	#[test]
	fn tab_change_is_reported_once() {
		let (state, recorder) = state_with(Some(ModalTab::List));
		state.set_current_tab(ModalTab::Stats);
		state.set_current_tab(ModalTab::Stats);

		assert_eq!(state.current_tab.get_untracked(), Some(ModalTab::Stats));
		let events = recorder.0.lock().unwrap();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].0, CHANGE_TAB_EVENT);
		assert_eq!(events[0].1, json!({ "tab": "stats" }));
	}

	#[test]
	fn show_domain_filters_and_switches_to_list() {
		let (state, _) = state_with(Some(ModalTab::Stats));
		state.show_domain("example.com");
		assert_eq!(state.current_tab.get_untracked(), Some(ModalTab::List));
		assert_eq!(
			state.domain_filter.get_untracked().as_deref(),
			Some("example.com")
		);
	}
}
