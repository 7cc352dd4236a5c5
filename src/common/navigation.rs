//! Navigation and telemetry collaborators used by the graph and the tabs.

use std::sync::Arc;

use leptos::prelude::*;
use log::{info, warn};
use serde_json::Value;

/// Opens articles outside the library view.
pub trait Navigator: Send + Sync {
	fn open_article(&self, url: &str);
}

/// Receives product analytics events.
pub trait EventReporter: Send + Sync {
	fn report_event(&self, name: &str, properties: Value);
}

/// Opens articles in a new browser tab.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
	fn open_article(&self, url: &str) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Err(e) = window.open_with_url_and_target(url, "_blank") {
			warn!("navigation: failed to open {}: {:?}", url, e);
		}
	}
}

/// Writes events to the console log.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter;

impl EventReporter for ConsoleReporter {
	fn report_event(&self, name: &str, properties: Value) {
		info!("{}", format_event(name, &properties));
	}
}

fn format_event(name: &str, properties: &Value) -> String {
	match properties {
		Value::Null => format!("event: {name}"),
		Value::Object(map) if map.is_empty() => format!("event: {name}"),
		props => format!("event: {name} {props}"),
	}
}

/// Shared handles to the navigation and telemetry collaborators.
#[derive(Clone)]
pub struct Collaborators {
	pub navigator: Arc<dyn Navigator>,
	pub reporter: Arc<dyn EventReporter>,
}

impl Default for Collaborators {
	fn default() -> Self {
		Self {
			navigator: Arc::new(BrowserNavigator),
			reporter: Arc::new(ConsoleReporter),
		}
	}
}

pub fn provide_collaborators(collaborators: Collaborators) {
	provide_context(collaborators);
}

/// Collaborators from context, falling back to the browser defaults.
pub fn use_collaborators() -> Collaborators {
	use_context::<Collaborators>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn formats_events() {
		assert_eq!(format_event("openModal", &Value::Null), "event: openModal");
		assert_eq!(format_event("openModal", &json!({})), "event: openModal");
		assert_eq!(
			format_event("clickGraphArticle", &json!({"depth": 2})),
			r#"event: clickGraphArticle {"depth":2}"#
		);
	}
}
