//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod common;
mod components;
mod pages;
mod store;

// Top-Level pages
use crate::common::{Collaborators, provide_collaborators};
use crate::pages::modal::ModalApp;
use crate::pages::not_found::NotFound;
use crate::store::provide_library_store;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the library modal and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_collaborators(Collaborators::default());
	provide_library_store();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=ModalApp />
			</Routes>
		</Router>
	}
}
