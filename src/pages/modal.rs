//! Library modal page.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_query_map;

use crate::common::{use_auto_dark_mode, use_collaborators};
use crate::components::modal::tabs::{HighlightsTab, RecentTab, SettingsTab, StatsTab};
use crate::components::modal::{
	FilterContext, ModalState, ModalStateContext, ModalTab, Sidebar, initial_tab, is_panel_visible,
};
use crate::store::use_library_store;

/// Modal shell with sidebar and tab panels.
///
/// Renders nothing until the signed-in user is known. The initial tab comes
/// from the `?tab=` query parameter.
#[component]
pub fn ModalApp() -> impl IntoView {
	let store = use_library_store();
	let reporter = use_collaborators().reporter;
	let dark_mode = use_auto_dark_mode();
	let tab = use_query_map().with_untracked(|query| initial_tab(query.get("tab").as_deref()));

	let state = ModalState::new(tab, None, None, reporter.clone());
	provide_context(FilterContext(state.clone()));

	move || {
		let context = ModalStateContext::for_user(store.user_info.get(), dark_mode, reporter.clone())?;
		provide_context(context);
		let current = state.current_tab;
		let panel = move |tab| move || is_panel_visible(current.get(), tab);

		Some(view! {
			<Title text="Library" />
			<div class="modal-app" class:dark=move || dark_mode.get()>
				<aside class="left-side">
					<div class="sidebar-card">
						<h1 class="brand">"Library"</h1>
						<Sidebar state=state.clone() />
					</div>
				</aside>
				<main class="right-side">
					<div class="panel">
						<Show when=panel(ModalTab::List)>
							<RecentTab />
						</Show>
						<Show when=panel(ModalTab::Stats)>
							<StatsTab />
						</Show>
						<Show when=panel(ModalTab::Highlights)>
							<HighlightsTab />
						</Show>
						<Show when=panel(ModalTab::Settings)>
							<SettingsTab />
						</Show>
					</div>
				</main>
			</div>
		})
	}
}
