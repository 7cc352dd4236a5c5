use leptos::prelude::*;

use super::state::{ModalState, ModalTab};

/// Tab switcher shown next to the panels.
#[component]
pub fn Sidebar(state: ModalState) -> impl IntoView {
	let current = state.current_tab;

	view! {
		<nav class="sidebar">
			{ModalTab::ALL
				.into_iter()
				.map(|tab| {
					let state = state.clone();
					view! {
						<button
							class="sidebar-tab"
							class:active=move || current.get() == Some(tab)
							on:click=move |_| state.set_current_tab(tab)
						>
							{tab.label()}
						</button>
					}
				})
				.collect_view()}
		</nav>
	}
}
