use leptos::prelude::*;

use crate::components::modal::context::use_modal_state_context;
use crate::store::AccountTier;

#[component]
pub fn SettingsTab() -> impl IntoView {
	let modal = use_modal_state_context();
	let user = modal.user_info;
	let dark_mode = modal.dark_mode;

	let tier = match user.account_tier {
		AccountTier::Free => "Free",
		AccountTier::Supporter => "Supporter",
	};

	view! {
		<section class="tab settings-tab">
			<header class="tab-header">
				<h2>"Settings"</h2>
			</header>
			<dl class="account">
				<dt>"Name"</dt>
				<dd>{user.name.unwrap_or_else(|| "Reader".to_owned())}</dd>
				<dt>"Email"</dt>
				<dd>{user.email.unwrap_or_default()}</dd>
				<dt>"Plan"</dt>
				<dd>{tier}</dd>
			</dl>
			<p class="theme-status">
				{move || {
					if dark_mode.get() {
						"Dark theme, following your system setting."
					} else {
						"Light theme, following your system setting."
					}
				}}
			</p>
			<Show when=move || modal.show_signup>
				<p class="signup">"Create an account to sync your library."</p>
			</Show>
		</section>
	}
}
