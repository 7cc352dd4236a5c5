use leptos::prelude::*;

use crate::components::modal::context::use_filter_context;
use crate::store::{Highlight, use_library_store};

/// Highlights from `domain` (all when `None`), newest first.
pub fn filter_highlights(highlights: &[Highlight], domain: Option<&str>) -> Vec<Highlight> {
	let mut matching: Vec<Highlight> = highlights
		.iter()
		.filter(|h| domain.is_none_or(|d| h.domain == d))
		.cloned()
		.collect();
	matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
	matching
}

#[component]
pub fn HighlightsTab() -> impl IntoView {
	let store = use_library_store();
	let domain = use_filter_context().domain_filter;

	let visible = Memo::new(move |_| {
		let domain = domain.get();
		store
			.highlights
			.with(|highlights| filter_highlights(highlights, domain.as_deref()))
	});

	view! {
		<section class="tab highlights-tab">
			<header class="tab-header">
				<h2>"Highlights"</h2>
			</header>
			<Show
				when=move || !visible.with(Vec::is_empty)
				fallback=|| view! { <p class="empty">"No highlights yet."</p> }
			>
				<ul class="highlight-list">
					<For
						each=move || visible.get()
						key=|highlight| highlight.id.clone()
						children=|highlight: Highlight| {
							view! {
								<li class="highlight">
									<blockquote>{highlight.text}</blockquote>
									<span class="highlight-domain">{highlight.domain}</span>
								</li>
							}
						}
					/>
				</ul>
			</Show>
		</section>
	}
}
