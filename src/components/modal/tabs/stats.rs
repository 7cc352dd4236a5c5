use std::collections::HashMap;

use leptos::prelude::*;

use crate::components::force_graph::GraphPage;
use crate::components::modal::context::{use_filter_context, use_modal_state_context};
use crate::store::{Article, use_library_store};

/// Domains listed in the stats panel.
pub const TOP_DOMAIN_COUNT: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LibraryStats {
	pub total: usize,
	pub read: usize,
	/// `(domain, article count)`, most saved first.
	pub top_domains: Vec<(String, usize)>,
}

impl LibraryStats {
	pub fn compute(articles: &[Article], top: usize) -> Self {
		let mut per_domain: HashMap<&str, usize> = HashMap::new();
		for article in articles {
			*per_domain.entry(article.domain.as_str()).or_default() += 1;
		}
		let mut top_domains: Vec<(String, usize)> = per_domain
			.into_iter()
			.map(|(domain, count)| (domain.to_owned(), count))
			.collect();
		top_domains.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		top_domains.truncate(top);

		Self {
			total: articles.len(),
			read: articles.iter().filter(|a| a.is_read()).count(),
			top_domains,
		}
	}
}

#[component]
pub fn StatsTab() -> impl IntoView {
	let store = use_library_store();
	let filters = use_filter_context();
	let modal = use_modal_state_context();

	let stats = Memo::new(move |_| {
		store
			.articles
			.with(|articles| LibraryStats::compute(articles, TOP_DOMAIN_COUNT))
	});

	view! {
		<section class="tab stats-tab">
			<header class="tab-header">
				<h2>"Stats"</h2>
			</header>
			<div class="stats-summary">
				<span>{move || format!("{} articles saved", stats.get().total)}</span>
				<span>{move || format!("{} read", stats.get().read)}</span>
			</div>
			<ul class="top-domains">
				{move || {
					stats
						.get()
						.top_domains
						.into_iter()
						.map(|(domain, count)| {
							let filters = filters.clone();
							let label = format!("{domain} ({count})");
							view! {
								<li>
									<button on:click=move |_| filters.show_domain(domain.clone())>
										{label}
									</button>
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
			<GraphPage graph=store.graph dark_mode=modal.dark_mode />
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn article(domain: &str, reading_progress: f64) -> Article {
		Article {
			id: format!("{domain}-{reading_progress}"),
			url: format!("https://{domain}"),
			title: domain.into(),
			domain: domain.into(),
			tags: vec![],
			subscription: None,
			reading_progress,
			time_added: 0,
		}
	}

	#[test]
	fn counts_read_and_ranks_domains() {
		let articles = vec![
			article("b.io", 1.0),
			article("a.io", 0.2),
			article("b.io", 0.96),
			article("c.io", 0.95),
			article("a.io", 0.0),
			article("d.io", 0.0),
		];
		let stats = LibraryStats::compute(&articles, 3);
		assert_eq!(stats.total, 6);
		// the clamp itself is not fully read
		assert_eq!(stats.read, 2);
		assert_eq!(
			stats.top_domains,
			vec![("a.io".to_owned(), 2), ("b.io".to_owned(), 2), ("c.io".to_owned(), 1)]
		);
	}

	#[test]
	fn empty_library() {
		assert_eq!(LibraryStats::compute(&[], 5), LibraryStats::default());
	}
}
