use leptos::prelude::*;

use crate::common::use_collaborators;
use crate::components::modal::context::use_filter_context;
use crate::store::{Article, use_library_store};

/// Filters applied to the article list. `None` matches everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArticleFilter<'a> {
	pub domain: Option<&'a str>,
	pub tag: Option<&'a str>,
	pub subscription: Option<&'a str>,
}

impl ArticleFilter<'_> {
	pub fn matches(&self, article: &Article) -> bool {
		self.domain.is_none_or(|d| article.domain == d)
			&& self.tag.is_none_or(|t| article.tags.iter().any(|tag| tag == t))
			&& self
				.subscription
				.is_none_or(|s| article.subscription.as_deref() == Some(s))
	}
}

/// Matching articles, most recently added first.
pub fn filter_articles(articles: &[Article], filter: ArticleFilter<'_>) -> Vec<Article> {
	let mut matching: Vec<Article> = articles
		.iter()
		.filter(|a| filter.matches(a))
		.cloned()
		.collect();
	matching.sort_by(|a, b| b.time_added.cmp(&a.time_added));
	matching
}

#[component]
pub fn RecentTab() -> impl IntoView {
	let store = use_library_store();
	let filters = use_filter_context();
	let collaborators = use_collaborators();

	let (domain, tag, subscription) = (
		filters.domain_filter,
		filters.tag_filter,
		filters.current_subscription,
	);
	let visible = Memo::new(move |_| {
		let (domain, tag, subscription) = (domain.get(), tag.get(), subscription.get());
		store.articles.with(|articles| {
			filter_articles(
				articles,
				ArticleFilter {
					domain: domain.as_deref(),
					tag: tag.as_deref(),
					subscription: subscription.as_deref(),
				},
			)
		})
	});

	let clear_filters = {
		let filters = filters.clone();
		move |_| {
			filters.set_domain_filter(None);
			filters.set_tag_filter(None);
			filters.set_current_subscription(None);
		}
	};

	view! {
		<section class="tab recent-tab">
			<header class="tab-header">
				<h2>"Articles"</h2>
				<Show when=move || domain.get().is_some() || tag.get().is_some() || subscription.get().is_some()>
					<button class="filter-clear" on:click=clear_filters.clone()>
						{move || {
							[domain.get(), tag.get(), subscription.get()]
								.into_iter()
								.flatten()
								.collect::<Vec<_>>()
								.join(" · ")
						}}
						" ×"
					</button>
				</Show>
			</header>
			<ul class="article-list">
				<For
					each=move || visible.get()
					key=|article| article.id.clone()
					children=move |article: Article| {
						let navigator = collaborators.navigator.clone();
						let read = article.is_read();
						let Article { url, title, domain, .. } = article;
						view! {
							<li
								class="article"
								class:read=read
								on:click=move |_| navigator.open_article(&url)
							>
								<span class="article-title">{title}</span>
								<span class="article-domain">{domain}</span>
							</li>
						}
					}
				/>
			</ul>
		</section>
	}
}
