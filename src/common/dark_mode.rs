use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::MediaQueryList;

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

fn dark_scheme_query() -> Option<MediaQueryList> {
	web_sys::window()?.match_media(DARK_SCHEME_QUERY).ok().flatten()
}

/// Whether the OS currently prefers a dark color scheme.
pub fn prefers_dark() -> bool {
	dark_scheme_query().is_some_and(|q| q.matches())
}

/// Dark-mode flag that follows the OS color scheme while the page is open.
pub fn use_auto_dark_mode() -> Signal<bool> {
	let dark = RwSignal::new(prefers_dark());
	if let Some(query) = dark_scheme_query() {
		let on_change = Closure::<dyn Fn()>::new(move || dark.set(prefers_dark()));
		query.set_onchange(Some(on_change.as_ref().unchecked_ref()));
		// lives as long as the page
		on_change.forget();
	}
	dark.into()
}
