//! Contexts the modal shell provides to its tabs.

use std::ops::Deref;
use std::sync::Arc;

use leptos::prelude::*;

use crate::common::EventReporter;
use crate::store::UserInfo;

use super::state::ModalState;

/// Filters and their setters.
#[derive(Clone)]
pub struct FilterContext(pub ModalState);

impl Deref for FilterContext {
	type Target = ModalState;

	fn deref(&self) -> &ModalState {
		&self.0
	}
}

/// Shell-wide presentation state.
#[derive(Clone)]
pub struct ModalStateContext {
	pub dark_mode: Signal<bool>,
	pub show_signup: bool,
	pub user_info: UserInfo,
	pub reporter: Arc<dyn EventReporter>,
}

impl ModalStateContext {
	/// Shell context for a resolved user. Without one the shell renders
	/// nothing, so there is no context to provide.
	pub fn for_user(
		user_info: Option<UserInfo>,
		dark_mode: Signal<bool>,
		reporter: Arc<dyn EventReporter>,
	) -> Option<Self> {
		Some(Self { dark_mode, show_signup: false, user_info: user_info?, reporter })
	}
}

pub fn use_filter_context() -> FilterContext {
	expect_context::<FilterContext>()
}

pub fn use_modal_state_context() -> ModalStateContext {
	expect_context::<ModalStateContext>()
}
