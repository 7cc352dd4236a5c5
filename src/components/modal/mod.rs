//! Library modal shell: tab state, shared contexts, sidebar and panels.

mod context;
mod sidebar;
mod state;
pub mod tabs;

pub use context::{FilterContext, ModalStateContext};
pub use sidebar::Sidebar;
pub use state::{ModalState, ModalTab, initial_tab, is_panel_visible};
