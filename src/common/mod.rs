//! Browser-facing helpers shared by the pages and components.

mod dark_mode;
mod navigation;

pub use dark_mode::use_auto_dark_mode;
pub use navigation::{Collaborators, EventReporter, provide_collaborators, use_collaborators};
