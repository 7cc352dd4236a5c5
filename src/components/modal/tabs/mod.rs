//! Panels shown by the modal shell, one per [`ModalTab`](super::ModalTab).

mod highlights;
mod recent;
mod settings;
mod stats;

pub use highlights::HighlightsTab;
pub use recent::RecentTab;
pub use settings::SettingsTab;
pub use stats::StatsTab;
