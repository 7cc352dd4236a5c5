//! Force-directed article graph.
//!
//! The domain snapshot ([`GraphData`]) is translated into engine records by
//! `adapter`, laid out by `engine::ForceEngine` and driven by
//! `renderer::GraphRenderer`, which the [`GraphPage`] component mounts on a
//! canvas.

mod adapter;
mod component;
mod engine;
mod lifecycle;
mod policy;
mod render;
mod renderer;
mod simulation;
mod theme;
mod tooltip;
mod types;

pub use component::GraphPage;
pub use types::GraphData;
