//! Depth- and progress-based styling for graph nodes and links.
//!
//! Everything here is a pure function of the record and the theme, so the
//! engine can call the accessors as often as it repaints.

use crate::store::READING_PROGRESS_FULL_CLAMP;

use super::adapter::{LayoutLink, LayoutNode};
use super::engine::GraphStyle;
use super::theme::{Color, GraphTheme};

/// Radius multiplier applied to `sqrt(node_val)`.
pub const NODE_REL_SIZE: f64 = 3.0;

/// Many-body strength per depth. Closer nodes push harder.
pub const CHARGE_BY_DEPTH: [f64; 4] = [-50.0, -50.0, -40.0, -20.0];

/// Link width per depth; a `None` entry takes the last entry's width.
pub const LINK_WIDTH_BY_DEPTH: [Option<f64>; 3] = [None, Some(4.0), Some(3.0)];

/// Look up a depth-indexed value, using the last entry for deeper items.
/// An empty table is rejected at compile time.
pub fn by_depth<T: Copy, const N: usize>(table: &[T; N], depth: u32) -> T {
	const { assert!(N > 0, "depth table must not be empty") };
	table[(depth as usize).min(N - 1)]
}

/// [`by_depth`] over a table with gaps: a `None` entry falls through to the
/// last entry.
pub fn by_depth_or_last<T: Copy, const N: usize>(table: &[Option<T>; N], depth: u32) -> Option<T> {
	by_depth(table, depth).or(by_depth(table, u32::MAX))
}

pub fn is_fully_read(reading_progress: f64) -> bool {
	reading_progress > READING_PROGRESS_FULL_CLAMP
}

/// Depth-0 or fully read nodes are drawn at double value.
pub fn is_large_node(node: &LayoutNode) -> bool {
	node.depth == 0 || is_fully_read(node.reading_progress)
}

/// Nodes within one hop, and anything already read, get the accent color.
pub fn is_accented_node(node: &LayoutNode) -> bool {
	node.depth <= 1 || is_fully_read(node.reading_progress)
}

pub fn charge_strength(node: &LayoutNode) -> f64 {
	by_depth(&CHARGE_BY_DEPTH, node.depth)
}

/// Theme-aware implementation of the engine style accessors.
#[derive(Clone, Debug)]
pub struct VisualPolicy {
	theme: GraphTheme,
}

impl VisualPolicy {
	pub fn new(dark_mode: bool) -> Self {
		Self { theme: GraphTheme::for_mode(dark_mode) }
	}

	pub fn theme(&self) -> &GraphTheme {
		&self.theme
	}
}

impl GraphStyle for VisualPolicy {
	fn node_color(&self, node: &LayoutNode) -> Color {
		if is_accented_node(node) { self.theme.accent } else { self.theme.neutral }
	}

	fn node_val(&self, node: &LayoutNode) -> f64 {
		if is_large_node(node) { 2.0 } else { 1.0 }
	}

	fn link_color(&self, link: &LayoutLink) -> Color {
		if link.depth <= 1 { self.theme.accent } else { self.theme.neutral }
	}

	fn link_width(&self, link: &LayoutLink) -> Option<f64> {
		by_depth_or_last(&LINK_WIDTH_BY_DEPTH, link.depth)
	}

	fn node_outline(&self, node: &LayoutNode) -> Option<Color> {
		(node.depth == 0).then_some(self.theme.ring)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::engine::DEFAULT_LINK_WIDTH;

	fn node(depth: u32, reading_progress: f64) -> LayoutNode {
		LayoutNode {
			id: format!("n{depth}"),
			depth,
			reading_progress,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			placed: false,
		}
	}

	fn link(depth: u32) -> LayoutLink {
		LayoutLink { source: 0, target: 1, depth, score: None }
	}

	#[test]
	fn by_depth_falls_back_to_last_entry() {
		assert_eq!(by_depth(&CHARGE_BY_DEPTH, 0), -50.0);
		assert_eq!(by_depth(&CHARGE_BY_DEPTH, 2), -40.0);
		assert_eq!(by_depth(&CHARGE_BY_DEPTH, 3), -20.0);
		assert_eq!(by_depth(&CHARGE_BY_DEPTH, 5), -20.0);
		assert_eq!(by_depth(&LINK_WIDTH_BY_DEPTH, 7), Some(3.0));
	}

	#[test]
	fn gaps_fall_through_to_last_entry() {
		assert_eq!(by_depth_or_last(&[None, Some(4.0), Some(3.0)], 0), Some(3.0));
		assert_eq!(by_depth_or_last(&[Some(1.0), None, Some(2.0)], 1), Some(2.0));
		assert_eq!(by_depth_or_last(&[Some(1.0), None], 1), None);
		assert_eq!(by_depth(&[7], 40), 7);
	}

	#[test]
	fn link_width_at_root_uses_last_entry() {
		let policy = VisualPolicy::new(false);
		assert_eq!(policy.link_width(&link(0)), Some(3.0));
		assert_eq!(policy.link_width(&link(1)), Some(4.0));
		assert_eq!(policy.link_width(&link(2)), Some(3.0));
		assert_eq!(policy.link_width(&link(9)), Some(3.0));
	}

	#[test]
	fn root_links_are_not_thinner_than_deeper_links() {
		let policy = VisualPolicy::new(true);
		let drawn = |depth| policy.link_width(&link(depth)).unwrap_or(DEFAULT_LINK_WIDTH);
		for depth in 2..6 {
			assert!(drawn(0) >= drawn(depth), "depth {depth}");
		}
		assert!(drawn(0) > DEFAULT_LINK_WIDTH);
	}

	#[test]
	fn accent_for_near_or_read_nodes() {
		for dark in [false, true] {
			let policy = VisualPolicy::new(dark);
			let theme = GraphTheme::for_mode(dark);
			assert_eq!(policy.node_color(&node(0, 0.0)), theme.accent);
			assert_eq!(policy.node_color(&node(1, 0.0)), theme.accent);
			assert_eq!(policy.node_color(&node(2, 0.0)), theme.neutral);
			assert_eq!(policy.node_color(&node(3, 1.0)), theme.accent);
			assert_eq!(policy.link_color(&link(1)), theme.accent);
			assert_eq!(policy.link_color(&link(2)), theme.neutral);
		}
	}

	#[test]
	fn node_size_is_binary() {
		let policy = VisualPolicy::new(true);
		assert_eq!(policy.node_val(&node(0, 0.0)), 2.0);
		assert_eq!(policy.node_val(&node(1, 0.0)), 1.0);
		assert_eq!(policy.node_val(&node(4, READING_PROGRESS_FULL_CLAMP)), 1.0);
		assert_eq!(policy.node_val(&node(4, 1.2)), 2.0);
	}

	#[test]
	fn policy_is_deterministic() {
		let policy = VisualPolicy::new(false);
		for (depth, progress) in [(0, 0.1), (2, 0.99), (6, 0.3)] {
			let n = node(depth, progress);
			assert_eq!(policy.node_color(&n), policy.node_color(&n));
			assert_eq!(policy.node_val(&n), policy.node_val(&n));
			assert_eq!(VisualPolicy::new(false).node_color(&n), policy.node_color(&n));
		}
	}

	#[test]
	fn charge_by_node_depth() {
		assert_eq!(charge_strength(&node(0, 0.0)), -50.0);
		assert_eq!(charge_strength(&node(9, 0.0)), -20.0);
	}
}
