//! Translation between the library graph model and the records the layout
//! engine simulates.
//!
//! The engine only sees [`LayoutNode`] and [`LayoutLink`]; domain fields it
//! does not need for physics or styling stay on the [`GraphNode`].

use std::collections::HashMap;

use log::debug;

use super::types::{GraphData, GraphNode, NodePosition};

/// Engine-side node record. `x`/`y`/`vx`/`vy` are owned by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	pub id: String,
	pub depth: u32,
	pub reading_progress: f64,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned position while the node is dragged.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	/// False until the simulation assigns an initial position.
	pub placed: bool,
}

impl LayoutNode {
	fn from_domain(node: &GraphNode) -> Self {
		let (x, y, vx, vy, placed) = match node.position {
			Some(p) => (p.x, p.y, p.vx, p.vy, true),
			None => (0.0, 0.0, 0.0, 0.0, false),
		};
		Self {
			id: node.id.clone(),
			depth: node.depth,
			reading_progress: node.reading_progress,
			x,
			y,
			vx,
			vy,
			fx: None,
			fy: None,
			placed,
		}
	}

	pub fn position(&self) -> NodePosition {
		NodePosition { x: self.x, y: self.y, vx: self.vx, vy: self.vy }
	}
}

/// Engine-side link record with endpoints resolved to node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutLink {
	pub source: usize,
	pub target: usize,
	pub depth: u32,
	pub score: Option<f64>,
}

/// Nodes and links in the shape the layout engine expects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutData {
	pub nodes: Vec<LayoutNode>,
	pub links: Vec<LayoutLink>,
}

impl LayoutData {
	/// Build engine records from an already filtered snapshot.
	///
	/// Node order is preserved, so index `i` refers to `data.nodes[i]`.
	/// Links with an unknown endpoint are dropped.
	pub fn from_graph(data: &GraphData) -> Self {
		let nodes: Vec<LayoutNode> = data.nodes.iter().map(LayoutNode::from_domain).collect();
		let index: HashMap<&str, usize> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();

		let mut links = Vec::with_capacity(data.links.len());
		for link in &data.links {
			match (index.get(link.source.as_str()), index.get(link.target.as_str())) {
				(Some(&source), Some(&target)) => links.push(LayoutLink {
					source,
					target,
					depth: link.depth,
					score: link.score,
				}),
				_ => debug!("graph: dropping link {} -> {}", link.source, link.target),
			}
		}

		Self { nodes, links }
	}

	/// Whether this is a re-render whose nodes already have positions.
	pub fn has_prior_layout(&self) -> bool {
		self.nodes.iter().any(|n| n.placed)
	}

	/// Current node positions keyed by node id, for warm-starting the next layout.
	pub fn positions(&self) -> HashMap<String, NodePosition> {
		self.nodes
			.iter()
			.filter(|n| n.placed)
			.map(|n| (n.id.clone(), n.position()))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::GraphLink;

	fn node(id: &str, depth: u32, position: Option<NodePosition>) -> GraphNode {
		GraphNode {
			id: id.into(),
			url: format!("https://example.com/{id}"),
			title: None,
			topic_id: None,
			depth,
			reading_progress: 0.5,
			position,
		}
	}

	fn link(source: &str, target: &str, depth: u32) -> GraphLink {
		GraphLink { source: source.into(), target: target.into(), depth, score: None }
	}

	#[test]
	fn resolves_link_indices_in_node_order() {
		let data = GraphData {
			nodes: vec![node("a", 0, None), node("b", 1, None), node("c", 2, None)],
			links: vec![link("c", "a", 1), link("a", "b", 0)],
		};
		let layout = LayoutData::from_graph(&data);
		assert_eq!(layout.nodes.len(), 3);
		assert_eq!((layout.links[0].source, layout.links[0].target), (2, 0));
		assert_eq!((layout.links[1].source, layout.links[1].target), (0, 1));
	}

	#[test]
	fn drops_dangling_links() {
		let data = GraphData {
			nodes: vec![node("a", 0, None)],
			links: vec![link("a", "gone", 1)],
		};
		assert!(LayoutData::from_graph(&data).links.is_empty());
	}

	#[test]
	fn carries_positions_and_reports_warm_start() {
		let pos = NodePosition { x: 4.0, y: -2.0, vx: 0.5, vy: 0.0 };
		let data = GraphData { nodes: vec![node("a", 0, Some(pos)), node("b", 1, None)], links: vec![] };
		let layout = LayoutData::from_graph(&data);
		assert!(layout.has_prior_layout());
		assert!(layout.nodes[0].placed);
		assert!(!layout.nodes[1].placed);
		assert_eq!(layout.positions().get("a"), Some(&pos));
		assert!(!layout.positions().contains_key("b"));
	}
}
