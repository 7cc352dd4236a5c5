//! Graph data structures for input to the graph page.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Depth value marking a node or link as known but not to be displayed.
pub const EXCLUDED_DEPTH: u32 = 100;

/// Layout position carried over from a previous render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NodePosition {
	pub x: f64,
	pub y: f64,
	#[serde(default)]
	pub vx: f64,
	#[serde(default)]
	pub vy: f64,
}

/// An article or topic in the library graph.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Article URL opened when the node is clicked.
	pub url: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub topic_id: Option<String>,
	/// Traversal depth from the current article (0 = the article itself).
	pub depth: u32,
	/// Reading progress ratio, may exceed the fully-read clamp.
	#[serde(default)]
	pub reading_progress: f64,
	/// Position assigned by an earlier layout, if any.
	#[serde(default)]
	pub position: Option<NodePosition>,
}

impl GraphNode {
	/// Host part of the node URL, used when there is no title.
	pub fn domain(&self) -> &str {
		let rest = self
			.url
			.split_once("://")
			.map(|(_, rest)| rest)
			.unwrap_or(&self.url);
		let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
		host.strip_prefix("www.").unwrap_or(host)
	}
}

/// A relation between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Depth of the shallower endpoint.
	pub depth: u32,
	#[serde(default)]
	pub score: Option<f64>,
}

/// Complete graph snapshot: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Copy of the snapshot without the nodes and links marked [`EXCLUDED_DEPTH`].
	pub fn visible(&self) -> GraphData {
		GraphData {
			nodes: self
				.nodes
				.iter()
				.filter(|n| n.depth != EXCLUDED_DEPTH)
				.cloned()
				.collect(),
			links: self
				.links
				.iter()
				.filter(|l| l.depth != EXCLUDED_DEPTH)
				.cloned()
				.collect(),
		}
	}

	/// Whether any node already carries a layout position.
	pub fn has_prior_layout(&self) -> bool {
		self.nodes.iter().any(|n| n.position.is_some())
	}

	/// Copy of the snapshot with positions filled in from a previous layout.
	/// Nodes that already carry a position keep it.
	pub fn with_positions(&self, positions: &HashMap<String, NodePosition>) -> GraphData {
		let mut data = self.clone();
		for node in &mut data.nodes {
			if node.position.is_none() {
				node.position = positions.get(&node.id).copied();
			}
		}
		data
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, depth: u32) -> GraphNode {
		GraphNode {
			id: id.into(),
			url: format!("https://www.example.com/{id}"),
			title: None,
			topic_id: None,
			depth,
			reading_progress: 0.0,
			position: None,
		}
	}

	#[test]
	fn visible_drops_excluded_depth() {
		let data = GraphData {
			nodes: vec![node("a", 0), node("b", EXCLUDED_DEPTH), node("c", 2)],
			links: vec![
				GraphLink { source: "a".into(), target: "c".into(), depth: 0, score: None },
				GraphLink {
					source: "a".into(),
					target: "b".into(),
					depth: EXCLUDED_DEPTH,
					score: Some(0.4),
				},
			],
		};
		let visible = data.visible();
		let ids: Vec<_> = visible.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["a", "c"]);
		assert_eq!(visible.links.len(), 1);
	}

	#[test]
	fn with_positions_keeps_existing() {
		let mut data = GraphData { nodes: vec![node("a", 0), node("b", 1)], links: vec![] };
		data.nodes[0].position = Some(NodePosition { x: 1.0, y: 1.0, vx: 0.0, vy: 0.0 });
		let cache = HashMap::from([
			("a".to_string(), NodePosition { x: 9.0, y: 9.0, vx: 0.0, vy: 0.0 }),
			("b".to_string(), NodePosition { x: 2.0, y: 3.0, vx: 0.0, vy: 0.0 }),
		]);
		let warm = data.with_positions(&cache);
		assert_eq!(warm.nodes[0].position.map(|p| p.x), Some(1.0));
		assert_eq!(warm.nodes[1].position.map(|p| p.y), Some(3.0));
		assert!(warm.has_prior_layout());
		assert!(!GraphData { nodes: vec![node("x", 0)], links: vec![] }.has_prior_layout());
	}

	#[test]
	fn domain_strips_scheme_and_www() {
		assert_eq!(node("post", 0).domain(), "example.com");
	}

	#[test]
	fn deserializes_minimal_records() {
		let data: GraphData = serde_json::from_str(
			r#"{"nodes":[{"id":"a","url":"https://a.io","depth":0}],
			    "links":[{"source":"a","target":"a","depth":0}]}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].reading_progress, 0.0);
		assert_eq!(data.links[0].score, None);
	}
}
