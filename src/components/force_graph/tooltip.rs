use leptos::prelude::*;

use super::engine::LayoutEngine;
use super::policy::is_fully_read;
use super::types::GraphNode;

/// Gap between the node and the tooltip, in screen pixels.
const TOOLTIP_OFFSET_PX: f64 = 12.0;

/// Hovered node plus its current on-screen position.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipAnchor {
	pub node: GraphNode,
	pub left: f64,
	pub top: f64,
}

/// Project the hovered node through the engine's current camera transform.
/// Called every frame so the overlay follows pans, zooms and layout motion.
pub fn tooltip_anchor<E: LayoutEngine>(engine: &E, index: usize, node: &GraphNode) -> Option<TooltipAnchor> {
	let layout = engine.node(index)?;
	let (x, y) = engine.graph_to_screen(layout.x, layout.y);
	Some(TooltipAnchor {
		node: node.clone(),
		left: x + TOOLTIP_OFFSET_PX,
		top: y + TOOLTIP_OFFSET_PX,
	})
}

fn progress_label(reading_progress: f64) -> String {
	if is_fully_read(reading_progress) {
		"Read".to_string()
	} else {
		format!("{}% read", (reading_progress.clamp(0.0, 1.0) * 100.0).round() as u32)
	}
}

/// Overlay showing the hovered article. Renders nothing without an anchor.
#[component]
pub fn NodeTooltip(#[prop(into)] anchor: Signal<Option<TooltipAnchor>>) -> impl IntoView {
	move || {
		anchor.get().map(|a| {
			let style = format!("left: {:.0}px; top: {:.0}px;", a.left, a.top);
			let title = a.node.title.clone().unwrap_or_else(|| a.node.domain().to_string());
			view! {
				<div class="node-tooltip" style=style>
					<div class="node-tooltip-title">{title}</div>
					<div class="node-tooltip-meta">
						<span>{a.node.domain().to_string()}</span>
						" · "
						<span>{progress_label(a.node.reading_progress)}</span>
					</div>
				</div>
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::adapter::{LayoutData, LayoutNode};
	use crate::components::force_graph::engine::{ForceEngine, LayoutEngine};
	use crate::components::force_graph::types::GraphData;

	fn node() -> GraphNode {
		GraphNode {
			id: "a".into(),
			url: "https://blog.example.org/post".into(),
			title: None,
			topic_id: None,
			depth: 0,
			reading_progress: 0.42,
			position: None,
		}
	}

	fn engine_at(x: f64, y: f64) -> ForceEngine {
		let mut engine = ForceEngine::new(200.0, 100.0);
		let mut layout = LayoutData::from_graph(&GraphData { nodes: vec![node()], links: vec![] });
		let n: &mut LayoutNode = &mut layout.nodes[0];
		n.x = x;
		n.y = y;
		n.placed = true;
		engine.set_data(layout);
		engine
	}

	#[test]
	fn anchor_follows_camera() {
		let mut engine = engine_at(10.0, 5.0);
		let a = tooltip_anchor(&engine, 0, &node()).unwrap();
		assert_eq!((a.left, a.top), (110.0 + TOOLTIP_OFFSET_PX, 55.0 + TOOLTIP_OFFSET_PX));

		engine.wheel(100.0, 50.0, -1.0);
		let zoomed = tooltip_anchor(&engine, 0, &node()).unwrap();
		assert!(zoomed.left > a.left);
	}

	#[test]
	fn missing_node_has_no_anchor() {
		assert!(tooltip_anchor(&engine_at(0.0, 0.0), 3, &node()).is_none());
	}

	#[test]
	fn progress_labels() {
		assert_eq!(progress_label(0.42), "42% read");
		assert_eq!(progress_label(1.3), "Read");
	}
}
