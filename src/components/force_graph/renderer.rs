//! Per-instance graph renderer: configures a layout engine for a snapshot and
//! turns engine events into effects for the host component.
//!
//! Lifecycle:
//!
//! ```text
//! Unmounted --load(snapshot)--> AwaitingData --attach--> WarmingUp
//! WarmingUp --warmup done--> InteractiveUnsettled
//! InteractiveUnsettled --first EngineStop--> InteractiveSettled
//! InteractiveSettled --EngineStop--> InteractiveSettled (ignored)
//! any --teardown--> Terminated
//! ```

use std::time::Duration;

use log::{debug, info};
use serde_json::{Value, json};

use super::adapter::{LayoutData, LayoutNode};
use super::engine::{Cooldown, DEFAULT_MAX_ZOOM, EngineEvent, LayoutEngine, ZoomSource};
use super::policy::{NODE_REL_SIZE, VisualPolicy, charge_strength};
use super::simulation::SimulationConfig;
use super::types::{GraphData, GraphNode};

pub const ALPHA_DECAY: f64 = 0.01;
pub const VELOCITY_DECAY: f64 = 0.08;
pub const CENTER_PULL_STRENGTH: f64 = 0.05;
/// Warmup ticks for a first layout; warm starts skip warmup.
pub const INITIAL_WARMUP_TICKS: u32 = 100;
/// Attach delay for a first layout, so the tab entrance animation stays smooth.
pub const INITIAL_ATTACH_DELAY: Duration = Duration::from_millis(50);
pub const FIT_PADDING_PX: f64 = 150.0;
pub const UNSETTLED_ZOOM: (f64, f64) = (0.5, DEFAULT_MAX_ZOOM);
pub const SETTLED_ZOOM: (f64, f64) = (1.5, 4.0);
pub const CLICK_EVENT: &str = "clickGraphArticle";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPhase {
	Unmounted,
	AwaitingData,
	WarmingUp,
	InteractiveUnsettled,
	InteractiveSettled,
	Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
	Pointer,
	Move,
}

impl Cursor {
	pub fn as_css(self) -> &'static str {
		match self {
			Cursor::Pointer => "pointer",
			Cursor::Move => "move",
		}
	}
}

/// Something the host has to do in response to an engine event.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEffect {
	/// Show (or hide) the tooltip for the node at this engine index.
	Hover(Option<(usize, GraphNode)>),
	SetCursor(Cursor),
	OpenArticle(String),
	ReportEvent { name: &'static str, properties: Value },
	/// The first layout settled; reveal the canvas.
	RenderDone,
}

/// How long the host should wait before attaching a snapshot.
pub fn attach_delay(snapshot: &GraphData) -> Duration {
	if snapshot.visible().has_prior_layout() {
		Duration::ZERO
	} else {
		INITIAL_ATTACH_DELAY
	}
}

fn is_important(node: &LayoutNode) -> bool {
	node.depth <= 1
}

pub struct GraphRenderer<E> {
	engine: E,
	phase: RenderPhase,
	snapshot: Option<GraphData>,
	/// Visible nodes, indexed like the engine's nodes.
	nodes: Vec<GraphNode>,
	initial_zoom_done: bool,
	changed_zoom: bool,
	current_zoom: Option<f64>,
}

impl<E: LayoutEngine> GraphRenderer<E> {
	pub fn new(engine: E) -> Self {
		Self {
			engine,
			phase: RenderPhase::Unmounted,
			snapshot: None,
			nodes: Vec::new(),
			initial_zoom_done: false,
			changed_zoom: false,
			current_zoom: None,
		}
	}

	pub fn phase(&self) -> RenderPhase {
		self.phase
	}

	pub fn engine(&self) -> &E {
		&self.engine
	}

	pub fn engine_mut(&mut self) -> &mut E {
		&mut self.engine
	}

	pub fn is_settled(&self) -> bool {
		self.initial_zoom_done
	}

	/// Whether the user zoomed or panned after the initial fit.
	pub fn changed_zoom(&self) -> bool {
		self.changed_zoom
	}

	pub fn current_zoom(&self) -> Option<f64> {
		self.current_zoom
	}

	/// Domain record for an engine node index.
	pub fn node(&self, index: usize) -> Option<&GraphNode> {
		self.nodes.get(index)
	}

	/// Accept a snapshot. `None` keeps the renderer idle.
	pub fn load(&mut self, snapshot: Option<GraphData>) {
		if self.phase == RenderPhase::Terminated {
			return;
		}
		if let Some(snapshot) = snapshot {
			self.snapshot = Some(snapshot);
			self.phase = RenderPhase::AwaitingData;
		}
	}

	/// Configure the engine for the loaded snapshot and run warmup.
	/// Returns the number of warmup ticks used, or `None` when idle.
	pub fn attach(&mut self, dark_mode: bool, width: f64, height: f64) -> Option<u32> {
		if self.phase != RenderPhase::AwaitingData {
			return None;
		}
		let visible = self.snapshot.as_ref()?.visible();
		info!("graph: rendering {} nodes, {} links", visible.nodes.len(), visible.links.len());

		let layout = LayoutData::from_graph(&visible);
		let warmup = if layout.has_prior_layout() { 0 } else { INITIAL_WARMUP_TICKS };
		self.nodes = visible.nodes;
		self.phase = RenderPhase::WarmingUp;

		let engine = &mut self.engine;
		engine.set_data(layout);
		engine.set_dimensions(width, height);
		engine.set_simulation_config(SimulationConfig {
			alpha_decay: ALPHA_DECAY,
			velocity_decay: VELOCITY_DECAY,
			..SimulationConfig::default()
		});
		engine.set_warmup_ticks(warmup);
		engine.set_cooldown(Cooldown::Ticks(0));
		engine.set_center_pull(CENTER_PULL_STRENGTH);
		engine.set_charge(Box::new(charge_strength));
		engine.set_node_rel_size(NODE_REL_SIZE);
		engine.set_style(Box::new(VisualPolicy::new(dark_mode)));
		engine.set_zoom_bounds(UNSETTLED_ZOOM.0, UNSETTLED_ZOOM.1);
		engine.start();

		self.phase = RenderPhase::InteractiveUnsettled;
		Some(warmup)
	}

	/// Drain queued engine events and handle them in order.
	pub fn pump(&mut self) -> Vec<HostEffect> {
		let events = self.engine.drain_events();
		events.into_iter().flat_map(|e| self.handle(e)).collect()
	}

	pub fn handle(&mut self, event: EngineEvent) -> Vec<HostEffect> {
		if !matches!(
			self.phase,
			RenderPhase::WarmingUp | RenderPhase::InteractiveUnsettled | RenderPhase::InteractiveSettled
		) {
			return Vec::new();
		}

		match event {
			EngineEvent::NodeHover(index) => {
				let hovered = index.and_then(|i| self.nodes.get(i).cloned().map(|n| (i, n)));
				let cursor = if hovered.is_some() { Cursor::Pointer } else { Cursor::Move };
				vec![HostEffect::Hover(hovered), HostEffect::SetCursor(cursor)]
			}
			EngineEvent::NodeClick(index) => match self.nodes.get(index) {
				Some(node) => vec![
					HostEffect::OpenArticle(node.url.clone()),
					HostEffect::ReportEvent {
						name: CLICK_EVENT,
						properties: json!({ "depth": node.depth }),
					},
				],
				None => Vec::new(),
			},
			EngineEvent::Zoom { transform, source } => {
				self.current_zoom = Some(transform.k);
				if self.initial_zoom_done && source == ZoomSource::User {
					self.changed_zoom = true;
				}
				Vec::new()
			}
			EngineEvent::EngineStop => self.settle(),
		}
	}

	fn settle(&mut self) -> Vec<HostEffect> {
		if self.initial_zoom_done {
			return Vec::new();
		}
		debug!("graph: layout settled, fitting view");
		self.engine.set_zoom_bounds(SETTLED_ZOOM.0, SETTLED_ZOOM.1);
		self.engine.zoom_to_fit(0.0, FIT_PADDING_PX, &is_important);
		self.engine.set_cooldown(Cooldown::Infinite);
		self.initial_zoom_done = true;
		self.phase = RenderPhase::InteractiveSettled;
		vec![HostEffect::RenderDone]
	}

	pub fn teardown(&mut self) {
		self.phase = RenderPhase::Terminated;
	}
}
