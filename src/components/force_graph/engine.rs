//! Layout engine: simulation lifecycle, camera, and pointer interaction.
//!
//! [`LayoutEngine`] is the surface the graph renderer configures and commands.
//! [`ForceEngine`] implements it on top of [`Simulation`] and is what the
//! canvas painter reads from. Instead of registered callbacks the engine
//! queues [`EngineEvent`]s, which the host drains once per animation frame.

use std::collections::HashMap;

use super::adapter::{LayoutData, LayoutLink, LayoutNode};
use super::simulation::{Simulation, SimulationConfig};
use super::theme::Color;
use super::types::NodePosition;

pub const DEFAULT_MIN_ZOOM: f64 = 0.01;
pub const DEFAULT_MAX_ZOOM: f64 = 1000.0;
/// Link width used when the style returns `None`, in screen pixels.
pub const DEFAULT_LINK_WIDTH: f64 = 1.0;
pub const DEFAULT_NODE_REL_SIZE: f64 = 4.0;
/// The engine also stops after running this long, whatever the cooldown.
pub const DEFAULT_COOLDOWN_TIME_MS: f64 = 15_000.0;
/// Minimum pointer hit radius in screen pixels.
pub const HIT_SLOP_PX: f64 = 6.0;
/// Pointer travel below which a press on a node counts as a click.
pub const CLICK_TOLERANCE_PX: f64 = 3.0;
const DRAG_ALPHA_TARGET: f64 = 0.3;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Per-node and per-link visual accessors.
pub trait GraphStyle {
	fn node_color(&self, node: &LayoutNode) -> Color;

	/// Area multiplier; the drawn radius is `sqrt(val) * rel_size`.
	fn node_val(&self, _node: &LayoutNode) -> f64 {
		1.0
	}

	fn link_color(&self, link: &LayoutLink) -> Color;

	/// `None` keeps [`DEFAULT_LINK_WIDTH`].
	fn link_width(&self, _link: &LayoutLink) -> Option<f64> {
		None
	}

	/// Ring drawn after the node body.
	fn node_outline(&self, _node: &LayoutNode) -> Option<Color> {
		None
	}
}

struct DefaultStyle;

impl GraphStyle for DefaultStyle {
	fn node_color(&self, _: &LayoutNode) -> Color {
		Color::rgb(0x1f, 0x77, 0xb4)
	}

	fn link_color(&self, _: &LayoutLink) -> Color {
		Color::rgb(0x99, 0x99, 0x99).with_alpha(0.2)
	}
}

/// How many ticks the engine keeps running after a (re)start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cooldown {
	Ticks(u32),
	Infinite,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl ViewTransform {
	fn lerp(self, to: ViewTransform, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomSource {
	/// Wheel or background drag.
	User,
	/// `zoom_to_fit` or a camera transition.
	Programmatic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineEvent {
	/// The node under the pointer changed.
	NodeHover(Option<usize>),
	NodeClick(usize),
	Zoom {
		transform: ViewTransform,
		source: ZoomSource,
	},
	/// The simulation stopped after cooling down.
	EngineStop,
}

/// Commands the graph renderer issues to a layout engine.
pub trait LayoutEngine {
	fn set_data(&mut self, data: LayoutData);
	fn set_dimensions(&mut self, width: f64, height: f64);
	/// Per-node charge strength. Negative repels; the magnitude sets node mass.
	fn set_charge(&mut self, charge: Box<dyn Fn(&LayoutNode) -> f64>);
	/// Pull towards the graph origin, scaled by alpha.
	fn set_center_pull(&mut self, strength: f64);
	fn set_simulation_config(&mut self, config: SimulationConfig);
	fn set_warmup_ticks(&mut self, ticks: u32);
	fn set_cooldown(&mut self, cooldown: Cooldown);
	fn set_node_rel_size(&mut self, size: f64);
	fn set_zoom_bounds(&mut self, min: f64, max: f64);
	fn set_style(&mut self, style: Box<dyn GraphStyle>);
	/// Run the warmup ticks and start the engine loop.
	fn start(&mut self);
	/// Fit the camera to the nodes accepted by `filter`.
	fn zoom_to_fit(&mut self, duration_ms: f64, padding: f64, filter: &dyn Fn(&LayoutNode) -> bool);
	fn node(&self, index: usize) -> Option<&LayoutNode>;
	fn graph_to_screen(&self, x: f64, y: f64) -> (f64, f64);
	fn drain_events(&mut self) -> Vec<EngineEvent>;
}

#[derive(Clone, Copy, Debug)]
struct CameraTransition {
	from: ViewTransform,
	to: ViewTransform,
	duration_ms: f64,
	started_at: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default)]
enum Gesture {
	#[default]
	Idle,
	Node {
		index: usize,
		start: (f64, f64),
		dragging: bool,
	},
	Pan {
		start: (f64, f64),
		origin: ViewTransform,
	},
}

/// Canvas layout engine driven by the host's animation frames.
pub struct ForceEngine {
	simulation: Simulation,
	style: Box<dyn GraphStyle>,
	transform: ViewTransform,
	width: f64,
	height: f64,
	node_rel_size: f64,
	warmup_ticks: u32,
	cooldown: Cooldown,
	cooldown_time_ms: f64,
	min_zoom: f64,
	max_zoom: f64,
	running: bool,
	ticks: u32,
	started_at: Option<f64>,
	hovered: Option<usize>,
	gesture: Gesture,
	transition: Option<CameraTransition>,
	events: Vec<EngineEvent>,
}

impl ForceEngine {
	/// Create an engine with uniform charge and no center pull.
	/// The graph origin starts at the middle of the viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			simulation: Simulation::default(),
			style: Box::new(DefaultStyle),
			transform: ViewTransform { x: width / 2.0, y: height / 2.0, k: 1.0 },
			width,
			height,
			node_rel_size: DEFAULT_NODE_REL_SIZE,
			warmup_ticks: 0,
			cooldown: Cooldown::Infinite,
			cooldown_time_ms: DEFAULT_COOLDOWN_TIME_MS,
			min_zoom: DEFAULT_MIN_ZOOM,
			max_zoom: DEFAULT_MAX_ZOOM,
			running: false,
			ticks: 0,
			started_at: None,
			hovered: None,
			gesture: Gesture::Idle,
			transition: None,
			events: Vec::new(),
		}
	}

	pub fn nodes(&self) -> &[LayoutNode] {
		self.simulation.nodes()
	}

	pub fn links(&self) -> &[LayoutLink] {
		self.simulation.links()
	}

	pub fn style(&self) -> &dyn GraphStyle {
		self.style.as_ref()
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn zoom_bounds(&self) -> (f64, f64) {
		(self.min_zoom, self.max_zoom)
	}

	pub fn node_radius(&self, node: &LayoutNode) -> f64 {
		self.style.node_val(node).max(0.0).sqrt() * self.node_rel_size
	}

	pub fn link_width(&self, link: &LayoutLink) -> f64 {
		self.style.link_width(link).unwrap_or(DEFAULT_LINK_WIDTH)
	}

	/// Current positions keyed by node id.
	pub fn positions(&self) -> HashMap<String, NodePosition> {
		self.nodes().iter().map(|n| (n.id.clone(), n.position())).collect()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let slop = HIT_SLOP_PX / self.transform.k;
		self.nodes().iter().enumerate().rev().find_map(|(i, node)| {
			let (dx, dy) = (node.x - gx, node.y - gy);
			let r = self.node_radius(node).max(slop);
			(dx * dx + dy * dy < r * r).then_some(i)
		})
	}

	/// Advance camera transitions and, while running, the simulation.
	/// `now_ms` is a monotonic timestamp from the host.
	pub fn tick(&mut self, now_ms: f64) {
		self.advance_transition(now_ms);
		if !self.running {
			return;
		}

		let started = *self.started_at.get_or_insert(now_ms);
		self.ticks += 1;
		let out_of_ticks = match self.cooldown {
			Cooldown::Ticks(n) => self.ticks > n,
			Cooldown::Infinite => false,
		};
		if out_of_ticks || now_ms - started > self.cooldown_time_ms || self.simulation.is_cooled() {
			self.running = false;
			self.events.push(EngineEvent::EngineStop);
		} else {
			self.simulation.tick();
		}
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.gesture = match self.node_at_position(sx, sy) {
			Some(index) => Gesture::Node { index, start: (sx, sy), dragging: false },
			None => Gesture::Pan { start: (sx, sy), origin: self.transform },
		};
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match self.gesture {
			Gesture::Idle => {
				let hovered = self.node_at_position(sx, sy);
				self.set_hover(hovered);
			}
			Gesture::Node { index, start, dragging } => {
				let travelled = ((sx - start.0).powi(2) + (sy - start.1).powi(2)).sqrt();
				if !dragging && travelled <= CLICK_TOLERANCE_PX {
					return;
				}
				if !dragging {
					self.gesture = Gesture::Node { index, start, dragging: true };
					self.simulation.set_alpha_target(DRAG_ALPHA_TARGET);
					self.restart();
				}
				let (gx, gy) = self.screen_to_graph(sx, sy);
				self.simulation.pin(index, gx, gy);
			}
			Gesture::Pan { start, origin } => {
				self.transform.x = origin.x + (sx - start.0);
				self.transform.y = origin.y + (sy - start.1);
				self.emit_zoom(ZoomSource::User);
			}
		}
	}

	pub fn pointer_up(&mut self) {
		if let Gesture::Node { index, dragging: false, .. } = self.gesture {
			self.events.push(EngineEvent::NodeClick(index));
		}
		self.end_gesture();
	}

	pub fn pointer_leave(&mut self) {
		self.end_gesture();
		self.set_hover(None);
	}

	/// Zoom around a screen position; positive `delta_y` zooms out.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(self.min_zoom, self.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.transition = None;
		self.emit_zoom(ZoomSource::User);
	}

	fn end_gesture(&mut self) {
		if let Gesture::Node { index, dragging: true, .. } = self.gesture {
			self.simulation.unpin(index);
			self.simulation.set_alpha_target(0.0);
		}
		self.gesture = Gesture::Idle;
	}

	fn set_hover(&mut self, hovered: Option<usize>) {
		if self.hovered != hovered {
			self.hovered = hovered;
			self.events.push(EngineEvent::NodeHover(hovered));
		}
	}

	fn restart(&mut self) {
		self.running = true;
		self.ticks = 0;
		self.started_at = None;
	}

	fn emit_zoom(&mut self, source: ZoomSource) {
		self.events.push(EngineEvent::Zoom { transform: self.transform, source });
	}

	fn advance_transition(&mut self, now_ms: f64) {
		let Some(mut transition) = self.transition else {
			return;
		};
		let started = *transition.started_at.get_or_insert(now_ms);
		let t = ((now_ms - started) / transition.duration_ms).clamp(0.0, 1.0);
		self.transform = transition.from.lerp(transition.to, ease_out_cubic(t));
		self.transition = (t < 1.0).then_some(transition);
		self.emit_zoom(ZoomSource::Programmatic);
	}
}

impl LayoutEngine for ForceEngine {
	fn set_data(&mut self, data: LayoutData) {
		self.simulation.set_data(data);
		self.hovered = None;
		self.gesture = Gesture::Idle;
	}

	fn set_dimensions(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn set_charge(&mut self, charge: Box<dyn Fn(&LayoutNode) -> f64>) {
		self.simulation.set_charge(charge);
	}

	fn set_center_pull(&mut self, strength: f64) {
		self.simulation.set_center_pull(strength);
	}

	fn set_simulation_config(&mut self, config: SimulationConfig) {
		self.simulation.set_config(config);
	}

	fn set_warmup_ticks(&mut self, ticks: u32) {
		self.warmup_ticks = ticks;
	}

	fn set_cooldown(&mut self, cooldown: Cooldown) {
		self.cooldown = cooldown;
	}

	fn set_node_rel_size(&mut self, size: f64) {
		self.node_rel_size = size;
	}

	fn set_zoom_bounds(&mut self, min: f64, max: f64) {
		self.min_zoom = min;
		self.max_zoom = max;
	}

	fn set_style(&mut self, style: Box<dyn GraphStyle>) {
		self.style = style;
	}

	fn start(&mut self) {
		for _ in 0..self.warmup_ticks {
			self.simulation.tick();
		}
		self.restart();
	}

	fn zoom_to_fit(&mut self, duration_ms: f64, padding: f64, filter: &dyn Fn(&LayoutNode) -> bool) {
		let bbox = self.nodes().iter().filter(|n| filter(*n)).fold(None, |bbox, n| {
			let (x0, x1, y0, y1) = bbox.unwrap_or((n.x, n.x, n.y, n.y));
			Some((x0.min(n.x), x1.max(n.x), y0.min(n.y), y1.max(n.y)))
		});
		let Some((x0, x1, y0, y1)) = bbox else {
			return;
		};

		let k = ((self.width - padding * 2.0) / (x1 - x0))
			.min((self.height - padding * 2.0) / (y1 - y0))
			.clamp(1e-12, 1e12)
			.clamp(self.min_zoom, self.max_zoom);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		let target = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};

		if duration_ms <= 0.0 {
			self.transform = target;
			self.transition = None;
			self.emit_zoom(ZoomSource::Programmatic);
		} else {
			self.transition = Some(CameraTransition {
				from: self.transform,
				to: target,
				duration_ms,
				started_at: None,
			});
		}
	}

	fn node(&self, index: usize) -> Option<&LayoutNode> {
		self.nodes().get(index)
	}

	fn graph_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(
			x * self.transform.k + self.transform.x,
			y * self.transform.k + self.transform.y,
		)
	}

	fn drain_events(&mut self) -> Vec<EngineEvent> {
		std::mem::take(&mut self.events)
	}
}
