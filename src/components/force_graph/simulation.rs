//! Alpha-cooled layout on top of [`ForceGraph`].
//!
//! The crate integrates charge and spring forces. This wrapper cools it the
//! d3 way: each tick moves `alpha` towards `alpha_target` by `alpha_decay`,
//! and `alpha` scales the step handed to [`ForceGraph::update`]. Per-node
//! charge becomes node mass, and the pull towards the origin is applied to
//! positions after each step.
//!
//! The engine reads nodes from a mirror of [`LayoutNode`]s, refreshed after
//! every tick. Each crate node carries its mirror index as user data.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::adapter::{LayoutData, LayoutLink, LayoutNode};

const INITIAL_RADIUS: f64 = 10.0;
/// Simulated seconds per tick at full alpha.
const TICK_DT: f32 = 0.016;
/// Charge magnitude worth one unit of node mass.
pub const CHARGE_PER_MASS: f64 = 5.0;
const MIN_MASS: f64 = 0.1;
const DEFAULT_CHARGE: f64 = -30.0;

/// Simulation energy and damping parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
	/// The engine stops once alpha drops below this.
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub alpha_target: f64,
	/// Fraction of velocity lost per step.
	pub velocity_decay: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			alpha_min: 0.001,
			// reaches alpha_min after 300 ticks
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			alpha_target: 0.0,
			velocity_decay: 0.4,
		}
	}
}

impl SimulationConfig {
	fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: (1.0 - self.velocity_decay).clamp(0.0, 1.0) as f32,
		}
	}
}

/// Node mass for a charge strength. Only the magnitude counts; the crate
/// always repels.
pub fn charge_mass(charge: f64) -> f32 {
	(charge.abs() / CHARGE_PER_MASS).max(MIN_MASS) as f32
}

/// Mirror of the layout plus the [`ForceGraph`] that moves it.
pub struct Simulation {
	graph: ForceGraph<usize, ()>,
	nodes: Vec<LayoutNode>,
	links: Vec<LayoutLink>,
	charge: Box<dyn Fn(&LayoutNode) -> f64>,
	center_pull: f64,
	alpha: f64,
	config: SimulationConfig,
}

impl Default for Simulation {
	fn default() -> Self {
		let config = SimulationConfig::default();
		Self {
			graph: ForceGraph::new(config.parameters()),
			nodes: Vec::new(),
			links: Vec::new(),
			charge: Box::new(|_| DEFAULT_CHARGE),
			center_pull: 0.0,
			alpha: 1.0,
			config,
		}
	}
}

impl Simulation {
	/// Replace the node and link set, placing unpositioned nodes on a
	/// phyllotaxis spiral around the origin, and reheat.
	pub fn set_data(&mut self, data: LayoutData) {
		let LayoutData { mut nodes, links } = data;
		let angle_step = PI * (3.0 - 5.0_f64.sqrt());
		for (i, node) in nodes.iter_mut().enumerate() {
			if !node.placed {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * angle_step;
				node.x = radius * angle.cos();
				node.y = radius * angle.sin();
				node.vx = 0.0;
				node.vy = 0.0;
				node.placed = true;
			}
		}
		self.nodes = nodes;
		self.links = links;
		self.alpha = 1.0;
		self.rebuild();
	}

	/// Per-node charge strength; see [`charge_mass`].
	pub fn set_charge(&mut self, charge: Box<dyn Fn(&LayoutNode) -> f64>) {
		self.charge = charge;
		self.rebuild();
	}

	pub fn set_center_pull(&mut self, strength: f64) {
		self.center_pull = strength;
	}

	pub fn config(&self) -> SimulationConfig {
		self.config
	}

	pub fn set_config(&mut self, config: SimulationConfig) {
		let damping_changed = config.velocity_decay != self.config.velocity_decay;
		self.config = config;
		if damping_changed {
			self.rebuild();
		}
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.config.alpha_target = target;
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Alpha has fallen below `alpha_min`.
	pub fn is_cooled(&self) -> bool {
		self.alpha < self.config.alpha_min
	}

	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[LayoutLink] {
		&self.links
	}

	/// Hold a node at a graph position until [`Simulation::unpin`].
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		let Some(mirror) = self.nodes.get_mut(index) else {
			return;
		};
		mirror.fx = Some(x);
		mirror.fy = Some(y);
		mirror.x = x;
		mirror.y = y;
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data == index {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
	}

	pub fn unpin(&mut self, index: usize) {
		let Some(mirror) = self.nodes.get_mut(index) else {
			return;
		};
		mirror.fx = None;
		mirror.fy = None;
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data == index {
				node.data.is_anchor = false;
			}
		});
	}

	pub fn tick(&mut self) {
		self.alpha += (self.config.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		let dt = TICK_DT * alpha as f32;
		if dt > 0.0 {
			self.graph.update(dt);
		}

		let pull = (self.center_pull * alpha) as f32;
		if pull > 0.0 {
			self.graph.visit_nodes_mut(|node| {
				if !node.data.is_anchor {
					node.data.x -= node.data.x * pull;
					node.data.y -= node.data.y * pull;
				}
			});
		}

		let nodes = &mut self.nodes;
		self.graph.visit_nodes(|node| {
			if let Some(mirror) = nodes.get_mut(node.data.user_data) {
				let (x, y) = (f64::from(node.x()), f64::from(node.y()));
				mirror.vx = x - mirror.x;
				mirror.vy = y - mirror.y;
				mirror.x = x;
				mirror.y = y;
			}
		});
	}

	/// Recreate the crate graph from the mirror, keeping positions and pins.
	fn rebuild(&mut self) {
		let mut graph = ForceGraph::new(self.config.parameters());
		let handles: Vec<DefaultNodeIdx> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				graph.add_node(NodeData {
					x: node.fx.unwrap_or(node.x) as f32,
					y: node.fy.unwrap_or(node.y) as f32,
					mass: charge_mass((self.charge)(node)),
					is_anchor: node.fx.is_some() || node.fy.is_some(),
					user_data: i,
				})
			})
			.collect();
		for link in &self.links {
			if let (Some(&source), Some(&target)) = (handles.get(link.source), handles.get(link.target)) {
				graph.add_edge(source, target, EdgeData::default());
			}
		}
		self.graph = graph;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, depth: u32, x: f64, y: f64) -> LayoutNode {
		LayoutNode {
			id: id.into(),
			depth,
			reading_progress: 0.0,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			placed: true,
		}
	}

	fn dist(a: &LayoutNode, b: &LayoutNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	fn mass(sim: &Simulation, index: usize) -> Option<f32> {
		let mut mass = None;
		sim.graph.visit_nodes(|node| {
			if node.data.user_data == index {
				mass = Some(node.data.mass);
			}
		});
		mass
	}

	fn sim(nodes: Vec<LayoutNode>, links: Vec<LayoutLink>) -> Simulation {
		let mut sim = Simulation::default();
		sim.set_data(LayoutData { nodes, links });
		sim
	}

	#[test]
	fn alpha_moves_towards_target() {
		let mut sim = sim(vec![node("a", 0, 0.0, 0.0)], vec![]);
		sim.set_config(SimulationConfig { alpha_decay: 0.01, ..SimulationConfig::default() });
		sim.tick();
		assert!((sim.alpha() - 0.99).abs() < 1e-12);
		for _ in 0..1000 {
			sim.tick();
		}
		assert!(sim.is_cooled());
	}

	#[test]
	fn places_unpositioned_nodes_only() {
		let mut fresh = node("b", 1, 0.0, 0.0);
		fresh.placed = false;
		let sim = sim(vec![node("a", 0, 42.0, -7.0), fresh], vec![]);
		assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (42.0, -7.0));
		let b = &sim.nodes()[1];
		assert!(b.placed);
		let r = (b.x * b.x + b.y * b.y).sqrt();
		assert!((r - INITIAL_RADIUS * 1.5_f64.sqrt()).abs() < 1e-9);
	}

	#[test]
	fn center_pull_moves_towards_origin() {
		let mut sim = sim(vec![node("a", 0, 100.0, -50.0)], vec![]);
		sim.set_center_pull(0.05);
		sim.tick();
		let a = &sim.nodes()[0];
		assert!(a.x < 100.0 && a.y > -50.0);
	}

	#[test]
	fn charge_pushes_apart() {
		let mut sim = sim(vec![node("a", 0, -1.0, 0.0), node("b", 0, 1.0, 0.0)], vec![]);
		let before = dist(&sim.nodes()[0], &sim.nodes()[1]);
		for _ in 0..5 {
			sim.tick();
		}
		assert!(dist(&sim.nodes()[0], &sim.nodes()[1]) > before);
	}

	#[test]
	fn charge_sets_mass_by_depth() {
		let mut sim = sim(vec![node("near", 0, 0.0, 0.0), node("far", 3, 5.0, 5.0)], vec![]);
		sim.set_charge(Box::new(|n: &LayoutNode| if n.depth == 0 { -50.0 } else { -20.0 }));
		assert_eq!(mass(&sim, 0), Some(10.0));
		assert_eq!(mass(&sim, 1), Some(4.0));
		assert_eq!(mass(&sim, 2), None);
		assert_eq!(charge_mass(0.0), MIN_MASS as f32);
	}

	#[test]
	fn pinned_nodes_stay_put() {
		let mut sim = sim(vec![node("a", 0, 5.0, 5.0), node("b", 0, 6.0, 6.0)], vec![]);
		sim.set_center_pull(0.05);
		sim.pin(0, 10.0, -10.0);
		for _ in 0..3 {
			sim.tick();
		}
		let a = &sim.nodes()[0];
		assert_eq!((a.x, a.y), (10.0, -10.0));
		assert_eq!((a.fx, a.fy), (Some(10.0), Some(-10.0)));

		sim.unpin(0);
		assert_eq!(sim.nodes()[0].fx, None);
		sim.tick();
		assert_ne!((sim.nodes()[0].x, sim.nodes()[0].y), (10.0, -10.0));
	}

	#[test]
	fn cooled_layout_stops_moving() {
		let mut sim = sim(vec![node("a", 0, -1.0, 0.0), node("b", 0, 1.0, 0.0)], vec![]);
		sim.set_config(SimulationConfig { alpha_decay: 1.0, ..SimulationConfig::default() });
		let before: Vec<_> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		sim.tick();
		let after: Vec<_> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}
}
