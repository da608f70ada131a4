//! The `force` layout plugin, a thin driver over `force_graph`.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};
use serde::Deserialize;

use super::{LayoutLink, LayoutNode, LayoutPlugin};
use crate::zigzag::model::Point;
use crate::zigzag::plugin::Plugin;

const TICK: f32 = 0.016;
const SEED_RADIUS: f64 = 100.0;
const MOVE_EPSILON: f64 = 1e-3;

/// Settings for [`ForceLayout`]. The first six feed `force_graph` directly.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ForceSettings {
	/// Repulsion between every pair of nodes.
	pub force_charge: f32,
	/// Attraction along links.
	pub force_spring: f32,
	/// Cap on the force applied to one node in one tick.
	pub force_max: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Velocity kept from one tick to the next.
	pub damping_factor: f32,
	/// Mass given to every node.
	pub node_mass: f32,
	/// The layout is stable once alpha falls to this value.
	pub alpha_min: f64,
	/// Fraction of alpha lost per step.
	pub alpha_decay: f64,
	/// Alpha given back by `restart` and `reset`.
	pub alpha_restart: f64,
}

impl Default for ForceSettings {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
			alpha_min: 0.01,
			alpha_decay: 0.02,
			alpha_restart: 0.1,
		}
	}
}

impl ForceSettings {
	fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Charge/spring simulation on top of `force_graph`, with a decaying alpha as its
/// convergence metric.
pub struct ForceLayout {
	settings: ForceSettings,
	graph: ForceGraph<usize, ()>,
	slots: Vec<Option<DefaultNodeIdx>>,
	seeds: Vec<Point>,
	positions: Vec<Point>,
	alpha: f64,
	report_all: bool,
}

impl ForceLayout {
	/// Registry id.
	pub const ID: &'static str = "force";

	/// An empty simulation.
	pub fn new(settings: ForceSettings) -> Self {
		Self {
			graph: ForceGraph::new(settings.parameters()),
			settings,
			slots: Vec::new(),
			seeds: Vec::new(),
			positions: Vec::new(),
			alpha: 0.0,
			report_all: false,
		}
	}

	/// Current convergence metric; the layout is stable at `alpha_min`.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	fn sample(&self) -> Vec<(usize, Point)> {
		let mut out = Vec::with_capacity(self.slots.len());
		self.graph.visit_nodes(|node| {
			out.push((
				node.data.user_data,
				Point::flat(node.x() as f64, node.y() as f64),
			));
		});
		out
	}

	fn slot(&self, index: usize) -> Option<DefaultNodeIdx> {
		self.slots.get(index).copied().flatten()
	}
}

impl Plugin for ForceLayout {
	fn id(&self) -> &str {
		Self::ID
	}
}

impl LayoutPlugin for ForceLayout {
	fn inject_nodes(&mut self, nodes: &[LayoutNode]) {
		self.graph = ForceGraph::new(self.settings.parameters());
		let len = nodes.iter().map(|n| n.index + 1).max().unwrap_or(0);
		self.slots = vec![None; len];
		self.seeds = vec![Point::ORIGIN; len];
		self.positions = vec![Point::ORIGIN; len];

		// Nodes without a position start on a ring, coincident nodes never separate.
		let radius = SEED_RADIUS * (nodes.len() as f64).sqrt().max(1.0);
		for (i, node) in nodes.iter().enumerate() {
			let seed = if node.position == Point::ORIGIN {
				let angle = (i as f64) * 2.0 * PI / nodes.len() as f64;
				Point::flat(radius * angle.cos(), radius * angle.sin())
			} else {
				node.position
			};
			let idx = self.graph.add_node(NodeData {
				x: seed.x as f32,
				y: seed.y as f32,
				mass: self.settings.node_mass,
				is_anchor: false,
				user_data: node.index,
			});
			self.slots[node.index] = Some(idx);
			self.seeds[node.index] = seed;
			self.positions[node.index] = seed;
		}
		self.alpha = 1.0;
		self.report_all = true;
	}

	fn inject_links(&mut self, links: &[LayoutLink]) {
		for link in links {
			match (self.slot(link.source), self.slot(link.target)) {
				(Some(src), Some(tgt)) if src != tgt => {
					self.graph.add_edge(src, tgt, EdgeData::default());
				}
				(Some(_), Some(_)) => debug!("skipping self link on slot {}", link.source),
				_ => warn!(
					"link {} -> {} refers to an unknown node",
					link.source, link.target
				),
			}
		}
	}

	fn is_stable(&self) -> bool {
		self.alpha <= self.settings.alpha_min
	}

	fn step(&mut self, count: usize) -> Vec<LayoutNode> {
		if self.slots.is_empty() {
			return Vec::new();
		}
		for _ in 0..count.max(1) {
			self.graph.update(TICK);
			self.alpha -= self.alpha * self.settings.alpha_decay;
		}

		let report_all = std::mem::take(&mut self.report_all);
		let mut changed = Vec::new();
		for (index, position) in self.sample() {
			let last = &mut self.positions[index];
			let moved = (last.x - position.x).hypot(last.y - position.y) > MOVE_EPSILON;
			if report_all || moved {
				*last = position;
				changed.push(LayoutNode { index, position });
			}
		}
		changed
	}

	fn lock_node(&mut self, node: LayoutNode) {
		if self.slot(node.index).is_none() {
			return;
		}
		self.positions[node.index] = node.position;
		self.graph.visit_nodes_mut(|n| {
			if n.data.user_data == node.index {
				n.data.x = node.position.x as f32;
				n.data.y = node.position.y as f32;
				n.data.is_anchor = true;
			}
		});
	}

	fn unlock_node(&mut self, index: usize) {
		self.graph.visit_nodes_mut(|n| {
			if n.data.user_data == index {
				n.data.is_anchor = false;
			}
		});
	}

	fn unlock_nodes(&mut self, indices: &[usize]) {
		let mut release = vec![false; self.slots.len()];
		for &index in indices {
			if let Some(flag) = release.get_mut(index) {
				*flag = true;
			}
		}
		self.graph.visit_nodes_mut(|n| {
			if release.get(n.data.user_data).copied().unwrap_or(false) {
				n.data.is_anchor = false;
			}
		});
	}

	fn reset(&mut self) {
		let seeds = &self.seeds;
		self.graph.visit_nodes_mut(|n| {
			if !n.data.is_anchor {
				let seed = seeds[n.data.user_data];
				n.data.x = seed.x as f32;
				n.data.y = seed.y as f32;
			}
		});
		self.alpha = self.settings.alpha_restart;
		self.report_all = true;
	}

	fn restart(&mut self) {
		self.alpha = self.settings.alpha_restart;
	}

	fn stop(&mut self) {
		self.graph = ForceGraph::new(self.settings.parameters());
		self.slots.clear();
		self.seeds.clear();
		self.positions.clear();
		self.alpha = 0.0;
		self.report_all = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn layout(n: usize) -> ForceLayout {
		let mut layout = ForceLayout::new(ForceSettings::default());
		let nodes: Vec<LayoutNode> = (0..n)
			.map(|index| LayoutNode {
				index,
				position: Point::ORIGIN,
			})
			.collect();
		layout.inject_nodes(&nodes);
		let links: Vec<LayoutLink> = (1..n)
			.map(|i| LayoutLink {
				source: i,
				target: i - 1,
			})
			.collect();
		layout.inject_links(&links);
		layout
	}

	#[test]
	fn empty_layout_is_stable() {
		let mut layout = ForceLayout::new(ForceSettings::default());
		assert!(layout.is_stable());
		assert!(layout.step(1).is_empty());
	}

	#[test]
	fn first_step_reports_every_node() {
		let mut layout = layout(5);
		assert!(!layout.is_stable());
		let changed = layout.step(1);
		assert_eq!(changed.len(), 5);
		assert!(changed.iter().all(|n| n.position != Point::ORIGIN));
	}

	#[test]
	fn settles_as_alpha_decays() {
		let mut layout = layout(4);
		let mut steps = 0;
		while !layout.is_stable() {
			layout.step(1);
			steps += 1;
			assert!(steps < 400, "layout never settled");
		}
		layout.restart();
		assert!(!layout.is_stable());
		assert_eq!(layout.alpha(), 0.1);
	}

	#[test]
	fn locked_nodes_stay_put() {
		let mut layout = layout(4);
		let pin = Point::flat(500.0, -250.0);
		layout.lock_node(LayoutNode {
			index: 2,
			position: pin,
		});
		for _ in 0..20 {
			for node in layout.step(1) {
				if node.index == 2 {
					assert_eq!(node.position, pin);
				}
			}
		}
		assert!(layout.sample().contains(&(2, pin)));

		layout.unlock_node(2);
		layout.step(5);
		assert!(!layout.sample().contains(&(2, pin)));
	}

	#[test]
	fn reset_returns_unlocked_nodes_to_their_seeds() {
		let mut layout = layout(3);
		let seeds = layout.seeds.clone();
		layout.step(30);
		let pin = Point::flat(40.0, 40.0);
		layout.lock_node(LayoutNode {
			index: 0,
			position: pin,
		});
		layout.reset();
		let sampled = layout.sample();
		assert!(sampled.contains(&(0, pin)));
		let (_, one) = sampled.iter().find(|(index, _)| *index == 1).unwrap();
		assert!((one.x - seeds[1].x).abs() < 1e-3 && (one.y - seeds[1].y).abs() < 1e-3);
		assert_eq!(layout.step(1).len(), 3);
	}

	#[test]
	fn unlock_nodes_releases_only_the_named_ones() {
		let mut layout = layout(3);
		let pins = [
			Point::flat(300.0, 300.0),
			Point::flat(-300.0, 300.0),
			Point::flat(0.0, -300.0),
		];
		for (index, &position) in pins.iter().enumerate() {
			layout.lock_node(LayoutNode { index, position });
		}
		layout.unlock_nodes(&[0, 2, 9]);
		layout.step(5);
		let sampled = layout.sample();
		assert!(!sampled.contains(&(0, pins[0])));
		assert!(sampled.contains(&(1, pins[1])));
		assert!(!sampled.contains(&(2, pins[2])));
	}

	#[test]
	fn unknown_links_are_ignored_and_stop_clears() {
		let mut layout = layout(2);
		layout.inject_links(&[LayoutLink {
			source: 0,
			target: 9,
		}]);
		layout.stop();
		assert!(layout.is_stable());
		assert!(layout.step(1).is_empty());
	}
}
