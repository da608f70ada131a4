//! Layout plugins compute node positions iteratively.

mod force;

pub use force::{ForceLayout, ForceSettings};

use super::model::Point;
use super::plugin::Plugin;

/// A node as seen by the layout engine: its slot and position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutNode {
	/// Zig arena index.
	pub index: usize,
	/// World position.
	pub position: Point,
}

/// A link between two node slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutLink {
	/// Slot of one end.
	pub source: usize,
	/// Slot of the other end.
	pub target: usize,
}

/// An iterative layout engine driven one step per frame.
pub trait LayoutPlugin: Plugin {
	/// Replaces the simulated nodes. Slots are the nodes' `index` fields.
	fn inject_nodes(&mut self, nodes: &[LayoutNode]);

	/// Replaces the simulated links. Links to unknown slots are dropped.
	fn inject_links(&mut self, links: &[LayoutLink]);

	/// True once the convergence metric has reached its minimum.
	fn is_stable(&self) -> bool;

	/// Advances the simulation and returns the nodes whose position changed.
	fn step(&mut self, count: usize) -> Vec<LayoutNode>;

	/// Pins a node at the given position; it still pushes and pulls the others.
	fn lock_node(&mut self, node: LayoutNode);

	/// Lets a locked node move again.
	fn unlock_node(&mut self, index: usize);

	/// Releases several nodes at once.
	fn unlock_nodes(&mut self, indices: &[usize]) {
		for &index in indices {
			self.unlock_node(index);
		}
	}

	/// Moves every unlocked node back to its starting position and re-energises.
	fn reset(&mut self);

	/// Re-energises the simulation in place.
	fn restart(&mut self);

	/// Halts and forgets every node and link.
	fn stop(&mut self);
}
