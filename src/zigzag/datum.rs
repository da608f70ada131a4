//! Runtime graph state: zigs and zags wrapped with position, lock and adjacency.
//!
//! Datums live in dense arrays owned by the grapher. Everything that needs to point at
//! one (adjacency lists, render widgets, layout slots) holds its index instead.

use std::collections::HashMap;

use super::error::GraphError;
use super::model::{Point, Zag, Zig};
use super::widget::{ZagWidget, ZigWidget};

/// A zig in the running graph.
#[derive(Debug)]
pub struct ZigDatum {
	/// The device as last fetched.
	pub zig: Zig,
	/// Slot in the zig array, also the layout engine's node index.
	pub index: usize,
	/// World position, updated from layout steps and drags.
	pub position: Point,
	/// Pinned by a drag, a restored view state or [`Grapher::lock`](super::Grapher::lock).
	pub is_locked: bool,
	/// Indices of every zag datum touching this zig.
	pub zag_ds: Vec<usize>,
	/// Present while a session is running.
	pub widget: Option<ZigWidget>,
}

/// Every observation between one pair of zigs, drawn as a single link.
#[derive(Debug)]
pub struct ZagDatum {
	/// Zig index of the first observation's neighbor.
	pub source: usize,
	/// Zig index of the first observation's reporter.
	pub target: usize,
	/// Every observation made for this pair of zigs, in either direction.
	pub zags: Vec<Zag>,
	/// Present while a session is running.
	pub widget: Option<ZagWidget>,
}

/// Axis aligned box around a set of positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Smallest coordinate on each axis.
	pub min: Point,
	/// Largest coordinate on each axis.
	pub max: Point,
}

/// The zig and zag datum arrays plus an address index.
#[derive(Debug, Default)]
pub struct Graph {
	/// Indexed by [`ZigDatum::index`].
	pub zigs: Vec<ZigDatum>,
	/// Indexed by the numbers in [`ZigDatum::zag_ds`].
	pub zags: Vec<ZagDatum>,
	by_ieee: HashMap<String, usize>,
}

impl Graph {
	/// Builds the datum arrays, grouping observations by unordered pair of zigs.
	///
	/// Every zag must name two known zigs; data plugins guarantee this by running
	/// [`fixup`](super::data::fixup) first.
	pub fn build(zigs: Vec<Zig>, zags: Vec<Zag>) -> Result<Self, GraphError> {
		let mut by_ieee = HashMap::with_capacity(zigs.len());
		let mut zig_ds = Vec::with_capacity(zigs.len());
		for (index, zig) in zigs.into_iter().enumerate() {
			if by_ieee.insert(zig.ieee.clone(), index).is_some() {
				return Err(GraphError::DuplicateZig { ieee: zig.ieee });
			}
			zig_ds.push(ZigDatum {
				zig,
				index,
				position: Point::ORIGIN,
				is_locked: false,
				zag_ds: Vec::new(),
				widget: None,
			});
		}

		let mut zag_ds: Vec<ZagDatum> = Vec::new();
		let mut by_pair: HashMap<(usize, usize), usize> = HashMap::new();
		for zag in zags {
			let resolve = |ieee: &str| {
				by_ieee.get(ieee).copied().ok_or_else(|| GraphError::UnknownZig {
					ieee: zag.ieee.clone(),
					from: zag.from.clone(),
					missing: ieee.to_owned(),
				})
			};
			let source = resolve(&zag.ieee)?;
			let target = resolve(&zag.from)?;

			let pair = (source.min(target), source.max(target));
			let zag_index = *by_pair.entry(pair).or_insert_with(|| {
				zag_ds.push(ZagDatum {
					source,
					target,
					zags: Vec::new(),
					widget: None,
				});
				let zag_index = zag_ds.len() - 1;
				zig_ds[source].zag_ds.push(zag_index);
				if target != source {
					zig_ds[target].zag_ds.push(zag_index);
				}
				zag_index
			});
			zag_ds[zag_index].zags.push(zag);
		}

		Ok(Self {
			zigs: zig_ds,
			zags: zag_ds,
			by_ieee,
		})
	}

	/// True when there are no zigs.
	pub fn is_empty(&self) -> bool {
		self.zigs.is_empty()
	}

	/// Arena index of the zig with this address.
	pub fn index_of(&self, ieee: &str) -> Option<usize> {
		self.by_ieee.get(ieee).copied()
	}

	/// The zig with this address.
	pub fn find(&self, ieee: &str) -> Option<&ZigDatum> {
		self.index_of(ieee).map(|index| &self.zigs[index])
	}

	/// Bounds of every zig position, `None` for an empty graph.
	pub fn bounds(&self) -> Option<Bounds> {
		let first = self.zigs.first()?.position;
		Some(self.zigs.iter().fold(
			Bounds {
				min: first,
				max: first,
			},
			|b, zig_d| {
				let p = zig_d.position;
				Bounds {
					min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y), b.min.z.min(p.z)),
					max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y), b.max.z.max(p.z)),
				}
			},
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::zigzag::model::{Relationship, ZigRole};

	fn zig(ieee: &str) -> Zig {
		let mut zig = Zig::placeholder(ieee, ZigRole::Router, 0);
		zig.name = format!("zig {ieee}");
		zig
	}

	fn zag(ieee: &str, from: &str, lqi: i32, relationship: Relationship) -> Zag {
		Zag {
			ieee: ieee.into(),
			from: from.into(),
			lqi,
			rssi: None,
			relationship,
			device_type: ZigRole::Router,
		}
	}

	#[test]
	fn one_datum_per_zig_in_input_order() {
		let graph = Graph::build(vec![zig("C"), zig("A"), zig("B")], vec![]).unwrap();
		let order: Vec<(&str, usize)> = graph
			.zigs
			.iter()
			.map(|z| (z.zig.ieee.as_str(), z.index))
			.collect();
		assert_eq!(order, vec![("C", 0), ("A", 1), ("B", 2)]);
		assert!(graph.zigs.iter().all(|z| z.position == Point::ORIGIN && !z.is_locked));
	}

	#[test]
	fn single_observation_resolves_source_and_target() {
		let graph = Graph::build(
			vec![zig("A"), zig("B")],
			vec![zag("A", "B", 50, Relationship::Child)],
		)
		.unwrap();

		assert_eq!(graph.zags.len(), 1);
		let zag_d = &graph.zags[0];
		assert_eq!(graph.zigs[zag_d.source].zig.ieee, "A");
		assert_eq!(graph.zigs[zag_d.target].zig.ieee, "B");
		assert_eq!(zag_d.zags.len(), 1);
		assert_eq!(graph.zigs[0].zag_ds, vec![0]);
		assert_eq!(graph.zigs[1].zag_ds, vec![0]);
	}

	#[test]
	fn both_directions_collapse_into_one_datum() {
		let graph = Graph::build(
			vec![zig("A"), zig("B"), zig("C")],
			vec![
				zag("A", "B", 50, Relationship::Child),
				zag("C", "A", 90, Relationship::Sibling),
				zag("B", "A", 60, Relationship::Parent),
			],
		)
		.unwrap();

		assert_eq!(graph.zags.len(), 2);
		assert_eq!(graph.zags[0].zags.len(), 2);
		assert_eq!(graph.zags[0].zags[1].relationship, Relationship::Parent);
		assert_eq!(graph.zags[1].zags.len(), 1);
		assert_eq!(graph.zigs[0].zag_ds, vec![0, 1]);
		assert_eq!(graph.zigs[1].zag_ds, vec![0]);
		assert_eq!(graph.zigs[2].zag_ds, vec![1]);
	}

	#[test]
	fn missing_endpoint_is_an_inconsistency() {
		let err = Graph::build(vec![zig("A")], vec![zag("X", "A", 10, Relationship::Child)])
			.unwrap_err();
		assert_eq!(
			err,
			GraphError::UnknownZig {
				ieee: "X".into(),
				from: "A".into(),
				missing: "X".into(),
			}
		);
	}

	#[test]
	fn duplicate_ieee_is_an_inconsistency() {
		let err = Graph::build(vec![zig("A"), zig("A")], vec![]).unwrap_err();
		assert_eq!(err, GraphError::DuplicateZig { ieee: "A".into() });
	}

	#[test]
	fn self_observation_registers_once() {
		let graph =
			Graph::build(vec![zig("A")], vec![zag("A", "A", 10, Relationship::Sibling)]).unwrap();
		assert_eq!(graph.zigs[0].zag_ds, vec![0]);
	}

	#[test]
	fn bounds_cover_every_position() {
		let mut graph = Graph::build(vec![zig("A"), zig("B"), zig("C")], vec![]).unwrap();
		assert!(Graph::default().bounds().is_none());
		graph.zigs[0].position = Point::flat(-10.0, 5.0);
		graph.zigs[1].position = Point::flat(30.0, -2.0);
		graph.zigs[2].position = Point::flat(0.0, 40.0);
		let bounds = graph.bounds().unwrap();
		assert_eq!(bounds.min, Point::flat(-10.0, -2.0));
		assert_eq!(bounds.max, Point::flat(30.0, 40.0));
	}
}
