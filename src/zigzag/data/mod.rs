//! Data plugins: where the devices and neighbor observations come from.

mod synthetic;
mod zha;

use std::collections::HashSet;

use log::debug;

pub use synthetic::{GenPlugin, GenSettings};
pub use zha::{FilePlugin, FileSettings, ZhaDevice, ZhaDump, ZhaNeighbor, map_devices};

use super::error::DataError;
use super::model::{Zag, Zig};
use super::plugin::{LocalBoxFuture, Plugin};

/// One snapshot of the network.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZigZags {
	/// Devices, each address at most once.
	pub zigs: Vec<Zig>,
	/// Neighbor observations between them.
	pub zags: Vec<Zag>,
}

/// A source of network snapshots.
pub trait DataPlugin: Plugin {
	/// Fetch a referentially complete snapshot (see [`fixup`]).
	fn fetch_data(&self) -> LocalBoxFuture<'_, Result<ZigZags, DataError>>;
}

/// Synthesizes a placeholder [`Zig`] for every zag endpoint that has none, so the
/// snapshot can be turned into a graph.
pub fn fixup(zigs: &mut Vec<Zig>, zags: &[Zag]) {
	let mut known: HashSet<String> = zigs.iter().map(|zig| zig.ieee.clone()).collect();
	for zag in zags {
		if known.insert(zag.ieee.clone()) {
			debug!("neighbor {} reported by {} is not a known device", zag.ieee, zag.from);
			zigs.push(Zig::placeholder(&zag.ieee, zag.device_type, zag.lqi));
		}
		if known.insert(zag.from.clone()) {
			zigs.push(Zig::placeholder(&zag.from, Default::default(), 0));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::zigzag::model::{Relationship, UNKNOWN, ZigRole};

	fn zag(ieee: &str, from: &str) -> Zag {
		Zag {
			ieee: ieee.into(),
			from: from.into(),
			lqi: 90,
			rssi: None,
			relationship: Relationship::Sibling,
			device_type: ZigRole::Router,
		}
	}

	#[test]
	fn fixup_adds_one_placeholder_per_missing_neighbor() {
		let mut zigs = vec![Zig::placeholder("A", ZigRole::Coordinator, 255)];
		zigs[0].name = "coordinator".into();
		let zags = vec![zag("B", "A"), zag("B", "A"), zag("A", "B")];
		fixup(&mut zigs, &zags);

		assert_eq!(zigs.len(), 2);
		let ghost = &zigs[1];
		assert_eq!(ghost.ieee, "B");
		assert_eq!(ghost.name, UNKNOWN);
		assert_eq!(ghost.manufacturer.as_deref(), Some(UNKNOWN));
		assert_eq!(ghost.device_type, ZigRole::Router);
		assert_eq!(ghost.lqi, 90);
		assert!(ghost.available);
	}

	#[test]
	fn fixup_leaves_complete_data_alone() {
		let mut zigs = vec![
			Zig::placeholder("A", ZigRole::Coordinator, 0),
			Zig::placeholder("B", ZigRole::EndDevice, 0),
		];
		let before = zigs.clone();
		fixup(&mut zigs, &[zag("A", "B")]);
		assert_eq!(zigs, before);
	}
}
