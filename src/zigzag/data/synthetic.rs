//! The `gen` data plugin: a made-up but plausible mesh for demos and tests.

use log::info;
use serde::Deserialize;

use super::zha::{ZhaDevice, ZhaNeighbor, map_devices};
use super::{DataPlugin, ZigZags};
use crate::zigzag::error::DataError;
use crate::zigzag::model::{Endpoint, Relationship, ZigRole};
use crate::zigzag::plugin::{LocalBoxFuture, Plugin};

const ENDPOINTS: &[&str] = &[
	"ON_OFF_LIGHT_SWITCH",
	"DIMMABLE_LIGHT",
	"OCCUPANCY_SENSOR",
	"TEMPERATURE_SENSOR",
	"SMART_PLUG",
	"DOOR_LOCK",
	"REMOTE_CONTROL",
	"IAS_ZONE",
];

/// Settings for [`GenPlugin`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenSettings {
	/// Number of devices, coordinator included.
	pub count: usize,
	/// Varies the mesh; the same seed always yields the same mesh.
	pub seed: usize,
}

impl Default for GenSettings {
	fn default() -> Self {
		Self { count: 60, seed: 0 }
	}
}

/// Generates a plausible mesh: a coordinator, routers and end devices in a random tree.
pub struct GenPlugin {
	settings: GenSettings,
}

impl GenPlugin {
	/// Registry id.
	pub const ID: &'static str = "gen";

	/// A generator for the given settings.
	pub fn new(settings: GenSettings) -> Self {
		Self { settings }
	}

	/// Simple pseudo-random number generator (deterministic for consistency).
	fn rand(&self, n: usize) -> f64 {
		let seed = n.wrapping_mul(31).wrapping_add(self.settings.seed.wrapping_mul(7919));
		let x = (seed.wrapping_add(1).wrapping_mul(9301).wrapping_add(49297)) % 233280;
		(x as f64) / 233280.0
	}

	fn ieee(&self, i: usize) -> String {
		let bytes = (i as u64) ^ ((self.settings.seed as u64) << 32);
		format!(
			"00:12:4b:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
			(bytes >> 32) & 0xff,
			(bytes >> 24) & 0xff,
			(bytes >> 16) & 0xff,
			(bytes >> 8) & 0xff,
			bytes & 0xff
		)
	}

	fn lqi(&self, n: usize) -> i32 {
		20 + (self.rand(n) * 235.0) as i32
	}

	fn generate(&self) -> Vec<ZhaDevice> {
		let count = self.settings.count;
		let mut devices: Vec<ZhaDevice> = Vec::with_capacity(count);
		let mut parents: Vec<usize> = Vec::with_capacity(count);

		for i in 0..count {
			let role = if i == 0 {
				ZigRole::Coordinator
			} else if self.rand(i + count) < 0.4 {
				ZigRole::Router
			} else {
				ZigRole::EndDevice
			};

			// End devices cannot parent anything, walk up until we hit one that can.
			let mut parent = if i == 0 { 0 } else { (self.rand(i) * i as f64) as usize };
			while devices
				.get(parent)
				.is_some_and(|p| p.device_type == ZigRole::EndDevice)
			{
				parent = parents[parent];
			}
			parents.push(parent);

			let endpoint = ENDPOINTS[(self.rand(i + 2 * count) * ENDPOINTS.len() as f64) as usize
				% ENDPOINTS.len()];
			let (name, power_source, endpoint_names) = match role {
				ZigRole::Coordinator => ("Coordinator".to_owned(), "Mains", Vec::new()),
				ZigRole::Router => (format!("Router {i}"), "Mains", vec![endpoint]),
				_ => (format!("Sensor {i}"), "Battery", vec![endpoint]),
			};

			devices.push(ZhaDevice {
				ieee: self.ieee(i),
				name,
				user_given_name: None,
				device_type: role,
				lqi: self.lqi(i),
				rssi: -(30 + (self.rand(i + 3 * count) * 60.0) as i32),
				available: self.rand(i + 4 * count) > 0.05,
				last_seen: format!("2021-02-01T10:{:02}:{:02}", i / 60 % 60, i % 60),
				area_id: None,
				power_source: Some(power_source.to_owned()),
				manufacturer: Some("Zigzag Labs".to_owned()),
				model: Some(format!("ZZ-{}", role.as_str())),
				endpoint_names: endpoint_names
					.into_iter()
					.map(|name| Endpoint { name: name.to_owned() })
					.collect(),
				neighbors: Vec::new(),
			});
		}

		for i in 1..count {
			let parent = parents[i];
			let role = devices[i].device_type;
			let child_ieee = devices[i].ieee.clone();
			let (parent_ieee, parent_type) =
				(devices[parent].ieee.clone(), devices[parent].device_type);
			devices[parent].neighbors.push(ZhaNeighbor {
				ieee: child_ieee,
				device_type: role,
				lqi: self.lqi(i + 5 * count),
				relationship: Relationship::Child,
			});
			if role == ZigRole::Router {
				devices[i].neighbors.push(ZhaNeighbor {
					ieee: parent_ieee,
					device_type: parent_type,
					lqi: self.lqi(i + 6 * count),
					relationship: Relationship::Parent,
				});
				if i % 13 == 0 {
					devices[i].neighbors.push(ZhaNeighbor {
						ieee: self.ieee(count + i),
						device_type: ZigRole::EndDevice,
						lqi: self.lqi(i + 7 * count),
						relationship: Relationship::Unknown,
					});
				}
			}
		}

		// Routers hear each other too.
		let routers: Vec<usize> = (1..count)
			.filter(|&i| devices[i].device_type == ZigRole::Router)
			.collect();
		for pair in routers.windows(2) {
			let (a, b) = (pair[0], pair[1]);
			if parents[a] != b && parents[b] != a && self.rand(a * b) < 0.3 {
				let ieee = devices[b].ieee.clone();
				devices[a].neighbors.push(ZhaNeighbor {
					ieee,
					device_type: ZigRole::Router,
					lqi: self.lqi(a + b),
					relationship: Relationship::Sibling,
				});
			}
		}

		devices
	}
}

impl Plugin for GenPlugin {
	fn id(&self) -> &str {
		Self::ID
	}
}

impl DataPlugin for GenPlugin {
	fn fetch_data(&self) -> LocalBoxFuture<'_, Result<ZigZags, DataError>> {
		Box::pin(async move {
			if self.settings.count == 0 {
				return Err(DataError::Fetch("nothing to generate".into()));
			}
			let data = map_devices(self.generate());
			info!("generated {} zigs and {} zags", data.zigs.len(), data.zags.len());
			Ok(data)
		})
	}
}
