//! Device ("Zig") and neighbor observation ("Zag") records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel used for fields of devices we only know about through a neighbor scan.
pub const UNKNOWN: &str = "Unknown";

/// A point in world (or screen) space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	/// Horizontal, growing rightwards.
	pub x: f64,
	/// Vertical, growing downwards.
	pub y: f64,
	/// Depth; zero for everything drawn on a canvas.
	#[serde(default)]
	pub z: f64,
}

impl Point {
	/// `(0, 0, 0)`.
	pub const ORIGIN: Point = Point::new(0.0, 0.0, 0.0);

	/// A point from all three coordinates.
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	/// A point on the `z = 0` plane.
	pub const fn flat(x: f64, y: f64) -> Self {
		Self { x, y, z: 0.0 }
	}
}

/// Device classification within the mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZigRole {
	/// Forms the network; exactly one per mesh.
	Coordinator,
	/// Sleepy or mains-powered leaf that routes nothing.
	EndDevice,
	/// Relays traffic for its children.
	Router,
	/// Anything the dump does not name.
	#[default]
	#[serde(other)]
	Unknown,
}

impl ZigRole {
	/// The name used in device dumps and as an icon name.
	pub fn as_str(self) -> &'static str {
		match self {
			ZigRole::Coordinator => "Coordinator",
			ZigRole::EndDevice => "EndDevice",
			ZigRole::Router => "Router",
			ZigRole::Unknown => UNKNOWN,
		}
	}
}

impl fmt::Display for ZigRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How the reporting device relates to its neighbor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
	/// The neighbor is the reporter's parent.
	Parent,
	/// The neighbor is the reporter's child.
	Child,
	/// Both hang off the same parent.
	Sibling,
	/// Was a child, has since left.
	#[serde(rename = "Previous_Child", alias = "PreviousChild")]
	PreviousChild,
	/// Reported as `None`: a neighbor with no tree relation.
	#[serde(rename = "None")]
	NoRelation,
	/// Anything else the dump reports.
	#[default]
	#[serde(other)]
	Unknown,
}

impl fmt::Display for Relationship {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Relationship::Parent => "Parent",
			Relationship::Child => "Child",
			Relationship::Sibling => "Sibling",
			Relationship::PreviousChild => "Previous Child",
			Relationship::NoRelation => "None",
			Relationship::Unknown => UNKNOWN,
		})
	}
}

/// One endpoint a device exposes, e.g. `ON_OFF_LIGHT`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
	/// Endpoint device type name.
	pub name: String,
}

/// A network device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zig {
	/// Unique device address, e.g. `00:0d:6f:00:0a:90:69:e7`.
	pub ieee: String,
	/// Name reported by the device.
	pub name: String,
	/// Name given in the host application, if any.
	#[serde(default)]
	pub user_given_name: Option<String>,
	/// Role in the mesh.
	#[serde(default)]
	pub device_type: ZigRole,
	/// Link quality seen by the coordinator, 0 to 255.
	#[serde(default)]
	pub lqi: i32,
	/// Signal strength in dBm.
	#[serde(default)]
	pub rssi: i32,
	/// Whether the host currently reaches the device.
	#[serde(default)]
	pub available: bool,
	/// Timestamp as reported; never parsed.
	#[serde(default)]
	pub last_seen: String,
	/// Room or area in the host application.
	#[serde(default)]
	pub area_id: Option<String>,
	/// `Mains`, `Battery` and so on.
	#[serde(default)]
	pub power_source: Option<String>,
	/// Manufacturer string.
	#[serde(default)]
	pub manufacturer: Option<String>,
	/// Model string.
	#[serde(default)]
	pub model: Option<String>,
	/// Endpoints the device exposes.
	#[serde(default)]
	pub endpoint_names: Vec<Endpoint>,
}

impl Zig {
	/// Placeholder for a device seen only as somebody's neighbor.
	pub fn placeholder(ieee: &str, device_type: ZigRole, lqi: i32) -> Self {
		Self {
			ieee: ieee.to_owned(),
			name: UNKNOWN.into(),
			user_given_name: None,
			device_type,
			lqi,
			rssi: 0,
			available: true,
			last_seen: UNKNOWN.into(),
			area_id: None,
			power_source: Some(UNKNOWN.into()),
			manufacturer: Some(UNKNOWN.into()),
			model: Some(UNKNOWN.into()),
			endpoint_names: Vec::new(),
		}
	}

	/// The user's name for the device when set, otherwise the reported one.
	pub fn display_name(&self) -> &str {
		self.user_given_name.as_deref().unwrap_or(&self.name)
	}
}

/// A directed neighbor observation: device `from` reported `ieee` as a neighbor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zag {
	/// The neighbor.
	pub ieee: String,
	/// The device that reported it.
	pub from: String,
	/// Link quality as seen by `from`.
	#[serde(default)]
	pub lqi: i32,
	/// Signal strength, when the reporter knows it.
	#[serde(default)]
	pub rssi: Option<i32>,
	/// What the neighbor is to `from`.
	#[serde(default)]
	pub relationship: Relationship,
	/// The neighbor's role as `from` sees it.
	#[serde(default)]
	pub device_type: ZigRole,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_role_and_relationship_fall_back() {
		let zag: Zag = serde_json::from_str(
			r#"{"ieee":"a","from":"b","lqi":12,"relationship":"Stranger","device_type":"Toaster"}"#,
		)
		.unwrap();
		assert_eq!(zag.relationship, Relationship::Unknown);
		assert_eq!(zag.device_type, ZigRole::Unknown);

		let zag: Zag =
			serde_json::from_str(r#"{"ieee":"a","from":"b","relationship":"Previous_Child"}"#)
				.unwrap();
		assert_eq!(zag.relationship, Relationship::PreviousChild);
	}

	#[test]
	fn display_name_prefers_user_given_name() {
		let mut zig = Zig::placeholder("00:01", ZigRole::Router, 0);
		assert_eq!(zig.display_name(), UNKNOWN);
		zig.user_given_name = Some("Hall light".into());
		assert_eq!(zig.display_name(), "Hall light");
	}
}
