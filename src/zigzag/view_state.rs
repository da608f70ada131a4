//! Persistable snapshot of the camera and every locked zig.

use serde::{Deserialize, Serialize};

use super::error::ViewStateError;
use super::model::Point;

/// Where one locked zig was pinned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZigPosition {
	/// The zig's address.
	pub ieee: String,
	/// World position.
	pub position: Point,
}

/// Camera and pinned zigs, as saved between sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphViewState {
	/// Camera center.
	pub position: Point,
	/// Camera zoom.
	pub zoom: f64,
	/// Locked zigs only.
	#[serde(default)]
	pub zigs: Vec<ZigPosition>,
}

impl GraphViewState {
	/// Serialises to compact JSON.
	pub fn to_json(&self) -> Result<String, ViewStateError> {
		Ok(serde_json::to_string(self)?)
	}

	/// Parses text written by [`to_json`](Self::to_json).
	pub fn from_json(text: &str) -> Result<Self, ViewStateError> {
		Ok(serde_json::from_str(text)?)
	}
}
