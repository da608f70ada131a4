//! ZHA device dumps and the `file` data plugin that reads them.

use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::{DataPlugin, ZigZags, fixup};
use crate::zigzag::error::DataError;
use crate::zigzag::model::{Endpoint, Relationship, Zag, Zig, ZigRole};
use crate::zigzag::plugin::{LocalBoxFuture, Plugin};

/// Response body of a `zha/devices` call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZhaDump {
	/// Every device the coordinator knows.
	pub result: Vec<ZhaDevice>,
}

/// One device as ZHA reports it. Fields mirror [`Zig`] plus the neighbor table.
#[allow(missing_docs)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZhaDevice {
	pub ieee: String,
	pub name: String,
	#[serde(default)]
	pub user_given_name: Option<String>,
	#[serde(default)]
	pub device_type: ZigRole,
	#[serde(default, deserialize_with = "lenient_i32")]
	pub lqi: i32,
	#[serde(default, deserialize_with = "lenient_i32")]
	pub rssi: i32,
	#[serde(default)]
	pub available: bool,
	#[serde(default)]
	pub last_seen: String,
	#[serde(default)]
	pub area_id: Option<String>,
	#[serde(default)]
	pub power_source: Option<String>,
	#[serde(default)]
	pub manufacturer: Option<String>,
	#[serde(default)]
	pub model: Option<String>,
	#[serde(default)]
	pub endpoint_names: Vec<Endpoint>,
	#[serde(default)]
	pub neighbors: Vec<ZhaNeighbor>,
}

/// One neighbor table row. Fields mirror [`Zag`], minus the reporter.
#[allow(missing_docs)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZhaNeighbor {
	pub ieee: String,
	#[serde(default)]
	pub device_type: ZigRole,
	#[serde(default, deserialize_with = "lenient_i32")]
	pub lqi: i32,
	#[serde(default)]
	pub relationship: Relationship,
}

// ZHA reports some numbers as strings ("255") and some as null.
fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::Number(n) => n.as_f64().map(|v| v as i32).unwrap_or_default(),
		Value::String(s) => s.trim().parse::<f64>().map(|v| v as i32).unwrap_or_default(),
		_ => 0,
	})
}

/// Maps ZHA devices into zigs and their neighbor tables into zags, then fixes up
/// neighbors the coordinator does not know about.
pub fn map_devices(devices: Vec<ZhaDevice>) -> ZigZags {
	let mut zigs = Vec::with_capacity(devices.len());
	let mut zags = Vec::new();
	for device in devices {
		zags.extend(device.neighbors.iter().map(|neighbor| Zag {
			ieee: neighbor.ieee.clone(),
			from: device.ieee.clone(),
			lqi: neighbor.lqi,
			rssi: None,
			relationship: neighbor.relationship,
			device_type: neighbor.device_type,
		}));
		zigs.push(Zig {
			ieee: device.ieee,
			name: device.name,
			user_given_name: device.user_given_name,
			device_type: device.device_type,
			lqi: device.lqi,
			rssi: device.rssi,
			available: device.available,
			last_seen: device.last_seen,
			area_id: device.area_id,
			power_source: device.power_source,
			manufacturer: device.manufacturer,
			model: device.model,
			endpoint_names: device.endpoint_names,
		});
	}
	fixup(&mut zigs, &zags);
	ZigZags { zigs, zags }
}

/// Settings for [`FilePlugin`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
	/// Path or URL of a saved `zha/devices` response, fetched on every session start.
	#[serde(alias = "filePath")]
	pub file_path: Option<String>,
	/// Inline contents of a saved response, used when there is no `file_path`.
	pub json: String,
}

/// Where a [`FilePlugin`] reads its dump from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source<'a> {
	Path(&'a str),
	Inline(&'a str),
	Nothing,
}

impl FileSettings {
	fn source(&self) -> Source<'_> {
		match self.file_path.as_deref().map(str::trim) {
			Some(path) if !path.is_empty() => Source::Path(path),
			_ if !self.json.trim().is_empty() => Source::Inline(&self.json),
			_ => Source::Nothing,
		}
	}
}

fn js_error(path: &str, e: JsValue) -> DataError {
	DataError::Fetch(format!("{path}: {e:?}"))
}

/// Fetches `path` relative to the page and returns the body as text.
async fn fetch_text(path: &str) -> Result<String, DataError> {
	let window = web_sys::window().ok_or_else(|| DataError::Fetch("no window to fetch from".into()))?;
	let response: Response = JsFuture::from(window.fetch_with_str(path))
		.await
		.and_then(|r| r.dyn_into())
		.map_err(|e| js_error(path, e))?;
	if !response.ok() {
		return Err(DataError::Fetch(format!(
			"{path}: HTTP {} {}",
			response.status(),
			response.status_text()
		)));
	}
	let body = response.text().map_err(|e| js_error(path, e))?;
	JsFuture::from(body)
		.await
		.map_err(|e| js_error(path, e))?
		.as_string()
		.ok_or_else(|| DataError::Fetch(format!("{path}: body is not text")))
}

/// Reads devices from a saved `zha/devices` response.
pub struct FilePlugin {
	settings: FileSettings,
}

impl FilePlugin {
	/// Registry id.
	pub const ID: &'static str = "file";

	/// A reader for the given settings.
	pub fn new(settings: FileSettings) -> Self {
		Self { settings }
	}
}

impl Plugin for FilePlugin {
	fn id(&self) -> &str {
		Self::ID
	}
}

impl DataPlugin for FilePlugin {
	fn fetch_data(&self) -> LocalBoxFuture<'_, Result<ZigZags, DataError>> {
		Box::pin(async move {
			let dump: ZhaDump = match self.settings.source() {
				Source::Path(path) => {
					debug!("fetching devices from {path}");
					serde_json::from_str(&fetch_text(path).await?)?
				}
				Source::Inline(json) => serde_json::from_str(json)?,
				Source::Nothing => {
					return Err(DataError::InvalidConfig(
						"neither `file_path` nor `json` is set".into(),
					));
				}
			};
			let data = map_devices(dump.result);
			info!("read {} zigs and {} zags", data.zigs.len(), data.zags.len());
			Ok(data)
		})
	}
}
