//! Session configuration.

use serde::{Deserialize, Serialize};

use super::plugin::PluginConfig;

/// Selects the three plugins a session runs with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZigzagConfig {
	/// Where devices come from.
	pub data: PluginConfig,
	/// How they are placed.
	pub layout: PluginConfig,
	/// Where they are drawn.
	pub render: PluginConfig,
}

impl Default for ZigzagConfig {
	fn default() -> Self {
		Self {
			data: PluginConfig::new("gen").with("count", 60),
			layout: PluginConfig::new("force"),
			render: PluginConfig::new("canvas"),
		}
	}
}

impl ZigzagConfig {
	/// Parses a configuration document.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_json_config() {
		let config = ZigzagConfig::from_json(
			r#"{
				"data": {"api_version_required": "^1", "id": "file", "json": "{\"result\": []}"},
				"layout": {"api_version_required": "^1", "id": "force", "alpha_min": 0.05},
				"render": {"api_version_required": "^1", "id": "headless"}
			}"#,
		)
		.unwrap();
		assert_eq!(config.data.id, "file");
		assert_eq!(config.layout.settings["alpha_min"], 0.05);
		assert_eq!(config.render.id, "headless");
	}

	#[test]
	fn default_selects_builtins() {
		let config = ZigzagConfig::default();
		assert_eq!(config.data.id, "gen");
		assert_eq!(config.layout.id, "force");
		assert_eq!(config.render.id, "canvas");
	}
}
