//! Icon names used by widgets and the glyphs the canvas backend draws for them.

/// Drawn for names with no glyph.
pub const HELP: &str = "?";

/// Icon name carried by the lock indicator.
pub const LOCK: &str = "Lock";

// Device roles, power sources, then endpoint device types as reported by ZHA.
const GLYPHS: &[(&str, &str)] = &[
	("Coordinator", "\u{2302}"),
	("Router", "\u{21c4}"),
	("EndDevice", "\u{25cf}"),
	("Mains", "\u{26a1}"),
	("Battery", "\u{1f50b}"),
	("DC Source", "\u{2393}"),
	("ON_OFF_LIGHT", "\u{1f4a1}"),
	("DIMMABLE_LIGHT", "\u{1f4a1}"),
	("COLOR_DIMMABLE_LIGHT", "\u{1f4a1}"),
	("COLOR_TEMPERATURE_LIGHT", "\u{1f4a1}"),
	("EXTENDED_COLOR_LIGHT", "\u{1f4a1}"),
	("ON_OFF_PLUG_IN_UNIT", "\u{1f50c}"),
	("SMART_PLUG", "\u{1f50c}"),
	("ON_OFF_LIGHT_SWITCH", "\u{1f39b}"),
	("ON_OFF_SWITCH", "\u{1f39b}"),
	("DIMMER_SWITCH", "\u{1f39b}"),
	("REMOTE_CONTROL", "\u{1f39b}"),
	("IAS_ZONE", "\u{1f6e1}"),
	("OCCUPANCY_SENSOR", "\u{1f441}"),
	("TEMPERATURE_SENSOR", "\u{1f321}"),
	("THERMOSTAT", "\u{1f321}"),
	("DOOR_LOCK", "\u{1f510}"),
	("WINDOW_COVERING_DEVICE", "\u{1fa9f}"),
	("GREEN_POWER", "\u{267b}"),
	(LOCK, "\u{1f512}"),
];

/// Glyph for an icon name, [`HELP`] when the name is not known.
pub fn glyph(name: &str) -> &'static str {
	GLYPHS
		.iter()
		.find(|(key, _)| key.eq_ignore_ascii_case(name))
		.map(|(_, glyph)| *glyph)
		.unwrap_or(HELP)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_and_unknown_names() {
		assert_eq!(glyph("Router"), "\u{21c4}");
		assert_eq!(glyph("battery"), "\u{1f50b}");
		assert_eq!(glyph(LOCK), "\u{1f512}");
		assert_eq!(glyph("Toaster"), HELP);
	}
}
