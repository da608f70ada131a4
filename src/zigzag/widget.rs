//! Render widgets: the visible side of a zig or zag datum.
//!
//! Widgets only hold render handles. The datum they belong to is found by the
//! `WidgetRef` index the render plugin reports back with every event.

use std::f64::consts::PI;

use super::datum::{ZagDatum, ZigDatum};
use super::model::{Point, Zag, Zig};
use super::render::{
	IconHandle, LabelHandle, LinkHandle, NodeHandle, RenderPlugin, WidgetRef, icon,
};

/// Zig node radius, in world units.
pub const ZIG_RADIUS: f64 = 32.0;
/// Zig node height before the RSSI term.
pub const ZIG_HEIGHT: f64 = 32.0;
/// Zag link half width.
pub const ZAG_RADIUS: f64 = 2.0;

const LQI_THRESHOLD_LOWER: i32 = 100;
const LQI_THRESHOLD_UPPER: i32 = 200;

const MINI_ICON_SLOTS: usize = 10;
const POWER_SLOT: usize = 0;
const ENDPOINT_SLOTS: usize = 8;
const LOCK_SLOT: usize = 9;

/// Position of a mini icon around the rim of a zig, slot 0 at twelve o'clock.
fn slot_offset(slot: usize) -> Point {
	let angle = slot as f64 * 2.0 * PI / MINI_ICON_SLOTS as f64 - PI / 2.0;
	Point::flat(ZIG_RADIUS * angle.cos(), ZIG_RADIUS * angle.sin())
}

fn info_text(zig: &Zig) -> String {
	let endpoints = zig
		.endpoint_names
		.iter()
		.map(|e| e.name.as_str())
		.collect::<Vec<_>>()
		.join(", ");
	format!(
		"IEEE: {}\nEndpoints:\n[{}]\nLast Seen:\n{}",
		zig.ieee, endpoints, zig.last_seen
	)
}

/// Node, icons and labels drawn for one zig.
#[derive(Debug)]
pub struct ZigWidget {
	/// The node, colored by availability.
	pub node: NodeHandle,
	/// Shown while the zig is locked.
	pub lock_icon: IconHandle,
	/// Display name under the node.
	pub name_label: LabelHandle,
	/// Address, endpoints and last seen; shown on hover.
	pub info_label: LabelHandle,
}

impl ZigWidget {
	/// Creates everything for `zig_d` at its current position.
	pub fn new(render: &mut dyn RenderPlugin, zig_d: &ZigDatum) -> Self {
		let zig = &zig_d.zig;
		let height = ZIG_HEIGHT + f64::from(zig.rssi.unsigned_abs()) * 2.0;
		let color = if zig.available {
			"success_color"
		} else {
			"error_color"
		};
		let node = render.add_node(
			zig_d.position,
			ZIG_RADIUS,
			height,
			color,
			WidgetRef::Zig(zig_d.index),
		);

		render.add_node_icon(
			node,
			Point::ORIGIN,
			ZIG_RADIUS * 0.6,
			zig.device_type.as_str(),
			"text_primary_color",
			true,
		);
		let mini = ZIG_RADIUS / 4.0;
		if let Some(power) = &zig.power_source {
			render.add_node_icon(
				node,
				slot_offset(POWER_SLOT),
				mini,
				power,
				"state_icon_color",
				true,
			);
		}
		for (slot, endpoint) in (POWER_SLOT + 1..).zip(zig.endpoint_names.iter().take(ENDPOINT_SLOTS)) {
			render.add_node_icon(
				node,
				slot_offset(slot),
				mini,
				&endpoint.name,
				"state_icon_color",
				true,
			);
		}
		let lock_icon = render.add_node_icon(
			node,
			slot_offset(LOCK_SLOT),
			mini,
			icon::LOCK,
			"state_icon_color",
			zig_d.is_locked,
		);

		let name_label = render.add_node_label(
			node,
			Point::flat(0.0, ZIG_RADIUS + 4.0),
			zig.display_name(),
			12.0,
			true,
		);
		let info_label = render.add_node_label(
			node,
			Point::flat(ZIG_RADIUS + 8.0, -ZIG_RADIUS),
			&info_text(zig),
			10.0,
			false,
		);

		Self {
			node,
			lock_icon,
			name_label,
			info_label,
		}
	}

	/// Moves the node; icons and labels follow.
	pub fn set_position(&self, render: &mut dyn RenderPlugin, position: Point) {
		render.set_node_position(self.node, position);
	}

	/// The indicator is shown exactly while the zig is locked.
	pub fn set_locked(&self, render: &mut dyn RenderPlugin, locked: bool) {
		render.set_icon_visibility(self.lock_icon, locked);
	}

	/// Shows or hides the detail label.
	pub fn show_info(&self, render: &mut dyn RenderPlugin, visible: bool) {
		render.set_label_visibility(self.info_label, visible);
	}
}

/// LQI tier, deciding a zag's color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkQuality {
	/// Below 100.
	Low,
	/// 100 to 200 inclusive.
	Neutral,
	/// Above 200.
	High,
}

impl LinkQuality {
	/// Classifies an LQI.
	pub fn of(lqi: i32) -> Self {
		if lqi < LQI_THRESHOLD_LOWER {
			LinkQuality::Low
		} else if lqi > LQI_THRESHOLD_UPPER {
			LinkQuality::High
		} else {
			LinkQuality::Neutral
		}
	}

	/// Theme color key for the tier.
	pub fn color(self) -> &'static str {
		match self {
			LinkQuality::Low => "error_color",
			LinkQuality::Neutral => "warning_color",
			LinkQuality::High => "success_color",
		}
	}
}

fn zag_label(zag: &Zag) -> String {
	format!("{} LQI:{}", zag.relationship, zag.lqi)
}

/// Link and labels drawn for one zag datum.
#[derive(Debug)]
pub struct ZagWidget {
	/// The link, colored by the first observation's quality.
	pub link: LinkHandle,
	/// One per labelled observation, at 0.3 and 0.7 along the link.
	pub labels: Vec<LabelHandle>,
}

impl ZagWidget {
	const LABEL_OFFSETS: [f64; 2] = [0.3, 0.7];

	/// Creates the link between `from` and `to` and labels it.
	pub fn new(
		render: &mut dyn RenderPlugin,
		zag_d: &ZagDatum,
		index: usize,
		from: Point,
		to: Point,
	) -> Self {
		let link = render.add_link(
			from,
			to,
			ZAG_RADIUS,
			"background_secondary_color",
			WidgetRef::Zag(index),
		);
		if let Some(first) = zag_d.zags.first() {
			render.set_link_color(link, LinkQuality::of(first.lqi).color());
		}
		let labels = zag_d
			.zags
			.iter()
			.zip(Self::LABEL_OFFSETS)
			.map(|(zag, offset)| render.add_link_label(link, offset, &zag_label(zag), 8.0, true))
			.collect();
		Self { link, labels }
	}

	/// Follows the zigs at either end. Labels are anchored along the link and move with it.
	pub fn set_ends(&self, render: &mut dyn RenderPlugin, from: Point, to: Point) {
		render.set_link_position(self.link, from, to);
	}
}
