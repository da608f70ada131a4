//! Render plugins turn node/link/icon/label operations into something visible.

mod canvas;
pub mod icon;
mod scene;

use std::any::Any;
use std::collections::HashMap;

pub use canvas::{CanvasContainer, CanvasRender, CanvasSurface};
pub use scene::{
	Camera, Headless, HeadlessRender, LabelAnchor, Scene, SceneIcon, SceneLabel, SceneLink,
	SceneNode, SceneRender, Surface,
};

use super::model::Point;
use super::plugin::Plugin;

/// A node created by [`RenderPlugin::add_node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub usize);

/// A link created by [`RenderPlugin::add_link`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkHandle(pub usize);

/// An icon created by [`RenderPlugin::add_node_icon`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IconHandle(pub usize);

/// A label on a node or a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LabelHandle(pub usize);

/// Which widget a node or link belongs to, by datum index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetRef {
	/// Index into the zig datums.
	Zig(usize),
	/// Index into the zag datums.
	Zag(usize),
}

/// User interaction reported back by a render plugin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderEvent {
	/// A node was dragged and released.
	Moved {
		/// The node's widget.
		widget: WidgetRef,
		/// Where it was dropped, in world space.
		position: Point,
	},
	/// Press and release without a drag.
	Clicked(WidgetRef),
	/// The pointer entered a node.
	HoverOn(WidgetRef),
	/// The pointer left the hovered node.
	HoverOff(WidgetRef),
}

/// Raw pointer input from the host, in container pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
	/// Button pressed.
	Down(Point),
	/// Pointer moved, pressed or not.
	Move(Point),
	/// Button released.
	Up(Point),
	/// Pointer left the container.
	Leave,
	/// Scroll wheel over the container.
	Wheel {
		/// Cursor position.
		at: Point,
		/// Negative zooms in.
		delta: f64,
	},
}

/// What one [`RenderPlugin::render`] call drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderInfo {
	/// Nodes, links, visible icons and visible labels drawn.
	pub draw_calls: usize,
}

/// The element a session is hosted in.
pub trait Container {
	/// Width and height in pixels (`z` unused).
	fn size(&self) -> Point;

	/// Value of a CSS custom property, when the host has one.
	fn style_value(&self, _property: &str) -> Option<String> {
		None
	}

	/// For render plugins that need the concrete container.
	fn as_any(&self) -> &dyn Any;
}

/// A container of fixed size, for hosts without a DOM.
#[derive(Clone, Debug, Default)]
pub struct FixedContainer {
	/// Width and height.
	pub size: Point,
	/// CSS custom properties, by name including the leading `--`.
	pub styles: HashMap<String, String>,
}

impl FixedContainer {
	/// A container with no styles.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			size: Point::flat(width, height),
			styles: HashMap::new(),
		}
	}
}

impl Container for FixedContainer {
	fn size(&self) -> Point {
		self.size
	}

	fn style_value(&self, property: &str) -> Option<String> {
		self.styles.get(property).cloned()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

// (theme key, CSS custom property, fallback)
const COLORS: &[(&str, &str, &str)] = &[
	("state_icon_color", "--state-icon-color", "#bcbd22"),
	("success_color", "--success-color", "#2ca02c"),
	("warning_color", "--warning-color", "#ff7f0e"),
	("error_color", "--error-color", "#d62728"),
	("background_primary_color", "--primary-background-color", "#1a1a2e"),
	("background_secondary_color", "--secondary-background-color", "#64b4ff"),
	("text_primary_color", "--primary-text-color", "#ffffff"),
	("text_secondary_color", "--secondary-text-color", "#7f7f7f"),
];

const BASE_FONT_SIZE: f64 = 16.0;

const FONTS: &[(&str, &str, &str)] = &[
	("family", "--paper-font-common-base_-_font-family", "sans-serif"),
	("size", "--paper-font-subhead_-_font-size", "16px"),
];

/// Colors and fonts, keyed by theme name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Theme {
	/// Resolved colors, e.g. `success_color`.
	pub colors: HashMap<String, String>,
	/// `family` and `size`.
	pub fonts: HashMap<String, String>,
}

impl Theme {
	/// Reads the theme from the container's CSS custom properties.
	pub fn capture(container: &dyn Container) -> Self {
		let read = |table: &[(&str, &str, &str)]| {
			table
				.iter()
				.map(|(key, property, fallback)| {
					let value = container
						.style_value(property)
						.map(|v| v.trim().to_owned())
						.filter(|v| !v.is_empty())
						.unwrap_or_else(|| (*fallback).to_owned());
					((*key).to_owned(), value)
				})
				.collect::<HashMap<String, String>>()
		};
		Self {
			colors: read(COLORS),
			fonts: read(FONTS),
		}
	}

	/// Resolves a theme color name; anything else is taken as a literal color.
	pub fn color<'a>(&'a self, key: &'a str) -> &'a str {
		self.colors.get(key).map(String::as_str).unwrap_or(key)
	}

	/// CSS font family for labels and glyphs.
	pub fn font_family(&self) -> &str {
		self.fonts.get("family").map(String::as_str).unwrap_or("sans-serif")
	}

	/// Base font size in pixels. Anything but a plain `px` length reads as 16.
	pub fn font_size(&self) -> f64 {
		self.fonts
			.get("size")
			.and_then(|v| v.trim().strip_suffix("px"))
			.and_then(|v| v.trim().parse::<f64>().ok())
			.filter(|v| *v > 0.0)
			.unwrap_or(BASE_FONT_SIZE)
	}

	/// Scales a label size designed for a 16px base to the theme's base size.
	pub fn label_size(&self, size: f64) -> f64 {
		size * self.font_size() / BASE_FONT_SIZE
	}
}

/// A retained-mode drawing backend. Handles stay valid until `dispose`.
pub trait RenderPlugin: Plugin {
	/// Binds to the container. Returns false when this backend cannot use it.
	fn init(&mut self, container: &dyn Container, theme: &Theme) -> bool;

	/// Releases everything created since `init`.
	fn dispose(&mut self);

	/// A cylinder of `radius` and `height`, or a disc on flat surfaces.
	fn add_node(
		&mut self,
		position: Point,
		radius: f64,
		height: f64,
		color: &str,
		widget: WidgetRef,
	) -> NodeHandle;

	/// A line between two world points.
	fn add_link(
		&mut self,
		from: Point,
		to: Point,
		radius: f64,
		color: &str,
		widget: WidgetRef,
	) -> LinkHandle;

	/// A named glyph that moves with its node.
	fn add_node_icon(
		&mut self,
		node: NodeHandle,
		offset: Point,
		radius: f64,
		icon: &str,
		color: &str,
		visible: bool,
	) -> IconHandle;

	/// Text that moves with its node; `size` is in pixels at a 16px base.
	fn add_node_label(
		&mut self,
		node: NodeHandle,
		offset: Point,
		text: &str,
		size: f64,
		visible: bool,
	) -> LabelHandle;

	/// `offset` is the fraction of the way along the link, from its source.
	fn add_link_label(
		&mut self,
		link: LinkHandle,
		offset: f64,
		text: &str,
		size: f64,
		visible: bool,
	) -> LabelHandle;

	/// Moves a node; its icons and labels follow.
	fn set_node_position(&mut self, node: NodeHandle, position: Point);
	/// Moves both ends of a link; its labels follow.
	fn set_link_position(&mut self, link: LinkHandle, from: Point, to: Point);
	/// Colors are theme keys or literal CSS colors.
	fn set_node_color(&mut self, node: NodeHandle, color: &str);
	/// Recolors a link.
	fn set_link_color(&mut self, link: LinkHandle, color: &str);
	/// Recolors an icon.
	fn set_icon_color(&mut self, icon: IconHandle, color: &str);
	/// Replaces a label's text; `\n` starts a new line.
	fn set_label_text(&mut self, label: LabelHandle, text: &str);
	/// Hidden icons are skipped when drawing.
	fn set_icon_visibility(&mut self, icon: IconHandle, visible: bool);
	/// Hidden labels are skipped when drawing.
	fn set_label_visibility(&mut self, label: LabelHandle, visible: bool);
	/// Offset from the node center, in world units.
	fn set_node_icon_offset(&mut self, icon: IconHandle, offset: Point);
	/// Offset from the node center, in world units.
	fn set_node_label_offset(&mut self, label: LabelHandle, offset: Point);
	/// Fraction of the way along the link. Node labels ignore it.
	fn set_link_label_offset(&mut self, label: LabelHandle, offset: f64);

	/// World point at the center of the view.
	fn view_position(&self) -> Point;
	/// Cancels any zoom-to-fit in flight.
	fn set_view_position(&mut self, center: Point);
	/// Screen pixels per world unit.
	fn view_zoom(&self) -> f64;
	/// Clamped to the backend's zoom range. Cancels any zoom-to-fit in flight.
	fn set_view_zoom(&mut self, zoom: f64);
	/// Container size in pixels.
	fn view_size(&self) -> Point;
	/// Called after the container was resized.
	fn set_view_size(&mut self, size: Point);

	/// Draws one frame. `None` when there is nothing to draw on.
	fn render(&mut self) -> Option<RenderInfo>;

	/// Moves the camera to center on `(x, y)` at `zoom`, possibly over several frames.
	fn zoom_to_fit(&mut self, x: f64, y: f64, zoom: f64);

	/// Converts a container pixel to a world point.
	fn to_world(&self, screen: Point) -> Point;

	/// Feeds host pointer input; resulting interaction shows up in `take_events`.
	fn pointer(&mut self, _input: PointerInput) {}

	/// Drains interaction since the last call, oldest first.
	fn take_events(&mut self) -> Vec<RenderEvent> {
		Vec::new()
	}

	/// For hosts and tests that need the concrete backend.
	fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn theme_prefers_container_styles() {
		let mut container = FixedContainer::new(800.0, 600.0);
		container
			.styles
			.insert("--success-color".into(), " #00ff00 ".into());
		container.styles.insert("--error-color".into(), "  ".into());
		let theme = Theme::capture(&container);

		assert_eq!(theme.color("success_color"), "#00ff00");
		assert_eq!(theme.color("error_color"), "#d62728");
		assert_eq!(theme.color("#123456"), "#123456");
		assert_eq!(theme.font_family(), "sans-serif");
		assert_eq!(theme.font_size(), 16.0);
		assert_eq!(theme.label_size(12.0), 12.0);
	}

	#[test]
	fn label_sizes_follow_the_theme_font_size() {
		let mut container = FixedContainer::new(800.0, 600.0);
		container
			.styles
			.insert("--paper-font-subhead_-_font-size".into(), "24px".into());
		let theme = Theme::capture(&container);
		assert_eq!(theme.font_size(), 24.0);
		assert_eq!(theme.label_size(8.0), 12.0);

		container
			.styles
			.insert("--paper-font-subhead_-_font-size".into(), "1.2em".into());
		assert_eq!(Theme::capture(&container).font_size(), 16.0);
	}
}
