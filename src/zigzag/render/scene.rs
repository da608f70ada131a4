//! Retained scene shared by the render backends: what exists, where the camera is,
//! and what the pointer is doing to it.

use std::any::Any;

use super::{
	Container, IconHandle, LabelHandle, LinkHandle, NodeHandle, PointerInput, RenderEvent,
	RenderInfo, RenderPlugin, Theme, WidgetRef,
};
use crate::zigzag::model::Point;
use crate::zigzag::plugin::Plugin;

const MIN_ZOOM: f64 = 0.01;
const MAX_ZOOM: f64 = 10.0;
/// Pointer travel, in pixels, before a press on a node becomes a drag.
const CLICK_SLOP: f64 = 3.0;
const FIT_EASE: f64 = 0.2;

/// A node as last set through [`RenderPlugin`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
	/// World position of the center.
	pub position: Point,
	/// Hit and draw radius, in world units.
	pub radius: f64,
	/// Cylinder height; flat surfaces ignore it.
	pub height: f64,
	/// Theme key or CSS color.
	pub color: String,
	/// Owner, reported back in events.
	pub widget: WidgetRef,
	/// Icons attached to this node.
	pub icons: Vec<IconHandle>,
	/// Labels attached to this node.
	pub labels: Vec<LabelHandle>,
}

/// A link as last set through [`RenderPlugin`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLink {
	/// Source end.
	pub from: Point,
	/// Target end.
	pub to: Point,
	/// Half the line width, in world units.
	pub radius: f64,
	/// Theme key or CSS color.
	pub color: String,
	/// Owner.
	pub widget: WidgetRef,
	/// Labels placed along this link.
	pub labels: Vec<LabelHandle>,
}

/// A glyph attached to a node.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneIcon {
	/// The node it moves with.
	pub node: NodeHandle,
	/// From the node center.
	pub offset: Point,
	/// Half the glyph size, in world units.
	pub radius: f64,
	/// Looked up with [`icon::glyph`](super::icon::glyph).
	pub name: String,
	/// Theme key or CSS color.
	pub color: String,
	/// Hidden icons are kept but not drawn.
	pub visible: bool,
}

/// What a label is attached to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelAnchor {
	/// A node, at an offset from its center.
	Node(NodeHandle, Point),
	/// Fraction of the way along the link.
	Link(LinkHandle, f64),
}

/// A text label on a node or a link.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLabel {
	/// Where it sits.
	pub anchor: LabelAnchor,
	/// May span several lines.
	pub text: String,
	/// Font size in pixels at a 16px theme base.
	pub size: f64,
	/// Hidden labels are kept but not drawn.
	pub visible: bool,
}

/// Maps world space to container pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	/// World point at the middle of the view.
	pub center: Point,
	/// Screen pixels per world unit.
	pub zoom: f64,
	/// View size in pixels.
	pub size: Point,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			center: Point::ORIGIN,
			zoom: 1.0,
			size: Point::ORIGIN,
		}
	}
}

impl Camera {
	/// World point to container pixel.
	pub fn world_to_screen(&self, p: Point) -> Point {
		Point::flat(
			(p.x - self.center.x) * self.zoom + self.size.x / 2.0,
			(p.y - self.center.y) * self.zoom + self.size.y / 2.0,
		)
	}

	/// Container pixel to world point, on the `z = 0` plane.
	pub fn screen_to_world(&self, s: Point) -> Point {
		Point::flat(
			(s.x - self.size.x / 2.0) / self.zoom + self.center.x,
			(s.y - self.size.y / 2.0) / self.zoom + self.center.y,
		)
	}
}

#[derive(Clone, Copy, Debug)]
struct Drag {
	node: NodeHandle,
	start: Point,
	node_start: Point,
	moved: bool,
}

#[derive(Clone, Copy, Debug)]
struct Pan {
	start: Point,
	center_start: Point,
}

/// Everything a surface needs to draw a frame, plus pointer state.
#[derive(Debug, Default)]
pub struct Scene {
	/// Captured at `init`.
	pub theme: Theme,
	/// Current view.
	pub camera: Camera,
	nodes: Vec<SceneNode>,
	links: Vec<SceneLink>,
	icons: Vec<SceneIcon>,
	labels: Vec<SceneLabel>,
	fit: Option<(Point, f64)>,
	drag: Option<Drag>,
	pan: Option<Pan>,
	hovered: Option<NodeHandle>,
	events: Vec<RenderEvent>,
}

impl Scene {
	/// An empty scene for a view of `size` pixels.
	pub fn new(theme: Theme, size: Point) -> Self {
		Self {
			theme,
			camera: Camera {
				size,
				..Camera::default()
			},
			..Self::default()
		}
	}

	/// Every node, in creation order.
	pub fn nodes(&self) -> &[SceneNode] {
		&self.nodes
	}

	/// Every link, in creation order.
	pub fn links(&self) -> &[SceneLink] {
		&self.links
	}

	/// Looks up a node.
	pub fn node(&self, node: NodeHandle) -> Option<&SceneNode> {
		self.nodes.get(node.0)
	}

	/// Looks up a link.
	pub fn link(&self, link: LinkHandle) -> Option<&SceneLink> {
		self.links.get(link.0)
	}

	/// Looks up an icon.
	pub fn icon(&self, icon: IconHandle) -> Option<&SceneIcon> {
		self.icons.get(icon.0)
	}

	/// Looks up a label.
	pub fn label(&self, label: LabelHandle) -> Option<&SceneLabel> {
		self.labels.get(label.0)
	}

	/// The node under the pointer, if any.
	pub fn hovered(&self) -> Option<NodeHandle> {
		self.hovered
	}

	/// The camera target of a `zoom_to_fit` still being animated.
	pub fn fit_target(&self) -> Option<(Point, f64)> {
		self.fit
	}

	/// World position of a label, following its node or link.
	pub fn label_position(&self, label: &SceneLabel) -> Option<Point> {
		match label.anchor {
			LabelAnchor::Node(node, offset) => self.node(node).map(|n| {
				Point::new(
					n.position.x + offset.x,
					n.position.y + offset.y,
					n.position.z + offset.z,
				)
			}),
			LabelAnchor::Link(link, t) => self.link(link).map(|l| {
				Point::new(
					l.from.x + (l.to.x - l.from.x) * t,
					l.from.y + (l.to.y - l.from.y) * t,
					l.from.z + (l.to.z - l.from.z) * t,
				)
			}),
		}
	}

	/// Topmost node under a container pixel.
	pub fn node_at(&self, screen: Point) -> Option<NodeHandle> {
		let world = self.camera.screen_to_world(screen);
		// Last drawn wins, like the canvas paints them.
		self.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, n)| {
				(n.position.x - world.x).hypot(n.position.y - world.y) < n.radius
			})
			.map(|(i, _)| NodeHandle(i))
	}

	/// Turns raw pointer input into drags, pans, hover, zoom and queued events.
	pub fn pointer(&mut self, input: PointerInput) {
		match input {
			PointerInput::Down(at) => {
				if let Some(node) = self.node_at(at) {
					self.drag = Some(Drag {
						node,
						start: at,
						node_start: self.nodes[node.0].position,
						moved: false,
					});
				} else {
					self.pan = Some(Pan {
						start: at,
						center_start: self.camera.center,
					});
					self.fit = None;
				}
			}
			PointerInput::Move(at) => {
				let k = self.camera.zoom;
				if let Some(drag) = &mut self.drag {
					if drag.moved || (at.x - drag.start.x).hypot(at.y - drag.start.y) > CLICK_SLOP {
						drag.moved = true;
						let position = Point::new(
							drag.node_start.x + (at.x - drag.start.x) / k,
							drag.node_start.y + (at.y - drag.start.y) / k,
							drag.node_start.z,
						);
						if let Some(node) = self.nodes.get_mut(drag.node.0) {
							node.position = position;
							self.events.push(RenderEvent::Moved {
								widget: node.widget,
								position,
							});
						}
					}
				} else if let Some(pan) = self.pan {
					self.camera.center = Point::new(
						pan.center_start.x - (at.x - pan.start.x) / k,
						pan.center_start.y - (at.y - pan.start.y) / k,
						pan.center_start.z,
					);
				} else {
					let hit = self.node_at(at);
					self.set_hover(hit);
				}
			}
			PointerInput::Up(_) => {
				let clicked = self
					.drag
					.take()
					.filter(|drag| !drag.moved)
					.and_then(|drag| self.node(drag.node))
					.map(|node| node.widget);
				if let Some(widget) = clicked {
					self.events.push(RenderEvent::Clicked(widget));
				}
				self.pan = None;
			}
			PointerInput::Leave => {
				self.drag = None;
				self.pan = None;
				self.set_hover(None);
			}
			PointerInput::Wheel { at, delta } => {
				let factor = if delta > 0.0 { 0.9 } else { 1.1 };
				let zoom = (self.camera.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
				// Keep the world point under the cursor where it is.
				let world = self.camera.screen_to_world(at);
				self.camera.center = Point::flat(
					world.x - (at.x - self.camera.size.x / 2.0) / zoom,
					world.y - (at.y - self.camera.size.y / 2.0) / zoom,
				);
				self.camera.zoom = zoom;
				self.fit = None;
			}
		}
	}

	fn set_hover(&mut self, node: Option<NodeHandle>) {
		if self.hovered == node {
			return;
		}
		let widget = |h: NodeHandle| self.nodes.get(h.0).map(|n| n.widget);
		let off = self.hovered.and_then(widget);
		let on = node.and_then(widget);
		if let Some(old) = off {
			self.events.push(RenderEvent::HoverOff(old));
		}
		if let Some(new) = on {
			self.events.push(RenderEvent::HoverOn(new));
		}
		self.hovered = node;
	}

	/// Eases the camera towards a pending fit target.
	fn animate(&mut self) {
		let Some((center, zoom)) = self.fit else {
			return;
		};
		let camera = &mut self.camera;
		camera.center.x += (center.x - camera.center.x) * FIT_EASE;
		camera.center.y += (center.y - camera.center.y) * FIT_EASE;
		camera.zoom += (zoom - camera.zoom) * FIT_EASE;
		let close = (center.x - camera.center.x).hypot(center.y - camera.center.y) * camera.zoom
			< 0.5 && (zoom - camera.zoom).abs() < 1e-3;
		if close {
			camera.center = Point::new(center.x, center.y, camera.center.z);
			camera.zoom = zoom;
			self.fit = None;
		}
	}
}

/// Something a [`Scene`] can be drawn on.
pub trait Surface: Sized + 'static {
	/// Registry id of the render plugin built on this surface.
	const ID: &'static str;

	/// Binds to a container, or `None` when it is the wrong kind.
	fn attach(container: &dyn Container) -> Option<Self>;

	/// The container changed size.
	fn resize(&mut self, _size: Point) {}

	/// Releases whatever `attach` acquired.
	fn detach(&mut self) {}

	/// Draws a frame.
	fn draw(&mut self, scene: &Scene) -> RenderInfo;
}

/// Render plugin keeping a [`Scene`] and drawing it on a [`Surface`] each frame.
pub struct SceneRender<S> {
	scene: Scene,
	surface: Option<S>,
}

impl<S: Surface> SceneRender<S> {
	/// Registry id, taken from the surface.
	pub const ID: &'static str = S::ID;

	/// A plugin with nothing attached yet.
	pub fn new() -> Self {
		Self {
			scene: Scene::default(),
			surface: None,
		}
	}

	/// The retained scene.
	pub fn scene(&self) -> &Scene {
		&self.scene
	}
}

impl<S: Surface> Default for SceneRender<S> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: Surface> Plugin for SceneRender<S> {
	fn id(&self) -> &str {
		S::ID
	}
}

impl<S: Surface> RenderPlugin for SceneRender<S> {
	fn init(&mut self, container: &dyn Container, theme: &Theme) -> bool {
		let Some(surface) = S::attach(container) else {
			return false;
		};
		self.scene = Scene::new(theme.clone(), container.size());
		self.surface = Some(surface);
		true
	}

	fn dispose(&mut self) {
		if let Some(mut surface) = self.surface.take() {
			surface.detach();
		}
		self.scene = Scene::default();
	}

	fn add_node(
		&mut self,
		position: Point,
		radius: f64,
		height: f64,
		color: &str,
		widget: WidgetRef,
	) -> NodeHandle {
		self.scene.nodes.push(SceneNode {
			position,
			radius,
			height,
			color: color.to_owned(),
			widget,
			icons: Vec::new(),
			labels: Vec::new(),
		});
		NodeHandle(self.scene.nodes.len() - 1)
	}

	fn add_link(
		&mut self,
		from: Point,
		to: Point,
		radius: f64,
		color: &str,
		widget: WidgetRef,
	) -> LinkHandle {
		self.scene.links.push(SceneLink {
			from,
			to,
			radius,
			color: color.to_owned(),
			widget,
			labels: Vec::new(),
		});
		LinkHandle(self.scene.links.len() - 1)
	}

	fn add_node_icon(
		&mut self,
		node: NodeHandle,
		offset: Point,
		radius: f64,
		icon: &str,
		color: &str,
		visible: bool,
	) -> IconHandle {
		let handle = IconHandle(self.scene.icons.len());
		self.scene.icons.push(SceneIcon {
			node,
			offset,
			radius,
			name: icon.to_owned(),
			color: color.to_owned(),
			visible,
		});
		if let Some(n) = self.scene.nodes.get_mut(node.0) {
			n.icons.push(handle);
		}
		handle
	}

	fn add_node_label(
		&mut self,
		node: NodeHandle,
		offset: Point,
		text: &str,
		size: f64,
		visible: bool,
	) -> LabelHandle {
		let handle = LabelHandle(self.scene.labels.len());
		self.scene.labels.push(SceneLabel {
			anchor: LabelAnchor::Node(node, offset),
			text: text.to_owned(),
			size,
			visible,
		});
		if let Some(n) = self.scene.nodes.get_mut(node.0) {
			n.labels.push(handle);
		}
		handle
	}

	fn add_link_label(
		&mut self,
		link: LinkHandle,
		offset: f64,
		text: &str,
		size: f64,
		visible: bool,
	) -> LabelHandle {
		let handle = LabelHandle(self.scene.labels.len());
		self.scene.labels.push(SceneLabel {
			anchor: LabelAnchor::Link(link, offset),
			text: text.to_owned(),
			size,
			visible,
		});
		if let Some(l) = self.scene.links.get_mut(link.0) {
			l.labels.push(handle);
		}
		handle
	}

	fn set_node_position(&mut self, node: NodeHandle, position: Point) {
		if let Some(n) = self.scene.nodes.get_mut(node.0) {
			n.position = position;
		}
	}

	fn set_link_position(&mut self, link: LinkHandle, from: Point, to: Point) {
		if let Some(l) = self.scene.links.get_mut(link.0) {
			l.from = from;
			l.to = to;
		}
	}

	fn set_node_color(&mut self, node: NodeHandle, color: &str) {
		if let Some(n) = self.scene.nodes.get_mut(node.0) {
			n.color = color.to_owned();
		}
	}

	fn set_link_color(&mut self, link: LinkHandle, color: &str) {
		if let Some(l) = self.scene.links.get_mut(link.0) {
			l.color = color.to_owned();
		}
	}

	fn set_icon_color(&mut self, icon: IconHandle, color: &str) {
		if let Some(i) = self.scene.icons.get_mut(icon.0) {
			i.color = color.to_owned();
		}
	}

	fn set_label_text(&mut self, label: LabelHandle, text: &str) {
		if let Some(l) = self.scene.labels.get_mut(label.0) {
			l.text = text.to_owned();
		}
	}

	fn set_icon_visibility(&mut self, icon: IconHandle, visible: bool) {
		if let Some(i) = self.scene.icons.get_mut(icon.0) {
			i.visible = visible;
		}
	}

	fn set_label_visibility(&mut self, label: LabelHandle, visible: bool) {
		if let Some(l) = self.scene.labels.get_mut(label.0) {
			l.visible = visible;
		}
	}

	fn set_node_icon_offset(&mut self, icon: IconHandle, offset: Point) {
		if let Some(i) = self.scene.icons.get_mut(icon.0) {
			i.offset = offset;
		}
	}

	fn set_node_label_offset(&mut self, label: LabelHandle, offset: Point) {
		if let Some(l) = self.scene.labels.get_mut(label.0) {
			if let LabelAnchor::Node(node, _) = l.anchor {
				l.anchor = LabelAnchor::Node(node, offset);
			}
		}
	}

	fn set_link_label_offset(&mut self, label: LabelHandle, offset: f64) {
		if let Some(l) = self.scene.labels.get_mut(label.0) {
			if let LabelAnchor::Link(link, _) = l.anchor {
				l.anchor = LabelAnchor::Link(link, offset);
			}
		}
	}

	fn view_position(&self) -> Point {
		self.scene.camera.center
	}

	fn set_view_position(&mut self, center: Point) {
		self.scene.camera.center = center;
		self.scene.fit = None;
	}

	fn view_zoom(&self) -> f64 {
		self.scene.camera.zoom
	}

	fn set_view_zoom(&mut self, zoom: f64) {
		self.scene.camera.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
		self.scene.fit = None;
	}

	fn view_size(&self) -> Point {
		self.scene.camera.size
	}

	fn set_view_size(&mut self, size: Point) {
		self.scene.camera.size = size;
		if let Some(surface) = &mut self.surface {
			surface.resize(size);
		}
	}

	fn render(&mut self) -> Option<RenderInfo> {
		let surface = self.surface.as_mut()?;
		self.scene.animate();
		Some(surface.draw(&self.scene))
	}

	fn zoom_to_fit(&mut self, x: f64, y: f64, zoom: f64) {
		self.scene.fit = Some((Point::flat(x, y), zoom.clamp(MIN_ZOOM, MAX_ZOOM)));
	}

	fn to_world(&self, screen: Point) -> Point {
		self.scene.camera.screen_to_world(screen)
	}

	fn pointer(&mut self, input: PointerInput) {
		if self.surface.is_some() {
			self.scene.pointer(input);
		}
	}

	fn take_events(&mut self) -> Vec<RenderEvent> {
		std::mem::take(&mut self.scene.events)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Keeps the scene without drawing it anywhere.
#[derive(Debug)]
pub struct Headless;

impl Surface for Headless {
	const ID: &'static str = "headless";

	fn attach(_container: &dyn Container) -> Option<Self> {
		Some(Headless)
	}

	fn draw(&mut self, scene: &Scene) -> RenderInfo {
		let icons = scene.icons.iter().filter(|i| i.visible).count();
		let labels = scene.labels.iter().filter(|l| l.visible).count();
		RenderInfo {
			draw_calls: scene.nodes.len() + scene.links.len() + icons + labels,
		}
	}
}

/// The `headless` render plugin, for tests and hosts without a canvas.
pub type HeadlessRender = SceneRender<Headless>;

#[cfg(test)]
mod tests {
	use super::*;
	use crate::zigzag::render::FixedContainer;

	fn render() -> HeadlessRender {
		let mut render = HeadlessRender::new();
		assert!(render.init(&FixedContainer::new(800.0, 600.0), &Theme::default()));
		render
	}

	#[test]
	fn camera_round_trips_screen_points() {
		let camera = Camera {
			center: Point::flat(100.0, -50.0),
			zoom: 2.0,
			size: Point::flat(800.0, 600.0),
		};
		assert_eq!(camera.world_to_screen(Point::flat(100.0, -50.0)), Point::flat(400.0, 300.0));
		assert_eq!(camera.screen_to_world(Point::flat(420.0, 300.0)), Point::flat(110.0, -50.0));
	}

	#[test]
	fn press_and_release_on_a_node_is_a_click() {
		let mut render = render();
		render.add_node(Point::ORIGIN, 32.0, 32.0, "success_color", WidgetRef::Zig(7));
		render.pointer(PointerInput::Down(Point::flat(405.0, 300.0)));
		render.pointer(PointerInput::Up(Point::flat(405.0, 300.0)));
		assert_eq!(render.take_events(), vec![RenderEvent::Clicked(WidgetRef::Zig(7))]);
		assert!(render.take_events().is_empty());
	}

	#[test]
	fn dragging_a_node_reports_world_positions() {
		let mut render = render();
		render.set_view_zoom(2.0);
		let node = render.add_node(Point::ORIGIN, 32.0, 32.0, "success_color", WidgetRef::Zig(0));
		render.pointer(PointerInput::Down(Point::flat(400.0, 300.0)));
		render.pointer(PointerInput::Move(Point::flat(420.0, 310.0)));
		render.pointer(PointerInput::Up(Point::flat(420.0, 310.0)));

		let expected = Point::flat(10.0, 5.0);
		assert_eq!(
			render.take_events(),
			vec![RenderEvent::Moved {
				widget: WidgetRef::Zig(0),
				position: expected,
			}]
		);
		assert_eq!(render.scene().node(node).unwrap().position, expected);
	}

	#[test]
	fn dragging_the_background_pans() {
		let mut render = render();
		render.pointer(PointerInput::Down(Point::flat(100.0, 100.0)));
		render.pointer(PointerInput::Move(Point::flat(150.0, 80.0)));
		render.pointer(PointerInput::Up(Point::flat(150.0, 80.0)));
		assert_eq!(render.view_position(), Point::flat(-50.0, 20.0));
		assert!(render.take_events().is_empty());
	}

	#[test]
	fn hover_enters_and_leaves() {
		let mut render = render();
		render.add_node(Point::ORIGIN, 32.0, 32.0, "success_color", WidgetRef::Zig(3));
		render.pointer(PointerInput::Move(Point::flat(400.0, 300.0)));
		render.pointer(PointerInput::Move(Point::flat(410.0, 300.0)));
		render.pointer(PointerInput::Leave);
		assert_eq!(
			render.take_events(),
			vec![
				RenderEvent::HoverOn(WidgetRef::Zig(3)),
				RenderEvent::HoverOff(WidgetRef::Zig(3)),
			]
		);
	}

	#[test]
	fn wheel_zooms_around_the_cursor() {
		let mut render = render();
		let at = Point::flat(600.0, 200.0);
		let before = render.to_world(at);
		render.pointer(PointerInput::Wheel { at, delta: -1.0 });
		assert!((render.view_zoom() - 1.1).abs() < 1e-9);
		let after = render.to_world(at);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
	}

	#[test]
	fn zoom_to_fit_eases_into_place() {
		let mut render = render();
		render.zoom_to_fit(50.0, 50.0, 0.5);
		render.render();
		let halfway = render.view_position();
		assert!(halfway.x > 0.0 && halfway.x < 50.0);
		for _ in 0..200 {
			render.render();
		}
		assert_eq!(render.view_position(), Point::flat(50.0, 50.0));
		assert_eq!(render.view_zoom(), 0.5);
		assert!(render.scene().fit_target().is_none());
	}

	#[test]
	fn link_labels_follow_their_link() {
		let mut render = render();
		let link = render.add_link(
			Point::ORIGIN,
			Point::flat(100.0, 0.0),
			2.0,
			"warning_color",
			WidgetRef::Zag(0),
		);
		let label = render.add_link_label(link, 0.3, "Child LQI:50", 8.0, true);
		render.set_link_position(link, Point::ORIGIN, Point::flat(0.0, 200.0));
		let scene = render.scene();
		let position = scene.label_position(scene.label(label).unwrap()).unwrap();
		assert!((position.y - 60.0).abs() < 1e-9);
	}

	#[test]
	fn setters_update_the_scene() {
		let mut render = render();
		let node = render.add_node(Point::ORIGIN, 32.0, 32.0, "success_color", WidgetRef::Zig(0));
		let icon = render.add_node_icon(node, Point::ORIGIN, 16.0, "Router", "text_color", true);
		let label = render.add_node_label(node, Point::flat(0.0, 40.0), "kitchen", 12.0, true);

		render.set_node_color(node, "error_color");
		render.set_icon_color(icon, "primary_color");
		render.set_label_text(label, "hallway");
		render.set_node_icon_offset(icon, Point::flat(-20.0, -20.0));
		render.set_node_label_offset(label, Point::flat(0.0, -40.0));
		render.set_node_position(node, Point::flat(10.0, 10.0));

		let scene = render.scene();
		assert_eq!(scene.node(node).unwrap().color, "error_color");
		let scene_icon = scene.icon(icon).unwrap();
		assert_eq!(scene_icon.color, "primary_color");
		assert_eq!(scene_icon.offset, Point::flat(-20.0, -20.0));
		let scene_label = scene.label(label).unwrap();
		assert_eq!(scene_label.text, "hallway");
		assert_eq!(scene.label_position(scene_label), Some(Point::flat(10.0, -30.0)));
	}

	#[test]
	fn link_label_offsets_ignore_node_labels() {
		let mut render = render();
		let node = render.add_node(Point::ORIGIN, 32.0, 32.0, "success_color", WidgetRef::Zig(0));
		let label = render.add_node_label(node, Point::flat(0.0, 40.0), "kitchen", 12.0, true);
		render.set_link_label_offset(label, 0.5);
		let scene = render.scene();
		assert_eq!(
			scene.label_position(scene.label(label).unwrap()),
			Some(Point::flat(0.0, 40.0))
		);
	}

	#[test]
	fn dispose_forgets_everything() {
		let mut render = render();
		render.add_node(Point::ORIGIN, 32.0, 32.0, "success_color", WidgetRef::Zig(0));
		assert_eq!(render.render(), Some(RenderInfo { draw_calls: 1 }));
		render.dispose();
		assert!(render.scene().nodes().is_empty());
		assert_eq!(render.render(), None);
	}
}
