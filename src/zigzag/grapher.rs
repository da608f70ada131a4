//! The grapher owns one session: it builds the graph from a data plugin, keeps the
//! layout engine and the render widgets in step, and handles interaction.

use std::collections::HashSet;

use log::{debug, error, info, trace, warn};

use super::config::ZigzagConfig;
use super::data::{DataPlugin, ZigZags};
use super::datum::{Bounds, Graph};
use super::error::{PluginError, StartError, ViewStateError};
use super::layout::{LayoutLink, LayoutNode, LayoutPlugin};
use super::model::{Point, Zig};
use super::plugin::Registry;
use super::render::{Container, PointerInput, RenderEvent, RenderPlugin, Theme, WidgetRef};
use super::view_state::{GraphViewState, ZigPosition};
use super::widget::{ZIG_RADIUS, ZagWidget, ZigWidget};

/// Space kept around the graph by [`Grapher::zoom_to_fit`].
const FIT_MARGIN: f64 = ZIG_RADIUS * 5.0;

/// Where a [`Grapher`] is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
	/// Never started, or a start failed.
	#[default]
	Idle,
	/// Waiting on the data plugin.
	Starting,
	/// Widgets exist and frames advance the layout.
	Running,
	/// Torn down; `start` may run again.
	Stopped,
}

/// What one loop iteration did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInfo {
	/// Zigs moved by the layout engine.
	pub changed: usize,
	/// As reported by the render plugin.
	pub draw_calls: usize,
}

/// Camera target that shows a whole graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
	/// World point at the middle of the view.
	pub center: Point,
	/// Scale, screen pixels per world unit.
	pub zoom: f64,
}

/// Centers on `bounds` grown by the fit margin, at the largest zoom that still
/// shows both axes in a view of `size`.
pub fn fit_bounds(bounds: Bounds, size: Point) -> Fit {
	let width = bounds.max.x - bounds.min.x + FIT_MARGIN * 2.0;
	let height = bounds.max.y - bounds.min.y + FIT_MARGIN * 2.0;
	Fit {
		center: Point::new(
			(bounds.min.x + bounds.max.x) / 2.0,
			(bounds.min.y + bounds.max.y) / 2.0,
			(bounds.min.z + bounds.max.z) / 2.0,
		),
		zoom: (size.x / width).min(size.y / height),
	}
}

type SelectedCallback = Box<dyn FnMut(&Zig)>;

/// One graph session over a data, a layout and a render plugin.
pub struct Grapher {
	data: Box<dyn DataPlugin>,
	layout: Box<dyn LayoutPlugin>,
	render: Box<dyn RenderPlugin>,
	state: SessionState,
	graph: Graph,
	view_state: Option<GraphViewState>,
	on_zig_selected: Option<SelectedCallback>,
}

impl Grapher {
	/// An idle session over the given plugins.
	pub fn new(
		data: Box<dyn DataPlugin>,
		layout: Box<dyn LayoutPlugin>,
		render: Box<dyn RenderPlugin>,
	) -> Self {
		Self {
			data,
			layout,
			render,
			state: SessionState::Idle,
			graph: Graph::default(),
			view_state: None,
			on_zig_selected: None,
		}
	}

	/// Resolves the configured plugins one after the other.
	pub async fn from_config(
		config: &ZigzagConfig,
		registry: &Registry,
	) -> Result<Self, PluginError> {
		let data = registry.data(&config.data).await?;
		let layout = registry.layout(&config.layout).await?;
		let render = registry.render(&config.render).await?;
		Ok(Self::new(data, layout, render))
	}

	/// Current lifecycle state.
	pub fn state(&self) -> SessionState {
		self.state
	}

	/// True between a successful `start` and the next `stop`.
	pub fn is_running(&self) -> bool {
		self.state == SessionState::Running
	}

	/// The current datums.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// The render plugin, e.g. for downcasting through [`RenderPlugin::as_any`].
	pub fn render_plugin(&self) -> &dyn RenderPlugin {
		self.render.as_ref()
	}

	/// Raised with the full device record whenever a zig is clicked.
	pub fn on_zig_selected(&mut self, callback: impl FnMut(&Zig) + 'static) {
		self.on_zig_selected = Some(Box::new(callback));
	}

	/// Starts a session in `container`.
	///
	/// A failed data fetch leaves the session running with an empty graph. Data that
	/// breaks the graph's referential contract aborts the start.
	pub async fn start(&mut self, container: &dyn Container) -> Result<(), StartError> {
		if matches!(self.state, SessionState::Starting | SessionState::Running) {
			return Err(StartError::AlreadyRunning);
		}
		self.state = SessionState::Starting;

		let theme = Theme::capture(container);
		if !self.render.init(container, &theme) {
			error!("render plugin `{}` could not initialise", self.render.id());
			self.state = SessionState::Idle;
			return Err(StartError::RenderInit);
		}

		let ZigZags { zigs, zags } = match self.data.fetch_data().await {
			Ok(data) => data,
			Err(e) => {
				warn!("data plugin `{}` failed, starting empty: {e}", self.data.id());
				ZigZags::default()
			}
		};
		info!("fetched {} zigs and {} zags", zigs.len(), zags.len());

		self.graph = match Graph::build(zigs, zags) {
			Ok(graph) => graph,
			Err(e) => {
				error!("cannot build graph: {e}");
				self.render.dispose();
				self.state = SessionState::Idle;
				return Err(e.into());
			}
		};

		let nodes: Vec<LayoutNode> = self
			.graph
			.zigs
			.iter()
			.map(|zig_d| LayoutNode {
				index: zig_d.index,
				position: zig_d.position,
			})
			.collect();
		let links: Vec<LayoutLink> = self
			.graph
			.zags
			.iter()
			.map(|zag_d| LayoutLink {
				source: zag_d.source,
				target: zag_d.target,
			})
			.collect();
		self.layout.inject_nodes(&nodes);
		self.layout.inject_links(&links);

		self.create_widgets();
		if let Some(view_state) = self.view_state.clone() {
			self.apply_view_state(&view_state);
		}
		self.render.render();

		self.state = SessionState::Running;
		info!(
			"session running with {} zigs and {} zags",
			self.graph.zigs.len(),
			self.graph.zags.len()
		);
		Ok(())
	}

	fn create_widgets(&mut self) {
		for zig_d in &mut self.graph.zigs {
			zig_d.widget = Some(ZigWidget::new(self.render.as_mut(), zig_d));
		}
		let zigs = &self.graph.zigs;
		for (index, zag_d) in self.graph.zags.iter_mut().enumerate() {
			let (from, to) = (zigs[zag_d.source].position, zigs[zag_d.target].position);
			zag_d.widget = Some(ZagWidget::new(self.render.as_mut(), zag_d, index, from, to));
		}
	}

	fn apply_view_state(&mut self, view_state: &GraphViewState) {
		for entry in &view_state.zigs {
			match self.graph.index_of(&entry.ieee) {
				Some(index) => self.move_zig(index, entry.position),
				None => debug!("view state names {} which is no longer present", entry.ieee),
			}
		}
		self.render.set_view_position(view_state.position);
		self.render.set_view_zoom(view_state.zoom);
	}

	/// Ends the session. Safe to call at any time, any number of times.
	pub fn stop(&mut self) {
		if matches!(self.state, SessionState::Idle | SessionState::Stopped) {
			return;
		}
		self.layout.stop();
		self.render.dispose();
		self.graph = Graph::default();
		self.state = SessionState::Stopped;
		info!("session stopped");
	}

	/// One loop iteration: advance the layout, move what moved, draw.
	///
	/// Returns `None` once the session is no longer running, which is the host's cue
	/// to stop scheduling frames.
	pub fn frame(&mut self) -> Option<FrameInfo> {
		if !self.is_running() {
			return None;
		}

		let changed = if self.layout.is_stable() {
			Vec::new()
		} else {
			self.layout.step(1)
		};

		let mut dirty = HashSet::new();
		for node in &changed {
			let Some(zig_d) = self.graph.zigs.get_mut(node.index) else {
				continue;
			};
			zig_d.position = node.position;
			if let Some(widget) = &zig_d.widget {
				widget.set_position(self.render.as_mut(), node.position);
			}
			dirty.extend(zig_d.zag_ds.iter().copied());
		}
		for index in dirty {
			self.redraw_zag(index);
		}

		let draw_calls = self.render.render().map(|r| r.draw_calls).unwrap_or(0);
		self.dispatch_events();
		let info = FrameInfo {
			changed: changed.len(),
			draw_calls,
		};
		trace!("frame: {} changed, {} draw calls", info.changed, info.draw_calls);
		Some(info)
	}

	fn redraw_zag(&mut self, index: usize) {
		let Some(zag_d) = self.graph.zags.get(index) else {
			return;
		};
		let zigs = &self.graph.zigs;
		if let Some(widget) = &zag_d.widget {
			widget.set_ends(
				self.render.as_mut(),
				zigs[zag_d.source].position,
				zigs[zag_d.target].position,
			);
		}
	}

	/// Feeds host pointer input through the render plugin and handles whatever
	/// interaction results.
	pub fn pointer(&mut self, input: PointerInput) {
		if !self.is_running() {
			return;
		}
		self.render.pointer(input);
		self.dispatch_events();
	}

	fn dispatch_events(&mut self) {
		for event in self.render.take_events() {
			match event {
				RenderEvent::Moved {
					widget: WidgetRef::Zig(index),
					position,
				} => self.move_zig(index, position),
				RenderEvent::Clicked(WidgetRef::Zig(index)) => {
					if let (Some(callback), Some(zig_d)) =
						(self.on_zig_selected.as_mut(), self.graph.zigs.get(index))
					{
						callback(&zig_d.zig);
					}
				}
				RenderEvent::HoverOn(WidgetRef::Zig(index)) => self.show_info(index, true),
				RenderEvent::HoverOff(WidgetRef::Zig(index)) => self.show_info(index, false),
				_ => {}
			}
		}
	}

	fn show_info(&mut self, index: usize, visible: bool) {
		if let Some(widget) = self.graph.zigs.get(index).and_then(|z| z.widget.as_ref()) {
			widget.show_info(self.render.as_mut(), visible);
		}
	}

	/// Puts a zig at `position` and locks it there.
	pub fn move_zig(&mut self, index: usize, position: Point) {
		let Some(zig_d) = self.graph.zigs.get_mut(index) else {
			return;
		};
		zig_d.position = position;
		if let Some(widget) = &zig_d.widget {
			widget.set_position(self.render.as_mut(), position);
		}
		let zag_ds = zig_d.zag_ds.clone();
		self.lock_on(index);
		for zag in zag_ds {
			self.redraw_zag(zag);
		}
	}

	fn lock_on(&mut self, index: usize) {
		let Some(zig_d) = self.graph.zigs.get_mut(index) else {
			return;
		};
		zig_d.is_locked = true;
		if let Some(widget) = &zig_d.widget {
			widget.set_locked(self.render.as_mut(), true);
		}
		self.layout.lock_node(LayoutNode {
			index,
			position: zig_d.position,
		});
	}

	fn lock_off(&mut self, index: usize) {
		let Some(zig_d) = self.graph.zigs.get_mut(index) else {
			return;
		};
		zig_d.is_locked = false;
		if let Some(widget) = &zig_d.widget {
			widget.set_locked(self.render.as_mut(), false);
		}
		self.layout.unlock_node(index);
	}

	/// Locks a zig where it currently is. False when no such zig exists.
	pub fn lock(&mut self, ieee: &str) -> bool {
		let Some(index) = self.graph.index_of(ieee) else {
			return false;
		};
		self.lock_on(index);
		true
	}

	/// Hands a zig back to the layout engine. False when no such zig exists.
	pub fn unlock(&mut self, ieee: &str) -> bool {
		let Some(index) = self.graph.index_of(ieee) else {
			return false;
		};
		self.lock_off(index);
		true
	}

	/// Hands every locked zig back to the layout engine in one pass.
	pub fn unlock_all(&mut self) {
		let mut released = Vec::new();
		for (index, zig_d) in self.graph.zigs.iter_mut().enumerate() {
			if !zig_d.is_locked {
				continue;
			}
			zig_d.is_locked = false;
			if let Some(widget) = &zig_d.widget {
				widget.set_locked(self.render.as_mut(), false);
			}
			released.push(index);
		}
		self.layout.unlock_nodes(&released);
	}

	/// Unlocks everything and lays the graph out again from scratch.
	pub fn agitate(&mut self) {
		self.unlock_all();
		self.layout.reset();
	}

	/// Re-energises the layout where it stands, locks included.
	pub fn auto_layout(&mut self) {
		self.layout.restart();
	}

	/// Animates the camera so every zig is visible. `None` when there are no zigs.
	pub fn zoom_to_fit(&mut self) -> Option<Fit> {
		let fit = fit_bounds(self.graph.bounds()?, self.render.view_size());
		self.render.zoom_to_fit(fit.center.x, fit.center.y, fit.zoom);
		Some(fit)
	}

	/// Re-reads the container size after it changed.
	pub fn resize(&mut self, container: &dyn Container) {
		self.render.set_view_size(container.size());
	}

	/// Camera plus the position of every locked zig.
	pub fn get_view_state(&self) -> GraphViewState {
		GraphViewState {
			position: self.render.view_position(),
			zoom: self.render.view_zoom(),
			zigs: self
				.graph
				.zigs
				.iter()
				.filter(|zig_d| zig_d.is_locked)
				.map(|zig_d| ZigPosition {
					ieee: zig_d.zig.ieee.clone(),
					position: zig_d.position,
				})
				.collect(),
		}
	}

	/// [`get_view_state`](Self::get_view_state) as JSON.
	pub fn view_state_json(&self) -> Result<String, ViewStateError> {
		self.get_view_state().to_json()
	}

	/// Stores a persisted view state for the next [`start`](Self::start). Corrupt
	/// text is logged and ignored.
	pub fn set_view_state(&mut self, text: &str) {
		match GraphViewState::from_json(text) {
			Ok(view_state) => self.view_state = Some(view_state),
			Err(e) => error!("ignoring view state: {e}"),
		}
	}

	/// Stores an already decoded view state for the next `start`.
	pub fn set_view_state_value(&mut self, view_state: GraphViewState) {
		self.view_state = Some(view_state);
	}
}

impl Drop for Grapher {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::zigzag::data::GenPlugin;
	use crate::zigzag::error::{DataError, GraphError};
	use crate::zigzag::layout::{ForceLayout, ForceSettings};
	use crate::zigzag::model::{Relationship, Zag, ZigRole};
	use crate::zigzag::plugin::{LocalBoxFuture, Plugin, PluginConfig};
	use crate::zigzag::render::{CanvasRender, FixedContainer, HeadlessRender, icon};

	struct StaticData(Option<ZigZags>);

	impl Plugin for StaticData {
		fn id(&self) -> &str {
			"static"
		}
	}

	impl DataPlugin for StaticData {
		fn fetch_data(&self) -> LocalBoxFuture<'_, Result<ZigZags, DataError>> {
			let result = self.0.clone().ok_or_else(|| DataError::Fetch("offline".into()));
			Box::pin(async move { result })
		}
	}

	fn zig(ieee: &str) -> Zig {
		let mut zig = Zig::placeholder(ieee, ZigRole::Router, 200);
		zig.name = format!("router {ieee}");
		zig
	}

	fn zag(ieee: &str, from: &str, lqi: i32) -> Zag {
		Zag {
			ieee: ieee.into(),
			from: from.into(),
			lqi,
			rssi: None,
			relationship: Relationship::Child,
			device_type: ZigRole::Router,
		}
	}

	fn pair() -> ZigZags {
		ZigZags {
			zigs: vec![zig("A"), zig("B")],
			zags: vec![zag("A", "B", 50)],
		}
	}

	fn grapher(data: Option<ZigZags>) -> Grapher {
		Grapher::new(
			Box::new(StaticData(data)),
			Box::new(ForceLayout::new(ForceSettings::default())),
			Box::new(HeadlessRender::new()),
		)
	}

	fn container() -> FixedContainer {
		FixedContainer::new(800.0, 600.0)
	}

	fn headless(grapher: &Grapher) -> &HeadlessRender {
		grapher
			.render_plugin()
			.as_any()
			.downcast_ref::<HeadlessRender>()
			.unwrap()
	}

	fn screen_of(grapher: &Grapher, ieee: &str) -> Point {
		let position = grapher.graph().find(ieee).unwrap().position;
		headless(grapher).scene().camera.world_to_screen(position)
	}

	#[tokio::test]
	async fn start_builds_graph_and_widgets() {
		let mut grapher = grapher(Some(pair()));
		grapher.start(&container()).await.unwrap();

		assert_eq!(grapher.state(), SessionState::Running);
		let graph = grapher.graph();
		assert_eq!(graph.zigs.len(), 2);
		assert_eq!(graph.zags.len(), 1);
		assert!(graph.zigs.iter().all(|z| z.widget.is_some()));
		assert!(graph.zags[0].widget.is_some());

		let scene = headless(&grapher).scene();
		assert_eq!(scene.nodes().len(), 2);
		assert_eq!(scene.links().len(), 1);
		assert_eq!(scene.links()[0].color, "error_color");

		assert!(matches!(
			grapher.start(&container()).await,
			Err(StartError::AlreadyRunning)
		));
	}

	#[tokio::test]
	async fn fetch_failure_starts_empty() {
		let mut grapher = grapher(None);
		grapher.start(&container()).await.unwrap();
		assert!(grapher.is_running());
		assert!(grapher.graph().is_empty());
		assert_eq!(grapher.zoom_to_fit(), None);
		assert_eq!(grapher.frame(), Some(FrameInfo::default()));
	}

	#[tokio::test]
	async fn dangling_zag_aborts_start() {
		let mut grapher = grapher(Some(ZigZags {
			zigs: vec![zig("A")],
			zags: vec![zag("A", "Z", 10)],
		}));
		let err = grapher.start(&container()).await.unwrap_err();
		assert!(matches!(
			err,
			StartError::Inconsistent(GraphError::UnknownZig { .. })
		));
		assert_eq!(grapher.state(), SessionState::Idle);
		assert!(headless(&grapher).scene().nodes().is_empty());
		assert_eq!(grapher.frame(), None);
	}

	#[tokio::test]
	async fn render_init_failure_stays_idle() {
		let mut grapher = Grapher::new(
			Box::new(StaticData(Some(pair()))),
			Box::new(ForceLayout::new(ForceSettings::default())),
			Box::new(CanvasRender::new()),
		);
		assert!(matches!(
			grapher.start(&container()).await,
			Err(StartError::RenderInit)
		));
		assert_eq!(grapher.state(), SessionState::Idle);
	}

	#[tokio::test]
	async fn frames_move_zigs_and_their_zags() {
		let mut grapher = grapher(Some(pair()));
		grapher.start(&container()).await.unwrap();
		let info = grapher.frame().unwrap();
		assert_eq!(info.changed, 2);
		assert!(info.draw_calls > 0);

		let graph = grapher.graph();
		let scene = headless(&grapher).scene();
		let zag_d = &graph.zags[0];
		let link = scene.link(zag_d.widget.as_ref().unwrap().link).unwrap();
		assert_eq!(link.from, graph.zigs[zag_d.source].position);
		assert_eq!(link.to, graph.zigs[zag_d.target].position);
		for zig_d in &graph.zigs {
			let node = scene.node(zig_d.widget.as_ref().unwrap().node).unwrap();
			assert_eq!(node.position, zig_d.position);
		}
	}

	#[tokio::test]
	async fn dragging_locks_and_unlocking_releases() {
		let mut grapher = grapher(Some(pair()));
		grapher.start(&container()).await.unwrap();
		grapher.frame();

		let at = screen_of(&grapher, "A");
		grapher.pointer(PointerInput::Down(at));
		grapher.pointer(PointerInput::Move(Point::flat(at.x + 40.0, at.y)));
		grapher.pointer(PointerInput::Up(Point::flat(at.x + 40.0, at.y)));

		let a = grapher.graph().find("A").unwrap();
		assert!(a.is_locked);
		let lock_icon = a.widget.as_ref().unwrap().lock_icon;
		assert!(headless(&grapher).scene().icon(lock_icon).unwrap().visible);
		let position = a.position;

		let view_state = grapher.get_view_state();
		assert_eq!(
			view_state.zigs,
			vec![ZigPosition {
				ieee: "A".into(),
				position,
			}]
		);

		for _ in 0..5 {
			grapher.frame();
		}
		assert_eq!(grapher.graph().find("A").unwrap().position, position);

		assert!(grapher.unlock("A"));
		assert!(!grapher.unlock("nope"));
		assert!(grapher.get_view_state().zigs.is_empty());
		assert!(!headless(&grapher).scene().icon(lock_icon).unwrap().visible);
	}

	#[tokio::test]
	async fn unlock_all_releases_every_lock() {
		let mut grapher = grapher(Some(pair()));
		grapher.start(&container()).await.unwrap();
		let far = Point::flat(2000.0, 0.0);
		grapher.move_zig(grapher.graph().index_of("A").unwrap(), far);
		assert!(grapher.lock("B"));
		assert_eq!(grapher.get_view_state().zigs.len(), 2);

		grapher.unlock_all();
		assert!(grapher.get_view_state().zigs.is_empty());
		let scene = headless(&grapher).scene();
		for zig_d in &grapher.graph().zigs {
			let lock_icon = zig_d.widget.as_ref().unwrap().lock_icon;
			assert!(!scene.icon(lock_icon).unwrap().visible);
		}
		grapher.auto_layout();
		for _ in 0..5 {
			grapher.frame();
		}
		assert_ne!(grapher.graph().find("A").unwrap().position, far);
	}

	#[tokio::test]
	async fn view_state_is_restored_on_start() {
		let mut grapher = grapher(Some(pair()));
		grapher.set_view_state(
			r#"{"position":{"x":12,"y":-4,"z":0},"zoom":0.5,"zigs":[
				{"ieee":"B","position":{"x":300,"y":150,"z":0}},
				{"ieee":"gone","position":{"x":1,"y":1,"z":0}}
			]}"#,
		);
		grapher.start(&container()).await.unwrap();

		let b = grapher.graph().find("B").unwrap();
		assert!(b.is_locked);
		assert_eq!(b.position, Point::flat(300.0, 150.0));
		assert!(!grapher.graph().find("A").unwrap().is_locked);

		let view_state = grapher.get_view_state();
		assert_eq!(view_state.position, Point::flat(12.0, -4.0));
		assert_eq!(view_state.zoom, 0.5);
		assert_eq!(view_state.zigs.len(), 1);
		assert!(grapher.view_state_json().unwrap().contains("\"B\""));
	}

	#[tokio::test]
	async fn corrupt_view_state_is_ignored() {
		let mut grapher = grapher(Some(pair()));
		grapher.set_view_state("{not json");
		grapher.start(&container()).await.unwrap();
		assert!(grapher.is_running());
		assert!(grapher.get_view_state().zigs.is_empty());
		assert_eq!(grapher.get_view_state().zoom, 1.0);
	}

	#[tokio::test]
	async fn corrupt_view_state_keeps_the_last_good_one() {
		let mut grapher = grapher(Some(pair()));
		grapher.set_view_state(r#"{"position":{"x":5,"y":5,"z":0},"zoom":2,"zigs":[]}"#);
		grapher.set_view_state("[1, 2");
		grapher.start(&container()).await.unwrap();
		assert_eq!(grapher.get_view_state().zoom, 2.0);
		assert_eq!(grapher.get_view_state().position, Point::flat(5.0, 5.0));
	}

	#[tokio::test]
	async fn stop_is_idempotent_and_sessions_restart() {
		let mut grapher = grapher(Some(pair()));
		grapher.start(&container()).await.unwrap();
		grapher.stop();
		assert_eq!(grapher.state(), SessionState::Stopped);
		assert!(grapher.graph().zigs.is_empty());
		assert!(grapher.graph().zags.is_empty());
		grapher.stop();
		assert_eq!(grapher.state(), SessionState::Stopped);
		assert_eq!(grapher.frame(), None);

		grapher.start(&container()).await.unwrap();
		assert_eq!(grapher.graph().zigs.len(), 2);
		assert_eq!(headless(&grapher).scene().nodes().len(), 2);
		assert!(grapher.graph().zigs.iter().all(|z| !z.is_locked));
	}

	#[tokio::test]
	async fn zoom_to_fit_centers_on_the_graph() {
		let mut grapher = grapher(Some(pair()));
		grapher.set_view_state_value(GraphViewState {
			position: Point::ORIGIN,
			zoom: 1.0,
			zigs: vec![
				ZigPosition {
					ieee: "A".into(),
					position: Point::ORIGIN,
				},
				ZigPosition {
					ieee: "B".into(),
					position: Point::flat(100.0, 100.0),
				},
			],
		});
		grapher.start(&container()).await.unwrap();

		let fit = grapher.zoom_to_fit().unwrap();
		assert_eq!(fit.center, Point::flat(50.0, 50.0));
		// Both zigs land inside the view at the fitted zoom.
		assert!(100.0 * fit.zoom < 600.0);
		assert!((fit.zoom - 600.0 / (100.0 + FIT_MARGIN * 2.0)).abs() < 1e-9);

		for _ in 0..200 {
			grapher.frame();
		}
		let render = grapher.render_plugin();
		assert_eq!(render.view_position(), Point::flat(50.0, 50.0));
		assert!((render.view_zoom() - fit.zoom).abs() < 1e-9);
	}

	#[tokio::test]
	async fn click_selects_and_hover_shows_info() {
		let selected = Rc::new(RefCell::new(Vec::new()));
		let mut grapher = grapher(Some(pair()));
		let sink = selected.clone();
		grapher.on_zig_selected(move |zig| sink.borrow_mut().push(zig.ieee.clone()));
		grapher.start(&container()).await.unwrap();
		grapher.frame();

		let at = screen_of(&grapher, "B");
		grapher.pointer(PointerInput::Move(at));
		let info = grapher.graph().find("B").unwrap().widget.as_ref().unwrap().info_label;
		assert!(headless(&grapher).scene().label(info).unwrap().visible);

		grapher.pointer(PointerInput::Down(at));
		grapher.pointer(PointerInput::Up(at));
		assert_eq!(*selected.borrow(), vec!["B".to_owned()]);
		assert!(!grapher.graph().find("B").unwrap().is_locked);

		grapher.pointer(PointerInput::Leave);
		assert!(!headless(&grapher).scene().label(info).unwrap().visible);
	}

	#[tokio::test]
	async fn agitate_unlocks_and_auto_layout_reenergises() {
		let mut grapher = grapher(Some(pair()));
		grapher.start(&container()).await.unwrap();
		while grapher.frame().unwrap().changed > 0 || !grapher.layout.is_stable() {
			grapher.frame();
		}
		assert_eq!(grapher.frame().unwrap().changed, 0);

		grapher.auto_layout();
		assert!(!grapher.layout.is_stable());

		assert!(grapher.lock("A"));
		grapher.agitate();
		assert!(grapher.graph().zigs.iter().all(|z| !z.is_locked));
		assert_eq!(grapher.frame().unwrap().changed, 2);
	}

	#[tokio::test]
	async fn resolves_plugins_from_config() {
		let config = ZigzagConfig {
			data: PluginConfig::new(GenPlugin::ID).with("count", 12),
			layout: PluginConfig::new(ForceLayout::ID),
			render: PluginConfig::new(HeadlessRender::ID),
		};
		let mut grapher = Grapher::from_config(&config, &Registry::with_builtins())
			.await
			.unwrap();
		grapher.start(&container()).await.unwrap();
		assert!(grapher.graph().zigs.len() >= 12);
		let scene = headless(&grapher).scene();
		assert!(
			scene
				.nodes()
				.iter()
				.flat_map(|n| n.icons.iter())
				.any(|h| scene.icon(*h).unwrap().name == icon::LOCK)
		);

		grapher.resize(&FixedContainer::new(1024.0, 768.0));
		assert_eq!(grapher.render_plugin().view_size(), Point::flat(1024.0, 768.0));
	}
}
