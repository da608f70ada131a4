use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, Storage, WheelEvent, Window};

use crate::zigzag::render::{CanvasContainer, PointerInput};
use crate::zigzag::{Grapher, Point, Registry, Zig, ZigzagConfig};

/// Key the view state is persisted under in `localStorage`.
const VIEW_STATE_KEY: &str = "zigzag-graph-view-state";

/// Something the host asks a running graph to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphCommand {
	ZoomToFit,
	AutoLayout,
	Agitate,
	UnlockAll,
	SaveViewState,
	/// Stops the session and starts a fresh one from the same configuration.
	Reload,
}

type SharedGrapher = Rc<RefCell<Option<Grapher>>>;
type FrameLoop = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn local_storage() -> Option<Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

fn load_view_state() -> Option<String> {
	local_storage()?.get_item(VIEW_STATE_KEY).ok().flatten()
}

fn save_view_state(grapher: &Grapher) {
	let text = match grapher.view_state_json() {
		Ok(text) => text,
		Err(e) => {
			warn!("cannot serialise view state: {e}");
			return;
		}
	};
	match local_storage().map(|s| s.set_item(VIEW_STATE_KEY, &text)) {
		Some(Ok(())) => info!("view state saved"),
		_ => warn!("localStorage unavailable, view state not saved"),
	}
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::flat(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Sizes the canvas to the window or to its parent element.
fn fit_canvas(canvas: &HtmlCanvasElement, window: &Window, fullscreen: bool) {
	let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
	let (w, h) = if fullscreen {
		(
			inner(window.inner_width()).unwrap_or(800.0),
			inner(window.inner_height()).unwrap_or(600.0),
		)
	} else {
		canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.unwrap_or((800.0, 600.0))
	};
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
}

/// Requests a frame unless the loop is already scheduled.
fn schedule(frame_loop: &FrameLoop, looping: &Cell<bool>) {
	if looping.replace(true) {
		return;
	}
	let requested = web_sys::window().zip(frame_loop.borrow().as_ref().map(|cb| {
		let f: &js_sys::Function = cb.as_ref().unchecked_ref();
		f.clone()
	}));
	if let Some((window, cb)) = requested {
		let _ = window.request_animation_frame(&cb);
	} else {
		looping.set(false);
	}
}

/// Stops the running session, if any. Pending frames then find nothing to draw.
fn shut_down(shared: &SharedGrapher) {
	let grapher = shared.borrow_mut().take();
	if let Some(mut grapher) = grapher {
		grapher.stop();
	}
}

fn remove_resize_listener(resize_cb: &FrameLoop) {
	let Some(cb) = resize_cb.borrow_mut().take() else {
		return;
	};
	if let Some(window) = web_sys::window() {
		let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
}

/// Resolves plugins, restores the saved view state and starts a session.
fn launch(
	canvas: HtmlCanvasElement,
	config: ZigzagConfig,
	shared: SharedGrapher,
	frame_loop: FrameLoop,
	looping: Rc<Cell<bool>>,
	selected: WriteSignal<Option<Zig>>,
) {
	spawn_local(async move {
		let mut grapher = match Grapher::from_config(&config, &Registry::with_builtins()).await {
			Ok(grapher) => grapher,
			Err(e) => {
				error!("cannot resolve plugins: {e}");
				return;
			}
		};
		if let Some(text) = load_view_state() {
			grapher.set_view_state(&text);
		}
		grapher.on_zig_selected(move |zig| selected.set(Some(zig.clone())));

		let container = CanvasContainer::new(canvas);
		if let Err(e) = grapher.start(&container).await {
			error!("cannot start graph: {e}");
			return;
		}
		*shared.borrow_mut() = Some(grapher);
		schedule(&frame_loop, &looping);
	});
}

#[component]
pub fn ZigzagGraph(
	#[prop(default = ZigzagConfig::default())] config: ZigzagConfig,
	#[prop(into)] command: Signal<Option<GraphCommand>>,
	selected: WriteSignal<Option<Zig>>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let shared: SharedGrapher = Rc::new(RefCell::new(None));
	let frame_loop: FrameLoop = Rc::new(RefCell::new(None));
	let resize_cb: FrameLoop = Rc::new(RefCell::new(None));
	let looping = Rc::new(Cell::new(false));

	let teardown = StoredValue::new_local((shared.clone(), resize_cb.clone()));
	on_cleanup(move || {
		teardown.try_with_value(|(shared, resize_cb)| {
			remove_resize_listener(resize_cb);
			shut_down(shared);
		});
		info!("graph component torn down");
	});

	let (shared_init, loop_init, looping_init, config_init) =
		(shared.clone(), frame_loop.clone(), looping.clone(), config.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		fit_canvas(&canvas, &window, fullscreen);

		let (shared_resize, canvas_resize) = (shared_init.clone(), canvas.clone());
		remove_resize_listener(&resize_cb);
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			fit_canvas(&canvas_resize, &window, fullscreen);
			if let Some(grapher) = shared_resize.borrow_mut().as_mut() {
				grapher.resize(&CanvasContainer::new(canvas_resize.clone()));
			}
		}));
		if let Some(cb) = resize_cb.borrow().as_ref() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (shared_anim, loop_inner, looping_anim) =
			(shared_init.clone(), loop_init.clone(), looping_init.clone());
		*loop_init.borrow_mut() = Some(Closure::new(move || {
			let running = shared_anim
				.borrow_mut()
				.as_mut()
				.and_then(Grapher::frame)
				.is_some();
			if !running {
				looping_anim.set(false);
				return;
			}
			let Some(window) = web_sys::window() else {
				looping_anim.set(false);
				return;
			};
			if let Some(cb) = loop_inner.borrow().as_ref() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));

		launch(
			canvas,
			config_init.clone(),
			shared_init.clone(),
			loop_init.clone(),
			looping_init.clone(),
			selected,
		);
	});

	let (shared_cmd, loop_cmd, looping_cmd) = (shared.clone(), frame_loop.clone(), looping.clone());
	Effect::new(move |_| {
		let Some(command) = command.get() else {
			return;
		};
		if command == GraphCommand::Reload {
			shut_down(&shared_cmd);
			if let Some(canvas) = canvas_ref.get_untracked() {
				launch(
					canvas.into(),
					config.clone(),
					shared_cmd.clone(),
					loop_cmd.clone(),
					looping_cmd.clone(),
					selected,
				);
			}
			return;
		}
		let mut guard = shared_cmd.borrow_mut();
		let Some(grapher) = guard.as_mut() else {
			warn!("no running graph for {command:?}");
			return;
		};
		match command {
			GraphCommand::ZoomToFit => {
				grapher.zoom_to_fit();
			}
			GraphCommand::AutoLayout => grapher.auto_layout(),
			GraphCommand::Agitate => grapher.agitate(),
			GraphCommand::UnlockAll => grapher.unlock_all(),
			GraphCommand::SaveViewState => save_view_state(grapher),
			GraphCommand::Reload => {}
		}
		drop(guard);
		schedule(&loop_cmd, &looping_cmd);
	});

	let pointer = move |shared: &SharedGrapher, input: PointerInput| {
		if let Some(grapher) = shared.borrow_mut().as_mut() {
			grapher.pointer(input);
		}
	};
	let point = move |ev: &MouseEvent| -> Option<Point> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		Some(canvas_point(&canvas, ev))
	};

	let shared_md = shared.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(at) = point(&ev) {
			pointer(&shared_md, PointerInput::Down(at));
		}
	};
	let shared_mm = shared.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(at) = point(&ev) {
			pointer(&shared_mm, PointerInput::Move(at));
		}
	};
	let shared_mu = shared.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some(at) = point(&ev) {
			pointer(&shared_mu, PointerInput::Up(at));
		}
	};
	let shared_ml = shared.clone();
	let on_mouseleave = move |_: MouseEvent| pointer(&shared_ml, PointerInput::Leave);
	let shared_wh = shared;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(at) = point(&ev) {
			pointer(
				&shared_wh,
				PointerInput::Wheel {
					at,
					delta: ev.delta_y(),
				},
			);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="zigzag-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
