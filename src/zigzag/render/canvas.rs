//! The `canvas` render plugin: draws the scene on an HTML canvas 2D context.

use std::any::Any;
use std::f64::consts::PI;

use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, CssStyleDeclaration, HtmlCanvasElement};

use super::scene::{Scene, SceneRender, Surface};
use super::{Container, RenderInfo, icon};
use crate::zigzag::model::Point;

/// A canvas element hosting a session, with its computed style for theming.
pub struct CanvasContainer {
	canvas: HtmlCanvasElement,
	style: Option<CssStyleDeclaration>,
}

impl CanvasContainer {
	/// Wraps a canvas, reading its computed style once.
	pub fn new(canvas: HtmlCanvasElement) -> Self {
		let style = web_sys::window().and_then(|w| w.get_computed_style(&canvas).ok().flatten());
		Self { canvas, style }
	}
}

impl Container for CanvasContainer {
	fn size(&self) -> Point {
		Point::flat(self.canvas.width() as f64, self.canvas.height() as f64)
	}

	fn style_value(&self, property: &str) -> Option<String> {
		self.style.as_ref()?.get_property_value(property).ok()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Draws the scene on a 2D canvas context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
	const ID: &'static str = "canvas";

	fn attach(container: &dyn Container) -> Option<Self> {
		let Some(container) = container.as_any().downcast_ref::<CanvasContainer>() else {
			warn!("canvas render needs a canvas container");
			return None;
		};
		let ctx = container
			.canvas
			.get_context("2d")
			.ok()
			.flatten()?
			.dyn_into::<CanvasRenderingContext2d>()
			.ok()?;
		Some(Self {
			canvas: container.canvas.clone(),
			ctx,
		})
	}

	fn resize(&mut self, size: Point) {
		self.canvas.set_width(size.x as u32);
		self.canvas.set_height(size.y as u32);
	}

	fn detach(&mut self) {
		let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
		self.ctx.clear_rect(0.0, 0.0, w, h);
	}

	fn draw(&mut self, scene: &Scene) -> RenderInfo {
		let ctx = &self.ctx;
		let camera = scene.camera;
		let k = camera.zoom;
		let mut calls = 0;

		ctx.set_fill_style_str(scene.theme.color("background_primary_color"));
		ctx.fill_rect(0.0, 0.0, camera.size.x, camera.size.y);
		ctx.save();
		let _ = ctx.translate(
			camera.size.x / 2.0 - camera.center.x * k,
			camera.size.y / 2.0 - camera.center.y * k,
		);
		let _ = ctx.scale(k, k);

		for link in scene.links() {
			ctx.set_stroke_style_str(scene.theme.color(&link.color));
			ctx.set_line_width(link.radius);
			ctx.begin_path();
			ctx.move_to(link.from.x, link.from.y);
			ctx.line_to(link.to.x, link.to.y);
			ctx.stroke();
			calls += 1;
		}

		for (handle, node) in scene.nodes().iter().enumerate() {
			let Point { x, y, .. } = node.position;
			if scene.hovered().map(|h| h.0) == Some(handle) {
				calls += draw_glow(ctx, x, y, node.radius);
			}
			ctx.begin_path();
			let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(scene.theme.color(&node.color));
			ctx.fill();
			calls += 1;

			for icon in node.icons.iter().filter_map(|&h| scene.icon(h)) {
				if !icon.visible {
					continue;
				}
				ctx.set_fill_style_str(scene.theme.color(&icon.color));
				ctx.set_font(&format!("{}px {}", icon.radius * 2.0, scene.theme.font_family()));
				ctx.set_text_align("center");
				ctx.set_text_baseline("middle");
				let _ = ctx.fill_text(icon::glyph(&icon.name), x + icon.offset.x, y + icon.offset.y);
				calls += 1;
			}
		}

		ctx.set_fill_style_str(scene.theme.color("text_primary_color"));
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		for label in scene
			.nodes()
			.iter()
			.flat_map(|n| n.labels.iter())
			.chain(scene.links().iter().flat_map(|l| l.labels.iter()))
			.filter_map(|&h| scene.label(h))
			.filter(|l| l.visible)
		{
			let Some(at) = scene.label_position(label) else {
				continue;
			};
			let size = scene.theme.label_size(label.size);
			ctx.set_font(&format!("{size}px {}", scene.theme.font_family()));
			for (line, text) in label.text.lines().enumerate() {
				let _ = ctx.fill_text(text, at.x, at.y + line as f64 * size * 1.2);
			}
			calls += 1;
		}

		ctx.restore();
		RenderInfo { draw_calls: calls }
	}
}

fn draw_glow(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64) -> usize {
	let glow = radius * 1.8;
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow) else {
		return 0;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.35)");
	let _ = gradient.add_color_stop(0.6, "rgba(200, 220, 255, 0.1)");
	let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
	ctx.begin_path();
	let _ = ctx.arc(x, y, glow, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
	1
}

/// The `canvas` render plugin.
pub type CanvasRender = SceneRender<CanvasSurface>;
