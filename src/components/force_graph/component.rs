//! Leptos component hosting the article graph canvas.
//!
//! Each time the snapshot or theme changes the previous renderer is torn down
//! (its node positions are kept for a warm start) and a new one is attached
//! after [`attach_delay`]. An animation loop then ticks the engine, drains its
//! events through the renderer, applies the resulting host effects and paints.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent};

use crate::common::{Collaborators, use_collaborators};

use super::engine::ForceEngine;
use super::lifecycle::{AttachGuard, FrameSlot};
use super::render;
use super::renderer::{GraphRenderer, HostEffect, attach_delay};
use super::theme::GraphTheme;
use super::tooltip::{NodeTooltip, TooltipAnchor, tooltip_anchor};
use super::types::{GraphData, NodePosition};

type FrameCallback = FrameSlot<Closure<dyn FnMut()>>;

/// A live renderer bound to a canvas.
struct GraphContext {
	renderer: GraphRenderer<ForceEngine>,
	ctx: CanvasRenderingContext2d,
	theme: GraphTheme,
	hovered: Option<usize>,
	guard: AttachGuard,
}

/// Interactive force-directed graph of the reader's articles.
///
/// Renders nothing until `graph` holds a snapshot. Hovering a node shows a
/// tooltip, clicking opens the article.
#[component]
pub fn GraphPage(
	#[prop(into)] graph: Signal<Option<GraphData>>,
	#[prop(into)] dark_mode: Signal<bool>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let render_done = RwSignal::new(false);
	let tooltip = RwSignal::new(None::<TooltipAnchor>);
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let positions: Rc<RefCell<HashMap<String, NodePosition>>> = Rc::default();
	let collaborators = use_collaborators();

	let context_init = context.clone();
	Effect::new(move |_| {
		let (Some(canvas), Some(container)) = (canvas_ref.get(), container_ref.get()) else {
			return;
		};
		let snapshot = graph.get();
		let dark = dark_mode.get();

		if let Some(mut previous) = context_init.borrow_mut().take() {
			previous.renderer.teardown();
			*positions.borrow_mut() = previous.renderer.engine().positions();
		}
		tooltip.set(None);

		let Some(snapshot) = snapshot else {
			return;
		};
		let snapshot = snapshot.with_positions(&positions.borrow());
		let delay = attach_delay(&snapshot);

		let guard = AttachGuard::default();
		let (context_attach, guard_attach, collaborators) =
			(context_init.clone(), guard.clone(), collaborators.clone());
		let canvas: HtmlCanvasElement = canvas.into();
		let container: HtmlElement = container.into();

		let handle = set_timeout_with_handle(
			move || {
				guard_attach.clone().run(move || {
					let (w, h) = container_size(&container);
					canvas.set_width(w as u32);
					canvas.set_height(h as u32);
					let Some(ctx) = canvas_context(&canvas) else {
						warn!("graph: canvas has no 2d context");
						return;
					};

					let mut renderer = GraphRenderer::new(ForceEngine::new(w, h));
					renderer.load(Some(snapshot));
					renderer.attach(dark, w, h);
					*context_attach.borrow_mut() = Some(GraphContext {
						renderer,
						ctx,
						theme: GraphTheme::for_mode(dark),
						hovered: None,
						guard: guard_attach.clone(),
					});
					start_animation(
						context_attach,
						guard_attach,
						container,
						collaborators,
						tooltip,
						render_done,
					);
				});
			},
			delay,
		)
		.map_err(|e| warn!("graph: failed to schedule layout: {:?}", e))
		.ok();

		on_cleanup(move || {
			guard.cancel();
			if let Some(handle) = handle {
				handle.clear();
			}
		});
	});

	let pointer = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(c) = context_md.borrow_mut().as_mut() {
			c.renderer.engine_mut().pointer_down(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(c) = context_mm.borrow_mut().as_mut() {
			c.renderer.engine_mut().pointer_move(x, y);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(c) = context_mu.borrow_mut().as_mut() {
			c.renderer.engine_mut().pointer_up();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(c) = context_ml.borrow_mut().as_mut() {
			c.renderer.engine_mut().pointer_leave();
		}
	};

	let context_wh = context;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(c) = context_wh.borrow_mut().as_mut() {
			c.renderer.engine_mut().wheel(x, y, ev.delta_y());
		}
	};

	view! {
		<div class="graph-page">
			<div
				node_ref=container_ref
				class=move || if render_done.get() { "graph render-done" } else { "graph" }
				style="cursor: move;"
			>
				<canvas
					node_ref=canvas_ref
					class="graph-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style="display: block;"
				/>
			</div>
			<NodeTooltip anchor=tooltip />
		</div>
	}
}

fn container_size(container: &HtmlElement) -> (f64, f64) {
	let (w, h) = (container.client_width(), container.client_height());
	(
		if w > 0 { w as f64 } else { 800.0 },
		if h > 0 { h as f64 } else { 600.0 },
	)
}

fn canvas_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn schedule_frame(frame: &FrameCallback) {
	if let Some(window) = web_sys::window() {
		let _ = frame.with(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()));
	}
}

fn start_animation(
	context: Rc<RefCell<Option<GraphContext>>>,
	guard: AttachGuard,
	container: HtmlElement,
	collaborators: Collaborators,
	tooltip: RwSignal<Option<TooltipAnchor>>,
	render_done: RwSignal<bool>,
) {
	let frame = FrameCallback::default();
	let frame_inner = frame.clone();

	frame.set(Closure::new(move || {
		if !guard.is_live() {
			// Unmounted: release the renderer unless a newer one replaced it,
			// then this closure, which is freed once it returns.
			{
				let mut slot = context.borrow_mut();
				if slot.as_ref().is_some_and(|c| c.guard.same_cycle(&guard)) {
					if let Some(mut c) = slot.take() {
						c.renderer.teardown();
					}
				}
			}
			frame_inner.release();
			return;
		}

		let effects = {
			let mut slot = context.borrow_mut();
			let Some(c) = slot.as_mut() else {
				frame_inner.release();
				return;
			};
			c.renderer.engine_mut().tick(js_sys::Date::now());
			let effects = c.renderer.pump();
			for effect in &effects {
				if let HostEffect::Hover(hovered) = effect {
					c.hovered = hovered.as_ref().map(|(i, _)| *i);
				}
			}

			let anchor = c.hovered.and_then(|i| {
				let node = c.renderer.node(i)?;
				tooltip_anchor(c.renderer.engine(), i, node)
			});
			if tooltip.get_untracked() != anchor {
				tooltip.set(anchor);
			}

			render::render(c.renderer.engine(), &c.ctx, &c.theme);
			effects
		};

		for effect in effects {
			apply_effect(effect, &container, &collaborators, render_done);
		}
		schedule_frame(&frame_inner);
	}));
	schedule_frame(&frame);
}

fn apply_effect(
	effect: HostEffect,
	container: &HtmlElement,
	collaborators: &Collaborators,
	render_done: RwSignal<bool>,
) {
	match effect {
		// the frame loop re-projects the tooltip every frame
		HostEffect::Hover(_) => {}
		HostEffect::SetCursor(cursor) => {
			let _ = container.style().set_property("cursor", cursor.as_css());
		}
		HostEffect::OpenArticle(url) => collaborators.navigator.open_article(&url),
		HostEffect::ReportEvent { name, properties } => {
			collaborators.reporter.report_event(name, properties)
		}
		HostEffect::RenderDone => render_done.set(true),
	}
}
