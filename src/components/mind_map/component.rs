//! Leptos component wrapping the mind map canvas.
//!
//! The component creates an HTML canvas plus a small toolbar and search box,
//! and wires mouse, wheel, and keyboard handlers into [`MindMapState`]. An
//! animation loop runs via `requestAnimationFrame`, advancing the focus and
//! highlight animations and redrawing each frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent,
	WheelEvent, Window,
};

use super::events::CanvasEvent;
use super::geometry::LineStyle;
use super::input::{Modifiers, Shortcut};
use super::render;
use super::settings::CanvasSettings;
use super::state::MindMapState;
use super::theme::Theme;
use super::types::{NodeColor, NodeId, NodePatch};

/// Bundles the mind map state with its visual configuration.
struct CanvasContext {
	state: MindMapState,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<CanvasContext>>>;

/// Values mirrored out of the state for the toolbar.
#[derive(Clone, Copy)]
struct UiSignals {
	zoom: RwSignal<i64>,
	selected: RwSignal<Option<NodeId>>,
	query: RwSignal<String>,
	results: RwSignal<(usize, Option<usize>)>,
	line_style: RwSignal<LineStyle>,
}

impl UiSignals {
	fn new() -> Self {
		Self {
			zoom: RwSignal::new(100),
			selected: RwSignal::new(None),
			query: RwSignal::new(String::new()),
			results: RwSignal::new((0, None)),
			line_style: RwSignal::new(LineStyle::default()),
		}
	}

	/// Only writes values that changed, so unchanged frames notify nothing.
	fn sync(&self, state: &MindMapState) {
		fn set_if_changed<T: PartialEq + Send + Sync + 'static>(signal: RwSignal<T>, value: T) {
			if signal.with_untracked(|v| *v != value) {
				signal.set(value);
			}
		}
		set_if_changed(self.zoom, state.viewport().zoom_percent());
		set_if_changed(self.selected, state.selected());
		set_if_changed(self.query, state.search().query().to_string());
		set_if_changed(
			self.results,
			(state.search().results().len(), state.search().current_index()),
		);
		set_if_changed(self.line_style, state.settings().line_style);
	}
}

fn with_state<R>(context: &SharedContext, f: impl FnOnce(&mut MindMapState) -> R) -> Option<R> {
	context.borrow_mut().as_mut().map(|c| f(&mut c.state))
}

fn now_seconds() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map_or(0.0, |p| p.now() / 1000.0)
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// True while a form field has keyboard focus.
fn is_typing() -> bool {
	web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.active_element())
		.is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
}

/// Asks the user before removing the selection and its subtree.
fn confirm_delete(context: &SharedContext) -> bool {
	let Some(message) = context
		.borrow()
		.as_ref()
		.and_then(|c| c.state.delete_confirmation())
	else {
		return false;
	};
	web_sys::window()
		.and_then(|w| w.confirm_with_message(&message).ok())
		.unwrap_or(false)
}

fn blur_active_element() {
	let active = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.active_element())
		.and_then(|el| el.dyn_into::<HtmlElement>().ok());
	if let Some(el) = active {
		let _ = el.blur();
	}
}

/// Renders an interactive mind map on a canvas element.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and resize automatically with the
/// window. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn MindMapCanvas(
	#[prop(into)] settings: Signal<CanvasSettings>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let search_ref = NodeRef::<leptos::html::Input>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let keydown_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let ui = UiSignals::new();
	let dirty = Rc::new(Cell::new(true));

	let (context_init, animate_init, resize_cb_init, keydown_cb_init, dirty_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		keydown_cb.clone(),
		dirty.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("mindmap: no window, canvas not started");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(obj)) => match obj.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("mindmap: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("mindmap: canvas has no 2d context");
				return;
			}
		};

		let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
		let mut state = MindMapState::new(settings.get_untracked(), w, h, seed);
		let dirty_events = dirty_init.clone();
		state.subscribe(move |event| {
			if let CanvasEvent::NodesRemoved(ids) = event {
				debug!("mindmap: {} node(s) removed", ids.len());
			}
			dirty_events.set(true);
		});
		info!("mindmap: canvas ready at {}x{}", w, h);

		*context_init.borrow_mut() = Some(CanvasContext {
			state,
			theme: Theme::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				with_state(&context_resize, |s| s.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let context_key = context_init.clone();
		*keydown_cb_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			let mods = Modifiers {
				ctrl: ev.ctrl_key() || ev.meta_key(),
				shift: ev.shift_key(),
				alt: ev.alt_key(),
			};
			let typing = is_typing();
			let Some(shortcut) = Shortcut::from_key(&ev.key(), mods, typing) else {
				return;
			};
			ev.prevent_default();
			if shortcut == Shortcut::DeleteSelected && !confirm_delete(&context_key) {
				return;
			}
			let handled = with_state(&context_key, |s| s.handle_shortcut(shortcut)).unwrap_or(true);
			if !handled {
				if let Some(input) = search_ref.get() {
					let _ = input.focus();
				}
			}
			if shortcut == Shortcut::Escape && typing {
				blur_active_element();
			}
		}));
		if let Some(ref cb) = *keydown_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner, dirty_anim) =
			(context_init.clone(), animate_init.clone(), dirty_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let now = now_seconds();
				c.state.tick(now);
				render::render(&c.state, &ctx, &c.theme, now);
				if dirty_anim.replace(false) {
					ui.sync(&c.state);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_settings = context.clone();
	Effect::new(move |_| {
		let next = settings.get();
		with_state(&context_settings, |s| {
			if *s.settings() != next {
				s.set_settings(next);
			}
		});
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		with_state(&context_md, |s| s.pointer_down(x, y));
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		with_state(&context_mm, |s| s.pointer_move(x, y));
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		with_state(&context_mu, |s| s.pointer_up());
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state(&context_ml, |s| s.pointer_leave());
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		with_state(&context_wh, |s| s.wheel(x, y, ev.delta_y()));
	};

	let context_dc = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let Some((id, current)) = with_state(&context_dc, |s| {
			let id = s.node_at_position(x, y)?;
			Some((id, s.store().node(id)?.content.clone()))
		})
		.flatten() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Ok(Some(text)) = window.prompt_with_message_and_default("Edit node", &current) {
			with_state(&context_dc, |s| s.update_node(id, NodePatch::content(text)));
		}
	};

	let context_add = context.clone();
	let on_add_main = move |_| {
		with_state(&context_add, |s| s.handle_shortcut(Shortcut::AddMainNode));
	};
	let context_child = context.clone();
	let on_add_child = move |_| {
		with_state(&context_child, |s| s.handle_shortcut(Shortcut::AddChild));
	};
	let context_del = context.clone();
	let on_delete = move |_| {
		if confirm_delete(&context_del) {
			with_state(&context_del, |s| s.remove_selected());
		}
	};
	let context_zo = context.clone();
	let on_zoom_out = move |_| {
		with_state(&context_zo, |s| s.zoom_out());
	};
	let context_zi = context.clone();
	let on_zoom_in = move |_| {
		with_state(&context_zi, |s| s.zoom_in());
	};
	let context_rv = context.clone();
	let on_reset = move |_| {
		with_state(&context_rv, |s| s.reset_view());
	};
	let context_clear = context.clone();
	let on_clear = move |_| {
		with_state(&context_clear, |s| s.clear_all());
	};
	let context_style = context.clone();
	let on_line_style = move |ev| {
		let Some(style) = event_target_value(&ev)
			.parse::<usize>()
			.ok()
			.and_then(|i| LineStyle::ALL.get(i).copied())
		else {
			return;
		};
		with_state(&context_style, |s| {
			let mut next = s.settings().clone();
			next.line_style = style;
			s.set_settings(next);
		});
		ui.line_style.set(style);
	};
	let context_search = context.clone();
	let on_search = move |ev| {
		let query = event_target_value(&ev);
		with_state(&context_search, |s| s.search_nodes(&query));
	};
	let context_prev = context.clone();
	let on_prev = move |_| {
		with_state(&context_prev, |s| s.navigate_to_result(-1));
	};
	let context_next = context.clone();
	let on_next = move |_| {
		with_state(&context_next, |s| s.navigate_to_result(1));
	};

	let color_buttons = NodeColor::ALL
		.into_iter()
		.map(|color| {
			let context_color = context.clone();
			let swatch = Theme::default().palette.get(color).to_css();
			view! {
				<button
					class="mind-map-swatch"
					title=color.label()
					style=format!("background: {swatch};")
					on:click=move |_| {
						with_state(&context_color, |s| {
							if let Some(id) = s.selected() {
								s.update_node(id, NodePatch::color(color));
							}
						});
					}
				/>
			}
		})
		.collect_view();

	let style_options = LineStyle::ALL
		.into_iter()
		.enumerate()
		.map(|(i, style)| {
			view! {
				<option value=i.to_string() selected=move || ui.line_style.get() == style>
					{style.label()}
				</option>
			}
		})
		.collect_view();

	let no_selection = move || ui.selected.get().is_none();
	let search_status = move || match ui.results.get() {
		(0, _) if ui.query.get().is_empty() => String::new(),
		(0, _) => "No results".to_string(),
		(n, Some(i)) => format!("{} of {}", i + 1, n),
		(n, None) => format!("{} results", n),
	};

	view! {
		<div class="mind-map">
			<canvas
				node_ref=canvas_ref
				class="mind-map-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style="display: block; cursor: grab;"
			/>
			<div class="mind-map-toolbar">
				<button on:click=on_add_main>"Add main idea"</button>
				<button on:click=on_add_child disabled=no_selection>"Add child"</button>
				<button on:click=on_delete disabled=no_selection>"Delete"</button>
				<span class="mind-map-colors" class:hidden=no_selection>{color_buttons}</span>
				<select on:change=on_line_style>{style_options}</select>
				<button on:click=on_zoom_out title="Zoom out">"-"</button>
				<span class="mind-map-zoom">{move || format!("{}%", ui.zoom.get())}</span>
				<button on:click=on_zoom_in title="Zoom in">"+"</button>
				<button on:click=on_reset title="Reset view">"Reset"</button>
				<button on:click=on_clear>"Clear all"</button>
			</div>
			<div class="mind-map-search">
				<input
					node_ref=search_ref
					type="search"
					placeholder="Search nodes (Ctrl+K)"
					prop:value=move || ui.query.get()
					on:input=on_search
				/>
				<span class="mind-map-search-status">{search_status}</span>
				<button on:click=on_prev title="Previous result">"<"</button>
				<button on:click=on_next title="Next result">">"</button>
			</div>
		</div>
	}
}
