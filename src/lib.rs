//! mindmap-canvas: Interactive mind map editor rendered on an HTML canvas.
//!
//! This crate provides a WASM-based mind map component with tree-aware node
//! layout, several connector styles, pan/zoom, search, and animated focus.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::mind_map::{
	CanvasEvent, CanvasSettings, GraphStore, LineStyle, MindMapCanvas, MindMapState, NodeColor,
	NodeId, NodeParams, NodePatch,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("mindmap: logging initialized");
}

/// Load canvas settings from a script element with id="mind-map-settings".
/// Missing fields keep their defaults; a malformed document is ignored.
fn load_settings() -> Option<CanvasSettings> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("mind-map-settings")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match CanvasSettings::from_json(&json_text) {
		Ok(settings) => {
			info!(
				"mindmap: loaded settings (line style {}, grid {})",
				settings.line_style.label(),
				settings.show_grid
			);
			Some(settings)
		}
		Err(e) => {
			warn!("mindmap: failed to parse settings: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads settings from the DOM and renders the mind map editor.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let settings = load_settings().unwrap_or_default();
	let settings_signal = Signal::derive(move || settings.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Mind Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-mind-map">
			<MindMapCanvas settings=settings_signal fullscreen=true />
			<div class="mind-map-overlay">
				<p class="subtitle">
					"N adds an idea, Tab adds a child. Drag nodes to move them, drag the background to pan, scroll to zoom. Double-click a node to edit it."
				</p>
			</div>
		</div>
	}
}
