//! Mind map state and interaction tracking.
//!
//! [`MindMapState`] is the single owner of the graph, the viewport, selection,
//! drag/pan progress, search, and the focus animation. UI event handlers call
//! into it synchronously; the frame loop calls [`MindMapState::tick`].

use log::{debug, info};

use super::events::{CanvasEvent, Observers, SubscriptionId};
use super::focus::{FOCUS_DURATION, FocusController, TaskHandle};
use super::geometry::{Connector, SeededJitter, build_connector_path};
use super::highlight::{Entrances, HoverHighlight, Pulse};
use super::input::Shortcut;
use super::search::SearchState;
use super::settings::CanvasSettings;
use super::store::GraphStore;
use super::types::{
	Connection, NODE_HEIGHT, NODE_WIDTH, Node, NodeId, NodeParams, NodePatch, Point,
};
use super::viewport::{Viewport, ZoomDirection};

/// Label given to nodes added with the "add main node" action.
pub const MAIN_NODE_CONTENT: &str = "Main Idea";

/// Longest frame delta fed to smoothing, so a backgrounded tab does not jump.
const MAX_FRAME_DT: f64 = 0.1;

/// Tracks an in-progress node drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<NodeId>,
	pub start: Point,
	pub node_start: Point,
}

/// Tracks an in-progress canvas pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start: Point,
	pub position_start: Point,
}

/// Core mind map state combining the graph with interaction and animation
/// tracking.
pub struct MindMapState {
	store: GraphStore,
	viewport: Viewport,
	settings: CanvasSettings,
	selected: Option<NodeId>,
	drag: DragState,
	pan: PanState,
	search: SearchState,
	focus: FocusController,
	hover: HoverHighlight,
	pulse: Option<Pulse>,
	entrances: Entrances,
	observers: Observers,
	jitter_seed: u64,
	last_tick: Option<f64>,
}

impl MindMapState {
	pub fn new(settings: CanvasSettings, width: f64, height: f64, jitter_seed: u64) -> Self {
		let mut focus = FocusController::default();
		focus.set_duration(Self::focus_duration(&settings));
		Self {
			store: GraphStore::new(settings.layout.clone()),
			viewport: Viewport::new(width, height),
			settings,
			selected: None,
			drag: DragState::default(),
			pan: PanState::default(),
			search: SearchState::default(),
			focus,
			hover: HoverHighlight::default(),
			pulse: None,
			entrances: Entrances::default(),
			observers: Observers::default(),
			jitter_seed,
			last_tick: None,
		}
	}

	fn focus_duration(settings: &CanvasSettings) -> f64 {
		if settings.animations_enabled {
			FOCUS_DURATION
		} else {
			0.0
		}
	}

	pub fn store(&self) -> &GraphStore {
		&self.store
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn settings(&self) -> &CanvasSettings {
		&self.settings
	}

	pub fn selected(&self) -> Option<NodeId> {
		self.selected
	}

	pub fn dragging(&self) -> Option<NodeId> {
		self.drag.node
	}

	pub fn is_panning(&self) -> bool {
		self.pan.active
	}

	pub fn search(&self) -> &SearchState {
		&self.search
	}

	pub fn is_focusing(&self) -> bool {
		self.focus.is_active()
	}

	pub fn subscribe(&mut self, callback: impl FnMut(&CanvasEvent) + 'static) -> SubscriptionId {
		self.observers.subscribe(callback)
	}

	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		self.observers.unsubscribe(id)
	}

	fn emit(&mut self, event: CanvasEvent) {
		self.observers.emit(event);
	}

	pub fn set_settings(&mut self, settings: CanvasSettings) {
		self.focus.set_duration(Self::focus_duration(&settings));
		self.store.set_layout(settings.layout.clone());
		if !settings.animations_enabled {
			self.pulse = None;
			self.entrances.clear();
		}
		self.settings = settings;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
		self.emit(CanvasEvent::ViewportChanged);
	}

	// Graph mutations

	/// Adds a node. Roots without explicit coordinates are centered in the
	/// viewport (or stacked below the lowest root); children are laid out
	/// relative to their parent.
	pub fn add_node(&mut self, mut params: NodeParams) -> NodeId {
		params.color = params.color.or(Some(self.settings.default_node_color));
		let center = self.viewport.canvas_center();
		let top_left = Point::new(center.x - NODE_WIDTH / 2.0, center.y - NODE_HEIGHT / 2.0);
		let id = self.store.add_node(params, top_left);
		if self.settings.animations_enabled {
			self.entrances.begin(id);
		}
		self.emit(CanvasEvent::NodeCreated(id));
		id
	}

	pub fn add_main_node(&mut self) -> NodeId {
		self.add_node(NodeParams::root().content(MAIN_NODE_CONTENT))
	}

	/// Adds a child under `parent`; `None` if the parent does not exist.
	pub fn add_child_node(&mut self, parent: NodeId) -> Option<NodeId> {
		if !self.store.contains(parent) {
			return None;
		}
		Some(self.add_node(NodeParams::child_of(parent)))
	}

	pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> bool {
		let found = self.store.update_node(id, patch);
		if found {
			self.emit(CanvasEvent::NodeUpdated(id));
		}
		found
	}

	pub fn update_node_position(&mut self, id: NodeId, x: f64, y: f64) -> bool {
		let found = self.store.update_node_position(id, x, y);
		if found {
			self.emit(CanvasEvent::NodeUpdated(id));
		}
		found
	}

	/// Removes `id` and its subtree, and forgets any interaction state that
	/// pointed into it.
	pub fn remove_node(&mut self, id: NodeId) -> Vec<NodeId> {
		let removed = self.store.remove_node(id);
		if removed.is_empty() {
			return removed;
		}

		if self.drag.node.is_some_and(|n| removed.contains(&n)) {
			self.drag = DragState::default();
		}
		if self.focus.target_node().is_some_and(|n| removed.contains(&n)) {
			self.focus.cancel_active();
		}
		if self.pulse.is_some_and(|p| removed.contains(&p.node)) {
			self.pulse = None;
		}
		self.hover.forget(&removed);
		self.entrances.forget(&removed);
		let had_results = !self.search.results().is_empty();
		self.search.prune(&removed);

		self.emit(CanvasEvent::NodesRemoved(removed.clone()));
		if self.selected.is_some_and(|n| removed.contains(&n)) {
			self.select_node(None);
		}
		if had_results {
			self.emit(CanvasEvent::SearchChanged);
		}
		removed
	}

	pub fn remove_selected(&mut self) -> Vec<NodeId> {
		match self.selected {
			Some(id) => self.remove_node(id),
			None => Vec::new(),
		}
	}

	/// Prompt text to show before removing the selection, or `None` when
	/// nothing is selected.
	pub fn delete_confirmation(&self) -> Option<String> {
		let id = self.selected?;
		let node = self.store.node(id)?;
		let below = self.store.descendants(id).len().saturating_sub(1);
		Some(match below {
			0 => format!("Delete \"{}\"?", node.content),
			1 => format!("Delete \"{}\" and 1 child node?", node.content),
			n => format!("Delete \"{}\" and {} child nodes?", node.content, n),
		})
	}

	/// Empties the graph and resets viewport, selection, and search.
	pub fn clear_all(&mut self) {
		self.store.clear_all();
		self.viewport.reset_view();
		self.focus.cancel_active();
		self.selected = None;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.search.clear();
		self.hover.clear();
		self.pulse = None;
		self.entrances.clear();
		info!("mindmap: cleared all nodes");
		self.emit(CanvasEvent::Cleared);
	}

	pub fn select_node(&mut self, id: Option<NodeId>) {
		let id = id.filter(|id| self.store.contains(*id));
		if self.selected != id {
			self.selected = id;
			self.emit(CanvasEvent::SelectionChanged(id));
		}
	}

	// Viewport

	pub fn zoom_in(&mut self) {
		self.focus.cancel_active();
		self.viewport.zoom_in();
		self.emit(CanvasEvent::ViewportChanged);
	}

	pub fn zoom_out(&mut self) {
		self.focus.cancel_active();
		self.viewport.zoom_out();
		self.emit(CanvasEvent::ViewportChanged);
	}

	pub fn reset_view(&mut self) {
		self.focus.cancel_active();
		self.viewport.reset_view();
		self.emit(CanvasEvent::ViewportChanged);
	}

	pub fn set_position(&mut self, position: Point) {
		self.viewport.set_position(position);
		self.emit(CanvasEvent::ViewportChanged);
	}

	// Pointer input

	/// Topmost node under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let p = self.viewport.screen_to_canvas(sx, sy);
		self.store.nodes().rev().find(|n| n.contains(p)).map(Node::id)
	}

	/// Starts a node drag when over a node, otherwise a pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let start = Point::new(sx, sy);
		match self.node_at_position(sx, sy) {
			Some(id) => {
				let node_start = self.store.node(id).map(Node::position).unwrap_or_default();
				self.drag = DragState {
					node: Some(id),
					start,
					node_start,
				};
				self.select_node(Some(id));
			}
			None => {
				self.focus.cancel_active();
				self.pan = PanState {
					active: true,
					start,
					position_start: self.viewport.position(),
				};
				self.select_node(None);
			}
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		let scale = self.viewport.scale();
		if let Some(id) = self.drag.node {
			let x = self.drag.node_start.x + (sx - self.drag.start.x) / scale;
			let y = self.drag.node_start.y + (sy - self.drag.start.y) / scale;
			let (x, y) = (self.settings.snap(x), self.settings.snap(y));
			self.update_node_position(id, x, y);
		} else if self.pan.active {
			let position = Point::new(
				self.pan.position_start.x + (sx - self.pan.start.x) / scale,
				self.pan.position_start.y + (sy - self.pan.start.y) / scale,
			);
			self.set_position(position);
		} else {
			let hovered = self.node_at_position(sx, sy);
			let neighbors = hovered.map(|id| self.store.neighbors(id)).unwrap_or_default();
			self.hover.set_hover(hovered, &neighbors);
		}
	}

	pub fn pointer_up(&mut self) {
		if let Some(id) = self.drag.node {
			debug!("mindmap: finished dragging {}", id);
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.hover.set_hover(None, &[]);
	}

	/// Zooms one step toward the pointer.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.focus.cancel_active();
		self.viewport
			.zoom_at(Point::new(sx, sy), ZoomDirection::from_wheel_delta(delta_y));
		self.emit(CanvasEvent::ViewportChanged);
	}

	// Focus and search

	/// Starts moving the viewport so the node is centered. `None` if the node
	/// does not exist.
	pub fn focus_on_node(&mut self, id: NodeId) -> Option<TaskHandle> {
		let center = self.store.node(id)?.center();
		let target = self.viewport.position_centering(center);
		Some(self.focus.start(id, &self.viewport, target))
	}

	pub fn search_nodes(&mut self, query: &str) -> Option<TaskHandle> {
		let first = self.search.search(query, &self.store);
		self.emit(CanvasEvent::SearchChanged);
		let id = first?;
		self.select_node(Some(id));
		self.focus_on_node(id)
	}

	/// Moves to the next (`1`) or previous (`-1`) result, wrapping around.
	pub fn navigate_to_result(&mut self, direction: isize) -> Option<TaskHandle> {
		let id = self.search.navigate(direction)?;
		self.emit(CanvasEvent::SearchChanged);
		self.select_node(Some(id));
		self.focus_on_node(id)
	}

	pub fn clear_search(&mut self) {
		self.search.clear();
		self.emit(CanvasEvent::SearchChanged);
	}

	/// Performs a keyboard action. Returns `false` for actions the host UI
	/// must handle itself (opening the search field).
	pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> bool {
		match shortcut {
			Shortcut::AddMainNode => {
				let id = self.add_main_node();
				self.select_node(Some(id));
			}
			Shortcut::AddChild => {
				let parent = self.selected;
				if let Some(id) = parent.and_then(|p| self.add_child_node(p)) {
					self.select_node(Some(id));
				}
			}
			Shortcut::DeleteSelected => {
				self.remove_selected();
			}
			Shortcut::NextResult => {
				self.navigate_to_result(1);
			}
			Shortcut::PreviousResult => {
				self.navigate_to_result(-1);
			}
			Shortcut::ZoomIn => self.zoom_in(),
			Shortcut::ZoomOut => self.zoom_out(),
			Shortcut::ResetView => self.reset_view(),
			Shortcut::Escape => {
				self.select_node(None);
				self.clear_search();
			}
			Shortcut::OpenSearch => return false,
		}
		true
	}

	// Frame loop

	/// Advances animations to `now` (seconds).
	pub fn tick(&mut self, now: f64) {
		let dt = self
			.last_tick
			.map_or(0.0, |last| (now - last).clamp(0.0, MAX_FRAME_DT));
		self.last_tick = Some(now);
		self.hover.tick(dt);
		self.entrances.tick(now);

		let was_focusing = self.focus.is_active();
		let completed = self.focus.tick(now, &mut self.viewport);
		if was_focusing {
			self.emit(CanvasEvent::ViewportChanged);
		}
		if let Some(id) = completed {
			if self.settings.animations_enabled {
				self.pulse = Some(Pulse::new(id, now));
			}
			self.emit(CanvasEvent::FocusCompleted(id));
		}
		if self.pulse.is_some_and(|p| p.is_finished(now)) {
			self.pulse = None;
		}
	}

	pub fn pulse_intensity(&self, id: NodeId, now: f64) -> f64 {
		match self.pulse {
			Some(p) if p.node == id => p.intensity(now),
			_ => 0.0,
		}
	}

	pub fn entrance_scale(&self, id: NodeId, now: f64) -> f64 {
		self.entrances.scale(id, now)
	}

	pub fn hover_intensity(&self, id: NodeId) -> f64 {
		self.hover.intensity(id)
	}

	pub fn hovered(&self) -> Option<NodeId> {
		self.hover.hovered()
	}

	// Rendering

	/// Every connection with its computed connector. Dangling connections are
	/// skipped.
	pub fn connectors(&self) -> Vec<(Connection, Connector)> {
		self.store
			.connections()
			.filter_map(|c| {
				let mut jitter = SeededJitter::for_connection(self.jitter_seed, c.id().raw());
				build_connector_path(
					self.store.node(c.from),
					self.store.node(c.to),
					self.settings.line_style,
					self.settings.line_thickness,
					self.settings.length_multiplier,
					&mut jitter,
				)
				.map(|conn| (*c, conn))
			})
			.collect()
	}
}

impl std::fmt::Debug for MindMapState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MindMapState")
			.field("nodes", &self.store.len())
			.field("viewport", &self.viewport)
			.field("selected", &self.selected)
			.field("focusing", &self.focus.is_active())
			.finish()
	}
}
