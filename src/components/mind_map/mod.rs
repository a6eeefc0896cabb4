//! Mind map canvas component.
//!
//! Renders an editable mind map on an HTML canvas with:
//! - Tree-aware placement of main ideas and their children
//! - Cascade deletion of whole subtrees
//! - Pan, cursor-anchored zoom, and node dragging with optional grid snapping
//! - Several connector styles (straight, curved, bezier, zigzag, dashed)
//! - Case-insensitive search with an animated focus on each result
//!
//! # Example
//!
//! ```ignore
//! use mindmap_canvas::{CanvasSettings, MindMapCanvas};
//!
//! let settings = CanvasSettings::default();
//! view! { <MindMapCanvas settings=Signal::derive(move || settings.clone()) fullscreen=true /> }
//! ```
//!
//! The state layer ([`MindMapState`]) has no DOM dependency and can be driven
//! directly:
//!
//! ```ignore
//! let mut map = MindMapState::new(CanvasSettings::default(), 800.0, 600.0, 42);
//! let root = map.add_main_node();
//! let child = map.add_child_node(root);
//! map.search_nodes("idea");
//! map.tick(now);
//! ```

mod component;
pub mod events;
pub mod focus;
pub mod geometry;
pub mod highlight;
pub mod input;
mod render;
pub mod search;
pub mod settings;
pub mod state;
pub mod store;
pub mod theme;
pub mod types;
pub mod viewport;

pub use component::MindMapCanvas;
pub use events::{CanvasEvent, SubscriptionId};
pub use focus::TaskHandle;
pub use geometry::{Connector, ConnectorPath, LineStyle, PathCommand, build_connector_path};
pub use settings::CanvasSettings;
pub use state::MindMapState;
pub use store::{GraphStore, LayoutConfig};
pub use theme::Theme;
pub use types::{Connection, ConnectionId, Node, NodeColor, NodeId, NodeParams, NodePatch, Point};
pub use viewport::Viewport;
