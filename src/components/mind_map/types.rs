//! Core data structures for the mind map: nodes, derived connections, and the
//! parameter/patch types used to create and edit nodes.

use std::fmt;

use serde::Deserialize;

/// Content given to nodes created without a label.
pub const PLACEHOLDER_CONTENT: &str = "New Node";

/// Fixed node width in canvas units.
pub const NODE_WIDTH: f64 = 150.0;
/// Fixed node height in canvas units.
pub const NODE_HEIGHT: f64 = 50.0;

/// A point or offset in canvas or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Opaque node identifier. Ids are handed out in increasing order, so ordered
/// collections keyed by `NodeId` iterate in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
	pub(crate) const fn from_raw(raw: u64) -> Self {
		Self(raw)
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "n{}", self.0)
	}
}

/// Opaque connection identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
	pub(crate) const fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	pub(crate) const fn raw(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ConnectionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "c{}", self.0)
	}
}

/// Symbolic node color. The theme resolves each key to an actual color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
	#[default]
	Primary,
	Secondary,
	Success,
	Warning,
	Danger,
	Ai,
}

impl NodeColor {
	pub const ALL: [NodeColor; 6] = [
		NodeColor::Primary,
		NodeColor::Secondary,
		NodeColor::Success,
		NodeColor::Warning,
		NodeColor::Danger,
		NodeColor::Ai,
	];

	pub fn label(self) -> &'static str {
		match self {
			NodeColor::Primary => "Primary",
			NodeColor::Secondary => "Secondary",
			NodeColor::Success => "Success",
			NodeColor::Warning => "Warning",
			NodeColor::Danger => "Danger",
			NodeColor::Ai => "AI",
		}
	}

	/// Light fills need dark label text to stay readable.
	pub fn wants_dark_text(self) -> bool {
		matches!(self, NodeColor::Success | NodeColor::Warning | NodeColor::Ai)
	}
}

/// A labeled, draggable point of the mind map.
///
/// `x`/`y` is the top-left corner of the node box in canvas space.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub(crate) id: NodeId,
	pub x: f64,
	pub y: f64,
	pub content: String,
	pub color: NodeColor,
	pub(crate) parent_id: Option<NodeId>,
}

impl Node {
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// `None` for root (main) nodes.
	pub fn parent_id(&self) -> Option<NodeId> {
		self.parent_id
	}

	pub fn is_root(&self) -> bool {
		self.parent_id.is_none()
	}

	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	/// Visual center of the node box.
	pub fn center(&self) -> Point {
		Point::new(self.x + NODE_WIDTH / 2.0, self.y + NODE_HEIGHT / 2.0)
	}

	/// Whether a canvas-space point falls inside the node box.
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.x + NODE_WIDTH && p.y >= self.y && p.y <= self.y + NODE_HEIGHT
	}
}

/// Derived parent -> child edge. Never authored directly; the store creates and
/// removes connections alongside the nodes they join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
	pub(crate) id: ConnectionId,
	pub from: NodeId,
	pub to: NodeId,
}

impl Connection {
	pub fn id(&self) -> ConnectionId {
		self.id
	}
}

/// Parameters for [`GraphStore::add_node`](super::store::GraphStore::add_node).
#[derive(Clone, Debug, Default)]
pub struct NodeParams {
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub content: Option<String>,
	pub color: Option<NodeColor>,
	pub parent_id: Option<NodeId>,
}

impl NodeParams {
	pub fn root() -> Self {
		Self::default()
	}

	pub fn child_of(parent: NodeId) -> Self {
		Self {
			parent_id: Some(parent),
			..Self::default()
		}
	}

	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.x = Some(x);
		self.y = Some(y);
		self
	}

	pub fn content(mut self, content: impl Into<String>) -> Self {
		self.content = Some(content.into());
		self
	}

	pub fn color(mut self, color: NodeColor) -> Self {
		self.color = Some(color);
		self
	}
}

/// Partial update merged into an existing node. `None` fields are left alone.
#[derive(Clone, Debug, Default)]
pub struct NodePatch {
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub content: Option<String>,
	pub color: Option<NodeColor>,
}

impl NodePatch {
	pub fn content(content: impl Into<String>) -> Self {
		Self {
			content: Some(content.into()),
			..Self::default()
		}
	}

	pub fn color(color: NodeColor) -> Self {
		Self {
			color: Some(color),
			..Self::default()
		}
	}
}
