//! Node and connection storage with tree-aware layout and cascade deletion.
//!
//! The store is the only place nodes and connections are created or destroyed.
//! Connections are derived: one exists per `(parent, child)` pair and it lives
//! exactly as long as both endpoints do.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, warn};
use serde::Deserialize;

use super::types::{
	Connection, ConnectionId, Node, NodeId, NodeParams, NodePatch, PLACEHOLDER_CONTENT, Point,
};

/// Offsets used when placing new nodes automatically.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Horizontal distance from a parent to its children.
	pub child_offset_x: f64,
	/// Vertical distance between stacked siblings.
	pub sibling_spacing: f64,
	/// Vertical offset of the first child relative to its parent.
	pub sibling_offset_y: f64,
	/// Vertical distance between stacked root nodes.
	pub root_spacing: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			child_offset_x: 200.0,
			sibling_spacing: 80.0,
			sibling_offset_y: -40.0,
			root_spacing: 120.0,
		}
	}
}

/// In-memory graph of nodes and their derived connections.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: BTreeMap<NodeId, Node>,
	connections: BTreeMap<ConnectionId, Connection>,
	layout: LayoutConfig,
	next_node: u64,
	next_connection: u64,
}

impl GraphStore {
	pub fn new(layout: LayoutConfig) -> Self {
		Self {
			layout,
			..Self::default()
		}
	}

	pub fn layout(&self) -> &LayoutConfig {
		&self.layout
	}

	pub fn set_layout(&mut self, layout: LayoutConfig) {
		self.layout = layout;
	}

	/// Nodes in creation order.
	pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
		self.nodes.values()
	}

	pub fn connections(&self) -> impl Iterator<Item = &Connection> {
		self.connections.values()
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(&id)
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.nodes.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Creates a node and, for children, its connection.
	///
	/// Children are placed right of their parent and stacked below existing
	/// siblings; explicit coordinates are ignored for them. Roots keep explicit
	/// coordinates when both are given, otherwise they go below the lowest root
	/// or, for the first root, at `first_root`. A parent id that does not
	/// resolve is dropped and the node becomes a root at the explicit or default
	/// coordinates.
	pub fn add_node(&mut self, params: NodeParams, first_root: Point) -> NodeId {
		let id = NodeId::from_raw(self.next_node);
		self.next_node += 1;

		let parent = params
			.parent_id
			.and_then(|pid| self.nodes.get(&pid).map(|p| (pid, p.position())));

		let (x, y, parent_id) = match (params.parent_id, parent) {
			(Some(_), Some((pid, parent_pos))) => {
				let siblings = self.children_count(pid);
				(
					parent_pos.x + self.layout.child_offset_x,
					parent_pos.y
						+ siblings as f64 * self.layout.sibling_spacing
						+ self.layout.sibling_offset_y,
					Some(pid),
				)
			}
			(Some(missing), None) => {
				warn!("mindmap: parent {} not found, adding {} as a root", missing, id);
				(params.x.unwrap_or(0.0), params.y.unwrap_or(0.0), None)
			}
			(None, _) => {
				let pos = match (params.x, params.y) {
					(Some(x), Some(y)) => Point::new(x, y),
					_ => self.next_root_position(first_root),
				};
				(pos.x, pos.y, None)
			}
		};

		let content = params
			.content
			.filter(|c| !c.trim().is_empty())
			.unwrap_or_else(|| PLACEHOLDER_CONTENT.to_string());

		self.nodes.insert(
			id,
			Node {
				id,
				x,
				y,
				content,
				color: params.color.unwrap_or_default(),
				parent_id,
			},
		);

		if let Some(pid) = parent_id {
			let cid = ConnectionId::from_raw(self.next_connection);
			self.next_connection += 1;
			self.connections.insert(
				cid,
				Connection {
					id: cid,
					from: pid,
					to: id,
				},
			);
		}

		debug!("mindmap: added node {} at ({}, {})", id, x, y);
		id
	}

	fn next_root_position(&self, first_root: Point) -> Point {
		let lowest = self
			.nodes
			.values()
			.filter(|n| n.is_root())
			.max_by(|a, b| a.y.total_cmp(&b.y));
		match lowest {
			Some(root) => Point::new(root.x, root.y + self.layout.root_spacing),
			None => first_root,
		}
	}

	/// Merges `patch` into the node. Empty content is ignored. Returns whether
	/// the node exists.
	pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> bool {
		let Some(node) = self.nodes.get_mut(&id) else {
			return false;
		};
		if let Some(x) = patch.x {
			node.x = x;
		}
		if let Some(y) = patch.y {
			node.y = y;
		}
		if let Some(content) = patch.content.filter(|c| !c.trim().is_empty()) {
			node.content = content;
		}
		if let Some(color) = patch.color {
			node.color = color;
		}
		true
	}

	/// Sets the position directly, bypassing layout rules.
	pub fn update_node_position(&mut self, id: NodeId, x: f64, y: f64) -> bool {
		match self.nodes.get_mut(&id) {
			Some(node) => {
				node.x = x;
				node.y = y;
				true
			}
			None => false,
		}
	}

	/// `id` plus every transitive descendant. Empty if `id` is unknown.
	///
	/// Walks a child index built in one pass with an explicit stack; the
	/// visited set keeps a malformed cycle from looping forever.
	pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
		if !self.nodes.contains_key(&id) {
			return Vec::new();
		}

		let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
		for node in self.nodes.values() {
			if let Some(pid) = node.parent_id {
				children.entry(pid).or_default().push(node.id);
			}
		}

		let mut visited = HashSet::new();
		let mut stack = vec![id];
		let mut out = Vec::new();
		while let Some(current) = stack.pop() {
			if !visited.insert(current) {
				warn!("mindmap: cycle through {} while collecting descendants", current);
				continue;
			}
			out.push(current);
			if let Some(kids) = children.get(&current) {
				stack.extend(kids.iter().copied());
			}
		}
		out
	}

	/// Removes the node, its whole subtree, and every connection touching it.
	/// Returns the removed node ids (empty if `id` is unknown).
	pub fn remove_node(&mut self, id: NodeId) -> Vec<NodeId> {
		let doomed = self.descendants(id);
		if doomed.is_empty() {
			return doomed;
		}
		let set: HashSet<NodeId> = doomed.iter().copied().collect();
		self.nodes.retain(|nid, _| !set.contains(nid));
		self.connections
			.retain(|_, c| !set.contains(&c.from) && !set.contains(&c.to));
		debug!("mindmap: removed {} node(s) under {}", doomed.len(), id);
		doomed
	}

	/// Direct children only.
	pub fn get_node_children(&self, id: NodeId) -> Vec<&Node> {
		self.nodes
			.values()
			.filter(|n| n.parent_id == Some(id))
			.collect()
	}

	fn children_count(&self, id: NodeId) -> usize {
		self.nodes
			.values()
			.filter(|n| n.parent_id == Some(id))
			.count()
	}

	pub fn get_node_parent(&self, id: NodeId) -> Option<&Node> {
		let pid = self.nodes.get(&id)?.parent_id?;
		self.nodes.get(&pid)
	}

	/// Ids of the node's parent and children, used for neighborhood highlighting.
	pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
		let mut out: Vec<NodeId> = self.get_node_parent(id).map(|p| p.id).into_iter().collect();
		out.extend(self.get_node_children(id).into_iter().map(|c| c.id));
		out
	}

	pub fn clear_all(&mut self) {
		self.nodes.clear();
		self.connections.clear();
		debug!("mindmap: cleared graph");
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use rand::rngs::SmallRng;
	use rand::{Rng, SeedableRng};

	use super::*;
	use crate::components::mind_map::types::NodeColor;

	fn store() -> GraphStore {
		GraphStore::new(LayoutConfig::default())
	}

	fn derived_connections(store: &GraphStore) -> BTreeSet<(NodeId, NodeId)> {
		store
			.nodes()
			.filter_map(|n| n.parent_id().map(|p| (p, n.id())))
			.collect()
	}

	fn actual_connections(store: &GraphStore) -> BTreeSet<(NodeId, NodeId)> {
		store.connections().map(|c| (c.from, c.to)).collect()
	}

	#[test]
	fn children_stack_right_of_parent() {
		let mut s = store();
		let parent = s.add_node(NodeParams::root().at(100.0, 100.0), Point::ZERO);
		let first = s.add_node(NodeParams::child_of(parent), Point::ZERO);
		let second = s.add_node(NodeParams::child_of(parent).at(-5.0, -5.0), Point::ZERO);

		assert_eq!(s.node(first).map(Node::position), Some(Point::new(300.0, 60.0)));
		assert_eq!(s.node(second).map(Node::position), Some(Point::new(300.0, 140.0)));
		assert_eq!(actual_connections(&s), derived_connections(&s));
		assert_eq!(s.connections().count(), 2);
	}

	#[test]
	fn roots_center_then_stack_below_lowest() {
		let mut s = store();
		let center = Point::new(500.0, 400.0);
		let a = s.add_node(NodeParams::root(), center);
		assert_eq!(s.node(a).map(Node::position), Some(center));

		s.add_node(NodeParams::root().at(50.0, 700.0), center);
		let c = s.add_node(NodeParams::root(), center);
		assert_eq!(s.node(c).map(Node::position), Some(Point::new(50.0, 820.0)));
	}

	#[test]
	fn missing_parent_falls_back_to_explicit_coordinates() {
		let mut s = store();
		let ghost = NodeId::from_raw(999);
		let id = s.add_node(NodeParams::child_of(ghost).at(12.0, 34.0), Point::ZERO);

		let node = s.node(id).expect("node");
		assert_eq!(node.position(), Point::new(12.0, 34.0));
		assert!(node.is_root());
		assert_eq!(s.connections().count(), 0);
	}

	#[test]
	fn empty_content_uses_placeholder() {
		let mut s = store();
		let id = s.add_node(NodeParams::root().content("   "), Point::ZERO);
		assert_eq!(s.node(id).map(|n| n.content.as_str()), Some(PLACEHOLDER_CONTENT));

		assert!(s.update_node(id, NodePatch::content("")));
		assert_eq!(s.node(id).map(|n| n.content.as_str()), Some(PLACEHOLDER_CONTENT));

		assert!(s.update_node(id, NodePatch::content("Idea")));
		assert_eq!(s.node(id).map(|n| n.content.as_str()), Some("Idea"));
	}

	#[test]
	fn updates_on_missing_ids_are_noops() {
		let mut s = store();
		let ghost = NodeId::from_raw(7);
		assert!(!s.update_node(ghost, NodePatch::color(NodeColor::Danger)));
		assert!(!s.update_node_position(ghost, 1.0, 2.0));
		assert!(s.remove_node(ghost).is_empty());
		assert!(s.get_node_parent(ghost).is_none());
		assert!(s.get_node_children(ghost).is_empty());
	}

	#[test]
	fn remove_cascades_to_descendants_only() {
		let mut s = store();
		let root = s.add_node(NodeParams::root().at(0.0, 0.0), Point::ZERO);
		let a = s.add_node(NodeParams::child_of(root), Point::ZERO);
		let a1 = s.add_node(NodeParams::child_of(a), Point::ZERO);
		let a2 = s.add_node(NodeParams::child_of(a1), Point::ZERO);
		let b = s.add_node(NodeParams::child_of(root), Point::ZERO);

		let mut removed = s.remove_node(a);
		removed.sort();
		assert_eq!(removed, vec![a, a1, a2]);
		assert!(s.contains(root) && s.contains(b));
		assert_eq!(s.len(), 2);
		assert_eq!(actual_connections(&s), BTreeSet::from([(root, b)]));
	}

	#[test]
	fn descendants_terminate_on_cycle() {
		let mut s = store();
		let a = s.add_node(NodeParams::root().at(0.0, 0.0), Point::ZERO);
		let b = s.add_node(NodeParams::child_of(a), Point::ZERO);
		// Malformed: make the root a child of its own child.
		s.nodes.get_mut(&a).expect("a").parent_id = Some(b);

		let mut closure = s.descendants(a);
		closure.sort();
		assert_eq!(closure, vec![a, b]);
		assert_eq!(s.remove_node(b).len(), 2);
		assert!(s.is_empty());
	}

	#[test]
	fn parent_and_children_lookups() {
		let mut s = store();
		let root = s.add_node(NodeParams::root().at(0.0, 0.0), Point::ZERO);
		let a = s.add_node(NodeParams::child_of(root), Point::ZERO);
		let b = s.add_node(NodeParams::child_of(root), Point::ZERO);

		assert_eq!(s.get_node_parent(a).map(Node::id), Some(root));
		assert!(s.get_node_parent(root).is_none());
		let kids: Vec<NodeId> = s.get_node_children(root).iter().map(|n| n.id()).collect();
		assert_eq!(kids, vec![a, b]);
		assert_eq!(s.neighbors(root), vec![a, b]);
		assert_eq!(s.neighbors(a), vec![root]);
	}

	#[test]
	fn connection_set_matches_parent_pointers_after_random_edits() {
		let mut rng = SmallRng::seed_from_u64(0x5eed);
		let mut s = store();
		for _ in 0..400 {
			let ids: Vec<NodeId> = s.nodes().map(Node::id).collect();
			let roll: f64 = rng.r#gen();
			if ids.is_empty() || roll < 0.15 {
				s.add_node(NodeParams::root(), Point::ZERO);
			} else if roll < 0.75 {
				let parent = ids[rng.gen_range(0..ids.len())];
				s.add_node(NodeParams::child_of(parent), Point::ZERO);
			} else {
				let victim = ids[rng.gen_range(0..ids.len())];
				s.remove_node(victim);
			}
			assert_eq!(actual_connections(&s), derived_connections(&s));
			for c in s.connections() {
				assert!(s.contains(c.from) && s.contains(c.to));
			}
		}
	}

	#[test]
	fn clear_all_empties_everything() {
		let mut s = store();
		let root = s.add_node(NodeParams::root(), Point::ZERO);
		s.add_node(NodeParams::child_of(root), Point::ZERO);
		s.clear_all();
		assert!(s.is_empty());
		assert_eq!(s.connections().count(), 0);
	}
}
