//! Case-insensitive content search with circular result navigation.

use super::store::GraphStore;
use super::types::NodeId;

/// The current query, its matches, and which match is selected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
	query: String,
	results: Vec<NodeId>,
	current: Option<usize>,
}

impl SearchState {
	/// The query as typed.
	pub fn query(&self) -> &str {
		&self.query
	}

	/// Matching node ids in creation order.
	pub fn results(&self) -> &[NodeId] {
		&self.results
	}

	/// Index into [`results`](Self::results); `None` when there are none.
	pub fn current_index(&self) -> Option<usize> {
		self.current
	}

	/// The node under the cursor, if any.
	pub fn current(&self) -> Option<NodeId> {
		self.current.and_then(|i| self.results.get(i).copied())
	}

	/// Runs the query and returns the first match, which callers focus.
	/// An empty query clears the results. Whitespace is part of the query.
	pub fn search(&mut self, query: &str, store: &GraphStore) -> Option<NodeId> {
		self.query = query.to_string();
		if query.is_empty() {
			self.results.clear();
			self.current = None;
			return None;
		}
		let needle = query.to_lowercase();
		self.results = store
			.nodes()
			.filter(|n| n.content.to_lowercase().contains(&needle))
			.map(|n| n.id())
			.collect();
		self.current = if self.results.is_empty() { None } else { Some(0) };
		self.current()
	}

	/// Steps `direction` places through the results, wrapping at either end.
	pub fn navigate(&mut self, direction: isize) -> Option<NodeId> {
		let n = self.results.len() as isize;
		if n == 0 {
			return None;
		}
		let index = self.current.map_or(0, |i| i as isize);
		self.current = Some((index + direction).rem_euclid(n) as usize);
		self.current()
	}

	/// Drops removed nodes from the results, keeping the cursor on the same
	/// match when it survives.
	pub fn prune(&mut self, removed: &[NodeId]) {
		if self.results.is_empty() {
			return;
		}
		let kept = self.current();
		self.results.retain(|id| !removed.contains(id));
		self.current = if self.results.is_empty() {
			None
		} else {
			Some(
				kept.and_then(|id| self.results.iter().position(|r| *r == id))
					.unwrap_or(0),
			)
		};
	}

	/// Forgets the query and results.
	pub fn clear(&mut self) {
		*self = Self::default();
	}
}

#[cfg(test)]
mod tests {
	use super::super::store::LayoutConfig;
	use super::super::types::{NodeParams, Point};
	use super::*;

	fn store_with(labels: &[&str]) -> (GraphStore, Vec<NodeId>) {
		let mut store = GraphStore::new(LayoutConfig::default());
		let ids = labels
			.iter()
			.map(|l| store.add_node(NodeParams::root().content(*l), Point::ZERO))
			.collect();
		(store, ids)
	}

	#[test]
	fn matches_case_insensitive_substrings_in_order() {
		let (store, ids) = store_with(&["Rust Engine", "ideas", "trust", "Plan"]);
		let mut search = SearchState::default();
		assert_eq!(search.search("RUST", &store), Some(ids[0]));
		assert_eq!(search.results(), &[ids[0], ids[2]]);
		assert_eq!(search.current_index(), Some(0));
	}

	#[test]
	fn no_match_and_empty_query_reset_cursor() {
		let (store, _) = store_with(&["alpha", "beta"]);
		let mut search = SearchState::default();
		assert_eq!(search.search("zeta", &store), None);
		assert!(search.results().is_empty());
		assert_eq!(search.current_index(), None);

		search.search("a", &store);
		assert_eq!(search.results().len(), 2);
		assert_eq!(search.search("", &store), None);
		assert!(search.results().is_empty());
		assert_eq!(search.current_index(), None);
	}

	#[test]
	fn whitespace_is_matched_literally() {
		let (store, ids) = store_with(&["two words", "xa"]);
		let mut search = SearchState::default();
		assert_eq!(search.search(" ", &store), Some(ids[0]));
		assert_eq!(search.results(), &[ids[0]]);

		assert_eq!(search.search("a ", &store), None);
		assert!(search.results().is_empty());
		assert_eq!(search.query(), "a ");
	}

	#[test]
	fn navigation_wraps_both_ways() {
		let (store, ids) = store_with(&["node a", "node b", "node c"]);
		let mut search = SearchState::default();
		search.search("node", &store);
		search.navigate(1);
		search.navigate(1);
		assert_eq!(search.current_index(), Some(2));

		assert_eq!(search.navigate(1), Some(ids[0]));
		assert_eq!(search.current_index(), Some(0));
		assert_eq!(search.navigate(-1), Some(ids[2]));
		assert_eq!(search.current_index(), Some(2));
	}

	#[test]
	fn navigate_without_results_is_noop() {
		let mut search = SearchState::default();
		assert_eq!(search.navigate(1), None);
		assert_eq!(search.current_index(), None);
	}

	#[test]
	fn prune_keeps_cursor_on_surviving_match() {
		let (store, ids) = store_with(&["x1", "x2", "x3"]);
		let mut search = SearchState::default();
		search.search("x", &store);
		search.navigate(1);
		search.navigate(1);
		search.prune(&[ids[0]]);
		assert_eq!(search.results(), &[ids[1], ids[2]]);
		assert_eq!(search.current(), Some(ids[2]));

		search.prune(&[ids[1], ids[2]]);
		assert_eq!(search.current_index(), None);
	}
}
