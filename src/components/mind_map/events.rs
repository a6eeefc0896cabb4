//! Change notifications for rendering layers.
//!
//! The state owns every value exactly once; views subscribe here instead of
//! keeping their own copies. Events also tell the renderer when to run
//! decorative effects (entrance on creation, pulse on focus).

use super::types::NodeId;

/// Something observable changed.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
	/// A node was added to the graph.
	NodeCreated(NodeId),
	/// Content, color, or position of a node changed.
	NodeUpdated(NodeId),
	/// A node and its subtree were removed, in removal order.
	NodesRemoved(Vec<NodeId>),
	/// The whole graph was emptied.
	Cleared,
	/// The selected node changed; `None` means nothing is selected.
	SelectionChanged(Option<NodeId>),
	/// Zoom, position, or canvas size changed.
	ViewportChanged,
	/// The query, the results, or the current result changed.
	SearchChanged,
	/// A focus transition reached its target; the highlight pulse starts now.
	FocusCompleted(NodeId),
}

/// Identifies a subscription for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&CanvasEvent)>;

/// Ordered list of subscriber callbacks.
#[derive(Default)]
pub struct Observers {
	next: u64,
	subscribers: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
	/// Registers `callback`; it runs for every event until unsubscribed.
	pub fn subscribe(&mut self, callback: impl FnMut(&CanvasEvent) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next);
		self.next += 1;
		self.subscribers.push((id, Box::new(callback)));
		id
	}

	/// Removes a subscription. Returns `false` if it was already gone.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.subscribers.len();
		self.subscribers.retain(|(sid, _)| *sid != id);
		self.subscribers.len() != before
	}

	/// Calls every subscriber in subscription order.
	pub fn emit(&mut self, event: CanvasEvent) {
		for (_, callback) in &mut self.subscribers {
			callback(&event);
		}
	}

	/// Number of live subscriptions.
	pub fn len(&self) -> usize {
		self.subscribers.len()
	}

	/// True when nobody is subscribed.
	pub fn is_empty(&self) -> bool {
		self.subscribers.is_empty()
	}
}

impl std::fmt::Debug for Observers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Observers")
			.field("subscribers", &self.subscribers.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;

	#[test]
	fn subscribers_receive_events_until_unsubscribed() {
		let seen: Rc<RefCell<Vec<CanvasEvent>>> = Rc::default();
		let mut observers = Observers::default();
		let sink = seen.clone();
		let id = observers.subscribe(move |e| sink.borrow_mut().push(e.clone()));

		observers.emit(CanvasEvent::Cleared);
		assert!(observers.unsubscribe(id));
		assert!(!observers.unsubscribe(id));
		observers.emit(CanvasEvent::ViewportChanged);

		assert_eq!(*seen.borrow(), vec![CanvasEvent::Cleared]);
		assert!(observers.is_empty());
	}
}
