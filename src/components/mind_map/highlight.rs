//! Highlight effects: the smoothed hover glow, the scale-in played on new
//! nodes, and the pulse played on a node after the viewport finishes focusing
//! it.

use std::collections::{HashMap, HashSet};

use super::focus::ease_out_cubic;
use super::types::NodeId;

/// Minimum time (seconds) a hover highlight is held before it can fade out.
/// Prevents flashing when the pointer briefly grazes a node.
const MIN_HOLD_TIME: f64 = 0.12;
/// Intensities below this are dropped.
const CULL_INTENSITY: f64 = 0.005;

/// Per-node hover intensity with exponential smoothing.
///
/// Each node animates toward 1.0 while it is in the target set (hovered node
/// plus its parent and children) and decays toward 0.0 once it leaves it.
#[derive(Clone, Debug, Default)]
pub struct HoverHighlight {
	hovered: Option<NodeId>,
	target_set: HashSet<NodeId>,
	intensity: HashMap<NodeId, f64>,
	hold_timer: HashMap<NodeId, f64>,
}

impl HoverHighlight {
	/// The node under the pointer, if any.
	pub fn hovered(&self) -> Option<NodeId> {
		self.hovered
	}

	/// Sets the hovered node and its neighbors.
	pub fn set_hover(&mut self, node: Option<NodeId>, neighbors: &[NodeId]) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.target_set.clear();
		if let Some(id) = node {
			self.target_set.insert(id);
			self.target_set.extend(neighbors.iter().copied());
			for &id in &self.target_set {
				self.hold_timer.insert(id, MIN_HOLD_TIME);
			}
		}
	}

	/// value += (target - value) * (1 - e^(-speed * dt))
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0;
		const FADE_OUT_SPEED: f64 = 4.0;

		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &id in &self.target_set {
			let value = self.intensity.entry(id).or_insert(0.0);
			*value += (1.0 - *value) * fade_in;
		}

		self.hold_timer.retain(|id, timer| {
			if self.target_set.contains(id) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		self.intensity.retain(|id, value| {
			if self.target_set.contains(id) {
				return true;
			}
			if self.hold_timer.get(id).copied().unwrap_or(0.0) <= 0.0 {
				*value *= fade_out;
			}
			*value > CULL_INTENSITY
		});
	}

	/// Current glow strength for `id`, 0.0..=1.0.
	pub fn intensity(&self, id: NodeId) -> f64 {
		self.intensity.get(&id).copied().unwrap_or(0.0)
	}

	/// Drops all state for removed nodes.
	pub fn forget(&mut self, removed: &[NodeId]) {
		for id in removed {
			self.target_set.remove(id);
			self.intensity.remove(id);
			self.hold_timer.remove(id);
		}
		if self.hovered.is_some_and(|h| removed.contains(&h)) {
			self.hovered = None;
		}
	}

	/// Drops every highlight at once.
	pub fn clear(&mut self) {
		*self = Self::default();
	}
}

/// A repeating ease-out pulse on a single node. Purely visual; nothing waits
/// for it to finish.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
	/// The pulsing node.
	pub node: NodeId,
	started_at: f64,
	cycles: u32,
	cycle_duration: f64,
}

impl Pulse {
	pub const DEFAULT_CYCLES: u32 = 3;
	pub const DEFAULT_CYCLE_DURATION: f64 = 0.4;

	/// A pulse on `node` starting at `now` seconds.
	pub fn new(node: NodeId, now: f64) -> Self {
		Self {
			node,
			started_at: now,
			cycles: Self::DEFAULT_CYCLES,
			cycle_duration: Self::DEFAULT_CYCLE_DURATION,
		}
	}

	/// Total length of all cycles, in seconds.
	pub fn duration(&self) -> f64 {
		self.cycles as f64 * self.cycle_duration
	}

	/// Compared in cycle units with a small tolerance, so the exact end time
	/// counts as finished despite float rounding.
	pub fn is_finished(&self, now: f64) -> bool {
		(now - self.started_at) / self.cycle_duration >= self.cycles as f64 - 1e-9
	}

	/// 0.0..=1.0: each cycle jumps to full strength and eases out, and later
	/// cycles are weaker than earlier ones.
	pub fn intensity(&self, now: f64) -> f64 {
		let elapsed = now - self.started_at;
		if elapsed < 0.0 || self.is_finished(now) {
			return 0.0;
		}
		let cycle = (elapsed / self.cycle_duration).floor();
		let phase = elapsed / self.cycle_duration - cycle;
		let decay = 1.0 - cycle / self.cycles as f64;
		(1.0 - phase).powi(2) * decay
	}
}

/// Scale-in effects for freshly created nodes.
///
/// A node is registered without a timestamp; the next [`tick`](Self::tick)
/// stamps it, so creation code never needs the clock.
#[derive(Clone, Debug, Default)]
pub struct Entrances {
	started: HashMap<NodeId, Option<f64>>,
}

impl Entrances {
	pub const DURATION: f64 = 0.25;
	/// Box scale at the first frame.
	const START_SCALE: f64 = 0.8;

	/// Queues `id` for a scale-in starting on the next tick.
	pub fn begin(&mut self, id: NodeId) {
		self.started.insert(id, None);
	}

	/// Stamps new entrances and drops finished ones.
	pub fn tick(&mut self, now: f64) {
		self.started.retain(|_, started| {
			let at = *started.get_or_insert(now);
			now - at < Self::DURATION
		});
	}

	/// Box scale factor; 1.0 for nodes that are not entering.
	pub fn scale(&self, id: NodeId, now: f64) -> f64 {
		match self.started.get(&id) {
			Some(Some(at)) => {
				let t = ((now - at) / Self::DURATION).clamp(0.0, 1.0);
				Self::START_SCALE + (1.0 - Self::START_SCALE) * ease_out_cubic(t)
			}
			Some(None) => Self::START_SCALE,
			None => 1.0,
		}
	}

	pub fn forget(&mut self, removed: &[NodeId]) {
		self.started.retain(|id, _| !removed.contains(id));
	}

	pub fn clear(&mut self) {
		self.started.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids() -> (NodeId, NodeId, NodeId) {
		(NodeId::from_raw(1), NodeId::from_raw(2), NodeId::from_raw(3))
	}

	#[test]
	fn hover_fades_in_neighbors_and_out_after_hold() {
		let (a, b, c) = ids();
		let mut hl = HoverHighlight::default();
		hl.set_hover(Some(a), &[b]);
		for _ in 0..30 {
			hl.tick(0.016);
		}
		assert!(hl.intensity(a) > 0.9);
		assert!(hl.intensity(b) > 0.9);
		assert_eq!(hl.intensity(c), 0.0);

		hl.set_hover(None, &[]);
		hl.tick(0.05);
		// Still inside the hold window.
		assert!(hl.intensity(a) > 0.9);
		for _ in 0..200 {
			hl.tick(0.016);
		}
		assert_eq!(hl.intensity(a), 0.0);
	}

	#[test]
	fn forget_drops_removed_nodes() {
		let (a, b, _) = ids();
		let mut hl = HoverHighlight::default();
		hl.set_hover(Some(a), &[b]);
		hl.tick(0.1);
		hl.forget(&[a]);
		assert_eq!(hl.hovered(), None);
		assert_eq!(hl.intensity(a), 0.0);
		assert!(hl.intensity(b) > 0.0);
	}

	#[test]
	fn pulse_repeats_and_decays() {
		let (a, _, _) = ids();
		let pulse = Pulse::new(a, 10.0);
		assert_eq!(pulse.intensity(10.0), 1.0);
		let second = pulse.intensity(10.0 + Pulse::DEFAULT_CYCLE_DURATION + 1e-6);
		assert!(second > 0.6 && second < 0.7);
		assert!(pulse.intensity(10.2) < pulse.intensity(10.1));
		assert!(pulse.is_finished(10.0 + pulse.duration()));
		assert_eq!(pulse.intensity(11.5), 0.0);
	}

	#[test]
	fn pulse_finishes_exactly_at_its_end_time() {
		let (a, _, _) = ids();
		for start in [0.0, 0.1, 10.0, 1234.567] {
			let pulse = Pulse::new(a, start);
			assert!(pulse.is_finished(start + pulse.duration()));
			assert_eq!(pulse.intensity(start + pulse.duration()), 0.0);
			assert!(!pulse.is_finished(start + pulse.duration() - 0.01));
		}
	}

	#[test]
	fn entrance_scales_up_then_expires() {
		let (a, b, _) = ids();
		let mut e = Entrances::default();
		e.begin(a);
		assert_eq!(e.scale(a, 0.0), 0.8);
		assert_eq!(e.scale(b, 0.0), 1.0);

		e.tick(2.0);
		assert_eq!(e.scale(a, 2.0), 0.8);
		let mid = e.scale(a, 2.1);
		assert!(mid > 0.8 && mid < 1.0);

		e.tick(2.0 + Entrances::DURATION);
		assert_eq!(e.scale(a, 2.0 + Entrances::DURATION), 1.0);
	}
}
