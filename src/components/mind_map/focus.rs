//! Smooth viewport transitions that center a node.
//!
//! A focus is a timed task driven by [`FocusController::tick`]: whoever owns
//! the clock (a `requestAnimationFrame` loop, a timer, a test) calls `tick`
//! with the current time in seconds. Only one task is ever active; starting a
//! new one replaces the previous task before it can write again.

use log::debug;

use super::types::{NodeId, Point};
use super::viewport::Viewport;

/// Default focus transition length in seconds.
pub const FOCUS_DURATION: f64 = 0.75;

/// Cubic ease-out.
pub fn ease_out_cubic(t: f64) -> f64 {
	let inv = 1.0 - t.clamp(0.0, 1.0);
	1.0 - inv * inv * inv
}

/// Handle to a scheduled focus task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Clone, Copy, Debug)]
struct FocusTask {
	handle: TaskHandle,
	node: NodeId,
	from: Point,
	to: Point,
	/// Set by the first tick, so scheduling never needs the clock.
	started_at: Option<f64>,
	duration: f64,
}

/// Drives a single focus interpolation at a time.
#[derive(Clone, Debug)]
pub struct FocusController {
	active: Option<FocusTask>,
	next_handle: u64,
	duration: f64,
}

impl Default for FocusController {
	fn default() -> Self {
		Self::new(FOCUS_DURATION)
	}
}

impl FocusController {
	pub fn new(duration: f64) -> Self {
		Self {
			active: None,
			next_handle: 0,
			duration,
		}
	}

	/// Applies to tasks started afterwards. Zero completes on the first tick.
	pub fn set_duration(&mut self, duration: f64) {
		self.duration = duration.max(0.0);
	}

	pub fn is_active(&self) -> bool {
		self.active.is_some()
	}

	pub fn active_handle(&self) -> Option<TaskHandle> {
		self.active.map(|t| t.handle)
	}

	/// Node the active task is moving toward.
	pub fn target_node(&self) -> Option<NodeId> {
		self.active.map(|t| t.node)
	}

	/// Schedules a transition from the viewport's current position to `target`,
	/// replacing any task in flight.
	pub fn start(&mut self, node: NodeId, viewport: &Viewport, target: Point) -> TaskHandle {
		if let Some(prev) = self.active.take() {
			debug!("mindmap: focus on {} replaces task for {}", node, prev.node);
		}
		let handle = TaskHandle(self.next_handle);
		self.next_handle += 1;
		self.active = Some(FocusTask {
			handle,
			node,
			from: viewport.position(),
			to: target,
			started_at: None,
			duration: self.duration,
		});
		handle
	}

	/// Cancels the task if `handle` is the active one.
	pub fn cancel(&mut self, handle: TaskHandle) -> bool {
		if self.active_handle() == Some(handle) {
			self.active = None;
			true
		} else {
			false
		}
	}

	pub fn cancel_active(&mut self) {
		self.active = None;
	}

	/// Advances the active task. Writes the interpolated position into the
	/// viewport and, when the task completes, snaps exactly to the target and
	/// returns the focused node.
	pub fn tick(&mut self, now: f64, viewport: &mut Viewport) -> Option<NodeId> {
		let task = self.active.as_mut()?;
		let started_at = *task.started_at.get_or_insert(now);

		let progress = if task.duration <= 0.0 {
			1.0
		} else {
			(now - started_at) / task.duration
		};

		if progress >= 1.0 {
			let done = *task;
			self.active = None;
			viewport.set_position(done.to);
			return Some(done.node);
		}

		let e = ease_out_cubic(progress);
		viewport.set_position(Point::new(
			task.from.x + (task.to.x - task.from.x) * e,
			task.from.y + (task.to.y - task.from.y) * e,
		));
		None
	}
}
