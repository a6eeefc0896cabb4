//! Pan/zoom state and the transforms between screen and canvas space.
//!
//! # Coordinate Spaces
//!
//! - **Canvas space**: where node positions are stored.
//! - **Screen space**: pixels of the drawing surface.
//!
//! The render transform is `scale(scale)` followed by `translate(position)`
//! with the origin at the top-left, so `screen = (canvas + position) * scale`.

use super::types::Point;

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.5;
/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 2.0;
/// Zoom change applied by a single zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 0.1;

/// Direction of a single zoom step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
	In,
	Out,
}

impl ZoomDirection {
	/// Wheel scrolling up (negative delta) zooms in.
	pub fn from_wheel_delta(delta_y: f64) -> Self {
		if delta_y < 0.0 {
			ZoomDirection::In
		} else {
			ZoomDirection::Out
		}
	}

	fn step(self) -> f64 {
		match self {
			ZoomDirection::In => ZOOM_STEP,
			ZoomDirection::Out => -ZOOM_STEP,
		}
	}
}

/// Pan and zoom of the canvas, plus the size of the drawing surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	scale: f64,
	position: Point,
	width: f64,
	height: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(0.0, 0.0)
	}
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			scale: 1.0,
			position: Point::ZERO,
			width,
			height,
		}
	}

	pub fn scale(&self) -> f64 {
		self.scale
	}

	pub fn position(&self) -> Point {
		self.position
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Zoom as a whole percentage, for display.
	pub fn zoom_percent(&self) -> i64 {
		(self.scale * 100.0).round() as i64
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn zoom_in(&mut self) {
		self.scale = Self::stepped(self.scale, ZoomDirection::In);
	}

	pub fn zoom_out(&mut self) {
		self.scale = Self::stepped(self.scale, ZoomDirection::Out);
	}

	/// Saturates at the bounds. Rounded to hundredths so repeated steps do not
	/// accumulate float error.
	fn stepped(scale: f64, direction: ZoomDirection) -> f64 {
		(((scale + direction.step()) * 100.0).round() / 100.0).clamp(MIN_SCALE, MAX_SCALE)
	}

	/// Zooms one step while keeping the canvas point under `screen` fixed.
	pub fn zoom_at(&mut self, screen: Point, direction: ZoomDirection) {
		let anchor = self.screen_to_canvas(screen.x, screen.y);
		self.scale = Self::stepped(self.scale, direction);
		self.position = Point::new(
			screen.x / self.scale - anchor.x,
			screen.y / self.scale - anchor.y,
		);
	}

	pub fn reset_view(&mut self) {
		self.scale = 1.0;
		self.position = Point::ZERO;
	}

	pub fn set_position(&mut self, position: Point) {
		self.position = position;
	}

	/// Pans by a screen-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.position.x += dx / self.scale;
		self.position.y += dy / self.scale;
	}

	pub fn screen_to_canvas(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			sx / self.scale - self.position.x,
			sy / self.scale - self.position.y,
		)
	}

	pub fn canvas_to_screen(&self, p: Point) -> Point {
		Point::new(
			(p.x + self.position.x) * self.scale,
			(p.y + self.position.y) * self.scale,
		)
	}

	/// Canvas-space point currently at the middle of the drawing surface.
	pub fn canvas_center(&self) -> Point {
		self.screen_to_canvas(self.width / 2.0, self.height / 2.0)
	}

	/// Position that puts `canvas` at the middle of the drawing surface at the
	/// current scale.
	pub fn position_centering(&self, canvas: Point) -> Point {
		Point::new(
			self.width / 2.0 / self.scale - canvas.x,
			self.height / 2.0 / self.scale - canvas.y,
		)
	}

	/// Visible canvas-space rectangle as `(top_left, bottom_right)`.
	pub fn visible_bounds(&self) -> (Point, Point) {
		(
			self.screen_to_canvas(0.0, 0.0),
			self.screen_to_canvas(self.width, self.height),
		)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	const EPS: f64 = 1e-9;

	fn close(a: Point, b: Point) -> bool {
		(a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
	}

	#[rstest]
	#[case::zoom_in(ZoomDirection::In, MAX_SCALE)]
	#[case::zoom_out(ZoomDirection::Out, MIN_SCALE)]
	fn repeated_zoom_saturates(#[case] direction: ZoomDirection, #[case] bound: f64) {
		let mut vp = Viewport::new(800.0, 600.0);
		for _ in 0..50 {
			match direction {
				ZoomDirection::In => vp.zoom_in(),
				ZoomDirection::Out => vp.zoom_out(),
			}
			assert!((MIN_SCALE..=MAX_SCALE).contains(&vp.scale()));
		}
		assert_eq!(vp.scale(), bound);
	}

	#[test]
	fn steps_land_on_tenths() {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.zoom_in();
		vp.zoom_in();
		vp.zoom_in();
		assert_eq!(vp.scale(), 1.3);
		assert_eq!(vp.zoom_percent(), 130);
	}

	#[test]
	fn screen_and_canvas_round_trip() {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.zoom_in();
		vp.set_position(Point::new(-40.0, 25.0));
		let canvas = vp.screen_to_canvas(330.0, 120.0);
		assert!(close(vp.canvas_to_screen(canvas), Point::new(330.0, 120.0)));
		assert!(close(canvas, Point::new(330.0 / 1.1 + 40.0, 120.0 / 1.1 - 25.0)));
	}

	#[rstest]
	#[case(Point::new(0.0, 0.0))]
	#[case(Point::new(400.0, 300.0))]
	#[case(Point::new(123.5, 987.25))]
	fn zoom_at_keeps_point_under_cursor(#[case] cursor: Point) {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.set_position(Point::new(15.0, -30.0));
		let before = vp.screen_to_canvas(cursor.x, cursor.y);

		vp.zoom_at(cursor, ZoomDirection::In);
		assert!(close(vp.screen_to_canvas(cursor.x, cursor.y), before));

		vp.zoom_at(cursor, ZoomDirection::Out);
		assert!(close(vp.position(), Point::new(15.0, -30.0)));
		assert_eq!(vp.scale(), 1.0);
	}

	#[test]
	fn zoom_at_bound_leaves_position_alone() {
		let mut vp = Viewport::new(800.0, 600.0);
		for _ in 0..20 {
			vp.zoom_out();
		}
		vp.set_position(Point::new(7.0, 9.0));
		vp.zoom_at(Point::new(200.0, 100.0), ZoomDirection::Out);
		assert!(close(vp.position(), Point::new(7.0, 9.0)));
	}

	#[test]
	fn pan_divides_by_scale() {
		let mut vp = Viewport::new(800.0, 600.0);
		for _ in 0..10 {
			vp.zoom_in();
		}
		vp.pan_by(100.0, -50.0);
		assert!(close(vp.position(), Point::new(50.0, -25.0)));
	}

	#[test]
	fn centering_position_maps_point_to_middle() {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.zoom_out();
		let target = Point::new(675.0, 285.0);
		vp.set_position(vp.position_centering(target));
		assert!(close(vp.canvas_to_screen(target), Point::new(400.0, 300.0)));
		assert!(close(vp.canvas_center(), target));
	}

	#[test]
	fn reset_restores_identity() {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.zoom_in();
		vp.pan_by(10.0, 10.0);
		vp.reset_view();
		assert_eq!(vp.scale(), 1.0);
		assert_eq!(vp.position(), Point::ZERO);
	}
}
