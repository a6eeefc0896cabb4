//! Connector path construction between a parent and a child node.
//!
//! Paths are pure data ([`PathCommand`]s) so the same result can be replayed
//! onto a canvas context or serialized as an SVG path string.

use std::fmt::Write as _;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::types::{NODE_HEIGHT, NODE_WIDTH, Node, Point};

/// Fraction of the anchor distance used to bow a `curved` connector.
const CURVE_FRACTION: f64 = 0.2;
/// Fraction of the horizontal delta used for `bezier` control points.
const BEZIER_FRACTION: f64 = 0.5;
/// Approximate length of a single zigzag segment.
const ZIGZAG_SEGMENT_LENGTH: f64 = 50.0;
/// Perpendicular offset of zigzag vertices from the baseline.
const ZIGZAG_AMPLITUDE: f64 = 10.0;
/// Maximum random displacement added to each zigzag vertex.
const ZIGZAG_JITTER: f64 = 2.0;
/// Dash pattern `(dash, gap)` for `dashed` connectors.
pub const DASH_PATTERN: [f64; 2] = [5.0, 5.0];

/// Visual style of connectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
	Straight,
	Curved,
	#[default]
	Bezier,
	Zigzag,
	Dashed,
}

impl LineStyle {
	pub const ALL: [LineStyle; 5] = [
		LineStyle::Straight,
		LineStyle::Curved,
		LineStyle::Bezier,
		LineStyle::Zigzag,
		LineStyle::Dashed,
	];

	pub fn label(self) -> &'static str {
		match self {
			LineStyle::Straight => "Straight",
			LineStyle::Curved => "Curved",
			LineStyle::Bezier => "Bezier",
			LineStyle::Zigzag => "Zigzag",
			LineStyle::Dashed => "Dashed",
		}
	}
}

/// A single drawing instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
	MoveTo(Point),
	LineTo(Point),
	QuadTo { ctrl: Point, to: Point },
	CubicTo { c1: Point, c2: Point, to: Point },
}

impl PathCommand {
	fn end(&self) -> Point {
		match *self {
			PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
			PathCommand::QuadTo { to, .. } | PathCommand::CubicTo { to, .. } => to,
		}
	}
}

/// An open path, always starting with a `MoveTo`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorPath {
	commands: Vec<PathCommand>,
}

impl ConnectorPath {
	fn starting_at(p: Point) -> Self {
		Self {
			commands: vec![PathCommand::MoveTo(p)],
		}
	}

	fn push(&mut self, command: PathCommand) {
		self.commands.push(command);
	}

	pub fn commands(&self) -> &[PathCommand] {
		&self.commands
	}

	pub fn start(&self) -> Point {
		self.commands[0].end()
	}

	pub fn end(&self) -> Point {
		self.commands[self.commands.len() - 1].end()
	}

	/// SVG `d` attribute form, e.g. `M 1 2 L 3 4`.
	pub fn to_svg(&self) -> String {
		let mut d = String::new();
		for (i, cmd) in self.commands.iter().enumerate() {
			if i > 0 {
				d.push(' ');
			}
			let _ = match *cmd {
				PathCommand::MoveTo(p) => write!(d, "M {} {}", p.x, p.y),
				PathCommand::LineTo(p) => write!(d, "L {} {}", p.x, p.y),
				PathCommand::QuadTo { ctrl, to } => {
					write!(d, "Q {} {}, {} {}", ctrl.x, ctrl.y, to.x, to.y)
				}
				PathCommand::CubicTo { c1, c2, to } => write!(
					d,
					"C {} {}, {} {}, {} {}",
					c1.x, c1.y, c2.x, c2.y, to.x, to.y
				),
			};
		}
		d
	}
}

/// A renderable connector: geometry plus stroke attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
	pub path: ConnectorPath,
	pub stroke_width: f64,
	/// `None` for solid strokes.
	pub dash: Option<[f64; 2]>,
}

/// Source of small random offsets for organic-looking zigzags.
pub trait Jitter {
	/// A value in `[-1, 1]`.
	fn next_unit(&mut self) -> f64;
}

/// Disables jitter entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
	fn next_unit(&mut self) -> f64 {
		0.0
	}
}

/// Deterministic jitter from a seed.
#[derive(Clone, Debug)]
pub struct SeededJitter {
	rng: SmallRng,
}

impl SeededJitter {
	pub fn new(seed: u64) -> Self {
		Self {
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	/// Stable per-connection stream, so a zigzag looks the same every frame.
	pub fn for_connection(session_seed: u64, connection: u64) -> Self {
		Self::new(session_seed ^ connection.wrapping_mul(0x9E37_79B9_7F4A_7C15))
	}
}

impl Jitter for SeededJitter {
	fn next_unit(&mut self) -> f64 {
		self.rng.gen_range(-1.0..=1.0)
	}
}

/// Parent anchor: right edge, vertical center.
pub fn source_anchor(node: &Node) -> Point {
	Point::new(node.x + NODE_WIDTH, node.y + NODE_HEIGHT / 2.0)
}

/// Child anchor: left edge, vertical center.
pub fn target_anchor(node: &Node) -> Point {
	Point::new(node.x, node.y + NODE_HEIGHT / 2.0)
}

/// Builds the connector between two nodes, or `None` if either is missing.
pub fn build_connector_path(
	from: Option<&Node>,
	to: Option<&Node>,
	style: LineStyle,
	thickness: f64,
	length_multiplier: f64,
	jitter: &mut dyn Jitter,
) -> Option<Connector> {
	let (from, to) = (from?, to?);
	let start = source_anchor(from);
	let anchor = target_anchor(to);
	let end = Point::new(
		anchor.x + (anchor.x - start.x) * (length_multiplier - 1.0),
		anchor.y + (anchor.y - start.y) * (length_multiplier - 1.0),
	);

	let path = match style {
		LineStyle::Straight | LineStyle::Dashed => straight(start, end),
		LineStyle::Curved => curved(start, end),
		LineStyle::Bezier => bezier(start, end),
		LineStyle::Zigzag => zigzag(start, end, jitter),
	};

	Some(Connector {
		path,
		stroke_width: thickness,
		dash: (style == LineStyle::Dashed).then_some(DASH_PATTERN),
	})
}

fn straight(start: Point, end: Point) -> ConnectorPath {
	let mut path = ConnectorPath::starting_at(start);
	path.push(PathCommand::LineTo(end));
	path
}

/// Unit normal of the segment, or zero for coincident points.
fn unit_normal(start: Point, end: Point) -> Point {
	let dist = start.distance(end);
	if dist < 1e-9 {
		return Point::ZERO;
	}
	Point::new(-(end.y - start.y) / dist, (end.x - start.x) / dist)
}

fn curved(start: Point, end: Point) -> ConnectorPath {
	let normal = unit_normal(start, end);
	let side = if end.y - start.y < 0.0 { -1.0 } else { 1.0 };
	let bow = start.distance(end) * CURVE_FRACTION * side;
	let ctrl = Point::new(
		(start.x + end.x) / 2.0 + normal.x * bow,
		(start.y + end.y) / 2.0 + normal.y * bow,
	);

	let mut path = ConnectorPath::starting_at(start);
	path.push(PathCommand::QuadTo { ctrl, to: end });
	path
}

fn bezier(start: Point, end: Point) -> ConnectorPath {
	let dx = (end.x - start.x).abs() * BEZIER_FRACTION;
	let mut path = ConnectorPath::starting_at(start);
	path.push(PathCommand::CubicTo {
		c1: Point::new(start.x + dx, start.y),
		c2: Point::new(end.x - dx, end.y),
		to: end,
	});
	path
}

fn zigzag(start: Point, end: Point, jitter: &mut dyn Jitter) -> ConnectorPath {
	let dist = start.distance(end);
	let segments = ((dist / ZIGZAG_SEGMENT_LENGTH) as usize).max(2);
	let normal = unit_normal(start, end);

	let mut path = ConnectorPath::starting_at(start);
	for i in 1..segments {
		let t = i as f64 / segments as f64;
		let side = if i % 2 == 1 { 1.0 } else { -1.0 };
		let offset = ZIGZAG_AMPLITUDE * side;
		path.push(PathCommand::LineTo(Point::new(
			start.x + (end.x - start.x) * t + normal.x * offset + jitter.next_unit() * ZIGZAG_JITTER,
			start.y + (end.y - start.y) * t + normal.y * offset + jitter.next_unit() * ZIGZAG_JITTER,
		)));
	}
	path.push(PathCommand::LineTo(end));
	path
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::super::store::{GraphStore, LayoutConfig};
	use super::super::types::NodeParams;
	use super::*;

	fn pair(child_offset: (f64, f64)) -> (Node, Node) {
		let mut store = GraphStore::new(LayoutConfig::default());
		let a = store.add_node(NodeParams::root().at(0.0, 0.0), Point::ZERO);
		let b = store.add_node(
			NodeParams::root().at(child_offset.0, child_offset.1),
			Point::ZERO,
		);
		(
			store.node(a).cloned().expect("a"),
			store.node(b).cloned().expect("b"),
		)
	}

	#[rstest]
	#[case(LineStyle::Straight)]
	#[case(LineStyle::Curved)]
	#[case(LineStyle::Bezier)]
	#[case(LineStyle::Zigzag)]
	#[case(LineStyle::Dashed)]
	fn every_style_joins_the_anchors(#[case] style: LineStyle) {
		let (a, b) = pair((400.0, 200.0));
		let conn = build_connector_path(Some(&a), Some(&b), style, 2.0, 1.0, &mut SeededJitter::new(3))
			.expect("connector");
		assert_eq!(conn.path.start(), Point::new(150.0, 25.0));
		assert_eq!(conn.path.end(), Point::new(400.0, 225.0));
		assert_eq!(conn.stroke_width, 2.0);
	}

	#[test]
	fn missing_endpoint_yields_no_path() {
		let (a, _) = pair((400.0, 0.0));
		assert!(build_connector_path(Some(&a), None, LineStyle::Straight, 2.0, 1.0, &mut NoJitter).is_none());
		assert!(build_connector_path(None, Some(&a), LineStyle::Bezier, 2.0, 1.0, &mut NoJitter).is_none());
	}

	#[test]
	fn length_multiplier_extends_terminal_point() {
		let (a, b) = pair((350.0, 100.0));
		let conn = build_connector_path(Some(&a), Some(&b), LineStyle::Straight, 1.0, 1.5, &mut NoJitter)
			.expect("connector");
		// start (150, 25), anchor (350, 125): delta (200, 100) * 0.5 past the anchor.
		assert_eq!(conn.path.end(), Point::new(450.0, 175.0));
	}

	#[test]
	fn dashed_matches_straight_geometry() {
		let (a, b) = pair((300.0, 80.0));
		let straight = build_connector_path(Some(&a), Some(&b), LineStyle::Straight, 2.0, 1.0, &mut NoJitter)
			.expect("straight");
		let dashed = build_connector_path(Some(&a), Some(&b), LineStyle::Dashed, 2.0, 1.0, &mut NoJitter)
			.expect("dashed");
		assert_eq!(straight.path, dashed.path);
		assert_eq!(straight.dash, None);
		assert_eq!(dashed.dash, Some(DASH_PATTERN));
	}

	#[test]
	fn curved_bows_toward_vertical_delta_side() {
		let (a, down) = pair((400.0, 200.0));
		let (_, up) = pair((400.0, -200.0));
		let ctrl_of = |to: &Node| {
			let conn = build_connector_path(Some(&a), Some(to), LineStyle::Curved, 1.0, 1.0, &mut NoJitter)
				.expect("curved");
			match conn.path.commands()[1] {
				PathCommand::QuadTo { ctrl, .. } => ctrl,
				other => panic!("expected quad, got {other:?}"),
			}
		};
		let c = ctrl_of(&down);
		assert!(c.x < 275.0 && c.y > 125.0);
		let c = ctrl_of(&up);
		assert!(c.x < 275.0 && c.y < -75.0);
	}

	#[test]
	fn bezier_control_points_follow_horizontal_delta() {
		let (a, b) = pair((350.0, 100.0));
		let conn = build_connector_path(Some(&a), Some(&b), LineStyle::Bezier, 1.0, 1.0, &mut NoJitter)
			.expect("bezier");
		assert_eq!(conn.path.to_svg(), "M 150 25 C 250 25, 250 125, 350 125");
	}

	#[test]
	fn zigzag_segment_count_scales_with_distance() {
		let (a, near) = pair((200.0, 0.0));
		let (_, far) = pair((650.0, 0.0));
		let count = |to: &Node| {
			build_connector_path(Some(&a), Some(to), LineStyle::Zigzag, 1.0, 1.0, &mut NoJitter)
				.expect("zigzag")
				.path
				.commands()
				.len()
		};
		// 50 units apart: clamps to 2 segments (move + 2 lines).
		assert_eq!(count(&near), 3);
		// 500 units apart: 10 segments.
		assert_eq!(count(&far), 11);
	}

	#[test]
	fn zigzag_alternates_around_baseline_without_jitter() {
		let (a, b) = pair((650.0, 0.0));
		let conn = build_connector_path(Some(&a), Some(&b), LineStyle::Zigzag, 1.0, 1.0, &mut NoJitter)
			.expect("zigzag");
		let ys: Vec<f64> = conn.path.commands()[1..conn.path.commands().len() - 1]
			.iter()
			.map(|c| c.end().y)
			.collect();
		for pair in ys.windows(2) {
			assert_eq!(pair[0] + pair[1], 50.0);
			assert_eq!((pair[0] - 25.0).abs(), ZIGZAG_AMPLITUDE);
		}
	}

	#[test]
	fn seeded_jitter_is_reproducible() {
		let (a, b) = pair((650.0, 90.0));
		let build = |seed| {
			build_connector_path(Some(&a), Some(&b), LineStyle::Zigzag, 1.0, 1.0, &mut SeededJitter::new(seed))
				.expect("zigzag")
		};
		assert_eq!(build(42), build(42));
		assert_ne!(build(42).path, build(43).path);
	}
}
