//! User-tunable canvas settings.
//!
//! Settings are read once at startup from an optional JSON `<script>` element
//! in the host page. Every field has a default, so a partial (or absent)
//! document is fine.

use serde::Deserialize;

use super::geometry::LineStyle;
use super::store::LayoutConfig;
use super::types::NodeColor;

/// Allowed connector stroke widths.
pub const LINE_THICKNESS_RANGE: (f64, f64) = (1.0, 5.0);

/// Canvas appearance and behavior. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
	/// Connector shape between parent and child.
	pub line_style: LineStyle,
	/// Connector stroke width, clamped to [`LINE_THICKNESS_RANGE`].
	pub line_thickness: f64,
	/// How far connectors extend past the child anchor (1.0 = exactly to it).
	pub length_multiplier: f64,
	/// Off: focus jumps instead of animating, and no entrance/pulse effects.
	pub animations_enabled: bool,
	/// Draw the background grid.
	pub show_grid: bool,
	/// Dragged nodes land on grid intersections.
	pub snap_to_grid: bool,
	/// Grid spacing in canvas units.
	pub grid_size: f64,
	/// Color for nodes created without one.
	pub default_node_color: NodeColor,
	/// Offsets used to place new nodes.
	pub layout: LayoutConfig,
}

impl Default for CanvasSettings {
	fn default() -> Self {
		Self {
			line_style: LineStyle::default(),
			line_thickness: 2.0,
			length_multiplier: 1.0,
			animations_enabled: true,
			show_grid: true,
			snap_to_grid: false,
			grid_size: 32.0,
			default_node_color: NodeColor::default(),
			layout: LayoutConfig::default(),
		}
	}
}

impl CanvasSettings {
	/// Parses settings JSON and normalizes out-of-range values.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str::<Self>(json).map(Self::normalized)
	}

	/// Replaces invalid thickness, grid size, and length values.
	pub fn normalized(mut self) -> Self {
		self.set_line_thickness(self.line_thickness);
		if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
			self.grid_size = Self::default().grid_size;
		}
		if !(self.length_multiplier.is_finite() && self.length_multiplier > 0.0) {
			self.length_multiplier = 1.0;
		}
		self
	}

	/// Rounds and clamps `thickness`; non-finite input falls back to the default.
	pub fn set_line_thickness(&mut self, thickness: f64) {
		let (lo, hi) = LINE_THICKNESS_RANGE;
		self.line_thickness = if thickness.is_finite() {
			thickness.round().clamp(lo, hi)
		} else {
			Self::default().line_thickness
		};
	}

	/// Rounds a coordinate to the grid when snapping is on.
	pub fn snap(&self, value: f64) -> f64 {
		if self.snap_to_grid {
			(value / self.grid_size).round() * self.grid_size
		} else {
			value
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let s = CanvasSettings::from_json(r#"{ "line_style": "zigzag", "snap_to_grid": true }"#)
			.expect("settings");
		assert_eq!(s.line_style, LineStyle::Zigzag);
		assert!(s.snap_to_grid);
		assert_eq!(s.line_thickness, 2.0);
		assert_eq!(s.layout, LayoutConfig::default());
	}

	#[test]
	fn nested_layout_and_colors_parse() {
		let s = CanvasSettings::from_json(
			r#"{ "default_node_color": "ai", "layout": { "child_offset_x": 240 } }"#,
		)
		.expect("settings");
		assert_eq!(s.default_node_color, NodeColor::Ai);
		assert_eq!(s.layout.child_offset_x, 240.0);
		assert_eq!(s.layout.sibling_spacing, 80.0);
	}

	#[test]
	fn out_of_range_values_are_normalized() {
		let s = CanvasSettings::from_json(
			r#"{ "line_thickness": 12, "grid_size": 0, "length_multiplier": -2 }"#,
		)
		.expect("settings");
		assert_eq!(s.line_thickness, 5.0);
		assert_eq!(s.grid_size, 32.0);
		assert_eq!(s.length_multiplier, 1.0);
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(CanvasSettings::from_json("{ line_style: ").is_err());
		assert!(CanvasSettings::from_json(r#"{ "line_style": "wavy" }"#).is_err());
	}

	#[test]
	fn snapping_rounds_to_grid_only_when_enabled() {
		let mut s = CanvasSettings::default();
		assert_eq!(s.snap(47.0), 47.0);
		s.snap_to_grid = true;
		assert_eq!(s.snap(47.0), 32.0);
		assert_eq!(s.snap(49.0), 64.0);
		assert_eq!(s.snap(-20.0), -32.0);
	}
}
