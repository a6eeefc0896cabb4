//! Visual theming for the mind map canvas.
//!
//! Node colors are stored symbolically ([`NodeColor`]); the theme's palette
//! turns each key into an actual fill.

use super::types::NodeColor;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fill colors for each [`NodeColor`] key.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub primary: Color,
	pub secondary: Color,
	pub success: Color,
	pub warning: Color,
	pub danger: Color,
	pub ai: Color,
}

impl NodePalette {
	pub fn get(&self, color: NodeColor) -> Color {
		match color {
			NodeColor::Primary => self.primary,
			NodeColor::Secondary => self.secondary,
			NodeColor::Success => self.success,
			NodeColor::Warning => self.warning,
			NodeColor::Danger => self.danger,
			NodeColor::Ai => self.ai,
		}
	}
}

impl Default for NodePalette {
	fn default() -> Self {
		Self {
			primary: Color::rgb(99, 102, 241),   // Indigo
			secondary: Color::rgb(100, 116, 139), // Slate
			success: Color::rgb(74, 222, 128),   // Green
			warning: Color::rgb(250, 204, 21),   // Amber
			danger: Color::rgb(220, 38, 38),     // Red
			ai: Color::rgb(34, 211, 238),        // Cyan
		}
	}
}

/// Background and grid.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	pub grid_color: Color,
	/// Grid line width in screen pixels.
	pub grid_line_width: f64,
}

/// Connector colors.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Color of the circle marking the child end of a connector.
	pub marker_color: Color,
	pub marker_radius: f64,
}

/// Node box style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub corner_radius: f64,
	pub font: &'static str,
	pub light_text: Color,
	pub dark_text: Color,
	pub selection_ring: Color,
	pub hover_glow: Color,
	pub pulse_ring: Color,
	/// Extra width given to root nodes' borders.
	pub root_border_width: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// Label color that stays readable on `color`'s fill.
	pub fn text_color(&self, color: NodeColor) -> Color {
		if color.wants_dark_text() {
			self.node.dark_text
		} else {
			self.node.light_text
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				grid_color: Color::rgba(140, 160, 180, 0.08),
				grid_line_width: 1.0,
			},
			edge: EdgeStyle {
				color: Color::rgb(148, 163, 184),
				marker_color: Color::rgb(129, 140, 248),
				marker_radius: 3.0,
			},
			node: NodeStyle {
				corner_radius: 8.0,
				font: "14px sans-serif",
				light_text: Color::rgb(255, 255, 255),
				dark_text: Color::rgb(17, 24, 39),
				selection_ring: Color::rgb(129, 140, 248),
				hover_glow: Color::rgba(255, 255, 255, 0.35),
				pulse_ring: Color::rgb(165, 180, 252),
				root_border_width: 2.0,
			},
			palette: NodePalette::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn lerp_endpoints() {
		let (a, b) = (Color::rgb(0, 0, 0), Color::rgb(200, 100, 50));
		assert_eq!(a.lerp(b, 0.0), a);
		assert_eq!(a.lerp(b, 1.0), b);
		assert_eq!(a.lerp(b, 3.0), b);
	}

	#[test]
	fn light_fills_get_dark_labels() {
		let theme = Theme::default();
		for color in NodeColor::ALL {
			let text = theme.text_color(color);
			let expected = if color.wants_dark_text() {
				theme.node.dark_text
			} else {
				theme.node.light_text
			};
			assert_eq!(text, expected);
		}
		assert_eq!(theme.text_color(NodeColor::Warning), theme.node.dark_text);
		assert_eq!(theme.text_color(NodeColor::Primary), theme.node.light_text);
	}
}
