//! Canvas rendering for the mind map.
//!
//! Rendering happens in passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Grid, then connectors with their end markers (canvas space)
//! 3. Nodes in creation order, so later nodes draw on top

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{Connector, PathCommand};
use super::state::MindMapState;
use super::theme::Theme;
use super::types::{NODE_HEIGHT, NODE_WIDTH, Node, Point};

/// Labels longer than this are cut and ellipsized to fit the fixed node box.
const MAX_LABEL_CHARS: usize = 18;
/// Grid lines are skipped when they would be denser than this on screen.
const MIN_GRID_SPACING_PX: f64 = 6.0;

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete mind map to the canvas. `now` is in seconds.
pub fn render(state: &MindMapState, ctx: &CanvasRenderingContext2d, theme: &Theme, now: f64) {
	let viewport = state.viewport();
	let (width, height) = viewport.size();
	let k = viewport.scale();
	let position = viewport.position();

	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	ctx.save();
	let _ = ctx.scale(k, k);
	let _ = ctx.translate(position.x, position.y);

	if state.settings().show_grid {
		draw_grid(state, ctx, theme);
	}
	draw_connectors(state, ctx, theme);
	for node in state.store().nodes() {
		draw_node(state, ctx, theme, node, now);
	}

	ctx.restore();
}

fn draw_grid(state: &MindMapState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let viewport = state.viewport();
	let size = state.settings().grid_size;
	if size * viewport.scale() < MIN_GRID_SPACING_PX {
		return;
	}
	let (top_left, bottom_right) = viewport.visible_bounds();

	ctx.set_stroke_style_str(&theme.background.grid_color.to_css());
	ctx.set_line_width(theme.background.grid_line_width / viewport.scale());
	ctx.begin_path();

	let mut x = (top_left.x / size).floor() * size;
	while x <= bottom_right.x {
		ctx.move_to(x, top_left.y);
		ctx.line_to(x, bottom_right.y);
		x += size;
	}
	let mut y = (top_left.y / size).floor() * size;
	while y <= bottom_right.y {
		ctx.move_to(top_left.x, y);
		ctx.line_to(bottom_right.x, y);
		y += size;
	}
	ctx.stroke();
}

fn draw_connectors(state: &MindMapState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	for (connection, connector) in state.connectors() {
		let hover_t = smooth_step(
			state
				.hover_intensity(connection.from)
				.min(state.hover_intensity(connection.to)),
		);
		let color = theme.edge.color.lerp(theme.edge.marker_color, hover_t);
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(connector.stroke_width * (1.0 + 0.5 * hover_t));
		draw_connector_path(ctx, &connector);

		let end = connector.path.end();
		ctx.set_fill_style_str(&theme.edge.marker_color.to_css());
		ctx.begin_path();
		let _ = ctx.arc(end.x, end.y, theme.edge.marker_radius, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_connector_path(ctx: &CanvasRenderingContext2d, connector: &Connector) {
	match connector.dash {
		Some([on, off]) => {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(on),
				&JsValue::from_f64(off),
			));
		}
		None => {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}

	ctx.begin_path();
	for cmd in connector.path.commands() {
		match *cmd {
			PathCommand::MoveTo(p) => ctx.move_to(p.x, p.y),
			PathCommand::LineTo(p) => ctx.line_to(p.x, p.y),
			PathCommand::QuadTo { ctrl, to } => ctx.quadratic_curve_to(ctrl.x, ctrl.y, to.x, to.y),
			PathCommand::CubicTo { c1, c2, to } => {
				ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y)
			}
		}
	}
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_node(
	state: &MindMapState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	node: &Node,
	now: f64,
) {
	let id = node.id();
	let entrance = state.entrance_scale(id, now);
	let hover_t = smooth_step(state.hover_intensity(id));
	let pulse_t = state.pulse_intensity(id, now);

	let center = node.center();
	let (w, h) = (NODE_WIDTH * entrance, NODE_HEIGHT * entrance);
	let origin = Point::new(center.x - w / 2.0, center.y - h / 2.0);
	let radius = theme.node.corner_radius;

	ctx.set_global_alpha(((entrance - 0.8) / 0.2).clamp(0.0, 1.0));

	if hover_t > 0.01 {
		let glow = theme.node.hover_glow;
		ctx.set_fill_style_str(&glow.with_alpha(glow.a * hover_t).to_css());
		rounded_rect(ctx, origin.x - 6.0, origin.y - 6.0, w + 12.0, h + 12.0, radius + 6.0);
		ctx.fill();
	}

	let base = theme.palette.get(node.color);
	ctx.set_fill_style_str(&base.lighten(0.15 * hover_t).to_css());
	rounded_rect(ctx, origin.x, origin.y, w, h, radius);
	ctx.fill();

	if node.is_root() {
		ctx.set_stroke_style_str(&base.darken(0.3).to_css());
		ctx.set_line_width(theme.node.root_border_width);
		ctx.stroke();
	}

	if state.selected() == Some(id) {
		ctx.set_stroke_style_str(&theme.node.selection_ring.to_css());
		ctx.set_line_width(2.0);
		rounded_rect(ctx, origin.x - 3.0, origin.y - 3.0, w + 6.0, h + 6.0, radius + 3.0);
		ctx.stroke();
	}

	if pulse_t > 0.01 {
		let spread = 4.0 + 10.0 * (1.0 - pulse_t);
		ctx.set_stroke_style_str(&theme.node.pulse_ring.with_alpha(pulse_t).to_css());
		ctx.set_line_width(3.0);
		rounded_rect(
			ctx,
			origin.x - spread,
			origin.y - spread,
			w + spread * 2.0,
			h + spread * 2.0,
			radius + spread,
		);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&theme.text_color(node.color).to_css());
	ctx.set_font(theme.node.font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&fit_label(&node.content, MAX_LABEL_CHARS), center.x, center.y);

	ctx.set_global_alpha(1.0);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

/// Cuts `label` to at most `max` characters, ending in an ellipsis when cut.
fn fit_label(label: &str, max: usize) -> String {
	if label.chars().count() <= max {
		return label.to_string();
	}
	let mut out: String = label.chars().take(max.saturating_sub(1)).collect();
	out.push('…');
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_labels_are_kept() {
		assert_eq!(fit_label("Main Idea", MAX_LABEL_CHARS), "Main Idea");
	}

	#[test]
	fn long_labels_are_ellipsized_on_char_boundaries() {
		let label = fit_label("Ünïcödé labels get cut here", 10);
		assert_eq!(label.chars().count(), 10);
		assert_eq!(label, "Ünïcödé l…");
	}

	#[test]
	fn smooth_step_endpoints() {
		assert_eq!(smooth_step(0.0), 0.0);
		assert_eq!(smooth_step(1.0), 1.0);
		assert_eq!(smooth_step(0.5), 0.5);
	}
}
