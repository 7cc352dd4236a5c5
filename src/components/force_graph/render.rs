use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::engine::ForceEngine;
use super::theme::GraphTheme;

pub fn render(engine: &ForceEngine, ctx: &CanvasRenderingContext2d, theme: &GraphTheme) {
	let t = engine.transform();
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, engine.width(), engine.height());
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_links(engine, ctx);
	draw_nodes(engine, ctx, theme);
	ctx.restore();
}

fn draw_links(engine: &ForceEngine, ctx: &CanvasRenderingContext2d) {
	let (nodes, k) = (engine.nodes(), engine.transform().k);
	for link in engine.links() {
		let (Some(s), Some(t)) = (nodes.get(link.source), nodes.get(link.target)) else {
			continue;
		};
		ctx.set_stroke_style_str(&engine.style().link_color(link).to_css());
		// widths are screen pixels
		ctx.set_line_width(engine.link_width(link) / k);
		ctx.begin_path();
		ctx.move_to(s.x, s.y);
		ctx.line_to(t.x, t.y);
		ctx.stroke();
	}
}

fn draw_nodes(engine: &ForceEngine, ctx: &CanvasRenderingContext2d, theme: &GraphTheme) {
	let k = engine.transform().k;
	let style = engine.style();

	for (i, node) in engine.nodes().iter().enumerate() {
		let radius = engine.node_radius(node);
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&style.node_color(node).to_css());
		ctx.fill();

		let outline = if engine.hovered() == Some(i) {
			Some(theme.ring)
		} else {
			style.node_outline(node)
		};
		if let Some(color) = outline {
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, radius + 1.5 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&color.to_css());
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	}
}
