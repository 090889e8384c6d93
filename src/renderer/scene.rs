//! Scene assembly: bodies, panel edge and live chart

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, series_color, state_color};
use crate::chart::{self, ChartRect, History, Series};
use crate::sim::{Arena, SimulationState};

const PANEL_EDGE_WIDTH: f32 = 4.0;
const AXIS_WIDTH: f32 = 1.0;
const SERIES_WIDTH: f32 = 3.0;

/// Space the panel keeps above the chart for the form and counters (px)
const CHART_TOP: f32 = 240.0;
/// Gap below the chart (px)
const CHART_BOTTOM_MARGIN: f32 = 20.0;

/// Where the chart sits: 90% of the panel's width, under the form
pub fn chart_rect(arena: &Arena) -> ChartRect {
    let w = arena.cutout_width * 0.9;
    let h = arena.cutout_height - CHART_TOP - CHART_BOTTOM_MARGIN;
    ChartRect::new(
        Vec2::new(arena.cutout_left() + arena.cutout_width * 0.05, CHART_TOP),
        Vec2::new(w.max(0.0), h.max(0.0)),
    )
}

/// Build every triangle of one frame, in arena pixels
pub fn build_scene(state: &SimulationState, history: &History) -> Vec<Vertex> {
    let arena = state.arena();
    let mut vertices = Vec::with_capacity(state.bodies().len() * 16 * 3 + 512);

    for body in state.bodies() {
        vertices.extend(shapes::circle(
            body.pos,
            body.radius,
            state_color(body.state),
            shapes::circle_segments(body.radius),
        ));
    }

    // Panel edge: down the left side, then along the bottom
    let corner = arena.cutout_corner();
    if arena.cutout_width > 0.0 && arena.cutout_height > 0.0 {
        vertices.extend(shapes::polyline(
            &[
                Vec2::new(corner.x, 0.0),
                corner,
                Vec2::new(arena.width, corner.y),
            ],
            PANEL_EDGE_WIDTH,
            colors::PANEL_EDGE,
        ));
    }

    let rect = chart_rect(&arena);
    if rect.is_drawable() {
        for (from, to) in chart::axes(&rect) {
            vertices.extend(shapes::segment(from, to, AXIS_WIDTH, colors::AXES));
        }
        for series in Series::ALL {
            let points = chart::polyline(history, series, &rect, state.initial_population());
            vertices.extend(shapes::polyline(&points, SERIES_WIDTH, series_color(series)));
        }
    }

    vertices
}
