//! Count history and live chart geometry
//!
//! The chart plots the four compartments against simulation time inside a
//! rectangle of the panel. Only geometry is produced here; the renderer turns
//! it into triangles.

use glam::Vec2;

use crate::consts::{CHART_AXIS_INSET, CHART_HEADROOM, CHART_TICK_SPACING};
use crate::sim::FrameSummary;

/// One plotted line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Susceptible,
    Infected,
    Recovered,
    Deceased,
}

impl Series {
    pub const ALL: [Series; 4] = [
        Series::Susceptible,
        Series::Infected,
        Series::Recovered,
        Series::Deceased,
    ];

    pub fn value(&self, frame: &FrameSummary) -> u32 {
        match self {
            Series::Susceptible => frame.susceptible,
            Series::Infected => frame.infected,
            Series::Recovered => frame.recovered,
            Series::Deceased => frame.deceased,
        }
    }
}

/// Frame summaries sampled every `skip_rate` frames
#[derive(Debug, Clone)]
pub struct History {
    skip_rate: u32,
    counter: u32,
    samples: Vec<FrameSummary>,
}

impl History {
    pub fn new(skip_rate: u32) -> Self {
        Self {
            skip_rate: skip_rate.max(1),
            counter: 0,
            samples: Vec::new(),
        }
    }

    /// Offer a frame; returns true if it was kept.
    pub fn record(&mut self, frame: FrameSummary) -> bool {
        self.counter = self.counter.wrapping_add(1);
        if self.counter % self.skip_rate != 0 {
            return false;
        }
        self.samples.push(frame);
        true
    }

    pub fn samples(&self) -> &[FrameSummary] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&FrameSummary> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.counter = 0;
        self.samples.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::consts::CHART_SKIP_RATE)
    }
}

/// Screen rectangle of the chart (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl ChartRect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn is_drawable(&self) -> bool {
        self.size.x > 2.0 * CHART_AXIS_INSET && self.size.y > 2.0 * CHART_AXIS_INSET
    }
}

/// Map a (time, count) pair to screen space.
///
/// The x axis spans the first to the last sample, the y axis runs from zero
/// to the population plus some headroom so the top line stays visible.
fn to_screen(rect: &ChartRect, t: f64, t_min: f64, t_max: f64, count: u32, y_max: f32) -> Vec2 {
    let span = t_max - t_min;
    let fx = if span > 0.0 {
        ((t - t_min) / span) as f32
    } else {
        0.0
    };
    let fy = count as f32 / y_max;
    Vec2::new(
        rect.origin.x + fx * rect.size.x + CHART_AXIS_INSET,
        rect.origin.y + rect.size.y - fy * rect.size.y - CHART_AXIS_INSET,
    )
}

/// Points of one series, thinned to about one per horizontal pixel.
pub fn polyline(history: &History, series: Series, rect: &ChartRect, population: u32) -> Vec<Vec2> {
    let samples = history.samples();
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };
    let y_max = (population.max(1) as f32) * CHART_HEADROOM;
    let max_points = (rect.size.x.max(1.0)) as usize;
    let stride = samples.len().div_ceil(max_points).max(1);

    let mut points: Vec<Vec2> = samples
        .iter()
        .step_by(stride)
        .map(|s| to_screen(rect, s.time, first.time, last.time, series.value(s), y_max))
        .collect();

    // Always end on the newest sample
    if (samples.len() - 1) % stride != 0 {
        points.push(to_screen(
            rect,
            last.time,
            first.time,
            last.time,
            series.value(last),
            y_max,
        ));
    }
    points
}

/// Axis lines and tick marks as segments
pub fn axes(rect: &ChartRect) -> Vec<(Vec2, Vec2)> {
    let o = rect.origin;
    let (w, h) = (rect.size.x, rect.size.y);
    let inset = CHART_AXIS_INSET;
    let mut segments = vec![
        // x axis
        (o + Vec2::new(inset, h - inset), o + Vec2::new(w, h - inset)),
        // y axis
        (o + Vec2::new(inset, 0.0), o + Vec2::new(inset, h - inset)),
    ];

    let mut i = 1.0;
    while h - i * CHART_TICK_SPACING > 0.0 {
        let y = h - i * CHART_TICK_SPACING;
        segments.push((o + Vec2::new(1.0, y), o + Vec2::new(9.0, y)));
        i += 1.0;
    }

    let mut i = 1.0;
    while i * CHART_TICK_SPACING < w {
        let x = i * CHART_TICK_SPACING;
        segments.push((o + Vec2::new(x, h - 9.0), o + Vec2::new(x, h + 1.0)));
        i += 1.0;
    }

    segments
}
