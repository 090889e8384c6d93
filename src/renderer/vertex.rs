//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::chart::Series;
use crate::sim::HealthState;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const SUSCEPTIBLE: [f32; 4] = [0.5, 0.0, 0.5, 1.0];
    pub const INFECTED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const RECOVERED: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const DECEASED: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const PANEL_EDGE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const AXES: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// Fill color of a body
pub fn state_color(state: HealthState) -> [f32; 4] {
    match state {
        HealthState::Susceptible => colors::SUSCEPTIBLE,
        HealthState::Infected => colors::INFECTED,
        HealthState::Recovered => colors::RECOVERED,
        // Never drawn: the dead leave the arena in the step they die
        HealthState::Deceased => colors::BACKGROUND,
    }
}

/// Line color of a chart series
pub fn series_color(series: Series) -> [f32; 4] {
    match series {
        Series::Susceptible => colors::SUSCEPTIBLE,
        Series::Infected => colors::INFECTED,
        Series::Recovered => colors::RECOVERED,
        Series::Deceased => colors::DECEASED,
    }
}
