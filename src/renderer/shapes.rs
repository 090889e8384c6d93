//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segment count for a disk of `radius` px: smooth enough without
/// wasting triangles on tiny bodies
pub fn circle_segments(radius: f32) -> u32 {
    ((radius * 2.0) as u32).clamp(8, 32)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a line segment of the given thickness
pub fn segment(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a connected line through `points`
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(1) * 6);
    for pair in points.windows(2) {
        vertices.extend(segment(pair[0], pair[1], width, color));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_lie_on_radius() {
        let center = Vec2::new(50.0, 40.0);
        let verts = circle(center, 10.0, [1.0; 4], 12);
        assert_eq!(verts.len(), 36);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [50.0, 40.0]);
            for v in &tri[1..] {
                let p = Vec2::new(v.position[0], v.position[1]);
                assert!(((p - center).length() - 10.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_circle_segments_clamped() {
        assert_eq!(circle_segments(1.0), 8);
        assert_eq!(circle_segments(6.0), 12);
        assert_eq!(circle_segments(100.0), 32);
    }

    #[test]
    fn test_segment_has_requested_width() {
        let verts = segment(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, [0.0; 4]);
        assert_eq!(verts.len(), 6);
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        let spread = ys.iter().cloned().fold(f32::MIN, f32::max)
            - ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((spread - 4.0).abs() < 1e-5);

        assert!(segment(Vec2::ONE, Vec2::ONE, 4.0, [0.0; 4]).is_empty());
    }

    #[test]
    fn test_polyline_quad_per_pair() {
        let pts = [Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::new(5.0, 5.0)];
        assert_eq!(polyline(&pts, 2.0, [0.0; 4]).len(), 12);
        assert!(polyline(&pts[..1], 2.0, [0.0; 4]).is_empty());
    }
}
