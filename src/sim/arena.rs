//! Arena geometry and wall reflection
//!
//! The arena is the drawing surface minus a rectangular panel anchored at
//! the top-right corner. Coordinates are screen pixels with y pointing down,
//! so the panel's inner corner sits at `(width - cutout_width, cutout_height)`.
//!
//! Reflection only sets velocity signs; it never computes a true normal or
//! corrects position, so fast or large bodies may dip into a wall for a
//! frame before turning around.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Outer bounds plus the panel cutout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub cutout_width: f32,
    pub cutout_height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32, cutout_width: f32, cutout_height: f32) -> Self {
        Self {
            width,
            height,
            cutout_width,
            cutout_height,
        }
    }

    /// X coordinate of the panel's left edge
    #[inline]
    pub fn cutout_left(&self) -> f32 {
        self.width - self.cutout_width
    }

    /// Inner corner of the panel
    #[inline]
    pub fn cutout_corner(&self) -> Vec2 {
        Vec2::new(self.cutout_left(), self.cutout_height)
    }

    /// True if a disk at `pos` reaches into the panel's bounding region
    #[inline]
    pub fn overlaps_cutout(&self, pos: Vec2, radius: f32) -> bool {
        pos.x + radius > self.cutout_left() && pos.y - radius < self.cutout_height
    }

    /// Check that bodies up to `max_radius` can be placed somewhere.
    pub fn validate_for(&self, max_radius: f32) -> Result<()> {
        let dims = [self.width, self.height, self.cutout_width, self.cutout_height];
        if !dims.iter().all(|d| d.is_finite() && *d >= 0.0) {
            return Err(Error::InvalidParam(
                "arena dimensions must be finite and non-negative".into(),
            ));
        }
        if self.width < 2.0 * max_radius || self.height < 2.0 * max_radius {
            return Err(Error::InvalidParam(format!(
                "arena {}x{} cannot hold a body of radius {}",
                self.width, self.height, max_radius
            )));
        }
        // Free space: the strip left of the panel or the strip below it
        let left_strip = self.cutout_left() >= 2.0 * max_radius;
        let bottom_strip = self.height - self.cutout_height >= 2.0 * max_radius;
        if !left_strip && !bottom_strip {
            return Err(Error::InvalidParam(
                "panel cutout leaves no room for bodies".into(),
            ));
        }
        Ok(())
    }

    /// Velocity after bouncing off any wall the body currently touches.
    ///
    /// Every rule is checked on its own, so a body in a corner may have
    /// both components forced in the same call.
    pub fn reflect(&self, pos: Vec2, vel: Vec2, radius: f32) -> Vec2 {
        let mut vel = vel;
        let cut_left = self.cutout_left();
        let cut_bottom = self.cutout_height;

        // Bottom
        if pos.y + radius > self.height {
            vel.y = -vel.y.abs();
        }

        // Left
        if pos.x - radius < 0.0 {
            vel.x = vel.x.abs();
        }

        // Top, only where the panel is not
        if pos.x + radius < cut_left && pos.y - radius < 0.0 {
            vel.y = vel.y.abs();
        }

        // Right, only below the panel
        if pos.y - radius > cut_bottom && pos.x + radius > self.width {
            vel.x = -vel.x.abs();
        }

        // Panel edges: pick the axis from the quadrant around the inner corner
        if self.overlaps_cutout(pos, radius) {
            if pos.x > cut_left && pos.y > cut_bottom {
                vel.y = vel.y.abs();
            } else if pos.x < cut_left && pos.y < cut_bottom {
                vel.x = -vel.x.abs();
            } else {
                vel.x = -vel.x.abs();
                vel.y = vel.y.abs();
            }
        }

        vel
    }
}

impl Default for Arena {
    fn default() -> Self {
        use crate::consts::*;
        Self::new(
            DEFAULT_ARENA_WIDTH,
            DEFAULT_ARENA_HEIGHT,
            DEFAULT_PANEL_WIDTH,
            DEFAULT_PANEL_HEIGHT,
        )
    }
}
