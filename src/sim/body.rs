//! Bodies: the disk-shaped individuals of the simulation

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Disease state of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HealthState {
    /// Never infected, or immunity has waned
    #[default]
    Susceptible,
    /// Carries the infection and transmits on contact
    Infected,
    /// Survived the infection
    Recovered,
    /// Died; removed from the arena at the end of the step
    Deceased,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Susceptible => "susceptible",
            HealthState::Infected => "infected",
            HealthState::Recovered => "recovered",
            HealthState::Deceased => "deceased",
        }
    }
}

/// A simulated individual
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed at creation; doubles as the body's mass in collisions
    pub radius: f32,
    pub state: HealthState,
    /// Simulation time (seconds) of the last entry into Infected or Recovered
    pub state_entered_at: f64,
}

impl Body {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            state: HealthState::Susceptible,
            state_entered_at: 0.0,
        }
    }

    /// Move into `state`, stamping the entry time
    #[inline]
    pub fn enter(&mut self, state: HealthState, now: f64) {
        self.state = state;
        self.state_entered_at = now;
    }

    /// Seconds spent in the current state
    #[inline]
    pub fn dwell_time(&self, now: f64) -> f64 {
        now - self.state_entered_at
    }

    /// Mass used by the collision response
    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass()
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass() * self.vel.length_squared()
    }

    pub fn is_infected(&self) -> bool {
        self.state == HealthState::Infected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_body_is_susceptible() {
        let b = Body::new(4, Vec2::new(10.0, 20.0), Vec2::new(1.0, -1.0), 5.0);
        assert_eq!(b.id, 4);
        assert_eq!(b.state, HealthState::Susceptible);
        assert!(!b.is_infected());
    }

    #[test]
    fn test_enter_stamps_time() {
        let mut b = Body::new(0, Vec2::ZERO, Vec2::ZERO, 3.0);
        b.enter(HealthState::Infected, 2.5);
        assert!(b.is_infected());
        assert!((b.dwell_time(4.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_kinetic_energy_uses_radius_as_mass() {
        // |v|^2 = 25, m = 2 -> KE = 25
        let b = Body::new(0, Vec2::ZERO, Vec2::new(3.0, 4.0), 2.0);
        assert!((b.kinetic_energy() - 25.0).abs() < 1e-5);
        assert_eq!(b.momentum(), Vec2::new(6.0, 8.0));
    }
}
