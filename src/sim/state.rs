//! Simulation state
//!
//! Everything one run needs lives in `SimulationState`: the active bodies,
//! the arena they bounce in, the simulation clock and the RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::body::{Body, HealthState};
use super::epidemic::EpidemicParams;
use crate::error::{Error, Result};
use crate::settings::Settings;

/// Attempts per body before placement gives up
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100_000;

/// Per-state head counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub susceptible: u32,
    pub infected: u32,
    pub recovered: u32,
}

impl Counts {
    pub fn tally<'a>(bodies: impl IntoIterator<Item = &'a Body>) -> Self {
        let mut counts = Self::default();
        for body in bodies {
            match body.state {
                HealthState::Susceptible => counts.susceptible += 1,
                HealthState::Infected => counts.infected += 1,
                HealthState::Recovered => counts.recovered += 1,
                HealthState::Deceased => {}
            }
        }
        counts
    }

    pub fn alive(&self) -> u32 {
        self.susceptible + self.infected + self.recovered
    }
}

/// One run of the epidemic
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) bodies: Vec<Body>,
    pub(crate) arena: Arena,
    pub(crate) params: EpidemicParams,
    /// Simulation clock (seconds)
    pub(crate) time: f64,
    pub(crate) frame: u64,
    initial_population: u32,
}

impl SimulationState {
    /// Validate settings, place the population and infect body 0.
    pub fn new(settings: &Settings, arena: Arena) -> Result<Self> {
        settings.validate()?;
        arena.validate_for(settings.max_radius)?;

        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut bodies = Vec::with_capacity(settings.population as usize);
        for id in 0..settings.population {
            let radius = rng.random_range(settings.min_radius..=settings.max_radius);
            let pos = place_outside_cutout(&arena, radius, &mut rng)
                .ok_or(Error::Placement {
                    id,
                    attempts: MAX_PLACEMENT_ATTEMPTS,
                })?;
            let vel = Vec2::new(
                rng.random_range(-settings.speed..=settings.speed),
                rng.random_range(-settings.speed..=settings.speed),
            );
            bodies.push(Body::new(id, pos, vel, radius));
        }

        if let Some(first) = bodies.first_mut() {
            first.enter(HealthState::Infected, 0.0);
        }

        log::info!(
            "Simulation initialized: {} bodies, arena {}x{}, seed {}",
            bodies.len(),
            arena.width,
            arena.height,
            seed
        );

        Ok(Self {
            seed,
            rng,
            bodies,
            arena,
            params: EpidemicParams::new(
                settings.infectious_duration,
                settings.case_fatality,
                settings.model,
            ),
            time: 0.0,
            frame: 0,
            initial_population: settings.population,
        })
    }

    /// Build a state around hand-placed bodies.
    ///
    /// Bodies keep the states they are given; nothing is infected
    /// automatically. Used by tests and demos that need exact layouts.
    pub fn from_bodies(
        bodies: Vec<Body>,
        arena: Arena,
        params: EpidemicParams,
        seed: u64,
    ) -> Self {
        let initial_population = bodies.len() as u32;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bodies,
            arena,
            params,
            time: 0.0,
            frame: 0,
            initial_population,
        }
    }

    /// Active (non-deceased) bodies in stable order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn params(&self) -> &EpidemicParams {
        &self.params
    }

    /// Seconds of simulated time so far
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of steps taken
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn initial_population(&self) -> u32 {
        self.initial_population
    }

    /// Bodies that have died since the start
    pub fn deceased(&self) -> u32 {
        self.initial_population - self.bodies.len() as u32
    }

    pub fn counts(&self) -> Counts {
        Counts::tally(&self.bodies)
    }
}

/// Rejection-sample a center whose disk stays clear of the panel.
fn place_outside_cutout(arena: &Arena, radius: f32, rng: &mut Pcg32) -> Option<Vec2> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = Vec2::new(
            rng.random_range(radius..=arena.width - radius),
            rng.random_range(radius..=arena.height - radius),
        );
        if !arena.overlaps_cutout(pos, radius) {
            return Some(pos);
        }
    }
    log::warn!("Gave up placing a body of radius {radius} outside the panel");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(population: u32) -> Settings {
        Settings {
            population,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_places_population_outside_cutout() {
        let arena = Arena::new(800.0, 600.0, 300.0, 400.0);
        let state = SimulationState::new(&settings(300), arena).unwrap();
        assert_eq!(state.bodies().len(), 300);
        for b in state.bodies() {
            assert!(!arena.overlaps_cutout(b.pos, b.radius), "body {} in panel", b.id);
            assert!(b.pos.x >= b.radius && b.pos.x <= arena.width - b.radius);
            assert!(b.pos.y >= b.radius && b.pos.y <= arena.height - b.radius);
            assert!(b.radius >= 4.0 && b.radius <= 8.0);
            assert!(b.vel.x.abs() <= 60.0 && b.vel.y.abs() <= 60.0);
        }
    }

    #[test]
    fn test_exactly_one_initial_infection() {
        let state = SimulationState::new(&settings(50), Arena::default()).unwrap();
        let counts = state.counts();
        assert_eq!(counts.infected, 1);
        assert_eq!(counts.susceptible, 49);
        assert!(state.bodies()[0].is_infected());
        assert_eq!(state.deceased(), 0);
    }

    #[test]
    fn test_ids_are_sequential() {
        let state = SimulationState::new(&settings(20), Arena::default()).unwrap();
        for (i, b) in state.bodies().iter().enumerate() {
            assert_eq!(b.id, i as u32);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = SimulationState::new(&settings(30), Arena::default()).unwrap();
        let b = SimulationState::new(&settings(30), Arena::default()).unwrap();
        for (x, y) in a.bodies().iter().zip(b.bodies()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let bad = Settings {
            min_radius: 10.0,
            max_radius: 2.0,
            ..settings(10)
        };
        assert!(SimulationState::new(&bad, Arena::default()).is_err());

        // Panel covers the whole surface
        let full = Arena::new(400.0, 400.0, 400.0, 400.0);
        assert!(SimulationState::new(&settings(10), full).is_err());
    }
}
