//! Per-frame simulation step
//!
//! The order inside a step matters and is fixed: disease progression,
//! head count, removal of the dead, collisions (with transmission), then
//! wall reflection and motion.

use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::HealthState;
use super::collision::detect_and_resolve;
use super::epidemic::advance;
use super::state::{Counts, SimulationState};

/// Host-provided input for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest surface size, if the host has one; applied before the step
    pub arena: Option<Arena>,
}

/// Aggregate counts for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    /// Simulation clock after the step (seconds)
    pub time: f64,
    pub susceptible: u32,
    pub infected: u32,
    pub recovered: u32,
    /// Cumulative deaths since the start
    pub deceased: u32,
}

impl FrameSummary {
    pub fn total(&self) -> u32 {
        self.susceptible + self.infected + self.recovered + self.deceased
    }
}

/// Advance the simulation by `dt` seconds.
///
/// `dt` must already be sane; the host drops frames whose delta is too
/// large (see `consts::MAX_FRAME_DT`).
pub fn tick(state: &mut SimulationState, input: &TickInput, dt: f32) -> FrameSummary {
    if let Some(arena) = input.arena {
        if arena != state.arena {
            log::debug!("Arena resized to {}x{}", arena.width, arena.height);
            state.arena = arena;
        }
    }

    state.frame += 1;
    state.time += f64::from(dt);
    let now = state.time;

    // Disease progression
    let had_infections = state.bodies.iter().any(|b| b.is_infected());
    for body in &mut state.bodies {
        advance(body, now, dt, &state.params, &mut state.rng);
    }

    // Head count before the dead leave
    let counts = Counts::tally(&state.bodies);
    state.bodies.retain(|b| b.state != HealthState::Deceased);

    if had_infections && counts.infected == 0 {
        log::info!("No infections left at t = {:.1}s", now);
    }

    // Collisions and transmission
    let contacts = detect_and_resolve(&mut state.bodies, now);
    if contacts.transmissions > 0 {
        log::debug!(
            "Frame {}: {} new infections from {} contacts",
            state.frame,
            contacts.transmissions,
            contacts.contacts
        );
    }

    // Walls, then motion
    let arena = state.arena;
    for body in &mut state.bodies {
        body.vel = arena.reflect(body.pos, body.vel, body.radius);
        body.pos += body.vel * dt;
    }

    FrameSummary {
        time: now,
        susceptible: counts.susceptible,
        infected: counts.infected,
        recovered: counts.recovered,
        deceased: state.deceased(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::body::Body;
    use crate::sim::epidemic::{EpidemicModel, EpidemicParams};
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 128.0;

    fn lone_infected(case_fatality: f32) -> SimulationState {
        let mut body = Body::new(0, Vec2::new(100.0, 300.0), Vec2::ZERO, 5.0);
        body.enter(HealthState::Infected, 0.0);
        SimulationState::from_bodies(
            vec![body],
            Arena::new(800.0, 600.0, 200.0, 200.0),
            EpidemicParams::new(1.0, case_fatality, EpidemicModel::Sir),
            7,
        )
    }

    #[test]
    fn test_lone_infected_recovers_after_duration() {
        let mut state = lone_infected(0.0);
        let input = TickInput::default();

        // 127 ticks: 0.9921875 s, still infected
        for _ in 0..127 {
            tick(&mut state, &input, DT);
        }
        assert!(state.bodies()[0].is_infected());

        let summary = tick(&mut state, &input, DT);
        assert_eq!(state.time(), 1.0);
        assert_eq!(state.bodies()[0].state, HealthState::Recovered);
        assert_eq!(summary.recovered, 1);
        assert_eq!(summary.deceased, 0);
    }

    #[test]
    fn test_certain_death_removes_body() {
        let mut state = lone_infected(1.0);
        let summary = tick(&mut state, &TickInput::default(), DT);
        assert!(state.bodies().is_empty());
        assert_eq!(summary.deceased, 1);
        assert_eq!(summary.infected, 0);
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn test_contact_infects_on_same_tick() {
        let mut a = Body::new(0, Vec2::new(300.0, 300.0), Vec2::new(5.0, 0.0), 6.0);
        let b = Body::new(1, Vec2::new(310.0, 300.0), Vec2::new(-5.0, 0.0), 6.0);
        a.enter(HealthState::Infected, 0.0);
        let mut state = SimulationState::from_bodies(
            vec![a, b],
            Arena::new(800.0, 600.0, 200.0, 200.0),
            EpidemicParams::new(10.0, 0.0, EpidemicModel::Sir),
            1,
        );

        let summary = tick(&mut state, &TickInput::default(), DT);
        assert!(state.bodies()[1].is_infected());
        assert_eq!(state.bodies()[1].state_entered_at, f64::from(DT));
        // Counts are taken before collisions, so the frame still shows one
        assert_eq!(summary.infected, 1);
        assert_eq!(summary.susceptible, 1);
        // The pair bounced apart
        assert!(state.bodies()[0].vel.x < 0.0);
        assert!(state.bodies()[1].vel.x > 0.0);
    }

    fn infected_pair(case_fatality: f32) -> SimulationState {
        let mut a = Body::new(0, Vec2::new(300.0, 300.0), Vec2::new(5.0, 0.0), 6.0);
        let b = Body::new(1, Vec2::new(308.0, 300.0), Vec2::new(-5.0, 0.0), 6.0);
        a.enter(HealthState::Infected, 0.0);
        SimulationState::from_bodies(
            vec![a, b],
            Arena::new(800.0, 600.0, 200.0, 200.0),
            EpidemicParams::new(10.0, case_fatality, EpidemicModel::Sir),
            3,
        )
    }

    #[test]
    fn test_body_dying_this_tick_does_not_transmit() {
        let mut state = infected_pair(1.0);
        let summary = tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.bodies().len(), 1);
        assert_eq!(state.bodies()[0].id, 1);
        assert_eq!(state.bodies()[0].state, HealthState::Susceptible);
        assert_eq!(summary.deceased, 1);
    }

    #[test]
    fn test_newly_infected_waits_for_next_tick() {
        let mut state = infected_pair(0.0);
        let input = TickInput::default();
        tick(&mut state, &input, DT);
        assert!(state.bodies()[1].is_infected());

        // Only the infector drew from the RNG this tick
        let mut expected = Pcg32::seed_from_u64(3);
        let _: f32 = expected.random();
        assert_eq!(state.rng.random::<u64>(), expected.random::<u64>());

        // Under certain death the new case dies on its first evaluation
        state.params = EpidemicParams::new(10.0, 1.0, EpidemicModel::Sir);
        let summary = tick(&mut state, &input, DT);
        assert!(state.bodies().is_empty());
        assert_eq!(summary.deceased, 2);
    }

    #[test]
    fn test_resize_applies_before_motion() {
        let mut body = Body::new(0, Vec2::new(395.0, 100.0), Vec2::new(50.0, 0.0), 10.0);
        body.enter(HealthState::Recovered, 0.0);
        let mut state = SimulationState::from_bodies(
            vec![body],
            Arena::new(800.0, 600.0, 0.0, 0.0),
            EpidemicParams::new(10.0, 0.0, EpidemicModel::Sir),
            1,
        );

        // Shrink the surface so the body now touches the right wall
        let input = TickInput {
            arena: Some(Arena::new(400.0, 600.0, 0.0, 0.0)),
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.arena().width, 400.0);
        assert!(state.bodies()[0].vel.x < 0.0);
    }

    fn run_population(seed: u64, case_fatality: f32, model: EpidemicModel, ticks: usize) {
        let settings = Settings {
            population: 120,
            min_radius: 5.0,
            max_radius: 10.0,
            speed: 150.0,
            infectious_duration: 2.0,
            case_fatality,
            model,
            seed: Some(seed),
        };
        let arena = Arena::new(640.0, 480.0, 200.0, 240.0);
        let mut state = SimulationState::new(&settings, arena).unwrap();
        let input = TickInput::default();
        let dt = 1.0 / 60.0;

        let mut last_deceased = 0;
        let mut previous: Vec<(u32, HealthState)> =
            state.bodies().iter().map(|b| (b.id, b.state)).collect();

        for _ in 0..ticks {
            // Bodies reachable from an infected body through a chain of
            // overlaps; infection can pass along a chain within one pass
            let bodies = state.bodies();
            let touching = |a: &Body, b: &Body| {
                (a.pos - b.pos).length_squared() <= (a.radius + b.radius) * (a.radius + b.radius)
            };
            let mut reached: Vec<bool> = bodies.iter().map(|b| b.is_infected()).collect();
            let mut grew = true;
            while grew {
                grew = false;
                for i in 0..bodies.len() {
                    if reached[i] {
                        continue;
                    }
                    let exposed_here = (0..bodies.len())
                        .any(|j| j != i && reached[j] && touching(&bodies[i], &bodies[j]));
                    if exposed_here {
                        reached[i] = true;
                        grew = true;
                    }
                }
            }
            let exposed: Vec<u32> = bodies
                .iter()
                .zip(&reached)
                .filter(|(_, r)| **r)
                .map(|(b, _)| b.id)
                .collect();

            let summary = tick(&mut state, &input, dt);

            // Population conservation
            assert_eq!(summary.total(), settings.population);
            // Deaths never decrease
            assert!(summary.deceased >= last_deceased);
            last_deceased = summary.deceased;

            // Transmission locality
            for b in state.bodies() {
                let before = previous.iter().find(|(id, _)| *id == b.id).map(|p| p.1);
                if before == Some(HealthState::Susceptible) && b.is_infected() {
                    assert!(exposed.contains(&b.id), "body {} infected without contact", b.id);
                }
            }
            previous = state.bodies().iter().map(|b| (b.id, b.state)).collect();

            // Containment against the left and bottom walls, with one frame
            // of travel as slack. Top and right are only approximate where
            // they meet the panel, so they are not checked here.
            let arena = state.arena();
            for b in state.bodies() {
                let slack = b.radius + b.vel.length() * dt;
                assert!(b.pos.x >= -slack, "body {} left the arena", b.id);
                assert!(b.pos.y <= arena.height + slack, "body {} left the arena", b.id);
                assert!(b.pos.is_finite());
            }
        }
    }

    #[test]
    fn test_sir_population_invariants() {
        run_population(11, 0.3, EpidemicModel::Sir, 900);
    }

    #[test]
    fn test_sirs_population_invariants() {
        let model = EpidemicModel::Sirs {
            immunity_duration: 1.5,
        };
        run_population(12, 0.2, model, 900);
    }
}
