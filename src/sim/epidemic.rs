//! Disease progression for a single body
//!
//! Susceptible bodies only change through contact (see `collision`).
//! Infected bodies face a constant death hazard every step and recover once
//! they have been infected for the full infectious duration. In the SIRS
//! variant recovered bodies lose their immunity after a fixed time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, HealthState};

/// Which compartmental model to run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum EpidemicModel {
    /// Recovery is permanent
    #[default]
    Sir,
    /// Recovered bodies become susceptible again after `immunity_duration` seconds
    Sirs { immunity_duration: f32 },
}

/// Parameters of the state machine, derived once from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpidemicParams {
    /// Seconds from infection to recovery
    pub infectious_duration: f32,
    /// Per-second death hazard while infected
    pub death_rate: f32,
    pub model: EpidemicModel,
}

impl EpidemicParams {
    pub fn new(infectious_duration: f32, case_fatality: f32, model: EpidemicModel) -> Self {
        Self {
            infectious_duration,
            death_rate: death_rate(case_fatality, infectious_duration),
            model,
        }
    }
}

/// Constant hazard whose cumulative death probability over
/// `infectious_duration` equals `case_fatality`.
///
/// A case fatality of 1 gives an infinite rate: the first draw always kills.
pub fn death_rate(case_fatality: f32, infectious_duration: f32) -> f32 {
    -(1.0 - case_fatality).ln() / infectious_duration
}

/// Evaluate one step of `body`'s state machine.
///
/// The death draw comes first and short-circuits recovery. Returns the new
/// state if a transition happened.
pub fn advance<R: Rng>(
    body: &mut Body,
    now: f64,
    dt: f32,
    params: &EpidemicParams,
    rng: &mut R,
) -> Option<HealthState> {
    match body.state {
        HealthState::Infected => {
            let draw: f32 = rng.random();
            if draw < params.death_rate * dt {
                body.enter(HealthState::Deceased, now);
                return Some(HealthState::Deceased);
            }
            if body.dwell_time(now) >= f64::from(params.infectious_duration) {
                body.enter(HealthState::Recovered, now);
                return Some(HealthState::Recovered);
            }
            None
        }
        HealthState::Recovered => match params.model {
            EpidemicModel::Sirs { immunity_duration }
                if body.dwell_time(now) >= f64::from(immunity_duration) =>
            {
                body.enter(HealthState::Susceptible, now);
                Some(HealthState::Susceptible)
            }
            _ => None,
        },
        HealthState::Susceptible | HealthState::Deceased => None,
    }
}
