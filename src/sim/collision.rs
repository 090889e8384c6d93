//! Pairwise contact detection, elastic response and transmission
//!
//! Every unordered pair is tested each step (O(n²)). Disks have equal
//! density in 2D terms so mass is taken proportional to radius, and the
//! response is the standard equal-restitution elastic impulse along the
//! center-to-center axis.

use super::body::{Body, HealthState};

/// Per-pass counters, mostly for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactStats {
    /// Overlapping pairs
    pub contacts: usize,
    /// Overlapping pairs that were approaching and got an impulse
    pub impulses: usize,
    /// Susceptible bodies infected during the pass
    pub transmissions: usize,
}

/// Resolve all contacts among `bodies` in place.
///
/// Transmission happens on overlap, before the approach test, so an
/// overlapping pair that is already separating still passes the infection
/// on. A body infected earlier in the pass is infectious for later pairs.
pub fn detect_and_resolve(bodies: &mut [Body], now: f64) -> ContactStats {
    let mut stats = ContactStats::default();

    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let reach = a.radius + b.radius;
            let d = a.pos - b.pos;
            let d2 = d.length_squared();
            if d2 > reach * reach {
                continue;
            }
            stats.contacts += 1;

            if transmit(a, b, now) {
                stats.transmissions += 1;
            }

            if resolve_pair(a, b) {
                stats.impulses += 1;
            }
        }
    }

    stats
}

/// Infect the susceptible member of a Susceptible/Infected pair.
fn transmit(a: &mut Body, b: &mut Body, now: f64) -> bool {
    match (a.state, b.state) {
        (HealthState::Susceptible, HealthState::Infected) => {
            a.enter(HealthState::Infected, now);
            true
        }
        (HealthState::Infected, HealthState::Susceptible) => {
            b.enter(HealthState::Infected, now);
            true
        }
        _ => false,
    }
}

/// Apply the elastic impulse to a touching pair.
///
/// Returns false without touching velocities when the pair is separating or
/// at rest relative to each other along the axis (`inp >= 0`), which also
/// covers coincident centers.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> bool {
    let d = a.pos - b.pos;
    let dv = a.vel - b.vel;
    let inp = dv.dot(d);
    if inp >= 0.0 {
        return false;
    }

    let (ma, mb) = (a.mass(), b.mass());
    let pref = 2.0 * mb / (ma + mb) * inp / d.length_squared();

    a.vel -= d * pref;
    b.vel += d * (ma / mb * pref);
    true
}
