#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Live force sources and the acceleration they exert on particles.
//!
//! A singularity pulls particles toward the point where it was activated; a
//! repulsor pushes particles away from the agent it follows. Every source
//! lives for a bounded time and is removed in the tick its lifespan runs out.
//!
//! Particles are advanced with semi-implicit Euler: the accelerations of all
//! live sources are summed first, velocity is integrated, and the new
//! velocity then moves the position. Summing before integrating keeps the
//! result independent of source order.

use std::time::Duration;

use glam::Vec2;
use gravity_well_core::{
    Event, EventSink, ForceSourceId, ForceSourceSnapshot, ForceSourceView, PowerUpKind,
};
use thiserror::Error;

/// Scales the inverse-square acceleration of every source.
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f32 = 200_000.0;
/// Separation below which the acceleration stops growing.
pub const DEFAULT_MIN_DISTANCE: f32 = 10.0;
/// Mass assumed for particles that do not specify one.
pub const DEFAULT_PARTICLE_MASS: f32 = 1.0;
/// Lifespan of a freshly activated source.
pub const DEFAULT_LIFESPAN: Duration = Duration::from_secs(5);
/// Length of one cycle of a source's pulse animation.
pub const DEFAULT_PULSE_PERIOD: Duration = Duration::from_millis(800);

/// Reasons an activation request is refused by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// Only stored field kinds produce force sources.
    #[error("{0} power-ups do not produce a force field")]
    NotAFieldKind(PowerUpKind),
}

/// Configuration parameters required to construct the simulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    gravitational_constant: f32,
    min_distance: f32,
    particle_mass: f32,
    singularity_lifespan: Duration,
    repulsor_lifespan: Duration,
    pulse_period: Duration,
}

impl Config {
    /// Creates a configuration with the provided force constant and
    /// separation clamp; every other value uses its default.
    #[must_use]
    pub const fn new(gravitational_constant: f32, min_distance: f32) -> Self {
        Self {
            gravitational_constant,
            min_distance,
            particle_mass: DEFAULT_PARTICLE_MASS,
            singularity_lifespan: DEFAULT_LIFESPAN,
            repulsor_lifespan: DEFAULT_LIFESPAN,
            pulse_period: DEFAULT_PULSE_PERIOD,
        }
    }

    /// Overrides how long each kind of source lives.
    #[must_use]
    pub const fn with_lifespans(mut self, singularity: Duration, repulsor: Duration) -> Self {
        self.singularity_lifespan = singularity;
        self.repulsor_lifespan = repulsor;
        self
    }

    /// Overrides the mass used by [`ForceField::apply_force`].
    #[must_use]
    pub const fn with_particle_mass(mut self, particle_mass: f32) -> Self {
        self.particle_mass = particle_mass;
        self
    }

    /// Overrides the pulse animation period.
    #[must_use]
    pub const fn with_pulse_period(mut self, pulse_period: Duration) -> Self {
        self.pulse_period = pulse_period;
        self
    }

    /// Lifespan granted to a source of `kind`.
    #[must_use]
    pub const fn lifespan(&self, kind: PowerUpKind) -> Duration {
        match kind {
            PowerUpKind::Repulsor => self.repulsor_lifespan,
            PowerUpKind::Singularity | PowerUpKind::TimeWarp => self.singularity_lifespan,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_MIN_DISTANCE)
    }
}

/// Looping animation state attached to a live source.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Pulse {
    phase: f32,
    period: Duration,
    running: bool,
}

impl Pulse {
    fn start(period: Duration) -> Self {
        Self {
            phase: 0.0,
            period,
            running: true,
        }
    }

    fn advance(&mut self, dt: Duration) {
        if !self.running || self.period.is_zero() {
            return;
        }
        self.phase = (self.phase + dt.as_secs_f32() / self.period.as_secs_f32()).fract();
    }

    fn halt(&mut self) {
        self.running = false;
        self.phase = 0.0;
    }
}

#[derive(Clone, Copy, Debug)]
struct ForceSource {
    id: ForceSourceId,
    kind: PowerUpKind,
    position: Vec2,
    strength_sign: f32,
    follows_agent: bool,
    lifespan: Duration,
    elapsed: Duration,
    pulse: Pulse,
}

impl ForceSource {
    /// Advances the source's life by `dt`, returning whether it lives on.
    fn update(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.lifespan {
            return false;
        }
        self.pulse.advance(dt);
        true
    }

    fn remaining(&self) -> Duration {
        self.lifespan.saturating_sub(self.elapsed)
    }

    fn acceleration_at(&self, point: Vec2, config: &Config, mass: f32) -> Vec2 {
        let offset = point - self.position;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            // Direction is undefined when the particle sits on the source.
            return Vec2::ZERO;
        }

        let clamped = distance.max(config.min_distance);
        let magnitude = config.gravitational_constant / (clamped * clamped * mass);
        let outward = offset / distance;
        -outward * magnitude * self.strength_sign
    }

    fn snapshot(&self) -> ForceSourceSnapshot {
        ForceSourceSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            strength_sign: self.strength_sign,
            follows_agent: self.follows_agent,
            remaining: self.remaining(),
            pulse_phase: self.pulse.phase,
        }
    }
}

/// Owner of every live force source.
#[derive(Debug)]
pub struct ForceField {
    config: Config,
    sources: Vec<ForceSource>,
    next_id: u32,
}

impl ForceField {
    /// Creates a simulator with no live sources.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sources: Vec::new(),
            next_id: 0,
        }
    }

    /// Places a new source of `kind` at `position`.
    ///
    /// Singularities attract and stay where they were placed; repulsors repel
    /// and follow the agent from the next tick on.
    pub fn activate<S: EventSink + ?Sized>(
        &mut self,
        kind: PowerUpKind,
        position: Vec2,
        sink: &mut S,
    ) -> Result<ForceSourceId, ActivationError> {
        let (strength_sign, follows_agent) = match kind {
            PowerUpKind::Singularity => (1.0, false),
            PowerUpKind::Repulsor => (-1.0, true),
            PowerUpKind::TimeWarp => return Err(ActivationError::NotAFieldKind(kind)),
        };

        let id = ForceSourceId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.sources.push(ForceSource {
            id,
            kind,
            position,
            strength_sign,
            follows_agent,
            lifespan: self.config.lifespan(kind),
            elapsed: Duration::ZERO,
            pulse: Pulse::start(self.config.pulse_period),
        });
        sink.emit(Event::ForceSourceActivated { id, kind, position });
        Ok(id)
    }

    /// Moves following sources onto the agent and ages every source by `dt`,
    /// removing the ones whose lifespan ran out.
    pub fn tick<S: EventSink + ?Sized>(&mut self, agent_position: Vec2, dt: Duration, sink: &mut S) {
        if dt.is_zero() || self.sources.is_empty() {
            return;
        }

        self.sources.retain_mut(|source| {
            if source.follows_agent && source.position != agent_position {
                source.position = agent_position;
                sink.emit(Event::ForceSourceMoved {
                    id: source.id,
                    position: agent_position,
                });
            }

            if source.update(dt) {
                return true;
            }

            source.pulse.halt();
            sink.emit(Event::ForceSourceExpired {
                id: source.id,
                kind: source.kind,
            });
            false
        });
    }

    /// Advances a unit-mass particle through the field for `dt`.
    ///
    /// Returns the new `(position, velocity)`. Without live sources the
    /// particle simply coasts.
    #[must_use]
    pub fn apply_force(&self, position: Vec2, velocity: Vec2, dt: Duration) -> (Vec2, Vec2) {
        self.apply_force_with_mass(position, velocity, self.config.particle_mass, dt)
    }

    /// Advances a particle of the given mass through the field for `dt`.
    #[must_use]
    pub fn apply_force_with_mass(
        &self,
        position: Vec2,
        velocity: Vec2,
        mass: f32,
        dt: Duration,
    ) -> (Vec2, Vec2) {
        if dt.is_zero() {
            return (position, velocity);
        }

        let seconds = dt.as_secs_f32();
        let velocity = velocity + self.acceleration_at(position, mass) * seconds;
        (position + velocity * seconds, velocity)
    }

    /// Summed acceleration of every live source on a particle at `point`.
    ///
    /// Non-positive or non-finite masses exert no acceleration.
    #[must_use]
    pub fn acceleration_at(&self, point: Vec2, mass: f32) -> Vec2 {
        if !(mass.is_finite() && mass > 0.0) {
            return Vec2::ZERO;
        }
        self.sources
            .iter()
            .map(|source| source.acceleration_at(point, &self.config, mass))
            .sum()
    }

    /// Captures an owned snapshot of every live source.
    #[must_use]
    pub fn view(&self) -> ForceSourceView {
        ForceSourceView::from_snapshots(self.sources.iter().map(ForceSource::snapshot).collect())
    }

    /// Number of live sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no source is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Halts and drops every source and restarts identifier allocation.
    pub fn clear(&mut self) {
        for source in &mut self.sources {
            source.pulse.halt();
        }
        self.sources.clear();
        self.next_id = 0;
    }
}

impl Default for ForceField {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(kind: PowerUpKind, position: Vec2, sign: f32) -> ForceSource {
        ForceSource {
            id: ForceSourceId::new(0),
            kind,
            position,
            strength_sign: sign,
            follows_agent: false,
            lifespan: Duration::from_secs(1),
            elapsed: Duration::ZERO,
            pulse: Pulse::start(Duration::from_secs(1)),
        }
    }

    #[test]
    fn acceleration_is_clamped_near_the_source() {
        let config = Config::new(100.0, 10.0);
        let singularity = source(PowerUpKind::Singularity, Vec2::ZERO, 1.0);

        let near = singularity.acceleration_at(Vec2::new(0.001, 0.0), &config, 1.0);
        let at_clamp = singularity.acceleration_at(Vec2::new(10.0, 0.0), &config, 1.0);

        assert!(near.is_finite());
        assert!((near.length() - 1.0).abs() < 1e-4);
        assert!((at_clamp.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn coincident_particle_feels_no_force() {
        let config = Config::default();
        let singularity = source(PowerUpKind::Singularity, Vec2::new(5.0, 5.0), 1.0);
        assert_eq!(
            singularity.acceleration_at(Vec2::new(5.0, 5.0), &config, 1.0),
            Vec2::ZERO
        );
    }

    #[test]
    fn inverse_square_falloff_beyond_clamp() {
        let config = Config::new(1_000.0, 1.0);
        let singularity = source(PowerUpKind::Singularity, Vec2::ZERO, 1.0);

        let at_ten = singularity.acceleration_at(Vec2::new(10.0, 0.0), &config, 1.0);
        let at_twenty = singularity.acceleration_at(Vec2::new(20.0, 0.0), &config, 1.0);

        assert!((at_ten.length() / at_twenty.length() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn heavier_particles_accelerate_less() {
        let config = Config::new(1_000.0, 1.0);
        let singularity = source(PowerUpKind::Singularity, Vec2::ZERO, 1.0);

        let light = singularity.acceleration_at(Vec2::new(10.0, 0.0), &config, 1.0);
        let heavy = singularity.acceleration_at(Vec2::new(10.0, 0.0), &config, 4.0);

        assert!((light.length() / heavy.length() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn update_reports_expiry_once_lifespan_elapses() {
        let mut singularity = source(PowerUpKind::Singularity, Vec2::ZERO, 1.0);
        assert!(singularity.update(Duration::from_millis(600)));
        assert!(!singularity.update(Duration::from_millis(400)));
    }

    #[test]
    fn pulse_wraps_and_stops_when_halted() {
        let mut pulse = Pulse::start(Duration::from_secs(1));
        pulse.advance(Duration::from_millis(1_250));
        assert!((pulse.phase - 0.25).abs() < 1e-4);

        pulse.halt();
        pulse.advance(Duration::from_millis(500));
        assert!(!pulse.running);
        assert_eq!(pulse.phase, 0.0);
    }
}
