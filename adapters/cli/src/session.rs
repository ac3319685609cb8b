//! Scripted headless session: an agent chases collectibles across the field,
//! spends every stored field as soon as it has one, and a cloud of debris is
//! pushed around by whatever sources are live.

use std::{collections::BTreeMap, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use gravity_well_core::{Event, EventSink, PlayField, PowerUpKind};
use gravity_well_world::{query, Config, PowerUps};
use serde::Serialize;
use tracing::info;

/// Fixed simulation step, roughly one frame at 60 Hz.
pub(crate) const FRAME: Duration = Duration::from_micros(16_667);

const AGENT_SPEED: f32 = 240.0;
const DEBRIS_COLUMNS: u16 = 8;
const DEBRIS_ROWS: u16 = 6;

/// Running count of every notification the simulation produced.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub(crate) struct Tally {
    spawned: u32,
    collected: u32,
    removed: u32,
    effects_started: u32,
    effects_ended: u32,
    stored: u32,
    activated: u32,
    moved: u32,
    expired: u32,
    resets: u32,
}

impl EventSink for Tally {
    fn emit(&mut self, event: Event) {
        let counter = match event {
            Event::PowerUpSpawned { .. } => &mut self.spawned,
            Event::PowerUpCollected { .. } => &mut self.collected,
            Event::PowerUpRemoved { .. } => &mut self.removed,
            Event::EffectStarted { .. } => &mut self.effects_started,
            Event::EffectEnded { .. } => &mut self.effects_ended,
            Event::PowerUpStored { .. } => &mut self.stored,
            Event::ForceSourceActivated { .. } => &mut self.activated,
            Event::ForceSourceMoved { .. } => &mut self.moved,
            Event::ForceSourceExpired { .. } => &mut self.expired,
            Event::GameReset => &mut self.resets,
        };
        *counter = counter.saturating_add(1);
    }
}

#[derive(Clone, Copy, Debug)]
struct Particle {
    position: Vec2,
    velocity: Vec2,
}

/// Aggregate motion of the debris cloud.
#[derive(Clone, Copy, Debug, Serialize)]
pub(crate) struct DebrisStats {
    pub(crate) particles: usize,
    pub(crate) mean_speed: f32,
    pub(crate) max_speed: f32,
    pub(crate) centroid: [f32; 2],
}

/// Everything reported at the end of a run.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct Summary {
    pub(crate) ticks: u32,
    pub(crate) simulated_seconds: f32,
    pub(crate) events: Tally,
    pub(crate) stored: BTreeMap<&'static str, u32>,
    pub(crate) collectibles: usize,
    pub(crate) force_sources: usize,
    pub(crate) time_warp_remaining_seconds: f32,
    pub(crate) debris: DebrisStats,
}

/// Host loop around [`PowerUps`].
#[derive(Debug)]
pub(crate) struct Session {
    power_ups: PowerUps<Tally>,
    field: PlayField,
    agent: Vec2,
    debris: Vec<Particle>,
    ticks: u32,
    elapsed: Duration,
}

impl Session {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let power_ups =
            PowerUps::new(config, Tally::default()).context("invalid simulation configuration")?;
        let field = config.play_field();

        Ok(Self {
            power_ups,
            field,
            agent: field.center(),
            debris: scatter_debris(field),
            ticks: 0,
            elapsed: Duration::ZERO,
        })
    }

    pub(crate) fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step();
        }
        info!(
            ticks = self.ticks,
            seconds = self.elapsed.as_secs_f32(),
            "session finished"
        );
    }

    fn step(&mut self) {
        self.power_ups.on_tick(FRAME, self.agent);

        // Time warp slows the world, not the power-up clocks.
        let warp = query::current_multiplier(&self.power_ups, PowerUpKind::TimeWarp).max(0.0);
        let world_dt = Duration::try_from_secs_f32(FRAME.as_secs_f32() * warp).unwrap_or(FRAME);

        self.agent = self.steer_agent(world_dt);
        if self.power_ups.on_check_collisions(self.agent) {
            info!(
                x = self.agent.x,
                y = self.agent.y,
                stored = ?query::all_stored_counts(&self.power_ups),
                "agent picked up power-ups"
            );
        }

        for (kind, at) in [
            (PowerUpKind::Singularity, self.field.center()),
            (PowerUpKind::Repulsor, self.agent),
        ] {
            if query::stored_count(&self.power_ups, kind) > 0 {
                let _ = self.power_ups.on_activation_request(kind, at);
            }
        }

        for particle in &mut self.debris {
            let (position, velocity) =
                self.power_ups
                    .apply_forces(particle.position, particle.velocity, world_dt);
            particle.position = wrap(position, self.field);
            particle.velocity = velocity;
        }

        self.ticks = self.ticks.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(FRAME);
    }

    /// Moves the agent toward the nearest collectible, or along a slow loop
    /// around the centre when the field is empty.
    fn steer_agent(&self, dt: Duration) -> Vec2 {
        let target = query::collectibles(&self.power_ups)
            .iter()
            .map(|power_up| power_up.position)
            .min_by(|a, b| {
                a.distance_squared(self.agent)
                    .total_cmp(&b.distance_squared(self.agent))
            })
            .unwrap_or_else(|| {
                let t = self.elapsed.as_secs_f32();
                self.field.center()
                    + Vec2::new(
                        self.field.width() * 0.3 * (t * 0.7).cos(),
                        self.field.height() * 0.3 * (t * 0.9).sin(),
                    )
            });

        let step = AGENT_SPEED * dt.as_secs_f32();
        let offset = target - self.agent;
        if offset.length() <= step {
            target
        } else {
            self.agent + offset.normalize_or_zero() * step
        }
    }

    pub(crate) fn summary(&self) -> Summary {
        let stored = query::all_stored_counts(&self.power_ups)
            .into_iter()
            .map(|(kind, count)| (kind.label(), count))
            .collect();

        Summary {
            ticks: self.ticks,
            simulated_seconds: self.elapsed.as_secs_f32(),
            events: *self.power_ups.sink(),
            stored,
            collectibles: query::collectibles(&self.power_ups).len(),
            force_sources: query::force_sources(&self.power_ups).len(),
            time_warp_remaining_seconds: query::remaining(&self.power_ups, PowerUpKind::TimeWarp)
                .as_secs_f32(),
            debris: debris_stats(&self.debris),
        }
    }
}

fn scatter_debris(field: PlayField) -> Vec<Particle> {
    let spacing = Vec2::new(
        field.width() / f32::from(DEBRIS_COLUMNS + 1),
        field.height() / f32::from(DEBRIS_ROWS + 1),
    );
    (1..=DEBRIS_ROWS)
        .flat_map(|row| (1..=DEBRIS_COLUMNS).map(move |column| (column, row)))
        .map(|(column, row)| Particle {
            position: spacing * Vec2::new(f32::from(column), f32::from(row)),
            velocity: Vec2::ZERO,
        })
        .collect()
}

fn wrap(position: Vec2, field: PlayField) -> Vec2 {
    Vec2::new(
        position.x.rem_euclid(field.width()),
        position.y.rem_euclid(field.height()),
    )
}

fn debris_stats(debris: &[Particle]) -> DebrisStats {
    if debris.is_empty() {
        return DebrisStats {
            particles: 0,
            mean_speed: 0.0,
            max_speed: 0.0,
            centroid: [0.0, 0.0],
        };
    }

    let count = debris.len() as f32;
    let speeds = debris.iter().map(|particle| particle.velocity.length());
    let centroid = debris.iter().map(|particle| particle.position).sum::<Vec2>() / count;
    DebrisStats {
        particles: debris.len(),
        mean_speed: speeds.clone().sum::<f32>() / count,
        max_speed: speeds.fold(0.0, f32::max),
        centroid: centroid.to_array(),
    }
}
