#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative power-up state for Gravity Well.
//!
//! [`PowerUps`] owns every collectible, timed effect, stored count, and live
//! force source, and drives the pure systems once per frame. Hosts call the
//! `on_*` entry points from the simulation thread, read state through the
//! [`query`] module, and observe changes through the [`EventSink`] supplied at
//! construction.

mod config;

use std::time::Duration;

use glam::Vec2;
use gravity_well_core::{Event, EventSink, PowerUp, PowerUpKind};
use gravity_well_system_collision::CollisionDetector;
use gravity_well_system_effects::EffectRegistry;
use gravity_well_system_force_field::ForceField;
use gravity_well_system_inventory::Inventory;
use gravity_well_system_spawning::Spawning;
use tracing::{debug, trace};

pub use config::{Config, ConfigError, ProfileConfig, WeightsConfig};

/// Forwards events to the host sink, tracing each one on the way.
#[derive(Debug)]
struct Notifier<S> {
    sink: S,
}

impl<S: EventSink> EventSink for Notifier<S> {
    fn emit(&mut self, event: Event) {
        trace!(?event, "power-up event");
        self.sink.emit(event);
    }
}

/// Coordinator that owns the power-up subsystem.
#[derive(Debug)]
pub struct PowerUps<S> {
    spawning: Spawning,
    collision: CollisionDetector,
    effects: EffectRegistry,
    inventory: Inventory,
    force_field: ForceField,
    collectibles: Vec<PowerUp>,
    collected: Vec<PowerUp>,
    notifier: Notifier<S>,
}

impl<S: EventSink> PowerUps<S> {
    /// Builds the subsystem from `config`, delivering notifications to `sink`.
    pub fn new(config: &Config, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            spawning: Spawning::new(config.spawning()?),
            collision: CollisionDetector::new(config.collision_radius),
            effects: EffectRegistry::new(),
            inventory: Inventory::new(),
            force_field: ForceField::new(config.force_field()?),
            collectibles: Vec::new(),
            collected: Vec::new(),
            notifier: Notifier { sink },
        })
    }

    /// Clears every collectible, effect, stored count, and force source and
    /// restarts the spawn clock.
    pub fn on_new_game(&mut self) {
        debug!(
            collectibles = self.collectibles.len(),
            sources = self.force_field.len(),
            "resetting power-ups for a new game"
        );
        self.collectibles.clear();
        self.collected.clear();
        self.effects.clear();
        self.inventory.clear();
        self.force_field.clear();
        self.spawning.reset();
        self.notifier.emit(Event::GameReset);
    }

    /// Advances the subsystem by `dt` with the agent at `agent_position`.
    ///
    /// A zero `dt` changes nothing.
    pub fn on_tick(&mut self, dt: Duration, agent_position: Vec2) {
        if dt.is_zero() {
            return;
        }

        if let Some(power_up) = self.spawning.maybe_spawn(dt, self.collectibles.len()) {
            debug!(
                id = power_up.id.get(),
                kind = %power_up.kind,
                x = power_up.position.x,
                y = power_up.position.y,
                "power-up spawned"
            );
            self.collectibles.push(power_up);
            self.notifier.emit(Event::PowerUpSpawned {
                id: power_up.id,
                kind: power_up.kind,
                position: power_up.position,
            });
        }

        self.effects.tick(dt, &mut self.notifier);
        self.force_field.tick(agent_position, dt, &mut self.notifier);
    }

    /// Collects every power-up the agent touches and routes its effect.
    ///
    /// Time warps start (or restart) their timed effect; fields are banked
    /// in the inventory. Returns whether anything was collected.
    pub fn on_check_collisions(&mut self, agent_position: Vec2) -> bool {
        self.collected.clear();
        self.collision
            .resolve(agent_position, &mut self.collectibles, &mut self.collected);
        if self.collected.is_empty() {
            return false;
        }

        for power_up in self.collected.drain(..) {
            debug!(id = power_up.id.get(), kind = %power_up.kind, "power-up collected");
            self.notifier.emit(Event::PowerUpCollected {
                id: power_up.id,
                kind: power_up.kind,
            });

            match power_up.kind {
                PowerUpKind::TimeWarp => self.effects.apply_timed_effect(
                    power_up.kind,
                    power_up.effect_factor,
                    power_up.duration,
                    &mut self.notifier,
                ),
                PowerUpKind::Singularity | PowerUpKind::Repulsor => {
                    self.inventory.store(power_up.kind, &mut self.notifier);
                }
            }

            self.notifier
                .emit(Event::PowerUpRemoved { id: power_up.id });
        }
        true
    }

    /// Spends one stored power-up of `kind` to place a force source at
    /// `position`.
    ///
    /// Returns `false` without side effects when `kind` is not a field kind
    /// or nothing of that kind is stored.
    pub fn on_activation_request(&mut self, kind: PowerUpKind, position: Vec2) -> bool {
        if !kind.is_field() {
            debug!(kind = %kind, "activation rejected: not a field power-up");
            return false;
        }

        if !self.inventory.try_activate(kind) {
            debug!(kind = %kind, "activation rejected: nothing stored");
            return false;
        }

        match self.force_field.activate(kind, position, &mut self.notifier) {
            Ok(id) => {
                debug!(id = id.get(), kind = %kind, "force source activated");
                true
            }
            Err(error) => {
                debug!(%error, "activation rejected by the force field");
                false
            }
        }
    }

    /// Advances a particle through every live force source for `dt`.
    #[must_use]
    pub fn apply_forces(&self, position: Vec2, velocity: Vec2, dt: Duration) -> (Vec2, Vec2) {
        self.force_field.apply_force(position, velocity, dt)
    }

    /// Advances a particle of the given mass through every live source.
    #[must_use]
    pub fn apply_forces_with_mass(
        &self,
        position: Vec2,
        velocity: Vec2,
        mass: f32,
        dt: Duration,
    ) -> (Vec2, Vec2) {
        self.force_field
            .apply_force_with_mass(position, velocity, mass, dt)
    }

    /// Read access to the sink supplied at construction.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.notifier.sink
    }

    /// Mutable access to the sink, e.g. to drain buffered events.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.notifier.sink
    }

    /// Consumes the coordinator, returning its sink.
    pub fn into_sink(self) -> S {
        self.notifier.sink
    }
}

/// Query functions that provide read-only access to the power-up state.
pub mod query {
    use std::{collections::BTreeMap, time::Duration};

    use super::PowerUps;
    use gravity_well_core::{CollectibleView, EffectView, ForceSourceView, PowerUpKind};

    /// Multiplier reported by the timed effect of `kind`, or the neutral value.
    #[must_use]
    pub fn current_multiplier<S>(power_ups: &PowerUps<S>, kind: PowerUpKind) -> f32 {
        power_ups.effects.current_multiplier(kind)
    }

    /// Whether a timed effect of `kind` is running.
    #[must_use]
    pub fn is_active<S>(power_ups: &PowerUps<S>, kind: PowerUpKind) -> bool {
        power_ups.effects.is_active(kind)
    }

    /// Time left on the timed effect of `kind`; zero when inactive.
    #[must_use]
    pub fn remaining<S>(power_ups: &PowerUps<S>, kind: PowerUpKind) -> Duration {
        power_ups.effects.remaining(kind)
    }

    /// Number of stored power-ups of `kind`.
    #[must_use]
    pub fn stored_count<S>(power_ups: &PowerUps<S>, kind: PowerUpKind) -> u32 {
        power_ups.inventory.count(kind)
    }

    /// Owned copy of every non-zero stored count.
    #[must_use]
    pub fn all_stored_counts<S>(power_ups: &PowerUps<S>) -> BTreeMap<PowerUpKind, u32> {
        power_ups.inventory.snapshot()
    }

    /// Captures the uncollected power-ups.
    #[must_use]
    pub fn collectibles<S>(power_ups: &PowerUps<S>) -> CollectibleView {
        CollectibleView::from_snapshots(power_ups.collectibles.clone())
    }

    /// Captures the running timed effects.
    #[must_use]
    pub fn effects<S>(power_ups: &PowerUps<S>) -> EffectView {
        power_ups.effects.view()
    }

    /// Captures the live force sources.
    #[must_use]
    pub fn force_sources<S>(power_ups: &PowerUps<S>) -> ForceSourceView {
        power_ups.force_field.view()
    }
}
