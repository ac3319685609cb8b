#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bookkeeping for timed buffs: at most one running effect per kind, counted
//! down by simulation time and retired in the tick it runs out.

use std::time::Duration;

use gravity_well_core::{
    EffectSnapshot, EffectView, Event, EventSink, PowerUpKind, NEUTRAL_MULTIPLIER,
};

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveEffect {
    kind: PowerUpKind,
    effect_factor: f32,
    remaining: Duration,
}

/// Registry of running timed effects.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    effects: Vec<ActiveEffect>,
}

impl EffectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the effect for `kind`, replacing any effect of the same kind.
    ///
    /// Effects never stack: a second application restarts the countdown at
    /// `duration` and reports `factor` from then on.
    pub fn apply_timed_effect<S: EventSink + ?Sized>(
        &mut self,
        kind: PowerUpKind,
        factor: f32,
        duration: Duration,
        sink: &mut S,
    ) {
        self.effects.retain(|effect| effect.kind != kind);
        self.effects.push(ActiveEffect {
            kind,
            effect_factor: factor,
            remaining: duration,
        });
        sink.emit(Event::EffectStarted { kind, duration });
    }

    /// Counts every effect down by `dt`, retiring the ones that run out.
    pub fn tick<S: EventSink + ?Sized>(&mut self, dt: Duration, sink: &mut S) {
        if dt.is_zero() || self.effects.is_empty() {
            return;
        }

        self.effects.retain_mut(|effect| {
            effect.remaining = effect.remaining.saturating_sub(dt);
            if effect.remaining.is_zero() {
                sink.emit(Event::EffectEnded { kind: effect.kind });
                false
            } else {
                true
            }
        });
    }

    /// Factor of the running effect for `kind`, or the neutral multiplier.
    #[must_use]
    pub fn current_multiplier(&self, kind: PowerUpKind) -> f32 {
        self.find(kind)
            .map_or(NEUTRAL_MULTIPLIER, |effect| effect.effect_factor)
    }

    /// Whether an effect of `kind` is running.
    #[must_use]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.find(kind).is_some()
    }

    /// Time left on the effect for `kind`; zero when none is running.
    #[must_use]
    pub fn remaining(&self, kind: PowerUpKind) -> Duration {
        self.find(kind)
            .map_or(Duration::ZERO, |effect| effect.remaining)
    }

    /// Captures an owned snapshot of every running effect.
    #[must_use]
    pub fn view(&self) -> EffectView {
        EffectView::from_snapshots(
            self.effects
                .iter()
                .map(|effect| EffectSnapshot {
                    kind: effect.kind,
                    effect_factor: effect.effect_factor,
                    remaining: effect.remaining,
                })
                .collect(),
        )
    }

    /// Drops every effect without reporting it as ended.
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    fn find(&self, kind: PowerUpKind) -> Option<&ActiveEffect> {
        self.effects.iter().find(|effect| effect.kind == kind)
    }
}
