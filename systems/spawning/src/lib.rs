#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that decides when and where power-ups appear.

use std::time::Duration;

use glam::Vec2;
use gravity_well_core::{PlayField, PowerUp, PowerUpId, PowerUpKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform, WeightedIndex};

/// Cadence used when the host does not configure one.
pub const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_secs(5);
/// Distance kept between a spawned collectible and every field edge.
pub const DEFAULT_SPAWN_MARGIN: f32 = 30.0;
/// Seed used when the host does not configure one.
pub const DEFAULT_RNG_SEED: u64 = 0x5eed_0f9a_717e_11;

/// Relative likelihood of each kind being drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnWeights {
    time_warp: f32,
    singularity: f32,
    repulsor: f32,
}

impl SpawnWeights {
    /// Creates weights from explicit per-kind values.
    #[must_use]
    pub const fn new(time_warp: f32, singularity: f32, repulsor: f32) -> Self {
        Self {
            time_warp,
            singularity,
            repulsor,
        }
    }

    /// Equal odds for every kind.
    #[must_use]
    pub const fn even() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Weight assigned to the provided kind.
    #[must_use]
    pub const fn weight(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::TimeWarp => self.time_warp,
            PowerUpKind::Singularity => self.singularity,
            PowerUpKind::Repulsor => self.repulsor,
        }
    }
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self::even()
    }
}

/// Strength and duration carried by a freshly spawned power-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindProfile {
    /// Signed factor applied when the power-up takes effect.
    pub effect_factor: f32,
    /// How long the effect lasts once it takes effect.
    pub duration: Duration,
}

impl KindProfile {
    /// Creates a profile from a factor and a duration.
    #[must_use]
    pub const fn new(effect_factor: f32, duration: Duration) -> Self {
        Self {
            effect_factor,
            duration,
        }
    }
}

/// Per-kind profiles stamped onto spawned power-ups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpCatalog {
    time_warp: KindProfile,
    singularity: KindProfile,
    repulsor: KindProfile,
}

impl PowerUpCatalog {
    /// Creates a catalog from explicit profiles.
    #[must_use]
    pub const fn new(
        time_warp: KindProfile,
        singularity: KindProfile,
        repulsor: KindProfile,
    ) -> Self {
        Self {
            time_warp,
            singularity,
            repulsor,
        }
    }

    /// Time warp halves the game speed for eight seconds; both fields live
    /// for five seconds with their strength sign as factor.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new(
            KindProfile::new(0.5, Duration::from_secs(8)),
            KindProfile::new(1.0, Duration::from_secs(5)),
            KindProfile::new(-1.0, Duration::from_secs(5)),
        )
    }

    /// Profile registered for the provided kind.
    #[must_use]
    pub const fn profile(&self, kind: PowerUpKind) -> KindProfile {
        match kind {
            PowerUpKind::TimeWarp => self.time_warp,
            PowerUpKind::Singularity => self.singularity,
            PowerUpKind::Repulsor => self.repulsor,
        }
    }
}

impl Default for PowerUpCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
    field: PlayField,
    margin: f32,
    weights: SpawnWeights,
    catalog: PowerUpCatalog,
    max_collectibles: Option<usize>,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
            field: PlayField::new(800.0, 600.0),
            margin: DEFAULT_SPAWN_MARGIN,
            weights: SpawnWeights::even(),
            catalog: PowerUpCatalog::standard(),
            max_collectibles: None,
        }
    }

    /// Places spawns inside `field`, keeping `margin` units from every edge.
    #[must_use]
    pub const fn with_field(mut self, field: PlayField, margin: f32) -> Self {
        self.field = field;
        self.margin = margin;
        self
    }

    /// Overrides the per-kind draw weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: SpawnWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Overrides the profiles stamped onto spawned power-ups.
    #[must_use]
    pub const fn with_catalog(mut self, catalog: PowerUpCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Stops spawning while `limit` collectibles remain uncollected.
    #[must_use]
    pub const fn with_max_collectibles(mut self, limit: Option<usize>) -> Self {
        self.max_collectibles = limit;
        self
    }

    /// Profiles stamped onto spawned power-ups.
    #[must_use]
    pub const fn catalog(&self) -> &PowerUpCatalog {
        &self.catalog
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN_INTERVAL, DEFAULT_RNG_SEED)
    }
}

#[derive(Clone, Debug)]
enum KindDraw {
    Weighted(WeightedIndex<f32>),
    Even(Uniform<usize>),
}

impl KindDraw {
    fn from_weights(weights: SpawnWeights) -> Self {
        match WeightedIndex::new(PowerUpKind::ALL.map(|kind| weights.weight(kind))) {
            Ok(distribution) => Self::Weighted(distribution),
            Err(_) => Self::Even(Uniform::from(0..PowerUpKind::ALL.len())),
        }
    }

    fn sample(&self, rng: &mut ChaCha8Rng) -> PowerUpKind {
        let index = match self {
            Self::Weighted(distribution) => distribution.sample(rng),
            Self::Even(distribution) => distribution.sample(rng),
        };
        PowerUpKind::ALL[index % PowerUpKind::ALL.len()]
    }
}

/// Pure system that deterministically emits new collectibles at a fixed cadence.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    accumulator: Duration,
    kind_draw: KindDraw,
    rng: ChaCha8Rng,
    next_id: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    ///
    /// Weights that cannot form a distribution (all zero, negative, or not
    /// finite) fall back to equal odds.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            accumulator: Duration::ZERO,
            kind_draw: KindDraw::from_weights(config.weights),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            next_id: 0,
            config,
        }
    }

    /// Advances the spawn clock by `dt` and returns a collectible when the
    /// interval has elapsed.
    ///
    /// At most one power-up is produced per call; the clock restarts from
    /// zero whenever one is emitted, so a long frame never releases a burst.
    /// `uncollected` is the number of collectibles currently in the field
    /// and only matters when a cap was configured.
    pub fn maybe_spawn(&mut self, dt: Duration, uncollected: usize) -> Option<PowerUp> {
        if dt.is_zero() || self.config.spawn_interval.is_zero() {
            return None;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        if self.accumulator < self.config.spawn_interval {
            return None;
        }

        if let Some(limit) = self.config.max_collectibles {
            if uncollected >= limit {
                return None;
            }
        }

        self.accumulator = Duration::ZERO;
        Some(self.spawn())
    }

    /// Time accumulated toward the next spawn.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Restarts the spawn clock, identifiers, and random sequence.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.rng_seed);
        self.next_id = 0;
    }

    fn spawn(&mut self) -> PowerUp {
        let kind = self.kind_draw.sample(&mut self.rng);
        let position = self.draw_position();
        let profile = self.config.catalog.profile(kind);
        let id = PowerUpId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        PowerUp {
            id,
            kind,
            position,
            effect_factor: profile.effect_factor,
            duration: profile.duration,
        }
    }

    fn draw_position(&mut self) -> Vec2 {
        let field = self.config.field;
        let margin = self.config.margin;
        let x = draw_axis(&mut self.rng, field.width(), margin);
        let y = draw_axis(&mut self.rng, field.height(), margin);
        Vec2::new(x, y)
    }
}

/// Draws a coordinate in `margin..=extent - margin`.
///
/// When the margin leaves no usable span (margin at least half the extent)
/// the coordinate collapses onto the margin itself.
fn draw_axis(rng: &mut ChaCha8Rng, extent: f32, margin: f32) -> f32 {
    let low = margin;
    let high = extent - margin;
    if low.is_finite() && high.is_finite() && high > low {
        Uniform::new_inclusive(low, high).sample(rng)
    } else {
        margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_never_spawns() {
        let mut spawning = Spawning::new(Config::new(Duration::ZERO, 1));
        assert!(spawning.maybe_spawn(Duration::from_secs(10), 0).is_none());
        assert!(spawning.accumulated().is_zero());
    }

    #[test]
    fn degenerate_axis_collapses_to_margin() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(draw_axis(&mut rng, 40.0, 20.0), 20.0);
        assert_eq!(draw_axis(&mut rng, 10.0, 30.0), 30.0);
    }

    #[test]
    fn invalid_weights_fall_back_to_even_odds() {
        let draw = KindDraw::from_weights(SpawnWeights::new(0.0, 0.0, 0.0));
        assert!(matches!(draw, KindDraw::Even(_)));
    }
}
