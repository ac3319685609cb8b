//! Host-facing configuration for the power-up simulation.
//!
//! Values are plain numbers so they can be read from any serde format; times
//! are expressed in seconds. Missing fields fall back to [`Config::default`].

use std::time::Duration;

use gravity_well_core::{PlayField, PowerUpKind, DEFAULT_COLLISION_RADIUS};
use gravity_well_system_force_field as force_field;
use gravity_well_system_spawning as spawning;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a configuration is refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A value was NaN or infinite.
    #[error("`{field}` must be a finite number")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A value that may be zero was negative.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
    },
    /// A value that must be strictly positive was zero or negative.
    #[error("`{field}` must be greater than zero, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
    },
    /// Every spawn weight was zero, so no kind could ever be drawn.
    #[error("at least one spawn weight must be greater than zero")]
    NoSpawnWeight,
}

/// Relative spawn odds per kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightsConfig {
    /// Odds of a time warp.
    pub time_warp: f32,
    /// Odds of a singularity.
    pub singularity: f32,
    /// Odds of a repulsor.
    pub repulsor: f32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            time_warp: 1.0,
            singularity: 1.0,
            repulsor: 1.0,
        }
    }
}

/// Effect strength and duration for one kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Signed factor carried by the power-up.
    pub effect_factor: f32,
    /// Effect duration (time warp) or force source lifespan (fields), in seconds.
    pub duration_seconds: f32,
}

impl ProfileConfig {
    fn from_profile(profile: spawning::KindProfile) -> Self {
        Self {
            effect_factor: profile.effect_factor,
            duration_seconds: profile.duration.as_secs_f32(),
        }
    }
}

/// Every tunable the simulation reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Width of the play field in world units.
    pub field_width: f32,
    /// Height of the play field in world units.
    pub field_height: f32,
    /// Distance kept between spawned power-ups and the field edges.
    pub spawn_margin: f32,
    /// Seconds between spawns; zero disables spawning.
    pub spawn_interval_seconds: f32,
    /// Seed for the spawn position and kind sequence.
    pub rng_seed: u64,
    /// Optional limit on simultaneously uncollected power-ups.
    pub max_collectibles: Option<usize>,
    /// Relative spawn odds.
    pub weights: WeightsConfig,
    /// Time warp profile.
    pub time_warp: ProfileConfig,
    /// Singularity profile.
    pub singularity: ProfileConfig,
    /// Repulsor profile.
    pub repulsor: ProfileConfig,
    /// Pick-up distance between the agent and a power-up.
    pub collision_radius: f32,
    /// Strength of the inverse-square field.
    pub gravitational_constant: f32,
    /// Separation below which field strength stops growing.
    pub min_distance: f32,
    /// Mass of particles advanced with `apply_forces`.
    pub particle_mass: f32,
    /// Seconds per cycle of a force source's pulse animation.
    pub pulse_period_seconds: f32,
}

impl Default for Config {
    fn default() -> Self {
        let catalog = spawning::PowerUpCatalog::standard();
        Self {
            field_width: 800.0,
            field_height: 600.0,
            spawn_margin: spawning::DEFAULT_SPAWN_MARGIN,
            spawn_interval_seconds: spawning::DEFAULT_SPAWN_INTERVAL.as_secs_f32(),
            rng_seed: spawning::DEFAULT_RNG_SEED,
            max_collectibles: None,
            weights: WeightsConfig::default(),
            time_warp: ProfileConfig::from_profile(catalog.profile(PowerUpKind::TimeWarp)),
            singularity: ProfileConfig::from_profile(catalog.profile(PowerUpKind::Singularity)),
            repulsor: ProfileConfig::from_profile(catalog.profile(PowerUpKind::Repulsor)),
            collision_radius: DEFAULT_COLLISION_RADIUS,
            gravitational_constant: force_field::DEFAULT_GRAVITATIONAL_CONSTANT,
            min_distance: force_field::DEFAULT_MIN_DISTANCE,
            particle_mass: force_field::DEFAULT_PARTICLE_MASS,
            pulse_period_seconds: force_field::DEFAULT_PULSE_PERIOD.as_secs_f32(),
        }
    }
}

impl Config {
    /// Checks every value, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        non_negative("spawn_margin", self.spawn_margin)?;
        let _ = seconds("spawn_interval_seconds", self.spawn_interval_seconds)?;

        non_negative("weights.time_warp", self.weights.time_warp)?;
        non_negative("weights.singularity", self.weights.singularity)?;
        non_negative("weights.repulsor", self.weights.repulsor)?;
        if self.weights.time_warp + self.weights.singularity + self.weights.repulsor <= 0.0 {
            return Err(ConfigError::NoSpawnWeight);
        }

        for (name, profile) in [
            ("time_warp", &self.time_warp),
            ("singularity", &self.singularity),
            ("repulsor", &self.repulsor),
        ] {
            finite(name, profile.effect_factor)?;
            let _ = seconds(name, profile.duration_seconds)?;
        }

        non_negative("collision_radius", self.collision_radius)?;
        non_negative("gravitational_constant", self.gravitational_constant)?;
        positive("min_distance", self.min_distance)?;
        positive("particle_mass", self.particle_mass)?;
        let _ = seconds("pulse_period_seconds", self.pulse_period_seconds)?;
        Ok(())
    }

    /// Play field described by the configuration.
    #[must_use]
    pub fn play_field(&self) -> PlayField {
        PlayField::new(self.field_width, self.field_height)
    }

    pub(crate) fn spawning(&self) -> Result<spawning::Config, ConfigError> {
        let interval = seconds("spawn_interval_seconds", self.spawn_interval_seconds)?;
        Ok(spawning::Config::new(interval, self.rng_seed)
            .with_field(self.play_field(), self.spawn_margin)
            .with_weights(spawning::SpawnWeights::new(
                self.weights.time_warp,
                self.weights.singularity,
                self.weights.repulsor,
            ))
            .with_catalog(spawning::PowerUpCatalog::new(
                profile("time_warp", self.time_warp)?,
                profile("singularity", self.singularity)?,
                profile("repulsor", self.repulsor)?,
            ))
            .with_max_collectibles(self.max_collectibles))
    }

    pub(crate) fn force_field(&self) -> Result<force_field::Config, ConfigError> {
        Ok(
            force_field::Config::new(self.gravitational_constant, self.min_distance)
                .with_particle_mass(self.particle_mass)
                .with_lifespans(
                    seconds("singularity", self.singularity.duration_seconds)?,
                    seconds("repulsor", self.repulsor.duration_seconds)?,
                )
                .with_pulse_period(seconds("pulse_period_seconds", self.pulse_period_seconds)?),
        )
    }
}

fn profile(field: &'static str, config: ProfileConfig) -> Result<spawning::KindProfile, ConfigError> {
    finite(field, config.effect_factor)?;
    Ok(spawning::KindProfile::new(
        config.effect_factor,
        seconds(field, config.duration_seconds)?,
    ))
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn seconds(field: &'static str, value: f32) -> Result<Duration, ConfigError> {
    non_negative(field, value)?;
    Duration::try_from_secs_f32(value).map_err(|_| ConfigError::NonFinite { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            spawn_interval_seconds = 2.5
            max_collectibles = 4

            [repulsor]
            effect_factor = -2.0
            duration_seconds = 3.0
            "#,
        )
        .expect("config parses");

        assert_eq!(config.spawn_interval_seconds, 2.5);
        assert_eq!(config.max_collectibles, Some(4));
        assert_eq!(config.repulsor.duration_seconds, 3.0);
        assert_eq!(config.collision_radius, DEFAULT_COLLISION_RADIUS);
        assert_eq!(config.singularity, Config::default().singularity);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = toml::from_str::<Config>("gravity = 3.0");
        assert!(parsed.is_err());
    }

    #[test]
    fn negative_interval_is_rejected() {
        let config = Config {
            spawn_interval_seconds: -1.0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "spawn_interval_seconds",
                value: -1.0,
            })
        );
    }

    #[test]
    fn zero_minimum_distance_is_rejected() {
        let config = Config {
            min_distance: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "min_distance",
                ..
            })
        ));
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let config = Config {
            weights: WeightsConfig {
                time_warp: 0.0,
                singularity: 0.0,
                repulsor: 0.0,
            },
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoSpawnWeight));
    }

    #[test]
    fn non_finite_factor_is_rejected() {
        let config = Config {
            time_warp: ProfileConfig {
                effect_factor: f32::NAN,
                duration_seconds: 1.0,
            },
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "time_warp" })
        );
    }

    #[test]
    fn field_lifespans_follow_profiles() {
        let config = Config {
            singularity: ProfileConfig {
                effect_factor: 1.0,
                duration_seconds: 7.0,
            },
            ..Config::default()
        };
        let force_field = config.force_field().expect("valid");
        assert_eq!(
            force_field.lifespan(PowerUpKind::Singularity),
            Duration::from_secs(7)
        );
        assert_eq!(
            force_field.lifespan(PowerUpKind::Repulsor),
            Duration::from_secs(5)
        );
    }
}
