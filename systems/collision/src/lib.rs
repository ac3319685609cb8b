#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves contact between the agent and uncollected power-ups.

use glam::Vec2;
use gravity_well_core::{PowerUp, DEFAULT_COLLISION_RADIUS};

/// Proximity test between the agent centre and collectible centres.
#[derive(Clone, Copy, Debug)]
pub struct CollisionDetector {
    radius: f32,
}

impl CollisionDetector {
    /// Creates a detector that reports hits within `radius` world units.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Distance at or below which a collectible counts as touched.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Reports whether a collectible at `position` is touched by the agent.
    #[must_use]
    pub fn hits(&self, agent: Vec2, position: Vec2) -> bool {
        agent.distance_squared(position) <= self.radius * self.radius
    }

    /// Moves every collectible within reach of `agent` from `collectibles`
    /// into `out`.
    ///
    /// All hits are collected in the same call, not only the closest one.
    /// Survivors keep their relative order and hits are appended in the
    /// order they appeared.
    pub fn resolve(&self, agent: Vec2, collectibles: &mut Vec<PowerUp>, out: &mut Vec<PowerUp>) {
        if collectibles.is_empty() {
            return;
        }

        collectibles.retain(|power_up| {
            if self.hits(agent, power_up.position) {
                out.push(*power_up);
                false
            } else {
                true
            }
        });
    }
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_COLLISION_RADIUS)
    }
}
