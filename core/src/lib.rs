#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gravity Well power-up simulation.
//!
//! This crate defines the vocabulary that connects the host loop, the
//! coordinating facade, and the pure systems. Systems own their private state
//! and report every observable change as an [`Event`] pushed into an
//! [`EventSink`] supplied by the caller. Hosts only ever see opaque
//! identifiers and owned snapshots, never references into simulation state.

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Distance from the agent centre within which a collectible is picked up.
pub const DEFAULT_COLLISION_RADIUS: f32 = 25.0;

/// Multiplier reported for kinds without an active timed effect.
pub const NEUTRAL_MULTIPLIER: f32 = 1.0;

/// Closed set of power-ups that can appear in the play field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Timed buff that scales the global simulation speed while active.
    TimeWarp,
    /// Stored field that attracts particles toward a fixed point.
    Singularity,
    /// Stored field that repels particles away from the agent.
    Repulsor,
}

impl PowerUpKind {
    /// Every kind, in declaration order.
    pub const ALL: [PowerUpKind; 3] = [Self::TimeWarp, Self::Singularity, Self::Repulsor];

    /// Reports how a collected power-up of this kind takes effect.
    #[must_use]
    pub const fn category(self) -> EffectCategory {
        match self {
            Self::TimeWarp => EffectCategory::Timed,
            Self::Singularity | Self::Repulsor => EffectCategory::Stored,
        }
    }

    /// Whether this kind produces a force source when activated.
    #[must_use]
    pub const fn is_field(self) -> bool {
        matches!(self.category(), EffectCategory::Stored)
    }

    /// Human readable label used by hosts when reporting events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TimeWarp => "time warp",
            Self::Singularity => "singularity",
            Self::Repulsor => "repulsor",
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two ways a collected power-up is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Applied immediately and active for a bounded duration.
    Timed,
    /// Banked in the inventory until the player requests activation.
    Stored,
}

/// Unique identifier assigned to a spawned collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpId(u32);

impl PowerUpId {
    /// Creates a new power-up identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a live force source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForceSourceId(u32);

impl ForceSourceId {
    /// Creates a new force source identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Rectangular play field anchored at the origin, measured in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    width: f32,
    height: f32,
}

impl PlayField {
    /// Creates a play field spanning `0..=width` by `0..=height`.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the field.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the field.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Geometric centre of the field.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Reports whether the point lies within the field, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

impl Default for PlayField {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Collectible awaiting contact with the agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUp {
    /// Identifier handed to the visual mirror.
    pub id: PowerUpId,
    /// Kind of power-up.
    pub kind: PowerUpKind,
    /// Centre of the collectible in world units.
    pub position: Vec2,
    /// Signed strength applied when the power-up takes effect.
    pub effect_factor: f32,
    /// How long the effect lasts once it takes effect.
    pub duration: Duration,
}

/// Notifications emitted by the simulation for display, audio, and mirroring.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A collectible appeared in the play field.
    PowerUpSpawned {
        /// Identifier of the new collectible.
        id: PowerUpId,
        /// Kind of the new collectible.
        kind: PowerUpKind,
        /// Where the visual marker should be placed.
        position: Vec2,
    },
    /// The agent touched a collectible.
    PowerUpCollected {
        /// Identifier of the collected power-up.
        id: PowerUpId,
        /// Kind of the collected power-up.
        kind: PowerUpKind,
    },
    /// The collectible's marker should be removed from the screen.
    PowerUpRemoved {
        /// Identifier of the removed power-up.
        id: PowerUpId,
    },
    /// A timed effect started or restarted.
    EffectStarted {
        /// Kind of the effect.
        kind: PowerUpKind,
        /// Full duration of the effect.
        duration: Duration,
    },
    /// A timed effect ran out.
    EffectEnded {
        /// Kind of the effect.
        kind: PowerUpKind,
    },
    /// A collected power-up was banked for later activation.
    PowerUpStored {
        /// Kind that was stored.
        kind: PowerUpKind,
        /// Stored count after the increment.
        count: u32,
    },
    /// A stored power-up was activated and its force source is live.
    ForceSourceActivated {
        /// Identifier of the new force source.
        id: ForceSourceId,
        /// Kind of field the source exerts.
        kind: PowerUpKind,
        /// Where the source was placed.
        position: Vec2,
    },
    /// A force source moved to follow the agent.
    ForceSourceMoved {
        /// Identifier of the moved source.
        id: ForceSourceId,
        /// New position of the source.
        position: Vec2,
    },
    /// A force source outlived its lifespan and was removed.
    ForceSourceExpired {
        /// Identifier of the expired source.
        id: ForceSourceId,
        /// Kind of field the source exerted.
        kind: PowerUpKind,
    },
    /// Every collectible, effect, stored count, and force source was cleared.
    GameReset,
}

/// Destination for simulation notifications.
///
/// Delivery is synchronous: events are handed over within the call that
/// produced them, in the order they occurred.
pub trait EventSink {
    /// Receives a single event.
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}

/// Adapts a closure into an [`EventSink`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FnSink<F>(pub F);

impl<F: FnMut(Event)> EventSink for FnSink<F> {
    fn emit(&mut self, event: Event) {
        (self.0)(event);
    }
}

/// Sink that drops every event, for callers that only need return values.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

/// Read-only snapshot describing every uncollected power-up.
#[derive(Clone, Debug, Default)]
pub struct CollectibleView {
    snapshots: Vec<PowerUp>,
}

impl CollectibleView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PowerUp>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured collectibles in identifier order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.snapshots.iter()
    }

    /// Number of collectibles captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no collectibles were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PowerUp> {
        self.snapshots
    }
}

/// Immutable representation of a single active timed effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// Kind of the effect.
    pub kind: PowerUpKind,
    /// Factor reported as the kind's multiplier while the effect lasts.
    pub effect_factor: f32,
    /// Time left before the effect ends.
    pub remaining: Duration,
}

/// Read-only snapshot describing every active timed effect.
#[derive(Clone, Debug, Default)]
pub struct EffectView {
    snapshots: Vec<EffectSnapshot>,
}

impl EffectView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EffectSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.kind);
        Self { snapshots }
    }

    /// Iterator over the captured effects ordered by kind.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EffectSnapshot> {
        self.snapshots.iter()
    }

    /// Whether no effects were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EffectSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single live force source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceSourceSnapshot {
    /// Identifier allocated when the source was activated.
    pub id: ForceSourceId,
    /// Kind of field the source exerts.
    pub kind: PowerUpKind,
    /// Current position of the source.
    pub position: Vec2,
    /// `+1.0` attracts, `-1.0` repels.
    pub strength_sign: f32,
    /// Whether the source tracks the agent every tick.
    pub follows_agent: bool,
    /// Time left before the source expires.
    pub remaining: Duration,
    /// Phase of the source's pulse animation in `0.0..1.0`.
    pub pulse_phase: f32,
}

/// Read-only snapshot describing every live force source.
#[derive(Clone, Debug, Default)]
pub struct ForceSourceView {
    snapshots: Vec<ForceSourceSnapshot>,
}

impl ForceSourceView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ForceSourceSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured sources in identifier order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &ForceSourceSnapshot> {
        self.snapshots.iter()
    }

    /// Number of sources captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no sources were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ForceSourceSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{EffectCategory, Event, EventSink, FnSink, PlayField, PowerUpId, PowerUpKind};
    use glam::Vec2;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn power_up_id_round_trips_through_bincode() {
        assert_round_trip(&PowerUpId::new(17));
    }

    #[test]
    fn power_up_kind_round_trips_through_bincode() {
        assert_round_trip(&PowerUpKind::Repulsor);
    }

    #[test]
    fn only_time_warp_is_timed() {
        assert_eq!(PowerUpKind::TimeWarp.category(), EffectCategory::Timed);
        assert!(!PowerUpKind::TimeWarp.is_field());
        assert!(PowerUpKind::Singularity.is_field());
        assert!(PowerUpKind::Repulsor.is_field());
    }

    #[test]
    fn play_field_contains_its_edges() {
        let field = PlayField::new(100.0, 50.0);
        assert!(field.contains(Vec2::ZERO));
        assert!(field.contains(Vec2::new(100.0, 50.0)));
        assert!(!field.contains(Vec2::new(100.5, 10.0)));
        assert_eq!(field.center(), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn closure_sink_receives_events_in_order() {
        let mut received = Vec::new();
        {
            let mut sink = FnSink(|event| received.push(event));
            sink.emit(Event::GameReset);
            sink.emit(Event::EffectEnded {
                kind: PowerUpKind::TimeWarp,
            });
        }
        assert_eq!(
            received,
            vec![
                Event::GameReset,
                Event::EffectEnded {
                    kind: PowerUpKind::TimeWarp
                }
            ]
        );
    }
}
