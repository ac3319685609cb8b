use std::time::Duration;

use gravity_well_core::{Event, PowerUpKind, NEUTRAL_MULTIPLIER};
use gravity_well_system_effects::EffectRegistry;

fn ended_count(events: &[Event], kind: PowerUpKind) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::EffectEnded { kind: ended } if *ended == kind))
        .count()
}

#[test]
fn inactive_kind_reports_neutral_values() {
    let registry = EffectRegistry::new();

    assert!(!registry.is_active(PowerUpKind::TimeWarp));
    assert_eq!(
        registry.current_multiplier(PowerUpKind::TimeWarp),
        NEUTRAL_MULTIPLIER
    );
    assert_eq!(registry.remaining(PowerUpKind::TimeWarp), Duration::ZERO);
}

#[test]
fn applying_reports_factor_and_start_event() {
    let mut registry = EffectRegistry::new();
    let mut events = Vec::new();

    registry.apply_timed_effect(
        PowerUpKind::TimeWarp,
        0.5,
        Duration::from_secs(8),
        &mut events,
    );

    assert!(registry.is_active(PowerUpKind::TimeWarp));
    assert_eq!(registry.current_multiplier(PowerUpKind::TimeWarp), 0.5);
    assert_eq!(
        events,
        vec![Event::EffectStarted {
            kind: PowerUpKind::TimeWarp,
            duration: Duration::from_secs(8),
        }]
    );
}

#[test]
fn effect_ends_exactly_once_after_its_duration() {
    let mut registry = EffectRegistry::new();
    let mut events = Vec::new();
    registry.apply_timed_effect(
        PowerUpKind::TimeWarp,
        0.5,
        Duration::from_secs(2),
        &mut events,
    );

    let frames = [
        Duration::from_millis(700),
        Duration::from_millis(700),
        Duration::from_millis(700),
        Duration::from_millis(700),
        Duration::from_millis(700),
    ];
    for (index, dt) in frames.into_iter().enumerate() {
        registry.tick(dt, &mut events);
        if index < 2 {
            assert!(registry.is_active(PowerUpKind::TimeWarp), "frame {index}");
        }
    }

    assert!(!registry.is_active(PowerUpKind::TimeWarp));
    assert_eq!(ended_count(&events, PowerUpKind::TimeWarp), 1);
    assert_eq!(
        registry.current_multiplier(PowerUpKind::TimeWarp),
        NEUTRAL_MULTIPLIER
    );
}

#[test]
fn effect_ends_in_the_tick_that_reaches_zero() {
    let mut registry = EffectRegistry::new();
    let mut events = Vec::new();
    registry.apply_timed_effect(
        PowerUpKind::TimeWarp,
        0.5,
        Duration::from_secs(1),
        &mut events,
    );
    events.clear();

    registry.tick(Duration::from_millis(500), &mut events);
    assert!(events.is_empty());

    registry.tick(Duration::from_millis(500), &mut events);
    assert_eq!(
        events,
        vec![Event::EffectEnded {
            kind: PowerUpKind::TimeWarp
        }]
    );
}

#[test]
fn restarting_resets_remaining_to_new_duration() {
    let mut registry = EffectRegistry::new();
    let mut events = Vec::new();
    registry.apply_timed_effect(
        PowerUpKind::TimeWarp,
        0.5,
        Duration::from_secs(4),
        &mut events,
    );
    registry.tick(Duration::from_secs(3), &mut events);
    assert_eq!(registry.remaining(PowerUpKind::TimeWarp), Duration::from_secs(1));

    registry.apply_timed_effect(
        PowerUpKind::TimeWarp,
        0.5,
        Duration::from_secs(4),
        &mut events,
    );

    assert_eq!(registry.remaining(PowerUpKind::TimeWarp), Duration::from_secs(4));
    assert_eq!(registry.view().into_vec().len(), 1);
    assert_eq!(ended_count(&events, PowerUpKind::TimeWarp), 0);
}

#[test]
fn zero_dt_changes_nothing() {
    let mut registry = EffectRegistry::new();
    let mut events = Vec::new();
    registry.apply_timed_effect(
        PowerUpKind::TimeWarp,
        0.5,
        Duration::ZERO,
        &mut events,
    );
    events.clear();

    registry.tick(Duration::ZERO, &mut events);

    assert!(events.is_empty());
    assert!(registry.is_active(PowerUpKind::TimeWarp));
}

#[test]
fn zero_duration_effect_ends_on_next_advancing_tick() {
    let mut registry = EffectRegistry::new();
    let mut events = Vec::new();
    registry.apply_timed_effect(
        PowerUpKind::TimeWarp,
        0.5,
        Duration::ZERO,
        &mut events,
    );

    registry.tick(Duration::from_millis(1), &mut events);

    assert!(!registry.is_active(PowerUpKind::TimeWarp));
    assert_eq!(ended_count(&events, PowerUpKind::TimeWarp), 1);
}

#[test]
fn effects_of_different_kinds_run_independently() {
    let mut registry = EffectRegistry::new();
    let mut events = Vec::new();
    registry.apply_timed_effect(
        PowerUpKind::TimeWarp,
        0.5,
        Duration::from_secs(1),
        &mut events,
    );
    registry.apply_timed_effect(
        PowerUpKind::Singularity,
        2.0,
        Duration::from_secs(3),
        &mut events,
    );

    registry.tick(Duration::from_secs(2), &mut events);

    assert!(!registry.is_active(PowerUpKind::TimeWarp));
    assert!(registry.is_active(PowerUpKind::Singularity));
    let view = registry.view().into_vec();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].kind, PowerUpKind::Singularity);
    assert_eq!(view[0].remaining, Duration::from_secs(1));
}
