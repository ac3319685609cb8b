#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stored power-up counts awaiting manual activation.

use std::collections::BTreeMap;

use gravity_well_core::{Event, EventSink, PowerUpKind};

/// Banked power-ups keyed by kind. Counts never drop below zero and kinds
/// with nothing stored are absent from the map.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    counts: BTreeMap<PowerUpKind, u32>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Banks one power-up of `kind`.
    pub fn store<S: EventSink + ?Sized>(&mut self, kind: PowerUpKind, sink: &mut S) {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
        sink.emit(Event::PowerUpStored {
            kind,
            count: *count,
        });
    }

    /// Consumes one stored power-up of `kind` if any is banked.
    ///
    /// Returns `false` and leaves the inventory untouched when none is stored.
    pub fn try_activate(&mut self, kind: PowerUpKind) -> bool {
        let Some(count) = self.counts.get_mut(&kind) else {
            return false;
        };

        *count -= 1;
        if *count == 0 {
            let _ = self.counts.remove(&kind);
        }
        true
    }

    /// Number of stored power-ups of `kind`.
    #[must_use]
    pub fn count(&self, kind: PowerUpKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Owned copy of every non-zero count.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<PowerUpKind, u32> {
        self.counts.clone()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Drops every stored power-up.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
