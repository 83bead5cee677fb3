//! Typed farm events with a pre-allocated ring buffer.
//!
//! The farm records an event for every successful state change (planting,
//! maturity, harvest, purchases, restock, resets). Presentation uses them
//! for notifications; they never feed back into simulation state.
//!
//! # Delivery
//!
//! Events are pushed to the [`EventBuffer`] and handed to passive listeners
//! as soon as the operation that produced them has fully applied, so a
//! listener never observes a half-applied change.
//!
//! # Suppression
//!
//! Event kinds can be suppressed via [`EventBus::suppress`]; suppressed
//! events are neither recorded nor delivered.

use crate::clock::Timestamp;
use crate::id::{CellId, SeedId, UpgradeId};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FarmEvent {
    Planted {
        cell: CellId,
        seed: SeedId,
        at: Timestamp,
    },
    Matured {
        cell: CellId,
        seed: SeedId,
        at: Timestamp,
    },
    Harvested {
        cell: CellId,
        seed: SeedId,
        payout: u64,
    },
    SeedPurchased {
        seed: SeedId,
        cost: u64,
    },
    UpgradePurchased {
        upgrade: UpgradeId,
        level: u32,
        cost: u64,
    },
    Restocked {
        at: Timestamp,
        next_at: Timestamp,
    },
    Reborn {
        gained: u64,
        multiplier: u64,
        rebirth_cost: u64,
    },
    FreeReset,
}

/// Discriminant tag for event types, used for suppression and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Planted,
    Matured,
    Harvested,
    SeedPurchased,
    UpgradePurchased,
    Restocked,
    Reborn,
    FreeReset,
}

const EVENT_KIND_COUNT: usize = 8;

impl FarmEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            FarmEvent::Planted { .. } => EventKind::Planted,
            FarmEvent::Matured { .. } => EventKind::Matured,
            FarmEvent::Harvested { .. } => EventKind::Harvested,
            FarmEvent::SeedPurchased { .. } => EventKind::SeedPurchased,
            FarmEvent::UpgradePurchased { .. } => EventKind::UpgradePurchased,
            FarmEvent::Restocked { .. } => EventKind::Restocked,
            FarmEvent::Reborn { .. } => EventKind::Reborn,
            FarmEvent::FreeReset => EventKind::FreeReset,
        }
    }
}

impl EventKind {
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer: pre-allocated ring buffer
// ---------------------------------------------------------------------------

/// A pre-allocated ring buffer for events. Fixed capacity; when full, the
/// oldest events are dropped.
#[derive(Debug)]
pub struct EventBuffer {
    events: Vec<Option<FarmEvent>>,
    /// Write position (wraps around).
    head: usize,
    len: usize,
    /// Total events ever written (including dropped).
    total_written: u64,
    /// Events overwritten before anyone read them.
    dropped: u64,
}

impl EventBuffer {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: FarmEvent) {
        if self.len == self.capacity() {
            self.dropped += 1;
        }
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &FarmEvent> + '_ {
        let start = if self.len < self.capacity() { 0 } else { self.head };
        (0..self.len).filter_map(move |i| self.events[(start + i) % self.capacity()].as_ref())
    }

    /// Remove and return everything, oldest first.
    pub fn drain(&mut self) -> Vec<FarmEvent> {
        let start = if self.len < self.capacity() { 0 } else { self.head };
        let cap = self.capacity();
        let drained = (0..self.len)
            .filter_map(|i| self.events[(start + i) % cap].take())
            .collect();
        self.head = 0;
        self.len = 0;
        drained
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only.
pub type PassiveListener = Box<dyn FnMut(&FarmEvent)>;

/// Records farm events and fans them out to listeners.
pub struct EventBus {
    buffer: EventBuffer,
    listeners: Vec<(EventKind, PassiveListener)>,
    suppressed: [bool; EVENT_KIND_COUNT],
    /// Emitted during the current operation, not yet delivered.
    pending: Vec<FarmEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("buffer", &self.buffer)
            .field("listeners", &self.listeners.len())
            .field("suppressed", &self.suppressed)
            .field("pending", &self.pending)
            .finish()
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: EventBuffer::new(capacity),
            listeners: Vec::new(),
            suppressed: [false; EVENT_KIND_COUNT],
            pending: Vec::new(),
        }
    }

    /// Register a listener for one event kind.
    pub fn on(&mut self, kind: EventKind, listener: PassiveListener) {
        self.listeners.push((kind, listener));
    }

    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
    }

    pub fn unsuppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = false;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Queue an event for delivery at the end of the current operation.
    pub fn emit(&mut self, event: FarmEvent) {
        if !self.is_suppressed(event.kind()) {
            self.pending.push(event);
        }
    }

    /// Record pending events and notify listeners.
    pub fn deliver(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            let kind = event.kind();
            for (k, listener) in &mut self.listeners {
                if *k == kind {
                    listener(&event);
                }
            }
            self.buffer.push(event);
        }
    }

    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    /// Take every recorded event, oldest first.
    pub fn drain(&mut self) -> Vec<FarmEvent> {
        self.buffer.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn planted(n: u32) -> FarmEvent {
        FarmEvent::Planted {
            cell: CellId(n),
            seed: SeedId(0),
            at: 0,
        }
    }

    #[test]
    fn ring_buffer_drops_oldest() {
        let mut buf = EventBuffer::new(3);
        for i in 0..5 {
            buf.push(planted(i));
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.dropped_count(), 2);
        let cells: Vec<_> = buf
            .iter()
            .map(|e| match e {
                FarmEvent::Planted { cell, .. } => cell.0,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(cells, vec![2, 3, 4]);
    }

    #[test]
    fn drain_returns_in_order_and_empties() {
        let mut buf = EventBuffer::new(2);
        buf.push(planted(0));
        buf.push(planted(1));
        buf.push(planted(2));
        assert_eq!(buf.drain(), vec![planted(1), planted(2)]);
        assert!(buf.is_empty());
        buf.push(planted(9));
        assert_eq!(buf.drain(), vec![planted(9)]);
    }

    #[test]
    fn drained_events_are_not_counted_as_dropped() {
        let mut buf = EventBuffer::new(4);
        for burst in 0..3 {
            for i in 0..4 {
                buf.push(planted(burst * 4 + i));
            }
            assert_eq!(buf.drain().len(), 4);
        }
        assert_eq!(buf.total_written(), 12);
        assert_eq!(buf.dropped_count(), 0);

        for i in 0..6 {
            buf.push(planted(i));
        }
        assert_eq!(buf.dropped_count(), 2);
    }

    #[test]
    fn zero_capacity_clamped() {
        let buf = EventBuffer::new(0);
        assert_eq!(buf.capacity(), 1);
    }

    #[test]
    fn listeners_see_only_their_kind_after_delivery() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new(8);
        let sink = Rc::clone(&seen);
        bus.on(
            EventKind::FreeReset,
            Box::new(move |e| sink.borrow_mut().push(e.clone())),
        );

        bus.emit(planted(0));
        bus.emit(FarmEvent::FreeReset);
        assert!(seen.borrow().is_empty(), "nothing delivered before deliver()");

        bus.deliver();
        assert_eq!(*seen.borrow(), vec![FarmEvent::FreeReset]);
        assert_eq!(bus.buffer().len(), 2);
    }

    #[test]
    fn suppressed_events_are_not_recorded() {
        let mut bus = EventBus::new(8);
        bus.suppress(EventKind::Planted);
        bus.emit(planted(0));
        bus.deliver();
        assert!(bus.buffer().is_empty());

        bus.unsuppress(EventKind::Planted);
        bus.emit(planted(1));
        bus.deliver();
        assert_eq!(bus.drain(), vec![planted(1)]);
    }
}
