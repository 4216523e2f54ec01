//! Buffered virtual controller state-change events.
//!
//! Behavior is modelled after the buffered-event semantics of the emulated
//! input API: the buffer always keeps one slot free, so the number of events
//! stored is one less than the declared capacity, and an overflow condition
//! persists until events are drained. Methods are not concurrency-safe; the
//! virtual controller serializes access under its own lock.

use std::collections::VecDeque;

use openpad_types::element::{CompassDirection, ElementIdentifier};
use openpad_types::sequence::SequenceSource;

/// Updated value carried by a state-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventValue {
    /// Updated axis value.
    Axis(i32),
    /// Updated button pressed state.
    Button(bool),
    /// Updated POV hat direction.
    Pov(CompassDirection),
}

/// State-change event data: which element changed and its new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventData {
    pub element: ElementIdentifier,
    pub value: EventValue,
}

/// A buffered state-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub data: EventData,
    /// Milliseconds on the controller's monotonic clock when the event was
    /// generated.
    pub timestamp: u32,
    /// Chronological sequence number, drawn from a process-wide counter.
    pub sequence: u32,
}

/// Maximum event buffer capacity: 1 MiB of storage against the emulated
/// API's 16-byte packed event records.
pub const EVENT_BUFFER_CAPACITY_MAX: u32 = 1024 * 1024 / 16;

/// Fixed-capacity FIFO of state-change events with an overflow flag.
///
/// A capacity of zero disables buffering entirely: appends are silently
/// discarded and no overflow condition is ever raised.
#[derive(Debug, Default)]
pub struct StateChangeEventBuffer {
    events: VecDeque<Event>,
    capacity: u32,
    overflowed: bool,
}

impl StateChangeEventBuffer {
    /// Creates a disabled buffer (capacity 0).
    pub fn new() -> StateChangeEventBuffer {
        StateChangeEventBuffer::default()
    }

    /// Declared capacity. The number of events stored never exceeds one less
    /// than this value.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of events currently stored.
    pub fn count(&self) -> u32 {
        self.events.len() as u32
    }

    /// Whether buffering is enabled.
    pub fn is_enabled(&self) -> bool {
        self.capacity != 0
    }

    /// Whether an overflow condition is present.
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Read-only access to events by index; 0 is the oldest.
    pub fn event(&self, index: u32) -> Option<&Event> {
        self.events.get(index as usize)
    }

    /// Appends an event, stamping it with the given timestamp and the next
    /// sequence number from `sequences`. Discards the oldest events and
    /// raises the overflow condition when the buffer is full; discards the
    /// new event silently when buffering is disabled.
    pub fn append(&mut self, data: EventData, timestamp: u32, sequences: &SequenceSource) {
        if self.capacity == 0 {
            return;
        }

        let stored_max = self.capacity - 1;
        if self.count() >= stored_max {
            while self.count() >= stored_max && !self.events.is_empty() {
                self.events.pop_front();
            }
            self.overflowed = true;
            if stored_max == 0 {
                return;
            }
        }

        self.events.push_back(Event {
            data,
            timestamp,
            sequence: sequences.next_u32(),
        });
    }

    /// Removes up to `count` of the oldest events. Any successful removal
    /// clears the overflow condition. Returns the number removed.
    pub fn pop_oldest(&mut self, count: u32) -> u32 {
        let to_remove = count.min(self.count());
        for _ in 0..to_remove {
            self.events.pop_front();
        }
        if to_remove > 0 {
            self.overflowed = false;
        }
        to_remove
    }

    /// Sets the buffer capacity, clamping to [`EVENT_BUFFER_CAPACITY_MAX`].
    /// Capacity 0 disables the buffer and discards its contents along with
    /// any overflow condition. Shrinking below the current event count
    /// discards the oldest excess events and raises the overflow condition.
    pub fn set_capacity(&mut self, capacity: u32) {
        let capacity = capacity.min(EVENT_BUFFER_CAPACITY_MAX);

        if capacity == 0 {
            self.events.clear();
            self.capacity = 0;
            self.overflowed = false;
            return;
        }

        let stored_max = capacity - 1;
        if self.count() > stored_max {
            while self.count() > stored_max {
                self.events.pop_front();
            }
            self.overflowed = true;
        }
        self.capacity = capacity;
    }
}
