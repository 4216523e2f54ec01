//! Process-wide monotonic counters.
//!
//! Two counters exist per process: one issuing force-feedback effect
//! identifiers and one issuing state-change event sequence numbers. A single
//! counter per kind gives events a total order that is consistent with their
//! temporal interleaving as observed by the issuing threads (locally strictly
//! monotonic per controller, weakly preserved across controllers). Consumers
//! take a counter by reference rather than reading a global, so tests can
//! substitute their own instances.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonic sequence of integers, safe to share across threads.
///
/// # Examples
///
/// ```
/// use openpad_types::sequence::SequenceSource;
///
/// let source = SequenceSource::new();
/// let first = source.next();
/// let second = source.next();
/// assert!(second > first);
/// ```
#[derive(Debug, Default)]
pub struct SequenceSource(AtomicU64);

impl SequenceSource {
    /// Creates a counter starting at zero.
    pub const fn new() -> SequenceSource {
        SequenceSource(AtomicU64::new(0))
    }

    /// Returns the next value in the sequence.
    #[inline]
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the next value truncated to 32 bits. Wraps after 2^32 values,
    /// which matches the sequence-number width of the emulated input API.
    #[inline]
    pub fn next_u32(&self) -> u32 {
        self.next() as u32
    }
}

static EFFECT_IDENTIFIERS: SequenceSource = SequenceSource::new();
static EVENT_SEQUENCES: SequenceSource = SequenceSource::new();

/// Process-wide counter for force-feedback effect identifiers.
pub fn effect_identifiers() -> &'static SequenceSource {
    &EFFECT_IDENTIFIERS
}

/// Process-wide counter for state-change event sequence numbers.
pub fn event_sequences() -> &'static SequenceSource {
    &EVENT_SEQUENCES
}
