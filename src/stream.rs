//! Stream descriptors and the fixed-capacity stream slot table.
//!
//! A stream is one buffer binding feeding attribute slots. Its data rate
//! is fixed at first registration and immutable afterwards, and its
//! accumulated stride only ever grows: appending an attribute adds
//! `component size + padding` per occupied sub-slot, and nothing ever
//! subtracts from a stream.

use crate::attribute::GenericAttribute;
use crate::definition::DataRate;
use crate::{MAX_VERTEX_ATTRIBUTES, MAX_VERTEX_STREAMS};

/// One resolved stream (buffer binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamDescriptor {
    /// How the stream advances. `Undefined` only for empty slots.
    pub rate: DataRate,
    /// Accumulated stride in bytes.
    pub stride: u32,
    /// Bitmask of attribute slots fed by this stream.
    pub attribute_mask: u16,
    /// Number of attribute slots fed by this stream.
    pub attribute_count: u32,
}

/// Fixed-capacity table of streams, indexed by stream slot.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamArrayLayout {
    slots: [StreamDescriptor; MAX_VERTEX_STREAMS as usize],
    mask: u16,
    active_count: u32,
    range: Option<(u32, u32)>,
}

impl StreamArrayLayout {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            slots: [StreamDescriptor::default(); MAX_VERTEX_STREAMS as usize],
            mask: 0,
            active_count: 0,
            range: None,
        }
    }

    /// Whether a stream slot is registered.
    pub fn is_active(&self, slot: u32) -> bool {
        slot < MAX_VERTEX_STREAMS && self.mask & (1 << slot) != 0
    }

    /// Get the descriptor at a stream slot, if registered.
    pub fn stream(&self, slot: u32) -> Option<&StreamDescriptor> {
        if self.is_active(slot) {
            Some(&self.slots[slot as usize])
        } else {
            None
        }
    }

    /// Current accumulated stride of a stream (0 if unregistered).
    pub fn stride(&self, slot: u32) -> u32 {
        self.stream(slot).map(|s| s.stride).unwrap_or(0)
    }

    /// Number of registered streams.
    pub fn active_count(&self) -> u32 {
        self.active_count
    }

    /// Occupancy bitmask, one bit per stream slot.
    pub fn occupancy_mask(&self) -> u16 {
        self.mask
    }

    /// Inclusive `(min, max)` registered slot range, if any.
    pub fn active_range(&self) -> Option<(u32, u32)> {
        self.range
    }

    /// Register a stream at `slot` with the given data rate.
    ///
    /// Idempotent when the slot is already registered with the same rate.
    /// Returns `false` for an out-of-range slot, an `Undefined` rate, or a
    /// rate conflicting with the slot's already-fixed rate.
    pub fn add_stream(&mut self, slot: u32, rate: DataRate) -> bool {
        if slot >= MAX_VERTEX_STREAMS || rate == DataRate::Undefined {
            return false;
        }
        if self.is_active(slot) {
            return self.slots[slot as usize].rate == rate;
        }

        self.slots[slot as usize] = StreamDescriptor {
            rate,
            stride: 0,
            attribute_mask: 0,
            attribute_count: 0,
        };
        self.mask |= 1 << slot;
        self.active_count += 1;
        self.range = Some(match self.range {
            Some((min, max)) => (min.min(slot), max.max(slot)),
            None => (slot, slot),
        });
        true
    }

    /// Account a committed attribute group into its stream.
    ///
    /// For each occupied sub-slot starting at `base_slot`, sets the
    /// stream's occupancy bit and grows the stride by the sub-slot's
    /// `component size + padding`. Append-only by construction.
    ///
    /// The stream must have been registered first; this is a programmer
    /// error otherwise, not a validation failure.
    pub fn append_attribute(&mut self, base_slot: u32, attr: &GenericAttribute) {
        debug_assert!(
            self.is_active(attr.stream_slot),
            "attribute appended to unregistered stream {}",
            attr.stream_slot
        );
        debug_assert!(base_slot + attr.group_size <= MAX_VERTEX_ATTRIBUTES);

        let stream = &mut self.slots[attr.stream_slot as usize];
        for index in 0..attr.group_size {
            stream.attribute_mask |= 1 << (base_slot + index);
            stream.stride += attr.slot_size();
            stream.attribute_count += 1;
        }
    }

    /// Clear every stream slot, the occupancy mask, and the range bound.
    pub fn reset(&mut self) {
        self.slots = [StreamDescriptor::default(); MAX_VERTEX_STREAMS as usize];
        self.mask = 0;
        self.active_count = 0;
        self.range = None;
    }

    /// Iterate over `(slot, descriptor)` for every registered stream.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &StreamDescriptor)> + '_ {
        (0..MAX_VERTEX_STREAMS).filter_map(move |slot| Some((slot, self.stream(slot)?)))
    }
}

impl Default for StreamArrayLayout {
    fn default() -> Self {
        Self::new()
    }
}
