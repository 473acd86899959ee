//! Layout error types.

use thiserror::Error;

use crate::definition::DataRate;

/// Errors produced while validating or committing attribute definitions.
///
/// All of these are recoverable validation failures: the layout that
/// reported them should be discarded (or reset) by the caller, never
/// unwound via panic. Programmer errors (indexing a slot already known to
/// be invalid) are covered by debug assertions instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The definition's vertex format is `Undefined`.
    #[error("vertex format is undefined")]
    UndefinedFormat,

    /// A stream was registered with an `Undefined` data rate.
    #[error("data rate is undefined for stream {0}")]
    UndefinedDataRate(u32),

    /// An attribute slot index (or `base + group - 1`) exceeds capacity.
    #[error("attribute slot {slot} out of range (capacity {capacity})")]
    AttributeSlotOutOfRange { slot: u32, capacity: u32 },

    /// A stream slot index exceeds capacity.
    #[error("stream slot {slot} out of range (capacity {capacity})")]
    StreamSlotOutOfRange { slot: u32, capacity: u32 },

    /// A semantic group size outside `1..=4`.
    #[error("semantic group size {0} out of range (1-4)")]
    GroupSizeOutOfRange(u32),

    /// Some slot in `[base, base + group)` is already occupied.
    #[error("attribute slot {0} already occupied")]
    SlotOccupied(u32),

    /// The target stream already exists with a different data rate.
    #[error("stream {slot} data rate conflict: stream advances {existing:?}, definition wants {requested:?}")]
    StreamRateConflict {
        slot: u32,
        existing: DataRate,
        requested: DataRate,
    },

    /// An append-sentinel offset reached the slot table unresolved.
    ///
    /// Only the combined layout builder resolves append offsets; inserting
    /// directly into an [`AttributeArrayLayout`](crate::AttributeArrayLayout)
    /// requires an explicit offset.
    #[error("attribute offset must be resolved before insertion into the slot table")]
    UnresolvedOffset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LayoutError::UndefinedFormat;
        assert_eq!(err.to_string(), "vertex format is undefined");

        let err = LayoutError::SlotOccupied(3);
        assert_eq!(err.to_string(), "attribute slot 3 already occupied");

        let err = LayoutError::AttributeSlotOutOfRange {
            slot: 17,
            capacity: 16,
        };
        assert_eq!(
            err.to_string(),
            "attribute slot 17 out of range (capacity 16)"
        );
    }
}
