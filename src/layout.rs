//! Combined layout: the attribute and stream tables built together.
//!
//! [`VertexStreamLayout`] owns one [`AttributeArrayLayout`] and one
//! [`StreamArrayLayout`] and orchestrates committing an ordered list of
//! definitions into both: validation, slot space checks, stream
//! registration, append-offset resolution, padding clamping, and the final
//! two-table commit.
//!
//! Definition order is semantically significant: an append offset resolves
//! against the stream's stride *at the moment the definition is
//! processed*, so reordering definitions reorders data within a stream.

use std::fmt;

use crate::attribute::{AttributeArrayLayout, GenericAttribute};
use crate::definition::{AttributeOffset, DataRate, VertexAttributeDefinition};
use crate::error::LayoutError;
use crate::semantics::VertexSemantics;
use crate::signature;
use crate::stream::{StreamArrayLayout, StreamDescriptor};
use crate::SLOT_BYTE_BUDGET;

/// A fully resolved vertex input layout: attributes and streams.
///
/// Two layouts are equal iff every attribute slot holds identical
/// format/semantics/offset and every stream has identical stride and data
/// rate; how the layouts were built (input order, append vs explicit
/// offsets) does not matter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexStreamLayout {
    attributes: AttributeArrayLayout,
    streams: StreamArrayLayout,
}

impl VertexStreamLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self {
            attributes: AttributeArrayLayout::new(),
            streams: StreamArrayLayout::new(),
        }
    }

    /// Build a layout from an ordered list of definitions.
    ///
    /// All-or-nothing: the first failing definition aborts the build and
    /// nothing is returned. Definitions are processed in list order, which
    /// decides how append offsets resolve.
    pub fn build(definitions: &[VertexAttributeDefinition]) -> Result<Self, LayoutError> {
        let mut layout = Self::new();
        for def in definitions {
            layout.add_definition(def)?;
        }
        Ok(layout)
    }

    /// Validate, resolve, and commit one definition.
    ///
    /// On failure the definition is not committed, but anything committed
    /// by *earlier* calls stays in place; there is no rollback. A layout
    /// that reported an error mid-sequence must be discarded or
    /// [`reset`](Self::reset) by the caller; [`build`](Self::build) wraps
    /// this loop with the stricter all-or-nothing contract.
    pub fn add_definition(&mut self, def: &VertexAttributeDefinition) -> Result<(), LayoutError> {
        def.validate()?;
        self.attributes.check_space(def.base_slot, def.group_size)?;

        if !self.streams.add_stream(def.stream_slot, def.rate) {
            if def.rate == DataRate::Undefined {
                return Err(LayoutError::UndefinedDataRate(def.stream_slot));
            }
            // Slot range was validated above, so this is a rate conflict.
            let existing = self.streams.stream(def.stream_slot).map(|s| s.rate);
            return Err(LayoutError::StreamRateConflict {
                slot: def.stream_slot,
                existing: existing.unwrap_or(DataRate::Undefined),
                requested: def.rate,
            });
        }

        let mut resolved = def.clone();
        let stride = self.streams.stride(def.stream_slot);
        let component_size = def.format.size();
        match def.offset {
            AttributeOffset::Explicit(_) => {}
            AttributeOffset::Append => {
                resolved.offset = AttributeOffset::Explicit(stride);
            }
            AttributeOffset::AppendAligned16 => {
                resolved.offset =
                    AttributeOffset::Explicit(stride.div_ceil(SLOT_BYTE_BUDGET) * SLOT_BYTE_BUDGET);
                resolved.padding = SLOT_BYTE_BUDGET.saturating_sub(component_size);
            }
        }
        // Per-slot byte budget: a component plus its padding never exceeds
        // 16 bytes.
        if resolved.padding > 0 && component_size + resolved.padding > SLOT_BYTE_BUDGET {
            resolved.padding = SLOT_BYTE_BUDGET.saturating_sub(component_size);
        }

        let base_slot = self.attributes.add_attribute(&resolved)?;
        let attr = self
            .attributes
            .attribute(base_slot)
            .expect("base attribute just committed");
        self.streams.append_attribute(base_slot, attr);
        Ok(())
    }

    /// The attribute slot table.
    pub fn attributes(&self) -> &AttributeArrayLayout {
        &self.attributes
    }

    /// The stream slot table.
    pub fn streams(&self) -> &StreamArrayLayout {
        &self.streams
    }

    /// Get the attribute at a slot, if any.
    pub fn attribute(&self, slot: u32) -> Option<&GenericAttribute> {
        self.attributes.attribute(slot)
    }

    /// Get the stream at a slot, if registered.
    pub fn stream(&self, slot: u32) -> Option<&StreamDescriptor> {
        self.streams.stream(slot)
    }

    /// Find the base slot registered under a semantic name.
    pub fn find_by_name(&self, name: &str) -> Option<u32> {
        self.attributes.find_by_name(name)
    }

    /// Find the first base attribute with exactly these semantic flags.
    pub fn find_by_semantics(&self, semantics: VertexSemantics) -> Option<u32> {
        self.attributes.find_by_semantics(semantics)
    }

    /// Deterministic textual encoding of this layout.
    ///
    /// Usable as a cache key; see [`signature::parse_signature`] for the
    /// inverse.
    pub fn signature(&self) -> String {
        signature::to_signature(self)
    }

    /// Clear both tables back to the empty state.
    pub fn reset(&mut self) {
        self.attributes.reset();
        self.streams.reset();
    }
}

impl fmt::Display for VertexStreamLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::VertexFormat;
    use rstest::rstest;

    fn def(
        format: VertexFormat,
        slot: u32,
        stream: u32,
        name: &str,
    ) -> VertexAttributeDefinition {
        VertexAttributeDefinition::new(format, slot, name).with_stream(stream)
    }

    #[test]
    fn test_build_interleaved_stream() {
        let layout = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION"),
            def(VertexFormat::Float3, 1, 0, "NORMAL"),
            def(VertexFormat::Float2, 2, 0, "TEXCOORD0"),
        ])
        .unwrap();

        assert_eq!(layout.attributes().active_count(), 3);
        assert_eq!(layout.streams().active_count(), 1);
        assert_eq!(layout.stream(0).unwrap().stride, 32);
        assert_eq!(layout.attribute(0).unwrap().offset, 0);
        assert_eq!(layout.attribute(1).unwrap().offset, 12);
        assert_eq!(layout.attribute(2).unwrap().offset, 24);
        assert_eq!(layout.stream(0).unwrap().rate, DataRate::PerVertex);
    }

    #[test]
    fn test_append_resolves_against_current_stride() {
        // First attribute explicit at 0, second appended lands at 12.
        let layout = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION").with_offset(0),
            def(VertexFormat::Float3, 1, 0, "NORMAL"),
        ])
        .unwrap();
        assert_eq!(layout.attribute(1).unwrap().offset, 12);
    }

    #[test]
    fn test_definition_order_is_significant() {
        let a = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION"),
            def(VertexFormat::Float3, 1, 0, "NORMAL"),
        ])
        .unwrap();
        let b = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 1, 0, "NORMAL"),
            def(VertexFormat::Float3, 0, 0, "POSITION"),
        ])
        .unwrap();

        // Same slots and stride, different data placement.
        assert_ne!(a, b);
        assert_eq!(a.attribute(0).unwrap().offset, 0);
        assert_eq!(b.attribute(0).unwrap().offset, 12);
    }

    #[test]
    fn test_multi_stream_rates() {
        let layout = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION"),
            def(VertexFormat::Float4, 10, 1, "INSTANCE_TRANSFORM")
                .with_group_size(4)
                .per_instance(),
        ])
        .unwrap();

        assert_eq!(layout.stream(0).unwrap().rate, DataRate::PerVertex);
        assert_eq!(layout.stream(1).unwrap().rate, DataRate::PerInstance);
        assert_eq!(layout.stream(1).unwrap().stride, 64);
        assert_eq!(layout.attribute(13).unwrap().offset, 48);
    }

    #[test]
    fn test_rate_conflict_rejected() {
        let err = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION"),
            def(VertexFormat::Float4, 1, 0, "INSTANCE_TRANSFORM").per_instance(),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            LayoutError::StreamRateConflict {
                slot: 0,
                existing: DataRate::PerVertex,
                requested: DataRate::PerInstance,
            }
        );
    }

    #[test]
    fn test_undefined_rate_rejected() {
        let mut bad = def(VertexFormat::Float3, 0, 0, "POSITION");
        bad.rate = DataRate::Undefined;
        assert_eq!(
            VertexStreamLayout::build(&[bad]),
            Err(LayoutError::UndefinedDataRate(0))
        );
    }

    #[test]
    fn test_overlap_aborts_build() {
        let err = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION"),
            def(VertexFormat::Float3, 0, 0, "NORMAL"),
        ])
        .unwrap_err();
        assert_eq!(err, LayoutError::SlotOccupied(0));
    }

    #[test]
    fn test_incremental_failure_keeps_earlier_commits() {
        // The low-level path has no rollback: earlier definitions stay.
        let mut layout = VertexStreamLayout::new();
        layout
            .add_definition(&def(VertexFormat::Float3, 0, 0, "POSITION"))
            .unwrap();
        let err = layout
            .add_definition(&def(VertexFormat::Float3, 0, 0, "NORMAL"))
            .unwrap_err();

        assert_eq!(err, LayoutError::SlotOccupied(0));
        assert!(layout.attributes().is_active(0));
        assert_eq!(layout.attribute(0).unwrap().name, "POSITION");
        assert_eq!(layout.stream(0).unwrap().stride, 12);
    }

    #[rstest]
    #[case(10, 4)] // 12 + 10 busts the budget, clamped to 12 + 4 = 16
    #[case(4, 4)] // exactly at the budget, kept
    #[case(2, 2)] // under the budget, kept
    #[case(0, 0)] // zero padding is never touched
    fn test_padding_clamp(#[case] requested: u32, #[case] committed: u32) {
        let layout = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION").with_padding(requested)
        ])
        .unwrap();
        assert_eq!(layout.attribute(0).unwrap().padding, committed);
        assert_eq!(layout.stream(0).unwrap().stride, 12 + committed);
    }

    #[test]
    fn test_aligned_append() {
        let layout = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION"),
            def(VertexFormat::Float3, 1, 0, "NORMAL").with_aligned_append(),
        ])
        .unwrap();

        // Stride is 12 when NORMAL resolves: offset rounds up to 16 and
        // the component is padded out to the full 16-byte slot budget.
        let normal = layout.attribute(1).unwrap();
        assert_eq!(normal.offset, 16);
        assert_eq!(normal.padding, 4);
    }

    #[test]
    fn test_aligned_append_on_aligned_stride() {
        let layout = VertexStreamLayout::build(&[
            def(VertexFormat::Float4, 0, 0, "COLOR"),
            def(VertexFormat::Float4, 1, 0, "BLEND_WEIGHTS").with_aligned_append(),
        ])
        .unwrap();

        let weights = layout.attribute(1).unwrap();
        assert_eq!(weights.offset, 16);
        assert_eq!(weights.padding, 0);
        assert_eq!(layout.stream(0).unwrap().stride, 32);
    }

    #[test]
    fn test_equality_ignores_build_path() {
        let appended = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION"),
            def(VertexFormat::Float3, 1, 0, "NORMAL"),
        ])
        .unwrap();
        let explicit = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION").with_offset(0),
            def(VertexFormat::Float3, 1, 0, "NORMAL").with_offset(12),
        ])
        .unwrap();
        assert_eq!(appended, explicit);
    }

    #[test]
    fn test_reset() {
        let mut layout = VertexStreamLayout::build(&[
            def(VertexFormat::Float3, 0, 0, "POSITION"),
        ])
        .unwrap();
        layout.reset();
        assert_eq!(layout, VertexStreamLayout::new());
        assert_eq!(layout.attributes().active_count(), 0);
        assert_eq!(layout.streams().active_count(), 0);
    }
}
