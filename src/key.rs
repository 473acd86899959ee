//! Pre-baked attribute key constants.
//!
//! An [`AttributeKey`] is an immutable value describing a standard
//! attribute: base slot, semantic group size, per-instance flag, semantic
//! flags, and base format. Keys exist so common attribute sets can be
//! spelled as constants and expanded into definitions on demand; they
//! never enter the slot tables themselves.
//!
//! Slot, group, instancing, and semantic bits are packed into one word as
//! an internal representation only; all access goes through the named
//! accessors.

use crate::definition::VertexAttributeDefinition;
use crate::format::VertexFormat;
use crate::semantics::VertexSemantics;

const SLOT_SHIFT: u32 = 0;
const GROUP_SHIFT: u32 = 8;
const INSTANCED_BIT: u32 = 1 << 12;
const SEMANTICS_SHIFT: u32 = 16;

/// Compact description of a standard vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    bits: u32,
    format: VertexFormat,
}

impl AttributeKey {
    /// Position at slot 0, three floats.
    pub const POSITION: Self = Self::new(0, 1, false, VertexSemantics::POSITION, VertexFormat::Float3);
    /// Normal at slot 1, three floats.
    pub const NORMAL: Self = Self::new(1, 1, false, VertexSemantics::NORMAL, VertexFormat::Float3);
    /// Tangent at slot 2, three floats.
    pub const TANGENT: Self = Self::new(2, 1, false, VertexSemantics::TANGENT, VertexFormat::Float3);
    /// Bitangent at slot 3, three floats.
    pub const BITANGENT: Self =
        Self::new(3, 1, false, VertexSemantics::BITANGENT, VertexFormat::Float3);
    /// First texture coordinate set at slot 4, two floats.
    pub const TEXCOORD0: Self =
        Self::new(4, 1, false, VertexSemantics::TEXCOORD0, VertexFormat::Float2);
    /// Second texture coordinate set at slot 5, two floats.
    pub const TEXCOORD1: Self =
        Self::new(5, 1, false, VertexSemantics::TEXCOORD1, VertexFormat::Float2);
    /// Both texture coordinate sets packed into slot 4, four floats.
    pub const TEXCOORD01: Self =
        Self::new(4, 1, false, VertexSemantics::TEXCOORD01, VertexFormat::Float4);
    /// Color at slot 6, four normalized bytes.
    pub const COLOR: Self = Self::new(6, 1, false, VertexSemantics::COLOR, VertexFormat::Ubyte4Norm);
    /// Bone indices at slot 7, four unsigned shorts.
    pub const BLEND_INDICES: Self = Self::new(
        7,
        1,
        false,
        VertexSemantics::BLEND_INDICES,
        VertexFormat::Ushort4,
    );
    /// Bone weights at slot 8, four floats.
    pub const BLEND_WEIGHTS: Self = Self::new(
        8,
        1,
        false,
        VertexSemantics::BLEND_WEIGHTS,
        VertexFormat::Float4,
    );
    /// Per-instance transform: four float4 columns in slots 10-13.
    pub const INSTANCE_TRANSFORM: Self = Self::new(
        10,
        4,
        true,
        VertexSemantics::INSTANCE_TRANSFORM,
        VertexFormat::Float4,
    );

    /// Create a key from its parts.
    pub const fn new(
        slot: u8,
        group_size: u8,
        instanced: bool,
        semantics: VertexSemantics,
        format: VertexFormat,
    ) -> Self {
        let mut bits = (slot as u32) << SLOT_SHIFT;
        bits |= (group_size as u32) << GROUP_SHIFT;
        if instanced {
            bits |= INSTANCED_BIT;
        }
        bits |= semantics.bits() << SEMANTICS_SHIFT;
        Self { bits, format }
    }

    /// Base attribute slot.
    pub const fn slot(&self) -> u32 {
        (self.bits >> SLOT_SHIFT) & 0xff
    }

    /// Semantic group size.
    pub const fn group_size(&self) -> u32 {
        (self.bits >> GROUP_SHIFT) & 0xf
    }

    /// Whether the attribute is fed at per-instance rate.
    pub const fn is_instanced(&self) -> bool {
        self.bits & INSTANCED_BIT != 0
    }

    /// Semantic flags.
    pub fn semantics(&self) -> VertexSemantics {
        VertexSemantics::from_bits_truncate(self.bits >> SEMANTICS_SHIFT)
    }

    /// Base data format.
    pub const fn format(&self) -> VertexFormat {
        self.format
    }

    /// Expand into a definition with append placement on the given stream.
    pub fn definition(&self, stream_slot: u32) -> VertexAttributeDefinition {
        let mut def =
            VertexAttributeDefinition::from_semantics(self.format, self.slot(), self.semantics())
                .with_stream(stream_slot)
                .with_group_size(self.group_size());
        if self.is_instanced() {
            def = def.per_instance();
        }
        def
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{AttributeOffset, DataRate};

    #[test]
    fn test_pack_unpack() {
        let key = AttributeKey::new(
            13,
            3,
            true,
            VertexSemantics::CUSTOM,
            VertexFormat::Ushort4Norm,
        );
        assert_eq!(key.slot(), 13);
        assert_eq!(key.group_size(), 3);
        assert!(key.is_instanced());
        assert_eq!(key.semantics(), VertexSemantics::CUSTOM);
        assert_eq!(key.format(), VertexFormat::Ushort4Norm);
    }

    #[test]
    fn test_standard_constants() {
        assert_eq!(AttributeKey::POSITION.slot(), 0);
        assert_eq!(AttributeKey::POSITION.format(), VertexFormat::Float3);
        assert!(!AttributeKey::POSITION.is_instanced());

        assert_eq!(AttributeKey::INSTANCE_TRANSFORM.group_size(), 4);
        assert!(AttributeKey::INSTANCE_TRANSFORM.is_instanced());
        assert_eq!(
            AttributeKey::INSTANCE_TRANSFORM.semantics(),
            VertexSemantics::INSTANCE_TRANSFORM
        );
    }

    #[test]
    fn test_definition_expansion() {
        let def = AttributeKey::INSTANCE_TRANSFORM.definition(1);
        assert_eq!(def.base_slot, 10);
        assert_eq!(def.group_size, 4);
        assert_eq!(def.stream_slot, 1);
        assert_eq!(def.rate, DataRate::PerInstance);
        assert_eq!(def.offset, AttributeOffset::Append);
        assert_eq!(def.name, "INSTANCE_TRANSFORM");
        assert!(def.validate().is_ok());

        let def = AttributeKey::POSITION.definition(0);
        assert_eq!(def.rate, DataRate::PerVertex);
        assert_eq!(def.semantics, VertexSemantics::POSITION);
    }
}
