//! Caller-facing attribute definitions.
//!
//! A [`VertexAttributeDefinition`] is the input to the combined layout
//! builder: it names a format, the attribute slots it wants, the stream
//! that feeds it, and where in that stream its data lives. Definitions are
//! plain values; nothing is resolved until the builder commits them.

use crate::error::LayoutError;
use crate::format::VertexFormat;
use crate::semantics::VertexSemantics;
use crate::{MAX_SEMANTIC_GROUP_SIZE, MAX_VERTEX_ATTRIBUTES, MAX_VERTEX_STREAMS};

/// How often a stream advances during rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataRate {
    /// No rate. Streams are never registered with this; it only marks
    /// empty stream slots.
    #[default]
    Undefined,
    /// The stream advances once per vertex.
    PerVertex,
    /// The stream advances once per instance.
    PerInstance,
}

/// Stream-relative placement of an attribute's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributeOffset {
    /// Place the attribute at this byte offset.
    Explicit(u32),
    /// Place the attribute immediately after the stream's current contents.
    #[default]
    Append,
    /// Append, rounded up to the next 16-byte boundary, padding the
    /// component itself out to 16 bytes.
    AppendAligned16,
}

/// A request to place one logical attribute (possibly a multi-slot
/// semantic group) into a layout.
///
/// Built raw, via the `with_*` builder methods, or from an
/// [`AttributeKey`](crate::AttributeKey) constant.
///
/// # Example
///
/// ```
/// use vertex_layout::{VertexAttributeDefinition, VertexFormat};
///
/// let position = VertexAttributeDefinition::new(VertexFormat::Float3, 0, "POSITION");
/// let instance = VertexAttributeDefinition::new(VertexFormat::Float4, 4, "INSTANCE_TRANSFORM")
///     .with_group_size(4)
///     .with_stream(1)
///     .per_instance();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttributeDefinition {
    /// Data format of each component of the group.
    pub format: VertexFormat,
    /// First attribute slot of the group.
    pub base_slot: u32,
    /// Number of contiguous slots the group occupies (1-4).
    pub group_size: u32,
    /// Extra bytes after each component.
    pub padding: u32,
    /// Stream slot feeding this attribute.
    pub stream_slot: u32,
    /// Stream-relative placement.
    pub offset: AttributeOffset,
    /// Data rate of the feeding stream.
    pub rate: DataRate,
    /// Semantic name ("POSITION", "WIND_PHASE", ...).
    pub name: String,
    /// Semantic flags, kept in sync with `name` by the constructors.
    pub semantics: VertexSemantics,
}

impl VertexAttributeDefinition {
    /// Create a per-vertex definition with append placement on stream 0.
    ///
    /// Semantic flags are resolved from the name through the registry.
    pub fn new(format: VertexFormat, base_slot: u32, name: impl Into<String>) -> Self {
        let name = name.into();
        let semantics = VertexSemantics::from_semantic_name(&name);
        Self {
            format,
            base_slot,
            group_size: 1,
            padding: 0,
            stream_slot: 0,
            offset: AttributeOffset::Append,
            rate: DataRate::PerVertex,
            name,
            semantics,
        }
    }

    /// Create a definition from standard flags, deriving the name from the
    /// registry.
    pub fn from_semantics(format: VertexFormat, base_slot: u32, semantics: VertexSemantics) -> Self {
        let mut def = Self::new(format, base_slot, semantics.name());
        def.semantics = semantics;
        def
    }

    /// Set the stream slot.
    pub fn with_stream(mut self, stream_slot: u32) -> Self {
        self.stream_slot = stream_slot;
        self
    }

    /// Set an explicit stream-relative byte offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = AttributeOffset::Explicit(offset);
        self
    }

    /// Use 16-byte-aligned append placement.
    pub fn with_aligned_append(mut self) -> Self {
        self.offset = AttributeOffset::AppendAligned16;
        self
    }

    /// Set the semantic group size (1-4 contiguous slots).
    pub fn with_group_size(mut self, group_size: u32) -> Self {
        self.group_size = group_size;
        self
    }

    /// Set per-component padding in bytes.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Mark the feeding stream as advancing per instance.
    pub fn per_instance(mut self) -> Self {
        self.rate = DataRate::PerInstance;
        self
    }

    /// Last attribute slot of the group (inclusive).
    ///
    /// Saturating: a base slot near `u32::MAX` is nonsense, but it must
    /// surface as a validation error, never as arithmetic overflow.
    pub fn last_slot(&self) -> u32 {
        self.base_slot.saturating_add(self.group_size.saturating_sub(1))
    }

    /// Validate format, slot ranges, and group size.
    ///
    /// Stream data-rate compatibility is checked later, against the stream
    /// table, and slot occupancy is checked by the attribute table.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.format == VertexFormat::Undefined {
            return Err(LayoutError::UndefinedFormat);
        }
        if self.group_size == 0 || self.group_size > MAX_SEMANTIC_GROUP_SIZE {
            return Err(LayoutError::GroupSizeOutOfRange(self.group_size));
        }
        if self.base_slot >= MAX_VERTEX_ATTRIBUTES || self.last_slot() >= MAX_VERTEX_ATTRIBUTES {
            return Err(LayoutError::AttributeSlotOutOfRange {
                slot: self.last_slot(),
                capacity: MAX_VERTEX_ATTRIBUTES,
            });
        }
        if self.stream_slot >= MAX_VERTEX_STREAMS {
            return Err(LayoutError::StreamSlotOutOfRange {
                slot: self.stream_slot,
                capacity: MAX_VERTEX_STREAMS,
            });
        }
        Ok(())
    }
}
