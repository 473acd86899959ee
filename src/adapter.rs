//! Pipeline-facing view of a built layout.
//!
//! The GPU command interface consumes a flat, slot-indexed table rather
//! than the layout engine's arenas. [`VertexInputState`] is that
//! translation, produced once on demand; primitive topology and index
//! format are carried alongside unchanged because pipelines bundle them
//! with vertex input, but the layout engine never computes them.

use bytemuck::{Pod, Zeroable};

use crate::definition::DataRate;
use crate::format::{IndexFormat, PrimitiveTopology, VertexFormat};
use crate::layout::VertexStreamLayout;
use crate::semantics::VertexSemantics;
use crate::{MAX_VERTEX_ATTRIBUTES, MAX_VERTEX_STREAMS};

/// One slot of the flat attribute table.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexInputElement {
    /// Data format of the slot.
    pub format: VertexFormat,
    /// Data rate of the feeding stream.
    pub rate: DataRate,
    /// Stream slot feeding this attribute.
    pub stream_slot: u32,
    /// Stream-relative byte offset.
    pub offset: u32,
    /// Semantic name.
    pub name: String,
    /// Semantic flags.
    pub semantics: VertexSemantics,
    /// Component index within the semantic group.
    pub semantic_index: u32,
}

/// GPU-compatible row of the packed attribute table.
///
/// `#[repr(C)]` with a fixed 16-byte footprint so the whole table can be
/// hashed or uploaded as raw bytes. Empty slots are all zeroes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct VertexInputRow {
    /// Format code index (0 for empty slots).
    pub format: u32,
    /// Stream slot.
    pub stream_slot: u32,
    /// Stream-relative byte offset.
    pub offset: u32,
    /// 1 for per-instance data, 0 otherwise.
    pub instanced: u32,
}

/// Flat description of a layout for the GPU command interface.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexInputState {
    /// Per-slot elements; `None` for empty slots.
    pub elements: [Option<VertexInputElement>; MAX_VERTEX_ATTRIBUTES as usize],
    /// Per-stream strides in slot order (0 for unregistered streams).
    pub strides: [u32; MAX_VERTEX_STREAMS as usize],
    /// Occupancy bitmask of registered streams.
    pub stream_mask: u16,
    /// Primitive topology, passed through unchanged.
    pub topology: PrimitiveTopology,
    /// Index format, passed through unchanged (`None` for non-indexed).
    pub index_format: Option<IndexFormat>,
}

impl VertexInputState {
    /// Translate a built layout, carrying topology and index format through.
    pub fn from_layout(
        layout: &VertexStreamLayout,
        topology: PrimitiveTopology,
        index_format: Option<IndexFormat>,
    ) -> Self {
        let elements = std::array::from_fn(|slot| {
            let attr = layout.attribute(slot as u32)?;
            let rate = layout
                .stream(attr.stream_slot)
                .map(|s| s.rate)
                .unwrap_or(DataRate::Undefined);
            Some(VertexInputElement {
                format: attr.format,
                rate,
                stream_slot: attr.stream_slot,
                offset: attr.offset,
                name: attr.name.clone(),
                semantics: attr.semantics,
                semantic_index: attr.semantic_index,
            })
        });

        let mut strides = [0; MAX_VERTEX_STREAMS as usize];
        for (slot, stream) in layout.streams().iter() {
            strides[slot as usize] = stream.stride;
        }

        Self {
            elements,
            strides,
            stream_mask: layout.streams().occupancy_mask(),
            topology,
            index_format,
        }
    }

    /// Pack the table into GPU-compatible rows.
    pub fn rows(&self) -> [VertexInputRow; MAX_VERTEX_ATTRIBUTES as usize] {
        std::array::from_fn(|slot| match &self.elements[slot] {
            Some(element) => VertexInputRow {
                format: element.format as u32,
                stream_slot: element.stream_slot,
                offset: element.offset,
                instanced: (element.rate == DataRate::PerInstance) as u32,
            },
            None => VertexInputRow::zeroed(),
        })
    }
}
