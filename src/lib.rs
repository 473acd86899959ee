//! # vertex-layout
//!
//! Vertex attribute and stream layout engine: decides how semantically
//! named attributes (position, normal, texture coordinates, per-instance
//! data, ...) pack into a fixed set of hardware input slots and data
//! streams, resolving byte offsets, strides, and padding.
//!
//! This crate owns only the data-layout algebra. GPU resource creation,
//! shader compilation, and draw submission are external collaborators
//! that consume the resolved tables through [`VertexInputState`].
//!
//! ## Example
//!
//! ```
//! use vertex_layout::{VertexAttributeDefinition, VertexFormat, VertexStreamLayout};
//!
//! let layout = VertexStreamLayout::build(&[
//!     VertexAttributeDefinition::new(VertexFormat::Float3, 0, "POSITION"),
//!     VertexAttributeDefinition::new(VertexFormat::Float3, 1, "NORMAL"),
//! ])
//! .unwrap();
//!
//! assert_eq!(layout.stream(0).unwrap().stride, 24);
//! assert_eq!(
//!     layout.signature(),
//!     "#S0(V)=24<A0POSITION:0:3F32|A1NORMAL:12:3F32>"
//! );
//! ```

pub mod adapter;
pub mod attribute;
pub mod cache;
pub mod definition;
pub mod error;
pub mod format;
pub mod key;
pub mod layout;
pub mod semantics;
pub mod signature;
pub mod stream;

pub use adapter::{VertexInputElement, VertexInputRow, VertexInputState};
pub use attribute::{AttributeArrayLayout, GenericAttribute};
pub use cache::LayoutCache;
pub use definition::{AttributeOffset, DataRate, VertexAttributeDefinition};
pub use error::LayoutError;
pub use format::{IndexFormat, PrimitiveTopology, VertexFormat};
pub use key::AttributeKey;
pub use layout::VertexStreamLayout;
pub use semantics::VertexSemantics;
pub use signature::{parse_signature, to_signature};
pub use stream::{StreamArrayLayout, StreamDescriptor};

/// Number of attribute slots the vertex input stage reads from.
pub const MAX_VERTEX_ATTRIBUTES: u32 = 16;

/// Number of stream (buffer binding) slots.
pub const MAX_VERTEX_STREAMS: u32 = 16;

/// Largest semantic group: contiguous slots forming one logical attribute.
pub const MAX_SEMANTIC_GROUP_SIZE: u32 = 4;

/// Per-slot byte budget: a component plus its padding never exceeds this.
pub const SLOT_BYTE_BUDGET: u32 = 16;

// Occupancy masks are u16, one bit per slot.
static_assertions::const_assert!(MAX_VERTEX_ATTRIBUTES <= 16);
static_assertions::const_assert!(MAX_VERTEX_STREAMS <= 16);
static_assertions::const_assert!(MAX_SEMANTIC_GROUP_SIZE <= MAX_VERTEX_ATTRIBUTES);

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the layout engine.
///
/// Optional; only logs the version so engine startup banners can include
/// it.
pub fn init() {
    log::info!("vertex-layout v{VERSION} initialized");
}
