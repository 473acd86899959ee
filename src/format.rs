//! Vertex data formats and the fixed pipeline companions carried alongside
//! a layout.
//!
//! A [`VertexFormat`] is the unit of layout algebra: every attribute slot
//! holds exactly one format, and strides/offsets are sums of format sizes
//! plus padding. Formats are an explicit enumeration with derived numeric
//! properties; nothing in this crate reinterprets raw bytes.
//!
//! Each format has a compact code (`"3F32"`, `"4U8N"`, ...) used by the
//! layout signature: component count, scalar type, and a trailing `N` for
//! normalized integer formats.

/// Format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexFormat {
    /// No format. Rejected by validation; only used for empty slots.
    #[default]
    Undefined,
    /// Single 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Two 16-bit floats.
    Half2,
    /// Four 16-bit floats.
    Half4,
    /// Single 32-bit signed integer.
    Int,
    /// Two 32-bit signed integers.
    Int2,
    /// Three 32-bit signed integers.
    Int3,
    /// Four 32-bit signed integers.
    Int4,
    /// Single 32-bit unsigned integer.
    Uint,
    /// Two 32-bit unsigned integers.
    Uint2,
    /// Three 32-bit unsigned integers.
    Uint3,
    /// Four 32-bit unsigned integers.
    Uint4,
    /// Two 16-bit signed integers.
    Short2,
    /// Four 16-bit signed integers.
    Short4,
    /// Two 16-bit signed integers (normalized to -1.0..1.0).
    Short2Norm,
    /// Four 16-bit signed integers (normalized to -1.0..1.0).
    Short4Norm,
    /// Two 16-bit unsigned integers.
    Ushort2,
    /// Four 16-bit unsigned integers.
    Ushort4,
    /// Two 16-bit unsigned integers (normalized to 0.0..1.0).
    Ushort2Norm,
    /// Four 16-bit unsigned integers (normalized to 0.0..1.0).
    Ushort4Norm,
    /// Four 8-bit signed integers.
    Byte4,
    /// Four 8-bit signed integers (normalized to -1.0..1.0).
    Byte4Norm,
    /// Four 8-bit unsigned integers.
    Ubyte4,
    /// Four 8-bit unsigned integers (normalized to 0.0..1.0).
    Ubyte4Norm,
}

impl VertexFormat {
    /// Number of scalar components (0 for `Undefined`).
    pub fn component_count(&self) -> u32 {
        match self {
            Self::Undefined => 0,
            Self::Float | Self::Int | Self::Uint => 1,
            Self::Float2
            | Self::Half2
            | Self::Int2
            | Self::Uint2
            | Self::Short2
            | Self::Short2Norm
            | Self::Ushort2
            | Self::Ushort2Norm => 2,
            Self::Float3 | Self::Int3 | Self::Uint3 => 3,
            Self::Float4
            | Self::Half4
            | Self::Int4
            | Self::Uint4
            | Self::Short4
            | Self::Short4Norm
            | Self::Ushort4
            | Self::Ushort4Norm
            | Self::Byte4
            | Self::Byte4Norm
            | Self::Ubyte4
            | Self::Ubyte4Norm => 4,
        }
    }

    /// Size in bytes of one scalar component.
    pub fn component_size(&self) -> u32 {
        match self {
            Self::Undefined => 0,
            Self::Float
            | Self::Float2
            | Self::Float3
            | Self::Float4
            | Self::Int
            | Self::Int2
            | Self::Int3
            | Self::Int4
            | Self::Uint
            | Self::Uint2
            | Self::Uint3
            | Self::Uint4 => 4,
            Self::Half2
            | Self::Half4
            | Self::Short2
            | Self::Short4
            | Self::Short2Norm
            | Self::Short4Norm
            | Self::Ushort2
            | Self::Ushort4
            | Self::Ushort2Norm
            | Self::Ushort4Norm => 2,
            Self::Byte4 | Self::Byte4Norm | Self::Ubyte4 | Self::Ubyte4Norm => 1,
        }
    }

    /// Total size in bytes of this format.
    pub fn size(&self) -> u32 {
        self.component_count() * self.component_size()
    }

    /// Whether integer components are normalized to floats on fetch.
    pub fn is_normalized(&self) -> bool {
        matches!(
            self,
            Self::Short2Norm
                | Self::Short4Norm
                | Self::Ushort2Norm
                | Self::Ushort4Norm
                | Self::Byte4Norm
                | Self::Ubyte4Norm
        )
    }

    /// Compact format code used by the layout signature.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Undefined => "UNDEF",
            Self::Float => "1F32",
            Self::Float2 => "2F32",
            Self::Float3 => "3F32",
            Self::Float4 => "4F32",
            Self::Half2 => "2F16",
            Self::Half4 => "4F16",
            Self::Int => "1I32",
            Self::Int2 => "2I32",
            Self::Int3 => "3I32",
            Self::Int4 => "4I32",
            Self::Uint => "1U32",
            Self::Uint2 => "2U32",
            Self::Uint3 => "3U32",
            Self::Uint4 => "4U32",
            Self::Short2 => "2I16",
            Self::Short4 => "4I16",
            Self::Short2Norm => "2I16N",
            Self::Short4Norm => "4I16N",
            Self::Ushort2 => "2U16",
            Self::Ushort4 => "4U16",
            Self::Ushort2Norm => "2U16N",
            Self::Ushort4Norm => "4U16N",
            Self::Byte4 => "4I8",
            Self::Byte4Norm => "4I8N",
            Self::Ubyte4 => "4U8",
            Self::Ubyte4Norm => "4U8N",
        }
    }

    /// Parse a format code back into a format.
    ///
    /// Returns `None` for unknown codes; `Undefined` is never produced.
    pub fn from_code(code: &str) -> Option<Self> {
        let format = match code {
            "1F32" => Self::Float,
            "2F32" => Self::Float2,
            "3F32" => Self::Float3,
            "4F32" => Self::Float4,
            "2F16" => Self::Half2,
            "4F16" => Self::Half4,
            "1I32" => Self::Int,
            "2I32" => Self::Int2,
            "3I32" => Self::Int3,
            "4I32" => Self::Int4,
            "1U32" => Self::Uint,
            "2U32" => Self::Uint2,
            "3U32" => Self::Uint3,
            "4U32" => Self::Uint4,
            "2I16" => Self::Short2,
            "4I16" => Self::Short4,
            "2I16N" => Self::Short2Norm,
            "4I16N" => Self::Short4Norm,
            "2U16" => Self::Ushort2,
            "4U16" => Self::Ushort4,
            "2U16N" => Self::Ushort2Norm,
            "4U16N" => Self::Ushort4Norm,
            "4I8" => Self::Byte4,
            "4I8N" => Self::Byte4Norm,
            "4U8" => Self::Ubyte4,
            "4U8N" => Self::Ubyte4Norm,
            _ => return None,
        };
        Some(format)
    }
}

/// How vertices are assembled into primitives.
///
/// Carried through the pipeline-facing adapter unchanged; the layout engine
/// never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
}

/// Format of mesh indices.
///
/// Carried through the pipeline-facing adapter unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Size in bytes of each index.
    pub fn size(&self) -> u32 {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_format_sizes() {
        assert_eq!(VertexFormat::Float3.size(), 12);
        assert_eq!(VertexFormat::Float4.size(), 16);
        assert_eq!(VertexFormat::Half4.size(), 8);
        assert_eq!(VertexFormat::Ubyte4Norm.size(), 4);
        assert_eq!(VertexFormat::Undefined.size(), 0);
    }

    #[test]
    fn test_normalized_flags() {
        assert!(VertexFormat::Ubyte4Norm.is_normalized());
        assert!(VertexFormat::Short4Norm.is_normalized());
        assert!(!VertexFormat::Ubyte4.is_normalized());
        assert!(!VertexFormat::Float3.is_normalized());
    }

    #[rstest]
    #[case(VertexFormat::Float3, "3F32")]
    #[case(VertexFormat::Float4, "4F32")]
    #[case(VertexFormat::Uint2, "2U32")]
    #[case(VertexFormat::Ubyte4Norm, "4U8N")]
    #[case(VertexFormat::Short2Norm, "2I16N")]
    #[case(VertexFormat::Half2, "2F16")]
    fn test_code_round_trip(#[case] format: VertexFormat, #[case] code: &str) {
        assert_eq!(format.code(), code);
        assert_eq!(VertexFormat::from_code(code), Some(format));
    }

    #[test]
    fn test_unknown_codes_rejected() {
        assert_eq!(VertexFormat::from_code(""), None);
        assert_eq!(VertexFormat::from_code("5F32"), None);
        assert_eq!(VertexFormat::from_code("UNDEF"), None);
        assert_eq!(VertexFormat::from_code("3f32"), None);
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint16.size(), 2);
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }
}
