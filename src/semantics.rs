//! Semantic registry: attribute names and their flag encoding.
//!
//! Semantics identify what an attribute *means* independently of where it
//! lands in the slot tables. The registry maps well-known names
//! ("POSITION", "TEXCOORD0", ...) to single-bit flags and back, and
//! resolves the short aliases used in serialized layout signatures.
//!
//! Both directions are total: an empty name maps to no flags, and any
//! non-empty name outside the standard set maps to [`VertexSemantics::CUSTOM`]
//! so that "no semantics" and "application-defined semantics" are always
//! distinguishable.

use std::collections::HashMap;
use std::sync::OnceLock;

use bitflags::bitflags;

bitflags! {
    /// Semantic flags for vertex attributes.
    ///
    /// Standard attributes carry exactly one bit, with one documented
    /// exception: [`Self::TEXCOORD01`], two texture coordinate sets packed
    /// into a single four-component attribute, carries both texcoord bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VertexSemantics: u32 {
        /// Vertex position.
        const POSITION = 1 << 0;
        /// Vertex normal.
        const NORMAL = 1 << 1;
        /// Vertex tangent.
        const TANGENT = 1 << 2;
        /// Vertex bitangent.
        const BITANGENT = 1 << 3;
        /// Vertex color.
        const COLOR = 1 << 4;
        /// Texture coordinate set 0.
        const TEXCOORD0 = 1 << 5;
        /// Texture coordinate set 1.
        const TEXCOORD1 = 1 << 6;
        /// Bone indices for skinning.
        const BLEND_INDICES = 1 << 7;
        /// Bone weights for skinning.
        const BLEND_WEIGHTS = 1 << 8;
        /// Per-instance transform (a semantic group of four vectors).
        const INSTANCE_TRANSFORM = 1 << 9;
        /// Application-defined attribute outside the standard set.
        const CUSTOM = 1 << 15;

        /// Texture coordinate sets 0 and 1 packed into one attribute.
        const TEXCOORD01 = Self::TEXCOORD0.bits() | Self::TEXCOORD1.bits();
    }
}

/// Standard name, flags, and signature short alias, in registry order.
const STANDARD: &[(&str, VertexSemantics, &str)] = &[
    ("POSITION", VertexSemantics::POSITION, "Pos"),
    ("NORMAL", VertexSemantics::NORMAL, "Nml"),
    ("TANGENT", VertexSemantics::TANGENT, "Tan"),
    ("BITANGENT", VertexSemantics::BITANGENT, "Btn"),
    ("COLOR", VertexSemantics::COLOR, "Col"),
    ("TEXCOORD0", VertexSemantics::TEXCOORD0, "Tc0"),
    ("TEXCOORD1", VertexSemantics::TEXCOORD1, "Tc1"),
    ("TEXCOORD01", VertexSemantics::TEXCOORD01, "Tcp"),
    ("BLEND_INDICES", VertexSemantics::BLEND_INDICES, "BlI"),
    ("BLEND_WEIGHTS", VertexSemantics::BLEND_WEIGHTS, "BlW"),
    ("INSTANCE_TRANSFORM", VertexSemantics::INSTANCE_TRANSFORM, "Ins"),
];

fn name_table() -> &'static HashMap<&'static str, VertexSemantics> {
    static TABLE: OnceLock<HashMap<&'static str, VertexSemantics>> = OnceLock::new();
    TABLE.get_or_init(|| STANDARD.iter().map(|&(name, flags, _)| (name, flags)).collect())
}

fn alias_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| STANDARD.iter().map(|&(name, _, short)| (short, name)).collect())
}

impl VertexSemantics {
    /// Resolve a semantic name to flags.
    ///
    /// Total: an empty name yields no flags, a standard name yields its
    /// flags, and any other name yields [`Self::CUSTOM`].
    ///
    /// Named to stay clear of the flag-name lookup `bitflags` generates
    /// on every flags type.
    pub fn from_semantic_name(name: &str) -> Self {
        if name.is_empty() {
            return Self::empty();
        }
        name_table().get(name).copied().unwrap_or(Self::CUSTOM)
    }

    /// Resolve flags back to a standard semantic name.
    ///
    /// Total: standard flags (including the packed texcoord pair) yield
    /// their name; anything else, including `CUSTOM` and the empty set,
    /// yields `""`. Custom attributes carry their own name alongside their
    /// flags, so the registry never needs to invent one.
    pub fn name(&self) -> &'static str {
        STANDARD
            .iter()
            .find(|&&(_, flags, _)| flags == *self)
            .map(|&(name, _, _)| name)
            .unwrap_or("")
    }

    /// Whether these flags denote exactly one standard attribute.
    ///
    /// True for exactly one standard single bit, or for the two-bit packed
    /// texcoord pair [`Self::TEXCOORD01`] (the one documented exception).
    pub fn is_standard_attribute(&self) -> bool {
        if *self == Self::TEXCOORD01 {
            return true;
        }
        self.bits().count_ones() == 1 && !self.intersects(Self::CUSTOM)
    }
}

/// Expand a signature short alias ("Pos") to its full name ("POSITION").
///
/// Returns `None` for anything that is not a registered alias; the
/// serializer then treats the string as a full (possibly custom) name.
pub fn expand_short_name(short: &str) -> Option<&'static str> {
    alias_table().get(short).copied()
}

/// Short alias for a standard semantic name, if one is registered.
pub fn short_name(full: &str) -> Option<&'static str> {
    STANDARD
        .iter()
        .find(|&&(name, _, _)| name == full)
        .map(|&(_, _, short)| short)
}
