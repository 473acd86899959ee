//! Resolved attributes and the fixed-capacity attribute slot table.
//!
//! The [`AttributeArrayLayout`] is an arena of [`MAX_VERTEX_ATTRIBUTES`]
//! slots paired with an occupancy bitmask. Slot storage is allocated once
//! and never resized; occupancy is tracked purely through the mask, and a
//! cached inclusive active range lets range-overlap queries short-circuit
//! without scanning the table.

use std::collections::HashMap;

use crate::definition::{AttributeOffset, VertexAttributeDefinition};
use crate::error::LayoutError;
use crate::format::VertexFormat;
use crate::semantics::VertexSemantics;
use crate::MAX_VERTEX_ATTRIBUTES;

/// One resolved attribute, occupying exactly one slot.
///
/// A semantic-group definition resolves into one base attribute
/// (`semantic_index == 0`) plus `group_size - 1` derived sub-components
/// with increasing semantic index and offsets advanced by
/// `component size + padding`. Attributes live exclusively inside the
/// slot table that created them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenericAttribute {
    /// Data format of this slot's component.
    pub format: VertexFormat,
    /// Stream slot feeding this attribute.
    pub stream_slot: u32,
    /// Resolved stream-relative byte offset.
    pub offset: u32,
    /// Semantic name of the owning definition.
    pub name: String,
    /// Semantic flags of the owning definition.
    pub semantics: VertexSemantics,
    /// Index of this component within its semantic group (0 = base).
    pub semantic_index: u32,
    /// Total number of slots in the group.
    pub group_size: u32,
    /// Extra bytes after the component.
    pub padding: u32,
}

impl GenericAttribute {
    /// Bytes this slot contributes to its stream's stride.
    pub fn slot_size(&self) -> u32 {
        self.format.size() + self.padding
    }
}

/// Fixed-capacity table of resolved attributes, indexed by slot.
#[derive(Debug, Clone)]
pub struct AttributeArrayLayout {
    slots: [GenericAttribute; MAX_VERTEX_ATTRIBUTES as usize],
    mask: u16,
    active_count: u32,
    range: Option<(u32, u32)>,
    by_name: HashMap<String, u32>,
    // Base slots in the order their definitions were committed; the
    // serializer emits attributes in this order, not slot order.
    commit_order: Vec<u32>,
}

impl AttributeArrayLayout {
    /// Create an empty table. Slot storage is fully allocated up front.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| GenericAttribute::default()),
            mask: 0,
            active_count: 0,
            range: None,
            by_name: HashMap::new(),
            commit_order: Vec::new(),
        }
    }

    /// Whether a slot currently holds an attribute.
    pub fn is_active(&self, slot: u32) -> bool {
        slot < MAX_VERTEX_ATTRIBUTES && self.mask & (1 << slot) != 0
    }

    /// Get the attribute at a slot, if any.
    pub fn attribute(&self, slot: u32) -> Option<&GenericAttribute> {
        if self.is_active(slot) {
            Some(&self.slots[slot as usize])
        } else {
            None
        }
    }

    /// Number of occupied slots.
    pub fn active_count(&self) -> u32 {
        self.active_count
    }

    /// Occupancy bitmask, one bit per slot.
    pub fn occupancy_mask(&self) -> u16 {
        self.mask
    }

    /// Inclusive `(min, max)` occupied slot range, if any slot is occupied.
    pub fn active_range(&self) -> Option<(u32, u32)> {
        self.range
    }

    /// Whether `[base, base + count)` overlaps the active range bound.
    ///
    /// Necessary but not sufficient for a collision: the active range may
    /// contain internal gaps, so a positive answer still requires a
    /// per-slot scan.
    pub fn range_overlaps(&self, base: u32, count: u32) -> bool {
        match self.range {
            Some((min, max)) => base <= max && base + count > min,
            None => false,
        }
    }

    /// Check that every slot in `[base, base + count)` is free.
    pub fn check_space(&self, base: u32, count: u32) -> Result<(), LayoutError> {
        // Fast path: a group entirely outside the active range cannot
        // collide with anything.
        if !self.range_overlaps(base, count) {
            return Ok(());
        }
        for slot in base..base + count {
            if self.is_active(slot) {
                return Err(LayoutError::SlotOccupied(slot));
            }
        }
        Ok(())
    }

    /// Commit a definition with an already-resolved offset.
    ///
    /// Fails without mutating anything if the definition is invalid, its
    /// offset is still an append sentinel, or any slot of the group is
    /// occupied. On success writes the base attribute and its derived
    /// sub-components, updates the occupancy mask and the active range,
    /// and registers the base attribute's semantic name. Re-registering an
    /// existing name is allowed; the later definition wins.
    ///
    /// Returns the base slot index.
    pub fn add_attribute(&mut self, def: &VertexAttributeDefinition) -> Result<u32, LayoutError> {
        def.validate()?;
        let base_offset = match def.offset {
            AttributeOffset::Explicit(offset) => offset,
            _ => return Err(LayoutError::UnresolvedOffset),
        };
        self.check_space(def.base_slot, def.group_size)?;

        let component_size = def.format.size() + def.padding;
        for index in 0..def.group_size {
            let slot = def.base_slot + index;
            self.slots[slot as usize] = GenericAttribute {
                format: def.format,
                stream_slot: def.stream_slot,
                offset: base_offset + index * component_size,
                name: def.name.clone(),
                semantics: def.semantics,
                semantic_index: index,
                group_size: def.group_size,
                padding: def.padding,
            };
            self.mask |= 1 << slot;
            self.active_count += 1;
        }

        self.range = Some(match self.range {
            Some((min, max)) => (min.min(def.base_slot), max.max(def.last_slot())),
            None => (def.base_slot, def.last_slot()),
        });

        if !def.name.is_empty() {
            self.by_name.insert(def.name.clone(), def.base_slot);
        }
        self.commit_order.push(def.base_slot);

        Ok(def.base_slot)
    }

    /// Find the base slot registered under a semantic name.
    pub fn find_by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Find the first base attribute whose flags match exactly.
    pub fn find_by_semantics(&self, semantics: VertexSemantics) -> Option<u32> {
        self.iter()
            .find(|(_, attr)| attr.semantic_index == 0 && attr.semantics == semantics)
            .map(|(slot, _)| slot)
    }

    /// Iterate over `(slot, attribute)` for every occupied slot.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &GenericAttribute)> + '_ {
        (0..MAX_VERTEX_ATTRIBUTES).filter_map(move |slot| Some((slot, self.attribute(slot)?)))
    }

    /// Iterate over `(base slot, base attribute)` in commit order.
    pub fn iter_base_attributes(&self) -> impl Iterator<Item = (u32, &GenericAttribute)> + '_ {
        self.commit_order
            .iter()
            .filter_map(move |&slot| Some((slot, self.attribute(slot)?)))
    }

    /// Clear every slot, the occupancy mask, the active range, and the
    /// name map. The fixed slot storage itself is kept.
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = GenericAttribute::default();
        }
        self.mask = 0;
        self.active_count = 0;
        self.range = None;
        self.by_name.clear();
        self.commit_order.clear();
    }
}

impl Default for AttributeArrayLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for AttributeArrayLayout {
    fn eq(&self, other: &Self) -> bool {
        // Slot contents decide equality; the name map is derived state.
        self.mask == other.mask
            && (0..MAX_VERTEX_ATTRIBUTES).all(|slot| self.attribute(slot) == other.attribute(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position() -> VertexAttributeDefinition {
        VertexAttributeDefinition::new(VertexFormat::Float3, 0, "POSITION").with_offset(0)
    }

    #[test]
    fn test_add_single_attribute() {
        let mut layout = AttributeArrayLayout::new();
        let slot = layout.add_attribute(&position()).unwrap();
        assert_eq!(slot, 0);
        assert!(layout.is_active(0));
        assert_eq!(layout.active_count(), 1);
        assert_eq!(layout.active_range(), Some((0, 0)));
        assert_eq!(layout.occupancy_mask(), 0b1);

        let attr = layout.attribute(0).unwrap();
        assert_eq!(attr.offset, 0);
        assert_eq!(attr.semantic_index, 0);
        assert_eq!(attr.semantics, VertexSemantics::POSITION);
    }

    #[test]
    fn test_add_semantic_group() {
        let mut layout = AttributeArrayLayout::new();
        let def = VertexAttributeDefinition::new(VertexFormat::Float4, 10, "INSTANCE_TRANSFORM")
            .with_group_size(4)
            .with_stream(1)
            .with_offset(0)
            .per_instance();
        layout.add_attribute(&def).unwrap();

        assert_eq!(layout.active_count(), 4);
        assert_eq!(layout.active_range(), Some((10, 13)));
        for index in 0..4 {
            let attr = layout.attribute(10 + index).unwrap();
            assert_eq!(attr.semantic_index, index);
            assert_eq!(attr.offset, index * 16);
            assert_eq!(attr.group_size, 4);
        }
        assert_eq!(layout.find_by_name("INSTANCE_TRANSFORM"), Some(10));
    }

    #[test]
    fn test_group_offsets_include_padding() {
        let mut layout = AttributeArrayLayout::new();
        let def = VertexAttributeDefinition::new(VertexFormat::Float3, 4, "TANGENT_FRAME")
            .with_group_size(2)
            .with_padding(4)
            .with_offset(8);
        layout.add_attribute(&def).unwrap();

        assert_eq!(layout.attribute(4).unwrap().offset, 8);
        assert_eq!(layout.attribute(5).unwrap().offset, 8 + 16);
    }

    #[test]
    fn test_occupied_slot_rejected_without_mutation() {
        let mut layout = AttributeArrayLayout::new();
        layout.add_attribute(&position()).unwrap();

        let overlapping = VertexAttributeDefinition::new(VertexFormat::Float2, 0, "TEXCOORD0")
            .with_offset(12);
        assert_eq!(
            layout.add_attribute(&overlapping),
            Err(LayoutError::SlotOccupied(0))
        );
        assert_eq!(layout.active_count(), 1);
        assert_eq!(layout.attribute(0).unwrap().name, "POSITION");
    }

    #[test]
    fn test_group_overlap_detected_past_range_gap() {
        let mut layout = AttributeArrayLayout::new();
        // Occupy slots 0 and 3, leaving a gap at 1-2.
        layout.add_attribute(&position()).unwrap();
        layout
            .add_attribute(
                &VertexAttributeDefinition::new(VertexFormat::Float3, 3, "NORMAL").with_offset(12),
            )
            .unwrap();

        // The gap inside the active range is genuinely free.
        let inside_gap = VertexAttributeDefinition::new(VertexFormat::Float2, 1, "TEXCOORD0")
            .with_group_size(2)
            .with_offset(24);
        assert!(layout.add_attribute(&inside_gap).is_ok());

        // A group straddling slot 3 collides.
        let straddle = VertexAttributeDefinition::new(VertexFormat::Float4, 3, "COLOR")
            .with_offset(0);
        assert_eq!(
            layout.add_attribute(&straddle),
            Err(LayoutError::SlotOccupied(3))
        );
    }

    #[test]
    fn test_unresolved_offset_rejected() {
        let mut layout = AttributeArrayLayout::new();
        let def = VertexAttributeDefinition::new(VertexFormat::Float3, 0, "POSITION");
        assert_eq!(layout.add_attribute(&def), Err(LayoutError::UnresolvedOffset));
    }

    #[test]
    fn test_name_shadowing_last_write_wins() {
        let mut layout = AttributeArrayLayout::new();
        layout.add_attribute(&position()).unwrap();
        layout
            .add_attribute(
                &VertexAttributeDefinition::new(VertexFormat::Float4, 2, "POSITION").with_offset(0),
            )
            .unwrap();
        assert_eq!(layout.find_by_name("POSITION"), Some(2));
    }

    #[test]
    fn test_find_by_semantics() {
        let mut layout = AttributeArrayLayout::new();
        layout.add_attribute(&position()).unwrap();
        layout
            .add_attribute(
                &VertexAttributeDefinition::new(VertexFormat::Float3, 1, "NORMAL").with_offset(12),
            )
            .unwrap();

        assert_eq!(layout.find_by_semantics(VertexSemantics::NORMAL), Some(1));
        assert_eq!(layout.find_by_semantics(VertexSemantics::COLOR), None);
    }

    #[test]
    fn test_base_attributes_iterate_in_commit_order() {
        let mut layout = AttributeArrayLayout::new();
        layout
            .add_attribute(
                &VertexAttributeDefinition::new(VertexFormat::Float3, 3, "NORMAL").with_offset(0),
            )
            .unwrap();
        layout.add_attribute(&position()).unwrap();

        let order: Vec<_> = layout.iter_base_attributes().map(|(slot, _)| slot).collect();
        assert_eq!(order, vec![3, 0]);

        // Slot-order iteration is unaffected.
        let slots: Vec<_> = layout.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![0, 3]);

        layout.reset();
        assert_eq!(layout.iter_base_attributes().count(), 0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut layout = AttributeArrayLayout::new();
        layout.add_attribute(&position()).unwrap();
        layout.reset();

        assert_eq!(layout.active_count(), 0);
        assert_eq!(layout.occupancy_mask(), 0);
        assert_eq!(layout.active_range(), None);
        assert_eq!(layout.find_by_name("POSITION"), None);
        assert!(!layout.is_active(0));
        // Storage is reusable after a reset.
        assert!(layout.add_attribute(&position()).is_ok());
    }

    #[test]
    fn test_range_overlap_fast_path() {
        let mut layout = AttributeArrayLayout::new();
        assert!(!layout.range_overlaps(0, 16));

        layout
            .add_attribute(
                &VertexAttributeDefinition::new(VertexFormat::Float3, 4, "POSITION").with_offset(0),
            )
            .unwrap();
        assert!(layout.range_overlaps(4, 1));
        assert!(layout.range_overlaps(2, 3));
        assert!(!layout.range_overlaps(0, 4));
        assert!(!layout.range_overlaps(5, 11));
    }
}
