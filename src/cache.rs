//! Signature-keyed layout cache.
//!
//! Many meshes and materials resolve to a handful of distinct layouts, so
//! built layouts are shared via `Arc` and deduplicated by their signature
//! string. Lookups share a read lock; inserting a newly built layout is
//! atomic with respect to the lookup, so two racing builders of the same
//! layout converge on one entry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::definition::VertexAttributeDefinition;
use crate::error::LayoutError;
use crate::layout::VertexStreamLayout;

/// Deduplicating cache of built layouts, keyed by signature.
#[derive(Debug, Default)]
pub struct LayoutCache {
    layouts: RwLock<HashMap<String, Arc<VertexStreamLayout>>>,
}

impl LayoutCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a layout by signature.
    pub fn get(&self, signature: &str) -> Option<Arc<VertexStreamLayout>> {
        self.layouts.read().get(signature).cloned()
    }

    /// Build a layout from definitions, returning a cached copy when an
    /// identical layout was built before.
    ///
    /// Validation failures propagate; nothing is cached for a failed
    /// build.
    pub fn get_or_build(
        &self,
        definitions: &[VertexAttributeDefinition],
    ) -> Result<Arc<VertexStreamLayout>, LayoutError> {
        let layout = VertexStreamLayout::build(definitions)?;
        let signature = layout.signature();

        if let Some(cached) = self.get(&signature) {
            log::debug!("layout cache hit: {signature}");
            return Ok(cached);
        }

        // Insertion takes the write lock; a racing builder that won the
        // insert wins for everyone via the entry API.
        let mut layouts = self.layouts.write();
        let entry = layouts
            .entry(signature)
            .or_insert_with(|| Arc::new(layout));
        Ok(entry.clone())
    }

    /// Number of distinct cached layouts.
    pub fn len(&self) -> usize {
        self.layouts.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.layouts.read().is_empty()
    }

    /// Drop every cached layout. Outstanding `Arc`s stay valid.
    pub fn clear(&self) {
        self.layouts.write().clear();
    }
}
