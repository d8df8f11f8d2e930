//! Render model computation and application.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use sheetglyph_api::{DecorationSurface, DescriptorId, RenderDescriptor, RenderMode, TextRange};

use crate::descriptor::DescriptorCache;
use crate::index::GlyphLookup;

/// One glyph to draw.
#[derive(Debug, Clone)]
pub struct RenderEntry {
    /// UTF-16 range of the source character: width 1 in the BMP, 2 above it.
    pub range: TextRange,
    pub code_point: u32,
    pub descriptor: Arc<RenderDescriptor>,
}

/// Everything to draw over one document snapshot, in text order.
#[derive(Debug, Clone, Default)]
pub struct RenderModel {
    entries: Vec<RenderEntry>,
}

impl RenderModel {
    /// Walk `text` by scalar value and emit an entry for every indexed one.
    ///
    /// A cell whose descriptor cannot be built (sheet unreadable) is skipped.
    pub fn compute<L: GlyphLookup + ?Sized>(
        text: &str,
        lookup: &L,
        cache: &mut DescriptorCache,
        mode: RenderMode,
    ) -> Self {
        let mut entries = Vec::new();
        let mut offset = 0;

        for ch in text.chars() {
            let width = ch.len_utf16();
            let code_point = u32::from(ch);
            if let Some(cell) = lookup.lookup(code_point) {
                match cache.get(cell, mode) {
                    Ok(descriptor) => entries.push(RenderEntry {
                        range: TextRange::new(offset, offset + width),
                        code_point,
                        descriptor,
                    }),
                    Err(e) => {
                        tracing::warn!("no descriptor for U+{:04X}: {}", code_point, e);
                    }
                }
            }
            offset += width;
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[RenderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranges grouped by descriptor, in order of first appearance.
    pub fn grouped(&self) -> Vec<(Arc<RenderDescriptor>, Vec<TextRange>)> {
        let mut slots: HashMap<DescriptorId, usize> = HashMap::new();
        let mut groups: Vec<(Arc<RenderDescriptor>, Vec<TextRange>)> = Vec::new();
        for entry in &self.entries {
            let slot = *slots.entry(entry.descriptor.id).or_insert_with(|| {
                groups.push((Arc::clone(&entry.descriptor), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(entry.range);
        }
        groups
    }
}

/// What one [`Synchronizer::apply`] did to the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Descriptors whose ranges were cleared.
    pub cleared: usize,
    /// Descriptors whose ranges were set.
    pub applied: usize,
}

/// Tracks which descriptors currently have ranges on the active view.
#[derive(Debug, Default)]
pub struct Synchronizer {
    active: BTreeMap<DescriptorId, Arc<RenderDescriptor>>,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the surface in line with `model`: clear descriptors the model no
    /// longer uses, then set each used descriptor's ranges in one call.
    pub fn apply(&mut self, model: &RenderModel, surface: &mut dyn DecorationSurface) -> ApplyStats {
        let groups = model.grouped();
        let mut stats = ApplyStats::default();

        let still_used: HashSet<DescriptorId> = groups.iter().map(|(d, _)| d.id).collect();
        for (id, descriptor) in &self.active {
            if !still_used.contains(id) {
                surface.set_decorations(descriptor, &[]);
                stats.cleared += 1;
            }
        }

        self.active.clear();
        for (descriptor, ranges) in groups {
            surface.set_decorations(&descriptor, &ranges);
            stats.applied += 1;
            self.active.insert(descriptor.id, descriptor);
        }
        stats
    }

    /// Clear every active descriptor from the surface.
    pub fn clear(&mut self, surface: &mut dyn DecorationSurface) {
        for descriptor in self.active.values() {
            surface.set_decorations(descriptor, &[]);
        }
        self.active.clear();
    }

    /// Start over on a freshly activated view: clear every descriptor the
    /// cache knows about, since the view may still carry ranges for any of them.
    pub fn reset_view(&mut self, cache: &DescriptorCache, surface: &mut dyn DecorationSurface) {
        for descriptor in cache.descriptors() {
            surface.set_decorations(descriptor, &[]);
        }
        self.active.clear();
    }

    pub fn active_ids(&self) -> impl Iterator<Item = DescriptorId> + '_ {
        self.active.keys().copied()
    }

    pub fn is_active(&self, id: DescriptorId) -> bool {
        self.active.contains_key(&id)
    }
}
