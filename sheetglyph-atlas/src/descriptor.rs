//! Render descriptor cache.
//!
//! A descriptor is created once per `(sheet, row, col, mode)` and handed out
//! as the same `Arc` until the cache is invalidated, so hosts can compare
//! descriptors by id instead of by content.

use std::collections::HashMap;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use sheetglyph_api::{DescriptorId, RenderDescriptor, RenderMode, crop_fraction};

use crate::AtlasError;
use crate::index::GlyphCell;
use crate::sheet::SheetSource;

/// Cache key of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorKey {
    pub sheet: u8,
    pub row: u8,
    pub col: u8,
    pub mode: RenderMode,
}

impl DescriptorKey {
    pub fn for_cell(cell: &GlyphCell, mode: RenderMode) -> Self {
        Self {
            sheet: cell.sheet,
            row: cell.row,
            col: cell.col,
            mode,
        }
    }
}

/// Memoized descriptors plus the embedded sheet images they share.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descriptors: HashMap<DescriptorKey, Arc<RenderDescriptor>>,
    /// One data URI per sheet byte; a load cycle registers one sheet per byte.
    images: HashMap<u8, Arc<str>>,
    /// Never reset, so ids stay unique across invalidations.
    next_id: u64,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The descriptor for `cell` under `mode`, creating it on first use.
    pub fn get(
        &mut self,
        cell: &GlyphCell,
        mode: RenderMode,
    ) -> Result<Arc<RenderDescriptor>, AtlasError> {
        let key = DescriptorKey::for_cell(cell, mode);
        if let Some(descriptor) = self.descriptors.get(&key) {
            return Ok(Arc::clone(descriptor));
        }

        let image_uri = self.sheet_image(cell.sheet, &cell.source)?;
        self.next_id += 1;
        let (crop_x, crop_y) = crop_fraction(cell.row, cell.col);
        let descriptor = Arc::new(RenderDescriptor {
            id: DescriptorId(self.next_id),
            sheet: cell.sheet,
            row: cell.row,
            col: cell.col,
            mode,
            image_uri,
            crop_x,
            crop_y,
        });
        self.descriptors.insert(key, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Data URI of a sheet, encoding it on first use.
    pub fn sheet_image(&mut self, sheet: u8, source: &SheetSource) -> Result<Arc<str>, AtlasError> {
        if let Some(uri) = self.images.get(&sheet) {
            return Ok(Arc::clone(uri));
        }
        let bytes = source.read()?;
        let uri: Arc<str> = Arc::from(png_data_uri(&bytes));
        self.images.insert(sheet, Arc::clone(&uri));
        Ok(uri)
    }

    pub fn peek(&self, key: &DescriptorKey) -> Option<&Arc<RenderDescriptor>> {
        self.descriptors.get(key)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<RenderDescriptor>> {
        self.descriptors.values()
    }

    /// Drop every descriptor and image. Returns the ids that are now dead.
    pub fn invalidate_all(&mut self) -> Vec<DescriptorId> {
        let mut dropped: Vec<DescriptorId> = self.descriptors.values().map(|d| d.id).collect();
        dropped.sort();
        self.descriptors.clear();
        self.images.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// `data:image/png;base64,...` for encoded PNG bytes.
pub fn png_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}
