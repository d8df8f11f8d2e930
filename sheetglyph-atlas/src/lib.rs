//! Sheetglyph Atlas - Glyph-sheet indexing and render model engine.
//!
//! This crate contains:
//! - Sheet discovery (bounded breadth-first walk for `font/glyph_XX.png`)
//! - Per-cell transparency analysis
//! - The code point -> cell index, with bundled fallback sheets
//! - The render descriptor cache
//! - Render model computation and surface synchronization

pub mod descriptor;
pub mod index;
pub mod locator;
pub mod raster;
pub mod render;
pub mod sheet;

mod error;
mod options;

#[cfg(test)]
mod test_utils;

pub use descriptor::{DescriptorCache, DescriptorKey, png_data_uri};
pub use error::AtlasError;
pub use index::{GlyphCell, GlyphIndex, GlyphLookup, IndexReport, code_point};
pub use locator::{LocateResult, MAX_DEPTH};
pub use options::GlyphOptions;
pub use raster::{SheetRaster, TransparencyMask};
pub use render::{ApplyStats, RenderEntry, RenderModel, Synchronizer};
pub use sheet::{FallbackSheets, GlyphSheet, SheetSource};

use std::path::{Path, PathBuf};

use sheetglyph_api::{DescriptorId, RenderMode};

/// Result of a reload.
#[derive(Debug, Clone, Default)]
pub struct Reload {
    /// Descriptors dropped from the cache; the host should release them.
    pub released: Vec<DescriptorId>,
    pub report: IndexReport,
}

/// The engine - owns the index, the descriptor cache and the options.
///
/// All state is rebuilt from disk on [`GlyphEngine::reload`]; nothing is
/// shared between engines.
pub struct GlyphEngine {
    root: Option<PathBuf>,
    fallback: FallbackSheets,
    options: GlyphOptions,
    index: GlyphIndex,
    descriptors: DescriptorCache,
    report: IndexReport,
}

impl GlyphEngine {
    /// Create an engine and build its index.
    ///
    /// `root` is the project directory to search; with `None` only the
    /// fallback sheets are indexed.
    pub fn new(root: Option<PathBuf>, fallback: FallbackSheets, options: GlyphOptions) -> Self {
        let (index, report) = GlyphIndex::build(root.as_deref(), &options, &fallback);
        Self {
            root,
            fallback,
            options,
            index,
            descriptors: DescriptorCache::new(),
            report,
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn options(&self) -> &GlyphOptions {
        &self.options
    }

    pub fn render_mode(&self) -> RenderMode {
        self.options.render_mode()
    }

    pub fn index(&self) -> &GlyphIndex {
        &self.index
    }

    pub fn descriptors(&self) -> &DescriptorCache {
        &self.descriptors
    }

    pub fn descriptors_mut(&mut self) -> &mut DescriptorCache {
        &mut self.descriptors
    }

    pub fn fallback(&self) -> &FallbackSheets {
        &self.fallback
    }

    /// Summary of the most recent build.
    pub fn report(&self) -> &IndexReport {
        &self.report
    }

    /// Drop the descriptor cache and rebuild the index from disk.
    pub fn reload(&mut self) -> Reload {
        let released = self.descriptors.invalidate_all();
        self.index.clear();
        self.report = self
            .index
            .rebuild(self.root.as_deref(), &self.options, &self.fallback);
        Reload {
            released,
            report: self.report.clone(),
        }
    }

    /// Switch options. Any change invalidates descriptors and reloads;
    /// returns None when nothing changed.
    pub fn set_options(&mut self, options: GlyphOptions) -> Option<Reload> {
        let changed = self.options.changed_keys(&options);
        if changed.is_empty() {
            return None;
        }
        tracing::info!("options changed: {:?}", changed);
        self.options = options;
        Some(self.reload())
    }

    /// Compute the render model for a document's text.
    pub fn render(&mut self, text: &str) -> RenderModel {
        let mode = self.options.render_mode();
        RenderModel::compute(text, &self.index, &mut self.descriptors, mode)
    }

    /// Find the sheet for a byte without rebuilding the index: the index
    /// first, then a targeted walk of the project, then the fallbacks.
    pub fn find_sheet(&self, byte: u8) -> Option<SheetSource> {
        if let Some(source) = self.index.sheet(byte) {
            return Some(source.clone());
        }
        if let Some(root) = &self.root {
            if let Some(sheet) = locator::locate_byte(root, MAX_DEPTH, byte) {
                return Some(sheet.source);
            }
        }
        self.fallback.get(byte).map(|sheet| sheet.source.clone())
    }
}
