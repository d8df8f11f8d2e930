//! The code point -> glyph cell index.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use sheetglyph_api::GRID_SIZE;

use crate::GlyphOptions;
use crate::locator::{self, MAX_DEPTH};
use crate::raster::TransparencyMask;
use crate::sheet::{FallbackSheets, GlyphSheet, SheetSource};

/// Code point of a cell: `sheet * 256 + row * 16 + col`.
pub fn code_point(sheet: u8, row: u8, col: u8) -> u32 {
    (u32::from(sheet) << 8) | (u32::from(row) * GRID_SIZE + u32::from(col))
}

/// One 16x16 cell of a registered sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphCell {
    pub sheet: u8,
    pub row: u8,
    pub col: u8,
    pub source: SheetSource,
    /// Only computed when transparent cells are excluded.
    pub transparent: bool,
}

impl GlyphCell {
    pub fn code_point(&self) -> u32 {
        code_point(self.sheet, self.row, self.col)
    }
}

/// Anything that can map a code point to a cell.
pub trait GlyphLookup {
    fn lookup(&self, code_point: u32) -> Option<&GlyphCell>;
}

impl GlyphLookup for HashMap<u32, GlyphCell> {
    fn lookup(&self, code_point: u32) -> Option<&GlyphCell> {
        self.get(&code_point)
    }
}

/// Summary of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Code points in the finished index.
    pub code_points: usize,
    /// Registered sheets, by byte.
    pub sheets: Vec<(u8, String)>,
    /// Sheets ignored because an earlier one claimed the same byte.
    pub duplicates: usize,
    /// Directories the locator could not read.
    pub skipped_dirs: usize,
}

/// Code point -> cell mapping for every registered sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphIndex {
    cells: HashMap<u32, GlyphCell>,
    sheets: BTreeMap<u8, SheetSource>,
}

impl GlyphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from the sheets under `root` plus the fallbacks.
    ///
    /// Order: `<root>/font`, then the breadth-first walk, then fallbacks for
    /// bytes still unclaimed. The first sheet found for a byte wins.
    pub fn build(
        root: Option<&Path>,
        options: &GlyphOptions,
        fallback: &FallbackSheets,
    ) -> (Self, IndexReport) {
        let mut index = Self::new();
        let mut report = IndexReport::default();

        if let Some(root) = root {
            let located = locator::locate(root, MAX_DEPTH);
            report.skipped_dirs = located.skipped_dirs;
            for sheet in located.sheets {
                if index.sheets.contains_key(&sheet.byte) {
                    tracing::debug!("ignoring duplicate sheet {:02X} at {}", sheet.byte, sheet.source);
                    report.duplicates += 1;
                    continue;
                }
                index.register(sheet, options.exclude_transparent);
            }
        }

        for byte in FallbackSheets::BYTES {
            if index.sheets.contains_key(&byte) {
                continue;
            }
            if let Some(sheet) = fallback.get(byte) {
                index.register(sheet.clone(), options.exclude_transparent);
            }
        }

        report.code_points = index.len();
        report.sheets = index
            .sheets
            .iter()
            .map(|(byte, source)| (*byte, source.to_string()))
            .collect();
        tracing::info!(
            "indexed {} code points from {} sheets",
            report.code_points,
            report.sheets.len()
        );
        (index, report)
    }

    /// Replace the contents with a fresh build. The old mapping stays
    /// intact until the new one is complete.
    pub fn rebuild(
        &mut self,
        root: Option<&Path>,
        options: &GlyphOptions,
        fallback: &FallbackSheets,
    ) -> IndexReport {
        let (next, report) = Self::build(root, options, fallback);
        *self = next;
        report
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.sheets.clear();
    }

    pub fn lookup(&self, code_point: u32) -> Option<&GlyphCell> {
        self.cells.get(&code_point)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Source registered for a sheet byte, if any.
    pub fn sheet(&self, byte: u8) -> Option<&SheetSource> {
        self.sheets.get(&byte)
    }

    pub fn sheets(&self) -> impl Iterator<Item = (u8, &SheetSource)> {
        self.sheets.iter().map(|(byte, source)| (*byte, source))
    }

    /// All cells, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = &GlyphCell> {
        self.cells.values()
    }

    fn register(&mut self, sheet: GlyphSheet, exclude_transparent: bool) {
        let mask = if exclude_transparent {
            Some(TransparencyMask::analyze(&sheet.source))
        } else {
            None
        };

        let mut added = 0;
        for row in 0..GRID_SIZE as u8 {
            for col in 0..GRID_SIZE as u8 {
                let transparent = mask.as_ref().is_some_and(|m| m.is_transparent(row, col));
                if transparent {
                    continue;
                }
                let cell = GlyphCell {
                    sheet: sheet.byte,
                    row,
                    col,
                    source: sheet.source.clone(),
                    transparent,
                };
                self.cells.insert(cell.code_point(), cell);
                added += 1;
            }
        }

        tracing::debug!("registered sheet {:02X} ({} cells) from {}", sheet.byte, added, sheet.source);
        self.sheets.insert(sheet.byte, sheet.source);
    }
}

impl GlyphLookup for GlyphIndex {
    fn lookup(&self, code_point: u32) -> Option<&GlyphCell> {
        GlyphIndex::lookup(self, code_point)
    }
}
