//! Render descriptors - the visual handed to the host for one glyph cell.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::GRID_SIZE;

/// Half-open range of UTF-16 code units in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Line/column position. `character` counts UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// How a glyph decoration treats the character it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderMode {
    /// Collapse and hide the source character, leaving only the glyph.
    pub hide_source: bool,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self { hide_source: true }
    }
}

/// Identity of a render descriptor.
///
/// The host keys its decorations by this id, so two descriptors with the
/// same id are the same visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DescriptorId(pub u64);

/// Visual parameters for rendering one glyph cell over a text range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDescriptor {
    pub id: DescriptorId,
    pub sheet: u8,
    pub row: u8,
    pub col: u8,
    pub mode: RenderMode,
    /// The whole sheet as a `data:image/png;base64,...` URI.
    pub image_uri: Arc<str>,
    /// Crop offset as a fraction of the sheet width.
    pub crop_x: f32,
    /// Crop offset as a fraction of the sheet height.
    pub crop_y: f32,
}

impl RenderDescriptor {
    /// CSS `background-position` percentages for this cell.
    ///
    /// With `background-size: 1600%` the last column sits at 100%, so the
    /// step is `100 / 15`, not `100 / 16`.
    pub fn background_position(&self) -> (f32, f32) {
        background_position(self.row, self.col)
    }

    /// Inline style for the source character.
    pub fn source_css(&self) -> &'static str {
        if self.mode.hide_source {
            "letter-spacing:-1ch;opacity:0;"
        } else {
            "letter-spacing:0;opacity:1;"
        }
    }

    /// Inline style for the 16x16 element drawn after the source character.
    pub fn glyph_css(&self) -> String {
        let (x, y) = self.background_position();
        format!(
            "display:inline-block;width:16px;height:16px;\
             background-image:url('{}');background-size:1600% 1600%;\
             background-position:{}% {}%;background-repeat:no-repeat;",
            self.image_uri, x, y
        )
    }
}

/// CSS `background-position` percentages for a cell of a full-sheet image.
pub fn background_position(row: u8, col: u8) -> (f32, f32) {
    let last = (GRID_SIZE - 1) as f32;
    (col as f32 * 100.0 / last, row as f32 * 100.0 / last)
}

/// Crop offset of a cell as a fraction of the sheet size.
pub fn crop_fraction(row: u8, col: u8) -> (f32, f32) {
    let grid = GRID_SIZE as f32;
    (col as f32 / grid, row as f32 / grid)
}
