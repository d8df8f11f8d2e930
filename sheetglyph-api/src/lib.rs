//! Sheetglyph API - Shared types and host contracts for glyph-sheet rendering.
//!
//! Everything the host editor and the engine exchange lives here: text
//! ranges in UTF-16 code units, render descriptors, hover and picker
//! payloads, host events, and the traits the host implements.

mod document;
mod event;
mod host;
mod hover;
mod render;

pub use document::BufferDocument;
pub use event::*;
pub use host::*;
pub use hover::*;
pub use render::*;

/// Name of the directory that holds glyph sheets.
pub const SHEET_CONTAINER: &str = "font";

/// Edge length of one glyph cell, in pixels.
pub const CELL_SIZE: u32 = 16;

/// Cells per sheet row and per sheet column.
pub const GRID_SIZE: u32 = 16;

/// Format a code point the way hover text and picker labels show it.
pub fn format_code_point(code_point: u32) -> String {
    format!("U+{:04X}", code_point)
}

/// File name of the sheet for a byte value.
pub fn sheet_file_name(sheet: u8) -> String {
    format!("glyph_{:02X}.png", sheet)
}
