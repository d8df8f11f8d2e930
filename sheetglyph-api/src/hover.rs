//! Hover and picker payloads returned to the host.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{TextRange, format_code_point, sheet_file_name};

/// Glyph details shown when hovering a rendered character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverInfo {
    pub code_point: u32,
    pub sheet: u8,
    pub row: u8,
    pub col: u8,
    /// Range of the character the hover refers to.
    pub range: TextRange,
}

impl HoverInfo {
    /// Markdown body for the host's hover widget.
    pub fn markdown(&self) -> String {
        format!(
            "**Glyph Sheets**\n\nCode: `{}`\n\nSheet: `{}`\n\nPosition: Row {}, Col {}\n\n",
            format_code_point(self.code_point),
            sheet_file_name(self.sheet),
            self.row,
            self.col
        )
    }
}

/// A text replacement the host applies to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub text: String,
}

/// One selectable glyph in the hex picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub code_point: u32,
    pub row: u8,
    pub col: u8,
    /// The literal character inserted on selection.
    pub text: String,
    /// `U+XXXX [row, col]`.
    pub label: String,
    /// Full sheet image; crop with `background_position`.
    pub image_uri: Arc<str>,
    pub background_position: (f32, f32),
}
