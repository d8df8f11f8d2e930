//! In-memory document for headless hosts and tests.

use crate::{Position, TextDocument, TextEdit};

/// A `String` buffer that speaks UTF-16 offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferDocument {
    text: String,
}

impl BufferDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Length in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.text.encode_utf16().count()
    }

    /// Byte index for a UTF-16 offset, or None if it is past the end or
    /// inside a surrogate pair.
    fn byte_index(&self, offset: usize) -> Option<usize> {
        let mut units = 0;
        for (idx, ch) in self.text.char_indices() {
            if units == offset {
                return Some(idx);
            }
            units += ch.len_utf16();
            if units > offset {
                return None;
            }
        }
        (units == offset).then_some(self.text.len())
    }
}

impl TextDocument for BufferDocument {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn offset_at(&self, position: Position) -> usize {
        let mut offset = 0;
        let mut line = 0u32;
        let mut character = 0u32;
        let mut chars = self.text.chars().peekable();

        while let Some(ch) = chars.next() {
            if line == position.line && character >= position.character {
                return offset;
            }
            match ch {
                '\n' => {
                    if line == position.line {
                        return offset;
                    }
                    line += 1;
                    character = 0;
                }
                '\r' if chars.peek() == Some(&'\n') => {
                    if line == position.line {
                        return offset;
                    }
                }
                _ => character += ch.len_utf16() as u32,
            }
            offset += ch.len_utf16();
        }
        offset
    }

    fn position_at(&self, offset: usize) -> Position {
        let mut units = 0;
        let mut position = Position::default();
        for ch in self.text.chars() {
            if units >= offset {
                break;
            }
            units += ch.len_utf16();
            if ch == '\n' {
                position.line += 1;
                position.character = 0;
            } else if ch != '\r' {
                position.character += ch.len_utf16() as u32;
            }
        }
        position
    }

    fn apply_edit(&mut self, edit: &TextEdit) -> bool {
        if edit.range.start > edit.range.end {
            return false;
        }
        let (Some(start), Some(end)) = (
            self.byte_index(edit.range.start),
            self.byte_index(edit.range.end),
        ) else {
            return false;
        };
        self.text.replace_range(start..end, &edit.text);
        true
    }
}
