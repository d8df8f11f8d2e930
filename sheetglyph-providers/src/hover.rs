//! Hover provider - glyph details for the character under the pointer.

use sheetglyph_api::{HoverInfo, Position, TextDocument, TextRange};
use sheetglyph_atlas::GlyphLookup;

/// Glyph at `position`, or else the one just before it.
///
/// The rendered image sits after its source character, so pointing at the
/// image usually lands one column to the right of the character.
pub fn hover<L: GlyphLookup + ?Sized>(
    lookup: &L,
    document: &dyn TextDocument,
    position: Position,
) -> Option<HoverInfo> {
    let text = document.text();
    let offset = document.offset_at(position);

    let mut found = glyph_containing(lookup, &text, offset);
    if found.is_none() && position.character > 0 && offset > 0 {
        found = glyph_containing(lookup, &text, offset - 1);
    }
    found
}

fn glyph_containing<L: GlyphLookup + ?Sized>(
    lookup: &L,
    text: &str,
    offset: usize,
) -> Option<HoverInfo> {
    let (ch, range) = char_containing(text, offset)?;
    let cell = lookup.lookup(u32::from(ch))?;
    Some(HoverInfo {
        code_point: cell.code_point(),
        sheet: cell.sheet,
        row: cell.row,
        col: cell.col,
        range,
    })
}

/// The character whose UTF-16 range covers `offset`.
fn char_containing(text: &str, offset: usize) -> Option<(char, TextRange)> {
    let mut start = 0;
    for ch in text.chars() {
        let end = start + ch.len_utf16();
        if offset < end {
            return Some((ch, TextRange::new(start, end)));
        }
        start = end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetglyph_api::BufferDocument;
    use sheetglyph_atlas::{GlyphCell, SheetSource, code_point};
    use std::collections::HashMap;

    fn glyphs(cells: &[(u8, u8, u8)]) -> HashMap<u32, GlyphCell> {
        cells
            .iter()
            .map(|&(sheet, row, col)| {
                let cell = GlyphCell {
                    sheet,
                    row,
                    col,
                    source: SheetSource::file("/project/font/glyph.png"),
                    transparent: false,
                };
                (code_point(sheet, row, col), cell)
            })
            .collect()
    }

    #[test]
    fn test_hover_on_glyph() {
        let lookup = glyphs(&[(0xE0, 5, 0)]);
        let doc = BufferDocument::new("ab\u{E050}c");
        let info = hover(&lookup, &doc, Position::new(0, 2)).unwrap();
        assert_eq!(info.code_point, 0xE050);
        assert_eq!((info.sheet, info.row, info.col), (0xE0, 5, 0));
        assert_eq!(info.range, TextRange::new(2, 3));
    }

    #[test]
    fn test_hover_falls_back_to_preceding_char() {
        let lookup = glyphs(&[(0xE0, 5, 0)]);
        let doc = BufferDocument::new("ab\u{E050}c");
        let info = hover(&lookup, &doc, Position::new(0, 3)).unwrap();
        assert_eq!(info.range, TextRange::new(2, 3));

        assert!(hover(&lookup, &doc, Position::new(0, 1)).is_none());
    }

    #[test]
    fn test_no_preceding_char_at_line_start() {
        let lookup = glyphs(&[(0xE0, 5, 0)]);
        let doc = BufferDocument::new("\u{E050}\nx");
        assert!(hover(&lookup, &doc, Position::new(1, 0)).is_none());
        assert!(hover(&lookup, &doc, Position::new(0, 0)).is_some());
    }

    #[test]
    fn test_char_containing_spans_surrogate_pairs() {
        let text = "a\u{1F600}b";
        assert_eq!(char_containing(text, 1), Some(('\u{1F600}', TextRange::new(1, 3))));
        assert_eq!(char_containing(text, 2), Some(('\u{1F600}', TextRange::new(1, 3))));
        assert_eq!(char_containing(text, 3), Some(('b', TextRange::new(3, 4))));
        assert_eq!(char_containing(text, 4), None);
    }
}
