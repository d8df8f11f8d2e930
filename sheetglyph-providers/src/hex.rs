//! Hex resolution - turn a typed hex code into a glyph.
//!
//! A four-digit code is inserted directly as its character. A two-digit code
//! names a sheet; every visible cell of that sheet is offered in a picker.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use sheetglyph_api::{
    Candidate, GRID_SIZE, Position, TextDocument, TextEdit, TextRange, background_position,
    format_code_point,
};
use sheetglyph_atlas::{
    AtlasError, GlyphEngine, SheetRaster, TransparencyMask, code_point, png_data_uri,
};
use thiserror::Error;

/// Optional numeric-escape prefix, then 2 to 4 hex digits ending at the cursor.
static HEX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:0[xX]|\\[uUx]|[uU]\+|&#[xX])?([0-9A-Fa-f]{2,4})$")
        .expect("hex token pattern is valid")
});

/// Why a hex code could not be resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no hex code before the cursor")]
    NoToken,

    #[error("`{0}` is not a 2-digit sheet or 4-digit code point")]
    InvalidLength(String),

    #[error("U+{0:04X} is not a valid character")]
    NotAScalar(u32),

    #[error("no glyph sheet found for {0:02X}")]
    SheetNotFound(u8),

    #[error("glyph sheet {sheet:02X} could not be read: {source}")]
    SheetUnreadable {
        sheet: u8,
        #[source]
        source: AtlasError,
    },

    #[error("glyph sheet {0:02X} has no visible glyphs")]
    NoCandidates(u8),
}

/// A hex code found before the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexToken {
    /// Prefix and digits, in UTF-16 offsets.
    pub range: TextRange,
    pub digits: String,
}

impl HexToken {
    /// Match the token at the end of `before`, whose first character sits at
    /// offset `base`.
    pub fn parse(before: &str, base: usize) -> Option<Self> {
        let caps = HEX_TOKEN.captures(before)?;
        let whole = caps.get(0)?;
        let start = base + before[..whole.start()].encode_utf16().count();
        let end = start + whole.as_str().encode_utf16().count();
        Some(Self {
            range: TextRange::new(start, end),
            digits: caps[1].to_string(),
        })
    }

    /// The token ending at `position`, looking only at the current line.
    pub fn before_cursor(document: &dyn TextDocument, position: Position) -> Option<Self> {
        let line_start = document.offset_at(Position::new(position.line, 0));
        let cursor = document.offset_at(position);
        let units: Vec<u16> = document.text().encode_utf16().collect();
        let end = cursor.min(units.len());
        let start = line_start.min(end);
        let before = String::from_utf16_lossy(&units[start..end]);
        Self::parse(&before, start)
    }

    pub fn value(&self) -> u32 {
        u32::from_str_radix(&self.digits, 16).unwrap_or_default()
    }
}

/// Outcome of resolving a hex code.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Apply this edit right away.
    Direct(TextEdit),
    /// Let the user choose a glyph from one sheet.
    Picker(Picker),
}

/// Glyphs offered for a two-digit sheet code.
#[derive(Debug, Clone)]
pub struct Picker {
    pub sheet: u8,
    /// The typed token, replaced by the chosen glyph.
    pub replace: TextRange,
    pub candidates: Vec<Candidate>,
}

impl Picker {
    /// The edit for choosing candidate `index`.
    pub fn select(&self, index: usize) -> Option<TextEdit> {
        let candidate = self.candidates.get(index)?;
        Some(TextEdit {
            range: self.replace,
            text: candidate.text.clone(),
        })
    }
}

/// Resolve the hex code before `position`.
pub fn resolve(
    engine: &GlyphEngine,
    document: &dyn TextDocument,
    position: Position,
) -> Result<Resolution, ResolveError> {
    let token = HexToken::before_cursor(document, position).ok_or(ResolveError::NoToken)?;
    tracing::debug!("resolving hex token {:?} at {:?}", token.digits, token.range);

    match token.digits.len() {
        4 => {
            let value = token.value();
            let ch = char::from_u32(value).ok_or(ResolveError::NotAScalar(value))?;
            Ok(Resolution::Direct(TextEdit {
                range: token.range,
                text: ch.to_string(),
            }))
        }
        2 => {
            let sheet = token.value() as u8;
            let candidates = candidates(engine, sheet)?;
            Ok(Resolution::Picker(Picker {
                sheet,
                replace: token.range,
                candidates,
            }))
        }
        _ => Err(ResolveError::InvalidLength(token.digits)),
    }
}

/// Every visible cell of sheet `sheet`, in row-major order.
///
/// Transparency is only checked when the engine excludes transparent cells;
/// a sheet that cannot be decoded offers all of its cells.
pub fn candidates(engine: &GlyphEngine, sheet: u8) -> Result<Vec<Candidate>, ResolveError> {
    let source = engine.find_sheet(sheet).ok_or(ResolveError::SheetNotFound(sheet))?;
    let bytes = source.read().map_err(|e| ResolveError::SheetUnreadable {
        sheet,
        source: e.into(),
    })?;

    let mask = if engine.options().exclude_transparent {
        match SheetRaster::decode(&bytes) {
            Ok(raster) => raster.transparency(),
            Err(e) => {
                tracing::warn!("failed to decode {}: {}", source, e);
                TransparencyMask::opaque()
            }
        }
    } else {
        TransparencyMask::opaque()
    };

    let image_uri: Arc<str> = Arc::from(png_data_uri(&bytes));
    let mut candidates = Vec::new();
    for row in 0..GRID_SIZE as u8 {
        for col in 0..GRID_SIZE as u8 {
            if mask.is_transparent(row, col) {
                continue;
            }
            let code_point = code_point(sheet, row, col);
            // Surrogate sheets have no characters to insert.
            let Some(ch) = char::from_u32(code_point) else {
                continue;
            };
            candidates.push(Candidate {
                code_point,
                row,
                col,
                text: ch.to_string(),
                label: format!("{} [{}, {}]", format_code_point(code_point), row, col),
                image_uri: Arc::clone(&image_uri),
                background_position: background_position(row, col),
            });
        }
    }

    if candidates.is_empty() {
        return Err(ResolveError::NoCandidates(sheet));
    }
    Ok(candidates)
}
