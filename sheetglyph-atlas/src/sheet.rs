//! Glyph sheets and where their bytes come from.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sheetglyph_api::sheet_file_name;

/// Raster source of one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    /// A PNG on disk.
    File(Arc<Path>),
    /// PNG bytes shipped with the host.
    Bundled { name: Arc<str>, bytes: Arc<[u8]> },
}

impl SheetSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        SheetSource::File(Arc::from(path))
    }

    /// Read the encoded sheet.
    pub fn read(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            SheetSource::File(path) => std::fs::read(path).map(Cow::Owned),
            SheetSource::Bundled { bytes, .. } => Ok(Cow::Borrowed(&bytes[..])),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SheetSource::File(path) => Some(&**path),
            SheetSource::Bundled { .. } => None,
        }
    }
}

impl fmt::Display for SheetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSource::File(path) => write!(f, "{}", path.display()),
            SheetSource::Bundled { name, .. } => write!(f, "<bundled>/{}", name),
        }
    }
}

/// A sheet registered for one leading byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSheet {
    pub byte: u8,
    pub source: SheetSource,
}

impl GlyphSheet {
    pub fn new(byte: u8, source: SheetSource) -> Self {
        Self { byte, source }
    }

    /// First code point covered by this sheet.
    pub fn first_code_point(&self) -> u32 {
        u32::from(self.byte) << 8
    }
}

/// The bundled sheets used for bytes no project sheet covers.
#[derive(Debug, Clone, Default)]
pub struct FallbackSheets {
    sheets: Vec<GlyphSheet>,
}

impl FallbackSheets {
    /// Bytes that may be served from the bundle.
    pub const BYTES: [u8; 2] = [0xE0, 0xE1];

    pub fn none() -> Self {
        Self::default()
    }

    /// Pick up `glyph_E0.png` / `glyph_E1.png` from a directory, if present.
    pub fn from_dir(dir: &Path) -> Self {
        let sheets = Self::BYTES
            .into_iter()
            .filter_map(|byte| {
                let path = dir.join(sheet_file_name(byte));
                if path.is_file() {
                    Some(GlyphSheet::new(byte, SheetSource::file(path)))
                } else {
                    tracing::debug!("no bundled sheet at {}", path.display());
                    None
                }
            })
            .collect();
        Self { sheets }
    }

    /// Add in-memory PNG bytes for one of the fallback bytes.
    ///
    /// Bytes outside [`Self::BYTES`] are ignored.
    pub fn with_bytes(mut self, byte: u8, bytes: impl Into<Arc<[u8]>>) -> Self {
        if !Self::BYTES.contains(&byte) {
            tracing::warn!("ignoring bundled sheet for non-fallback byte {:02X}", byte);
            return self;
        }
        self.sheets.retain(|s| s.byte != byte);
        self.sheets.push(GlyphSheet::new(
            byte,
            SheetSource::Bundled {
                name: Arc::from(sheet_file_name(byte)),
                bytes: bytes.into(),
            },
        ));
        self
    }

    pub fn get(&self, byte: u8) -> Option<&GlyphSheet> {
        self.sheets.iter().find(|s| s.byte == byte)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
