//! Sheet rasters and per-cell transparency.

use sheetglyph_api::{CELL_SIZE, GRID_SIZE};

use crate::AtlasError;
use crate::sheet::SheetSource;

/// Cells per sheet.
pub const CELLS_PER_SHEET: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// Decoded RGBA8 pixels of one sheet.
#[derive(Debug, Clone)]
pub struct SheetRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SheetRaster {
    /// Decode an encoded image (PNG in practice; the format is sniffed).
    pub fn decode(bytes: &[u8]) -> Result<Self, AtlasError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Wrap raw RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AtlasError> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(AtlasError::RasterSize {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_is_transparent(&self, row: u8, col: u8) -> bool {
        cell_is_transparent(&self.pixels, self.width, self.height, row, col)
    }

    /// Transparency of every cell on the sheet.
    pub fn transparency(&self) -> TransparencyMask {
        let mut mask = TransparencyMask::opaque();
        for row in 0..GRID_SIZE as u8 {
            for col in 0..GRID_SIZE as u8 {
                mask.cells[cell_slot(row, col)] = self.cell_is_transparent(row, col);
            }
        }
        mask
    }
}

/// True iff every pixel of the 16x16 block at `(col*16, row*16)` has alpha 0.
///
/// `pixels` is RGBA8, row-major, `width * height * 4` bytes. A block that
/// does not fit inside the raster counts as opaque.
pub fn cell_is_transparent(pixels: &[u8], width: u32, height: u32, row: u8, col: u8) -> bool {
    let x0 = u32::from(col) * CELL_SIZE;
    let y0 = u32::from(row) * CELL_SIZE;
    if x0 + CELL_SIZE > width || y0 + CELL_SIZE > height {
        return false;
    }
    if pixels.len() < width as usize * height as usize * 4 {
        return false;
    }

    let stride = width as usize * 4;
    let span = CELL_SIZE as usize * 4;
    (y0..y0 + CELL_SIZE).all(|y| {
        let start = y as usize * stride + x0 as usize * 4;
        pixels[start..start + span]
            .chunks_exact(4)
            .all(|px| px[3] == 0)
    })
}

/// Per-cell transparency flags for one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparencyMask {
    cells: [bool; CELLS_PER_SHEET],
}

impl TransparencyMask {
    /// Every cell opaque.
    pub fn opaque() -> Self {
        Self {
            cells: [false; CELLS_PER_SHEET],
        }
    }

    /// Decode a sheet and analyze it. A sheet that cannot be read or decoded
    /// is reported as fully opaque.
    pub fn analyze(source: &SheetSource) -> Self {
        let bytes = match source.read() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("failed to read sheet {}: {}", source, e);
                return Self::opaque();
            }
        };
        match SheetRaster::decode(&bytes) {
            Ok(raster) => raster.transparency(),
            Err(e) => {
                tracing::warn!("failed to decode sheet {}, treating all cells as opaque: {}", source, e);
                Self::opaque()
            }
        }
    }

    pub fn is_transparent(&self, row: u8, col: u8) -> bool {
        self.cells[cell_slot(row, col)]
    }

    pub fn transparent_count(&self) -> usize {
        self.cells.iter().filter(|&&t| t).count()
    }
}

fn cell_slot(row: u8, col: u8) -> usize {
    usize::from(row) * GRID_SIZE as usize + usize::from(col)
}
