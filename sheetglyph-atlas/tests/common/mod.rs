//! Shared fixtures: PNG sheets generated on the fly.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};
use sheetglyph_api::{CELL_SIZE, SHEET_CONTAINER, sheet_file_name};

/// Encode a 256x256 sheet as PNG. `opaque(row, col)` decides which cells
/// get solid pixels; all others are fully transparent.
pub fn sheet_png(opaque: impl Fn(u8, u8) -> bool) -> Vec<u8> {
    let img = RgbaImage::from_fn(256, 256, |x, y| {
        let row = (y / CELL_SIZE) as u8;
        let col = (x / CELL_SIZE) as u8;
        if opaque(row, col) {
            Rgba([200, 40, 40, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
        .expect("encode fixture sheet");
    png
}

/// Write `glyph_XX.png` into `<dir>/font/`, creating directories as needed.
pub fn write_sheet(dir: &Path, byte: u8, opaque: impl Fn(u8, u8) -> bool) -> PathBuf {
    let container = dir.join(SHEET_CONTAINER);
    std::fs::create_dir_all(&container).expect("create sheet container");
    let path = container.join(sheet_file_name(byte));
    std::fs::write(&path, sheet_png(opaque)).expect("write fixture sheet");
    path
}
