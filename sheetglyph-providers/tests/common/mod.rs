//! Fixtures: generated sheets and recording host services.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};
use sheetglyph_api::{
    CELL_SIZE, DecorationSurface, DescriptorId, Notifier, RenderDescriptor, SHEET_CONTAINER,
    TextRange, sheet_file_name,
};

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

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Set(DescriptorId, Vec<TextRange>),
    Release(DescriptorId),
}

#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    /// Ranges most recently set for a descriptor.
    pub fn ranges(&self, id: DescriptorId) -> Option<&[TextRange]> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::Set(set_id, ranges) if *set_id == id => Some(ranges.as_slice()),
            _ => None,
        })
    }

    pub fn released(&self) -> Vec<DescriptorId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Release(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl DecorationSurface for RecordingSurface {
    fn set_decorations(&mut self, descriptor: &RenderDescriptor, ranges: &[TextRange]) {
        self.calls.push(SurfaceCall::Set(descriptor.id, ranges.to_vec()));
    }

    fn release(&mut self, id: DescriptorId) {
        self.calls.push(SurfaceCall::Release(id));
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub info: Vec<String>,
    pub warn: Vec<String>,
    pub error: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn info(&mut self, message: &str) {
        self.info.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warn.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.error.push(message.to_string());
    }
}
