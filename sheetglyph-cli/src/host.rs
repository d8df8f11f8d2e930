//! Terminal stand-ins for the editor's decoration layer and notifications.

use std::collections::BTreeMap;

use serde::Serialize;
use sheetglyph_api::{
    DecorationSurface, DescriptorId, Notifier, RenderDescriptor, TextRange, format_code_point,
    sheet_file_name,
};
use sheetglyph_atlas::code_point;

/// Keeps the latest ranges per descriptor instead of drawing them.
#[derive(Default)]
pub struct CollectSurface {
    drawn: BTreeMap<DescriptorId, (RenderDescriptor, Vec<TextRange>)>,
}

/// One decoration as printed by `sheetglyph render`.
#[derive(Debug, Serialize)]
pub struct Decoration {
    pub id: u64,
    pub code_point: String,
    pub sheet: String,
    pub row: u8,
    pub col: u8,
    pub source_css: &'static str,
    pub background_position: (f32, f32),
    pub ranges: Vec<TextRange>,
}

impl CollectSurface {
    pub fn decorations(&self) -> Vec<Decoration> {
        self.drawn
            .values()
            .map(|(descriptor, ranges)| Decoration {
                id: descriptor.id.0,
                code_point: format_code_point(code_point(
                    descriptor.sheet,
                    descriptor.row,
                    descriptor.col,
                )),
                sheet: sheet_file_name(descriptor.sheet),
                row: descriptor.row,
                col: descriptor.col,
                source_css: descriptor.source_css(),
                background_position: descriptor.background_position(),
                ranges: ranges.clone(),
            })
            .collect()
    }
}

impl DecorationSurface for CollectSurface {
    fn set_decorations(&mut self, descriptor: &RenderDescriptor, ranges: &[TextRange]) {
        if ranges.is_empty() {
            self.drawn.remove(&descriptor.id);
        } else {
            self.drawn
                .insert(descriptor.id, (descriptor.clone(), ranges.to_vec()));
        }
    }

    fn release(&mut self, id: DescriptorId) {
        self.drawn.remove(&id);
    }
}

/// Prints messages to stderr.
#[derive(Default)]
pub struct StderrNotifier {
    pub warnings: usize,
}

impl Notifier for StderrNotifier {
    fn info(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn warn(&mut self, message: &str) {
        self.warnings += 1;
        eprintln!("warning: {}", message);
    }

    fn error(&mut self, message: &str) {
        self.warnings += 1;
        eprintln!("error: {}", message);
    }
}
