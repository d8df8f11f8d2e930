//! Sheet discovery - find `font/glyph_XX.png` files under a project root.
//!
//! The walk is breadth-first by depth, after a direct check of
//! `<root>/font`. Entries are visited in name order so repeated scans of an
//! unchanged tree see sheets in the same order. Unreadable directories are
//! skipped and counted.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sheetglyph_api::SHEET_CONTAINER;

use crate::sheet::{GlyphSheet, SheetSource};

/// Default number of directory levels searched below the root.
pub const MAX_DEPTH: usize = 3;

/// Package-manager directories never searched.
const DEPENDENCY_DIRS: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

static SHEET_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^glyph_([0-9a-f]{2})\.png$").expect("sheet name pattern is valid")
});

/// Sheets found by a full walk.
#[derive(Debug, Clone, Default)]
pub struct LocateResult {
    /// In discovery order; may contain several sheets for one byte.
    pub sheets: Vec<GlyphSheet>,
    /// Directories that could not be read.
    pub skipped_dirs: usize,
}

/// Leading byte encoded in a sheet file name, e.g. `glyph_e0.png` -> `0xE0`.
pub fn parse_sheet_name(name: &str) -> Option<u8> {
    let caps = SHEET_NAME.captures(name)?;
    u8::from_str_radix(&caps[1], 16).ok()
}

/// Every sheet under `root`, in discovery order.
pub fn locate(root: &Path, max_depth: usize) -> LocateResult {
    let mut sheets = Vec::new();
    let skipped_dirs = walk(root, max_depth, |sheet| {
        sheets.push(sheet);
        ControlFlow::Continue(())
    });
    LocateResult {
        sheets,
        skipped_dirs,
    }
}

/// The first sheet for `byte` that a full walk would find, stopping there.
pub fn locate_byte(root: &Path, max_depth: usize, byte: u8) -> Option<GlyphSheet> {
    let mut found = None;
    walk(root, max_depth, |sheet| {
        if sheet.byte == byte {
            found = Some(sheet);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    found
}

/// Walk the tree, handing each sheet to `visit`. Returns the number of
/// directories that could not be read.
fn walk(
    root: &Path,
    max_depth: usize,
    mut visit: impl FnMut(GlyphSheet) -> ControlFlow<()>,
) -> usize {
    let mut skipped = 0;
    let mut scanned: HashSet<PathBuf> = HashSet::new();

    let root_container = root.join(SHEET_CONTAINER);
    if root_container.is_dir() {
        scanned.insert(root_container.clone());
        if scan_container(&root_container, &mut skipped, &mut visit).is_break() {
            return skipped;
        }
    }

    let mut queue = VecDeque::from([(root.to_path_buf(), 0usize)]);
    while let Some((dir, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let entries = match sorted_entries(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("skipping unreadable directory {}: {}", dir.display(), e);
                skipped += 1;
                continue;
            }
        };

        for (name, path, is_dir) in entries {
            if !is_dir || is_excluded(&name) {
                continue;
            }
            if name == SHEET_CONTAINER {
                if scanned.insert(path.clone())
                    && scan_container(&path, &mut skipped, &mut visit).is_break()
                {
                    return skipped;
                }
            } else {
                queue.push_back((path, depth + 1));
            }
        }
    }

    skipped
}

/// Report every sheet file directly inside a container directory.
fn scan_container(
    dir: &Path,
    skipped: &mut usize,
    visit: &mut impl FnMut(GlyphSheet) -> ControlFlow<()>,
) -> ControlFlow<()> {
    let entries = match sorted_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("skipping unreadable sheet container {}: {}", dir.display(), e);
            *skipped += 1;
            return ControlFlow::Continue(());
        }
    };

    for (name, path, is_dir) in entries {
        if is_dir {
            continue;
        }
        if let Some(byte) = parse_sheet_name(&name) {
            tracing::debug!("found sheet {:02X} at {}", byte, path.display());
            visit(GlyphSheet::new(byte, SheetSource::file(path)))?;
        }
    }
    ControlFlow::Continue(())
}

fn is_excluded(name: &str) -> bool {
    name.starts_with('.') || DEPENDENCY_DIRS.contains(&name)
}

/// `(name, path, is_dir)` for each entry, sorted by name. Symlinks are not
/// followed when deciding `is_dir`.
fn sorted_entries(dir: &Path) -> std::io::Result<Vec<(String, PathBuf, bool)>> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| {
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (e.file_name().to_string_lossy().into_owned(), e.path(), is_dir)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
