//! Session - connects host events and commands to a [`GlyphEngine`].

use sheetglyph_api::{
    DecorationSurface, HostEvent, HoverInfo, Notifier, Position, Settings, TextDocument,
};
use sheetglyph_atlas::{ApplyStats, GlyphEngine, GlyphOptions, Reload, Synchronizer};

use crate::hex::{self, Picker, Resolution};
use crate::hover;

/// Commands the host can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Clear everything and rebuild the index from disk.
    ReloadGlyphs,
    /// Resolve the hex code before the cursor.
    ResolveHex,
}

impl Command {
    pub const ALL: [Command; 2] = [Command::ReloadGlyphs, Command::ResolveHex];

    pub fn id(&self) -> &'static str {
        match self {
            Command::ReloadGlyphs => "sheetglyph.reloadGlyphs",
            Command::ResolveHex => "sheetglyph.resolveHex",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// Borrowed host services for one call.
pub struct Host<'a> {
    pub document: &'a mut dyn TextDocument,
    pub surface: &'a mut dyn DecorationSurface,
    pub notifier: &'a mut dyn Notifier,
    pub settings: &'a dyn Settings,
}

/// Editor-facing state: the engine plus what is currently drawn.
pub struct Session {
    engine: GlyphEngine,
    sync: Synchronizer,
}

impl Session {
    pub fn new(engine: GlyphEngine) -> Self {
        Self {
            engine,
            sync: Synchronizer::new(),
        }
    }

    pub fn engine(&self) -> &GlyphEngine {
        &self.engine
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.sync
    }

    /// Recompute the render model for the document and draw it.
    pub fn refresh(
        &mut self,
        document: &dyn TextDocument,
        surface: &mut dyn DecorationSurface,
    ) -> ApplyStats {
        let model = self.engine.render(&document.text());
        let stats = self.sync.apply(&model, surface);
        tracing::debug!(
            "rendered {} glyphs ({} descriptors set, {} cleared)",
            model.len(),
            stats.applied,
            stats.cleared
        );
        stats
    }

    pub fn handle_event(&mut self, event: &HostEvent, host: &mut Host<'_>) {
        match event {
            HostEvent::ActiveViewChanged => {
                self.sync.reset_view(self.engine.descriptors(), &mut *host.surface);
                self.refresh(&*host.document, &mut *host.surface);
            }
            HostEvent::TextChanged => {
                self.refresh(&*host.document, &mut *host.surface);
            }
            HostEvent::ConfigurationChanged { keys } => {
                if keys.is_empty() {
                    return;
                }
                let options = GlyphOptions::from_settings(host.settings);
                if let Some(reload) = self.engine.set_options(options) {
                    self.finish_reload(reload, &mut *host.surface);
                }
                self.refresh(&*host.document, &mut *host.surface);
            }
        }
    }

    /// Run a command. Returns a picker when the user has to choose a glyph.
    pub fn execute(
        &mut self,
        command: Command,
        position: Position,
        host: &mut Host<'_>,
    ) -> Option<Picker> {
        match command {
            Command::ReloadGlyphs => {
                self.reload_glyphs(host);
                None
            }
            Command::ResolveHex => self.resolve_hex(position, host),
        }
    }

    /// Clear every drawn glyph, rebuild the index and redraw.
    pub fn reload_glyphs(&mut self, host: &mut Host<'_>) {
        let reload = self.engine.reload();
        let count = reload.report.code_points;
        self.finish_reload(reload, &mut *host.surface);
        self.refresh(&*host.document, &mut *host.surface);
        host.notifier
            .info(&format!("Glyph sheets reloaded! Found {} glyphs.", count));
    }

    /// Resolve the hex code before `position`. A four-digit code is applied
    /// right away; a sheet code returns the picker to show.
    pub fn resolve_hex(&mut self, position: Position, host: &mut Host<'_>) -> Option<Picker> {
        match hex::resolve(&self.engine, &*host.document, position) {
            Ok(Resolution::Direct(edit)) => {
                if !host.document.apply_edit(&edit) {
                    host.notifier.error("Could not insert the glyph.");
                }
                None
            }
            Ok(Resolution::Picker(picker)) => Some(picker),
            Err(e) => {
                tracing::debug!("hex resolution failed: {}", e);
                host.notifier.warn(&e.to_string());
                None
            }
        }
    }

    /// Apply the user's choice from a picker. Returns true if the document changed.
    pub fn pick(&mut self, picker: &Picker, index: usize, host: &mut Host<'_>) -> bool {
        let Some(edit) = picker.select(index) else {
            host.notifier.warn("No such glyph in the picker.");
            return false;
        };
        if host.document.apply_edit(&edit) {
            true
        } else {
            host.notifier.error("Could not insert the glyph.");
            false
        }
    }

    pub fn hover(&self, document: &dyn TextDocument, position: Position) -> Option<HoverInfo> {
        hover::hover(self.engine.index(), document, position)
    }

    /// Remove everything this session drew and release every descriptor.
    pub fn deactivate(&mut self, surface: &mut dyn DecorationSurface) {
        self.sync.clear(surface);
        for id in self.engine.descriptors_mut().invalidate_all() {
            surface.release(id);
        }
    }

    fn finish_reload(&mut self, reload: Reload, surface: &mut dyn DecorationSurface) {
        self.sync.clear(surface);
        for id in reload.released {
            surface.release(id);
        }
    }
}
