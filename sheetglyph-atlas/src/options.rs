//! User-facing options.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sheetglyph_api::{ConfigKey, RenderMode, Settings};

use crate::AtlasError;

/// The two settings the engine honours. Both default to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlyphOptions {
    /// Hide the source character under a rendered glyph.
    pub hide_source_char: bool,
    /// Drop fully transparent cells from the index.
    pub exclude_transparent: bool,
}

impl Default for GlyphOptions {
    fn default() -> Self {
        Self {
            hide_source_char: true,
            exclude_transparent: true,
        }
    }
}

impl GlyphOptions {
    /// Read options from the host's settings; unset keys keep their defaults.
    pub fn from_settings(settings: &dyn Settings) -> Self {
        let mut options = Self::default();
        for key in ConfigKey::ALL {
            if let Some(value) = settings.get_bool(key) {
                options.set(key, value);
            }
        }
        options
    }

    /// Load options from a JSON settings file.
    pub fn load(path: &Path) -> Result<Self, AtlasError> {
        let text = std::fs::read_to_string(path)?;
        let settings: serde_json::Value = serde_json::from_str(&text)?;
        Ok(Self::from_settings(&settings))
    }

    pub fn get(&self, key: ConfigKey) -> bool {
        match key {
            ConfigKey::HideSourceChar => self.hide_source_char,
            ConfigKey::ExcludeTransparent => self.exclude_transparent,
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: bool) {
        match key {
            ConfigKey::HideSourceChar => self.hide_source_char = value,
            ConfigKey::ExcludeTransparent => self.exclude_transparent = value,
        }
    }

    /// Keys whose value differs between `self` and `other`.
    pub fn changed_keys(&self, other: &GlyphOptions) -> Vec<ConfigKey> {
        ConfigKey::ALL
            .into_iter()
            .filter(|&key| self.get(key) != other.get(key))
            .collect()
    }

    pub fn render_mode(&self) -> RenderMode {
        RenderMode {
            hide_source: self.hide_source_char,
        }
    }
}
