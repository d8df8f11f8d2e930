//! Host events delivered to the session, and the configuration keys they carry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigKey {
    /// Hide the source character when a glyph is rendered over it.
    HideSourceChar,
    /// Leave fully transparent cells out of the index.
    ExcludeTransparent,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::HideSourceChar, ConfigKey::ExcludeTransparent];

    /// Dotted settings key as stored by the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::HideSourceChar => "sheetglyph.hideSourceChar",
            ConfigKey::ExcludeTransparent => "sheetglyph.excludeTransparent",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change notifications from the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    /// A different document view became active.
    ActiveViewChanged,

    /// The active document's text was modified.
    TextChanged,

    /// One or more settings changed.
    ConfigurationChanged { keys: Vec<ConfigKey> },
}
