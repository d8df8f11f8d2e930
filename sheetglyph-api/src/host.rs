//! Contracts the host editor implements.

use crate::{ConfigKey, DescriptorId, Position, RenderDescriptor, TextEdit, TextRange};

/// Read and edit access to one document.
///
/// Offsets are UTF-16 code units from the start of the text.
pub trait TextDocument {
    /// Full text of the document.
    fn text(&self) -> String;

    /// Convert a position to a linear offset.
    fn offset_at(&self, position: Position) -> usize;

    /// Convert a linear offset to a position.
    fn position_at(&self, offset: usize) -> Position;

    /// Replace the text in `edit.range`. Returns false if the range is invalid.
    fn apply_edit(&mut self, edit: &TextEdit) -> bool;
}

/// The editor view's inline decoration layer.
pub trait DecorationSurface {
    /// Replace every range drawn with `descriptor`. An empty slice clears it.
    fn set_decorations(&mut self, descriptor: &RenderDescriptor, ranges: &[TextRange]);

    /// The descriptor will not be used again; drop any host resources for it.
    fn release(&mut self, id: DescriptorId);
}

/// User-visible messages.
pub trait Notifier {
    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Read-only view of the host's configuration store.
pub trait Settings {
    /// Current value of a boolean setting, or None if unset or not a boolean.
    fn get_bool(&self, key: ConfigKey) -> Option<bool>;
}

/// Settings as a JSON object, either flat (`{"sheetglyph.hideSourceChar": false}`)
/// or nested (`{"sheetglyph": {"hideSourceChar": false}}`). Flat keys win.
impl Settings for serde_json::Value {
    fn get_bool(&self, key: ConfigKey) -> Option<bool> {
        if let Some(value) = self.get(key.as_str()) {
            return value.as_bool();
        }
        let (section, name) = key.as_str().split_once('.')?;
        self.get(section)?.get(name)?.as_bool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_settings_flat_and_nested() {
        let flat = json!({ "sheetglyph.hideSourceChar": false });
        assert_eq!(flat.get_bool(ConfigKey::HideSourceChar), Some(false));
        assert_eq!(flat.get_bool(ConfigKey::ExcludeTransparent), None);

        let nested = json!({ "sheetglyph": { "excludeTransparent": false } });
        assert_eq!(nested.get_bool(ConfigKey::ExcludeTransparent), Some(false));

        let both = json!({
            "sheetglyph.excludeTransparent": true,
            "sheetglyph": { "excludeTransparent": false }
        });
        assert_eq!(both.get_bool(ConfigKey::ExcludeTransparent), Some(true));
    }

    #[test]
    fn test_json_settings_ignore_non_boolean() {
        let settings = json!({ "sheetglyph.hideSourceChar": "yes" });
        assert_eq!(settings.get_bool(ConfigKey::HideSourceChar), None);
    }
}
