//! Settings Projection
//!
//! Writes `AccessibilitySettings` onto the document element. The document
//! is never read back to decide what to write; the settings record is the
//! only input and unchanged values produce no mutations.

use lumen_dom::{Document, DomError};

use crate::settings::AccessibilitySettings;

/// Class toggled on the document element for high-contrast presentation
pub const HIGH_CONTRAST_CLASS: &str = "high-contrast";
/// Attribute the colour-vision filter layer keys on
pub const COLOR_BLIND_ATTRIBUTE: &str = "data-colorblind-mode";
/// Style variable holding the base font size
pub const FONT_SIZE_PROPERTY: &str = "--font-size";

/// Projects settings onto a document
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsApplier;

impl SettingsApplier {
    /// Apply `settings` to the document element.
    /// Returns the number of effective changes (0 when already applied).
    pub fn apply(document: &mut Document, settings: &AccessibilitySettings) -> Result<usize, DomError> {
        let root = document.document_element();
        let tree = document.tree_mut();
        let mut changes = 0;

        let contrast_changed = if settings.high_contrast {
            tree.add_class(root, HIGH_CONTRAST_CLASS)?
        } else {
            tree.remove_class(root, HIGH_CONTRAST_CLASS)?
        };
        changes += contrast_changed as usize;

        // Written even for `none` so the filter layer can react to it
        changes += tree.set_attribute(root, COLOR_BLIND_ATTRIBUTE, settings.color_blind_mode.as_str())? as usize;
        changes += tree.set_style_property(root, FONT_SIZE_PROPERTY, &settings.font_size.css_value())? as usize;

        if changes > 0 {
            tracing::debug!(changes, ?settings, "applied accessibility settings");
        }
        Ok(changes)
    }
}
