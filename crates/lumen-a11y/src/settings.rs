//! Accessibility Settings
//!
//! The single persisted preferences record and its value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::A11yError;

/// Colour-vision deficiency simulated by the filter layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBlindMode {
    #[default]
    None,
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Achromatopsia,
}

impl ColorBlindMode {
    pub const ALL: [ColorBlindMode; 5] = [
        Self::None, Self::Protanopia, Self::Deuteranopia, Self::Tritanopia, Self::Achromatopsia,
    ];

    /// Value written to the mode attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
            Self::Achromatopsia => "achromatopsia",
        }
    }
}

impl fmt::Display for ColorBlindMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorBlindMode {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| A11yError::UnknownColorBlindMode(s.to_string()))
    }
}

/// Base font size in CSS pixels, always within `[MIN, MAX]`.
///
/// Out-of-range requests are clamped, never rejected. Persisted values are
/// clamped the same way when read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64")]
pub struct FontSize(u8);

impl FontSize {
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 24;
    pub const DEFAULT: FontSize = FontSize(14);
    /// Increment used by the +/- buttons
    pub const STEP: u8 = 2;

    pub fn new(size: i64) -> Self {
        Self(size.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn increased(self) -> Self {
        Self::new(self.0 as i64 + Self::STEP as i64)
    }

    pub fn decreased(self) -> Self {
        Self::new(self.0 as i64 - Self::STEP as i64)
    }

    /// Value for the font-size style variable
    pub fn css_value(self) -> String {
        format!("{}px", self.0)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for FontSize {
    fn from(size: i64) -> Self {
        Self::new(size)
    }
}

/// Persisted accessibility preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySettings {
    pub high_contrast: bool,
    pub color_blind_mode: ColorBlindMode,
    pub font_size: FontSize,
    pub text_to_speech: bool,
}

impl AccessibilitySettings {
    pub fn with_high_contrast(self, high_contrast: bool) -> Self {
        Self { high_contrast, ..self }
    }

    pub fn with_color_blind_mode(self, color_blind_mode: ColorBlindMode) -> Self {
        Self { color_blind_mode, ..self }
    }

    pub fn with_font_size(self, font_size: FontSize) -> Self {
        Self { font_size, ..self }
    }

    pub fn with_text_to_speech(self, text_to_speech: bool) -> Self {
        Self { text_to_speech, ..self }
    }
}
