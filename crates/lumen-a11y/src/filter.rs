//! Colour Filters
//!
//! Colour-vision simulation matrices keyed by `ColorBlindMode`, and the
//! contrast checks behind the high-contrast palette.

use crate::settings::ColorBlindMode;

/// Row-major 3x3 linear transform over RGB
pub type ColorMatrix = [[f32; 3]; 3];

const IDENTITY: ColorMatrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
const PROTANOPIA: ColorMatrix = [[0.567, 0.433, 0.0], [0.558, 0.442, 0.0], [0.0, 0.242, 0.758]];
const DEUTERANOPIA: ColorMatrix = [[0.625, 0.375, 0.0], [0.7, 0.3, 0.0], [0.0, 0.3, 0.7]];
const TRITANOPIA: ColorMatrix = [[0.95, 0.05, 0.0], [0.0, 0.433, 0.567], [0.0, 0.475, 0.525]];
const ACHROMATOPSIA: ColorMatrix = [[0.299, 0.587, 0.114], [0.299, 0.587, 0.114], [0.299, 0.587, 0.114]];

impl ColorBlindMode {
    /// Simulation matrix for this mode
    pub fn matrix(self) -> ColorMatrix {
        match self {
            Self::None => IDENTITY,
            Self::Protanopia => PROTANOPIA,
            Self::Deuteranopia => DEUTERANOPIA,
            Self::Tritanopia => TRITANOPIA,
            Self::Achromatopsia => ACHROMATOPSIA,
        }
    }
}

/// Colour-vision simulation filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorFilter {
    pub mode: ColorBlindMode,
    pub matrix: ColorMatrix,
}

impl ColorFilter {
    pub fn for_mode(mode: ColorBlindMode) -> Self {
        Self { mode, matrix: mode.matrix() }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == IDENTITY
    }

    /// Transform an 8-bit colour
    pub fn apply(&self, [r, g, b]: [u8; 3]) -> [u8; 3] {
        let input = [r as f32, g as f32, b as f32];
        self.matrix.map(|row| {
            let v: f32 = row.iter().zip(input).map(|(m, c)| m * c).sum();
            v.round().clamp(0.0, 255.0) as u8
        })
    }

    /// `values` for an SVG `feColorMatrix type="matrix"` (4x5, alpha untouched)
    pub fn fe_color_matrix(&self) -> String {
        let mut out = Vec::with_capacity(20);
        for row in &self.matrix {
            out.extend(row.iter().map(|v| format!("{v}")));
            out.extend(["0".to_string(), "0".to_string()]);
        }
        out.extend(["0", "0", "0", "1", "0"].map(String::from));
        out.join(" ")
    }
}

/// Contrast checker
#[derive(Debug)]
pub struct ContrastChecker;

impl ContrastChecker {
    /// Calculate relative luminance
    pub fn luminance([r, g, b]: [u8; 3]) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
        }
        0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
    }

    /// Calculate contrast ratio between two colors
    pub fn contrast_ratio(a: [u8; 3], b: [u8; 3]) -> f64 {
        let (l1, l2) = (Self::luminance(a), Self::luminance(b));
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

/// Palette the high-contrast class switches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighContrastPalette {
    pub background: [u8; 3],
    pub text: [u8; 3],
    pub link: [u8; 3],
    pub focus: [u8; 3],
}

impl Default for HighContrastPalette {
    fn default() -> Self {
        Self {
            background: [0x00, 0x00, 0x00],
            text: [0xff, 0xff, 0xff],
            link: [0xff, 0xff, 0x00],
            focus: [0x1a, 0xeb, 0xff],
        }
    }
}

impl HighContrastPalette {
    /// Weakest foreground/background ratio in the palette
    pub fn min_ratio(&self) -> f64 {
        [self.text, self.link, self.focus]
            .into_iter()
            .map(|fg| ContrastChecker::contrast_ratio(fg, self.background))
            .fold(f64::INFINITY, f64::min)
    }
}
