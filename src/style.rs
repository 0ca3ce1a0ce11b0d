//! Visual constants shared by the chart renderers.

use serde::{Deserialize, Serialize};

use crate::model::Rgb;

/// Palette and typography applied to every chart.
///
/// Charts are drawn on a transparent background so they blend into the dark
/// deck theme; `background` is only used where a shape needs an opaque fill
/// that matches the slide, such as the inside of trend markers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Primary accent (cyan).
    pub accent: Rgb,
    /// Secondary colour for axes and stems (slate).
    pub secondary: Rgb,
    /// Slide background (dark navy).
    pub background: Rgb,
    /// Fill of timeline label boxes.
    pub label_fill: Rgb,
    /// Default text colour.
    pub text: Rgb,
    /// CSS font-family list written into every SVG.
    pub font_family: String,
    /// Pixels per figure inch.
    pub dpi: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            accent: Rgb(0x06, 0xb6, 0xd4),
            secondary: Rgb(0x64, 0x74, 0x8b),
            background: Rgb(0x0f, 0x17, 0x2a),
            label_fill: Rgb(0x1e, 0x29, 0x3b),
            text: Rgb(0xff, 0xff, 0xff),
            font_family: "Arial, Helvetica, sans-serif".to_owned(),
            dpi: 72.0,
        }
    }
}

impl ChartStyle {
    /// Converts a figure size in inches to canvas pixels.
    pub fn canvas_size(&self, inches: (f64, f64)) -> (f64, f64) {
        (inches.0 * self.dpi, inches.1 * self.dpi)
    }
}
