//! Session command types sent by the host UI.

use serde::{Deserialize, Serialize};

/// A brush color as the UI delivers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorInput {
    /// `#rrggbb`, `#rgb` or `rgb(r, g, b)`
    Css(String),
    /// Raw channels, 0-255
    Rgb([u8; 3]),
}

impl From<&str> for ColorInput {
    fn from(value: &str) -> Self {
        Self::Css(value.to_string())
    }
}

impl From<[u8; 3]> for ColorInput {
    fn from(value: [u8; 3]) -> Self {
        Self::Rgb(value)
    }
}

/// Commands for controlling the active brush and the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionCommand {
    /// Switch brush style; unknown names select the waxy brush
    SetBrushType { name: String },
    /// Set brush size in pixels (must be > 0)
    SetBrushSize { size: f32 },
    /// Set brush color
    SetBrushColor { color: ColorInput },
    /// Stop any animation and erase the whole surface
    Clear,
}
