use std::fmt;
use std::str::FromStr;

use brushwork_ipc::ColorInput;
use serde::{Deserialize, Serialize};

use crate::error::PaintError;

/// An opaque 8-bit-per-channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorRgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb` or `rgb(r, g, b)`
    pub fn parse(input: &str) -> Result<Self, PaintError> {
        let text = input.trim();
        let invalid = || PaintError::InvalidColor(input.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            return match hex.len() {
                6 => {
                    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                    match (channel(0), channel(2), channel(4)) {
                        (Ok(r), Ok(g), Ok(b)) => Ok(Self::new(r, g, b)),
                        _ => Err(invalid()),
                    }
                }
                3 => {
                    // #abc expands to #aabbcc
                    let digits: Vec<u8> = hex
                        .chars()
                        .filter_map(|c| c.to_digit(16))
                        .map(|d| (d * 17) as u8)
                        .collect();
                    Ok(Self::new(digits[0], digits[1], digits[2]))
                }
                _ => Err(invalid()),
            };
        }

        let body = text
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let channels: Vec<u8> = body
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| invalid())?;
        match channels.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(invalid()),
        }
    }

    /// Shift each channel by a (possibly fractional) offset, clamped to 0..=255 and floored
    pub fn offset(self, dr: f32, dg: f32, db: f32) -> Self {
        let shift = |c: u8, d: f32| (c as f32 + d).clamp(0.0, 255.0).floor() as u8;
        Self::new(shift(self.r, dr), shift(self.g, dg), shift(self.b, db))
    }

    /// Channels normalized to 0.0-1.0 with the given alpha
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

impl FromStr for ColorRgb {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&ColorInput> for ColorRgb {
    type Error = PaintError;

    fn try_from(input: &ColorInput) -> Result<Self, Self::Error> {
        match input {
            ColorInput::Css(text) => Self::parse(text),
            ColorInput::Rgb([r, g, b]) => Ok(Self::new(*r, *g, *b)),
        }
    }
}

impl fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Compositing modes supported by the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BlendMode {
    /// Source-over alpha compositing
    #[default]
    Normal = 0,
    /// Multiplies darks and screens lights based on the destination
    Overlay = 1,
}

/// Shape of the ends of a stroked line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke parameters for `RenderTarget::stroke_line`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f32,
    pub color: ColorRgb,
    pub cap: LineCap,
}

impl LineStyle {
    pub fn new(width: f32, color: ColorRgb) -> Self {
        Self {
            width,
            color,
            cap: LineCap::Butt,
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(ColorRgb::parse("#ff4444").unwrap(), ColorRgb::new(255, 68, 68));
        assert_eq!(ColorRgb::parse("#FFF").unwrap(), ColorRgb::WHITE);
        assert_eq!("#000000".parse::<ColorRgb>().unwrap(), ColorRgb::BLACK);
    }

    #[test]
    fn test_parse_rgb_function() {
        assert_eq!(
            ColorRgb::parse("rgb(10, 20, 30)").unwrap(),
            ColorRgb::new(10, 20, 30)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "ff4444", "#ff44", "#gg0000", "rgb(1,2)", "rgb(256,0,0)", "#ffé"] {
            assert!(ColorRgb::parse(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_display_round_trip() {
        let color = ColorRgb::new(255, 68, 68);
        assert_eq!(color.to_string(), "#ff4444");
    }

    #[test]
    fn test_offset_clamps() {
        let color = ColorRgb::new(250, 5, 100);
        assert_eq!(color.offset(20.0, -20.0, 0.5), ColorRgb::new(255, 0, 100));
    }
}
