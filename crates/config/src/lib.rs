//! Shared configuration for Brushwork
//!
//! This crate provides the single source of truth for the drawing surface
//! dimensions and the brush a new session starts with. Every value can be
//! overridden from the environment.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default surface width in pixels
pub const DEFAULT_WIDTH: u32 = 1024;

/// Default surface height in pixels
pub const DEFAULT_HEIGHT: u32 = 768;

/// Brush installed when a session starts
pub const DEFAULT_BRUSH: &str = "waxy";

/// Default brush diameter in pixels
pub const DEFAULT_BRUSH_SIZE: f32 = 10.0;

/// Default brush color
pub const DEFAULT_BRUSH_COLOR: &str = "#ff4444";

pub const ENV_WIDTH: &str = "BRUSHWORK_WIDTH";
pub const ENV_HEIGHT: &str = "BRUSHWORK_HEIGHT";
pub const ENV_BRUSH: &str = "BRUSHWORK_BRUSH";
pub const ENV_SIZE: &str = "BRUSHWORK_SIZE";
pub const ENV_COLOR: &str = "BRUSHWORK_COLOR";

/// Drawing surface dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl SurfaceConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Brush settings a session starts with. Names and colors are kept as the
/// user wrote them; the painting crate resolves them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushDefaults {
    /// `waxy`, `liquid`, `graphite` or `living`
    pub brush: String,
    pub size: f32,
    /// `#rrggbb`, `#rgb` or `rgb(r, g, b)`
    pub color: String,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self {
            brush: DEFAULT_BRUSH.to_string(),
            size: DEFAULT_BRUSH_SIZE,
            color: DEFAULT_BRUSH_COLOR.to_string(),
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub surface: SurfaceConfig,
    pub brush: BrushDefaults,
}

impl SessionConfig {
    /// Defaults with overrides from `BRUSHWORK_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup. Values that do
    /// not parse are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(width) = parse_var(&lookup, ENV_WIDTH, |v: &u32| *v > 0) {
            config.surface.width = width;
        }
        if let Some(height) = parse_var(&lookup, ENV_HEIGHT, |v: &u32| *v > 0) {
            config.surface.height = height;
        }
        if let Some(size) = parse_var(&lookup, ENV_SIZE, |v: &f32| v.is_finite() && *v > 0.0) {
            config.brush.size = size;
        }
        if let Some(brush) = lookup(ENV_BRUSH).filter(|v| !v.trim().is_empty()) {
            config.brush.brush = brush.trim().to_string();
        }
        if let Some(color) = lookup(ENV_COLOR).filter(|v| !v.trim().is_empty()) {
            config.brush.color = color.trim().to_string();
        }

        config
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    valid: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.surface.width, DEFAULT_WIDTH);
        assert_eq!(config.surface.height, DEFAULT_HEIGHT);
        assert_eq!(config.brush.brush, "waxy");
        assert_eq!(config.brush.size, 10.0);
        assert_eq!(config.brush.color, "#ff4444");
    }

    #[test]
    fn test_overrides_apply() {
        let config = SessionConfig::from_lookup(lookup(&[
            (ENV_WIDTH, "640"),
            (ENV_HEIGHT, " 480 "),
            (ENV_BRUSH, "living"),
            (ENV_SIZE, "22.5"),
            (ENV_COLOR, "rgb(0, 128, 255)"),
        ]));
        assert_eq!(config.surface, SurfaceConfig::new(640, 480));
        assert_eq!(config.brush.brush, "living");
        assert_eq!(config.brush.size, 22.5);
        assert_eq!(config.brush.color, "rgb(0, 128, 255)");
    }

    #[test]
    fn test_bad_overrides_fall_back() {
        let config = SessionConfig::from_lookup(lookup(&[
            (ENV_WIDTH, "0"),
            (ENV_HEIGHT, "tall"),
            (ENV_SIZE, "-3"),
            (ENV_BRUSH, "   "),
        ]));
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r##"{"surface":{"width":32,"height":16},"brush":{"brush":"liquid","size":4.0,"color":"#000"}}"##;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.surface.pixel_count(), 512);
        assert_eq!(config.brush.brush, "liquid");
    }
}
