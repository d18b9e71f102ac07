//! Tile management and dirty tracking for CPU surfaces

mod data_access;
mod dirty_tracking;

use std::collections::HashSet;

use crate::constants::DEFAULT_TILE_SIZE;
use crate::surface::CpuSurface;

/// Tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

/// Manages tiled access to a surface with dirty tracking
///
/// Every pixel write made through the canvas marks the tiles it touched, so a
/// host only has to re-upload what changed since its last `take_dirty_tiles`.
pub struct TiledSurface {
    pub(crate) surface: CpuSurface,
    tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
    dirty_tiles: HashSet<TileCoord>,
}

impl TiledSurface {
    /// Create a new tiled surface with the given dimensions and tile size
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        let tile_size = tile_size.max(1);
        Self {
            surface: CpuSurface::new(width, height),
            tile_size,
            tiles_x: width.div_ceil(tile_size),
            tiles_y: height.div_ceil(tile_size),
            dirty_tiles: HashSet::new(),
        }
    }

    /// Create a new tiled surface with the default tile size
    pub fn with_default_tile_size(width: u32, height: u32) -> Self {
        Self::new(width, height, DEFAULT_TILE_SIZE)
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    #[inline]
    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    #[inline]
    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// Get the underlying surface for direct pixel access
    #[inline]
    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    /// Get mutable access to the underlying surface
    #[inline]
    pub fn surface_mut(&mut self) -> &mut CpuSurface {
        &mut self.surface
    }
}
