//! Dirty tile tracking for incremental uploads

use tracing::trace;

use super::{TileCoord, TiledSurface};

impl TiledSurface {
    /// Mark a rectangular pixel region as dirty
    pub fn mark_region_dirty(&mut self, x: u32, y: u32, w: u32, h: u32) {
        if w == 0 || h == 0 || x >= self.surface.width || y >= self.surface.height {
            return;
        }

        let x_end = x.saturating_add(w).min(self.surface.width);
        let y_end = y.saturating_add(h).min(self.surface.height);

        let tile_x_end = (x_end - 1) / self.tile_size;
        let tile_y_end = (y_end - 1) / self.tile_size;

        for ty in (y / self.tile_size)..=tile_y_end {
            for tx in (x / self.tile_size)..=tile_x_end {
                self.dirty_tiles.insert(TileCoord { x: tx, y: ty });
            }
        }

        trace!(
            "mark_region_dirty: ({}, {}) {}x{} -> {} dirty tiles",
            x, y, w, h, self.dirty_tiles.len()
        );
    }

    /// Get all dirty tiles and clear the dirty set
    pub fn take_dirty_tiles(&mut self) -> Vec<TileCoord> {
        self.dirty_tiles.drain().collect()
    }

    /// Check if any tiles are dirty
    #[inline]
    pub fn has_dirty_tiles(&self) -> bool {
        !self.dirty_tiles.is_empty()
    }

    /// Get the number of dirty tiles
    #[inline]
    pub fn dirty_tile_count(&self) -> usize {
        self.dirty_tiles.len()
    }
}
