//! Tile data access for uploads

use super::{TileCoord, TiledSurface};

impl TiledSurface {
    /// Get tile bounds (x, y, width, height) in pixel coordinates.
    /// Edge tiles are narrower when the surface is not tile-aligned.
    pub fn get_tile_bounds(&self, coord: TileCoord) -> (u32, u32, u32, u32) {
        let start_x = coord.x * self.tile_size;
        let start_y = coord.y * self.tile_size;
        let width = self.tile_size.min(self.surface.width.saturating_sub(start_x));
        let height = self.tile_size.min(self.surface.height.saturating_sub(start_y));
        (start_x, start_y, width, height)
    }

    /// Copy out the pixels of one tile in row-major order
    pub fn get_tile_data(&self, coord: TileCoord) -> Vec<[f32; 4]> {
        let (start_x, start_y, width, height) = self.get_tile_bounds(coord);
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in start_y..start_y + height {
            for x in start_x..start_x + width {
                if let Some(pixel) = self.surface.get_pixel(x, y) {
                    data.push(pixel);
                }
            }
        }
        data
    }

    /// Tile pixels as raw native-endian f32 bytes, ready for a texture upload
    pub fn get_tile_bytes(&self, coord: TileCoord) -> Vec<u8> {
        bytemuck::cast_slice(&self.get_tile_data(coord)).to_vec()
    }
}
