use crate::config::Region;
use crate::consts::save_format::TILES_PER_MAP_FILE;

/// An inclusive rectangle of file coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryRect {
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
}

impl BoundaryRect {
    pub fn new(start_x: i64, start_y: i64, end_x: i64, end_y: i64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        in_boundary(x, y, self)
    }
}

/// Whether `(x, y)` lies within `rect`, edges included.
pub fn in_boundary(x: i64, y: i64, rect: &BoundaryRect) -> bool {
    (rect.start_x..=rect.end_x).contains(&x) && (rect.start_y..=rect.end_y).contains(&y)
}

/// Converts an absolute tile coordinate into the coordinate of the map file storing it.
///
/// Rounds toward negative infinity, so tile `-5` lives in map file `-1`, not `0`.
pub fn tile_to_map_cell(tile: i64) -> i64 {
    tile.div_euclid(TILES_PER_MAP_FILE)
}

/// The two rectangles a region covers: one in map file coordinates, one in chunk coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionBounds {
    pub tiles: BoundaryRect,
    pub chunks: BoundaryRect,
}

impl From<&Region> for RegionBounds {
    fn from(region: &Region) -> Self {
        let (start, stop) = (region.start, region.stop);
        Self {
            tiles: BoundaryRect::new(
                tile_to_map_cell(start.x),
                tile_to_map_cell(start.y),
                tile_to_map_cell(stop.x),
                tile_to_map_cell(stop.y),
            ),
            chunks: BoundaryRect::new(start.chunk_x, start.chunk_y, stop.chunk_x, stop.chunk_y),
        }
    }
}
