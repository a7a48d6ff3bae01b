use crate::errors::CastError;
use crate::tiles::TileInfo;

/// Rectangle in viewport coordinates (UI points, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The area available for laying out all tiles.
///
/// Construction rejects non-positive (or NaN) dimensions, so `layout`
/// itself never has to deal with degenerate input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, CastError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(CastError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// One tile's assigned region, in the same order the tiles were given.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub uid: u32,
    pub rect: Rect,
}

/// Number of rows/columns of the square grid holding `tile_count` tiles.
pub fn grid_side(tile_count: usize) -> usize {
    if tile_count == 0 {
        return 0;
    }
    (tile_count as f64).sqrt().ceil() as usize
}

/// Lay out tiles on an n×n grid, n = ceil(sqrt(count)).
///
/// Tiles are placed in insertion order, row-major: tile `idx` lands on
/// row `idx / n`, column `idx % n`, each cell being an equal share of
/// the viewport. With a non-square count the trailing cells stay empty
/// (3 tiles on a 2×2 grid leave one quadrant blank); nothing is packed
/// or redistributed.
///
/// Pure and stateless; callers recompute whenever the tile set changes.
pub fn layout(tiles: &[TileInfo], viewport: Viewport) -> Vec<TilePlacement> {
    if tiles.is_empty() {
        return Vec::new();
    }

    let side = grid_side(tiles.len());
    let cell_width = viewport.width / side as f32;
    let cell_height = viewport.height / side as f32;

    tiles
        .iter()
        .enumerate()
        .map(|(idx, tile)| {
            let row = idx / side;
            let col = idx % side;
            TilePlacement {
                uid: tile.uid,
                rect: Rect {
                    x: col as f32 * cell_width,
                    y: row as f32 * cell_height,
                    width: cell_width,
                    height: cell_height,
                },
            }
        })
        .collect()
}
