/// A rendering surface for one participant's video stream.
///
/// Tiles exist only while video is actually rendering: the local tile
/// from join until leave, remote tiles from the first decoded frame
/// until the stream stops or the user leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInfo {
    pub uid: u32,
    pub is_local: bool,
}

/// Insertion-ordered set of live tiles, keyed by participant uid.
///
/// Updated by the channel event loop. Insertion order defines the
/// display order fed to the grid layout.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: Vec<TileInfo>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    /// Add a tile, preserving insertion order. Returns false if a tile
    /// for this uid already exists.
    pub fn add_tile(&mut self, tile: TileInfo) -> bool {
        if self.contains(tile.uid) {
            return false;
        }
        self.tiles.push(tile);
        true
    }

    /// Remove the tile for `uid`, if any. Returns whether one was removed.
    pub fn remove_tile(&mut self, uid: u32) -> bool {
        let before = self.tiles.len();
        self.tiles.retain(|t| t.uid != uid);
        self.tiles.len() != before
    }

    pub fn tiles(&self) -> &[TileInfo] {
        &self.tiles
    }

    pub fn tile(&self, uid: u32) -> Option<&TileInfo> {
        self.tiles.iter().find(|t| t.uid == uid)
    }

    pub fn contains(&self, uid: u32) -> bool {
        self.tiles.iter().any(|t| t.uid == uid)
    }

    pub fn local_uid(&self) -> Option<u32> {
        self.tiles.iter().find(|t| t.is_local).map(|t| t.uid)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}
