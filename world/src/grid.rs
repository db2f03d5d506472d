//! Axis-aligned tile grids owned by the host.

use std::collections::BTreeSet;

use glam::Vec2;
use gridplace_core::{EntityCoordinates, EntityId, GridId, MapGrid, TileRef};

/// Tile grid anchored to its own entity at a fixed world-space origin.
#[derive(Clone, Debug)]
pub struct Grid {
    id: GridId,
    entity: EntityId,
    origin: Vec2,
    tile_size: u16,
    columns: u32,
    rows: u32,
    tiles: BTreeSet<(i32, i32)>,
}

impl Grid {
    pub(crate) fn new(
        id: GridId,
        entity: EntityId,
        origin: Vec2,
        tile_size: u16,
        columns: u32,
        rows: u32,
    ) -> Self {
        Self {
            id,
            entity,
            origin,
            tile_size: tile_size.max(1),
            columns,
            rows,
            tiles: BTreeSet::new(),
        }
    }

    /// Entity that anchors coordinates expressed in this grid's frame.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// World-space position of the grid's local origin.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Extent of the grid in its local frame.
    #[must_use]
    pub fn extent(&self) -> Vec2 {
        let size = f32::from(self.tile_size);
        Vec2::new(self.columns as f32 * size, self.rows as f32 * size)
    }

    /// Reports whether a world-space point lies on the grid.
    #[must_use]
    pub fn contains_world(&self, point: Vec2) -> bool {
        let local = point - self.origin;
        let extent = self.extent();
        local.x >= 0.0 && local.y >= 0.0 && local.x < extent.x && local.y < extent.y
    }

    /// Reports whether the tile lies within the grid bounds.
    #[must_use]
    pub fn contains_tile(&self, tile: &TileRef) -> bool {
        tile.grid() == self.id
            && u32::try_from(tile.x()).map_or(false, |x| x < self.columns)
            && u32::try_from(tile.y()).map_or(false, |y| y < self.rows)
    }

    /// Reports whether a tile has been laid at `tile`.
    #[must_use]
    pub fn has_tile(&self, tile: &TileRef) -> bool {
        tile.grid() == self.id && self.tiles.contains(&(tile.x(), tile.y()))
    }

    /// Iterates the tiles laid on this grid in row-major order.
    pub fn placed_tiles(&self) -> impl Iterator<Item = TileRef> + '_ {
        self.tiles
            .iter()
            .map(move |&(x, y)| TileRef::new(self.id, x, y))
    }

    /// Records a tile; returns `false` when it was already present.
    pub(crate) fn lay_tile(&mut self, tile: &TileRef) -> bool {
        self.tiles.insert((tile.x(), tile.y()))
    }

    /// Converts coordinates into this grid's local frame.
    ///
    /// Coordinates anchored to anything but the grid entity are treated as
    /// world-space positions.
    fn local_position(&self, coordinates: &EntityCoordinates) -> Vec2 {
        if coordinates.entity() == self.entity {
            coordinates.position()
        } else {
            coordinates.position() - self.origin
        }
    }
}

impl MapGrid for Grid {
    fn id(&self) -> GridId {
        self.id
    }

    fn tile_size(&self) -> u16 {
        self.tile_size
    }

    fn tile_ref(&self, coordinates: &EntityCoordinates) -> TileRef {
        let local = self.local_position(coordinates) / f32::from(self.tile_size);
        TileRef::new(self.id, local.x.floor() as i32, local.y.floor() as i32)
    }
}
