//! Narrow service contracts placement modes consume from their host.
//!
//! Hosts own grids, entities and collision data. Placement modes only ever
//! see these traits, bundled into a [`PlacementServices`] value and passed
//! per call.

use glam::Vec2;

use crate::{EntityCoordinates, GridId, ScreenCoordinates, TileRef};

/// Read access to a single tile grid.
pub trait MapGrid {
    /// Identifier of the grid.
    fn id(&self) -> GridId;

    /// Side length of a square tile in world units.
    fn tile_size(&self) -> u16;

    /// Tile cell containing `coordinates`.
    fn tile_ref(&self, coordinates: &EntityCoordinates) -> TileRef;
}

/// Lookup of grids by identifier.
pub trait MapService {
    /// Returns the grid registered under `grid`, if any.
    fn grid(&self, grid: GridId) -> Option<&dyn MapGrid>;
}

/// Conversions between screen, anchored and world coordinates.
pub trait CoordinateService {
    /// Resolves a pointer position to anchored coordinates.
    ///
    /// Positions over a grid are anchored to the grid entity; anywhere else
    /// they are anchored to the map itself.
    fn screen_to_coordinates(&self, screen: ScreenCoordinates) -> EntityCoordinates;

    /// Grid whose entity anchors `coordinates`, if any.
    fn grid_id(&self, coordinates: &EntityCoordinates) -> Option<GridId>;

    /// World-space position of `coordinates`, if its anchor is known.
    fn to_world(&self, coordinates: &EntityCoordinates) -> Option<Vec2>;
}

/// Point collision queries.
pub trait CollisionService {
    /// Reports whether placing an object at `coordinates` would collide.
    fn is_colliding(&self, coordinates: &EntityCoordinates) -> bool;
}

/// Bundle of host services injected into placement modes.
#[derive(Clone, Copy)]
pub struct PlacementServices<'a> {
    /// Grid lookups.
    pub map: &'a dyn MapService,
    /// Coordinate conversions.
    pub coordinates: &'a dyn CoordinateService,
    /// Collision queries.
    pub collision: &'a dyn CollisionService,
}

impl<'a> PlacementServices<'a> {
    /// Borrows every service from a single host implementing all of them.
    #[must_use]
    pub fn from_host<H>(host: &'a H) -> Self
    where
        H: MapService + CoordinateService + CollisionService,
    {
        Self {
            map: host,
            coordinates: host,
            collision: host,
        }
    }
}
