#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! In-memory host that owns grids, spawned entities and collision data.
//!
//! The host implements the placement service contracts with the simplest
//! rules that make them meaningful: grids are axis aligned, the viewport is a
//! flat translate-and-scale, and collision is a point-in-box test against
//! static obstacles and previously spawned entities.

use std::collections::BTreeMap;

use glam::Vec2;
use gridplace_core::{
    CollisionService, Command, CoordinateService, EntityCoordinates, EntityId, Event, GridId,
    MapGrid, MapService, PlacementRejection, ScreenCoordinates,
};
use tracing::{debug, warn};

mod grid;

pub use grid::Grid;

/// Entity anchoring world-space coordinates that are not over any grid.
pub const MAP_ENTITY: EntityId = EntityId::new(0);

const DEFAULT_SPAWN_HALF_EXTENT: f32 = 8.0;

/// Flat mapping from screen pixels to world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    world_origin: Vec2,
    pixels_per_unit: f32,
}

impl Viewport {
    /// Creates a viewport whose top-left pixel shows `world_origin`.
    ///
    /// Non-positive scales fall back to one pixel per world unit.
    #[must_use]
    pub fn new(world_origin: Vec2, pixels_per_unit: f32) -> Self {
        let pixels_per_unit = if pixels_per_unit > 0.0 {
            pixels_per_unit
        } else {
            1.0
        };
        Self {
            world_origin,
            pixels_per_unit,
        }
    }

    /// World-space position shown at `screen`.
    #[must_use]
    pub fn screen_to_world(&self, screen: ScreenCoordinates) -> Vec2 {
        self.world_origin + screen.position() / self.pixels_per_unit
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

/// World-space box that blocks non-tile placements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    min: Vec2,
    max: Vec2,
}

impl Footprint {
    /// Creates a footprint spanning the two corners in any order.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a square footprint centered on `center`.
    #[must_use]
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        let half = Vec2::splat(half_extent.abs());
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Lower corner of the box.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Upper corner of the box.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Reports whether the point lies inside the box, excluding its upper edges.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.x < self.max.x
            && point.y < self.max.y
    }
}

/// Object spawned through a placement command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnedEntity {
    /// Identifier allocated by the host.
    pub id: EntityId,
    /// Anchored coordinates requested at spawn time.
    pub coordinates: EntityCoordinates,
    /// World-space box the entity occupies.
    pub footprint: Footprint,
}

/// Represents the authoritative host state.
#[derive(Debug)]
pub struct World {
    viewport: Viewport,
    grids: BTreeMap<GridId, Grid>,
    obstacles: Vec<Footprint>,
    entities: BTreeMap<EntityId, SpawnedEntity>,
    spawn_half_extent: f32,
    next_grid_id: u32,
    next_entity_id: u32,
}

impl World {
    /// Creates an empty host with no grids and an identity viewport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            viewport: Viewport::default(),
            grids: BTreeMap::new(),
            obstacles: Vec::new(),
            entities: BTreeMap::new(),
            spawn_half_extent: DEFAULT_SPAWN_HALF_EXTENT,
            next_grid_id: 1,
            next_entity_id: MAP_ENTITY.get() + 1,
        }
    }

    /// Replaces the viewport used to resolve pointer positions.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Sets the half extent of the square footprint given to spawned entities.
    pub fn set_spawn_half_extent(&mut self, half_extent: f32) {
        self.spawn_half_extent = half_extent.abs();
    }

    /// Registers a new grid and returns its identifier.
    pub fn add_grid(&mut self, origin: Vec2, tile_size: u16, columns: u32, rows: u32) -> GridId {
        let id = GridId::new(self.next_grid_id);
        self.next_grid_id = self.next_grid_id.saturating_add(1);
        let entity = self.allocate_entity();
        let grid = Grid::new(id, entity, origin, tile_size, columns, rows);
        debug!(grid = %id, %entity, ?origin, tile_size, columns, rows, "grid registered");
        let _ = self.grids.insert(id, grid);
        id
    }

    /// Adds a static obstacle that blocks non-tile placements.
    pub fn add_obstacle(&mut self, footprint: Footprint) {
        self.obstacles.push(footprint);
    }

    fn allocate_entity(&mut self) -> EntityId {
        let entity = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);
        entity
    }

    fn grid_by_entity(&self, entity: EntityId) -> Option<&Grid> {
        self.grids.values().find(|grid| grid.entity() == entity)
    }

    fn anchor_origin(&self, entity: EntityId) -> Option<Vec2> {
        if entity == MAP_ENTITY {
            return Some(Vec2::ZERO);
        }
        if let Some(grid) = self.grid_by_entity(entity) {
            return Some(grid.origin());
        }
        self.entities
            .get(&entity)
            .and_then(|spawned| self.to_world(&spawned.coordinates))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl MapService for World {
    fn grid(&self, grid: GridId) -> Option<&dyn MapGrid> {
        self.grids.get(&grid).map(|grid| grid as &dyn MapGrid)
    }
}

impl CoordinateService for World {
    fn screen_to_coordinates(&self, screen: ScreenCoordinates) -> EntityCoordinates {
        let point = self.viewport.screen_to_world(screen);
        self.grids
            .values()
            .find(|grid| grid.contains_world(point))
            .map_or_else(
                || EntityCoordinates::new(MAP_ENTITY, point),
                |grid| EntityCoordinates::new(grid.entity(), point - grid.origin()),
            )
    }

    fn grid_id(&self, coordinates: &EntityCoordinates) -> Option<GridId> {
        self.grid_by_entity(coordinates.entity())
            .map(|grid| grid.id())
    }

    fn to_world(&self, coordinates: &EntityCoordinates) -> Option<Vec2> {
        self.anchor_origin(coordinates.entity())
            .map(|origin| origin + coordinates.position())
    }
}

impl CollisionService for World {
    fn is_colliding(&self, coordinates: &EntityCoordinates) -> bool {
        let Some(point) = self.to_world(coordinates) else {
            return true;
        };
        self.obstacles
            .iter()
            .chain(self.entities.values().map(|spawned| &spawned.footprint))
            .any(|footprint| footprint.contains(point))
    }
}

/// Applies the provided command to the world, emitting resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTile { tile } => {
            let Some(grid) = world.grids.get_mut(&tile.grid()) else {
                warn!(grid = %tile.grid(), "tile placement targets an unknown grid");
                out_events.push(Event::PlacementRejected {
                    command,
                    reason: PlacementRejection::UnknownGrid,
                });
                return;
            };
            if !grid.contains_tile(&tile) {
                warn!(?tile, "tile placement lies outside its grid");
                out_events.push(Event::PlacementRejected {
                    command,
                    reason: PlacementRejection::OutOfBounds,
                });
                return;
            }
            if grid.lay_tile(&tile) {
                debug!(?tile, "tile placed");
            }
            out_events.push(Event::TilePlaced { tile });
        }
        Command::SpawnEntity { coordinates } => {
            let Some(center) = world.to_world(&coordinates) else {
                warn!(%coordinates, "spawn anchored to an unknown entity");
                out_events.push(Event::PlacementRejected {
                    command,
                    reason: PlacementRejection::UnknownAnchor,
                });
                return;
            };
            let entity = world.allocate_entity();
            let footprint = Footprint::centered(center, world.spawn_half_extent);
            let _ = world.entities.insert(
                entity,
                SpawnedEntity {
                    id: entity,
                    coordinates,
                    footprint,
                },
            );
            debug!(%entity, %coordinates, "entity spawned");
            out_events.push(Event::EntitySpawned {
                entity,
                coordinates,
            });
        }
    }
}

/// Query functions exposing read-only access to the world state.
pub mod query {
    use super::{Footprint, Grid, SpawnedEntity, Viewport, World};
    use gridplace_core::{EntityId, GridId};

    /// Viewport used to resolve pointer positions.
    #[must_use]
    pub fn viewport(world: &World) -> Viewport {
        world.viewport
    }

    /// Grid registered under `grid`, if any.
    #[must_use]
    pub fn grid(world: &World, grid: GridId) -> Option<&Grid> {
        world.grids.get(&grid)
    }

    /// Iterates every registered grid in identifier order.
    pub fn grids(world: &World) -> impl Iterator<Item = &Grid> {
        world.grids.values()
    }

    /// Static obstacles registered with the host.
    #[must_use]
    pub fn obstacles(world: &World) -> &[Footprint] {
        &world.obstacles
    }

    /// Entity spawned under `entity`, if any.
    #[must_use]
    pub fn spawned_entity(world: &World, entity: EntityId) -> Option<&SpawnedEntity> {
        world.entities.get(&entity)
    }

    /// Iterates every spawned entity in identifier order.
    pub fn spawned_entities(world: &World) -> impl Iterator<Item = &SpawnedEntity> {
        world.entities.values()
    }
}
