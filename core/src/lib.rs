#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridplace placement engine.
//!
//! This crate defines the values that flow between the placement modes, the
//! host that owns grids and entities, and the adapters that feed pointer
//! input. Placement modes never reach into global state: the host's narrow
//! service traits (see [`services`]) and the placement manager's
//! [`PlacementContext`] are handed to them on every call. Once a placement
//! is confirmed the driver emits [`Command`] values, the host applies them,
//! and reports the outcome as [`Event`] values.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod services;

pub use services::{
    CollisionService, CoordinateService, MapGrid, MapService, PlacementServices,
};

/// Commands that express all permissible placement mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests that the referenced tile cell be laid down.
    PlaceTile {
        /// Tile cell that should be written into its grid.
        tile: TileRef,
    },
    /// Requests that a non-tile object be spawned at the provided coordinates.
    SpawnEntity {
        /// Anchored position the spawned object should occupy.
        coordinates: EntityCoordinates,
    },
}

/// Events broadcast by the host after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a tile was written into its grid.
    TilePlaced {
        /// Tile cell that was placed.
        tile: TileRef,
    },
    /// Confirms that an object was spawned.
    EntitySpawned {
        /// Identifier allocated to the new entity.
        entity: EntityId,
        /// Anchored position the entity occupies.
        coordinates: EntityCoordinates,
    },
    /// Reports that a placement command was rejected by the host.
    PlacementRejected {
        /// Command that could not be applied.
        command: Command,
        /// Specific reason the command failed.
        reason: PlacementRejection,
    },
}

/// Reasons the host may refuse to apply a placement command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementRejection {
    /// The command referenced a grid the host does not know about.
    UnknownGrid,
    /// The tile lies outside the bounds of its grid.
    OutOfBounds,
    /// The coordinates are anchored to an entity the host cannot resolve.
    UnknownAnchor,
}

/// Unique identifier assigned to an entity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Unique identifier assigned to a grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridId(u32);

impl GridId {
    /// Creates a new grid identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid#{}", self.0)
    }
}

/// Pointer location measured in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenCoordinates {
    position: Vec2,
}

impl ScreenCoordinates {
    /// Creates screen coordinates from pixel components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }

    /// Pixel position of the pointer.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }
}

/// Position expressed relative to an anchoring entity.
///
/// Grids are entities, so a cursor hovering a grid is usually anchored to the
/// grid entity and expressed in that grid's local frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityCoordinates {
    entity: EntityId,
    position: Vec2,
}

impl EntityCoordinates {
    /// Creates coordinates anchored to `entity`.
    #[must_use]
    pub const fn new(entity: EntityId, position: Vec2) -> Self {
        Self { entity, position }
    }

    /// Entity that anchors the coordinates.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Position within the anchoring entity's frame.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns coordinates on the same anchor at a different position.
    #[must_use]
    pub const fn with_position(self, position: Vec2) -> Self {
        Self {
            entity: self.entity,
            position,
        }
    }

    /// Returns coordinates on the same anchor shifted by `delta`.
    #[must_use]
    pub fn offset(self, delta: Vec2) -> Self {
        self.with_position(self.position + delta)
    }
}

impl fmt::Display for EntityCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.entity, self.position.x, self.position.y
        )
    }
}

/// Handle identifying a single tile cell within a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    grid: GridId,
    x: i32,
    y: i32,
}

impl TileRef {
    /// Creates a reference to the tile at integer indices `(x, y)` of `grid`.
    #[must_use]
    pub const fn new(grid: GridId, x: i32, y: i32) -> Self {
        Self { grid, x, y }
    }

    /// Grid that owns the tile.
    #[must_use]
    pub const fn grid(&self) -> GridId {
        self.grid
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Lower corner of the tile expressed in its grid's local frame.
    #[must_use]
    pub fn origin(&self, tile_size: u16) -> Vec2 {
        let size = f32::from(tile_size);
        Vec2::new(self.x as f32 * size, self.y as f32 * size)
    }

    /// Center of the tile expressed in its grid's local frame.
    #[must_use]
    pub fn center(&self, tile_size: u16) -> Vec2 {
        self.origin(tile_size) + Vec2::splat(f32::from(tile_size) / 2.0)
    }
}

/// Closed set of placement strategies a permission may select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementModeKind {
    /// Snaps to the center of the hovered tile; non-tile objects must not collide.
    #[default]
    TileAligned,
    /// Follows the pointer without snapping; only the range check applies.
    Free,
}

impl fmt::Display for PlacementModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TileAligned => "tile-aligned",
            Self::Free => "free",
        })
    }
}

/// Shape of the placement gesture performed while dragging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementGesture {
    /// One placement at the cursor.
    #[default]
    Single,
    /// Evenly spaced placements along the dominant drag axis.
    Line,
    /// Evenly spaced placements filling the dragged rectangle.
    Grid,
}

impl fmt::Display for PlacementGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Line => "line",
            Self::Grid => "grid",
        })
    }
}

/// Describes what the placement manager currently allows the player to place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPermission {
    /// Whether the object being placed is itself a tile.
    pub is_tile: bool,
    /// Allowed placement radius in world units. Zero or less is unlimited.
    pub range: f32,
    /// Strategy used to align and validate the placement.
    pub mode: PlacementModeKind,
}

impl PlacementPermission {
    /// Permission for laying tiles with the provided range.
    #[must_use]
    pub const fn tile(range: f32) -> Self {
        Self {
            is_tile: true,
            range,
            mode: PlacementModeKind::TileAligned,
        }
    }

    /// Permission for spawning non-tile objects with the provided mode and range.
    #[must_use]
    pub const fn entity(mode: PlacementModeKind, range: f32) -> Self {
        Self {
            is_tile: false,
            range,
            mode,
        }
    }

    /// Reports whether placements must stay within a radius of the placer.
    #[must_use]
    pub fn range_required(&self) -> bool {
        self.range > 0.0
    }
}

/// Placement-manager state handed to placement modes on every call.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PlacementContext {
    /// Permission currently granted, if any.
    pub permission: Option<PlacementPermission>,
    /// Offset applied to non-tile placements after snapping.
    pub placement_offset: Vec2,
    /// Coordinates of the placing entity, used as the range-check origin.
    pub placer: Option<EntityCoordinates>,
}

/// Failures raised while resolving the grid under the cursor.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridResolutionError {
    /// The pointer does not hover any grid.
    #[error("no grid found under the cursor at {0}")]
    NoGridAtPosition(EntityCoordinates),
    /// The coordinate service named a grid the map service does not know about.
    #[error("{0} is not registered with the map service")]
    UnknownGrid(GridId),
}

/// Failures surfaced by placement modes and the placement driver.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PlacementError {
    /// The cursor could not be resolved to a grid.
    #[error(transparent)]
    GridResolution(#[from] GridResolutionError),
    /// The placement manager has no active permission.
    #[error("no placement permission is active")]
    NoActivePermission,
    /// The active mode cannot expand the requested gesture.
    #[error("{mode} placement does not support {gesture} gestures")]
    UnsupportedGesture {
        /// Mode that rejected the gesture.
        mode: PlacementModeKind,
        /// Gesture that was requested.
        gesture: PlacementGesture,
    },
    /// A gesture was requested before the cursor was aligned.
    #[error("the cursor has not been aligned yet")]
    NoCursor,
    /// The gesture start and the cursor are anchored to different entities.
    #[error("gesture start {start} and cursor {cursor} use different anchors")]
    FrameMismatch {
        /// Coordinates where the gesture started.
        start: EntityCoordinates,
        /// Current cursor coordinates.
        cursor: EntityCoordinates,
    },
}
