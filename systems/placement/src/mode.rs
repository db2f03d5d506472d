//! Placement modes that align the cursor and validate candidate positions.

use gridplace_core::{
    EntityCoordinates, GridResolutionError, PlacementContext, PlacementError, PlacementGesture,
    PlacementModeKind, PlacementPermission, PlacementServices, ScreenCoordinates, TileRef,
};
use tracing::{debug, trace};

use crate::gesture;

const DEFAULT_GRID_DISTANCING: f32 = 1.0;

/// Stateful placement strategy selected by a [`PlacementModeKind`].
///
/// The mode caches the last aligned cursor and the tile beneath it between
/// calls; nothing else survives from one update to the next.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementMode {
    kind: PlacementModeKind,
    cursor: Option<EntityCoordinates>,
    current_tile: Option<TileRef>,
    grid_distancing: f32,
}

impl PlacementMode {
    /// Creates a mode of the provided kind with no aligned cursor.
    #[must_use]
    pub const fn new(kind: PlacementModeKind) -> Self {
        Self {
            kind,
            cursor: None,
            current_tile: None,
            grid_distancing: DEFAULT_GRID_DISTANCING,
        }
    }

    /// Strategy implemented by this mode.
    #[must_use]
    pub const fn kind(&self) -> PlacementModeKind {
        self.kind
    }

    /// Whether the mode can repeat placements along a dragged line.
    #[must_use]
    pub const fn has_line_mode(&self) -> bool {
        match self.kind {
            PlacementModeKind::TileAligned => true,
            PlacementModeKind::Free => false,
        }
    }

    /// Whether the mode can repeat placements across a dragged rectangle.
    #[must_use]
    pub const fn has_grid_mode(&self) -> bool {
        match self.kind {
            PlacementModeKind::TileAligned => true,
            PlacementModeKind::Free => false,
        }
    }

    /// Whether the mode can expand the provided gesture.
    #[must_use]
    pub const fn supports(&self, gesture: PlacementGesture) -> bool {
        match gesture {
            PlacementGesture::Single => true,
            PlacementGesture::Line => self.has_line_mode(),
            PlacementGesture::Grid => self.has_grid_mode(),
        }
    }

    /// Cursor position computed by the last successful [`Self::align`].
    #[must_use]
    pub const fn cursor(&self) -> Option<EntityCoordinates> {
        self.cursor
    }

    /// Tile beneath the cursor as of the last successful [`Self::align`].
    #[must_use]
    pub const fn current_tile(&self) -> Option<TileRef> {
        self.current_tile
    }

    /// Spacing between repeated placements in line and grid gestures.
    #[must_use]
    pub const fn grid_distancing(&self) -> f32 {
        self.grid_distancing
    }

    /// Resolves the pointer into the cursor position for the next placement.
    ///
    /// On error the previously aligned state is left untouched.
    pub fn align(
        &mut self,
        pointer: ScreenCoordinates,
        context: &PlacementContext,
        services: PlacementServices<'_>,
    ) -> Result<(), PlacementError> {
        let permission = context
            .permission
            .ok_or(PlacementError::NoActivePermission)?;
        let coordinates = services.coordinates.screen_to_coordinates(pointer);

        match self.kind {
            PlacementModeKind::TileAligned => {
                self.align_to_tile(coordinates, &permission, context, services)
            }
            PlacementModeKind::Free => {
                let cursor = if permission.is_tile {
                    coordinates
                } else {
                    coordinates.offset(context.placement_offset)
                };
                self.cursor = Some(cursor);
                self.current_tile = None;
                debug!(mode = %self.kind, %cursor, "cursor aligned");
                Ok(())
            }
        }
    }

    fn align_to_tile(
        &mut self,
        coordinates: EntityCoordinates,
        permission: &PlacementPermission,
        context: &PlacementContext,
        services: PlacementServices<'_>,
    ) -> Result<(), PlacementError> {
        let grid_id = services
            .coordinates
            .grid_id(&coordinates)
            .ok_or(GridResolutionError::NoGridAtPosition(coordinates))?;
        let grid = services
            .map
            .grid(grid_id)
            .ok_or(GridResolutionError::UnknownGrid(grid_id))?;

        let tile = grid.tile_ref(&coordinates);
        let tile_size = grid.tile_size();
        let mut snapped = tile.center(tile_size);
        if !permission.is_tile {
            snapped += context.placement_offset;
        }

        let cursor = coordinates.with_position(snapped);
        self.grid_distancing = f32::from(tile_size);
        self.current_tile = Some(tile);
        self.cursor = Some(cursor);
        debug!(mode = %self.kind, grid = %grid_id, ?tile, %cursor, "cursor aligned");
        Ok(())
    }

    /// Reports whether an object may be placed at `position`.
    ///
    /// Positions outside the permitted range are always rejected. Tile-aligned
    /// placements of non-tile objects are also rejected when they collide.
    #[must_use]
    pub fn is_valid_position(
        &self,
        position: &EntityCoordinates,
        context: &PlacementContext,
        services: PlacementServices<'_>,
    ) -> bool {
        let Some(permission) = context.permission else {
            trace!(%position, "rejected: no active permission");
            return false;
        };
        if !self.range_check(position, context, services) {
            trace!(%position, range = permission.range, "rejected: out of range");
            return false;
        }

        match self.kind {
            PlacementModeKind::TileAligned => {
                if !permission.is_tile && services.collision.is_colliding(position) {
                    trace!(%position, "rejected: colliding");
                    return false;
                }
                true
            }
            PlacementModeKind::Free => true,
        }
    }

    /// Reports whether `position` lies within the permitted range of the placer.
    ///
    /// Permissions without a positive range accept every position. Otherwise
    /// the placer and the position must both resolve to world space.
    #[must_use]
    pub fn range_check(
        &self,
        position: &EntityCoordinates,
        context: &PlacementContext,
        services: PlacementServices<'_>,
    ) -> bool {
        let Some(permission) = context.permission else {
            return false;
        };
        if !permission.range_required() {
            return true;
        }
        let Some(placer) = context.placer else {
            return false;
        };

        match (
            services.coordinates.to_world(&placer),
            services.coordinates.to_world(position),
        ) {
            (Some(origin), Some(target)) => origin.distance(target) <= permission.range,
            _ => false,
        }
    }

    /// Expands `gesture` from `start` to the aligned cursor.
    pub fn gesture_coordinates(
        &self,
        gesture: PlacementGesture,
        start: EntityCoordinates,
    ) -> Result<Vec<EntityCoordinates>, PlacementError> {
        if !self.supports(gesture) {
            return Err(PlacementError::UnsupportedGesture {
                mode: self.kind,
                gesture,
            });
        }
        let cursor = self.cursor.ok_or(PlacementError::NoCursor)?;
        if gesture == PlacementGesture::Single {
            return Ok(vec![cursor]);
        }
        if cursor.entity() != start.entity() {
            return Err(PlacementError::FrameMismatch { start, cursor });
        }

        let end = cursor.position();
        Ok(match gesture {
            PlacementGesture::Line => gesture::line(start, end, self.grid_distancing),
            _ => gesture::grid(start, end, self.grid_distancing),
        })
    }

    /// Positions of a line gesture from `start` to the aligned cursor.
    pub fn line_coordinates(
        &self,
        start: EntityCoordinates,
    ) -> Result<Vec<EntityCoordinates>, PlacementError> {
        self.gesture_coordinates(PlacementGesture::Line, start)
    }

    /// Positions of a grid gesture from `start` to the aligned cursor.
    pub fn grid_coordinates(
        &self,
        start: EntityCoordinates,
    ) -> Result<Vec<EntityCoordinates>, PlacementError> {
        self.gesture_coordinates(PlacementGesture::Grid, start)
    }
}
