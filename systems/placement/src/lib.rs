#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement system that aligns the cursor, validates candidate positions and
//! emits placement commands.
//!
//! [`PlacementMode`] holds the per-variant alignment and validation rules.
//! [`Placer`] drives a mode once per input update: it aligns the cursor,
//! expands the active gesture into candidate positions, validates each one
//! and, when the player confirms, turns the placeable ones into
//! [`Command`] values for the host.

use gridplace_core::{
    Command, EntityCoordinates, PlacementContext, PlacementError, PlacementGesture,
    PlacementModeKind, PlacementServices, ScreenCoordinates,
};
use tracing::debug;

mod gesture;
mod mode;

pub use mode::PlacementMode;

/// Candidate placement produced for the current input update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Anchored position the object would occupy.
    pub coordinates: EntityCoordinates,
    /// Indicates whether the position passed validation.
    pub placeable: bool,
}

impl PlacementPreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(coordinates: EntityCoordinates, placeable: bool) -> Self {
        Self {
            coordinates,
            placeable,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PlacerInput {
    /// Indicates whether the player started dragging on this frame.
    pub begin_drag: bool,
    /// Indicates whether the player confirmed the placement on this frame.
    pub confirm: bool,
    /// Indicates whether the player abandoned the current drag on this frame.
    pub cancel: bool,
}

/// Drives a placement mode through align, validate and commit.
#[derive(Clone, Debug, PartialEq)]
pub struct Placer {
    mode: PlacementMode,
    gesture: PlacementGesture,
    drag_start: Option<EntityCoordinates>,
}

impl Placer {
    /// Creates a placer for the provided mode and gesture.
    ///
    /// The mode is replaced by the permission's mode on the first update that
    /// carries a different one.
    #[must_use]
    pub const fn new(kind: PlacementModeKind, gesture: PlacementGesture) -> Self {
        Self {
            mode: PlacementMode::new(kind),
            gesture,
            drag_start: None,
        }
    }

    /// Mode used to align and validate placements.
    #[must_use]
    pub const fn mode(&self) -> &PlacementMode {
        &self.mode
    }

    /// Gesture expanded while dragging.
    #[must_use]
    pub const fn gesture(&self) -> PlacementGesture {
        self.gesture
    }

    /// Cursor position captured when the current drag began.
    #[must_use]
    pub const fn drag_start(&self) -> Option<EntityCoordinates> {
        self.drag_start
    }

    /// Switches the gesture, abandoning any drag in progress.
    pub fn set_gesture(&mut self, gesture: PlacementGesture) {
        self.gesture = gesture;
        self.drag_start = None;
    }

    /// Processes one input update and returns the candidate placements.
    ///
    /// The mode follows the active permission; switching it abandons any drag.
    /// Placeable candidates are appended to `out` as commands when
    /// `input.confirm` is set. A confirm or cancel always ends the drag, even
    /// when the update itself fails.
    pub fn update(
        &mut self,
        pointer: ScreenCoordinates,
        input: PlacerInput,
        context: &PlacementContext,
        services: PlacementServices<'_>,
        out: &mut Vec<Command>,
    ) -> Result<Vec<PlacementPreview>, PlacementError> {
        if input.cancel {
            self.drag_start = None;
        }
        self.follow_permission(context);

        let previews = self.preview(pointer, input, context, services);
        if input.confirm {
            self.drag_start = None;
            if let Ok(previews) = &previews {
                commit(previews, context, services, out);
            }
        }
        previews
    }

    fn follow_permission(&mut self, context: &PlacementContext) {
        let Some(permission) = context.permission else {
            return;
        };
        if permission.mode != self.mode.kind() {
            debug!(from = %self.mode.kind(), to = %permission.mode, "placement mode switched");
            self.mode = PlacementMode::new(permission.mode);
            self.drag_start = None;
        }
    }

    fn preview(
        &mut self,
        pointer: ScreenCoordinates,
        input: PlacerInput,
        context: &PlacementContext,
        services: PlacementServices<'_>,
    ) -> Result<Vec<PlacementPreview>, PlacementError> {
        self.mode.align(pointer, context, services)?;
        let cursor = self.mode.cursor().ok_or(PlacementError::NoCursor)?;

        if input.begin_drag && self.gesture != PlacementGesture::Single {
            if !self.mode.supports(self.gesture) {
                return Err(PlacementError::UnsupportedGesture {
                    mode: self.mode.kind(),
                    gesture: self.gesture,
                });
            }
            self.drag_start = Some(cursor);
        }

        let positions = match self.drag_start {
            Some(start) => self.mode.gesture_coordinates(self.gesture, start)?,
            None => vec![cursor],
        };
        Ok(positions
            .into_iter()
            .map(|coordinates| {
                let placeable = self.mode.is_valid_position(&coordinates, context, services);
                PlacementPreview::new(coordinates, placeable)
            })
            .collect())
    }
}

fn commit(
    previews: &[PlacementPreview],
    context: &PlacementContext,
    services: PlacementServices<'_>,
    out: &mut Vec<Command>,
) {
    let is_tile = context
        .permission
        .map_or(false, |permission| permission.is_tile);

    for preview in previews.iter().filter(|preview| preview.placeable) {
        let coordinates = preview.coordinates;
        if !is_tile {
            out.push(Command::SpawnEntity { coordinates });
            continue;
        }

        let tile = services
            .coordinates
            .grid_id(&coordinates)
            .and_then(|grid| services.map.grid(grid))
            .map(|grid| grid.tile_ref(&coordinates));
        match tile {
            Some(tile) => out.push(Command::PlaceTile { tile }),
            None => debug!(%coordinates, "skipping tile placement off-grid"),
        }
    }
}
