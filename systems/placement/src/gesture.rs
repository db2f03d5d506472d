//! Expansion of drag gestures into evenly spaced placement positions.

use glam::Vec2;
use gridplace_core::EntityCoordinates;

/// Upper bound on the steps taken along a single axis of one gesture.
pub(crate) const MAX_STEPS_PER_AXIS: u32 = 256;

/// Positions along the dominant axis of the drag, starting at `start`.
///
/// Ties between the axes step vertically.
pub(crate) fn line(start: EntityCoordinates, end: Vec2, distancing: f32) -> Vec<EntityCoordinates> {
    if !is_usable(distancing) {
        return vec![start];
    }

    let diff = end - start.position();
    let (steps, step) = if diff.x.abs() > diff.y.abs() {
        (steps(diff.x, distancing), Vec2::new(direction(diff.x) * distancing, 0.0))
    } else {
        (steps(diff.y, distancing), Vec2::new(0.0, direction(diff.y) * distancing))
    };

    (0..=steps)
        .map(|index| start.offset(step * index as f32))
        .collect()
}

/// Positions filling the rectangle spanned by `start` and `end`.
///
/// Columns are emitted outermost, each walked from the start row.
pub(crate) fn grid(start: EntityCoordinates, end: Vec2, distancing: f32) -> Vec<EntityCoordinates> {
    if !is_usable(distancing) {
        return vec![start];
    }

    let diff = end - start.position();
    let step_x = Vec2::new(direction(diff.x) * distancing, 0.0);
    let step_y = Vec2::new(0.0, direction(diff.y) * distancing);
    let columns = steps(diff.x, distancing);
    let rows = steps(diff.y, distancing);

    let mut positions = Vec::with_capacity(((columns + 1) * (rows + 1)) as usize);
    for column in 0..=columns {
        for row in 0..=rows {
            positions.push(start.offset(step_x * column as f32 + step_y * row as f32));
        }
    }
    positions
}

fn is_usable(distancing: f32) -> bool {
    distancing.is_finite() && distancing > 0.0
}

fn direction(delta: f32) -> f32 {
    if delta > 0.0 {
        1.0
    } else {
        -1.0
    }
}

fn steps(delta: f32, distancing: f32) -> u32 {
    let steps = (delta.abs() / distancing).floor();
    if steps.is_finite() {
        (steps as u32).min(MAX_STEPS_PER_AXIS)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplace_core::EntityId;

    fn at(x: f32, y: f32) -> EntityCoordinates {
        EntityCoordinates::new(EntityId::new(1), Vec2::new(x, y))
    }

    fn positions(coordinates: &[EntityCoordinates]) -> Vec<Vec2> {
        coordinates.iter().map(EntityCoordinates::position).collect()
    }

    #[test]
    fn line_follows_dominant_horizontal_axis() {
        let line = line(at(16.0, 16.0), Vec2::new(112.0, 40.0), 32.0);
        assert_eq!(
            positions(&line),
            vec![
                Vec2::new(16.0, 16.0),
                Vec2::new(48.0, 16.0),
                Vec2::new(80.0, 16.0),
                Vec2::new(112.0, 16.0),
            ]
        );
    }

    #[test]
    fn line_steps_backwards_and_prefers_vertical_on_ties() {
        let line = line(at(0.0, 0.0), Vec2::new(-20.0, -20.0), 10.0);
        assert_eq!(
            positions(&line),
            vec![Vec2::ZERO, Vec2::new(0.0, -10.0), Vec2::new(0.0, -20.0)]
        );
    }

    #[test]
    fn line_truncates_partial_steps() {
        let line = line(at(0.0, 0.0), Vec2::new(0.0, 31.9), 16.0);
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn grid_walks_columns_then_rows() {
        let grid = grid(at(0.0, 0.0), Vec2::new(20.0, -10.0), 10.0);
        assert_eq!(
            positions(&grid),
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, -10.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, -10.0),
                Vec2::new(20.0, 0.0),
                Vec2::new(20.0, -10.0),
            ]
        );
    }

    #[test]
    fn unusable_distancing_yields_only_start() {
        assert_eq!(line(at(1.0, 1.0), Vec2::new(50.0, 1.0), 0.0), vec![at(1.0, 1.0)]);
        assert_eq!(grid(at(1.0, 1.0), Vec2::new(50.0, 9.0), f32::NAN), vec![at(1.0, 1.0)]);
    }

    #[test]
    fn long_drags_are_capped_per_axis() {
        let line = line(at(0.0, 0.0), Vec2::new(1.0e6, 0.0), 1.0);
        assert_eq!(line.len(), MAX_STEPS_PER_AXIS as usize + 1);
    }

    #[test]
    fn gestures_keep_the_start_anchor() {
        let start = EntityCoordinates::new(EntityId::new(9), Vec2::ZERO);
        assert!(grid(start, Vec2::new(4.0, 4.0), 2.0)
            .iter()
            .all(|coordinates| coordinates.entity() == EntityId::new(9)));
    }
}
