//! TOML scenarios describing a host layout and a sequence of pointer inputs.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use gridplace_core::{
    EntityCoordinates, PlacementContext, PlacementGesture, PlacementModeKind,
    PlacementPermission, ScreenCoordinates,
};
use gridplace_system_placement::PlacerInput;
use gridplace_world::{Footprint, Viewport, World, MAP_ENTITY};
use serde::Deserialize;

const SUPPORTED_SCENARIO_VERSION: u32 = 1;

/// Host layout, placement settings and scripted input loaded from disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    version: u32,
    #[serde(default)]
    viewport: ViewportConfig,
    #[serde(default)]
    spawn_half_extent: Option<f32>,
    #[serde(default)]
    grids: Vec<GridConfig>,
    #[serde(default)]
    obstacles: Vec<ObstacleConfig>,
    pub(crate) placement: PlacementConfig,
    #[serde(default)]
    pub(crate) steps: Vec<StepConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewportConfig {
    world_origin: Vec2,
    pixels_per_unit: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            world_origin: Vec2::ZERO,
            pixels_per_unit: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridConfig {
    origin: Vec2,
    tile_size: u16,
    columns: u32,
    rows: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObstacleConfig {
    min: Vec2,
    max: Vec2,
}

/// Permission and placement-manager settings applied to every step.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlacementConfig {
    #[serde(default)]
    pub(crate) mode: PlacementModeKind,
    #[serde(default)]
    pub(crate) gesture: PlacementGesture,
    #[serde(default)]
    is_tile: bool,
    #[serde(default)]
    range: f32,
    #[serde(default)]
    offset: Vec2,
    #[serde(default)]
    placer: Option<Vec2>,
}

/// Single scripted input update.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StepConfig {
    pointer: Vec2,
    #[serde(default)]
    begin_drag: bool,
    #[serde(default)]
    confirm: bool,
    #[serde(default)]
    cancel: bool,
}

impl Scenario {
    /// Loads and validates a scenario from `path`.
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    /// Parses and validates scenario TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        if scenario.version != SUPPORTED_SCENARIO_VERSION {
            bail!(
                "unsupported scenario version {}; expected {}",
                scenario.version,
                SUPPORTED_SCENARIO_VERSION
            );
        }
        for (index, grid) in scenario.grids.iter().enumerate() {
            if grid.tile_size == 0 {
                bail!("grid {index} declares a zero tile size");
            }
        }
        Ok(scenario)
    }

    /// Builds the host described by the scenario.
    pub(crate) fn build_world(&self) -> World {
        let mut world = World::new();
        world.set_viewport(Viewport::new(
            self.viewport.world_origin,
            self.viewport.pixels_per_unit,
        ));
        if let Some(half_extent) = self.spawn_half_extent {
            world.set_spawn_half_extent(half_extent);
        }
        for grid in &self.grids {
            let _ = world.add_grid(grid.origin, grid.tile_size, grid.columns, grid.rows);
        }
        for obstacle in &self.obstacles {
            world.add_obstacle(Footprint::from_corners(obstacle.min, obstacle.max));
        }
        world
    }

    /// Placement-manager context described by the scenario.
    pub(crate) fn context(&self) -> PlacementContext {
        let placement = &self.placement;
        PlacementContext {
            permission: Some(PlacementPermission {
                is_tile: placement.is_tile,
                range: placement.range,
                mode: placement.mode,
            }),
            placement_offset: placement.offset,
            placer: placement
                .placer
                .map(|position| EntityCoordinates::new(MAP_ENTITY, position)),
        }
    }
}

impl StepConfig {
    /// Step that only hovers the pointer at `pointer`.
    pub(crate) const fn hover(pointer: Vec2) -> Self {
        Self {
            pointer,
            begin_drag: false,
            confirm: false,
            cancel: false,
        }
    }

    /// Pointer position of the step.
    pub(crate) const fn pointer(&self) -> ScreenCoordinates {
        ScreenCoordinates::new(self.pointer.x, self.pointer.y)
    }

    /// Input flags of the step.
    pub(crate) const fn input(&self) -> PlacerInput {
        PlacerInput {
            begin_drag: self.begin_drag,
            confirm: self.confirm,
            cancel: self.cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplace_core::{CollisionService, CoordinateService};

    const SAMPLE: &str = r#"
version = 1
spawn_half_extent = 4.0

[viewport]
world_origin = [0.0, 0.0]
pixels_per_unit = 2.0

[[grids]]
origin = [0.0, 0.0]
tile_size = 32
columns = 8
rows = 8

[[obstacles]]
min = [64.0, 64.0]
max = [32.0, 32.0]

[placement]
mode = "tile_aligned"
gesture = "line"
offset = [4.0, -4.0]
range = 128.0
placer = [16.0, 16.0]

[[steps]]
pointer = [140.0, 200.0]
confirm = true
"#;

    #[test]
    fn sample_scenario_builds_world_and_context() {
        let scenario = Scenario::parse(SAMPLE).expect("sample parses");
        let world = scenario.build_world();
        let context = scenario.context();

        let coordinates = world.screen_to_coordinates(ScreenCoordinates::new(140.0, 200.0));
        assert!(world.grid_id(&coordinates).is_some());
        assert_eq!(coordinates.position(), Vec2::new(70.0, 100.0));
        assert!(world.is_colliding(&EntityCoordinates::new(MAP_ENTITY, Vec2::new(40.0, 40.0))));

        assert_eq!(scenario.placement.gesture, PlacementGesture::Line);
        assert_eq!(context.placement_offset, Vec2::new(4.0, -4.0));
        assert_eq!(
            context.permission,
            Some(PlacementPermission {
                is_tile: false,
                range: 128.0,
                mode: PlacementModeKind::TileAligned,
            })
        );
        assert_eq!(
            context.placer,
            Some(EntityCoordinates::new(MAP_ENTITY, Vec2::new(16.0, 16.0)))
        );
        assert_eq!(scenario.steps.len(), 1);
        assert!(scenario.steps[0].input().confirm);
    }

    #[test]
    fn placement_defaults_select_single_tile_aligned() {
        let scenario = Scenario::parse("version = 1\n[placement]\n").expect("minimal scenario");
        assert_eq!(scenario.placement.mode, PlacementModeKind::TileAligned);
        assert_eq!(scenario.placement.gesture, PlacementGesture::Single);
        assert!(scenario.steps.is_empty());
    }

    #[test]
    fn rejects_unsupported_version() {
        let error = Scenario::parse("version = 2\n[placement]\n").expect_err("version 2");
        assert!(error.to_string().contains("unsupported scenario version 2"));
    }

    #[test]
    fn rejects_zero_tile_size() {
        let contents = r#"
version = 1
[placement]
[[grids]]
origin = [0.0, 0.0]
tile_size = 0
columns = 1
rows = 1
"#;
        let error = Scenario::parse(contents).expect_err("zero tile size");
        assert!(error.to_string().contains("zero tile size"));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Scenario::parse("version = 1\n[placement]\nmode = \"orbit\"\n").is_err());
    }
}
