#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays placement scenarios against the host.

mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use gridplace_core::{Command, Event, PlacementServices};
use gridplace_system_placement::Placer;
use gridplace_world::{self as world, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use self::scenario::{Scenario, StepConfig};

/// Replays pointer input through a placement mode and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "gridplace", version, about)]
struct Args {
    /// Path to the scenario TOML file.
    #[arg(long)]
    scenario: PathBuf,
    /// Extra hover steps appended after the scripted ones, as `X,Y` pixels.
    #[arg(long = "pointer", value_parser = parse_pointer)]
    pointers: Vec<Vec2>,
    /// Raises the default log level to debug.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Gridplace command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let scenario = Scenario::from_path(&args.scenario)?;
    let mut world = scenario.build_world();
    let context = scenario.context();
    let mut placer = Placer::new(scenario.placement.mode, scenario.placement.gesture);

    let steps = scenario
        .steps
        .iter()
        .copied()
        .chain(args.pointers.iter().copied().map(StepConfig::hover));

    for (index, step) in steps.enumerate() {
        let mut commands = Vec::new();
        let outcome = placer.update(
            step.pointer(),
            step.input(),
            &context,
            PlacementServices::from_host(&world),
            &mut commands,
        );
        let previews = match outcome {
            Ok(previews) => previews,
            Err(error) => {
                warn!(step = index, %error, "placement update failed");
                println!("step {index}: {error}");
                continue;
            }
        };

        let placeable = previews.iter().filter(|preview| preview.placeable).count();
        match placer.mode().cursor() {
            Some(cursor) => println!(
                "step {index}: cursor {cursor}, {placeable}/{} placeable",
                previews.len()
            ),
            None => println!("step {index}: no cursor"),
        }

        apply_commands(&mut world, commands);
    }

    Ok(())
}

fn apply_commands(world: &mut World, commands: Vec<Command>) {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    for event in events {
        match event {
            Event::TilePlaced { tile } => {
                println!("  placed tile ({}, {}) on {}", tile.x(), tile.y(), tile.grid());
            }
            Event::EntitySpawned {
                entity,
                coordinates,
            } => {
                info!(%entity, "spawned");
                println!("  spawned {entity} at {coordinates}");
            }
            Event::PlacementRejected { command, reason } => {
                println!("  rejected {command:?}: {reason:?}");
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` directives win over the `info` default; `--verbose` adds `debug`.
fn env_filter(directives: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    }
}

fn parse_pointer(value: &str) -> Result<Vec2> {
    let (x, y) = value
        .split_once(',')
        .with_context(|| format!("pointer `{value}` must be written as X,Y"))?;
    let x: f32 = x
        .trim()
        .parse()
        .with_context(|| format!("invalid pointer x coordinate `{x}`"))?;
    let y: f32 = y
        .trim()
        .parse()
        .with_context(|| format!("invalid pointer y coordinate `{y}`"))?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn parses_pointer_pairs() {
        assert_eq!(parse_pointer("12.5, -3").ok(), Some(Vec2::new(12.5, -3.0)));
    }

    #[test]
    fn rejects_malformed_pointers() {
        assert!(parse_pointer("12").is_err());
        assert!(parse_pointer("a,1").is_err());
    }

    #[test]
    fn cli_arguments_parse() {
        let args = Args::try_parse_from([
            "gridplace",
            "--scenario",
            "demo.toml",
            "--pointer",
            "1,2",
            "--pointer",
            "3,4",
            "-v",
        ])
        .expect("arguments parse");
        assert_eq!(args.pointers, vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]);
        assert!(args.verbose);
    }

    #[test]
    fn log_directives_override_the_default_level() {
        assert_eq!(env_filter(None, false).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(env_filter(Some("warn"), false).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(env_filter(Some("trace"), false).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn verbose_raises_the_level_to_debug() {
        assert_eq!(env_filter(None, true).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(env_filter(Some("warn"), true).max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
