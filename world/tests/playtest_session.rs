//! End-to-end playtest scenarios driven purely through the command surface.

use std::time::Duration;

use tilebound_core::{
    CellCoord, Command, Event, InputSnapshot, LayerName, Mode, SheetKey, TileRef, GRID_COLUMNS,
};
use tilebound_system_playtest::RUN_SPEED;
use tilebound_world::{apply, query, World};

fn world_with_floor_at_row(row: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    for column in 0..GRID_COLUMNS {
        apply(
            &mut world,
            Command::PaintCell {
                layer: LayerName::new("foreground"),
                cell: CellCoord::new(column, row),
                tile: TileRef::new(0, 0, SheetKey::Foreground),
            },
            &mut events,
        );
    }
    world
}

fn enter_play(world: &mut World) {
    let mut events = Vec::new();
    apply(world, Command::SetMode { mode: Mode::Play }, &mut events);
    assert!(
        events.contains(&Event::ModeChanged { mode: Mode::Play }),
        "session must confirm the transition"
    );
}

fn tick(world: &mut World, dt: Duration, input: InputSnapshot) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, Command::Tick { dt, input }, &mut events);
    events
}

#[test]
fn spawned_actor_settles_on_the_floor_beneath_it() {
    let mut world = world_with_floor_at_row(9);
    enter_play(&mut world);

    let events = tick(&mut world, Duration::from_secs(2), InputSnapshot::default());

    let actor = query::actor(&world).expect("actor alive during playtest");
    assert_eq!(actor.y, 9.0, "actor rests on top of the solid row");
    assert_eq!(actor.x, 2.0);
    assert_eq!(actor.velocity_y, 0.0);
    assert!(actor.grounded);
    assert!(events.contains(&Event::ActorLanded { row: 9 }));
    assert!(events.contains(&Event::TimeAdvanced {
        dt: Duration::from_secs(2)
    }));
}

#[test]
fn one_held_second_of_right_input_covers_run_speed_cells() {
    let mut world = world_with_floor_at_row(9);
    enter_play(&mut world);
    let _ = tick(&mut world, Duration::from_secs(1), InputSnapshot::default());

    let _ = tick(
        &mut world,
        Duration::from_secs(1),
        InputSnapshot {
            move_right: true,
            ..InputSnapshot::default()
        },
    );

    let actor = query::actor(&world).expect("actor alive during playtest");
    let expected = 2.0 + RUN_SPEED;
    assert!(
        (actor.x - expected).abs() < 1e-3,
        "expected x near {expected}, got {}",
        actor.x
    );
}

#[test]
fn jump_edge_fires_exactly_once_per_elapsed_interval() {
    let mut world = world_with_floor_at_row(9);
    enter_play(&mut world);
    let _ = tick(&mut world, Duration::from_secs(1), InputSnapshot::default());

    // One second covers the whole jump arc; the edge must not re-trigger on
    // the quanta after the actor lands back on the floor.
    let events = tick(
        &mut world,
        Duration::from_secs(1),
        InputSnapshot {
            jump_pressed: true,
            ..InputSnapshot::default()
        },
    );

    let jumps = events
        .iter()
        .filter(|event| matches!(event, Event::JumpStarted))
        .count();
    assert_eq!(jumps, 1);
    let landings = events
        .iter()
        .filter(|event| matches!(event, Event::ActorLanded { .. }))
        .count();
    assert_eq!(landings, 1, "the arc ends back on the floor");
}

#[test]
fn airborne_jump_input_is_ignored() {
    let mut world = World::new();
    enter_play(&mut world);

    // No terrain anywhere, so the actor can never ground and never jump.
    let events = tick(
        &mut world,
        Duration::from_secs(1),
        InputSnapshot {
            jump_pressed: true,
            ..InputSnapshot::default()
        },
    );

    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::JumpStarted)));
}

#[test]
fn leftover_time_below_one_quantum_is_carried_not_dropped() {
    let mut world = world_with_floor_at_row(9);
    enter_play(&mut world);

    // Two half-quantum ticks must advance the simulation exactly once.
    let half = Duration::from_nanos(8_333_333);
    let _ = tick(&mut world, half, InputSnapshot::default());
    let before = query::actor(&world).expect("actor alive").y;
    let _ = tick(&mut world, half, InputSnapshot::default());
    let after = query::actor(&world).expect("actor alive").y;

    assert!(after > before, "the combined quantum must run a step");
}

#[test]
fn restarting_playtest_resets_the_actor_to_spawn() {
    let mut world = world_with_floor_at_row(9);
    enter_play(&mut world);
    let _ = tick(
        &mut world,
        Duration::from_secs(1),
        InputSnapshot {
            move_right: true,
            ..InputSnapshot::default()
        },
    );

    let mut events = Vec::new();
    apply(&mut world, Command::SetMode { mode: Mode::Edit }, &mut events);
    apply(&mut world, Command::SetMode { mode: Mode::Play }, &mut events);

    let actor = query::actor(&world).expect("actor respawned");
    assert_eq!(actor.x, 2.0);
    assert_eq!(actor.y, 8.0);
    assert_eq!(actor.velocity_x, 0.0);
    assert_eq!(actor.velocity_y, 0.0);
    assert!(!actor.grounded);
}
